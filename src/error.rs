//! Error types for stratus.
//!
//! Everything here is a configuration-time failure: once a splitter or
//! engine has been constructed, chunking and scoring cannot fail on
//! well-formed input. The empty-separator fallback guarantees the splitter
//! terminates, and scoring degrades to dimension baselines instead of
//! propagating.

/// Errors that can occur while resolving chunking configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// A separator entry failed to compile as a regular expression.
    #[error("invalid separator pattern {pattern:?}: {source}")]
    InvalidSeparatorPattern {
        /// The offending separator entry.
        pattern: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },

    /// A preset was requested by a name the engine does not know.
    #[error("unknown preset: {0:?}")]
    UnknownPreset(String),
}

/// Result type for stratus operations.
pub type Result<T> = std::result::Result<T, Error>;
