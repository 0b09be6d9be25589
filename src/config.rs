//! Split configuration: size bounds, overlap, and splitter flags.
//!
//! ## The Problem
//!
//! Chunk sizing is a three-way tension:
//!
//! - `chunk_size` is the target ceiling the splitter accumulates toward
//! - `min_chunk_size` guards against fragments too small to embed usefully
//! - `max_chunk_size` is the point past which the quality scorer starts
//!   discounting a chunk as semantically diluted
//!
//! Overlap adds a fourth constraint: carrying more context than a whole
//! chunk is meaningless, so `chunk_overlap >= chunk_size` cannot be
//! honored. Rejecting it outright would fail pipelines over a tuning knob,
//! so the config clamps to `chunk_size - 1` and reports a warning the
//! caller can observe (and a `tracing` subscriber can log).
//!
//! All values are **character** counts; see the crate docs for why.

use crate::{Error, Result};

/// Validated configuration for the recursive splitter.
///
/// # Examples
///
/// ```rust
/// use stratus::SplitConfig;
///
/// let config = SplitConfig::new(1000)?.with_overlap(200);
/// assert_eq!(config.chunk_size(), 1000);
/// assert_eq!(config.chunk_overlap(), 200);
///
/// // Oversized overlap clamps instead of failing, and says so.
/// let config = SplitConfig::new(100)?.with_overlap(100);
/// assert_eq!(config.chunk_overlap(), 99);
/// assert!(!config.warnings().is_empty());
/// # Ok::<(), stratus::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    min_chunk_size: usize,
    max_chunk_size: usize,
    add_start_index: bool,
    strip_whitespace: bool,
    warnings: Vec<String>,
}

impl SplitConfig {
    /// Create a config with the given target chunk size and the default
    /// overlap (20% of the target), minimum (100), and maximum (2x target).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `chunk_size == 0`.
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap: chunk_size / 5,
            min_chunk_size: 100.min(chunk_size),
            max_chunk_size: chunk_size * 2,
            add_start_index: false,
            strip_whitespace: true,
            warnings: Vec::new(),
        })
    }

    /// Set the overlap carried between adjacent chunks.
    ///
    /// Values `>= chunk_size` are clamped to `chunk_size - 1`; the clamp is
    /// recorded in [`warnings`](Self::warnings) and emitted as a
    /// `tracing::warn!`.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        if overlap >= self.chunk_size {
            let clamped = self.chunk_size - 1;
            let warning = format!(
                "chunk_overlap {overlap} >= chunk_size {}; clamped to {clamped}",
                self.chunk_size
            );
            tracing::warn!(overlap, chunk_size = self.chunk_size, clamped, "overlap clamped");
            self.warnings.push(warning);
            self.chunk_overlap = clamped;
        } else {
            self.chunk_overlap = overlap;
        }
        self
    }

    /// Set the minimum chunk size; smaller chunks are merged into a
    /// neighbor rather than emitted.
    #[must_use]
    pub fn with_min_chunk_size(mut self, min: usize) -> Self {
        self.min_chunk_size = min;
        self
    }

    /// Set the size above which the quality scorer treats a chunk as
    /// oversized.
    #[must_use]
    pub fn with_max_chunk_size(mut self, max: usize) -> Self {
        self.max_chunk_size = max;
        self
    }

    /// Record each chunk's absolute character offset in the source text.
    #[must_use]
    pub fn with_start_index(mut self, enabled: bool) -> Self {
        self.add_start_index = enabled;
        self
    }

    /// Normalize whitespace before splitting (newline normalization,
    /// trailing-space removal, blank-line collapsing, end trimming).
    #[must_use]
    pub fn with_strip_whitespace(mut self, enabled: bool) -> Self {
        self.strip_whitespace = enabled;
        self
    }

    /// Target maximum chunk size in characters.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Characters of context carried from each chunk into the next.
    #[must_use]
    pub const fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Minimum emitted chunk size in characters.
    #[must_use]
    pub const fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    /// Size past which chunks are considered oversized.
    #[must_use]
    pub const fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Whether chunks record absolute start offsets.
    #[must_use]
    pub const fn add_start_index(&self) -> bool {
        self.add_start_index
    }

    /// Whether input whitespace is normalized before splitting.
    #[must_use]
    pub const fn strip_whitespace(&self) -> bool {
        self.strip_whitespace
    }

    /// Warnings accumulated while resolving this configuration.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        // 1000/200 matches the generic recursive preset.
        Self::new(1000).expect("default chunk size is non-zero").with_overlap(200)
    }
}
