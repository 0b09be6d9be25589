//! # stratus
//!
//! Recursive text chunking with heuristic quality scoring, built for
//! retrieval-augmented generation (RAG) over aviation documents.
//!
//! ## The Problem
//!
//! Language models have context windows. Maintenance manuals don't fit.
//! You need to split them into pieces ("chunks") small enough to embed and
//! retrieve, but large enough to preserve meaning.
//!
//! Generic splitting is not enough for technical documents:
//!
//! - A warning split from its obligation ("必须…", "do not…") is a hazard,
//!   not a retrieval hit
//! - A procedure that jumps from step 2 to step 5 misleads the reader
//! - A chunk that is 70% blank lines embeds as noise
//! - Chinese text has no spaces, so byte- or whitespace-based size math
//!   produces nonsense
//!
//! stratus addresses this with two cooperating parts: a **recursive
//! splitter** that honors document structure, and a **quality scorer**
//! that estimates each chunk's retrieval usefulness so downstream
//! pipelines can prefer well-formed segments.
//!
//! ## Recursive Splitting
//!
//! The splitter tries delimiters coarsest-first and only falls to finer
//! ones for pieces that are still too large:
//!
//! ```text
//! Separators: ["\n\n", "\n第", "。", " ", ""]
//!
//! 1. Split on "\n\n" (paragraphs)
//! 2. Any piece > chunk_size? Split that piece on "\n第" (chapters)
//! 3. Still too large? Split on "。" (sentences)
//! 4. Still too large? Split on " " (words)
//! 5. Last resort: split every chunk_size characters
//! ```
//!
//! Structural fidelity wins over size uniformity, adjacent chunks carry
//! configurable overlap for context continuity, and all arithmetic is in
//! **characters**, so CJK and Latin text are measured alike.
//!
//! ## Quality Scoring
//!
//! Every chunk gets a score in `[0, 1]` from five weighted dimensions:
//! domain specificity (terms, safety statements, procedure integrity),
//! semantic completeness, information density, structural quality, and
//! size appropriateness. Weights vary with the document type; degenerate
//! content takes a flat penalty. See [`QualityScorer`] for the full rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use stratus::{ChunkingEngine, DocumentMeta};
//!
//! let engine = ChunkingEngine::new();
//! let meta = DocumentMeta::new("amm_ch29.txt").with_title("液压系统维修手册");
//!
//! let text = "警告: 维修液压系统前必须释放系统压力。\n\n\
//!             步骤1 检查压力表读数为 0 psi。\n\
//!             步骤2 断开液压管路接头。\n\
//!             步骤3 更换密封圈并恢复连接，工作完成。";
//!
//! let chunks = engine.chunk_document(text, &meta)?;
//! for chunk in &chunks {
//!     println!("{} -> {:.3}", chunk.metadata.chunk_id, chunk.quality_score);
//! }
//! # Ok::<(), stratus::Error>(())
//! ```
//!
//! Lower-level pieces are exposed for callers that need them directly:
//!
//! ```rust
//! use stratus::{RecursiveSplitter, SeparatorSpec, SplitConfig};
//!
//! let config = SplitConfig::new(200)?.with_overlap(40);
//! let splitter = RecursiveSplitter::new(config, &SeparatorSpec::default())?;
//! let raw = splitter.split("Some document text.");
//! assert_eq!(raw.len(), 1);
//! # Ok::<(), stratus::Error>(())
//! ```
//!
//! ## Concurrency Model
//!
//! One call processes one document to completion — synchronous, no I/O,
//! no background work. The engine's only shared state is an atomic chunk-id
//! counter, so a single engine can be shared across threads; callers
//! wanting isolated id scopes build one engine per worker. Cost scales
//! with input length and nothing else, so deadlines are imposed by
//! bounding input size.

mod chunk;
mod config;
mod error;
mod preset;
mod quality;
mod recursive;
mod separator;

pub use chunk::{char_len, word_count, ChunkMetadata, ChunkType, TextChunk};
pub use config::SplitConfig;
pub use error::{Error, Result};
pub use preset::{
    ChunkIdAllocator, ChunkingEngine, DocumentMeta, Preset, RulePredicate, SelectionRule,
    SELECTION_RULES,
};
pub use quality::{DimensionScores, QualityScorer, QualityWeights};
pub use recursive::{RawChunk, RecursiveSplitter};
pub use separator::{Separator, SeparatorSet, SeparatorSpec, DEFAULT_SEPARATORS};
