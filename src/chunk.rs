//! The chunk data model: text plus metadata plus a quality score.
//!
//! A [`TextChunk`] is a self-contained piece of a source document that can
//! be embedded, indexed, and retrieved independently. Unlike a plain string
//! slice it carries attribution (`source_document`, optional page/section),
//! position (`start_position`/`end_position`), overlap context from its
//! predecessor, and a heuristic [`quality_score`](TextChunk::quality_score)
//! that a retrieval pipeline can use to prefer well-formed segments.
//!
//! ## Character offsets
//!
//! All counts and positions here are **character** counts, not byte counts.
//! Aviation manuals are routinely bilingual (Chinese + English), and byte
//! offsets would make `character_count` depend on encoding width:
//!
//! ```rust
//! use stratus::char_len;
//!
//! assert_eq!(char_len("警告"), 2);   // 6 bytes, 2 characters
//! assert_eq!(char_len("warn"), 4);
//! ```
//!
//! ## Lifecycle
//!
//! A chunk is created once by the splitter, scored once by the quality
//! scorer, and handed to the caller. Nothing inside the crate retains a
//! reference to it afterwards.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// The structural or domain category a chunk belongs to.
///
/// Domain variants (`MaintenanceManual`, `Regulation`, ...) select the
/// quality-weight vector used when scoring; structural variants fall back
/// to the default vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    /// Plain prose paragraph (the default).
    #[default]
    Paragraph,
    /// A titled section.
    Section,
    /// A chapter-level division.
    Chapter,
    /// A list (ordered or unordered).
    List,
    /// Tabular content.
    Table,
    /// A code or command block.
    Code,
    /// Aircraft maintenance manual content.
    MaintenanceManual,
    /// Regulatory or policy text.
    Regulation,
    /// A technical standard or specification.
    TechnicalStandard,
    /// Training or instructional material.
    TrainingMaterial,
    /// A step-by-step operating procedure.
    OperationProcedure,
}

/// Attribution and position metadata attached to every [`TextChunk`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Identifier unique within one document-processing run.
    pub chunk_id: String,
    /// Structural/domain category of the chunk.
    pub chunk_type: ChunkType,
    /// Identifier of the source document (file name or stem).
    pub source_document: String,
    /// Page the chunk came from, when the parser knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    /// Nearest enclosing section title, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    /// Absolute character offset of the first character in the source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_position: Option<usize>,
    /// Absolute character offset one past the last character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_position: Option<usize>,
    /// Parent chunk when hierarchical splitting produced this chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_chunk_id: Option<String>,
    /// Children of this chunk under hierarchical splitting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_chunk_ids: Vec<String>,
    /// Confidence the producing component had in this chunk's boundaries.
    pub confidence_score: f64,
    /// RFC 3339 timestamp of when the chunk was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_timestamp: Option<String>,
}

impl ChunkMetadata {
    /// Create metadata with the required fields; optional fields start unset
    /// and `confidence_score` starts at 1.0.
    #[must_use]
    pub fn new(chunk_id: impl Into<String>, chunk_type: ChunkType, source_document: impl Into<String>) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            chunk_type,
            source_document: source_document.into(),
            page_number: None,
            section_title: None,
            start_position: None,
            end_position: None,
            parent_chunk_id: None,
            child_chunk_ids: Vec::new(),
            confidence_score: 1.0,
            processing_timestamp: None,
        }
    }
}

/// A bounded segment of document text with metadata and a quality score.
///
/// ## Invariants
///
/// - `character_count == char_len(&content)`
/// - `overlap_content` is context carried from the previous chunk's tail;
///   it is *not* counted in `character_count`
/// - `quality_score` is in `[0.0, 1.0]`; `0.0` until scored
///
/// ```rust
/// use stratus::{char_len, ChunkMetadata, ChunkType, TextChunk};
///
/// let meta = ChunkMetadata::new("amm_0001", ChunkType::MaintenanceManual, "amm.pdf");
/// let chunk = TextChunk::new("Check hydraulic pressure.", meta);
/// assert_eq!(chunk.character_count, char_len(&chunk.content));
/// assert_eq!(chunk.quality_score, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// The chunk text. Owns its data; no reference back to the source.
    pub content: String,
    /// Attribution and position metadata.
    pub metadata: ChunkMetadata,
    /// Unicode (UAX #29) word count of `content`.
    pub word_count: usize,
    /// Character count of `content`.
    pub character_count: usize,
    /// Trailing text of the previous chunk, carried as retrieval context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_content: Option<String>,
    /// Heuristic quality score in `[0, 1]`; 0 until scored.
    pub quality_score: f64,
}

impl TextChunk {
    /// Create an unscored chunk, deriving word and character counts from
    /// the content.
    #[must_use]
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        let content = content.into();
        let word_count = word_count(&content);
        let character_count = char_len(&content);
        Self {
            content,
            metadata,
            word_count,
            character_count,
            overlap_content: None,
            quality_score: 0.0,
        }
    }

    /// Whether the chunk has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The character span of this chunk in the source, when offsets were
    /// recorded.
    #[must_use]
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        match (self.metadata.start_position, self.metadata.end_position) {
            (Some(start), Some(end)) => Some(start..end),
            _ => None,
        }
    }
}

impl std::fmt::Display for TextChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TextChunk {{ id: {}, type: {:?}, chars: {}, quality: {:.3} }}",
            self.metadata.chunk_id, self.metadata.chunk_type, self.character_count, self.quality_score
        )
    }
}

/// Character (not byte) length of a string.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Unicode word count (UAX #29), so CJK text counts words rather than
/// whitespace runs.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}
