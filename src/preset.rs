//! Preset selection and the chunking engine.
//!
//! A preset bundles everything the pipeline needs for one kind of
//! document: a separator hierarchy, size/overlap bounds, and the chunk
//! type whose weight vector the scorer will use. Five are built in:
//!
//! | Preset               | Sizing    | Tuned for                        |
//! |----------------------|-----------|----------------------------------|
//! | `maintenance-manual` | 1200/150  | AMM/CMM task and procedure text  |
//! | `regulation`         | 1200/150  | CCAR/FAR regulatory clauses      |
//! | `technical-standard` | 1200/150  | standards and specifications     |
//! | `training-material`  | 1200/150  | courseware and training handouts |
//! | `generic`            | 1000/200  | everything else                  |
//!
//! ## Selection
//!
//! Automatic selection is an explicit, ordered rule list — predicate →
//! preset, first match wins. No scoring, no blending, no registry: the
//! order in [`SELECTION_RULES`] is the complete selection policy, which
//! keeps it auditable and directly testable. A declared document type
//! outranks title keywords, which outrank file extensions; anything
//! unmatched lands on `generic`, never an error. Only looking a preset up
//! *by name* can fail.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::chunk::{char_len, ChunkMetadata, TextChunk};
use crate::quality::QualityScorer;
use crate::recursive::RecursiveSplitter;
use crate::separator::SeparatorSpec;
use crate::{ChunkType, Error, Result, SplitConfig};

/// Separator hierarchy for aviation presets: the default hierarchy plus
/// clause-level markers (条/款/项) common in regulatory and manual text.
const AVIATION_SEPARATORS: &[&str] = &[
    "\n\n",
    "\n第",
    "\n章",
    "\n节",
    "\n条",
    "\n款",
    "\n项",
    "\nChapter",
    "\nSection",
    "\nArticle",
    "\n\n•",
    "\n\n-",
    "\n\n*",
    "\n",
    "。",
    "！",
    "？",
    ".",
    "!",
    "?",
    "；",
    ";",
    "，",
    ",",
    " ",
    "\t",
    "、",
    "：",
    ":",
    "",
];

// ── Presets ─────────────────────────────────────────────────────────────────

/// A named bundle of splitter configuration and scoring identity.
#[derive(Debug, Clone)]
pub struct Preset {
    /// Stable lookup name.
    pub name: &'static str,
    /// Chunk type stamped on output, which selects the weight vector.
    pub chunk_type: ChunkType,
    /// Separator configuration handed to the resolver.
    pub separators: SeparatorSpec,
    /// Size, overlap, and flag configuration for the splitter.
    pub config: SplitConfig,
}

impl Preset {
    fn aviation(name: &'static str, chunk_type: ChunkType) -> Self {
        Self {
            name,
            chunk_type,
            separators: SeparatorSpec::literal(AVIATION_SEPARATORS.iter().copied()),
            config: SplitConfig::new(1200)
                .expect("non-zero size")
                .with_overlap(150)
                .with_min_chunk_size(100)
                .with_max_chunk_size(2000)
                .with_start_index(true),
        }
    }

    /// Maintenance-manual preset (AMM/CMM task text).
    #[must_use]
    pub fn maintenance_manual() -> Self {
        Self::aviation("maintenance-manual", ChunkType::MaintenanceManual)
    }

    /// Regulation preset (CCAR/FAR clause text).
    #[must_use]
    pub fn regulation() -> Self {
        Self::aviation("regulation", ChunkType::Regulation)
    }

    /// Technical-standard preset.
    #[must_use]
    pub fn technical_standard() -> Self {
        Self::aviation("technical-standard", ChunkType::TechnicalStandard)
    }

    /// Training-material preset.
    #[must_use]
    pub fn training_material() -> Self {
        Self::aviation("training-material", ChunkType::TrainingMaterial)
    }

    /// The fallback preset for unmatched documents.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            name: "generic",
            chunk_type: ChunkType::Paragraph,
            separators: SeparatorSpec::default(),
            config: SplitConfig::new(1000)
                .expect("non-zero size")
                .with_overlap(200)
                .with_min_chunk_size(100)
                .with_max_chunk_size(2000)
                .with_start_index(true),
        }
    }

    /// All built-in presets, `generic` last.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::maintenance_manual(),
            Self::regulation(),
            Self::technical_standard(),
            Self::training_material(),
            Self::generic(),
        ]
    }
}

// ── Document metadata + selection rules ─────────────────────────────────────

/// Caller-supplied facts about a document, used for preset selection and
/// chunk attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    /// File name (or any stable identifier) of the source document.
    pub file_name: String,
    /// Declared document type, when the caller knows it.
    pub document_type: Option<String>,
    /// File extension, with or without the leading dot.
    pub file_extension: Option<String>,
    /// Document title.
    pub title: Option<String>,
    /// Document subject line.
    pub subject: Option<String>,
}

impl DocumentMeta {
    /// Metadata with just a file name.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Set the declared document type.
    #[must_use]
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Set the file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = Some(extension.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// The file name without its final extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map_or(self.file_name.as_str(), |(stem, _)| stem)
    }
}

/// One selection predicate.
#[derive(Debug, Clone, Copy)]
pub enum RulePredicate {
    /// The declared document type, normalized, equals one of these.
    DeclaredType(&'static [&'static str]),
    /// Title or subject contains one of these keywords (lowercase).
    TitleKeyword(&'static [&'static str]),
    /// The file extension, normalized, equals one of these.
    Extension(&'static [&'static str]),
}

impl RulePredicate {
    fn matches(&self, meta: &DocumentMeta) -> bool {
        match self {
            Self::DeclaredType(names) => meta.document_type.as_deref().is_some_and(|declared| {
                let normalized = declared.trim().to_lowercase().replace('-', "_");
                names.contains(&normalized.as_str())
            }),
            Self::TitleKeyword(keywords) => {
                let haystacks = [meta.title.as_deref(), meta.subject.as_deref()];
                haystacks.iter().flatten().any(|text| {
                    let lower = text.to_lowercase();
                    keywords.iter().any(|kw| lower.contains(kw))
                })
            }
            Self::Extension(extensions) => meta.file_extension.as_deref().is_some_and(|ext| {
                let normalized = ext.trim_start_matches('.').to_lowercase();
                extensions.contains(&normalized.as_str())
            }),
        }
    }
}

/// A predicate → preset pair.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRule {
    /// The predicate to test against document metadata.
    pub predicate: RulePredicate,
    /// Name of the preset the rule routes to.
    pub preset: &'static str,
}

/// The complete selection policy, highest priority first.
pub const SELECTION_RULES: &[SelectionRule] = &[
    // Declared document type wins outright.
    SelectionRule {
        predicate: RulePredicate::DeclaredType(&["maintenance_manual"]),
        preset: "maintenance-manual",
    },
    SelectionRule {
        predicate: RulePredicate::DeclaredType(&["regulation"]),
        preset: "regulation",
    },
    SelectionRule {
        predicate: RulePredicate::DeclaredType(&["technical_standard", "standard"]),
        preset: "technical-standard",
    },
    SelectionRule {
        predicate: RulePredicate::DeclaredType(&["training_material", "training"]),
        preset: "training-material",
    },
    // Then title/subject keywords.
    SelectionRule {
        predicate: RulePredicate::TitleKeyword(&["维修", "手册", "maintenance", "manual"]),
        preset: "maintenance-manual",
    },
    SelectionRule {
        predicate: RulePredicate::TitleKeyword(&["规章", "制度", "regulation", "policy"]),
        preset: "regulation",
    },
    SelectionRule {
        predicate: RulePredicate::TitleKeyword(&["标准", "规范", "standard", "specification"]),
        preset: "technical-standard",
    },
    SelectionRule {
        predicate: RulePredicate::TitleKeyword(&["培训", "教学", "training", "education"]),
        preset: "training-material",
    },
    // Then format defaults. Plain formats all chunk recursively today, so
    // they share the generic preset; the rule slots keep the tiers explicit.
    SelectionRule {
        predicate: RulePredicate::Extension(&["pdf", "docx", "doc", "txt", "md"]),
        preset: "generic",
    },
];

// ── Chunk ids ───────────────────────────────────────────────────────────────

/// Thread-safe monotonic sequence for chunk ids.
///
/// One allocator is owned by each engine, so concurrent callers sharing an
/// engine get globally unique ids; callers wanting an isolated id scope
/// construct one engine per scope.
#[derive(Debug, Default)]
pub struct ChunkIdAllocator {
    next: AtomicU64,
}

impl ChunkIdAllocator {
    /// A fresh allocator starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next sequence number.
    pub fn next_seq(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// The splitter → scorer pipeline behind a preset table.
///
/// One call processes one document to completion, synchronously; the only
/// shared state is the id allocator, which is atomic. Callers processing
/// many documents in parallel can share one engine or build one per worker.
///
/// ## Example
///
/// ```rust
/// use stratus::{ChunkingEngine, DocumentMeta};
///
/// let engine = ChunkingEngine::new();
/// let meta = DocumentMeta::new("amm_ch29.txt").with_title("液压系统维修手册");
///
/// let chunks = engine.chunk_document("液压泵压力应为 3000 psi。", &meta)?;
/// assert_eq!(chunks.len(), 1);
/// assert!(chunks[0].quality_score > 0.0);
/// # Ok::<(), stratus::Error>(())
/// ```
#[derive(Debug)]
pub struct ChunkingEngine {
    presets: Vec<Preset>,
    ids: ChunkIdAllocator,
}

impl Default for ChunkingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkingEngine {
    /// An engine with the built-in preset table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_presets(Preset::builtin())
    }

    /// An engine with a caller-supplied preset table. The table should
    /// contain a preset named `generic` to serve as the selection fallback;
    /// without one, the last entry is the fallback.
    #[must_use]
    pub fn with_presets(presets: Vec<Preset>) -> Self {
        Self {
            presets,
            ids: ChunkIdAllocator::new(),
        }
    }

    /// Look a preset up by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPreset`] when no preset has that name.
    pub fn preset(&self, name: &str) -> Result<&Preset> {
        self.presets
            .iter()
            .find(|preset| preset.name == name)
            .ok_or_else(|| Error::UnknownPreset(name.to_string()))
    }

    /// Select a preset for the given document metadata. First matching
    /// rule wins; unmatched metadata falls back to `generic` (or the last
    /// preset in a custom table), never an error.
    #[must_use]
    pub fn select_preset(&self, meta: &DocumentMeta) -> &Preset {
        for rule in SELECTION_RULES {
            if rule.predicate.matches(meta) {
                if let Ok(preset) = self.preset(rule.preset) {
                    tracing::debug!(preset = preset.name, file = %meta.file_name, "preset selected");
                    return preset;
                }
            }
        }
        self.preset("generic").unwrap_or_else(|_| {
            self.presets.last().expect("engine has at least one preset")
        })
    }

    /// Chunk a document with an automatically selected preset.
    ///
    /// Empty or whitespace-only text returns an empty list.
    ///
    /// # Errors
    ///
    /// Separator-resolution failures from the selected preset
    /// (impossible for the built-in table).
    pub fn chunk_document(&self, text: &str, meta: &DocumentMeta) -> Result<Vec<TextChunk>> {
        let preset = self.select_preset(meta).clone();
        self.run(text, meta, &preset)
    }

    /// Chunk a document with an explicitly named preset.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPreset`] for an unknown name, plus any
    /// separator-resolution failure.
    pub fn chunk_with_preset(&self, text: &str, meta: &DocumentMeta, name: &str) -> Result<Vec<TextChunk>> {
        let preset = self.preset(name)?.clone();
        self.run(text, meta, &preset)
    }

    fn run(&self, text: &str, meta: &DocumentMeta, preset: &Preset) -> Result<Vec<TextChunk>> {
        let splitter = RecursiveSplitter::new(preset.config.clone(), &preset.separators)?;
        let scorer = QualityScorer::new(&preset.config);
        let stamp = chrono::Utc::now().to_rfc3339();

        let raw_chunks = splitter.split(text);
        let mut chunks = Vec::with_capacity(raw_chunks.len());

        for raw in raw_chunks {
            let mut metadata = ChunkMetadata::new(
                format!("{}_{:04}", meta.stem(), self.ids.next_seq()),
                preset.chunk_type,
                meta.file_name.clone(),
            );
            metadata.start_position = raw.start_index;
            metadata.end_position = raw.start_index.map(|start| start + char_len(&raw.content));
            metadata.processing_timestamp = Some(stamp.clone());

            let mut chunk = TextChunk::new(raw.content, metadata);
            chunk.overlap_content = raw.overlap_content;
            chunk.quality_score = scorer.score(&chunk);
            chunks.push(chunk);
        }

        tracing::debug!(
            preset = preset.name,
            file = %meta.file_name,
            chunks = chunks.len(),
            "document chunked"
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_outranks_title_keywords() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("doc.pdf")
            .with_document_type("regulation")
            .with_title("发动机维修手册"); // title says maintenance
        assert_eq!(engine.select_preset(&meta).name, "regulation");
    }

    #[test]
    fn title_keywords_outrank_extension() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("doc.pdf")
            .with_extension(".pdf")
            .with_title("Hydraulic system maintenance manual");
        assert_eq!(engine.select_preset(&meta).name, "maintenance-manual");
    }

    #[test]
    fn subject_keywords_also_match() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("doc.txt").with_subject("乘务员培训资料");
        assert_eq!(engine.select_preset(&meta).name, "training-material");
    }

    #[test]
    fn unmatched_metadata_falls_back_to_generic() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("notes.xyz").with_title("random notes");
        assert_eq!(engine.select_preset(&meta).name, "generic");
    }

    #[test]
    fn empty_metadata_falls_back_to_generic() {
        let engine = ChunkingEngine::new();
        assert_eq!(engine.select_preset(&DocumentMeta::default()).name, "generic");
    }

    #[test]
    fn extension_normalization_tolerates_dot_and_case() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("a").with_extension(".PDF");
        assert_eq!(engine.select_preset(&meta).name, "generic");
    }

    #[test]
    fn unknown_preset_name_is_an_error() {
        let engine = ChunkingEngine::new();
        let err = engine
            .chunk_with_preset("text", &DocumentMeta::new("a.txt"), "no-such-preset")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPreset(name) if name == "no-such-preset"));
    }

    #[test]
    fn empty_text_returns_empty_list() {
        let engine = ChunkingEngine::new();
        let chunks = engine.chunk_document("", &DocumentMeta::new("a.txt")).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn chunks_carry_ids_type_and_timestamp() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("amm_ch29.txt").with_document_type("maintenance_manual");
        let chunks = engine
            .chunk_document("液压泵出口压力应为 3000 psi，偏差不得超过 50 psi。", &meta)
            .unwrap();

        assert_eq!(chunks.len(), 1);
        let chunk = &chunks[0];
        assert!(chunk.metadata.chunk_id.starts_with("amm_ch29_"));
        assert_eq!(chunk.metadata.chunk_type, ChunkType::MaintenanceManual);
        assert_eq!(chunk.metadata.source_document, "amm_ch29.txt");
        assert!(chunk.metadata.processing_timestamp.is_some());
        assert!(chunk.quality_score > 0.0);
    }

    #[test]
    fn chunk_ids_are_unique_across_documents() {
        let engine = ChunkingEngine::new();
        let meta = DocumentMeta::new("doc.txt");
        let first = engine.chunk_document("第一份文件的内容。", &meta).unwrap();
        let second = engine.chunk_document("第二份文件的内容。", &meta).unwrap();
        assert_ne!(first[0].metadata.chunk_id, second[0].metadata.chunk_id);
    }

    #[test]
    fn id_allocator_is_monotonic() {
        let ids = ChunkIdAllocator::new();
        let a = ids.next_seq();
        let b = ids.next_seq();
        assert!(b > a);
    }

    #[test]
    fn stem_strips_final_extension() {
        assert_eq!(DocumentMeta::new("amm_ch29.txt").stem(), "amm_ch29");
        assert_eq!(DocumentMeta::new("noext").stem(), "noext");
    }

    #[test]
    fn builtin_presets_resolve() {
        for preset in Preset::builtin() {
            assert!(preset.separators.resolve().is_ok(), "{} failed", preset.name);
        }
    }
}
