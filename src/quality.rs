//! Heuristic quality scoring for chunks.
//!
//! ## The Problem
//!
//! A splitter can always produce *bounded* chunks; it cannot promise
//! *useful* ones. A chunk that opens mid-warning, skips from step 2 to
//! step 5, or is mostly blank lines will embed poorly and pollute
//! retrieval. Re-ranking at query time is too late — the damage is baked
//! into the index.
//!
//! The scorer estimates retrieval usefulness up front, per chunk, as a
//! value in `[0, 1]` built from five weighted dimensions:
//!
//! | Dimension               | Asks                                         |
//! |-------------------------|----------------------------------------------|
//! | `aviation_specific`     | domain terms, safety statements, procedures  |
//! | `semantic_completeness` | does the text start and end like a thought?  |
//! | `information_density`   | signal vs whitespace, keywords, numbers      |
//! | `structure_quality`     | headings, lists, tables, unclosed constructs |
//! | `size_appropriateness`  | distance from the target size window         |
//!
//! Weights vary by document type: a maintenance manual leans on domain
//! fidelity, a regulation on semantic completeness, training material on
//! structure. A flat penalty for degenerate content (too short, mostly
//! whitespace) is subtracted after weighting.
//!
//! This is a heuristic, not an NLP model. The constants below are
//! hand-tuned against aviation document sets and are deliberately kept
//! as-is; tests pin the aggregate behavior rather than re-deriving them.
//! Scoring never fails and never aborts chunking: every dimension is a
//! total function from text to `[0, 1]`.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::chunk::{char_len, ChunkType, TextChunk};
use crate::SplitConfig;

// ── Tuning constants ────────────────────────────────────────────────────────

/// Score below which the final result never drops (non-empty content).
const SCORE_FLOOR: f64 = 0.1;
/// Content shorter than this scores exactly [`SCORE_FLOOR`].
const SHORT_CIRCUIT_CHARS: usize = 10;

const AVIATION_BASELINE: f64 = 0.5;
const TERM_BONUS_STEP: f64 = 0.1;
const TERM_BONUS_CAP: f64 = 0.3;
const TERM_TRUNCATION_PENALTY: f64 = 0.3;
const SAFETY_BONUS: f64 = 0.2;
const SAFETY_INCOMPLETE_PENALTY: f64 = 0.4;
const SAFETY_MIN_TAIL_CHARS: usize = 20;
const STEP_BONUS: f64 = 0.2;
const PROCEDURE_INCOMPLETE_PENALTY: f64 = 0.3;
const PARAMETER_BONUS: f64 = 0.2;

const COMPLETENESS_BASELINE: f64 = 0.6;
const ENDING_BONUS: f64 = 0.3;
const ENDING_PENALTY: f64 = 0.2;
const SENTENCE_BONUS: f64 = 0.2;
const SENTENCE_PENALTY: f64 = 0.3;
const MIN_SENTENCE_CHARS: usize = 3;
const TOPIC_CHECK_MIN_CHARS: usize = 50;
const TOPIC_DRIFT_PENALTY: f64 = 0.1;
const TOPIC_FOCUS_BONUS: f64 = 0.1;

const DENSITY_BASELINE: f64 = 0.5;
const REPETITION_PENALTY: f64 = 0.3;
const RICHNESS_BONUS: f64 = 0.1;

const STRUCTURE_BASELINE: f64 = 0.4;
const HEADING_BONUS: f64 = 0.4;
const LIST_BONUS: f64 = 0.3;
const LIST_CONSISTENCY_BONUS: f64 = 0.1;
const SINGLE_LIST_ITEM_BONUS: f64 = 0.1;
const PARAGRAPH_BONUS: f64 = 0.2;
const SPECIAL_STRUCTURE_BONUS: f64 = 0.2;
const OPEN_CONSTRUCT_PENALTY: f64 = 0.3;

// ── Domain vocabulary ───────────────────────────────────────────────────────

/// Aviation vocabulary counted toward the domain-term bonus (lowercase).
const AVIATION_TERMS: &[&str] = &[
    "发动机",
    "液压系统",
    "燃油系统",
    "电气系统",
    "起落架",
    "飞行控制",
    "导航系统",
    "通信系统",
    "客舱",
    "货舱",
    "engine",
    "hydraulic",
    "fuel system",
    "electrical",
    "landing gear",
    "flight control",
    "navigation",
    "communication",
    "cabin",
    "cargo",
];

/// Keywords that signal safety-critical content.
const SAFETY_KEYWORDS: &[&str] = &[
    "警告", "注意", "危险", "禁止", "必须", "warning", "caution", "danger", "prohibited", "must",
];

/// Openers that introduce a safety statement whose completeness is checked.
const SAFETY_OPENERS: &[&str] = &[
    "警告:", "警告：", "注意:", "注意：", "危险:", "危险：", "WARNING:", "CAUTION:", "DANGER:",
];

/// Obligation/prohibition words a complete safety statement must contain.
const OBLIGATION_WORDS: &[&str] = &["必须", "禁止", "应该", "不得", "must", "should", "do not", "never"];

/// A procedure counts as closed when the chunk ends with one of these.
const PROCEDURE_END_MARKERS: &[&str] = &[".", "。", "完成", "complete", "done"];

/// Proper endings for prose content.
const PROPER_ENDINGS: &[&str] = &[
    ".", "。", "!", "！", "?", "？", "：", ":", "完成", "complete", "结束", "end",
];

/// Keywords counted toward informative-keyword density (lowercase).
const INFO_KEYWORDS: &[&str] = &[
    "参数", "数值", "规格", "标准", "要求", "步骤", "方法", "程序", "检查", "测试", "维修", "更换",
    "安装", "调整", "校准", "parameter", "value", "specification", "standard", "requirement", "step",
    "method", "procedure", "check", "test", "maintenance",
];

/// Topic buckets for the topical-concentration check (lowercase).
const TOPIC_BUCKETS: &[(&str, &[&str])] = &[
    ("maintenance", &["维修", "检查", "更换", "安装"]),
    ("operation", &["操作", "启动", "关闭", "运行"]),
    ("safety", &["安全", "警告", "注意", "危险"]),
    ("technical", &["参数", "规格", "标准", "技术"]),
];

// ── Patterns ────────────────────────────────────────────────────────────────

static STEP_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"步骤\s*\d+", r"第\s*\d+\s*步", r"(?i)step\s+\d+", r"\d+\.\s", r"\(\d+\)", r"[a-z]\)"]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
});

static STEP_NUMBERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)步骤\s*(\d+)|第\s*(\d+)\s*步|step\s+(\d+)|^(\d+)\.").expect("static pattern")
});

static PARAMETER_UNITS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+\s*(rpm|psi|°c|°f|kg|lb|ft|m|v|a|bar|mpa)",
        r"压力[:：]\s*\d+",
        r"温度[:：]\s*\d+",
        r"转速[:：]\s*\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Non-prose shapes exempt from the terminal-punctuation requirement.
static NON_PROSE_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^\s*[-•]\s",
        r"(?m)^\s*\d+\.\s",
        r"(?m)^\s*[a-zA-Z]\)\s",
        r"(?m):\s*$",
        r"(?im)\d+\s*(rpm|psi|°c|°f|kg|lb|ft|m|v|a)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

static SENTENCE_TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.。!！?？]").expect("static pattern"));

static HEADING_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^第\s*[一二三四五六七八九十\d]+\s*[章节条]",
        r"(?im)^chapter\s+\d+",
        r"(?im)^section\s+\d+",
        r"(?m)^#{1,6}\s",
        r"(?m)^\d+\.\d+",
        r"(?m)^[A-Z][A-Z\s]+:$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

static LIST_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?m)^\s*[-•]\s", r"(?m)^\s*\d+\.\s", r"(?m)^\s*[a-zA-Z]\)\s", r"(?m)^\s*\([a-zA-Z0-9]+\)\s"]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
});

static SPECIAL_STRUCTURES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\|.*\|", r"```", r"(?m)^\s*\w+[:：]\s*\w+", r"\d+\s*[x×]\s*\d+"]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
});

/// (opener, closer) pairs; an opener without its closer is an open construct.
static OPEN_CONSTRUCTS: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    [
        (r"(?m)^\s*步骤\s*\d+", r"完成|结束|end|complete"),
        (r"(?m)^\s*注意[:：]", r"[.。!！]\s*$"),
        (r"(?m)^\s*警告[:：]", r"[.。!！]\s*$"),
    ]
    .iter()
    .map(|(open, close)| {
        (
            Regex::new(open).expect("static pattern"),
            Regex::new(close).expect("static pattern"),
        )
    })
    .collect()
});

static NUMBERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("static pattern"));

// ── Weights ─────────────────────────────────────────────────────────────────

/// A per-dimension weight vector. Weights sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityWeights {
    /// Weight of the aviation-domain dimension.
    pub aviation_specific: f64,
    /// Weight of the semantic-completeness dimension.
    pub semantic_completeness: f64,
    /// Weight of the information-density dimension.
    pub information_density: f64,
    /// Weight of the structure-quality dimension.
    pub structure_quality: f64,
    /// Weight of the size-appropriateness dimension.
    pub size_appropriateness: f64,
}

impl QualityWeights {
    /// The documented default vector, used for every chunk type without a
    /// specialized entry.
    pub const DEFAULT: Self = Self {
        aviation_specific: 0.25,
        semantic_completeness: 0.25,
        information_density: 0.25,
        structure_quality: 0.20,
        size_appropriateness: 0.05,
    };

    const MAINTENANCE_MANUAL: Self = Self {
        aviation_specific: 0.30,
        semantic_completeness: 0.25,
        information_density: 0.20,
        structure_quality: 0.20,
        size_appropriateness: 0.05,
    };

    const REGULATION: Self = Self {
        aviation_specific: 0.20,
        semantic_completeness: 0.30,
        information_density: 0.25,
        structure_quality: 0.20,
        size_appropriateness: 0.05,
    };

    const TECHNICAL_STANDARD: Self = Self {
        aviation_specific: 0.25,
        semantic_completeness: 0.25,
        information_density: 0.25,
        structure_quality: 0.20,
        size_appropriateness: 0.05,
    };

    const TRAINING_MATERIAL: Self = Self {
        aviation_specific: 0.20,
        semantic_completeness: 0.30,
        information_density: 0.20,
        structure_quality: 0.25,
        size_appropriateness: 0.05,
    };

    /// The weight vector for a chunk type. The mapping is closed over
    /// [`ChunkType`] and fixed at compile time; unrecognized (structural)
    /// types use [`Self::DEFAULT`].
    #[must_use]
    pub const fn for_chunk_type(chunk_type: ChunkType) -> Self {
        match chunk_type {
            ChunkType::MaintenanceManual => Self::MAINTENANCE_MANUAL,
            ChunkType::Regulation => Self::REGULATION,
            ChunkType::TechnicalStandard => Self::TECHNICAL_STANDARD,
            ChunkType::TrainingMaterial => Self::TRAINING_MATERIAL,
            _ => Self::DEFAULT,
        }
    }
}

// ── Scorer ──────────────────────────────────────────────────────────────────

/// Individual dimension values for one chunk, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionScores {
    /// Domain-term, safety, and procedure heuristics.
    pub aviation_specific: f64,
    /// Terminal punctuation, sentence presence, topical concentration.
    pub semantic_completeness: f64,
    /// Whitespace ratio, keyword/number density, repetition.
    pub information_density: f64,
    /// Headings, lists, paragraphs, special structures, open constructs.
    pub structure_quality: f64,
    /// Distance from the configured size window.
    pub size_appropriateness: f64,
}

/// Scores chunks against a size configuration.
///
/// ## Example
///
/// ```rust
/// use stratus::{ChunkMetadata, ChunkType, QualityScorer, SplitConfig, TextChunk};
///
/// let config = SplitConfig::new(100)?.with_min_chunk_size(20).with_max_chunk_size(200);
/// let scorer = QualityScorer::new(&config);
///
/// let meta = ChunkMetadata::new("amm_0001", ChunkType::MaintenanceManual, "amm");
/// let chunk = TextChunk::new("警告: 维修液压系统前必须释放系统压力，确认安全销已安装。", meta);
/// let score = scorer.score(&chunk);
/// assert!((0.1..=1.0).contains(&score));
/// # Ok::<(), stratus::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QualityScorer {
    chunk_size: usize,
    min_chunk_size: usize,
    max_chunk_size: usize,
}

impl QualityScorer {
    /// Create a scorer sharing the splitter's size configuration.
    #[must_use]
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            chunk_size: config.chunk_size(),
            min_chunk_size: config.min_chunk_size(),
            max_chunk_size: config.max_chunk_size(),
        }
    }

    /// Score a chunk using the weight vector for its `chunk_type`.
    ///
    /// Empty content scores exactly `0.0`; content under 10 characters
    /// scores exactly `0.1`. Everything else lands in `[0.1, 1.0]`.
    #[must_use]
    pub fn score(&self, chunk: &TextChunk) -> f64 {
        self.score_with_weights(chunk, QualityWeights::for_chunk_type(chunk.metadata.chunk_type))
    }

    /// Score a chunk with an explicit weight vector.
    #[must_use]
    pub fn score_with_weights(&self, chunk: &TextChunk, weights: QualityWeights) -> f64 {
        let content = chunk.content.as_str();
        if content.trim().is_empty() {
            return 0.0;
        }
        if char_len(content) < SHORT_CIRCUIT_CHARS {
            return SCORE_FLOOR;
        }

        let dims = self.dimensions(content);
        let total = dims.aviation_specific * weights.aviation_specific
            + dims.semantic_completeness * weights.semantic_completeness
            + dims.information_density * weights.information_density
            + dims.structure_quality * weights.structure_quality
            + dims.size_appropriateness * weights.size_appropriateness;

        let final_score = (total - content_penalty(content)).max(SCORE_FLOOR).min(1.0);
        round3(final_score)
    }

    /// Compute all five dimension scores for a piece of content.
    #[must_use]
    pub fn dimensions(&self, content: &str) -> DimensionScores {
        DimensionScores {
            aviation_specific: aviation_specific(content),
            semantic_completeness: semantic_completeness(content),
            information_density: information_density(content),
            structure_quality: structure_quality(content),
            size_appropriateness: self.size_appropriateness(char_len(content)),
        }
    }

    /// Distance of `char_count` from the `[0.8, 1.2] × chunk_size` window.
    fn size_appropriateness(&self, char_count: usize) -> f64 {
        let count = char_count as f64;
        let optimal_min = self.chunk_size as f64 * 0.8;
        let optimal_max = self.chunk_size as f64 * 1.2;

        if (optimal_min..=optimal_max).contains(&count) {
            return 1.0;
        }

        if count < optimal_min {
            if char_count < self.min_chunk_size {
                (count / self.min_chunk_size as f64 * 0.3).clamp(0.0, 1.0)
            } else {
                (0.3 + count / optimal_min * 0.4).clamp(0.0, 1.0)
            }
        } else if char_count > self.max_chunk_size {
            (self.max_chunk_size as f64 / count * 0.5).clamp(0.0, 1.0)
        } else {
            (0.5 + optimal_max / count * 0.5).clamp(0.0, 1.0)
        }
    }
}

// ── Dimensions ──────────────────────────────────────────────────────────────

fn aviation_specific(content: &str) -> f64 {
    let mut score = AVIATION_BASELINE;
    let lower = content.to_lowercase();

    let term_hits = AVIATION_TERMS.iter().filter(|term| lower.contains(*term)).count();
    if term_hits > 0 {
        score += (term_hits as f64 * TERM_BONUS_STEP).min(TERM_BONUS_CAP);
    }

    // A term cut at the chunk boundary (content starts on its tail or ends
    // on its head) signals a bad split through domain vocabulary.
    for term in AVIATION_TERMS {
        if !lower.contains(term) {
            continue;
        }
        let chars: Vec<char> = term.chars().collect();
        if chars.len() < 2 {
            continue;
        }
        let tail: String = chars[1..].iter().collect();
        let head: String = chars[..chars.len() - 1].iter().collect();
        if lower.starts_with(&tail) || lower.ends_with(&head) {
            score -= TERM_TRUNCATION_PENALTY;
            break;
        }
    }

    if SAFETY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        score += SAFETY_BONUS;
        if !safety_statement_complete(content) {
            score -= SAFETY_INCOMPLETE_PENALTY;
        }
    }

    if STEP_MARKERS.iter().any(|re| re.is_match(content)) {
        score += STEP_BONUS;
        if has_incomplete_procedure(content) {
            score -= PROCEDURE_INCOMPLETE_PENALTY;
        }
    }

    if PARAMETER_UNITS.iter().any(|re| re.is_match(content)) {
        score += PARAMETER_BONUS;
    }

    score.clamp(0.0, 1.0)
}

/// A safety statement is complete only if enough text follows the opener,
/// the tail ends on sentence punctuation, and an obligation word appears.
fn safety_statement_complete(content: &str) -> bool {
    for opener in SAFETY_OPENERS {
        let Some(idx) = content.find(opener) else {
            continue;
        };
        let after = content[idx + opener.len()..].trim();
        if char_len(after) < SAFETY_MIN_TAIL_CHARS {
            return false;
        }
        if ![".", "。", "!", "！"].iter().any(|end| after.ends_with(end)) {
            return false;
        }
        if !OBLIGATION_WORDS.iter().any(|word| after.contains(word)) {
            return false;
        }
    }
    true
}

/// Step numbers must form a contiguous ascending run, and the chunk must
/// not stop dead after a step marker.
fn has_incomplete_procedure(content: &str) -> bool {
    let mut numbers: Vec<u32> = STEP_NUMBERS
        .captures_iter(content)
        .filter_map(|caps| {
            (1..caps.len())
                .filter_map(|i| caps.get(i))
                .find_map(|m| m.as_str().parse().ok())
        })
        .collect();

    if numbers.is_empty() {
        return false;
    }

    numbers.sort_unstable();
    if numbers.windows(2).any(|pair| pair[1] - pair[0] > 1) {
        return true;
    }

    let trimmed = content.trim_end();
    !PROCEDURE_END_MARKERS.iter().any(|marker| trimmed.ends_with(marker))
}

fn semantic_completeness(content: &str) -> f64 {
    let content = content.trim();
    let mut score = COMPLETENESS_BASELINE;

    let has_proper_ending = PROPER_ENDINGS.iter().any(|end| content.ends_with(end));
    let non_prose = NON_PROSE_SHAPES.iter().any(|re| re.is_match(content));

    if has_proper_ending || non_prose {
        score += ENDING_BONUS;
    } else {
        score -= ENDING_PENALTY;
    }

    let has_complete_sentence = SENTENCE_TERMINATORS
        .split(content)
        .any(|sentence| char_len(sentence.trim()) > MIN_SENTENCE_CHARS);
    if has_complete_sentence {
        score += SENTENCE_BONUS;
    } else if !non_prose {
        score -= SENTENCE_PENALTY;
    }

    if char_len(content) > TOPIC_CHECK_MIN_CHARS {
        let lower = content.to_lowercase();
        let buckets_present = TOPIC_BUCKETS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
            .count();
        if buckets_present > 2 {
            score -= TOPIC_DRIFT_PENALTY;
        } else if buckets_present == 1 {
            score += TOPIC_FOCUS_BONUS;
        }
    }

    score.clamp(0.0, 1.0)
}

fn information_density(content: &str) -> f64 {
    let total_chars = char_len(content);
    if total_chars == 0 {
        return 0.0;
    }

    let mut score = DENSITY_BASELINE;

    let ratio = non_whitespace_ratio(content);
    if ratio >= 0.8 {
        score += 0.3;
    } else if ratio >= 0.7 {
        score += 0.2;
    } else if ratio >= 0.6 {
        score += 0.1;
    } else if ratio < 0.5 {
        score -= 0.4;
    } else {
        score -= 0.2;
    }

    let words: Vec<&str> = content.unicode_words().collect();
    let word_total = words.len().max(1) as f64;

    let lower = content.to_lowercase();
    let keyword_hits = INFO_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    let keyword_density = keyword_hits as f64 / word_total;
    if keyword_density >= 0.2 {
        score += 0.3;
    } else if keyword_density >= 0.1 {
        score += 0.2;
    } else if keyword_density >= 0.05 {
        score += 0.1;
    } else {
        score -= 0.2;
    }

    let number_hits = NUMBERS.find_iter(content).count();
    if number_hits > 0 {
        let number_density = number_hits as f64 / word_total;
        if number_density > 0.2 {
            score += 0.2;
        } else if number_density > 0.1 {
            score += 0.1;
        }
    }

    if PARAMETER_UNITS[0].is_match(content) {
        score += 0.1;
    }

    if words.len() > 5 {
        let unique: std::collections::HashSet<&str> = words.iter().copied().collect();
        let repetition = words.len() as f64 / unique.len() as f64;
        if repetition > 3.0 {
            score -= REPETITION_PENALTY;
        } else if repetition < 1.5 {
            score += RICHNESS_BONUS;
        }
    }

    score.clamp(0.0, 1.0)
}

fn structure_quality(content: &str) -> f64 {
    let mut score = STRUCTURE_BASELINE;

    if HEADING_MARKERS.iter().any(|re| re.is_match(content)) {
        score += HEADING_BONUS;
    }

    // Which marker style matched tells us whether the list is uniform.
    let mut list_items = 0;
    let mut styles_matched = 0;
    for re in LIST_MARKERS.iter() {
        let count = re.find_iter(content).count();
        if count > 0 {
            styles_matched += 1;
            list_items += count;
        }
    }
    if list_items > 1 {
        score += LIST_BONUS;
        if styles_matched == 1 {
            score += LIST_CONSISTENCY_BONUS;
        }
    } else if list_items == 1 {
        score += SINGLE_LIST_ITEM_BONUS;
    }

    let paragraphs = content.split("\n\n").filter(|p| !p.trim().is_empty()).count();
    if paragraphs > 1 {
        score += PARAGRAPH_BONUS;
    }

    if SPECIAL_STRUCTURES.iter().any(|re| re.is_match(content)) {
        score += SPECIAL_STRUCTURE_BONUS;
    }

    for (opener, closer) in OPEN_CONSTRUCTS.iter() {
        if opener.is_match(content) && !closer.is_match(content) {
            score -= OPEN_CONSTRUCT_PENALTY;
            break;
        }
    }

    score.clamp(0.0, 1.0)
}

// ── Penalty ─────────────────────────────────────────────────────────────────

/// Flat penalty for degenerate content, subtracted after weighting.
fn content_penalty(content: &str) -> f64 {
    let mut penalty = 0.0;

    let chars = char_len(content);
    if chars < 30 {
        penalty += 0.4;
    } else if chars < 50 {
        penalty += 0.2;
    }

    let ratio = non_whitespace_ratio(content);
    if ratio < 0.3 {
        penalty += 0.5;
    } else if ratio < 0.5 {
        penalty += 0.3;
    } else if ratio < 0.6 {
        penalty += 0.1;
    }

    penalty
}

fn non_whitespace_ratio(content: &str) -> f64 {
    let total = char_len(content);
    if total == 0 {
        return 0.0;
    }
    let non_ws = content.chars().filter(|c| !c.is_whitespace()).count();
    non_ws as f64 / total as f64
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
