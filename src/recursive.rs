//! Recursive character splitting over a separator hierarchy.
//!
//! ## The Algorithm
//!
//! Given the hierarchy `["\n\n", "。", " ", ""]` and a 100-character target:
//!
//! ```text
//! 1. Text fits in 100 chars? Done — one piece.
//! 2. Split on "\n\n" (paragraphs). Absent? Try "。", then " ", ...
//! 3. Greedily pack consecutive pieces while they fit in 100 chars.
//! 4. A single piece over 100 chars recurses with the *next* separator.
//! 5. All separators exhausted: hard-split every 100 characters.
//! ```
//!
//! Structural fidelity beats size uniformity: an earlier separator always
//! wins over a later one, even when the later one would produce more even
//! pieces. A chapter boundary is worth a lopsided chunk.
//!
//! ## Overlap
//!
//! Each finished chunk after the first carries the tail of its predecessor
//! as `overlap_content` — context for the embedding model, not part of the
//! chunk's own text. The tail is clipped to the nearest following word
//! boundary (UAX #29) so it does not start mid-word, and it never feeds
//! back into the size arithmetic, which is what prevents runaway growth.
//!
//! ## Termination
//!
//! The resolver guarantees a terminal empty-string separator, and the
//! hard-split fallback consumes at least one character per emitted piece,
//! so recursion depth is bounded by `len(text) / chunk_size` in the worst
//! case. The splitter cannot fail on well-formed input.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::chunk::char_len;
use crate::separator::{SeparatorSet, SeparatorSpec};
use crate::{Result, SplitConfig};

static TRAILING_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("static pattern"));
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("static pattern"));

/// A raw splitter output: content plus overlap and offset bookkeeping,
/// before being wrapped in [`TextChunk`](crate::TextChunk) by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    /// The chunk text.
    pub content: String,
    /// Tail of the previous chunk, when overlap is configured.
    pub overlap_content: Option<String>,
    /// Absolute character offset in the (normalized) source text, when
    /// offset tracking is enabled.
    pub start_index: Option<usize>,
}

/// Recursive character splitter.
///
/// ## Example
///
/// ```rust
/// use stratus::{RecursiveSplitter, SeparatorSpec, SplitConfig};
///
/// let config = SplitConfig::new(20)?.with_overlap(5).with_min_chunk_size(1);
/// let spec = SeparatorSpec::literal(["。", "！", "？", " "]);
/// let splitter = RecursiveSplitter::new(config, &spec)?;
///
/// let chunks = splitter.split("第一段。第二段！第三段？");
/// assert!(!chunks.is_empty());
/// # Ok::<(), stratus::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    config: SplitConfig,
    separators: SeparatorSet,
}

impl RecursiveSplitter {
    /// Create a splitter, resolving the separator spec.
    ///
    /// # Errors
    ///
    /// Propagates separator-resolution failures
    /// ([`Error::InvalidSeparatorPattern`](crate::Error::InvalidSeparatorPattern)).
    pub fn new(config: SplitConfig, spec: &SeparatorSpec) -> Result<Self> {
        Ok(Self {
            config,
            separators: spec.resolve()?,
        })
    }

    /// Create a splitter from an already-resolved separator set.
    #[must_use]
    pub fn with_separator_set(config: SplitConfig, separators: SeparatorSet) -> Self {
        Self { config, separators }
    }

    /// The splitter's configuration.
    #[must_use]
    pub const fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `text` into ordered raw chunks.
    ///
    /// Empty or whitespace-only input yields an empty list; any other input
    /// yields at least one chunk.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<RawChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let processed = if self.config.strip_whitespace() {
            normalize_whitespace(text)
        } else {
            text.to_string()
        };

        let pieces = self.split_recursive(&processed, 0);
        let pieces = self.merge_undersized(pieces);
        tracing::debug!(pieces = pieces.len(), chars = char_len(&processed), "split complete");

        self.assemble(pieces, &processed)
    }

    /// Recurse over the hierarchy starting at `sep_index`.
    fn split_recursive(&self, text: &str, sep_index: usize) -> Vec<String> {
        if char_len(text) <= self.config.chunk_size() {
            return vec![text.to_string()];
        }

        // Walk forward to the first separator that occurs in this text.
        // The input list is never mutated; each recursion level just starts
        // further along the hierarchy.
        let mut index = sep_index;
        let separator = loop {
            match self.separators.get(index) {
                None => return self.hard_split(text),
                Some(sep) if sep.is_terminal() => return self.hard_split(text),
                Some(sep) if sep.occurs_in(text) => break sep,
                Some(_) => index += 1,
            }
        };

        let parts = separator.split(text, self.separators.keep_separator());
        if parts.len() <= 1 {
            // Occurs but yields nothing to pack (e.g. only blank fragments).
            return self.split_recursive(text, index + 1);
        }

        let mut result = Vec::new();
        let mut buffer = String::new();
        let mut buffer_len = 0;

        for part in parts {
            let part_len = char_len(&part);

            // A piece that alone exceeds the target cannot be packed; it is
            // re-split with the next, finer separator before accumulation.
            if part_len > self.config.chunk_size() {
                if !buffer.is_empty() {
                    result.push(std::mem::take(&mut buffer));
                    buffer_len = 0;
                }
                result.extend(self.split_recursive(&part, index + 1));
                continue;
            }

            if buffer_len + part_len <= self.config.chunk_size() {
                buffer.push_str(&part);
                buffer_len += part_len;
            } else {
                if !buffer.is_empty() {
                    result.push(std::mem::take(&mut buffer));
                }
                buffer = part;
                buffer_len = part_len;
            }
        }

        if !buffer.is_empty() {
            result.push(buffer);
        }

        result
    }

    /// Split every `chunk_size` characters regardless of semantics. The
    /// guaranteed-terminating case once the hierarchy is exhausted.
    fn hard_split(&self, text: &str) -> Vec<String> {
        let size = self.config.chunk_size();
        let chars: Vec<char> = text.chars().collect();
        chars.chunks(size).map(|window| window.iter().collect()).collect()
    }

    /// Merge pieces below `min_chunk_size` into a neighbor. Content is
    /// never dropped: an undersized head absorbs the following piece, an
    /// undersized tail is appended to its predecessor, and a lone
    /// undersized piece is returned as-is.
    fn merge_undersized(&self, pieces: Vec<String>) -> Vec<String> {
        let min = self.config.min_chunk_size();
        let measure = |piece: &str| {
            if self.config.strip_whitespace() {
                char_len(piece.trim())
            } else {
                char_len(piece)
            }
        };

        let mut merged: Vec<String> = Vec::new();
        let mut head_needs_mass = false;

        for piece in pieces {
            let undersized = measure(&piece) < min;
            match merged.last_mut() {
                Some(prev) if undersized || head_needs_mass => {
                    prev.push_str(&piece);
                    head_needs_mass = measure(prev) < min;
                }
                _ => {
                    head_needs_mass = undersized;
                    merged.push(piece);
                }
            }
        }

        merged
    }

    /// Attach overlap and offsets, and trim chunk edges when configured.
    fn assemble(&self, pieces: Vec<String>, source: &str) -> Vec<RawChunk> {
        let mut chunks: Vec<RawChunk> = Vec::with_capacity(pieces.len());
        let mut cursor_byte = 0;
        let mut cursor_char = 0;

        for piece in pieces {
            let content = if self.config.strip_whitespace() {
                piece.trim().to_string()
            } else {
                piece
            };
            if content.is_empty() {
                continue;
            }

            let start_index = if self.config.add_start_index() {
                // Locate the content in the source from the current cursor.
                // O(n) per chunk, but chunks are typically few; mirrors the
                // offset semantics of discarded separators (their width is
                // consumed by the search).
                match source[cursor_byte..].find(&content) {
                    Some(found) => {
                        let start_char = cursor_char + char_len(&source[cursor_byte..cursor_byte + found]);
                        cursor_byte += found + content.len();
                        cursor_char = start_char + char_len(&content);
                        Some(start_char)
                    }
                    None => Some(cursor_char),
                }
            } else {
                None
            };

            let overlap_content = chunks
                .last()
                .and_then(|prev: &RawChunk| overlap_tail(&prev.content, self.config.chunk_overlap()));

            chunks.push(RawChunk {
                content,
                overlap_content,
                start_index,
            });
        }

        chunks
    }
}

/// Normalize line endings, drop trailing line whitespace, collapse runs of
/// blank lines, and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = TRAILING_WS.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// The trailing `overlap` characters of `prev`, clipped forward to the
/// nearest word boundary so the carried context does not start mid-word.
fn overlap_tail(prev: &str, overlap: usize) -> Option<String> {
    if overlap == 0 || prev.is_empty() {
        return None;
    }

    let total = char_len(prev);
    let take = overlap.min(total);
    let byte_start = prev
        .char_indices()
        .nth(total - take)
        .map_or(0, |(byte, _)| byte);

    // Nearest word bound at or after the raw cut point. UAX #29 puts a
    // bound at every CJK ideograph, so CJK tails keep their full width.
    let bound = prev
        .split_word_bound_indices()
        .map(|(byte, _)| byte)
        .find(|&byte| byte >= byte_start)
        .unwrap_or(byte_start);

    let tail = prev[bound..].trim_start();
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, overlap: usize, seps: &[&str]) -> RecursiveSplitter {
        let config = SplitConfig::new(chunk_size)
            .unwrap()
            .with_overlap(overlap)
            .with_min_chunk_size(1);
        RecursiveSplitter::new(config, &SeparatorSpec::literal(seps.iter().copied())).unwrap()
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let s = splitter(100, 10, &["\n\n", "。"]);
        let chunks = s.split("一段短文。");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "一段短文。");
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        let s = splitter(100, 10, &["\n\n"]);
        assert!(s.split("").is_empty());
        assert!(s.split("  \n\t ").is_empty());
    }

    #[test]
    fn respects_chunk_size_in_characters() {
        let s = splitter(20, 5, &["。", "！", "？", " "]);
        let chunks = s.split("第一段的内容在这里。第二段的内容在这里！第三段的内容在这里？");
        assert!((2..=3).contains(&chunks.len()), "got {} chunks", chunks.len());
        for chunk in &chunks {
            assert!(char_len(&chunk.content) <= 20);
        }
    }

    #[test]
    fn pieces_end_on_sentence_terminators() {
        let s = splitter(20, 5, &["。", "！", "？", " "]);
        let chunks = s.split("第一段的内容在这里。第二段的内容在这里！第三段的内容在这里？");
        for chunk in &chunks[..chunks.len() - 1] {
            let last = chunk.content.chars().next_back().unwrap();
            assert!("。！？".contains(last), "chunk ends with {last:?}");
        }
    }

    #[test]
    fn earlier_separator_wins_even_when_uneven() {
        // "\n\n" gives 6 + 44 chars; ". " would be more even. Structure wins.
        let s = splitter(30, 0, &["\n\n", ". ", " "]);
        let chunks = s.split("Short.\n\nA much longer paragraph. With two sentences.");
        assert!(chunks[0].content.starts_with("Short."));
    }

    #[test]
    fn oversized_piece_recurses_with_next_separator() {
        let s = splitter(15, 0, &["\n\n", " "]);
        let chunks = s.split("tiny\n\nthis second paragraph is far too long to fit");
        assert!(chunks.len() > 2);
        for chunk in &chunks {
            assert!(char_len(&chunk.content) <= 15);
        }
    }

    #[test]
    fn hard_split_when_no_separator_matches() {
        let s = splitter(10, 0, &["\n\n", " "]);
        let chunks = s.split(&"x".repeat(35));
        assert_eq!(chunks.len(), 4);
        assert_eq!(char_len(&chunks[0].content), 10);
        assert_eq!(char_len(&chunks[3].content), 5);
    }

    #[test]
    fn hard_split_counts_characters_not_bytes() {
        let s = splitter(10, 0, &[" "]);
        let chunks = s.split(&"界".repeat(25));
        assert_eq!(chunks.len(), 3);
        assert_eq!(char_len(&chunks[0].content), 10);
    }

    #[test]
    fn overlap_is_a_suffix_of_previous_chunk() {
        let s = splitter(20, 5, &["。", " "]);
        let chunks = s.split("第一段内容比较长一些。第二段内容也比较长一些。");
        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            if let Some(overlap) = &pair[1].overlap_content {
                assert!(pair[0].content.ends_with(overlap.as_str()), "{overlap:?} not a suffix");
                assert!(char_len(overlap) <= 5);
            }
        }
    }

    #[test]
    fn zero_overlap_means_no_overlap_content() {
        let s = splitter(10, 0, &[" "]);
        let chunks = s.split("one two three four five six seven");
        assert!(chunks.iter().all(|c| c.overlap_content.is_none()));
    }

    #[test]
    fn overlap_avoids_starting_mid_word() {
        let s = splitter(30, 8, &["\n\n"]);
        let chunks = s.split("alpha bravo charlie delta echo\n\nfoxtrot golf hotel india juliett");
        for pair in chunks.windows(2) {
            if let Some(overlap) = &pair[1].overlap_content {
                let first_word = overlap.unicode_words().next().unwrap_or("");
                assert!(
                    pair[0].content.unicode_words().any(|w| w == first_word),
                    "overlap {overlap:?} starts mid-word"
                );
            }
        }
    }

    #[test]
    fn start_indices_are_monotonic_from_zero() {
        let config = SplitConfig::new(20)
            .unwrap()
            .with_overlap(0)
            .with_min_chunk_size(1)
            .with_start_index(true);
        let s = RecursiveSplitter::new(config, &SeparatorSpec::literal(["。", " "])).unwrap();
        let chunks = s.split("第一句话的内容在这里。第二句话的内容在这里。第三句话的内容在这里。");

        assert_eq!(chunks[0].start_index, Some(0));
        let mut last = 0;
        for chunk in &chunks {
            let start = chunk.start_index.expect("offsets enabled");
            assert!(start >= last, "offset went backwards");
            last = start;
        }
    }

    #[test]
    fn undersized_chunks_merge_into_previous() {
        let config = SplitConfig::new(30)
            .unwrap()
            .with_overlap(0)
            .with_min_chunk_size(10);
        let s = RecursiveSplitter::new(config, &SeparatorSpec::literal(["\n\n"])).unwrap();
        // The trailing 2-char fragment cannot be packed (the first piece
        // fills the buffer exactly); it must merge into its predecessor
        // instead of vanishing.
        let chunks = s.split("This paragraph has 28 chars.\n\nok");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.ends_with("ok"));
    }

    #[test]
    fn whitespace_normalization_applies() {
        let s = splitter(100, 0, &["\n\n"]);
        let chunks = s.split("line one   \r\nline two\n\n\n\n\nline three");
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].content.contains('\r'));
        assert!(!chunks[0].content.contains("\n\n\n"));
    }

    #[test]
    fn keep_separator_false_discards_delimiters() {
        let config = SplitConfig::new(10).unwrap().with_overlap(0).with_min_chunk_size(1);
        let spec = SeparatorSpec::literal(["。"]).with_keep_separator(false);
        let s = RecursiveSplitter::new(config, &spec).unwrap();
        let chunks = s.split("第一句内容很长。第二句内容很长。");
        assert!(chunks.iter().all(|c| !c.content.contains('。')));
    }

    #[test]
    fn regex_separator_splits_on_pattern() {
        let config = SplitConfig::new(25).unwrap().with_overlap(0).with_min_chunk_size(1);
        let spec = SeparatorSpec::pattern([r"步骤\s*\d+[:：]?"]);
        let s = RecursiveSplitter::new(config, &spec).unwrap();
        let chunks = s.split("步骤1 打开检修盖板并固定 步骤2 断开液压管路接头 步骤3 检查密封圈状态");
        assert!(chunks.len() >= 2);
    }
}
