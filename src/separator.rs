//! Separator hierarchy resolution.
//!
//! The recursive splitter works through an ordered list of delimiters,
//! coarsest first: a chapter marker is a better split point than a
//! sentence boundary, which beats a comma, which beats a space. This
//! module turns caller configuration into that list.
//!
//! ## The hierarchy
//!
//! The default hierarchy targets bilingual (zh/en) technical documents:
//!
//! ```text
//! "\n\n"                          paragraph breaks
//! "\n第" "\n章" "\n节" "\n条"      CJK chapter/section/article markers
//! "\nChapter" "\nSection" ...     English structural markers
//! "\n\n•" "\n\n-" "\n\n*"         list openers
//! "\n"                            line breaks
//! "。" "！" "？" "." "!" "?"       sentence terminators
//! "；" ";" "，" ","                clause punctuation
//! " " "\t"                        whitespace
//! "、" "：" ":"                    ideographic enumeration / colons
//! ""                              terminal fallback: every character
//! ```
//!
//! The empty string is always present as the last entry; it guarantees the
//! splitter can make progress on any input, which is what makes the
//! recursion provably terminate.
//!
//! ## Literal vs pattern separators
//!
//! Callers may mark their separators as regular expressions
//! (`is_separator_regex`). Patterns are compiled once, here, so a bad
//! pattern fails at configuration time with
//! [`Error::InvalidSeparatorPattern`] — never mid-split.

use regex::Regex;

use crate::{Error, Result};

/// Default delimiter hierarchy for bilingual technical prose.
pub const DEFAULT_SEPARATORS: &[&str] = &[
    "\n\n",
    "\n第",
    "\n章",
    "\n节",
    "\n条",
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

/// Caller-facing separator configuration, prior to resolution.
///
/// ## Example
///
/// ```rust
/// use stratus::SeparatorSpec;
///
/// // Literal sentence terminators for CJK prose
/// let spec = SeparatorSpec::literal(["。", "！", "？", " "]);
/// let set = spec.resolve()?;
/// assert!(set.len() >= 4); // terminal "" is appended automatically
/// # Ok::<(), stratus::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorSpec {
    /// Ordered delimiter entries, most structurally significant first.
    /// An empty list means "use [`DEFAULT_SEPARATORS`]".
    pub separators: Vec<String>,
    /// Interpret each entry as a regular expression instead of literal text.
    pub is_separator_regex: bool,
    /// Reattach matched delimiter text to the piece that precedes it, so
    /// no delimiter text is lost from the output.
    pub keep_separator: bool,
}

impl Default for SeparatorSpec {
    fn default() -> Self {
        Self {
            separators: Vec::new(),
            is_separator_regex: false,
            keep_separator: true,
        }
    }
}

impl SeparatorSpec {
    /// Literal separators in the given order.
    #[must_use]
    pub fn literal<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Pattern separators in the given order; each entry must compile as a
    /// regular expression when resolved.
    #[must_use]
    pub fn pattern<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
            is_separator_regex: true,
            ..Self::default()
        }
    }

    /// Keep or discard matched delimiter text.
    #[must_use]
    pub fn with_keep_separator(mut self, keep: bool) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Resolve the spec into an ordered, validated [`SeparatorSet`].
    ///
    /// An empty entry list resolves to [`DEFAULT_SEPARATORS`]. The terminal
    /// empty-string fallback is appended when missing, so the returned set
    /// is never empty and always terminates the splitter's recursion.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeparatorPattern`] when `is_separator_regex` is set
    /// and an entry fails to compile.
    pub fn resolve(&self) -> Result<SeparatorSet> {
        let entries: Vec<String> = if self.separators.is_empty() {
            DEFAULT_SEPARATORS.iter().map(|s| (*s).to_string()).collect()
        } else {
            self.separators.clone()
        };

        let mut separators = Vec::with_capacity(entries.len() + 1);
        for entry in &entries {
            if entry.is_empty() || !self.is_separator_regex {
                separators.push(Separator::Literal(entry.clone()));
            } else {
                let regex = Regex::new(entry).map_err(|source| Error::InvalidSeparatorPattern {
                    pattern: entry.clone(),
                    source,
                })?;
                separators.push(Separator::Pattern(regex));
            }
        }

        if !separators.last().is_some_and(Separator::is_terminal) {
            separators.push(Separator::Literal(String::new()));
        }

        Ok(SeparatorSet {
            separators,
            keep_separator: self.keep_separator,
        })
    }
}

/// A single resolved delimiter.
#[derive(Debug, Clone)]
pub enum Separator {
    /// Split on exact text. The empty string means "split every character".
    Literal(String),
    /// Split on regex matches.
    Pattern(Regex),
}

impl Separator {
    /// Whether this is the terminal split-every-character fallback.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Literal(lit) if lit.is_empty())
    }

    /// Whether the delimiter occurs in `text` at all.
    #[must_use]
    pub fn occurs_in(&self, text: &str) -> bool {
        match self {
            Self::Literal(lit) => lit.is_empty() || text.contains(lit.as_str()),
            Self::Pattern(re) => re.find(text).is_some_and(|m| !m.is_empty()),
        }
    }

    /// Split `text` into pieces. With `keep`, matched delimiter text is
    /// reattached to the preceding piece; otherwise it is discarded.
    /// Whitespace-only pieces are dropped either way — the splitter's merge
    /// step re-inserts separator text, not blank fragments.
    #[must_use]
    pub fn split(&self, text: &str, keep: bool) -> Vec<String> {
        match self {
            Self::Literal(lit) if lit.is_empty() => text.chars().map(String::from).collect(),
            Self::Literal(lit) => {
                let mut pieces = Vec::new();
                let raw: Vec<&str> = text.split(lit.as_str()).collect();
                let last = raw.len() - 1;
                for (i, piece) in raw.iter().enumerate() {
                    let owned = if keep && i < last {
                        format!("{piece}{lit}")
                    } else {
                        (*piece).to_string()
                    };
                    if !owned.trim().is_empty() {
                        pieces.push(owned);
                    }
                }
                pieces
            }
            Self::Pattern(re) => {
                let mut pieces = Vec::new();
                let mut cursor = 0;
                for m in re.find_iter(text) {
                    if m.is_empty() {
                        // Zero-width matches cannot make progress.
                        break;
                    }
                    let end = if keep { m.end() } else { m.start() };
                    let piece = &text[cursor..end];
                    if !piece.trim().is_empty() {
                        pieces.push(piece.to_string());
                    }
                    cursor = m.end();
                }
                let tail = &text[cursor..];
                if !tail.trim().is_empty() {
                    pieces.push(tail.to_string());
                }
                pieces
            }
        }
    }
}

/// An ordered, validated delimiter hierarchy.
#[derive(Debug, Clone)]
pub struct SeparatorSet {
    separators: Vec<Separator>,
    keep_separator: bool,
}

impl SeparatorSet {
    /// Number of delimiters, terminal fallback included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.separators.len()
    }

    /// Always `false`: resolution guarantees at least the terminal entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The delimiter at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Separator> {
        self.separators.get(index)
    }

    /// Whether matched delimiter text is reattached to emitted pieces.
    #[must_use]
    pub const fn keep_separator(&self) -> bool {
        self.keep_separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_resolves_to_defaults() {
        let set = SeparatorSpec::default().resolve().unwrap();
        assert_eq!(set.len(), DEFAULT_SEPARATORS.len());
        assert!(set.get(set.len() - 1).unwrap().is_terminal());
    }

    #[test]
    fn terminal_fallback_is_appended() {
        let set = SeparatorSpec::literal(["。", "！"]).resolve().unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.get(2).unwrap().is_terminal());
    }

    #[test]
    fn terminal_fallback_not_duplicated() {
        let set = SeparatorSpec::literal(["。", ""]).resolve().unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn invalid_pattern_fails_at_resolution() {
        let err = SeparatorSpec::pattern(["[unclosed"]).resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidSeparatorPattern { .. }));
    }

    #[test]
    fn literal_split_keeps_separator_on_preceding_piece() {
        let sep = Separator::Literal("。".to_string());
        let pieces = sep.split("第一段。第二段。", true);
        assert_eq!(pieces, vec!["第一段。", "第二段。"]);
    }

    #[test]
    fn literal_split_can_discard_separator() {
        let sep = Separator::Literal("。".to_string());
        let pieces = sep.split("第一段。第二段。", false);
        assert_eq!(pieces, vec!["第一段", "第二段"]);
    }

    #[test]
    fn pattern_split_reattaches_match() {
        let sep = Separator::Pattern(Regex::new(r"\d+\.").unwrap());
        let pieces = sep.split("intro 1. first 2. second", true);
        assert_eq!(pieces, vec!["intro 1.", " first 2.", " second"]);
    }

    #[test]
    fn empty_separator_splits_every_character() {
        let sep = Separator::Literal(String::new());
        assert_eq!(sep.split("ab界", true), vec!["a", "b", "界"]);
    }

    #[test]
    fn occurs_in_respects_literal_and_pattern() {
        assert!(Separator::Literal("\n\n".into()).occurs_in("a\n\nb"));
        assert!(!Separator::Literal("\n\n".into()).occurs_in("a\nb"));
        assert!(Separator::Pattern(Regex::new("第.章").unwrap()).occurs_in("第一章 概述"));
    }

    #[test]
    fn whitespace_only_pieces_are_dropped() {
        let sep = Separator::Literal("\n".to_string());
        let pieces = sep.split("a\n \nb", false);
        assert_eq!(pieces, vec!["a", "b"]);
    }
}
