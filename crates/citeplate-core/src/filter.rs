//! The filter registry: named, pure text transforms applied with pipe syntax.
//!
//! `{{title|titleword|lowercase}}` stringifies `title`, then applies
//! `titleword`, then `lowercase`. The set of filters is fixed; names are
//! resolved once, when the template is parsed, so an unknown name is a syntax
//! error rather than a silent no-op.
//!
//! # Registered filters
//!
//! - `uppercase`, `lowercase` -- ASCII case folding of the whole string
//! - `capitalize` -- uppercase the first letter of each word, lowercase the rest
//! - `titleword` -- first significant word (>= 4 chars, not a stop word)
//! - `abbrN` -- first `N` characters, e.g. `abbr1`, `abbr3`
//!
//! Case folding is ASCII-only: letters outside ASCII pass through unchanged.

use std::fmt;

/// Words `titleword` skips over when looking for a significant word.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "of", "in", "on", "and", "or", "for", "to", "with", "at", "by", "from",
    "as", "is", "into", "about", "over", "under", "this", "that", "its",
];

/// Minimum length (in characters) of a word `titleword` will pick.
const TITLE_WORD_MIN_LEN: usize = 4;

/// Fixed-name filters, in the order they are listed to users.
const NAMED: &[(&str, Filter)] = &[
    ("uppercase", Filter::Uppercase),
    ("lowercase", Filter::Lowercase),
    ("capitalize", Filter::Capitalize),
    ("titleword", Filter::TitleWord),
];

/// Prefix of the parameterized abbreviation filter.
const ABBR_PREFIX: &str = "abbr";

/// A filter resolved from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Uppercase,
    Lowercase,
    Capitalize,
    TitleWord,
    /// `abbrN`: keep the first `N` characters (`N >= 1`).
    Abbr(usize),
}

impl Filter {
    /// Look up a filter by its template name.
    ///
    /// ```
    /// use citeplate_core::Filter;
    ///
    /// assert_eq!(Filter::from_name("uppercase"), Some(Filter::Uppercase));
    /// assert_eq!(Filter::from_name("abbr3"), Some(Filter::Abbr(3)));
    /// assert_eq!(Filter::from_name("frobnicate"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Filter> {
        if let Some((_, filter)) = NAMED.iter().find(|(n, _)| *n == name) {
            return Some(*filter);
        }
        let digits = name.strip_prefix(ABBR_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.parse::<usize>() {
            Ok(n) if n >= 1 => Some(Filter::Abbr(n)),
            _ => None,
        }
    }

    /// Names accepted by [`Filter::from_name`], with `abbrN` shown as a pattern.
    pub fn names() -> Vec<&'static str> {
        NAMED
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once("abbrN"))
            .collect()
    }

    /// Apply this filter to `input`.
    pub fn apply(&self, input: &str) -> String {
        match self {
            Filter::Uppercase => input.to_ascii_uppercase(),
            Filter::Lowercase => input.to_ascii_lowercase(),
            Filter::Capitalize => capitalize(input),
            Filter::TitleWord => title_word(input),
            Filter::Abbr(n) => input.chars().take(*n).collect(),
        }
    }
}

impl fmt::Display for Filter {
    /// The name this filter is written as in a template.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Uppercase => f.write_str("uppercase"),
            Filter::Lowercase => f.write_str("lowercase"),
            Filter::Capitalize => f.write_str("capitalize"),
            Filter::TitleWord => f.write_str("titleword"),
            Filter::Abbr(n) => write!(f, "{ABBR_PREFIX}{n}"),
        }
    }
}

/// Apply a filter chain left to right.
pub fn apply_all(filters: &[Filter], input: String) -> String {
    filters
        .iter()
        .fold(input, |acc, filter| filter.apply(&acc))
}

/// Title-case every whitespace-delimited word, leaving the whitespace itself intact.
fn capitalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// First word of at least [`TITLE_WORD_MIN_LEN`] characters that is not a stop
/// word, falling back to the first word. Punctuation around words is dropped so
/// `"Learning:"` yields `"Learning"`.
fn title_word(input: &str) -> String {
    let words: Vec<&str> = input
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    words
        .iter()
        .find(|w| w.chars().count() >= TITLE_WORD_MIN_LEN && !is_stop_word(w))
        .or_else(|| words.first())
        .map(|w| w.to_string())
        .unwrap_or_default()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}
