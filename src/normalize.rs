//! Text normalization.
//!
//! Extracted bodies are full of layout artifacts: hard line breaks, spaces before periods,
//! runs of dots from tables of contents. [normalize] turns them into a single line of
//! `". "`-separated sentences.
//!
//! ```
//! use cellar_corpus::normalize::normalize;
//!
//! assert_eq!(
//!     normalize("Hello   world . . .  Next sentence.."),
//!     "Hello world. Next sentence."
//! );
//! ```
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SPACES: Regex = Regex::new(" +").unwrap();
    static ref PERIOD: Regex = Regex::new(" *[.] *").unwrap();
    static ref PERIODS: Regex = Regex::new(r"\.(\s*\.)+").unwrap();
}

/// Normalize extracted text.
///
/// Sentences are split on periods, trimmed and rejoined with `". "`, empty ones are dropped.
/// A terminal period is kept if the text ended with one.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace('\n', " ");
    let text = text.replace(" .", ".");
    let text = SPACES.replace_all(&text, " ");
    let text = PERIOD.replace_all(&text, ". ");
    let text = PERIODS.replace_all(&text, ". ");

    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect();

    if sentences.is_empty() {
        return String::new();
    }

    let mut normalized = sentences.join(". ");
    if text.trim_end().ends_with('.') {
        normalized.push('.');
    }
    normalized
}
