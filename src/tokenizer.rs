//! Word segmentation for natural-language questions.
//!
//! The rule compiler never looks at raw characters for its token rules; it
//! consumes the lowercase word sequence a [`Tokenizer`] hands it. The default
//! [`WordTokenizer`] is built once through [`WordTokenizer::load`] and then
//! shared read-only. Tests substitute their own implementation.

use regex::Regex;
use thiserror::Error;

/// Splits text into an ordered sequence of lowercase word tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Failure to build the default tokenizer.
#[derive(Debug, Error)]
#[error("failed to initialise tokenizer: {0}")]
pub struct TokenizerError(#[from] regex::Error);

/// Words are runs of letters, digits and underscores; every other
/// non-space character (`>`, `=`, `?`) is a token of its own.
const WORD_PATTERN: &str = r"[\w']+|[^\w\s]";

/// Default tokenizer backed by a compiled regular expression.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    /// Compiles the word pattern. Call once and share the handle.
    pub fn load() -> Result<Self, TokenizerError> {
        Ok(WordTokenizer {
            pattern: Regex::new(WORD_PATTERN)?,
        })
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}
