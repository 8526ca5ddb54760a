//! Sentence and line segmentation

use isgpt_core::{Error, Result};
use regex::Regex;

/// Boundary: sentence punctuation followed by whitespace and an optional
/// opening bracket, or a newline with any leading whitespace of the next line.
const BOUNDARY_PATTERN: &str = r"(?:[.?!]\s+[\[\(]?)|(?:\n\s*)";

/// Splits text into sentence units
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    boundary: Regex,
}

impl SentenceSegmenter {
    /// Create a new segmenter
    pub fn new() -> Result<Self> {
        Ok(Self {
            boundary: Regex::new(BOUNDARY_PATTERN)
                .map_err(|e| Error::internal(format!("Failed to compile sentence regex: {}", e)))?,
        })
    }

    /// Split `text` into trimmed sentences, in order.
    ///
    /// Pieces without a single alphanumeric character are dropped, so no
    /// returned unit is empty or pure punctuation.
    pub fn segment<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.boundary
            .split(text)
            .map(str::trim)
            .filter(|piece| has_alphanumeric(piece))
            .collect()
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new().expect("Failed to create sentence segmenter")
    }
}

/// Whether `text` contains at least one ASCII letter or digit
pub fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Number of ASCII letters and digits in `text`
pub fn count_alphanumeric(text: &str) -> usize {
    text.chars().filter(char::is_ascii_alphanumeric).count()
}
