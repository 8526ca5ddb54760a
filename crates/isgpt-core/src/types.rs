//! Core types for isgpt

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Write as _;

/// Status text returned when the input has too few alphanumeric characters
pub fn need_more_text_status(min_chars: usize) -> String {
    format!("Please input more text (min {} characters)", min_chars)
}

/// Status text returned when no sentence could be scored
pub const NO_VALID_SENTENCES: &str = "No valid sentences found";

/// Authorship label. Serialized as the integer codes `0` (AI) and `1` (Human).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Ai,
    Human,
}

impl Label {
    /// Integer code used on the wire
    pub fn code(self) -> u8 {
        match self {
            Self::Ai => 0,
            Self::Human => 1,
        }
    }

    /// Tag used in marked text and plain-text output
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::Human => "Human",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Ai),
            1 => Ok(Self::Human),
            other => Err(de::Error::custom(format!("unknown label code {}", other))),
        }
    }
}

/// Scoring details for one segmented sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceDetail {
    /// Trimmed sentence text
    pub text: String,

    /// Perplexity of the sentence scored on its own
    pub perplexity: f64,

    /// Label derived from the sentence perplexity
    pub label: Label,

    /// Human-readable classification message
    pub classification: String,

    /// Calibrated confidence percentage in `[50, 100]`
    pub confidence: f64,
}

/// Outcome of one detection request.
///
/// Soft failures (too little text, nothing scorable) carry only `status` and
/// `message`; every score field stays empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Whole-document perplexity
    #[serde(rename = "Perplexity", default, skip_serializing_if = "Option::is_none")]
    pub perplexity: Option<f64>,

    /// Mean of the per-sentence perplexities
    #[serde(rename = "Perplexity_per_line", default, skip_serializing_if = "Option::is_none")]
    pub perplexity_per_line: Option<f64>,

    /// Maximum of the per-sentence perplexities
    #[serde(rename = "Burstiness", default, skip_serializing_if = "Option::is_none")]
    pub burstiness: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<SentenceDetail>,

    /// Sentences wrapped in `<AI>`/`<Human>` tags, joined by spaces
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub marked_text: String,

    /// Sentences whose scoring failed and were left out
    #[serde(skip)]
    pub skipped_sentences: usize,
}

impl DetectionResult {
    /// Create a soft-failure result carrying the same text as status and message
    pub fn soft_failure(status: impl Into<String>) -> Self {
        let status = status.into();
        Self {
            message: status.clone(),
            status: Some(status),
            ..Default::default()
        }
    }

    /// Whether this result is a soft failure with no scores
    pub fn is_soft_failure(&self) -> bool {
        self.status.is_some()
    }

    /// Render the plain-text summary: one line per sentence, then the overall message
    pub fn to_plain_text(&self) -> String {
        let mut output = String::new();
        for sentence in &self.sentences {
            let _ = writeln!(
                output,
                "{} <{}, {:.0}%>",
                sentence.text, sentence.label, sentence.confidence
            );
        }
        let _ = write!(output, "\n{}\n", self.message);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str, label: Label, confidence: f64) -> SentenceDetail {
        SentenceDetail {
            text: text.to_string(),
            perplexity: 42.0,
            label,
            classification: "msg".to_string(),
            confidence,
        }
    }

    #[test]
    fn test_label_wire_codes() {
        assert_eq!(serde_json::to_string(&Label::Ai).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Label::Human).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Label>("1").unwrap(), Label::Human);
        assert!(serde_json::from_str::<Label>("7").is_err());
    }

    #[test]
    fn test_soft_failure_omits_scores() {
        let result = DetectionResult::soft_failure(NO_VALID_SENTENCES);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], NO_VALID_SENTENCES);
        assert_eq!(json["message"], NO_VALID_SENTENCES);
        assert!(json.get("Perplexity").is_none());
        assert!(json.get("label").is_none());
        assert!(json.get("sentences").is_none());
        assert!(result.is_soft_failure());
    }

    #[test]
    fn test_field_names() {
        let result = DetectionResult {
            perplexity: Some(12.5),
            perplexity_per_line: Some(20.0),
            burstiness: Some(30.0),
            label: Some(Label::Ai),
            message: "The Text is generated by AI.".to_string(),
            sentences: vec![sentence("Hello there", Label::Ai, 75.0)],
            marked_text: "<AI>Hello there</AI>".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["Perplexity"], 12.5);
        assert_eq!(json["Perplexity_per_line"], 20.0);
        assert_eq!(json["Burstiness"], 30.0);
        assert_eq!(json["label"], 0);
        assert_eq!(json["sentences"][0]["classification"], "msg");
        assert!(json.get("status").is_none());
        assert!(json.get("skipped_sentences").is_none());
    }

    #[test]
    fn test_plain_text_rendering() {
        let result = DetectionResult {
            message: "The Text is written by Human.".to_string(),
            sentences: vec![
                sentence("First one", Label::Ai, 50.0),
                sentence("Second one", Label::Human, 87.4),
            ],
            ..Default::default()
        };

        assert_eq!(
            result.to_plain_text(),
            "First one <AI, 50%>\nSecond one <Human, 87%>\n\nThe Text is written by Human.\n"
        );
    }

    #[test]
    fn test_need_more_text_status() {
        assert_eq!(
            need_more_text_status(100),
            "Please input more text (min 100 characters)"
        );
    }
}
