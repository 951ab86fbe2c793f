//! Form field data model.

use serde::{Deserialize, Serialize};

/// A named input slot on a form, paired with a human-readable explanation.
///
/// Labels are opaque free text from the vision API and are not unique
/// keys: lookups over them are case-insensitive substring matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub label: String,
    pub explanation: String,
    /// Set once per selected target language; `None` until translated
    /// (or when translation failed and the English text is shown as-is).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_explanation: Option<String>,
}

impl FormField {
    pub fn new(label: &str, explanation: &str) -> Self {
        Self {
            label: label.to_string(),
            explanation: explanation.to_string(),
            translated_explanation: None,
        }
    }

    /// The explanation to present: translated when available.
    pub fn display_explanation(&self) -> &str {
        self.translated_explanation
            .as_deref()
            .unwrap_or(&self.explanation)
    }
}

/// A field index paired with its relevance score for one query.
/// Discarded after the matcher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredField {
    pub index: usize,
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_explanation_prefers_translation() {
        let mut field = FormField::new("Name", "Your full legal name.");
        assert_eq!(field.display_explanation(), "Your full legal name.");

        field.translated_explanation = Some("आपका पूरा नाम।".to_string());
        assert_eq!(field.display_explanation(), "आपका पूरा नाम।");
    }

    #[test]
    fn test_serde_omits_missing_translation() {
        let field = FormField::new("Email", "Your email address.");
        let json = serde_json::to_string(&field).unwrap();
        assert!(!json.contains("translated_explanation"), "got: {}", json);
    }

    #[test]
    fn test_serde_roundtrip_with_translation() {
        let mut field = FormField::new("Email", "Your email address.");
        field.translated_explanation = Some("आपका ईमेल पता।".to_string());

        let json = serde_json::to_string(&field).unwrap();
        let back: FormField = serde_json::from_str(&json).unwrap();
        assert_eq!(field, back);
    }
}
