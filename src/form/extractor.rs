//! Field extraction with ordered fallback strategies.
//!
//! Extraction never fails outright: the vision API is tried first, then
//! pattern matching over extractable text, then a static default field
//! list. Each strategy returns a Result; an error or an empty result
//! moves on to the next strategy and is never propagated past the chain.

use crate::api::vision::FormParser;
use crate::error::Result;
use crate::form::explain;
use crate::form::field::FormField;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// An uploaded form file.
pub struct Upload<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
}

/// One way of turning an upload into a field list.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short name, reported to the user when this strategy was used.
    fn name(&self) -> &'static str;

    /// Extract fields from the upload. An empty list counts as failure.
    async fn extract(&self, upload: &Upload<'_>) -> Result<Vec<FormField>>;
}

/// Result of running the extraction chain.
pub struct Extraction {
    pub fields: Vec<FormField>,
    /// Name of the strategy that produced the fields.
    pub source: &'static str,
    /// Human-readable notes about strategies that failed along the way.
    pub warnings: Vec<String>,
}

/// Runs extraction strategies in order until one yields fields.
pub struct FieldExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl FieldExtractor {
    /// Build the standard chain: vision API, then text patterns, then
    /// static defaults.
    pub fn new(parser: Arc<dyn FormParser>) -> Self {
        Self {
            strategies: vec![
                Box::new(VisionApiStrategy { parser }),
                Box::new(TextPatternStrategy::new()),
                Box::new(StaticDefaultStrategy),
            ],
        }
    }

    /// Build a chain from explicit strategies (tests use this).
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run the chain. The static-default tail means this always produces
    /// at least one field for a standard chain.
    pub async fn extract(&self, upload: &Upload<'_>) -> Extraction {
        let mut warnings = Vec::new();

        for strategy in &self.strategies {
            match strategy.extract(upload).await {
                Ok(fields) if !fields.is_empty() => {
                    return Extraction {
                        fields,
                        source: strategy.name(),
                        warnings,
                    };
                }
                Ok(_) => {
                    warnings.push(format!("{}: no fields found", strategy.name()));
                }
                Err(e) => {
                    warnings.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        Extraction {
            fields: Vec::new(),
            source: "none",
            warnings,
        }
    }
}

/// Primary strategy: send the file to the vision/parsing API.
struct VisionApiStrategy {
    parser: Arc<dyn FormParser>,
}

#[async_trait]
impl ExtractionStrategy for VisionApiStrategy {
    fn name(&self) -> &'static str {
        "vision API"
    }

    async fn extract(&self, upload: &Upload<'_>) -> Result<Vec<FormField>> {
        let mut fields = self.parser.parse(upload.bytes, upload.filename).await?;
        // The API sometimes returns labels with empty descriptions;
        // backfill those from the canned table.
        for field in &mut fields {
            if field.explanation.trim().is_empty() {
                field.explanation = explain::explanation_for(&field.label).to_string();
            }
        }
        Ok(fields)
    }
}

/// Fallback strategy: scan UTF-8 text for label-shaped lines.
///
/// Catches text-exported PDFs and plain-text uploads. A label line is
/// either "Label:" (optionally followed by a blank-line ruling such as
/// underscores or dots) or "Label ______".
struct TextPatternStrategy {
    label_line: Regex,
}

impl TextPatternStrategy {
    fn new() -> Self {
        Self {
            // Capture text before a colon or a run of underscores/dots.
            // Hardcoded pattern, compiles.
            #[allow(clippy::expect_used)]
            label_line: Regex::new(r"^\s*([^:_.]{2,60}?)\s*(?::|_{3,}|\.{4,})\s*(?:_{3,}|\.{4,})?\s*$")
                .expect("hardcoded label pattern"),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for TextPatternStrategy {
    fn name(&self) -> &'static str {
        "text patterns"
    }

    async fn extract(&self, upload: &Upload<'_>) -> Result<Vec<FormField>> {
        let Ok(text) = std::str::from_utf8(upload.bytes) else {
            // Binary upload; nothing to scan.
            return Ok(Vec::new());
        };

        let mut fields = Vec::new();
        for line in text.lines() {
            if let Some(caps) = self.label_line.captures(line) {
                let label = caps[1].trim();
                if label.is_empty() {
                    continue;
                }
                // Skip lines that already carry the labels we found
                // (duplicate headers are common in scanned forms).
                if fields
                    .iter()
                    .any(|f: &FormField| f.label.eq_ignore_ascii_case(label))
                {
                    continue;
                }
                fields.push(FormField::new(label, explain::explanation_for(label)));
            }
        }
        Ok(fields)
    }
}

/// Field labels assumed when nothing could be extracted. These cover the
/// common sections of Indian government and bank forms.
const DEFAULT_LABELS: &[&str] = &[
    "Name",
    "Father's Name",
    "Date of Birth",
    "Gender",
    "Address",
    "Mobile Number",
    "Email",
    "Occupation",
    "Signature",
];

/// Last-resort strategy: a static default field list. Never fails.
struct StaticDefaultStrategy;

#[async_trait]
impl ExtractionStrategy for StaticDefaultStrategy {
    fn name(&self) -> &'static str {
        "default fields"
    }

    async fn extract(&self, _upload: &Upload<'_>) -> Result<Vec<FormField>> {
        Ok(DEFAULT_LABELS
            .iter()
            .map(|label| FormField::new(label, explain::explanation_for(label)))
            .collect())
    }
}
