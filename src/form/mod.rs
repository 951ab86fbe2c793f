//! Form field types, extraction, and canned explanations.

pub mod explain;
pub mod extractor;
pub mod field;

pub use extractor::FieldExtractor;
pub use field::{FormField, ScoredField};
