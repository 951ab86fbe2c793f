//! Default configuration constants for formvani.
//!
//! Shared constants used across configuration types and the flow
//! controller, kept in one place to eliminate duplication.

use std::time::Duration;

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and keeps upload
/// payloads small for the hosted speech API.
pub const SAMPLE_RATE: u32 = 16000;

/// Duration of the spoken language-selection capture window.
///
/// Short utterances are unreliable for automatic language identification,
/// so the flow records a fixed 3-second window and then falls back to the
/// default language (see [`DEFAULT_LANGUAGE`]).
pub const LANGUAGE_CAPTURE: Duration = Duration::from_secs(3);

/// How long a targeted field match stays focused before the full field
/// list is restored.
pub const FIELD_RESTORE: Duration = Duration::from_secs(10);

/// Language selected when spoken language selection cannot identify one.
pub const DEFAULT_LANGUAGE: &str = "hi";

/// Language hint sent to the speech API when the spoken language is not
/// yet known. The API accepts this and reports what it detected.
pub const UNKNOWN_LANGUAGE_HINT: &str = "unknown";

/// Number of texts translated per outbound batch.
///
/// Bounds parallel requests to the translation service; the original
/// deployment was rate-limited around 5 concurrent calls.
pub const TRANSLATION_BATCH_SIZE: usize = 4;

/// Maximum attempts for a single API request, including the first.
pub const HTTP_MAX_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts; doubled after each failure.
pub const HTTP_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Per-request timeout for all external API calls.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// Relevance matcher weights. The scoring tests pin the exact ordering
// these produce; change with care.

/// Awarded when the query contains the whole field label.
pub const SCORE_LABEL_SUBSTRING: i32 = 100;

/// Awarded per label word found inside the query.
pub const SCORE_LABEL_WORD: i32 = 50;

/// Awarded per query word found inside the label.
pub const SCORE_QUERY_WORD: i32 = 25;

/// Awarded when a domain-key synonym links query and label.
pub const SCORE_SYNONYM: i32 = 75;

/// Words this short are too ambiguous to count for word-level matching.
pub const MIN_MATCH_WORD_LEN: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_substring_outweighs_word_hits() {
        // A full-label hit must beat a single word hit plus a query-word hit,
        // otherwise exact mentions lose to partial overlaps.
        assert!(SCORE_LABEL_SUBSTRING > SCORE_LABEL_WORD + SCORE_QUERY_WORD);
    }

    #[test]
    fn batch_size_within_rate_limit() {
        assert!((3..=5).contains(&TRANSLATION_BATCH_SIZE));
    }
}
