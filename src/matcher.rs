//! Query-to-field relevance matching.
//!
//! Scores each extracted field against a transcribed voice query with a
//! fixed-weight heuristic and picks the best one, or classifies the query
//! as a general question about the form. Pure functions: no side effects,
//! same inputs always produce the same outcome.

use crate::defaults::{
    MIN_MATCH_WORD_LEN, SCORE_LABEL_SUBSTRING, SCORE_LABEL_WORD, SCORE_QUERY_WORD, SCORE_SYNONYM,
};
use crate::form::field::{FormField, ScoredField};
use regex::Regex;
use std::sync::LazyLock;

/// Outcome of matching one query against the current field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMatch {
    /// Index into the field list passed to the matcher.
    Field(usize),
    /// No field matched, but the query asks about the form as a whole.
    General,
    /// No field matched and the query was not understood.
    Unrecognized,
}

/// Domain keys and their spoken synonyms. A field whose label contains
/// the key scores when the query contains any synonym, which catches
/// queries phrased in Hindi or Hinglish ("naam kya hai") against English
/// labels ("Name").
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "name",
        &["naam", "nam", "नाम", "kaun", "कौन"],
    ),
    (
        "address",
        &["pata", "पता", "thikana", "ठिकाना", "ghar", "घर"],
    ),
    (
        "mobile",
        &["phone", "fon", "मोबाइल", "फोन", "फ़ोन", "number", "नंबर"],
    ),
    (
        "email",
        &["mail", "imel", "ईमेल", "मेल"],
    ),
    (
        "date",
        &["tareekh", "तारीख", "dinank", "दिनांक", "janam", "जन्म", "birth"],
    ),
    (
        "gender",
        &["ling", "लिंग", "male", "female", "stri", "स्त्री", "purush", "पुरुष"],
    ),
    (
        "occupation",
        &["kaam", "काम", "job", "work", "naukri", "नौकरी", "vyavsay", "व्यवसाय"],
    ),
];

/// Phrasings of "what is this form" in English, Hindi, and Hinglish.
static GENERAL_QUESTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)what\s+is\s+this\s+form",
        r"(?i)what.*form.*(for|about)",
        r"(?i)about\s+(this|the)\s+form",
        r"(?i)(yeh|ye|is)\s+form\s+(kya|kis)",
        r"(?i)form\s+(kya|kis)\s+(hai|liye)",
        r"(?i)form\s+ke\s+bare",
        r"इस\s*फॉर्म",
        r"यह\s*फॉर्म",
        r"फॉर्म\s*(क्या|किस|के\s*बारे)",
    ]
    .iter()
    // Hardcoded patterns, verified by the tests below.
    .map(|p| {
        #[allow(clippy::expect_used)]
        Regex::new(p).expect("hardcoded general-question pattern")
    })
    .collect()
});

/// Score one field against a query. Both are lowercased by the caller.
fn score_field(query: &str, label: &str) -> i32 {
    let mut score = 0;

    // Whole label mentioned verbatim.
    if query.contains(label) {
        score += SCORE_LABEL_SUBSTRING;
    }

    // Label words appearing in the query.
    for word in label.split_whitespace() {
        if word.chars().count() >= MIN_MATCH_WORD_LEN && query.contains(word) {
            score += SCORE_LABEL_WORD;
        }
    }

    // Query words appearing in the label.
    for word in query.split_whitespace() {
        if word.chars().count() >= MIN_MATCH_WORD_LEN && label.contains(word) {
            score += SCORE_QUERY_WORD;
        }
    }

    // Domain-key synonym bridge (each key contributes at most once).
    for (key, synonyms) in SYNONYMS {
        if label.contains(key) && synonyms.iter().any(|s| query.contains(s)) {
            score += SCORE_SYNONYM;
        }
    }

    score
}

/// Rank all fields against the query, best first.
///
/// The sort is stable: fields with equal scores keep their original
/// order, so ties resolve to the field listed first.
pub fn rank_fields(query: &str, fields: &[FormField]) -> Vec<ScoredField> {
    let query = query.to_lowercase();
    let mut scored: Vec<ScoredField> = fields
        .iter()
        .enumerate()
        .map(|(index, field)| ScoredField {
            index,
            score: score_field(&query, &field.label.to_lowercase()),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Is this a question about the form as a whole?
pub fn is_general_question(query: &str) -> bool {
    GENERAL_QUESTION_PATTERNS.iter().any(|p| p.is_match(query))
}

/// Match a transcribed query against the extracted fields.
///
/// Returns the best-scoring field only when its score is strictly
/// positive; otherwise classifies the query as general or unrecognized.
pub fn match_query(query: &str, fields: &[FormField]) -> QueryMatch {
    let best = rank_fields(query, fields).into_iter().next();

    match best {
        Some(sf) if sf.score > 0 => QueryMatch::Field(sf.index),
        _ => {
            if is_general_question(query) {
                QueryMatch::General
            } else {
                QueryMatch::Unrecognized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(labels: &[&str]) -> Vec<FormField> {
        labels.iter().map(|l| FormField::new(l, "")).collect()
    }

    #[test]
    fn test_exact_label_in_query_matches_that_field() {
        let fields = fields(&["Name", "Address", "Email"]);
        for (i, label) in ["name", "address", "email"].iter().enumerate() {
            let query = format!("please tell me about the {} field", label);
            assert_eq!(
                match_query(&query, &fields),
                QueryMatch::Field(i),
                "query: {}",
                query
            );
        }
    }

    #[test]
    fn test_address_question_finds_address_field() {
        let fields = fields(&["Name", "Address"]);
        let result = match_query("what is the address field", &fields);
        assert_eq!(result, QueryMatch::Field(1));

        // Substring hit alone is already worth at least 100.
        let ranked = rank_fields("what is the address field", &fields);
        assert!(ranked[0].score >= 100);
    }

    #[test]
    fn test_synonym_does_not_cross_fields() {
        // "naam" is a synonym for "name"; it must not match "Mobile".
        let fields = fields(&["Mobile"]);
        assert_eq!(match_query("naam kya hai", &fields), QueryMatch::Unrecognized);
    }

    #[test]
    fn test_synonym_bridges_hindi_query_to_english_label() {
        let fields = fields(&["Name", "Occupation"]);
        assert_eq!(match_query("naam kya hai", &fields), QueryMatch::Field(0));
        assert_eq!(
            match_query("yahan kaam ke bare mein kya likhna hai", &fields),
            QueryMatch::Field(1)
        );
    }

    #[test]
    fn test_devanagari_synonym_matches() {
        let fields = fields(&["Address", "Mobile Number"]);
        assert_eq!(match_query("पता कहाँ लिखें", &fields), QueryMatch::Field(0));
        assert_eq!(match_query("मोबाइल कहाँ लिखें", &fields), QueryMatch::Field(1));
    }

    #[test]
    fn test_no_overlap_means_no_match() {
        let fields = fields(&["Name", "Address"]);
        assert_eq!(match_query("xyzzy plugh", &fields), QueryMatch::Unrecognized);
    }

    #[test]
    fn test_empty_field_list_never_matches() {
        assert_eq!(match_query("what is the name field", &[]), QueryMatch::Unrecognized);
        assert_eq!(match_query("what is this form", &[]), QueryMatch::General);
    }

    #[test]
    fn test_tie_breaks_to_first_listed_field() {
        // Both labels contain "number"; word scores are identical.
        let fields = fields(&["Account Number", "Reference Number"]);
        let ranked = rank_fields("where do i write the number", &fields);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].index, 0);
        assert_eq!(
            match_query("where do i write the number", &fields),
            QueryMatch::Field(0)
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let fields = fields(&["EMAIL"]);
        assert_eq!(match_query("Where Do I Write My Email?", &fields), QueryMatch::Field(0));
    }

    #[test]
    fn test_short_words_do_not_score() {
        // "of" (label word) and "is"/"my" (query words) are below the
        // length threshold and must not create phantom matches.
        let fields = fields(&["Of No"]);
        assert_eq!(match_query("is my", &fields), QueryMatch::Unrecognized);
    }

    #[test]
    fn test_general_question_english() {
        let fields = fields(&["Name"]);
        assert_eq!(match_query("what is this form", &fields), QueryMatch::General);
        assert_eq!(
            match_query("tell me what this form is for", &fields),
            QueryMatch::General
        );
    }

    #[test]
    fn test_general_question_hindi() {
        let fields = fields(&["Name"]);
        assert_eq!(
            match_query("इस फॉर्म के बारे में बताओ", &fields),
            QueryMatch::General
        );
        assert_eq!(match_query("yeh form kya hai", &fields), QueryMatch::General);
    }

    #[test]
    fn test_field_match_takes_priority_over_general_pattern() {
        // A query can both name a field and sound general; a positive
        // field score wins.
        let fields = fields(&["Name"]);
        assert_eq!(
            match_query("what is this form asking for in name", &fields),
            QueryMatch::Field(0)
        );
    }

    #[test]
    fn test_scoring_weights_compose() {
        // Label "Mobile Number": query mentions the full label (100),
        // both label words (2 × 50), and both appear as query words in
        // the label (2 × 25), plus the "mobile" synonym key ("number" is
        // in its synonym list) for 75.
        let ranked = rank_fields("mobile number", &[FormField::new("Mobile Number", "")]);
        assert_eq!(ranked[0].score, 100 + 2 * 50 + 2 * 25 + 75);
    }

    #[test]
    fn test_rank_is_pure() {
        let fields = fields(&["Name", "Address"]);
        let a = rank_fields("address please", &fields);
        let b = rank_fields("address please", &fields);
        assert_eq!(a, b);
    }
}
