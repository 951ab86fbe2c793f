//! Canned English explanations for common form field labels.
//!
//! The vision API returns labels but often no usable description, so
//! explanations come from a static table keyed by case-insensitive
//! substring match. First matching entry wins; table order goes from
//! specific to generic for that reason.

/// (label substring, explanation) pairs, tried in order.
const EXPLANATIONS: &[(&str, &str)] = &[
    (
        "father",
        "Write your father's full name as it appears on his identity documents.",
    ),
    (
        "mother",
        "Write your mother's full name as it appears on her identity documents.",
    ),
    (
        "full name",
        "Write your complete name: first name, middle name if any, and surname.",
    ),
    (
        "name",
        "Write your name exactly as it appears on your identity documents.",
    ),
    (
        "permanent address",
        "Write the address of your permanent home, even if you currently live elsewhere.",
    ),
    (
        "address",
        "Write your house number, street, village or city, district, state, and PIN code.",
    ),
    (
        "mobile",
        "Write your 10-digit mobile phone number. You may receive a verification message on it.",
    ),
    (
        "phone",
        "Write a phone number where you can be reached, with the area code if it is a landline.",
    ),
    (
        "email",
        "Write your email address, for example name@example.com. Leave blank if you have none.",
    ),
    (
        "date of birth",
        "Write the day, month, and year you were born, as on your birth certificate.",
    ),
    (
        "date",
        "Write the date in day/month/year order unless the form says otherwise.",
    ),
    (
        "gender",
        "Tick or write your gender: male, female, or other.",
    ),
    (
        "occupation",
        "Write what you do for work, for example farmer, teacher, student, or homemaker.",
    ),
    (
        "aadhaar",
        "Write your 12-digit Aadhaar number from your Aadhaar card.",
    ),
    (
        "pan",
        "Write your 10-character PAN from your PAN card, for example ABCDE1234F.",
    ),
    (
        "pin",
        "Write the 6-digit postal PIN code of your area.",
    ),
    (
        "signature",
        "Sign here the same way you sign official documents. Do not print your name.",
    ),
    (
        "nationality",
        "Write the country you are a citizen of, for example Indian.",
    ),
    (
        "age",
        "Write your age in completed years as of today.",
    ),
    (
        "income",
        "Write your yearly income before taxes, in rupees.",
    ),
];

/// Shown when no table entry matches the label.
const GENERIC_EXPLANATION: &str =
    "Fill in the information this field asks for. If you are unsure, ask the office that issued the form.";

/// Answer to general questions about the form as a whole.
pub const FORM_OVERVIEW: &str =
    "This form asks for your personal details. Fill each field one by one, \
     and ask about any field you do not understand.";

/// Look up the canned explanation for a field label.
pub fn explanation_for(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    EXPLANATIONS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, text)| *text)
        .unwrap_or(GENERIC_EXPLANATION)
}
