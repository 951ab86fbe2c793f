//! Per-conversation session state.
//!
//! One `Session` exists per interactive run. It records which step the
//! conversation is in, the extracted fields, and the chosen language.
//! All mutation goes through methods so the flow controller is the only
//! place transitions happen.

use crate::form::field::FormField;
use crate::lang::Language;
use std::fmt;

/// The five steps of the conversation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    /// Waiting for a form file.
    #[default]
    Upload,
    /// Fields extracted; waiting for a language choice.
    LanguageSelect,
    /// Showing the field list; waiting for a voice query.
    FieldList,
    /// Recording or transcribing a voice query.
    VoiceQuery,
    /// Showing the answer to the last query.
    Response,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Upload => "upload",
            Step::LanguageSelect => "language selection",
            Step::FieldList => "field list",
            Step::VoiceQuery => "voice query",
            Step::Response => "response",
        };
        write!(f, "{}", name)
    }
}

/// State for one conversation. Lives only in process memory.
#[derive(Default)]
pub struct Session {
    step: Step,
    filename: Option<String>,
    fields: Vec<FormField>,
    language: Option<Language>,
    /// Index of the field the last query matched. While set, the visible
    /// list shrinks to just that field until the restore timer fires.
    focused: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = Some(language);
    }

    /// All extracted fields, regardless of focus.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FormField] {
        &mut self.fields
    }

    pub fn set_fields(&mut self, filename: &str, fields: Vec<FormField>) {
        self.filename = Some(filename.to_string());
        self.fields = fields;
        self.focused = None;
    }

    /// The fields the user currently sees: the focused one after a
    /// targeted match, otherwise the full list.
    pub fn visible_fields(&self) -> Vec<&FormField> {
        match self.focused.and_then(|i| self.fields.get(i)) {
            Some(field) => vec![field],
            None => self.fields.iter().collect(),
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Focus a single field. Out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focused = Some(index);
        }
    }

    /// Restore the full field list.
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Return to the upload step, dropping all per-form state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<FormField> {
        vec![
            FormField::new("Name", "a"),
            FormField::new("Address", "b"),
        ]
    }

    #[test]
    fn test_new_session_starts_at_upload() {
        let session = Session::new();
        assert_eq!(session.step(), Step::Upload);
        assert!(session.fields().is_empty());
        assert!(session.language().is_none());
    }

    #[test]
    fn test_focus_narrows_visible_fields() {
        let mut session = Session::new();
        session.set_fields("form.pdf", fields());
        assert_eq!(session.visible_fields().len(), 2);

        session.focus(1);
        let visible = session.visible_fields();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label, "Address");

        session.clear_focus();
        assert_eq!(session.visible_fields().len(), 2);
    }

    #[test]
    fn test_focus_out_of_range_is_ignored() {
        let mut session = Session::new();
        session.set_fields("form.pdf", fields());
        session.focus(99);
        assert!(session.focused().is_none());
        assert_eq!(session.visible_fields().len(), 2);
    }

    #[test]
    fn test_set_fields_clears_stale_focus() {
        let mut session = Session::new();
        session.set_fields("a.pdf", fields());
        session.focus(1);
        session.set_fields("b.pdf", fields());
        assert!(session.focused().is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::new();
        session.set_fields("form.pdf", fields());
        session.set_language(Language::Hindi);
        session.set_step(Step::Response);
        session.focus(0);

        session.reset();

        assert_eq!(session.step(), Step::Upload);
        assert!(session.fields().is_empty());
        assert!(session.language().is_none());
        assert!(session.focused().is_none());
        assert!(session.filename().is_none());
    }

    #[test]
    fn test_step_display_names() {
        assert_eq!(Step::Upload.to_string(), "upload");
        assert_eq!(Step::LanguageSelect.to_string(), "language selection");
    }
}
