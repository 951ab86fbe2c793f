//! Terminal rendering for the interactive session.

use crate::form::field::FormField;
use crate::lang::ALL_LANGUAGES;
use crate::session::Step;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces the level meter etc.)
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

/// Status and warning output, gated by the quiet/verbose flags.
#[derive(Clone, Copy)]
pub struct Printer {
    pub quiet: bool,
    pub verbosity: u8,
}

impl Printer {
    pub fn new(quiet: bool, verbosity: u8) -> Self {
        Self { quiet, verbosity }
    }

    /// One-line banner naming the current step.
    pub fn step_banner(&self, step: Step) {
        if self.quiet {
            return;
        }
        eprintln!("\n{BOLD}{CYAN}── {} ──{RESET}", step);
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    /// Diagnostics shown only with -v.
    pub fn detail(&self, message: &str) {
        if !self.quiet && self.verbosity >= 1 {
            eprintln!("{DIM}{}{RESET}", message);
        }
    }

    /// Warnings are shown even in quiet mode; they change what the user
    /// sees (untranslated text, fallback fields).
    pub fn warning(&self, message: &str) {
        eprintln!("{YELLOW}warning:{RESET} {}", message);
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{GREEN}{}{RESET}", message);
        }
    }

    /// Numbered field list with explanations.
    pub fn field_list(&self, fields: &[FormField]) {
        if self.quiet {
            return;
        }
        for (i, field) in fields.iter().enumerate() {
            eprintln!("  {BOLD}{}. {}{RESET}", i + 1, field.label);
            eprintln!("     {DIM}{}{RESET}", field.display_explanation());
        }
    }

    /// Numbered language menu with native names.
    pub fn language_menu(&self) {
        if self.quiet {
            return;
        }
        for (i, lang) in ALL_LANGUAGES.iter().enumerate() {
            eprintln!("  {}. {} ({})", i + 1, lang.name(), lang.native_name());
        }
    }

    /// The spoken answer, printed so it can be read along.
    pub fn response(&self, text: &str) {
        eprintln!("\n{BOLD}{}{RESET}", text);
    }
}
