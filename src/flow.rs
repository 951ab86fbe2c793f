//! The conversation flow controller.
//!
//! Drives the five-step sequence (upload, language selection, field
//! list, voice query, response) over a shared [`Session`]. External-API
//! failures never escape as errors from user actions: each one degrades
//! to a local fallback and is reported through the outcome's warnings.
//!
//! Timers (the 10-second focus restore) run as abortable tokio tasks and
//! are cancelled on reset, so a reset can never be undone by a timer
//! that outlived the session it was armed for.

use crate::api::speech::SpeechToText;
use crate::api::translate::{self, Translator};
use crate::api::tts::Synthesizer;
use crate::defaults;
use crate::error::{FormvaniError, Result};
use crate::form::explain;
use crate::form::extractor::{FieldExtractor, Upload};
use crate::form::field::FormField;
use crate::lang::Language;
use crate::matcher::{self, QueryMatch};
use crate::session::{Session, Step};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::AbortHandle;

/// Reply when the query matched nothing and is not a general question.
const UNRECOGNIZED_REPLY: &str =
    "Sorry, I did not catch which field you are asking about. Please try again using the field's name.";

/// What happened after a form upload was confirmed.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Strategy that produced the fields ("vision API", "text patterns",
    /// or "default fields").
    pub source: &'static str,
    pub field_count: usize,
    pub warnings: Vec<String>,
}

/// What happened after a language was resolved.
pub struct LanguageOutcome {
    /// `None` when spoken selection failed and the flow is waiting for a
    /// manual choice instead.
    pub language: Option<Language>,
    pub translated: usize,
    pub warnings: Vec<String>,
}

/// What happened after a voice query.
pub struct QueryOutcome {
    /// `None` when transcription failed (the flow returned to the field
    /// list without an answer).
    pub transcript: Option<String>,
    pub matched: Option<QueryMatch>,
    pub response: Option<String>,
    /// Synthesized speech for the response; `None` when synthesis failed
    /// or was skipped.
    pub audio: Option<Vec<u8>>,
    pub warnings: Vec<String>,
}

/// Sequences user actions over one session.
pub struct FlowController {
    session: Arc<Mutex<Session>>,
    extractor: FieldExtractor,
    speech: Arc<dyn SpeechToText>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    restore_timer: Option<AbortHandle>,
}

impl FlowController {
    pub fn new(
        extractor: FieldExtractor,
        speech: Arc<dyn SpeechToText>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            extractor,
            speech,
            translator,
            synthesizer,
            restore_timer: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn expect_step(&self, expected: Step) -> Result<()> {
        let actual = self.lock().step();
        if actual != expected {
            return Err(FormvaniError::Other(format!(
                "that action is not available during {}",
                actual
            )));
        }
        Ok(())
    }

    pub fn step(&self) -> Step {
        self.lock().step()
    }

    pub fn language(&self) -> Option<Language> {
        self.lock().language()
    }

    /// Snapshot of the fields the user currently sees.
    pub fn visible_fields(&self) -> Vec<FormField> {
        self.lock().visible_fields().into_iter().cloned().collect()
    }

    /// Confirm an uploaded form file and extract its fields.
    ///
    /// The extraction chain ends in static defaults, so with the standard
    /// chain this only fails on input validation, never on API errors.
    pub async fn upload_confirmed(&mut self, bytes: &[u8], filename: &str) -> Result<UploadOutcome> {
        self.expect_step(Step::Upload)?;

        if filename.trim().is_empty() {
            return Err(FormvaniError::NoFileSelected);
        }

        let upload = Upload { bytes, filename };
        let extraction = self.extractor.extract(&upload).await;

        if extraction.fields.is_empty() {
            return Err(FormvaniError::NoFieldsExtracted {
                filename: filename.to_string(),
            });
        }

        let field_count = extraction.fields.len();
        let mut session = self.lock();
        session.set_fields(filename, extraction.fields);
        session.set_step(Step::LanguageSelect);

        Ok(UploadOutcome {
            source: extraction.source,
            field_count,
            warnings: extraction.warnings,
        })
    }

    /// Select the assistant language and translate all explanations.
    ///
    /// Translation failures degrade per field: the English explanation
    /// stays visible and a single warning summarizes the failures.
    pub async fn language_selected(&mut self, language: Language) -> Result<LanguageOutcome> {
        self.expect_step(Step::LanguageSelect)?;

        // Translate outside the lock; the batch helper awaits.
        let mut fields = self.lock().fields().to_vec();
        let batch = translate::translate_fields(&*self.translator, &mut fields, language).await;

        let mut warnings = Vec::new();
        if batch.failed > 0 {
            warnings.push(format!(
                "Could not translate {} explanation(s); showing English instead",
                batch.failed
            ));
        }

        let mut session = self.lock();
        for (stored, translated) in session.fields_mut().iter_mut().zip(fields) {
            stored.translated_explanation = translated.translated_explanation;
        }
        session.set_language(language);
        session.set_step(Step::FieldList);

        Ok(LanguageOutcome {
            language: Some(language),
            translated: batch.translated,
            warnings,
        })
    }

    /// Resolve the language from a spoken capture.
    ///
    /// Short clips are unreliable for language identification, so after a
    /// successful capture the flow deterministically selects the default
    /// language rather than trusting detection. A failed capture (no
    /// microphone, permission denied) keeps the flow at language
    /// selection so the user can pick from the menu instead.
    pub async fn language_spoken(
        &mut self,
        recording: Result<Vec<i16>>,
    ) -> Result<LanguageOutcome> {
        self.expect_step(Step::LanguageSelect)?;

        match recording {
            Ok(_samples) => {
                let language = Language::from_code(defaults::DEFAULT_LANGUAGE)
                    .unwrap_or(Language::Hindi);
                self.language_selected(language).await
            }
            Err(e) => Ok(LanguageOutcome {
                language: None,
                translated: 0,
                warnings: vec![format!("{}. Choose a language from the menu instead.", e)],
            }),
        }
    }

    /// Transcribe a recorded voice query and answer it.
    ///
    /// A transcription failure returns the flow to the field list with a
    /// warning; a synthesis failure only drops the audio. Neither is an
    /// error from the caller's point of view.
    pub async fn voice_query(&mut self, wav: &[u8]) -> Result<QueryOutcome> {
        self.expect_step(Step::FieldList)?;
        self.lock().set_step(Step::VoiceQuery);

        let hint = self.language();
        let transcript = match self.speech.transcribe(wav, hint).await {
            Ok(t) => t,
            Err(e) => {
                self.lock().set_step(Step::FieldList);
                return Ok(QueryOutcome {
                    transcript: None,
                    matched: None,
                    response: None,
                    audio: None,
                    warnings: vec![format!("{}", e)],
                });
            }
        };

        let fields = self.lock().fields().to_vec();
        let matched = matcher::match_query(&transcript.text, &fields);

        let mut warnings = Vec::new();
        let response = match matched {
            QueryMatch::Field(index) => {
                let field = &fields[index];
                let text = format!("{}. {}", field.label, field.display_explanation());
                self.lock().focus(index);
                self.arm_restore_timer();
                text
            }
            QueryMatch::General => explain::FORM_OVERVIEW.to_string(),
            QueryMatch::Unrecognized => UNRECOGNIZED_REPLY.to_string(),
        };

        let language = hint.unwrap_or(Language::English);
        let audio = match self.synthesizer.synthesize(&response, language).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warnings.push(format!("{}. Showing the answer as text only.", e));
                None
            }
        };

        self.lock().set_step(Step::Response);

        Ok(QueryOutcome {
            transcript: Some(transcript.text),
            matched: Some(matched),
            response: Some(response),
            audio,
            warnings,
        })
    }

    /// Return from the response view to the field list.
    pub fn ask_another(&mut self) -> Result<()> {
        self.expect_step(Step::Response)?;
        self.lock().set_step(Step::FieldList);
        Ok(())
    }

    /// Return to the upload step from anywhere, dropping all per-form
    /// state and cancelling the restore timer.
    pub fn reset(&mut self) {
        self.cancel_restore_timer();
        self.lock().reset();
    }

    /// Restore the full field list after the focus window elapses.
    fn arm_restore_timer(&mut self) {
        self.cancel_restore_timer();
        let session = Arc::clone(&self.session);
        // Fix the deadline now, not at the task's first poll, so the
        // window is measured from the moment the timer is armed.
        let sleep = tokio::time::sleep(defaults::FIELD_RESTORE);
        let handle = tokio::spawn(async move {
            sleep.await;
            session
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clear_focus();
        });
        self.restore_timer = Some(handle.abort_handle());
    }

    fn cancel_restore_timer(&mut self) {
        if let Some(handle) = self.restore_timer.take() {
            handle.abort();
        }
    }
}

impl Drop for FlowController {
    fn drop(&mut self) {
        self.cancel_restore_timer();
    }
}
