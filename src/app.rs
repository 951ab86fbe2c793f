//! Interactive session: wires the flow controller to the terminal.

use crate::api::http::RetryingClient;
use crate::api::speech::HttpSpeechClient;
use crate::api::translate::HttpTranslator;
use crate::api::tts::HttpSynthesizer;
use crate::api::vision::HttpFormParser;
use crate::audio::wav;
use crate::cli::Cli;
use crate::config::Config;
use crate::defaults;
use crate::error::{FormvaniError, Result};
use crate::flow::{FlowController, QueryOutcome};
use crate::form::extractor::{FieldExtractor, Upload};
use crate::lang::{ALL_LANGUAGES, Language};
use crate::output::Printer;
use crate::playback::AudioPlayer;
use crate::session::Step;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "cpal-audio")]
use crate::audio::capture::CpalAudioSource;
#[cfg(feature = "cpal-audio")]
use crate::recording::RecordingSession;
#[cfg(feature = "cpal-audio")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "cpal-audio")]
use std::thread;

/// Build the standard flow controller against the hosted APIs.
pub fn build_flow(config: &Config) -> Result<FlowController> {
    let http = RetryingClient::new()?;
    let base = &config.api.base_url;
    let key = &config.api.api_key;

    let parser = Arc::new(HttpFormParser::new(http.clone(), base, key));
    Ok(FlowController::new(
        FieldExtractor::new(parser),
        Arc::new(HttpSpeechClient::new(http.clone(), base, key)),
        Arc::new(HttpTranslator::new(http.clone(), base, key)),
        Arc::new(HttpSynthesizer::new(http, base, key)),
    ))
}

/// Extract fields from a file without starting a session (`parse`).
pub async fn parse_file(config: &Config, path: &std::path::Path, json: bool) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let http = RetryingClient::new()?;
    let parser = Arc::new(HttpFormParser::new(
        http,
        &config.api.base_url,
        &config.api.api_key,
    ));
    let extractor = FieldExtractor::new(parser);
    let extraction = extractor
        .extract(&Upload {
            bytes: &bytes,
            filename: &filename,
        })
        .await;

    for warning in &extraction.warnings {
        eprintln!("warning: {}", warning);
    }

    if json {
        let out = serde_json::to_string_pretty(&extraction.fields)
            .map_err(|e| FormvaniError::Other(e.to_string()))?;
        println!("{}", out);
    } else {
        eprintln!("{} field(s) via {}:", extraction.fields.len(), extraction.source);
        for field in &extraction.fields {
            println!("{}: {}", field.label, field.explanation);
        }
    }
    Ok(())
}

/// The interactive terminal session.
pub struct App {
    flow: FlowController,
    printer: Printer,
    device: Option<String>,
    play_audio: bool,
    preset_language: Option<Language>,
}

impl App {
    pub fn new(cli: &Cli, config: &Config) -> Result<Self> {
        let preset_language = match cli
            .language
            .as_deref()
            .or(config.assistant.language.as_deref())
        {
            Some(input) => Some(Language::parse(input)?),
            None => None,
        };

        Ok(Self {
            flow: build_flow(config)?,
            printer: Printer::new(cli.quiet, cli.verbose),
            device: cli.device.clone().or_else(|| config.audio.device.clone()),
            play_audio: config.assistant.speak_responses && !cli.no_audio,
            preset_language,
        })
    }

    /// Run until the user quits. Every external failure degrades; only
    /// I/O on the terminal itself can end the session early.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.flow.step() {
                Step::Upload => {
                    if !self.step_upload().await? {
                        return Ok(());
                    }
                }
                Step::LanguageSelect => self.step_language().await?,
                Step::FieldList => {
                    if !self.step_query().await? {
                        return Ok(());
                    }
                }
                // voice_query and the response prompt handle these
                // transitions before control returns to the loop.
                Step::VoiceQuery | Step::Response => {
                    self.flow.reset();
                }
            }
        }
    }

    /// Returns false when the user quits.
    async fn step_upload(&mut self) -> Result<bool> {
        self.printer.step_banner(Step::Upload);
        let input = read_line("Form file path (or 'q' to quit): ")?;
        if is_quit(&input) {
            return Ok(false);
        }
        if input.is_empty() {
            self.printer.warning(&FormvaniError::NoFileSelected.to_string());
            return Ok(true);
        }

        let bytes = match std::fs::read(&input) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.printer.warning(&format!("Cannot read {}: {}", input, e));
                return Ok(true);
            }
        };

        match self.flow.upload_confirmed(&bytes, &input).await {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    self.printer.warning(warning);
                }
                self.printer.success(&format!(
                    "Found {} field(s) via {}",
                    outcome.field_count, outcome.source
                ));
            }
            Err(e) => self.printer.warning(&e.to_string()),
        }
        Ok(true)
    }

    async fn step_language(&mut self) -> Result<()> {
        if let Some(language) = self.preset_language.take() {
            let outcome = self.flow.language_selected(language).await?;
            self.report_language(&outcome.warnings, Some(language));
            return Ok(());
        }

        self.printer.step_banner(Step::LanguageSelect);
        self.printer.language_menu();
        let input = read_line("Language (number or name; Enter to speak it): ")?;

        if input.is_empty() {
            self.printer
                .info("Speak your language now (3 seconds)...");
            let recording = self.record_fixed(defaults::LANGUAGE_CAPTURE);
            let outcome = self.flow.language_spoken(recording).await?;
            self.report_language(&outcome.warnings, outcome.language);
            return Ok(());
        }

        let language = match parse_language_choice(&input) {
            Ok(language) => language,
            Err(e) => {
                self.printer.warning(&e.to_string());
                return Ok(());
            }
        };

        let outcome = self.flow.language_selected(language).await?;
        self.report_language(&outcome.warnings, Some(language));
        Ok(())
    }

    fn report_language(&self, warnings: &[String], language: Option<Language>) {
        for warning in warnings {
            self.printer.warning(warning);
        }
        if let Some(language) = language {
            self.printer
                .success(&format!("Language: {} ({})", language, language.native_name()));
        }
    }

    /// Returns false when the user quits.
    async fn step_query(&mut self) -> Result<bool> {
        self.printer.step_banner(Step::FieldList);
        self.printer.field_list(&self.flow.visible_fields());

        let input = read_line("Enter to ask about a field, 'r' to restart, 'q' to quit: ")?;
        if is_quit(&input) {
            return Ok(false);
        }
        if input.eq_ignore_ascii_case("r") {
            self.flow.reset();
            return Ok(true);
        }

        self.printer
            .info("Recording. Press Enter again to stop...");
        let recording = self.record_until_enter();
        let wav = match recording.and_then(|samples| wav::encode_wav(&samples)) {
            Ok(wav) => wav,
            Err(e) => {
                self.printer.warning(&e.to_string());
                return Ok(true);
            }
        };

        let outcome = self.flow.voice_query(&wav).await?;
        self.render_outcome(&outcome);

        if self.flow.step() == Step::Response {
            let input = read_line("Enter for another question, 'r' to restart, 'q' to quit: ")?;
            if is_quit(&input) {
                return Ok(false);
            }
            if input.eq_ignore_ascii_case("r") {
                self.flow.reset();
            } else {
                self.flow.ask_another()?;
            }
        }
        Ok(true)
    }

    fn render_outcome(&self, outcome: &QueryOutcome) {
        for warning in &outcome.warnings {
            self.printer.warning(warning);
        }
        if let Some(transcript) = &outcome.transcript {
            self.printer.detail(&format!("Heard: {}", transcript));
        }
        if let Some(response) = &outcome.response {
            self.printer.response(response);
        }
        if self.play_audio
            && let Some(audio) = &outcome.audio
            && let Err(e) = AudioPlayer::system().play(audio)
        {
            self.printer.warning(&e.to_string());
        }
    }

    /// Record for a fixed window (the spoken language capture).
    fn record_fixed(&self, window: Duration) -> Result<Vec<i16>> {
        #[cfg(feature = "cpal-audio")]
        {
            let source = CpalAudioSource::new(self.device.as_deref())?;
            RecordingSession::new(source)
                .with_level_display(!self.printer.quiet)
                .record_for(window)
        }
        #[cfg(not(feature = "cpal-audio"))]
        {
            let _ = window;
            Err(FormvaniError::AudioCapture {
                message: "built without microphone support".to_string(),
            })
        }
    }

    /// Record until the user presses Enter.
    fn record_until_enter(&self) -> Result<Vec<i16>> {
        #[cfg(feature = "cpal-audio")]
        {
            let stop = Arc::new(AtomicBool::new(false));
            let stop_flag = Arc::clone(&stop);
            let input_thread = thread::spawn(move || {
                let mut line = String::new();
                let _ = io::stdin().lock().read_line(&mut line);
                stop_flag.store(true, Ordering::Relaxed);
            });

            let source = CpalAudioSource::new(self.device.as_deref())?;
            let samples = RecordingSession::new(source)
                .with_level_display(!self.printer.quiet)
                .record_until_stopped(stop);
            let _ = input_thread.join();
            samples
        }
        #[cfg(not(feature = "cpal-audio"))]
        {
            Err(FormvaniError::AudioCapture {
                message: "built without microphone support".to_string(),
            })
        }
    }
}

fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}

/// Resolve a menu number, a language name, or an ISO code.
fn parse_language_choice(input: &str) -> Result<Language> {
    if let Ok(number) = input.parse::<usize>()
        && number >= 1
        && let Some(language) = ALL_LANGUAGES.get(number - 1)
    {
        return Ok(*language);
    }
    Language::parse(input)
}

fn read_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        // EOF behaves like quitting.
        return Ok("q".to_string());
    }
    Ok(line.trim().to_string())
}
