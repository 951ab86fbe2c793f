//! Audio playback through system players with testable command execution.
//!
//! Synthesized responses are written to a temporary file and handed to
//! the first available player. The `CommandExecutor` trait enables full
//! testability without external dependencies.

use crate::error::{FormvaniError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FormvaniError::PlayerNotFound {
                    tool: command.to_string(),
                }
            } else {
                FormvaniError::PlaybackFailed {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormvaniError::PlaybackFailed {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Players tried in order. mpv and ffplay handle the MP3 the TTS API
/// returns; paplay is a last resort for WAV-capable setups.
const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--really-quiet", "--no-video"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("paplay", &[]),
];

/// Plays audio bytes through whichever system player is installed.
pub struct AudioPlayer<E: CommandExecutor> {
    executor: E,
    scratch_dir: PathBuf,
}

impl<E: CommandExecutor> AudioPlayer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Override where the temporary audio file is written (tests).
    pub fn with_scratch_dir(mut self, dir: &Path) -> Self {
        self.scratch_dir = dir.to_path_buf();
        self
    }

    /// Play the audio, blocking until the player exits.
    ///
    /// Tries each known player in order; a missing binary moves on to
    /// the next, any other failure is reported as-is.
    pub fn play(&self, audio: &[u8]) -> Result<()> {
        let path = self
            .scratch_dir
            .join(format!("formvani-{}.audio", std::process::id()));
        std::fs::write(&path, audio)?;

        let result = self.play_file(&path);
        // Best effort: the file is in the temp dir either way.
        let _ = std::fs::remove_file(&path);
        result
    }

    fn play_file(&self, path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        let mut last_missing = None;

        for (player, base_args) in PLAYERS {
            let mut args: Vec<&str> = base_args.to_vec();
            args.push(&path_str);

            match self.executor.execute(player, &args) {
                Ok(_) => return Ok(()),
                Err(FormvaniError::PlayerNotFound { tool }) => {
                    last_missing = Some(tool);
                }
                Err(e) => return Err(e),
            }
        }

        Err(FormvaniError::PlayerNotFound {
            tool: last_missing.unwrap_or_else(|| "mpv".to_string()),
        })
    }
}

impl AudioPlayer<SystemCommandExecutor> {
    /// Player backed by real system commands.
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock command executor: records calls, returns queued responses.
    struct MockCommandExecutor {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        responses: Mutex<VecDeque<Result<String>>>,
    }

    impl MockCommandExecutor {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::new()),
            }
        }

        fn with_response(self, response: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(response.to_string()));
            self
        }

        fn with_error(self, error: FormvaniError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for MockCommandExecutor {
        fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
            self.calls.lock().unwrap().push((
                command.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn scratch() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_first_player_success_stops_the_chain() {
        let dir = scratch();
        let player = AudioPlayer::new(MockCommandExecutor::new().with_response(""))
            .with_scratch_dir(dir.path());

        player.play(&[1, 2, 3]).unwrap();

        let calls = player.executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "mpv");
        assert_eq!(calls[0].1[0], "--really-quiet");
    }

    #[test]
    fn test_missing_player_falls_through_to_next() {
        let dir = scratch();
        let mock = MockCommandExecutor::new()
            .with_error(FormvaniError::PlayerNotFound {
                tool: "mpv".to_string(),
            })
            .with_response("");
        let player = AudioPlayer::new(mock).with_scratch_dir(dir.path());

        player.play(&[1, 2, 3]).unwrap();

        let calls = player.executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "ffplay");
    }

    #[test]
    fn test_no_player_installed_reports_missing_tool() {
        let dir = scratch();
        let mut mock = MockCommandExecutor::new();
        for (tool, _) in PLAYERS {
            mock = mock.with_error(FormvaniError::PlayerNotFound {
                tool: tool.to_string(),
            });
        }
        let player = AudioPlayer::new(mock).with_scratch_dir(dir.path());

        let err = player.play(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, FormvaniError::PlayerNotFound { .. }));
    }

    #[test]
    fn test_playback_failure_does_not_fall_through() {
        let dir = scratch();
        let mock = MockCommandExecutor::new().with_error(FormvaniError::PlaybackFailed {
            message: "mpv crashed".to_string(),
        });
        let player = AudioPlayer::new(mock).with_scratch_dir(dir.path());

        let err = player.play(&[1, 2, 3]).unwrap_err();
        match err {
            FormvaniError::PlaybackFailed { message } => assert!(message.contains("crashed")),
            other => panic!("Expected PlaybackFailed, got {:?}", other),
        }
        assert_eq!(player.executor.calls().len(), 1);
    }

    #[test]
    fn test_temp_file_is_removed_after_playback() {
        let dir = scratch();
        let player = AudioPlayer::new(MockCommandExecutor::new()).with_scratch_dir(dir.path());

        player.play(&[1, 2, 3]).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_executor_is_object_safe() {
        let executor: Box<dyn CommandExecutor> = Box::new(MockCommandExecutor::new());
        assert!(executor.execute("mpv", &["x"]).is_ok());
    }
}
