//! Command-line interface for formvani
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Voice-first form assistant
#[derive(Parser, Debug)]
#[command(name = "formvani", version, about = "Voice-first form assistant")]
pub struct Cli {
    /// Subcommand to execute; none starts an interactive session
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: extraction details and API diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Audio input device (e.g., pipewire)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Assistant language, skipping the language menu (name or ISO code)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// API key for the hosted speech/vision/translation services
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Base URL of the hosted API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Do not play synthesized answers out loud
    #[arg(long)]
    pub no_audio: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract and print the fields of a form file, without starting a session
    Parse {
        /// Form file (image, PDF, or text)
        file: PathBuf,

        /// Print the fields as JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// List supported languages
    Languages,

    /// List available audio input devices
    Devices,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["formvani"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.device.is_none());
        assert!(cli.language.is_none());
        assert!(cli.api_key.is_none());
        assert!(cli.api_url.is_none());
        assert!(!cli.no_audio);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_verbose_flags() {
        let cli = Cli::try_parse_from(["formvani", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let cli = Cli::try_parse_from(["formvani", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_options() {
        let cli = Cli::try_parse_from([
            "formvani",
            "--device",
            "pipewire",
            "--language",
            "hindi",
            "--api-key",
            "k123",
        ])
        .unwrap();

        assert_eq!(cli.device.as_deref(), Some("pipewire"));
        assert_eq!(cli.language.as_deref(), Some("hindi"));
        assert_eq!(cli.api_key.as_deref(), Some("k123"));
    }

    #[test]
    fn test_parse_no_audio() {
        let cli = Cli::try_parse_from(["formvani", "--no-audio"]).unwrap();
        assert!(cli.no_audio);
    }

    #[test]
    fn test_parse_parse_command() {
        let cli = Cli::try_parse_from(["formvani", "parse", "form.pdf"]).unwrap();
        match cli.command {
            Some(Commands::Parse { file, json }) => {
                assert_eq!(file, PathBuf::from("form.pdf"));
                assert!(!json);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_parse_command_json() {
        let cli = Cli::try_parse_from(["formvani", "parse", "form.pdf", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Parse { json, .. }) => assert!(json),
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_requires_file() {
        let result = Cli::try_parse_from(["formvani", "parse"]);
        let err = result.unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("required") || msg.contains("FILE"),
            "Expected missing required argument error, got: {msg}"
        );
    }

    #[test]
    fn test_parse_languages() {
        let cli = Cli::try_parse_from(["formvani", "languages"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Languages)));
    }

    #[test]
    fn test_parse_devices() {
        let cli = Cli::try_parse_from(["formvani", "devices"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Devices)));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["formvani", "completions", "bash"]).unwrap();
        match cli.command {
            Some(Commands::Completions { shell }) => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::try_parse_from(["formvani", "--config", "/path/to/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_global_options_after_command() {
        let cli =
            Cli::try_parse_from(["formvani", "languages", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_parse_quiet_short_flag() {
        let cli = Cli::try_parse_from(["formvani", "-q"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_invalid_command_returns_error() {
        let result = Cli::try_parse_from(["formvani", "invalid"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["formvani", "--help"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["formvani", "--version"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayVersion
        );
    }
}
