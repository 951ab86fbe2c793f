use anyhow::Result;
use clap::{CommandFactory, Parser};
use formvani::app::{self, App};
use formvani::cli::{Cli, Commands};
use formvani::config::Config;
use formvani::lang::ALL_LANGUAGES;
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        None => {
            if !cli.quiet {
                eprintln!("formvani {}", formvani::version_string());
            }
            if config.api.api_key.is_empty() {
                eprintln!(
                    "warning: no API key configured (set FORMVANI_API_KEY or api.api_key); \
                     extraction will fall back to offline strategies"
                );
            }
            let mut app = App::new(&cli, &config)?;
            app.run().await?;
        }
        Some(Commands::Parse { file, json }) => {
            app::parse_file(&config, file, *json).await?;
        }
        Some(Commands::Languages) => {
            for lang in ALL_LANGUAGES {
                println!(
                    "{:12} {:10} {}",
                    lang.name().bold(),
                    lang.native_name(),
                    lang.code().dimmed()
                );
            }
        }
        Some(Commands::Devices) => {
            list_audio_devices()?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "formvani",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Config file, then environment, then CLI flags; later layers win.
fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&path)?.with_env_overrides();

    if let Some(key) = &cli.api_key {
        config.api.api_key = key.clone();
    }
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(device) = &cli.device {
        config.audio.device = Some(device.clone());
    }
    if let Some(language) = &cli.language {
        config.assistant.language = Some(language.clone());
    }
    if cli.no_audio {
        config.assistant.speak_responses = false;
    }

    Ok(config)
}

#[cfg(feature = "cpal-audio")]
fn list_audio_devices() -> Result<()> {
    let devices = formvani::audio::capture::list_devices()?;
    if devices.is_empty() {
        println!("No audio input devices found");
        return Ok(());
    }
    println!("{}", "Audio input devices:".bold());
    for device in devices {
        println!("  {}", device);
    }
    Ok(())
}

#[cfg(not(feature = "cpal-audio"))]
fn list_audio_devices() -> Result<()> {
    println!("Built without microphone support (cpal-audio feature disabled)");
    Ok(())
}
