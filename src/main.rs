use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use morse_tts::morse::{self, table};
use morse_tts::{ApiServerBuilder, Config, Error};

/// Morse TTS - speech-API compatible Morse code audio server
#[derive(Parser)]
#[command(name = "morse-tts", version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/morse-tts/config.toml
    #[arg(short, long, env = "MORSE_TTS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Render text to a WAV file
    Render {
        /// Text to render
        text: String,
        /// Output file
        #[arg(short, long, default_value = "morse.wav")]
        output: PathBuf,
        /// Speed preset name
        #[arg(long, default_value = "echo")]
        voice: String,
        /// Multiplier on the base speed when the voice is not a preset
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },
    /// Print text as dots and dashes
    Encode {
        /// Text to encode
        text: String,
    },
    /// Print dots and dashes as text
    Decode {
        /// Morse to decode, characters separated by spaces and words by `/`
        morse: String,
    },
    /// List speed presets
    Voices,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,morse_tts=info",
        1 => "info,morse_tts=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => serve(load_config(cli.config)?, host, port).await,
        Command::Render {
            text,
            output,
            voice,
            speed,
        } => render(&load_config(cli.config)?, &text, &output, &voice, speed),
        Command::Encode { text } => {
            println!("{}", table::encode_text(&text));
            Ok(())
        }
        Command::Decode { morse } => {
            println!("{}", table::decode_text(&morse));
            Ok(())
        }
        Command::Voices => {
            for preset in morse::presets() {
                println!("{:<10} {:>3} WPM", preset.voice, preset.wpm.get());
            }
            println!("{:<10} {:>3} WPM x speed", "(other)", morse::BASE_WPM);
            Ok(())
        }
    }
}

/// Load configuration from an explicit file or the standard location
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Run the HTTP server
async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut builder = ApiServerBuilder::new(&config);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }

    tracing::info!("starting morse tts server");
    builder.build().run().await?;

    Ok(())
}

/// Render text to a WAV file on disk
///
/// Applies the same speed range and size limits as the HTTP endpoint.
fn render(
    config: &Config,
    text: &str,
    output: &Path,
    voice: &str,
    speed: f64,
) -> anyhow::Result<()> {
    morse::check_speed(speed)?;

    let len = text.chars().count();
    let max = config.synthesis.max_input_chars;
    if len > max {
        return Err(Error::InputTooLong { len, max }.into());
    }

    let wpm = morse::resolve(voice, speed);
    let asset = morse::render(text, wpm, config.synthesis.max_samples)?;
    std::fs::write(output, &asset.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} bytes to {} at {wpm}",
        asset.bytes.len(),
        output.display()
    );
    Ok(())
}
