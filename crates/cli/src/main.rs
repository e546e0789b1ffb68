//! Gear engine replay binary.
//!
//! Loads a profile (a data directory or a builtin), replays an event script
//! through a simulated host, and prints the equip transcript.
//!
//! ```bash
//! # builtin Red Mage profile, text transcript
//! cargo run -p gear-cli -- demos/sleep.toml
//!
//! # profile on disk, JSON transcript
//! GEAR_PROFILE_DIR=./my-rdm GEAR_OUTPUT=json cargo run -p gear-cli -- demos/sleep.toml
//! ```
mod config;
mod logging;

use anyhow::Result;
use gear_content::{ProfileFactory, builtin};
use gear_core::GearConfig;
use runtime::{Script, ScriptLoader, Transcript};

use config::{CliConfig, OutputFormat};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env().with_script_arg(std::env::args().nth(1));

    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);
    logging::setup_logging(&log_dir, config.session_id.as_deref())?;

    let gear = load_profile(&config)?;
    let script = match &config.script {
        Some(path) => {
            tracing::info!("Replaying script: {}", path.display());
            ScriptLoader::load(path)?
        }
        None => {
            tracing::info!("No script given, showing the starting baseline only");
            Script::default()
        }
    };

    let transcript = script.run(&gear)?;
    print_transcript(&transcript, config.output)?;
    Ok(())
}

fn load_profile(config: &CliConfig) -> Result<GearConfig> {
    match &config.profile_dir {
        Some(dir) => {
            tracing::info!("Loading profile from {}", dir.display());
            ProfileFactory::new(dir).build_config()
        }
        None => {
            tracing::info!("Using builtin profile '{}'", config.profile);
            builtin::by_name(&config.profile)
        }
    }
}

fn print_transcript(transcript: &Transcript, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => print!("{transcript}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(transcript)?),
    }
    Ok(())
}
