//! Octoechos CLI - a microtonal keyboard and metronome for the eight Byzantine modes.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "octoechos")]
#[command(author, version, about = "Byzantine Octoechos keyboard CLI", long_about = None)]
struct Cli {
    /// Session file (TOML). Defaults to the user config directory.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the eight modes and their interval patterns
    Modes(commands::modes::ModesArgs),

    /// Print the keyboard of a mode with labels, cents and frequencies
    Keyboard(commands::keyboard::KeyboardArgs),

    /// Play keys of a mode as a melody or chord
    Play(commands::play::PlayArgs),

    /// Run the metronome
    Metronome(commands::metronome::MetronomeArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// Show or write the effective session configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Modes(args) => commands::modes::run(args),
        Commands::Keyboard(args) => commands::keyboard::run(args, config),
        Commands::Play(args) => commands::play::run(args, config),
        Commands::Metronome(args) => commands::metronome::run(args, config),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Config(args) => commands::config::run(args, config),
    }
}
