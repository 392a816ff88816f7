//! Session configuration command.

use super::common::{SessionArgs, load_session};
use clap::Args;
use octoechos_config::{default_session_path, find_session};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Write the effective session to this file instead of printing it
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print where the session file is looked up and stop
    #[arg(long)]
    path: bool,
}

pub fn run(args: ConfigArgs, config: Option<&Path>) -> anyhow::Result<()> {
    if args.path {
        match find_session(config) {
            Some(path) => println!("{}", path.display()),
            None => println!("{} (not present, using defaults)", default_session_path().display()),
        }
        return Ok(());
    }

    let session = load_session(config, &args.session)?;
    match args.output {
        Some(path) => {
            session.save(&path)?;
            tracing::info!(path = %path.display(), "session written");
        }
        None => print!("{}", session.to_toml()?),
    }
    Ok(())
}
