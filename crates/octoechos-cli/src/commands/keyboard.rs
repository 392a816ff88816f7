//! Keyboard layout command.

use super::common::{SessionArgs, load_session};
use clap::Args;
use octoechos_config::SessionConfig;
use octoechos_core::to_frequency;
use serde::Serialize;
use std::path::Path;

#[derive(Args)]
pub struct KeyboardArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// One printed key.
#[derive(Debug, Serialize)]
pub struct KeyRow {
    position: i32,
    label: String,
    moria: i32,
    cents: f64,
    frequency: f64,
    tonic: bool,
}

/// Keys of the session's mode, top of the keyboard first.
pub fn key_rows(session: &SessionConfig) -> Vec<KeyRow> {
    let keyboard = session.keyboard();
    let base = session.base_frequency();
    let shift = session.octave_shift();
    keyboard
        .iter()
        .rev()
        .map(|note| KeyRow {
            position: note.position,
            label: note.label().to_string(),
            moria: note.moria_from_base,
            cents: note.cents_from_base,
            frequency: to_frequency(note, base, shift),
            tonic: note.is_tonic,
        })
        .collect()
}

pub fn run(args: KeyboardArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let session = load_session(config, &args.session)?;
    let rows = key_rows(&session);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let glas = session.glas();
    println!("{} ({}) on {}", glas.name, glas.echos, glas.base_note.name());
    println!(
        "  base {:.2} Hz, octave shift {:+}",
        session.base_frequency(),
        session.octave_shift().get()
    );
    println!();
    println!("  {:>3}  {:<6} {:>6} {:>8} {:>10}", "Key", "Note", "Moria", "Cents", "Hz");
    for row in &rows {
        let marker = if row.tonic { " *" } else { "" };
        println!(
            "  {:>3}  {:<6} {:>6} {:>8.1} {:>10.2}{}",
            row.position, row.label, row.moria, row.cents, row.frequency, marker
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_run_top_to_bottom() {
        let rows = key_rows(&SessionConfig::default());
        assert_eq!(rows.len(), 16);
        assert_eq!(rows[0].position, 11);
        assert_eq!(rows[0].label, "Ke'");
        assert_eq!(rows[15].position, -4);
        assert_eq!(rows[15].label, "Di,");
        assert_eq!(rows.iter().filter(|r| r.tonic).count(), 2);
    }

    #[test]
    fn rows_apply_octave_shift() {
        let session = SessionConfig {
            octave_shift: -1,
            ..SessionConfig::default()
        };
        let tonic = key_rows(&session)
            .into_iter()
            .find(|r| r.position == 0)
            .unwrap();
        assert!((tonic.frequency - 146.83).abs() < 1e-9);
    }
}
