//! Mode listing command.

use clap::Args;
use octoechos_core::Glas;
use serde::Serialize;

#[derive(Args)]
pub struct ModesArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ModeRow {
    id: u8,
    name: &'static str,
    echos: &'static str,
    base_note: &'static str,
    base_frequency: f64,
    genus: &'static str,
    intervals: [u8; 7],
    description: &'static str,
}

impl From<&Glas> for ModeRow {
    fn from(glas: &Glas) -> Self {
        Self {
            id: glas.id,
            name: glas.name,
            echos: glas.echos,
            base_note: glas.base_note.name(),
            base_frequency: glas.base_frequency(),
            genus: glas.genus.name(),
            intervals: glas.intervals,
            description: glas.description,
        }
    }
}

pub fn run(args: ModesArgs) -> anyhow::Result<()> {
    let rows: Vec<ModeRow> = Glas::all().map(ModeRow::from).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("The Eight Modes");
    println!("===============\n");
    println!(
        "  {:>2}  {:<14} {:<4} {:<16} Intervals (moria)",
        "#", "Echos", "Base", "Genus"
    );
    for row in &rows {
        let intervals = row
            .intervals
            .iter()
            .map(|m| format!("{m:>2}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {:>2}  {:<14} {:<4} {:<16} {}",
            row.id, row.echos, row.base_note, row.genus, intervals
        );
    }
    println!();
    println!("Tip: show a mode's keys with:");
    println!("  octoechos keyboard --glas 6");
    Ok(())
}
