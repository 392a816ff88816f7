//! Metronome command.

use super::common::{SessionArgs, load_session, open_live, release_time};
use clap::Args;
use octoechos_core::{BEATS_PER_BAR, beat_in_bar};
use octoechos_io::BeatClock;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct MetronomeArgs {
    /// Tempo in beats per minute, 30 to 240
    #[arg(short, long, allow_negative_numbers = true)]
    bpm: Option<i64>,

    /// Stop after this many seconds (runs until Ctrl+C otherwise)
    #[arg(short, long)]
    seconds: Option<f64>,

    /// Output volume, 0 to 1
    #[arg(long)]
    volume: Option<f32>,
}

/// The four-dot bar display, `beat` lit.
pub fn bar_display(beat: u32) -> String {
    (0..BEATS_PER_BAR)
        .map(|i| if i == beat { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run(args: MetronomeArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let overrides = SessionArgs {
        volume: args.volume,
        ..SessionArgs::default()
    };
    let mut session = load_session(config, &overrides)?;
    if let Some(bpm) = args.bpm {
        session.bpm = bpm;
        for adj in session.normalize() {
            tracing::warn!(field = adj.field, from = %adj.from, to = %adj.to, "value adjusted");
        }
    }

    let live = open_live(&session)?;
    let mut clock = BeatClock::new(live.handle());
    clock.set_bpm(session.tempo().get())?;

    println!("Metronome at {}", clock.bpm());
    match args.seconds {
        Some(s) => println!("Stopping after {:.1}s\n", s),
        None => println!("Press Ctrl+C to stop...\n"),
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let deadline = args
        .seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| Instant::now() + Duration::from_secs_f64(s));

    clock.start()?;
    let mut last_ticks = 0;
    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        let ticks = clock.ticks();
        if ticks != last_ticks {
            last_ticks = ticks;
            println!("  {}", bar_display(beat_in_bar(ticks - 1)));
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    clock.stop();

    println!("\nStopping...");
    std::thread::sleep(release_time(&session));
    Ok(())
}
