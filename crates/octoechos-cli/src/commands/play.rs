//! Keyboard playback command.
//!
//! Melodies play through a single voice that glides from key to key, the way
//! a finger sliding along the keyboard retunes the sounding note. Chords give
//! every key its own voice.

use super::common::{SessionArgs, key_frequency, key_id, load_session, open_live, release_time};
use clap::Args;
use octoechos_io::BeatClock;
use octoechos_synth::{ToneSink, VoiceId};
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

/// Voice id of the gliding melody voice.
const MELODY: VoiceId = VoiceId::Tag("melody");

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Key positions relative to the tonic, -4 to 11 (e.g., "0,2,4")
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "0,1,2,3,4,5,6,7"
    )]
    keys: Vec<i32>,

    /// Sound all keys together instead of one after another
    #[arg(long)]
    chord: bool,

    /// Duration of each melody note, or of the whole chord, in ms
    #[arg(long, default_value = "500")]
    note_ms: u64,

    /// Play over the metronome at this tempo
    #[arg(long, allow_negative_numbers = true)]
    bpm: Option<i64>,
}

pub fn run(args: PlayArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let mut session = load_session(config, &args.session)?;
    if let Some(bpm) = args.bpm {
        session.bpm = bpm;
        for adj in session.normalize() {
            tracing::warn!(field = adj.field, from = %adj.from, to = %adj.to, "value adjusted");
        }
    }

    let notes: Vec<(i32, f32)> = args
        .keys
        .iter()
        .filter_map(|&position| match key_frequency(&session, position) {
            Some(hz) => Some((position, hz)),
            None => {
                tracing::warn!(position, "no such key, skipped");
                None
            }
        })
        .collect();
    if notes.is_empty() {
        anyhow::bail!("No playable keys. Positions run from -4 to 11.");
    }

    let glas = session.glas();
    let waveform = session.waveform();
    println!(
        "Playing {} key(s) of {} ({}) as a {}",
        notes.len(),
        glas.name,
        glas.echos,
        if args.chord { "chord" } else { "melody" }
    );

    let live = open_live(&session)?;
    let mut keys = live.handle();
    let mut clock = args.bpm.map(|_| BeatClock::new(live.handle()));
    if let Some(clock) = clock.as_mut() {
        clock.set_bpm(session.tempo().get())?;
        clock.start()?;
    }

    let hold = Duration::from_millis(args.note_ms);
    let keyboard = session.keyboard();
    if args.chord {
        for &(position, hz) in &notes {
            keys.start(key_id(position), hz, waveform);
        }
        sleep(hold);
        for &(position, _) in &notes {
            keys.stop(key_id(position));
        }
    } else {
        for &(position, hz) in &notes {
            if let Some(note) = keyboard.get(position) {
                println!("  {:<6} {:>8.2} Hz", note.label(), hz);
            }
            keys.start(MELODY, hz, waveform);
            sleep(hold);
        }
        keys.stop(MELODY);
    }

    if let Some(clock) = clock.as_mut() {
        clock.stop();
    }
    sleep(release_time(&session));
    println!("Done!");
    Ok(())
}
