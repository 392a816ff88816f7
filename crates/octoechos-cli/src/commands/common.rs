//! Shared CLI helpers used across multiple commands.

use clap::Args;
use octoechos_config::SessionConfig;
use octoechos_core::{KEYBOARD_RANGE, to_frequency};
use octoechos_io::{BackendStreamConfig, CpalBackend, LiveEngine};
use octoechos_synth::{ToneSink, VoiceId};
use std::path::Path;
use std::time::Duration;

/// Session values that can be overridden on the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct SessionArgs {
    /// Mode number, 1 to 8
    #[arg(short, long, allow_negative_numbers = true)]
    pub glas: Option<i64>,

    /// Tonic frequency in Hz (defaults to the mode's base note)
    #[arg(long, value_name = "HZ")]
    pub base_freq: Option<f64>,

    /// Octave shift, -2 to 2
    #[arg(long, allow_negative_numbers = true)]
    pub octave: Option<i64>,

    /// Waveform: sine, triangle, square or sawtooth
    #[arg(short, long)]
    pub waveform: Option<String>,

    /// Output volume, 0 to 1
    #[arg(long)]
    pub volume: Option<f32>,
}

impl SessionArgs {
    /// Overwrite the session fields given on the command line.
    pub fn apply(&self, session: &mut SessionConfig) {
        if let Some(glas) = self.glas {
            session.glas = glas;
        }
        if let Some(freq) = self.base_freq {
            session.base_frequency = Some(freq);
        }
        if let Some(shift) = self.octave {
            session.octave_shift = shift;
        }
        if let Some(waveform) = &self.waveform {
            session.waveform.clone_from(waveform);
        }
        if let Some(volume) = self.volume {
            session.master_volume = volume;
        }
    }
}

/// Load the session file, apply overrides and clamp the result.
///
/// Every clamped value is logged as a warning.
pub fn load_session(
    config: Option<&Path>,
    overrides: &SessionArgs,
) -> anyhow::Result<SessionConfig> {
    let mut session = SessionConfig::discover(config)?;
    overrides.apply(&mut session);
    for adj in session.normalize() {
        tracing::warn!(field = adj.field, from = %adj.from, to = %adj.to, "value adjusted");
    }
    tracing::debug!(
        glas = session.glas,
        base_frequency = session.base_frequency(),
        octave_shift = session.octave_shift,
        "session loaded"
    );
    Ok(session)
}

/// Stream settings from the `[audio]` table.
pub fn stream_config(session: &SessionConfig) -> BackendStreamConfig {
    BackendStreamConfig {
        sample_rate: session.audio.sample_rate(),
        buffer_size: session.audio.buffer_size(),
        channels: session.audio.channels(),
        device_name: session.audio.device.clone(),
    }
}

/// Open the default cpal output with the session's engine settings.
pub fn open_live(session: &SessionConfig) -> anyhow::Result<LiveEngine> {
    let backend = CpalBackend::new();
    let mut live = LiveEngine::open(&backend, &stream_config(session), session.engine_settings())?;
    live.set_master_volume(session.master_volume);
    Ok(live)
}

/// Pitch of a key position in Hz, or `None` off the keyboard.
pub fn key_frequency(session: &SessionConfig, position: i32) -> Option<f32> {
    let keyboard = session.keyboard();
    let note = keyboard.get(position)?;
    Some(to_frequency(note, session.base_frequency(), session.octave_shift()) as f32)
}

/// Voice id of a key position.
pub fn key_id(position: i32) -> VoiceId {
    VoiceId::Key((position - *KEYBOARD_RANGE.start()) as u32)
}

/// How long a released note keeps sounding.
pub fn release_time(session: &SessionConfig) -> Duration {
    let ms = session.engine.release_ms + session.engine.tail_ms;
    Duration::from_millis(ms as u64 + 20)
}
