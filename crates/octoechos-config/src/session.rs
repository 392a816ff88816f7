//! Session file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use octoechos_core::{
    Bpm, Glas, Keyboard, MAX_BPM, MIN_BPM, OCTAVE_SHIFT_RANGE, OctaveShift, generate_keyboard,
};
use octoechos_synth::{EngineMode, EngineSettings, EnvelopeShape, Waveform};

use crate::error::ConfigError;
use crate::paths;
use crate::validation::{
    ATTACK_MS_RANGE, Adjustment, BASE_FREQUENCY_RANGE, BUFFER_SIZE_RANGE, CHANNELS_RANGE,
    CLICK_DECAY_MS_RANGE, GLIDE_MS_RANGE, LEVEL_RANGE, RELEASE_MS_RANGE, SAMPLE_RATE_RANGE,
    SMOOTHING_MS_RANGE, TAIL_MS_RANGE, clamp_f32, clamp_f64, clamp_int, known_name,
};

/// The performance context of a keyboard session.
///
/// Missing keys take their defaults, so an empty file is a valid session.
/// Integers are read as `i64` so that any value TOML can hold parses and is
/// clamped by [`SessionConfig::normalize`] rather than rejected.
///
/// # TOML Format
///
/// ```toml
/// glas = 1
/// base_frequency = 293.66   # optional, defaults to the mode's base note
/// octave_shift = 0
/// bpm = 60
/// master_volume = 1.0
/// waveform = "triangle"
///
/// [engine]
/// mode = "polyphonic"
/// attack_ms = 50.0
/// release_ms = 100.0
/// tail_ms = 50.0
/// glide_ms = 5.0
/// master_smoothing_ms = 100.0
/// click_level = 0.5
/// click_decay_ms = 100.0
///
/// [audio]
/// sample_rate = 48000
/// buffer_size = 512
/// channels = 2
/// device = "USB"            # optional, substring match
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Selected mode, 1 to 8.
    pub glas: i64,

    /// Frequency of the tonic in Hz. `None` uses the mode's base note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_frequency: Option<f64>,

    /// Whole-octave transposition, -2 to 2.
    pub octave_shift: i64,

    /// Metronome tempo.
    pub bpm: i64,

    /// Output gain, 0 to 1.
    pub master_volume: f32,

    /// Timbre name: `sine`, `triangle`, `square` or `sawtooth`.
    pub waveform: String,

    /// Envelope and voice allocation settings.
    pub engine: EngineSection,

    /// Output stream settings.
    pub audio: AudioSection,
}

/// `[engine]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSection {
    /// `polyphonic` or `monophonic`.
    pub mode: String,
    /// Linear attack of held notes, ms.
    pub attack_ms: f32,
    /// Exponential release of held notes, ms.
    pub release_ms: f32,
    /// Time a released voice keeps running after its release, ms.
    pub tail_ms: f32,
    /// Pitch glide time constant on retune, ms.
    pub glide_ms: f32,
    /// Master volume time constant, ms.
    pub master_smoothing_ms: f32,
    /// Peak level of metronome clicks.
    pub click_level: f32,
    /// Exponential decay of metronome clicks, ms.
    pub click_decay_ms: f32,
}

/// `[audio]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AudioSection {
    /// Requested sample rate in Hz.
    pub sample_rate: i64,
    /// Preferred buffer size in frames.
    pub buffer_size: i64,
    /// Interleaved output channels.
    pub channels: i64,
    /// Output device name filter. `None` uses the system default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            glas: 1,
            base_frequency: None,
            octave_shift: 0,
            bpm: i64::from(Bpm::default().get()),
            master_volume: 1.0,
            waveform: Waveform::default().name().to_string(),
            engine: EngineSection::default(),
            audio: AudioSection::default(),
        }
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            mode: mode_name(settings.mode).to_string(),
            attack_ms: settings.note.attack_ms,
            release_ms: settings.note.release_ms,
            tail_ms: settings.note.tail_ms,
            glide_ms: settings.glide_ms,
            master_smoothing_ms: settings.master_smoothing_ms,
            click_level: settings.click.peak,
            click_decay_ms: settings.click.release_ms,
        }
    }
}

impl Default for AudioSection {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 2,
            device: None,
        }
    }
}

fn octave_range() -> std::ops::RangeInclusive<i64> {
    let (lo, hi) = OCTAVE_SHIFT_RANGE;
    i64::from(lo)..=i64::from(hi)
}

fn bpm_range() -> std::ops::RangeInclusive<i64> {
    i64::from(MIN_BPM)..=i64::from(MAX_BPM)
}

fn mode_name(mode: EngineMode) -> &'static str {
    match mode {
        EngineMode::Polyphonic => "polyphonic",
        EngineMode::Monophonic => "monophonic",
    }
}

fn parse_mode(name: &str) -> Option<EngineMode> {
    match name.trim().to_ascii_lowercase().as_str() {
        "polyphonic" | "poly" => Some(EngineMode::Polyphonic),
        "monophonic" | "mono" => Some(EngineMode::Monophonic),
        _ => None,
    }
}

impl AudioSection {
    /// Sample rate, clamped.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
            .clamp(*SAMPLE_RATE_RANGE.start(), *SAMPLE_RATE_RANGE.end()) as u32
    }

    /// Buffer size in frames, clamped.
    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
            .clamp(*BUFFER_SIZE_RANGE.start(), *BUFFER_SIZE_RANGE.end()) as u32
    }

    /// Channel count, clamped.
    pub fn channels(&self) -> u16 {
        self.channels
            .clamp(*CHANNELS_RANGE.start(), *CHANNELS_RANGE.end()) as u16
    }
}

impl SessionConfig {
    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load the session [`paths::find_session`] selects, or the defaults when
    /// there is none.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match paths::find_session(explicit) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a session from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the session to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Clamp every value into its supported range.
    ///
    /// Returns the corrections made, in field order. Unknown mode ids fall
    /// back to Glas 1, unknown names to their defaults.
    pub fn normalize(&mut self) -> Vec<Adjustment> {
        let mut adj = Vec::new();
        let defaults = EngineSection::default();

        let known = u8::try_from(self.glas).ok().and_then(Glas::get);
        if known.is_none() {
            let fallback = self.glas().id;
            adj.push(Adjustment {
                field: "glas",
                from: self.glas.to_string(),
                to: fallback.to_string(),
            });
            self.glas = i64::from(fallback);
        }
        if let Some(freq) = self.base_frequency {
            let fallback = self.glas().base_frequency();
            if freq <= 0.0 || !freq.is_finite() {
                adj.push(Adjustment {
                    field: "base_frequency",
                    from: freq.to_string(),
                    to: fallback.to_string(),
                });
                self.base_frequency = Some(fallback);
            } else {
                self.base_frequency = Some(clamp_f64(
                    "base_frequency",
                    freq,
                    BASE_FREQUENCY_RANGE,
                    fallback,
                    &mut adj,
                ));
            }
        }
        self.octave_shift = clamp_int("octave_shift", self.octave_shift, octave_range(), &mut adj);
        self.bpm = clamp_int("bpm", self.bpm, bpm_range(), &mut adj);
        self.master_volume =
            clamp_f32("master_volume", self.master_volume, LEVEL_RANGE, 1.0, &mut adj);
        known_name(
            "waveform",
            &mut self.waveform,
            |n| Waveform::parse(n).is_some(),
            Waveform::default().name(),
            &mut adj,
        );

        let e = &mut self.engine;
        known_name(
            "engine.mode",
            &mut e.mode,
            |n| parse_mode(n).is_some(),
            &defaults.mode,
            &mut adj,
        );
        let timings = [
            ("engine.attack_ms", &mut e.attack_ms, ATTACK_MS_RANGE, defaults.attack_ms),
            ("engine.release_ms", &mut e.release_ms, RELEASE_MS_RANGE, defaults.release_ms),
            ("engine.tail_ms", &mut e.tail_ms, TAIL_MS_RANGE, defaults.tail_ms),
            ("engine.glide_ms", &mut e.glide_ms, GLIDE_MS_RANGE, defaults.glide_ms),
            (
                "engine.master_smoothing_ms",
                &mut e.master_smoothing_ms,
                SMOOTHING_MS_RANGE,
                defaults.master_smoothing_ms,
            ),
            ("engine.click_level", &mut e.click_level, LEVEL_RANGE, defaults.click_level),
            (
                "engine.click_decay_ms",
                &mut e.click_decay_ms,
                CLICK_DECAY_MS_RANGE,
                defaults.click_decay_ms,
            ),
        ];
        for (field, value, range, fallback) in timings {
            *value = clamp_f32(field, *value, range, fallback, &mut adj);
        }

        let a = &mut self.audio;
        a.sample_rate = clamp_int("audio.sample_rate", a.sample_rate, SAMPLE_RATE_RANGE, &mut adj);
        a.buffer_size = clamp_int("audio.buffer_size", a.buffer_size, BUFFER_SIZE_RANGE, &mut adj);
        a.channels = clamp_int("audio.channels", a.channels, CHANNELS_RANGE, &mut adj);

        adj
    }

    /// The selected mode. Unknown ids resolve to Glas 1.
    pub fn glas(&self) -> &'static Glas {
        Glas::lookup(u8::try_from(self.glas).unwrap_or(0))
    }

    /// Tonic frequency in Hz before octave shift.
    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or_else(|| self.glas().base_frequency())
    }

    /// Octave shift, clamped.
    pub fn octave_shift(&self) -> OctaveShift {
        let (lo, hi) = OCTAVE_SHIFT_RANGE;
        OctaveShift::new(self.octave_shift.clamp(i64::from(lo), i64::from(hi)) as i32)
    }

    /// Tempo, clamped.
    pub fn tempo(&self) -> Bpm {
        Bpm::new(self.bpm.clamp(i64::from(MIN_BPM), i64::from(MAX_BPM)) as u32)
    }

    /// Timbre. Unknown names resolve to the default.
    pub fn waveform(&self) -> Waveform {
        Waveform::from_name(&self.waveform)
    }

    /// The 16-key layout of the selected mode.
    pub fn keyboard(&self) -> Keyboard {
        generate_keyboard(self.glas().id)
    }

    /// Engine settings described by the `[engine]` table.
    pub fn engine_settings(&self) -> EngineSettings {
        let e = &self.engine;
        let base = EngineSettings::default();
        EngineSettings {
            note: EnvelopeShape {
                attack_ms: e.attack_ms,
                release_ms: e.release_ms,
                tail_ms: e.tail_ms,
                ..base.note
            },
            click: EnvelopeShape {
                peak: e.click_level,
                release_ms: e.click_decay_ms,
                ..base.click
            },
            glide_ms: e.glide_ms,
            master_smoothing_ms: e.master_smoothing_ms,
            mode: parse_mode(&e.mode).unwrap_or_default(),
        }
    }
}
