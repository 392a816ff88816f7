//! The tone engine: id-addressed voices mixed through a master gain.
//!
//! [`ToneEngine`] lives on the audio thread. Every operation is allocation
//! free and takes effect from the next rendered sample. Control code usually
//! reaches it through a command queue; see [`ToneCommand`] and
//! [`CommandSource`].
//!
//! # Voice rules
//!
//! - `start` on a live id glides that voice to the new pitch. It never adds a
//!   second voice and never restarts the attack.
//! - `stop` begins the release and detaches the id at once. A following
//!   `start` with the same id gets a fresh voice while the old one fades out.
//! - The click tag ([`VoiceId::CLICK`]) always strikes a new self-terminating
//!   voice. Click voices cannot be stopped.
//! - Every gain change is a ramp.
//!
//! ```rust
//! use octoechos_synth::{ToneEngine, VoiceId, Waveform};
//!
//! let mut engine: ToneEngine = ToneEngine::new(48000.0);
//! engine.start(VoiceId::Key(0), 293.66, Waveform::Triangle);
//! engine.start(VoiceId::Key(0), 329.63, Waveform::Triangle); // glide, same voice
//! assert_eq!(engine.live_voice_count(), 1);
//!
//! let mut block = [0.0f32; 256];
//! engine.render(&mut block);
//!
//! engine.stop(VoiceId::Key(0));
//! assert_eq!(engine.live_voice_count(), 0);
//! assert_eq!(engine.sounding_voice_count(), 1);
//! ```

use octoechos_core::SmoothedParam;

use crate::command::{CommandSource, ToneCommand, ToneSink};
use crate::envelope::EnvelopeShape;
use crate::oscillator::Waveform;
use crate::voice::{Lifecycle, Voice, VoiceId, VoicePool};

/// Default voice pool size.
pub const DEFAULT_VOICES: usize = 32;

/// How melodic ids map onto voices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineMode {
    /// One voice per id. Chords and overlapping notes sound together.
    #[default]
    Polyphonic,
    /// All melodic ids share one lead voice that glides between pitches.
    /// Clicks still get their own voices.
    Monophonic,
}

/// Envelope timings and ramp constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineSettings {
    /// Envelope of held notes.
    pub note: EnvelopeShape,
    /// Envelope of metronome clicks.
    pub click: EnvelopeShape,
    /// Time constant of the pitch glide on retune, in ms.
    pub glide_ms: f32,
    /// Time constant of master volume changes, in ms.
    pub master_smoothing_ms: f32,
    /// Voice allocation strategy.
    pub mode: EngineMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            note: EnvelopeShape::NOTE,
            click: EnvelopeShape::CLICK,
            glide_ms: 5.0,
            master_smoothing_ms: 100.0,
            mode: EngineMode::Polyphonic,
        }
    }
}

/// Fixed-capacity voice engine.
#[derive(Debug)]
pub struct ToneEngine<const N: usize = DEFAULT_VOICES> {
    pool: VoicePool<N>,
    master: SmoothedParam,
    settings: EngineSettings,
    sample_rate: f32,
}

impl<const N: usize> ToneEngine<N> {
    /// Create an engine with default settings at full master volume.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_settings(sample_rate, EngineSettings::default())
    }

    /// Create an engine with explicit settings.
    pub fn with_settings(sample_rate: f32, settings: EngineSettings) -> Self {
        Self {
            pool: VoicePool::new(sample_rate),
            master: SmoothedParam::with_config(1.0, sample_rate, settings.master_smoothing_ms),
            settings,
            sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate of every voice and ramp.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.pool.set_sample_rate(sample_rate);
        self.master.set_sample_rate(sample_rate);
    }

    /// Current settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Replace the settings. Voices already sounding keep the envelope they
    /// started with. Switching modes releases the melodic voices.
    pub fn set_settings(&mut self, settings: EngineSettings) {
        let mode_changed = settings.mode != self.settings.mode;
        self.settings = settings;
        self.master.set_time_constant_ms(settings.master_smoothing_ms);
        if mode_changed {
            self.pool.release_all();
        }
    }

    /// Current allocation mode.
    pub fn mode(&self) -> EngineMode {
        self.settings.mode
    }

    /// Switch allocation mode.
    pub fn set_mode(&mut self, mode: EngineMode) {
        self.set_settings(EngineSettings {
            mode,
            ..self.settings
        });
    }

    /// Start a voice, or glide the live voice with this id to `frequency`.
    ///
    /// The click tag strikes a percussive voice instead. Non-finite or
    /// non-positive frequencies are ignored.
    pub fn start(&mut self, id: VoiceId, frequency: f32, waveform: Waveform) {
        if !(frequency.is_finite() && frequency > 0.0) {
            return;
        }
        if id.is_click() {
            self.strike(frequency, waveform);
            return;
        }

        let existing = match self.settings.mode {
            EngineMode::Polyphonic => self.pool.find(id),
            EngineMode::Monophonic => self.lead_slot(),
        };
        if let Some(slot) = existing {
            let voice = self.pool.voice_mut(slot);
            voice.retune(frequency, waveform);
            voice.hand_over(id);
            return;
        }

        let slot = self.pool.allocate();
        self.pool.voice_mut(slot).trigger(
            Some(id),
            frequency,
            waveform,
            self.settings.note,
            self.settings.glide_ms,
        );
    }

    /// Strike a self-terminating click voice. It is never addressable.
    pub fn strike(&mut self, frequency: f32, waveform: Waveform) {
        if !(frequency.is_finite() && frequency > 0.0) {
            return;
        }
        let slot = self.pool.allocate();
        self.pool
            .voice_mut(slot)
            .trigger(None, frequency, waveform, self.settings.click, 0.0);
    }

    /// Release the voice with this id. No-op when the id is not live.
    ///
    /// In monophonic mode only the id that last started the lead releases it.
    pub fn stop(&mut self, id: VoiceId) {
        if let Some(slot) = self.pool.find(id) {
            self.pool.voice_mut(slot).release();
        }
    }

    /// Ramp the master gain toward `level`, clamped to `0.0..=1.0`.
    pub fn set_master_volume(&mut self, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.master.set_target(level);
    }

    /// Target master gain.
    pub fn master_volume(&self) -> f32 {
        self.master.target()
    }

    /// Release every voice.
    pub fn all_notes_off(&mut self) {
        self.pool.release_all();
    }

    /// Silence everything at once. Unlike [`all_notes_off`](Self::all_notes_off)
    /// this steps the output, so it is meant for teardown.
    pub fn reset(&mut self) {
        self.pool.reset();
    }

    /// Lifecycle of the voice answering to `id`, or `None` when the id is not
    /// live.
    pub fn lifecycle(&self, id: VoiceId) -> Option<Lifecycle> {
        self.pool.find(id).map(|slot| self.pool.voice(slot).lifecycle())
    }

    /// Whether `id` is live.
    pub fn is_live(&self, id: VoiceId) -> bool {
        self.pool.find(id).is_some()
    }

    /// Voice answering to `id`.
    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.pool.find(id).map(|slot| self.pool.voice(slot))
    }

    /// Every slot of the pool, including idle and detached voices.
    pub fn voices(&self) -> &[Voice; N] {
        self.pool.voices()
    }

    /// Number of ids currently live.
    pub fn live_voice_count(&self) -> usize {
        self.pool.live_count()
    }

    /// Number of voices producing sound, including released tails and clicks.
    pub fn sounding_voice_count(&self) -> usize {
        self.pool.sounding_count()
    }

    /// Apply one command.
    pub fn apply(&mut self, command: ToneCommand) {
        match command {
            ToneCommand::Start {
                id,
                frequency,
                waveform,
            } => self.start(id, frequency, waveform),
            ToneCommand::Stop { id } => self.stop(id),
            ToneCommand::SetMasterVolume(level) => self.set_master_volume(level),
            ToneCommand::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Apply every pending command from `source`, in order. Returns how many
    /// were applied.
    pub fn drain<S: CommandSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let mut applied = 0;
        while let Some(command) = source.next_command() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    /// Render one mono sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        self.pool.process() * self.master.advance()
    }

    /// Render a mono block.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }

    /// Render an interleaved block, writing the same signal to every channel.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let sample = self.process();
            frame.fill(sample);
        }
    }

    fn lead_slot(&self) -> Option<usize> {
        // Clicks are never addressable, so any live voice is the lead.
        self.pool.voices().iter().position(|v| v.id().is_some())
    }
}

impl<const N: usize> ToneSink for ToneEngine<N> {
    fn send(&mut self, command: ToneCommand) {
        self.apply(command);
    }
}
