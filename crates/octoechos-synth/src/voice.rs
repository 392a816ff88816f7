//! Voices and the fixed voice pool.
//!
//! A [`Voice`] is one oscillator with a gliding pitch and a gain envelope.
//! The [`VoicePool`] owns a fixed array of them and maps caller ids onto
//! slots. A slot keeps sounding after its id is detached, so a stopped voice
//! can finish its release while the same id starts a fresh one elsewhere.

use octoechos_core::SmoothedParam;

use crate::envelope::{EnvelopeShape, EnvelopeStage, VoiceEnvelope};
use crate::oscillator::{Oscillator, Waveform};

/// Caller-chosen identifier of a voice.
///
/// Numeric keys are used for keyboard positions, tags for named sources
/// such as the metronome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoiceId {
    /// Numeric key, e.g. a key index.
    Key(u32),
    /// Symbolic tag.
    Tag(&'static str),
}

impl VoiceId {
    /// The metronome's tag. Voices started with it are percussive.
    pub const CLICK: VoiceId = VoiceId::Tag("click");

    /// Whether this id names the metronome click.
    pub fn is_click(self) -> bool {
        self == Self::CLICK
    }
}

impl From<u32> for VoiceId {
    fn from(key: u32) -> Self {
        VoiceId::Key(key)
    }
}

impl From<&'static str> for VoiceId {
    fn from(tag: &'static str) -> Self {
        VoiceId::Tag(tag)
    }
}

impl core::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VoiceId::Key(k) => write!(f, "{k}"),
            VoiceId::Tag(t) => f.write_str(t),
        }
    }
}

/// Where a voice is in its life, as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Attack in progress.
    Starting,
    /// Holding at full level.
    Sustaining,
    /// Released and decaying.
    Releasing,
    /// Finished, slot is free.
    Reclaimed,
}

impl From<EnvelopeStage> for Lifecycle {
    fn from(stage: EnvelopeStage) -> Self {
        match stage {
            EnvelopeStage::Attack => Lifecycle::Starting,
            EnvelopeStage::Sustain => Lifecycle::Sustaining,
            EnvelopeStage::Release | EnvelopeStage::Tail => Lifecycle::Releasing,
            EnvelopeStage::Idle => Lifecycle::Reclaimed,
        }
    }
}

/// One sounding oscillator.
#[derive(Debug, Clone)]
pub struct Voice {
    id: Option<VoiceId>,
    oscillator: Oscillator,
    pitch: SmoothedParam,
    envelope: VoiceEnvelope,
    age: u64,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Voice {
    /// Create an idle voice.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            id: None,
            oscillator: Oscillator::new(sample_rate),
            pitch: SmoothedParam::with_config(440.0, sample_rate, 0.0),
            envelope: VoiceEnvelope::new(sample_rate),
            age: 0,
        }
    }

    /// Update the sample rate of every component.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.oscillator.set_sample_rate(sample_rate);
        self.pitch.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);
    }

    /// Start a fresh note with the pitch set without glide.
    ///
    /// An idle voice resets its phase and attacks from silence. A voice that
    /// is still sounding (a stolen slot) keeps its phase and attacks from its
    /// current gain, so the output never steps.
    pub fn trigger(
        &mut self,
        id: Option<VoiceId>,
        frequency: f32,
        waveform: Waveform,
        shape: EnvelopeShape,
        glide_ms: f32,
    ) {
        self.id = id;
        if !self.envelope.is_active() {
            self.oscillator.reset();
        }
        self.oscillator.set_waveform(waveform);
        self.pitch.set_time_constant_ms(glide_ms);
        self.pitch.set_immediate(frequency);
        self.oscillator.set_frequency(frequency);
        self.envelope.trigger(shape);
    }

    /// Glide to a new pitch without touching the envelope.
    pub fn retune(&mut self, frequency: f32, waveform: Waveform) {
        self.pitch.set_target(frequency);
        self.oscillator.set_waveform(waveform);
    }

    /// Make this voice answer to `id` from now on.
    pub fn hand_over(&mut self, id: VoiceId) {
        self.id = Some(id);
    }

    /// Start the release and detach the id.
    pub fn release(&mut self) {
        self.envelope.release();
        self.id = None;
    }

    /// Silence immediately and free the slot.
    pub fn kill(&mut self) {
        self.envelope.kill();
        self.id = None;
    }

    /// The id this voice answers to, if it is still addressable.
    pub fn id(&self) -> Option<VoiceId> {
        self.id
    }

    /// Whether the voice is producing sound.
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Whether the voice is decaying after a release.
    pub fn is_releasing(&self) -> bool {
        self.envelope.is_releasing()
    }

    /// Current lifecycle stage.
    pub fn lifecycle(&self) -> Lifecycle {
        self.envelope.stage().into()
    }

    /// Current envelope gain.
    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    /// Current pitch in Hz, including any glide in progress.
    pub fn frequency(&self) -> f32 {
        self.pitch.get()
    }

    /// Pitch the voice is gliding toward.
    pub fn target_frequency(&self) -> f32 {
        self.pitch.target()
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    /// Allocation order stamp.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Set the allocation order stamp.
    pub fn set_age(&mut self, age: u64) {
        self.age = age;
    }

    /// Generate one sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.envelope.is_active() {
            return 0.0;
        }
        self.oscillator.set_frequency(self.pitch.advance());
        let sample = self.oscillator.advance() * self.envelope.advance();
        if !self.envelope.is_active() {
            self.id = None;
        }
        sample
    }
}

/// Fixed pool of `N` voices.
///
/// ```rust
/// use octoechos_synth::{EnvelopeShape, VoiceId, VoicePool, Waveform};
///
/// let mut pool: VoicePool<4> = VoicePool::new(48000.0);
/// let slot = pool.allocate();
/// pool.voice_mut(slot).trigger(Some(VoiceId::Key(0)), 440.0, Waveform::Sine, EnvelopeShape::NOTE, 5.0);
/// assert_eq!(pool.find(VoiceId::Key(0)), Some(slot));
/// ```
#[derive(Debug)]
pub struct VoicePool<const N: usize> {
    voices: [Voice; N],
    age_counter: u64,
}

impl<const N: usize> VoicePool<N> {
    /// Create a pool of idle voices.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
            age_counter: 0,
        }
    }

    /// Set sample rate for all voices.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Pool size.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Slot of the voice currently answering to `id`.
    pub fn find(&self, id: VoiceId) -> Option<usize> {
        self.voices.iter().position(|v| v.id() == Some(id))
    }

    /// Pick a slot for a new voice and stamp its age.
    ///
    /// Prefers a free slot, then the quietest releasing voice, then the
    /// quietest voice overall (oldest first on ties). The returned slot is
    /// not triggered yet; any id it held is detached.
    pub fn allocate(&mut self) -> usize {
        let idx = self
            .voices
            .iter()
            .position(|v| !v.is_active())
            .or_else(|| Self::quietest(self.voices.iter().enumerate().filter(|(_, v)| v.is_releasing())))
            .or_else(|| Self::quietest(self.voices.iter().enumerate()))
            .unwrap_or(0);
        self.age_counter += 1;
        let voice = &mut self.voices[idx];
        voice.id = None;
        voice.set_age(self.age_counter);
        idx
    }

    fn quietest<'a>(candidates: impl Iterator<Item = (usize, &'a Voice)>) -> Option<usize> {
        candidates
            .min_by(|(_, a), (_, b)| {
                a.level()
                    .total_cmp(&b.level())
                    .then(a.age().cmp(&b.age()))
            })
            .map(|(i, _)| i)
    }

    /// Voice at `slot`.
    pub fn voice(&self, slot: usize) -> &Voice {
        &self.voices[slot]
    }

    /// Mutable voice at `slot`.
    pub fn voice_mut(&mut self, slot: usize) -> &mut Voice {
        &mut self.voices[slot]
    }

    /// All voices.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Number of voices still addressable by an id.
    pub fn live_count(&self) -> usize {
        self.voices.iter().filter(|v| v.id().is_some()).count()
    }

    /// Number of voices producing sound, including detached tails.
    pub fn sounding_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Release every voice.
    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Silence every voice and reset allocation order.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
        self.age_counter = 0;
    }

    /// Sum of all voices for one sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut output = 0.0;
        for voice in &mut self.voices {
            output += voice.process();
        }
        output
    }
}
