//! Gain envelope for a single voice.
//!
//! A note rises with a linear attack, holds at its peak while held, then falls
//! with an exponential release to a near-silent floor. The oscillator keeps
//! running for a short tail after the release so it does not stop on a
//! ramp. A percussive shape skips the hold and releases as soon as the attack
//! completes.

use octoechos_core::{ExponentialRamp, LinearRamp};

/// Envelope stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Silent, voice is free.
    #[default]
    Idle,
    /// Rising toward the peak.
    Attack,
    /// Holding at the peak.
    Sustain,
    /// Falling toward the floor.
    Release,
    /// Holding at the floor until the oscillator halts.
    Tail,
}

/// Timings and levels of an envelope, in milliseconds and linear gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeShape {
    /// Linear rise time from 0 to `peak`.
    pub attack_ms: f32,
    /// Gain held while sustaining.
    pub peak: f32,
    /// Exponential fall time from the current gain to `floor`.
    pub release_ms: f32,
    /// Gain the release ends on.
    pub floor: f32,
    /// Time the oscillator keeps running after the release ends.
    pub tail_ms: f32,
    /// Whether the envelope holds at its peak until released.
    pub sustain: bool,
}

impl EnvelopeShape {
    /// Held keyboard note: 50 ms attack, 100 ms release to 0.001, halting
    /// 50 ms later.
    pub const NOTE: Self = Self {
        attack_ms: 50.0,
        peak: 1.0,
        release_ms: 100.0,
        floor: 0.001,
        tail_ms: 50.0,
        sustain: true,
    };

    /// Metronome click: starts at 0.5 and decays to 0.001 over 100 ms.
    pub const CLICK: Self = Self {
        attack_ms: 1.0,
        peak: 0.5,
        release_ms: 100.0,
        floor: 0.001,
        tail_ms: 0.0,
        sustain: false,
    };
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self::NOTE
    }
}

/// Per-voice gain envelope.
///
/// ```rust
/// use octoechos_synth::{EnvelopeShape, EnvelopeStage, VoiceEnvelope};
///
/// let mut env = VoiceEnvelope::new(48000.0);
/// env.trigger(EnvelopeShape::NOTE);
/// for _ in 0..2400 {
///     env.advance();
/// }
/// assert_eq!(env.stage(), EnvelopeStage::Sustain);
///
/// env.release();
/// for _ in 0..=(4800 + 2400) {
///     env.advance();
/// }
/// assert_eq!(env.stage(), EnvelopeStage::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct VoiceEnvelope {
    stage: EnvelopeStage,
    shape: EnvelopeShape,
    attack: LinearRamp,
    release: ExponentialRamp,
    tail_remaining: u32,
    level: f32,
    sample_rate: f32,
}

impl VoiceEnvelope {
    /// Create an idle envelope.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stage: EnvelopeStage::Idle,
            shape: EnvelopeShape::NOTE,
            attack: LinearRamp::new(0.0),
            release: ExponentialRamp::default(),
            tail_remaining: 0,
            level: 0.0,
            sample_rate,
        }
    }

    /// Update the sample rate. Ramps already running keep their length in
    /// samples.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Start a fresh attack. An idle envelope rises from silence; one that is
    /// still sounding ramps from its current gain.
    pub fn trigger(&mut self, shape: EnvelopeShape) {
        if !self.is_active() {
            self.level = 0.0;
        }
        self.shape = shape;
        self.attack.set_immediate(self.level);
        self.attack.ramp_to(
            shape.peak,
            LinearRamp::samples_for_ms(shape.attack_ms, self.sample_rate),
        );
        self.tail_remaining = 0;
        self.stage = EnvelopeStage::Attack;
        if self.attack.is_settled() {
            self.level = shape.peak;
            self.enter_hold_or_release();
        }
    }

    /// Begin the release from the current gain. No-op when already releasing
    /// or idle.
    pub fn release(&mut self) {
        match self.stage {
            EnvelopeStage::Attack | EnvelopeStage::Sustain => self.begin_release(),
            EnvelopeStage::Idle | EnvelopeStage::Release | EnvelopeStage::Tail => {}
        }
    }

    /// Silence immediately.
    pub fn kill(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    /// Advance one sample and return the gain.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {}
            EnvelopeStage::Attack => {
                self.level = self.attack.advance();
                if self.attack.is_settled() {
                    self.enter_hold_or_release();
                }
            }
            EnvelopeStage::Sustain => {}
            EnvelopeStage::Release => {
                self.level = self.release.advance();
                if self.release.is_settled() {
                    self.enter_tail();
                }
            }
            EnvelopeStage::Tail => {
                if self.tail_remaining == 0 {
                    self.kill();
                } else {
                    self.tail_remaining -= 1;
                }
            }
        }
        self.level
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current gain.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Whether the envelope is producing sound (any stage but idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Whether the envelope is past its hold (release or tail).
    pub fn is_releasing(&self) -> bool {
        matches!(self.stage, EnvelopeStage::Release | EnvelopeStage::Tail)
    }

    fn enter_hold_or_release(&mut self) {
        if self.shape.sustain {
            self.stage = EnvelopeStage::Sustain;
        } else {
            self.begin_release();
        }
    }

    fn begin_release(&mut self) {
        // A level already below the floor holds instead of rising to it.
        let target = self.shape.floor.min(self.level);
        self.release.ramp_between(
            self.level,
            target,
            LinearRamp::samples_for_ms(self.shape.release_ms, self.sample_rate),
        );
        self.level = self.release.get();
        self.stage = EnvelopeStage::Release;
        if self.release.is_settled() {
            self.enter_tail();
        }
    }

    fn enter_tail(&mut self) {
        self.tail_remaining = LinearRamp::samples_for_ms(self.shape.tail_ms, self.sample_rate);
        self.stage = EnvelopeStage::Tail;
    }
}

impl Default for VoiceEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn run(env: &mut VoiceEnvelope, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| env.advance()).collect()
    }

    #[test]
    fn test_attack_is_linear_and_timed() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::NOTE);
        let out = run(&mut env, 2400);
        assert!((out[1199] - 0.5).abs() < 0.01, "halfway was {}", out[1199]);
        assert_eq!(out[2399], 1.0);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!(out.windows(2).all(|w| w[1] >= w[0]), "attack must rise");
    }

    #[test]
    fn test_release_then_tail_then_idle() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::NOTE);
        run(&mut env, 2400);
        env.release();
        assert_eq!(env.stage(), EnvelopeStage::Release);

        let release = run(&mut env, 4800);
        assert!(release.windows(2).all(|w| w[1] <= w[0]), "release must fall");
        assert!((release[4799] - 0.001).abs() < 1e-6);
        assert_eq!(env.stage(), EnvelopeStage::Tail);

        run(&mut env, 2400);
        assert!(env.is_active(), "tail holds for the full stop delay");
        env.advance();
        assert_eq!(env.stage(), EnvelopeStage::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_release_during_attack_starts_from_current_level() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::NOTE);
        let out = run(&mut env, 600);
        let before = out[599];
        env.release();
        let next = env.advance();
        assert!(next <= before && next > before * 0.9, "{before} -> {next}");
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::NOTE);
        run(&mut env, 2400);
        env.release();
        run(&mut env, 100);
        let level = env.level();
        env.release();
        assert_eq!(env.level(), level);
        assert_eq!(env.stage(), EnvelopeStage::Release);
    }

    #[test]
    fn test_click_self_terminates() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::CLICK);
        let out = run(&mut env, 48 + 4800 + 1);
        let peak = out.iter().copied().fold(0.0, f32::max);
        assert!((peak - 0.5).abs() < 1e-6, "click peak {peak}");
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn test_release_below_floor_does_not_rise() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::NOTE);
        env.advance();
        let start = env.level();
        assert!(start < 0.001);
        env.release();
        for _ in 0..4800 {
            assert!(env.advance() <= start + 1e-7);
        }
    }

    #[test]
    fn test_retrigger_while_sounding_keeps_level() {
        let mut env = VoiceEnvelope::new(SR);
        env.trigger(EnvelopeShape::NOTE);
        run(&mut env, 2400);
        env.release();
        run(&mut env, 240);
        let before = env.level();
        assert!(before > 0.01);

        env.trigger(EnvelopeShape::CLICK);
        assert_eq!(env.stage(), EnvelopeStage::Attack);
        let first = env.advance();
        assert!((first - before).abs() < 0.02, "{before} -> {first}");
    }
}
