//! Audio-rate oscillator for keyboard and metronome voices.
//!
//! Saw and square use PolyBLEP (polynomial band-limited step) correction at
//! their discontinuities. Sine and triangle are computed directly from the
//! phase.

use core::f32::consts::TAU;

use libm::{fabsf, sinf};

/// Timbre of a voice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure fundamental.
    Sine,
    /// Odd harmonics falling at 12 dB/octave. The keyboard's default timbre.
    #[default]
    Triangle,
    /// Odd harmonics falling at 6 dB/octave. The metronome click.
    Square,
    /// All harmonics, brightest.
    Saw,
}

impl Waveform {
    /// All waveforms.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Saw,
    ];

    /// Lowercase name, as accepted by [`Waveform::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Saw => "sawtooth",
        }
    }

    /// Parse a waveform name, returning `None` when unrecognized.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("saw") {
            return Some(Waveform::Saw);
        }
        Self::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(name))
    }

    /// Parse a waveform name. Unrecognized names fall back to the default
    /// timbre.
    ///
    /// ```rust
    /// use octoechos_synth::Waveform;
    ///
    /// assert_eq!(Waveform::from_name("square"), Waveform::Square);
    /// assert_eq!(Waveform::from_name("kazoo"), Waveform::Triangle);
    /// ```
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }
}

impl core::fmt::Display for Waveform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase-accumulator oscillator.
///
/// ```rust
/// use octoechos_synth::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(293.66);
/// osc.set_waveform(Waveform::Square);
/// let sample = osc.advance();
/// assert!(sample.abs() <= 1.1);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Phase in [0.0, 1.0)
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: Waveform,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a 440 Hz triangle oscillator at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
            waveform: Waveform::default(),
        }
    }

    /// Set frequency in Hz. Negative values are treated as zero and the
    /// frequency is capped at Nyquist.
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.clamp(0.0, self.sample_rate * 0.5);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set the waveform. Phase is kept, so the change is continuous in time.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Set sample rate and recalculate the phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Generate the next sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let t = self.phase;
        let dt = self.phase_inc;
        let out = match self.waveform {
            Waveform::Sine => sinf(t * TAU),
            Waveform::Triangle => 1.0 - 4.0 * fabsf(t - 0.5),
            Waveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                let falling = if t >= 0.5 { t - 0.5 } else { t + 0.5 };
                naive + poly_blep(t, dt) - poly_blep(falling, dt)
            }
            Waveform::Saw => 2.0 * t - 1.0 - poly_blep(t, dt),
        };
        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}

/// 4th-order PolyBLEP residual, two samples wide on each side of a step.
///
/// `t` is the phase in [0.0, 1.0), `dt` the phase increment. Returns 0.0 away
/// from the discontinuity.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    const A4: f32 = -43.0 / 48.0;
    const A3: f32 = 7.0 / 6.0;
    const A2: f32 = 0.5;
    const A0: f32 = -1.0;
    const C: f32 = -11.0 / 48.0;

    #[inline]
    fn residual(n: f32) -> f32 {
        if n < 1.0 {
            let n2 = n * n;
            A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0
        } else {
            let u2 = (2.0 - n) * (2.0 - n);
            C * u2 * u2
        }
    }

    if dt <= 0.0 {
        return 0.0;
    }
    let width = 2.0 * dt;
    if t < width {
        residual(t / dt)
    } else if t > 1.0 - width {
        -residual((1.0 - t) / dt)
    } else {
        0.0
    }
}
