//! Sample-accurate parameter automation.
//!
//! Three ramp shapes cover every gain and pitch change a voice makes:
//!
//! - [`SmoothedParam`]: exponential approach toward a target with a time
//!   constant. Used for pitch glide and master volume.
//! - [`LinearRamp`]: reaches its target after an exact number of samples.
//!   Used for the attack of a note.
//! - [`ExponentialRamp`]: geometric ramp between two positive values over an
//!   exact number of samples. Used for release and click decay.
//!
//! All three are monotonic between their start and target value, so a gain
//! change is never a step.
//!
//! ```rust
//! use octoechos_core::{ExponentialRamp, LinearRamp};
//!
//! let sr = 48000.0;
//! let mut attack = LinearRamp::new(0.0);
//! attack.ramp_to(1.0, LinearRamp::samples_for_ms(50.0, sr));
//! while !attack.is_settled() {
//!     attack.advance();
//! }
//! assert_eq!(attack.get(), 1.0);
//!
//! let mut release = ExponentialRamp::new(1.0);
//! release.ramp_to(0.001, LinearRamp::samples_for_ms(100.0, sr));
//! for _ in 0..4800 {
//!     release.advance();
//! }
//! assert!((release.get() - 0.001).abs() < 1e-6);
//! ```

use libm::{expf, logf};

/// Smallest value an [`ExponentialRamp`] may start from or aim at.
pub const EXP_RAMP_FLOOR: f32 = 1e-5;

/// Convert a duration in milliseconds to a whole number of samples.
#[inline]
fn ms_to_samples(time_ms: f32, sample_rate: f32) -> u32 {
    if time_ms <= 0.0 || sample_rate <= 0.0 {
        0
    } else {
        libm::roundf(time_ms * 0.001 * sample_rate) as u32
    }
}

/// A parameter that approaches its target exponentially.
///
/// Each sample moves a fixed fraction of the remaining distance, like an RC
/// circuit. After one time constant the value has covered about 63% of the
/// distance, after five about 99.3%.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    time_constant_ms: f32,
}

impl SmoothedParam {
    /// Create with an initial value and no smoothing (changes are instant
    /// until a time constant is configured).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            time_constant_ms: 0.0,
        }
    }

    /// Create fully configured.
    ///
    /// # Arguments
    /// * `initial` - Starting value
    /// * `sample_rate` - Sample rate in Hz
    /// * `time_constant_ms` - Time to cover 63% of any change
    pub fn with_config(initial: f32, sample_rate: f32, time_constant_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.time_constant_ms = time_constant_ms;
        param.recalculate_coeff();
        param
    }

    /// Set a new target. The current value keeps moving from where it is.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` with no transition.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate, keeping the time constant.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set the time constant in milliseconds. Zero means instant.
    pub fn set_time_constant_ms(&mut self, time_ms: f32) {
        self.time_constant_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the value is within `1e-6` of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    // coeff = 1 - exp(-1 / (tau * fs))
    fn recalculate_coeff(&mut self) {
        let samples = self.time_constant_ms * 0.001 * self.sample_rate;
        self.coeff = if samples <= 0.0 {
            1.0
        } else {
            1.0 - expf(-1.0 / samples)
        };
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A linear ramp that lands on its target after an exact sample count.
#[derive(Debug, Clone, Default)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    increment: f32,
    remaining: u32,
}

impl LinearRamp {
    /// Create resting at `initial`.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Number of samples in `time_ms` at `sample_rate`, rounded.
    #[inline]
    pub fn samples_for_ms(time_ms: f32, sample_rate: f32) -> u32 {
        ms_to_samples(time_ms, sample_rate)
    }

    /// Ramp from the current value to `target` over `samples` samples.
    /// Zero samples jumps immediately.
    pub fn ramp_to(&mut self, target: f32, samples: u32) {
        self.target = target;
        if samples == 0 {
            self.current = target;
            self.increment = 0.0;
            self.remaining = 0;
        } else {
            self.increment = (target - self.current) / samples as f32;
            self.remaining = samples;
        }
    }

    /// Jump to `value`, cancelling any ramp in progress.
    pub fn set_immediate(&mut self, value: f32) {
        self.ramp_to(value, 0);
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.increment
            };
        }
        self.current
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Samples left until the target is reached.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the ramp has finished.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

/// A geometric ramp between two positive values.
///
/// Each sample multiplies the value by a constant ratio, so the level falls
/// by the same number of decibels per sample. Both endpoints are clamped to
/// [`EXP_RAMP_FLOOR`] because the curve cannot pass through zero.
#[derive(Debug, Clone)]
pub struct ExponentialRamp {
    current: f32,
    target: f32,
    ratio: f32,
    remaining: u32,
}

impl ExponentialRamp {
    /// Create resting at `initial` (clamped to the floor).
    pub fn new(initial: f32) -> Self {
        let initial = initial.max(EXP_RAMP_FLOOR);
        Self {
            current: initial,
            target: initial,
            ratio: 1.0,
            remaining: 0,
        }
    }

    /// Ramp from the current value to `target` over `samples` samples.
    pub fn ramp_to(&mut self, target: f32, samples: u32) {
        let target = target.max(EXP_RAMP_FLOOR);
        self.target = target;
        if samples == 0 {
            self.current = target;
            self.ratio = 1.0;
            self.remaining = 0;
        } else {
            self.ratio = expf(logf(target / self.current) / samples as f32);
            self.remaining = samples;
        }
    }

    /// Restart from `start`, then ramp to `target` over `samples` samples.
    pub fn ramp_between(&mut self, start: f32, target: f32, samples: u32) {
        self.current = start.max(EXP_RAMP_FLOOR);
        self.ramp_to(target, samples);
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current * self.ratio
            };
        }
        self.current
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Samples left until the target is reached.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the ramp has finished.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

impl Default for ExponentialRamp {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothed_param_instant_without_time_constant() {
        let mut param = SmoothedParam::new(1.0);
        param.set_target(0.5);
        assert_eq!(param.advance(), 0.5, "Should snap instantly");
    }

    #[test]
    fn test_smoothed_param_one_time_constant() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        param.set_target(1.0);
        for _ in 0..480 {
            param.advance();
        }
        let expected = 1.0 - expf(-1.0);
        assert!(
            (param.get() - expected).abs() < 0.01,
            "After one time constant, expected ~{}, got {}",
            expected,
            param.get()
        );
    }

    #[test]
    fn test_smoothed_param_retarget_mid_flight() {
        let mut param = SmoothedParam::with_config(440.0, 48000.0, 5.0);
        param.set_target(550.0);
        for _ in 0..48 {
            param.advance();
        }
        let mid = param.get();
        assert!(mid > 440.0 && mid < 550.0, "Glide should be partial, got {mid}");
        param.set_target(440.0);
        assert!(param.advance() < mid, "Should reverse without a jump");
    }

    #[test]
    fn test_linear_ramp_exact_duration() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.ramp_to(1.0, 2400);
        for i in 0..2399 {
            let v = ramp.advance();
            assert!(v < 1.0, "Reached target early at sample {i}");
        }
        assert_eq!(ramp.advance(), 1.0);
        assert!(ramp.is_settled());
    }

    #[test]
    fn test_linear_ramp_zero_samples_jumps() {
        let mut ramp = LinearRamp::new(0.3);
        ramp.ramp_to(0.8, 0);
        assert_eq!(ramp.get(), 0.8);
        assert!(ramp.is_settled());
    }

    #[test]
    fn test_samples_for_ms() {
        assert_eq!(LinearRamp::samples_for_ms(50.0, 48000.0), 2400);
        assert_eq!(LinearRamp::samples_for_ms(100.0, 44100.0), 4410);
        assert_eq!(LinearRamp::samples_for_ms(0.0, 48000.0), 0);
    }

    #[test]
    fn test_exponential_ramp_lands_on_floor() {
        let mut ramp = ExponentialRamp::new(1.0);
        ramp.ramp_to(0.001, 4800);
        let mut prev = ramp.get();
        for _ in 0..4800 {
            let v = ramp.advance();
            assert!(v <= prev, "Release must not rise");
            prev = v;
        }
        assert_eq!(ramp.get(), 0.001);
    }

    #[test]
    fn test_exponential_ramp_halfway_is_geometric_mean() {
        let mut ramp = ExponentialRamp::new(1.0);
        ramp.ramp_to(0.01, 1000);
        for _ in 0..500 {
            ramp.advance();
        }
        assert!(
            (ramp.get() - 0.1).abs() < 1e-3,
            "Expected ~0.1 halfway, got {}",
            ramp.get()
        );
    }

    #[test]
    fn test_exponential_ramp_clamps_zero() {
        let mut ramp = ExponentialRamp::new(0.0);
        assert_eq!(ramp.get(), EXP_RAMP_FLOOR);
        ramp.ramp_between(0.5, 0.0, 10);
        for _ in 0..10 {
            ramp.advance();
        }
        assert_eq!(ramp.get(), EXP_RAMP_FLOOR);
    }
}
