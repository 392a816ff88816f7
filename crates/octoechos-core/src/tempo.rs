//! Metronome tempo.
//!
//! [`Bpm`] is always within the supported range: out-of-range values are
//! clamped on construction, never rejected.

use core::time::Duration;

/// Slowest supported tempo.
pub const MIN_BPM: u32 = 30;
/// Fastest supported tempo.
pub const MAX_BPM: u32 = 240;
/// Tempo used when none is configured.
pub const DEFAULT_BPM: u32 = 60;
/// Increment of the tempo up/down controls.
pub const BPM_STEP: u32 = 5;
/// Beats per bar shown by the visual beat counter.
pub const BEATS_PER_BAR: u32 = 4;

/// Beats per minute, clamped to `[MIN_BPM, MAX_BPM]`.
///
/// ```rust
/// use octoechos_core::Bpm;
///
/// assert_eq!(Bpm::new(60).interval_ms(), 1000.0);
/// assert_eq!(Bpm::new(1000).get(), 240);
/// assert_eq!(Bpm::new(0).get(), 30);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bpm(u32);

impl Bpm {
    /// Clamp any value into range.
    pub fn new(bpm: u32) -> Self {
        Self(bpm.clamp(MIN_BPM, MAX_BPM))
    }

    /// The clamped tempo.
    pub fn get(self) -> u32 {
        self.0
    }

    /// One step faster, saturating at [`MAX_BPM`].
    pub fn faster(self) -> Self {
        Self::new(self.0.saturating_add(BPM_STEP))
    }

    /// One step slower, saturating at [`MIN_BPM`].
    pub fn slower(self) -> Self {
        Self::new(self.0.saturating_sub(BPM_STEP))
    }

    /// Milliseconds between beats, `60000 / bpm`.
    pub fn interval_ms(self) -> f64 {
        60_000.0 / f64::from(self.0)
    }

    /// Time between beats.
    pub fn interval(self) -> Duration {
        Duration::from_nanos(60_000_000_000 / u64::from(self.0))
    }

    /// Samples between beats at `sample_rate`.
    pub fn samples_per_beat(self, sample_rate: f32) -> f32 {
        sample_rate * 60.0 / self.0 as f32
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self(DEFAULT_BPM)
    }
}

impl From<u32> for Bpm {
    fn from(bpm: u32) -> Self {
        Self::new(bpm)
    }
}

impl core::fmt::Display for Bpm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}

/// Whether a clock is producing beats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    /// Not ticking.
    #[default]
    Stopped,
    /// Ticking at the current tempo.
    Playing,
}

/// Position within the bar after `ticks` beats, in `0..BEATS_PER_BAR`.
#[inline]
pub fn beat_in_bar(ticks: u64) -> u32 {
    (ticks % u64::from(BEATS_PER_BAR)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_matches_bpm() {
        assert_eq!(Bpm::new(60).interval(), Duration::from_secs(1));
        assert_eq!(Bpm::new(120).interval(), Duration::from_millis(500));
        assert_eq!(Bpm::new(240).interval(), Duration::from_millis(250));
        assert_eq!(Bpm::new(30).interval_ms(), 2000.0);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Bpm::new(10).get(), MIN_BPM);
        assert_eq!(Bpm::new(500).get(), MAX_BPM);
        assert_eq!(Bpm::default().get(), DEFAULT_BPM);
    }

    #[test]
    fn test_step_controls_saturate() {
        assert_eq!(Bpm::new(60).faster().get(), 65);
        assert_eq!(Bpm::new(60).slower().get(), 55);
        assert_eq!(Bpm::new(240).faster().get(), 240);
        assert_eq!(Bpm::new(30).slower().get(), 30);
    }

    #[test]
    fn test_samples_per_beat() {
        assert_eq!(Bpm::new(120).samples_per_beat(48000.0), 24000.0);
    }

    #[test]
    fn test_beat_in_bar_wraps() {
        assert_eq!(beat_in_bar(0), 0);
        assert_eq!(beat_in_bar(3), 3);
        assert_eq!(beat_in_bar(4), 0);
        assert_eq!(beat_in_bar(9), 1);
    }
}
