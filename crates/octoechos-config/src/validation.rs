//! Range checks for session values.
//!
//! Every check clamps or defaults instead of failing: a slightly wrong value
//! is better than a silent instrument. Each correction is recorded as an
//! [`Adjustment`] so the caller can log it.
//!
//! # Example
//!
//! ```rust
//! use octoechos_config::validation::{Adjustment, clamp_int};
//!
//! let mut adjustments = Vec::new();
//! assert_eq!(clamp_int("bpm", 10, 30..=240, &mut adjustments), 30);
//! assert_eq!(adjustments[0].to_string(), "bpm: 10 -> 30");
//! ```

use std::fmt;
use std::ops::RangeInclusive;

/// Supported base frequencies in Hz.
pub const BASE_FREQUENCY_RANGE: RangeInclusive<f64> = 20.0..=2000.0;
/// Attack time of held notes, ms.
pub const ATTACK_MS_RANGE: RangeInclusive<f32> = 1.0..=2000.0;
/// Release time of held notes, ms.
pub const RELEASE_MS_RANGE: RangeInclusive<f32> = 1.0..=5000.0;
/// Silent tail before a released voice is reclaimed, ms.
pub const TAIL_MS_RANGE: RangeInclusive<f32> = 0.0..=1000.0;
/// Pitch glide time constant, ms.
pub const GLIDE_MS_RANGE: RangeInclusive<f32> = 1.0..=500.0;
/// Master volume smoothing time constant, ms.
pub const SMOOTHING_MS_RANGE: RangeInclusive<f32> = 1.0..=2000.0;
/// Click decay time, ms.
pub const CLICK_DECAY_MS_RANGE: RangeInclusive<f32> = 1.0..=1000.0;
/// Linear gain levels.
pub const LEVEL_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Stream sample rates in Hz.
pub const SAMPLE_RATE_RANGE: RangeInclusive<i64> = 8000..=192_000;
/// Stream buffer sizes in frames.
pub const BUFFER_SIZE_RANGE: RangeInclusive<i64> = 16..=8192;
/// Stream channel counts.
pub const CHANNELS_RANGE: RangeInclusive<i64> = 1..=8;

/// A value that was corrected during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    /// Dotted key of the corrected value, e.g. `engine.attack_ms`.
    pub field: &'static str,
    /// Value as written.
    pub from: String,
    /// Value in effect.
    pub to: String,
}

impl Adjustment {
    fn record(
        adjustments: &mut Vec<Adjustment>,
        field: &'static str,
        from: impl fmt::Display,
        to: impl fmt::Display,
    ) {
        adjustments.push(Adjustment {
            field,
            from: from.to_string(),
            to: to.to_string(),
        });
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.from, self.to)
    }
}

/// Clamp an integer into `range`.
pub fn clamp_int<T>(
    field: &'static str,
    value: T,
    range: RangeInclusive<T>,
    adjustments: &mut Vec<Adjustment>,
) -> T
where
    T: Ord + Copy + fmt::Display,
{
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        Adjustment::record(adjustments, field, value, clamped);
    }
    clamped
}

/// Clamp a float into `range`. NaN becomes `fallback`.
pub fn clamp_f32(
    field: &'static str,
    value: f32,
    range: RangeInclusive<f32>,
    fallback: f32,
    adjustments: &mut Vec<Adjustment>,
) -> f32 {
    let clamped = if value.is_nan() {
        fallback
    } else {
        value.clamp(*range.start(), *range.end())
    };
    if clamped != value {
        Adjustment::record(adjustments, field, value, clamped);
    }
    clamped
}

/// Clamp a float into `range`. NaN becomes `fallback`.
pub fn clamp_f64(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
    fallback: f64,
    adjustments: &mut Vec<Adjustment>,
) -> f64 {
    let clamped = if value.is_nan() {
        fallback
    } else {
        value.clamp(*range.start(), *range.end())
    };
    if clamped != value {
        Adjustment::record(adjustments, field, value, clamped);
    }
    clamped
}

/// Replace a name that `known` rejects with `fallback`.
pub fn known_name(
    field: &'static str,
    value: &mut String,
    known: impl Fn(&str) -> bool,
    fallback: &str,
    adjustments: &mut Vec<Adjustment>,
) {
    if !known(value) {
        Adjustment::record(adjustments, field, format!("{value:?}"), format!("{fallback:?}"));
        *value = fallback.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_pass_silently() {
        let mut adj = Vec::new();
        assert_eq!(clamp_int("bpm", 120, 30..=240, &mut adj), 120);
        assert_eq!(clamp_int("octave_shift", -2, -2..=2, &mut adj), -2);
        assert_eq!(clamp_f32("master_volume", 0.5, LEVEL_RANGE, 1.0, &mut adj), 0.5);
        assert!(adj.is_empty());
    }

    #[test]
    fn out_of_range_values_clamp_and_record() {
        let mut adj = Vec::new();
        assert_eq!(clamp_int("octave_shift", 5, -2..=2, &mut adj), 2);
        assert_eq!(clamp_int("audio.channels", 0, CHANNELS_RANGE, &mut adj), 1);
        assert_eq!(clamp_int("bpm", -1, 30..=240, &mut adj), 30);
        assert_eq!(adj.len(), 3);
        assert_eq!(adj[0].to_string(), "octave_shift: 5 -> 2");
        assert_eq!(adj[1].field, "audio.channels");
    }

    #[test]
    fn nan_takes_fallback() {
        let mut adj = Vec::new();
        let v = clamp_f32("master_volume", f32::NAN, LEVEL_RANGE, 1.0, &mut adj);
        assert_eq!(v, 1.0);
        assert_eq!(adj.len(), 1);

        let f = clamp_f64("base_frequency", f64::NAN, BASE_FREQUENCY_RANGE, 440.0, &mut adj);
        assert_eq!(f, 440.0);
        assert_eq!(adj.len(), 2);
    }

    #[test]
    fn unknown_name_falls_back() {
        let mut adj = Vec::new();
        let mut name = "kazoo".to_string();
        known_name("waveform", &mut name, |n| n == "sine", "sine", &mut adj);
        assert_eq!(name, "sine");
        assert_eq!(adj[0].to_string(), "waveform: \"kazoo\" -> \"sine\"");

        let mut ok = "sine".to_string();
        known_name("waveform", &mut ok, |n| n == "sine", "sine", &mut adj);
        assert_eq!(adj.len(), 1);
    }
}
