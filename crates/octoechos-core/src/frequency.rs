//! Pitch lookup: cents offset plus base frequency and octave shift to Hz.
//!
//! All arithmetic is `f64`. Frequencies are computed as
//! `base * 2^shift * 2^(cents / 1200)`, so a zero-cent note returns the base
//! frequency exactly and every shift multiplies by an exact power of two.

use crate::intervals::CENTS_PER_OCTAVE;
use crate::scale::NoteDefinition;

/// Bounds of the performer's octave transpose control.
pub const OCTAVE_SHIFT_RANGE: (i32, i32) = (-2, 2);

/// An octave transpose clamped to [`OCTAVE_SHIFT_RANGE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OctaveShift(i32);

impl OctaveShift {
    /// Clamp any integer into range.
    pub fn new(shift: i32) -> Self {
        Self(shift.clamp(OCTAVE_SHIFT_RANGE.0, OCTAVE_SHIFT_RANGE.1))
    }

    /// The clamped value.
    pub fn get(self) -> i32 {
        self.0
    }

    /// One octave up, saturating at the upper bound.
    pub fn up(self) -> Self {
        Self::new(self.0 + 1)
    }

    /// One octave down, saturating at the lower bound.
    pub fn down(self) -> Self {
        Self::new(self.0 - 1)
    }

    /// Multiplier applied to the base frequency.
    #[inline]
    pub fn ratio(self) -> f64 {
        let power = f64::from(1u32 << self.0.unsigned_abs());
        if self.0 >= 0 { power } else { 1.0 / power }
    }
}

impl From<i32> for OctaveShift {
    fn from(shift: i32) -> Self {
        Self::new(shift)
    }
}

/// Frequency ratio for a cents interval.
#[inline]
pub fn cents_to_ratio(cents: f64) -> f64 {
    libm::exp2(cents / CENTS_PER_OCTAVE)
}

/// Cents interval for a frequency ratio. Non-positive ratios return 0.
#[inline]
pub fn ratio_to_cents(ratio: f64) -> f64 {
    if ratio <= 0.0 {
        return 0.0;
    }
    libm::log2(ratio) * CENTS_PER_OCTAVE
}

/// Absolute frequency of a cents offset above `base_freq`, transposed by
/// `octave_shift` octaves.
#[inline]
pub fn cents_to_frequency(cents: f64, base_freq: f64, octave_shift: impl Into<OctaveShift>) -> f64 {
    base_freq * octave_shift.into().ratio() * cents_to_ratio(cents)
}

/// Absolute frequency of a keyboard note.
///
/// The octave shift is clamped to `[-2, 2]`.
///
/// ```rust
/// use octoechos_core::{generate_keyboard, to_frequency};
///
/// let kb = generate_keyboard(1);
/// assert_eq!(to_frequency(kb.tonic(), 293.66, 0), 293.66);
/// assert_eq!(to_frequency(kb.tonic(), 293.66, 1), 587.32);
/// ```
#[inline]
pub fn to_frequency(note: &NoteDefinition, base_freq: f64, octave_shift: impl Into<OctaveShift>) -> f64 {
    cents_to_frequency(note.cents_from_base, base_freq, octave_shift)
}

/// Base frequency after applying an octave shift, as shown next to the
/// keyboard.
#[inline]
pub fn effective_base(base_freq: f64, octave_shift: impl Into<OctaveShift>) -> f64 {
    base_freq * octave_shift.into().ratio()
}
