//! Keyboard generation from a mode's interval cycle.
//!
//! [`generate_keyboard`] walks the fixed position range `-4..=11` around the
//! tonic (position 0) and produces one [`NoteDefinition`] per key. The result
//! is a fixed-size [`Keyboard`] built without heap allocation, so it can be
//! recomputed on every mode change.
//!
//! # Example
//!
//! ```rust
//! use octoechos_core::generate_keyboard;
//!
//! let keyboard = generate_keyboard(1);
//! let tonic = keyboard.tonic();
//! assert_eq!(tonic.cents_from_base, 0.0);
//!
//! let below = keyboard.get(-1).unwrap();
//! assert_eq!(below.moria_from_base, -12);
//! assert!((below.cents_from_base + 200.0).abs() < 1e-9);
//! ```

use core::ops::RangeInclusive;

use crate::intervals::{CENTS_PER_OCTAVE, Glas, MORIA_PER_OCTAVE, NoteName, STEPS_PER_OCTAVE};

/// Relative positions covered by a keyboard: four keys below the tonic, the
/// main octave, and four keys above it.
pub const KEYBOARD_RANGE: RangeInclusive<i32> = -4..=11;

/// Number of keys on a generated keyboard.
pub const KEYBOARD_LEN: usize = 16;

/// A single key of a generated keyboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteDefinition {
    /// Position relative to the tonic (0).
    pub position: i32,
    /// Cyclic note name at this position.
    pub name: NoteName,
    /// Signed distance from the tonic in moria.
    pub moria_from_base: i32,
    /// Signed distance from the tonic in cents.
    pub cents_from_base: f64,
    /// True when this position coincides with the tonic in some octave.
    pub is_tonic: bool,
    /// Octave number relative to the tonic's octave, `floor(position / 7)`.
    pub octave_offset: i32,
}

impl NoteDefinition {
    /// Build the key at `position` for `glas`.
    pub fn at(glas: &Glas, position: i32) -> Self {
        let moria = moria_sum(glas, position);
        Self {
            position,
            name: glas.base_note.offset(position),
            moria_from_base: moria,
            cents_from_base: moria_to_cents(moria),
            is_tonic: position.rem_euclid(STEPS_PER_OCTAVE) == 0,
            octave_offset: position.div_euclid(STEPS_PER_OCTAVE),
        }
    }

    /// Note name with octave marks: one `'` per octave above the tonic's
    /// octave, one `,` per octave below.
    ///
    /// At most [`MAX_OCTAVE_MARKS`] marks are written. The keyboard never
    /// needs more than one; positions further than six octaves from the
    /// tonic all share the six-mark label.
    ///
    /// ```rust
    /// use octoechos_core::generate_keyboard;
    ///
    /// let kb = generate_keyboard(1);
    /// assert_eq!(kb.get(0).unwrap().label().as_str(), "Pa");
    /// assert_eq!(kb.get(7).unwrap().label().as_str(), "Pa'");
    /// assert_eq!(kb.get(-1).unwrap().label().as_str(), "Ni,");
    /// ```
    pub fn label(&self) -> NoteLabel {
        let mark = if self.octave_offset >= 0 { b'\'' } else { b',' };
        let mut label = NoteLabel::new(self.name.name());
        let marks = (self.octave_offset.unsigned_abs() as usize).min(MAX_OCTAVE_MARKS);
        for _ in 0..marks {
            label.push(mark);
        }
        label
    }

    /// Cents offset rounded to the nearest integer, for display.
    pub fn rounded_cents(&self) -> i32 {
        libm::round(self.cents_from_base) as i32
    }
}

const LABEL_CAPACITY: usize = 8;

/// Most octave marks a [`NoteLabel`] carries after the two-letter note name.
pub const MAX_OCTAVE_MARKS: usize = LABEL_CAPACITY - 2;

/// Inline label storage (note name plus octave marks).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NoteLabel {
    bytes: [u8; LABEL_CAPACITY],
    len: u8,
}

impl NoteLabel {
    fn new(name: &str) -> Self {
        let mut label = Self {
            bytes: [0; LABEL_CAPACITY],
            len: 0,
        };
        for &b in name.as_bytes() {
            label.push(b);
        }
        label
    }

    fn push(&mut self, b: u8) {
        if (self.len as usize) < self.bytes.len() {
            self.bytes[self.len as usize] = b;
            self.len += 1;
        }
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever pushed.
        core::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }
}

impl core::fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Debug for NoteLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// Cumulative moria from the tonic to `position`.
///
/// Upward positions add `intervals[j mod 7]` for `j` in `0..position`.
/// Downward positions subtract the interval before each step, reading the
/// cycle backward from index 6.
pub fn moria_sum(glas: &Glas, position: i32) -> i32 {
    if position >= 0 {
        (0..position).map(|j| i32::from(glas.interval(j))).sum()
    } else {
        -(position..0).map(|j| i32::from(glas.interval(j))).sum::<i32>()
    }
}

/// Convert moria to cents.
///
/// Multiplies before dividing so whole octaves come out exact.
#[inline]
pub fn moria_to_cents(moria: i32) -> f64 {
    f64::from(moria) * CENTS_PER_OCTAVE / f64::from(MORIA_PER_OCTAVE)
}

/// The 16 keys generated for one mode, ordered by ascending pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyboard {
    glas: &'static Glas,
    notes: [NoteDefinition; KEYBOARD_LEN],
}

impl Keyboard {
    /// Generate the keyboard for a mode.
    pub fn new(glas: &'static Glas) -> Self {
        let start = *KEYBOARD_RANGE.start();
        let notes = core::array::from_fn(|i| NoteDefinition::at(glas, start + i as i32));
        Self { glas, notes }
    }

    /// The mode this keyboard was generated from.
    pub fn glas(&self) -> &'static Glas {
        self.glas
    }

    /// All keys, lowest first.
    pub fn notes(&self) -> &[NoteDefinition; KEYBOARD_LEN] {
        &self.notes
    }

    /// Key at a relative position, or `None` outside [`KEYBOARD_RANGE`].
    pub fn get(&self, position: i32) -> Option<&NoteDefinition> {
        if KEYBOARD_RANGE.contains(&position) {
            self.notes
                .get((position - *KEYBOARD_RANGE.start()) as usize)
        } else {
            None
        }
    }

    /// The tonic key (position 0).
    pub fn tonic(&self) -> &NoteDefinition {
        &self.notes[(-*KEYBOARD_RANGE.start()) as usize]
    }

    /// Iterate over the keys, lowest first.
    pub fn iter(&self) -> core::slice::Iter<'_, NoteDefinition> {
        self.notes.iter()
    }
}

impl<'a> IntoIterator for &'a Keyboard {
    type Item = &'a NoteDefinition;
    type IntoIter = core::slice::Iter<'a, NoteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

/// Generate the keyboard for a mode id.
///
/// Unknown ids fall back to Glas 1. Pure and deterministic.
pub fn generate_keyboard(glas_id: u8) -> Keyboard {
    Keyboard::new(Glas::lookup(glas_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_covers_fixed_range() {
        let kb = generate_keyboard(1);
        let positions: [i32; KEYBOARD_LEN] = core::array::from_fn(|i| kb.notes()[i].position);
        assert_eq!(positions[0], -4);
        assert_eq!(positions[KEYBOARD_LEN - 1], 11);
        assert!(positions.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_glas_1_names_and_cents() {
        let kb = generate_keyboard(1);
        let tonic = kb.tonic();
        assert_eq!(tonic.name, NoteName::Pa);
        assert!(tonic.is_tonic);
        assert_eq!(tonic.octave_offset, 0);

        let up = kb.get(1).unwrap();
        assert_eq!(up.name, NoteName::Vu);
        assert_eq!(up.moria_from_base, 10);

        let octave = kb.get(7).unwrap();
        assert_eq!(octave.cents_from_base, 1200.0);
        assert!(octave.is_tonic);
        assert_eq!(octave.octave_offset, 1);
    }

    #[test]
    fn test_downward_sum_reads_cycle_backward() {
        let kb = generate_keyboard(1);
        // [10, 8, 12, 12, 10, 8, 12] read backward: 12, 8, 10, 12
        let expected = [-12, -20, -30, -42];
        for (k, &m) in expected.iter().enumerate() {
            let pos = -(k as i32) - 1;
            assert_eq!(kb.get(pos).unwrap().moria_from_base, m, "position {pos}");
            assert_eq!(kb.get(pos).unwrap().octave_offset, -1);
        }
        assert_eq!(kb.get(-1).unwrap().name, NoteName::Ni);
        assert_eq!(kb.get(-4).unwrap().name, NoteName::Di);
    }

    #[test]
    fn test_unknown_mode_matches_first() {
        assert_eq!(generate_keyboard(0), generate_keyboard(1));
        assert_eq!(generate_keyboard(200).glas().id, 1);
    }

    #[test]
    fn test_regeneration_is_identical() {
        for id in 1..=8 {
            assert_eq!(generate_keyboard(id), generate_keyboard(id));
        }
    }

    #[test]
    fn test_out_of_range_position_is_none() {
        let kb = generate_keyboard(3);
        assert!(kb.get(-5).is_none());
        assert!(kb.get(12).is_none());
    }

    #[test]
    fn test_labels_carry_octave_marks() {
        let kb = generate_keyboard(8);
        assert_eq!(kb.get(0).unwrap().label().as_str(), "Ni");
        assert_eq!(kb.get(8).unwrap().label().as_str(), "Pa'");
        assert_eq!(kb.get(-3).unwrap().label().as_str(), "Ke,");
    }

    #[test]
    fn test_rounded_cents() {
        let kb = generate_keyboard(1);
        // 10 moria = 166.67 cents
        assert_eq!(kb.get(1).unwrap().rounded_cents(), 167);
        assert_eq!(kb.get(-1).unwrap().rounded_cents(), -200);
    }

    #[test]
    fn far_labels_stop_at_the_mark_cap() {
        let glas = Glas::lookup(1);
        assert_eq!(NoteDefinition::at(glas, 42).label().as_str(), "Pa''''''");
        assert_eq!(NoteDefinition::at(glas, 700).label().as_str(), "Pa''''''");
        assert_eq!(NoteDefinition::at(glas, -43).label().as_str(), "Ni,,,,,,");
    }
}
