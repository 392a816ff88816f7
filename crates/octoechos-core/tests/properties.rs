//! Property-based tests for octoechos-core pitch math and ramps.
//!
//! Covers the keyboard laws that must hold for every mode (tonic spacing,
//! octave spacing, ordering) and monotonicity of the automation ramps.

use octoechos_core::{
    ExponentialRamp, GLASURI, KEYBOARD_RANGE, LinearRamp, MORIA_PER_OCTAVE, NoteDefinition,
    SmoothedParam, generate_keyboard, to_frequency,
};

use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// isTonic holds exactly at multiples of 7, and the octave offset is the
    /// floored division by 7.
    #[test]
    fn tonic_and_octave_offset_laws(glas in 1u8..=8, position in KEYBOARD_RANGE) {
        let kb = generate_keyboard(glas);
        let note = kb.get(position).unwrap();
        prop_assert_eq!(note.is_tonic, position.rem_euclid(7) == 0);
        prop_assert_eq!(note.octave_offset, (f64::from(position) / 7.0).floor() as i32);
    }

    /// Seven positions apart is always exactly one octave.
    #[test]
    fn seven_steps_is_1200_cents(glas in 1u8..=8, position in -4i32..=4) {
        let kb = generate_keyboard(glas);
        let low = kb.get(position).unwrap();
        let high = kb.get(position + 7).unwrap();
        prop_assert!((high.cents_from_base - low.cents_from_base - 1200.0).abs() < 1e-9);
        prop_assert_eq!(high.name, low.name);
    }

    /// The same law holds beyond the keyboard range, including below -4.
    #[test]
    fn octave_law_extends_past_keyboard(idx in 0usize..8, position in -30i32..30) {
        let glas = &GLASURI[idx];
        let a = NoteDefinition::at(glas, position);
        let b = NoteDefinition::at(glas, position + 7);
        prop_assert_eq!(b.moria_from_base - a.moria_from_base, MORIA_PER_OCTAVE as i32);
    }

    /// Keys are strictly ascending in pitch.
    #[test]
    fn keyboard_is_ordered_by_pitch(glas in any::<u8>()) {
        let kb = generate_keyboard(glas);
        for pair in kb.notes().windows(2) {
            prop_assert!(pair[1].cents_from_base > pair[0].cents_from_base);
        }
    }

    /// Any id outside 1..=8 produces the Glas 1 keyboard.
    #[test]
    fn unknown_ids_fall_back(glas in 9u8..=255) {
        prop_assert_eq!(generate_keyboard(glas), generate_keyboard(1));
    }

    /// A zero-cent note returns the base frequency exactly.
    #[test]
    fn tonic_round_trip(glas in 1u8..=8, base in 20.0f64..2000.0) {
        let kb = generate_keyboard(glas);
        prop_assert_eq!(to_frequency(kb.tonic(), base, 0), base);
    }

    /// Shifting by s octaves multiplies the frequency by 2^s.
    #[test]
    fn octave_shift_law(
        glas in 1u8..=8,
        position in KEYBOARD_RANGE,
        base in 20.0f64..2000.0,
        shift in -2i32..=2,
    ) {
        let kb = generate_keyboard(glas);
        let note = kb.get(position).unwrap();
        let shifted = to_frequency(note, base, shift);
        let expected = to_frequency(note, base, 0) * 2f64.powi(shift);
        prop_assert!(
            ((shifted - expected) / expected).abs() <= 1e-12,
            "shift {} gave {} expected {}", shift, shifted, expected
        );
    }

    /// Linear ramps never overshoot and finish on time.
    #[test]
    fn linear_ramp_is_monotonic(start in 0.0f32..1.0, target in 0.0f32..1.0, samples in 1u32..5000) {
        let mut ramp = LinearRamp::new(start);
        ramp.ramp_to(target, samples);
        let rising = target >= start;
        let mut prev = start;
        for _ in 0..samples {
            let v = ramp.advance();
            if rising {
                prop_assert!(v >= prev - 1e-6 && v <= target + 1e-6);
            } else {
                prop_assert!(v <= prev + 1e-6 && v >= target - 1e-6);
            }
            prev = v;
        }
        prop_assert_eq!(ramp.get(), target);
    }

    /// Exponential ramps never overshoot and finish on time.
    #[test]
    fn exponential_ramp_is_monotonic(start in 0.001f32..1.0, target in 0.001f32..1.0, samples in 1u32..5000) {
        let mut ramp = ExponentialRamp::new(start);
        ramp.ramp_to(target, samples);
        let rising = target >= start;
        let mut prev = start;
        for _ in 0..samples {
            let v = ramp.advance();
            if rising {
                prop_assert!(v >= prev * (1.0 - 1e-5));
            } else {
                prop_assert!(v <= prev * (1.0 + 1e-5));
            }
            prev = v;
        }
        prop_assert_eq!(ramp.get(), target);
    }

    /// Exponential smoothing approaches without crossing the target.
    #[test]
    fn smoothed_param_never_overshoots(start in -1.0f32..1.0, target in -1.0f32..1.0, tc in 0.5f32..200.0) {
        let mut param = SmoothedParam::with_config(start, 48000.0, tc);
        param.set_target(target);
        for _ in 0..2048 {
            let v = param.advance();
            if target >= start {
                prop_assert!(v <= target + 1e-6);
            } else {
                prop_assert!(v >= target - 1e-6);
            }
        }
    }
}
