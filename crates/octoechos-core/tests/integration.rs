//! Integration tests for octoechos-core.
//!
//! Exercises the keyboard and pitch lookup together on concrete modes, with
//! expected values worked out by hand from the interval tables.

use octoechos_core::{
    Glas, KEYBOARD_LEN, NoteName, cents_to_ratio, effective_base, generate_keyboard, to_frequency,
};

const BASE_PA: f64 = 293.66;

fn rel_eq(a: f64, b: f64, tol: f64) -> bool {
    ((a - b) / b).abs() <= tol
}

#[test]
fn test_glas_1_reference_pitches() {
    let kb = generate_keyboard(1);
    assert_eq!(kb.glas().base_note, NoteName::Pa);

    let tonic = to_frequency(kb.tonic(), BASE_PA, 0);
    assert_eq!(tonic, BASE_PA);

    let octave = to_frequency(kb.get(7).unwrap(), BASE_PA, 0);
    assert!(rel_eq(octave, 587.32, 1e-6), "octave was {octave}");

    let below = kb.get(-1).unwrap();
    assert!((below.cents_from_base + 200.0).abs() < 1e-9);
    let hz = to_frequency(below, BASE_PA, 0);
    assert!((hz - 261.63).abs() < 0.05, "Ni below Pa was {hz}");
}

#[test]
fn test_every_mode_builds_sixteen_ordered_keys() {
    for glas in Glas::all() {
        let kb = generate_keyboard(glas.id);
        assert_eq!(kb.notes().len(), KEYBOARD_LEN);
        assert_eq!(kb.tonic().name, glas.base_note, "{}", glas.name);
        let tonics = kb.iter().filter(|n| n.is_tonic).count();
        // positions 0 and 7
        assert_eq!(tonics, 2, "{} tonic count", glas.name);
    }
}

#[test]
fn test_hard_chromatic_steps() {
    // Glas 6 on Pa: 6, 20, 4, 12, 6, 20, 4
    let kb = generate_keyboard(6);
    let moria: Vec<i32> = (0..=3).map(|p| kb.get(p).unwrap().moria_from_base).collect();
    assert_eq!(moria, vec![0, 6, 26, 30]);
    assert_eq!(kb.get(-1).unwrap().moria_from_base, -4);
}

#[test]
fn test_keyboard_frequencies_follow_octave_shift() {
    let kb = generate_keyboard(8);
    let base = Glas::lookup(8).base_frequency();
    for note in &kb {
        let plain = to_frequency(note, base, 0);
        let up = to_frequency(note, base, 1);
        let down = to_frequency(note, base, -2);
        assert!(rel_eq(up, plain * 2.0, 1e-12));
        assert!(rel_eq(down, plain * 0.25, 1e-12));
    }
    assert_eq!(effective_base(base, 1), base * 2.0);
}

#[test]
fn test_frequency_matches_ratio_of_cents() {
    let kb = generate_keyboard(2);
    let note = kb.get(3).unwrap();
    let hz = to_frequency(note, 392.0, 0);
    assert!(rel_eq(hz, 392.0 * cents_to_ratio(note.cents_from_base), 1e-12));
}

#[test]
fn test_labels_top_to_bottom() {
    let kb = generate_keyboard(1);
    let labels: Vec<String> = kb.iter().rev().map(|n| n.label().to_string()).collect();
    assert_eq!(labels.first().map(String::as_str), Some("Ke'"));
    assert_eq!(labels.last().map(String::as_str), Some("Di,"));
    assert!(labels.contains(&"Pa".to_string()));
    assert!(labels.contains(&"Pa'".to_string()));
}
