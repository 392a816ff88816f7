//! Octoechos Core - pitch theory for the Byzantine modes
//!
//! This crate holds everything that is pure arithmetic: the interval table of
//! the eight Glasuri, keyboard generation, pitch lookup, and the sample-accurate
//! ramps the tone engine shapes its voices with. No allocation, no I/O.
//!
//! # Pitch
//!
//! - [`Glas`] / [`GLASURI`] - The eight modes as seven-step moria cycles
//! - [`NoteName`] - The cyclic solfège names Ni to Zo
//! - [`generate_keyboard`] - Fixed 16-key layout around a mode's tonic
//! - [`to_frequency`] - Cents offset, base frequency and octave shift to Hz
//!
//! ```rust
//! use octoechos_core::{generate_keyboard, to_frequency};
//!
//! let keyboard = generate_keyboard(1);
//! for note in &keyboard {
//!     let hz = to_frequency(note, 293.66, 0);
//!     assert!(hz > 150.0 && hz < 1100.0);
//! }
//! ```
//!
//! # Automation
//!
//! Click-free gain and pitch changes:
//!
//! - [`SmoothedParam`] - Exponential approach with a time constant
//! - [`LinearRamp`] - Linear ramp with an exact duration
//! - [`ExponentialRamp`] - Geometric ramp with an exact duration
//!
//! # Tempo
//!
//! - [`Bpm`] - Clamped metronome tempo
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! octoechos-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod frequency;
pub mod intervals;
pub mod param;
pub mod scale;
pub mod tempo;

pub use frequency::{
    OCTAVE_SHIFT_RANGE, OctaveShift, cents_to_frequency, cents_to_ratio, effective_base,
    ratio_to_cents, to_frequency,
};
pub use intervals::{
    CENTS_PER_MORIA, CENTS_PER_OCTAVE, GLASURI, Genus, Glas, MORIA_PER_OCTAVE, NoteName,
    STEPS_PER_OCTAVE,
};
pub use param::{EXP_RAMP_FLOOR, ExponentialRamp, LinearRamp, SmoothedParam};
pub use scale::{
    KEYBOARD_LEN, KEYBOARD_RANGE, Keyboard, MAX_OCTAVE_MARKS, NoteDefinition, NoteLabel,
    generate_keyboard, moria_sum, moria_to_cents,
};
pub use tempo::{
    BEATS_PER_BAR, BPM_STEP, Bpm, DEFAULT_BPM, MAX_BPM, MIN_BPM, TransportState, beat_in_bar,
};
