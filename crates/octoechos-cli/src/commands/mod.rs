//! CLI command implementations.

pub mod common;
pub mod config;
pub mod devices;
pub mod keyboard;
pub mod metronome;
pub mod modes;
pub mod play;
