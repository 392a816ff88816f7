//! Octoechos Synth - the tone engine behind the keyboard
//!
//! Voices are addressed by caller-supplied ids, shaped by click-free
//! envelopes, and mixed through a smoothed master gain. Everything here is
//! allocation free and safe to run inside an audio callback.
//!
//! # Core Components
//!
//! - [`ToneEngine`] - Fixed pool of voices keyed by [`VoiceId`]
//! - [`ToneCommand`] / [`CommandSource`] - Queued control for the audio thread
//! - [`ToneSink`] - Plain `start` / `stop` / `set_master_volume` interface
//! - [`Oscillator`] / [`Waveform`] - Band-limited oscillator
//! - [`VoiceEnvelope`] / [`EnvelopeShape`] - Attack, hold, release and tail
//!
//! ```rust
//! use octoechos_synth::{ToneCommand, ToneEngine, VoiceId, Waveform};
//!
//! let mut engine: ToneEngine<16> = ToneEngine::new(48000.0);
//! let mut pending = vec![
//!     ToneCommand::Start { id: VoiceId::Key(0), frequency: 293.66, waveform: Waveform::Triangle },
//!     ToneCommand::Start { id: VoiceId::CLICK, frequency: 880.0, waveform: Waveform::Square },
//! ]
//! .into_iter();
//!
//! let mut block = vec![0.0f32; 512];
//! engine.drain(&mut || pending.next());
//! engine.render(&mut block);
//! assert_eq!(engine.sounding_voice_count(), 2);
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! octoechos-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod engine;
pub mod envelope;
pub mod oscillator;
pub mod voice;

pub use command::{CommandSource, ToneCommand, ToneSink};
pub use engine::{DEFAULT_VOICES, EngineMode, EngineSettings, ToneEngine};
pub use envelope::{EnvelopeShape, EnvelopeStage, VoiceEnvelope};
pub use oscillator::{Oscillator, Waveform};
pub use voice::{Lifecycle, Voice, VoiceId, VoicePool};
