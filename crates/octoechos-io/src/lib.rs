//! Audio output layer for octoechos.
//!
//! This crate provides:
//!
//! - **Backends**: the [`AudioBackend`] trait and its cpal implementation
//!   [`CpalBackend`]
//! - **Live playback**: [`LiveEngine`], which runs a
//!   [`ToneEngine`](octoechos_synth::ToneEngine) inside the output callback
//!   and hands out [`EngineHandle`]s to control threads
//! - **Metronome**: [`BeatClock`], a timer thread that strikes clicks through
//!   any [`ToneSink`](octoechos_synth::ToneSink)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use octoechos_io::{BackendStreamConfig, BeatClock, CpalBackend, LiveEngine};
//! use octoechos_synth::{EngineSettings, ToneSink, VoiceId, Waveform};
//!
//! let backend = CpalBackend::new();
//! let live = LiveEngine::open(&backend, &BackendStreamConfig::default(), EngineSettings::default())?;
//!
//! let mut keys = live.handle();
//! keys.start(VoiceId::Key(0), 293.66, Waveform::Triangle);
//!
//! let mut clock = BeatClock::new(live.handle());
//! clock.set_bpm(90)?;
//! clock.start()?;
//! ```

pub mod backend;
pub mod beat_clock;
pub mod cpal_backend;
mod devices;
pub mod live;

pub use backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamControl, StreamHandle,
};
pub use beat_clock::{BeatClock, CLICK_FREQUENCY, CLICK_WAVEFORM};
pub use cpal_backend::CpalBackend;
pub use devices::{AudioDevice, default_output_device, find_output_device_fuzzy, list_devices};
pub use live::{EngineHandle, LiveEngine};

/// Error types for audio output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
