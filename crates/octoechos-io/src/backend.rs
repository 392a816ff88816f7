//! Pluggable audio backend abstraction.
//!
//! [`AudioBackend`] decouples the live engine from any specific platform audio
//! API. [`CpalBackend`](crate::CpalBackend) is the default implementation; a
//! deterministic mock backend drives the tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │   LiveEngine / BeatClock / CLI   │
//! └──────────────┬───────────────────┘
//!                │ uses AudioBackend trait
//!                ▼
//! ┌──────────────────────────────────┐
//! │        AudioBackend trait        │
//! │ list_devices / build_output_stream│
//! └──────────────┬───────────────────┘
//!        ┌───────┴────────┐
//!        ▼                ▼
//! ┌─────────────┐  ┌─────────────┐
//! │ CpalBackend │  │ test mocks  │
//! └─────────────┘  └─────────────┘
//! ```
//!
//! The trait uses boxed closures for callbacks rather than generic parameters,
//! which keeps it object-safe. Streams come back as a type-erased
//! [`StreamHandle`] that is built paused and keeps the stream alive until it
//! is dropped.

use crate::{AudioDevice, Result};

/// Configuration for building an audio stream.
///
/// ## Fields
///
/// - `sample_rate`: Requested sample rate in Hz (default: 48000)
/// - `buffer_size`: Preferred buffer size in frames (default: 512)
/// - `channels`: Number of audio channels (default: 2, stereo)
/// - `device_name`: Optional device name filter (uses default device if `None`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of audio channels.
    pub channels: u16,
    /// Optional device name (uses system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 2,
            device_name: None,
        }
    }
}

/// Transport control over a backend-specific stream.
pub trait StreamControl: Send {
    /// Start or resume pulling audio from the callback.
    fn play(&self) -> Result<()>;

    /// Suspend the stream. The callback is not invoked while paused.
    fn pause(&self) -> Result<()>;
}

/// Type-erased audio stream handle.
///
/// The stream lives as long as the handle. Streams are handed out paused;
/// call [`play`](Self::play) to start the callback.
pub struct StreamHandle {
    inner: Box<dyn StreamControl>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream.
    pub fn new<T: StreamControl + 'static>(stream: T) -> Self {
        Self {
            inner: Box::new(stream),
        }
    }

    /// Start or resume the stream.
    pub fn play(&self) -> Result<()> {
        self.inner.play()
    }

    /// Suspend the stream.
    pub fn pause(&self) -> Result<()> {
        self.inner.pause()
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Audio output callback signature.
///
/// Called by the backend on the real-time audio thread with a buffer of
/// interleaved f32 samples (`[L0, R0, L1, R1, ...]`) to fill.
///
/// ## Real-Time Safety
///
/// This callback runs on the audio thread. Implementations must not allocate,
/// lock mutexes, or perform I/O.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Error callback signature.
///
/// Called when the backend encounters an error during streaming.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio backend trait.
///
/// ## Implementing a Custom Backend
///
/// ```rust,ignore
/// use octoechos_io::{AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback,
///                    OutputCallback, Result, StreamHandle};
///
/// struct MyBackend;
///
/// impl AudioBackend for MyBackend {
///     fn name(&self) -> &str { "my-backend" }
///     fn list_devices(&self) -> Result<Vec<AudioDevice>> { Ok(Vec::new()) }
///     fn default_output_device(&self) -> Result<Option<AudioDevice>> { Ok(None) }
///     fn build_output_stream(
///         &self,
///         config: &BackendStreamConfig,
///         callback: OutputCallback,
///         error_callback: ErrorCallback,
///     ) -> Result<StreamHandle> {
///         todo!()
///     }
/// }
/// ```
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g., "cpal", "mock").
    fn name(&self) -> &str;

    /// List all available output devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Get the default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Build an output stream in the paused state.
    ///
    /// ## Arguments
    ///
    /// - `config`: Stream configuration (sample rate, buffer size, channels, device)
    /// - `callback`: Called per audio buffer to generate output samples
    /// - `error_callback`: Called when the backend encounters a streaming error
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Sample rate the backend will actually run `config` at.
    ///
    /// Default implementation returns the requested rate unchanged.
    fn actual_sample_rate(&self, config: &BackendStreamConfig) -> u32 {
        config.sample_rate
    }
}
