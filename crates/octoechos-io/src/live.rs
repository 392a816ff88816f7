//! Live playback: a tone engine inside the output callback.
//!
//! [`LiveEngine::open`] moves a [`ToneEngine`] into the backend's output
//! callback and connects it to the control side with an unbounded crossbeam
//! channel. Each callback drains the channel before rendering, so commands
//! take effect at the start of the next block, in the order they were sent.
//!
//! The stream is built suspended. The first `start` resumes it; a resume that
//! fails is logged and tried again on the following `start`, never reported to
//! the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Sender, unbounded};
use octoechos_synth::{EngineSettings, ToneCommand, ToneEngine, ToneSink};
use parking_lot::Mutex;

use crate::Result;
use crate::backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};

/// Suspend/resume state of the output stream, shared by every handle.
#[derive(Debug)]
struct DeviceGate {
    stream: Mutex<StreamHandle>,
    suspended: AtomicBool,
}

impl DeviceGate {
    fn new(stream: StreamHandle) -> Self {
        Self {
            stream: Mutex::new(stream),
            suspended: AtomicBool::new(true),
        }
    }

    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    /// Resume the stream if it is suspended. Returns whether it is running.
    fn ensure_running(&self) -> bool {
        if !self.is_suspended() {
            return true;
        }
        let stream = self.stream.lock();
        if !self.is_suspended() {
            return true;
        }
        match stream.play() {
            Ok(()) => {
                self.suspended.store(false, Ordering::Release);
                tracing::info!("audio output resumed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "audio output resume failed, retrying on next start");
                false
            }
        }
    }

    fn suspend(&self) -> Result<()> {
        let stream = self.stream.lock();
        if self.is_suspended() {
            return Ok(());
        }
        stream.pause()?;
        self.suspended.store(true, Ordering::Release);
        tracing::info!("audio output suspended");
        Ok(())
    }
}

/// Control-side sender to a running [`LiveEngine`].
///
/// Cloneable and `Send + Sync`. Keyboard threads and the
/// [`BeatClock`](crate::BeatClock) each hold their own clone.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: Sender<ToneCommand>,
    gate: Arc<DeviceGate>,
}

impl EngineHandle {
    /// Whether the output stream is currently suspended.
    pub fn is_suspended(&self) -> bool {
        self.gate.is_suspended()
    }
}

impl ToneSink for EngineHandle {
    fn send(&mut self, command: ToneCommand) {
        if matches!(command, ToneCommand::Start { .. }) {
            self.gate.ensure_running();
        }
        if self.tx.send(command).is_err() {
            tracing::debug!(?command, "audio callback gone, command dropped");
        }
    }
}

/// A [`ToneEngine`] running on the audio thread of an output stream.
///
/// Dropping the `LiveEngine` drops the stream once every [`EngineHandle`]
/// is gone as well.
#[derive(Debug)]
pub struct LiveEngine {
    handle: EngineHandle,
    sample_rate: u32,
    channels: u16,
}

impl LiveEngine {
    /// Build a suspended output stream driven by a fresh engine.
    pub fn open(
        backend: &dyn AudioBackend,
        config: &BackendStreamConfig,
        settings: EngineSettings,
    ) -> Result<Self> {
        let sample_rate = backend.actual_sample_rate(config);
        let channels = config.channels.max(1);
        let (tx, rx) = unbounded::<ToneCommand>();

        let mut engine: ToneEngine = ToneEngine::with_settings(sample_rate as f32, settings);
        let frame_channels = channels as usize;
        let callback: OutputCallback = Box::new(move |data: &mut [f32]| {
            engine.drain(&mut || rx.try_recv().ok());
            engine.render_interleaved(data, frame_channels);
        });
        let on_error: ErrorCallback = Box::new(|err: &str| {
            tracing::error!(error = err, "audio stream error");
        });

        let stream = backend.build_output_stream(config, callback, on_error)?;
        tracing::info!(
            backend = backend.name(),
            sample_rate,
            channels,
            mode = ?settings.mode,
            "live engine opened"
        );

        Ok(Self {
            handle: EngineHandle {
                tx,
                gate: Arc::new(DeviceGate::new(stream)),
            },
            sample_rate,
            channels,
        })
    }

    /// A new control handle.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Sample rate the engine renders at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Whether the output stream is currently suspended.
    pub fn is_suspended(&self) -> bool {
        self.handle.is_suspended()
    }

    /// Resume the stream now instead of waiting for the first `start`.
    ///
    /// Returns `false` when the device refused; the next `start` retries.
    pub fn resume(&self) -> bool {
        self.handle.gate.ensure_running()
    }

    /// Suspend the output stream. The next `start` resumes it.
    pub fn suspend(&self) -> Result<()> {
        self.handle.gate.suspend()
    }
}

impl ToneSink for LiveEngine {
    fn send(&mut self, command: ToneCommand) {
        self.handle.send(command);
    }
}
