//! Metronome timer thread.
//!
//! A [`BeatClock`] owns at most one timer thread. The thread waits on a
//! crossbeam [`tick`] channel and a stop channel; each tick strikes a click
//! through the clock's [`ToneSink`]. The first click lands one interval after
//! [`start`](BeatClock::start).
//!
//! Changing the tempo while running stops and joins the old thread before
//! the new one is spawned, so two timers never overlap.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, select, tick};
use octoechos_core::{Bpm, TransportState, beat_in_bar};
use octoechos_synth::{ToneSink, VoiceId, Waveform};

use crate::Result;

/// Pitch of the metronome click in Hz.
pub const CLICK_FREQUENCY: f32 = 880.0;

/// Timbre of the metronome click.
pub const CLICK_WAVEFORM: Waveform = Waveform::Square;

struct Timer {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

/// Periodic click generator.
///
/// ```rust,ignore
/// let mut clock = BeatClock::new(live.handle());
/// clock.set_bpm(120)?;
/// clock.start()?;
/// ```
pub struct BeatClock<S> {
    sink: S,
    bpm: Bpm,
    ticks: Arc<AtomicU64>,
    timer: Option<Timer>,
}

impl<S> BeatClock<S>
where
    S: ToneSink + Clone + Send + 'static,
{
    /// A stopped clock at the default tempo.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            bpm: Bpm::default(),
            ticks: Arc::new(AtomicU64::new(0)),
            timer: None,
        }
    }

    /// Current tempo.
    pub fn bpm(&self) -> Bpm {
        self.bpm
    }

    /// Change the tempo, clamped to the supported range.
    ///
    /// A running clock restarts on the new interval. The beat count carries
    /// over.
    pub fn set_bpm(&mut self, bpm: u32) -> Result<()> {
        let bpm = Bpm::new(bpm);
        if bpm == self.bpm {
            return Ok(());
        }
        self.bpm = bpm;
        if self.timer.is_some() {
            self.halt();
            self.spawn()?;
        }
        tracing::debug!(bpm = bpm.get(), running = self.is_running(), "tempo changed");
        Ok(())
    }

    /// Start clicking. No-op when already running.
    pub fn start(&mut self) -> Result<()> {
        if self.timer.is_some() {
            return Ok(());
        }
        self.spawn()?;
        tracing::info!(bpm = self.bpm.get(), "beat clock started");
        Ok(())
    }

    /// Stop clicking and reset the beat count. No-op when stopped.
    pub fn stop(&mut self) {
        if self.timer.is_none() {
            return;
        }
        self.halt();
        self.ticks.store(0, Ordering::Release);
        tracing::info!("beat clock stopped");
    }

    /// Whether the timer thread is running.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Transport state of the clock.
    pub fn transport(&self) -> TransportState {
        if self.is_running() {
            TransportState::Playing
        } else {
            TransportState::Stopped
        }
    }

    /// Clicks struck since the last start.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Position in the bar, `0..4`.
    pub fn beat(&self) -> u32 {
        beat_in_bar(self.ticks())
    }

    fn spawn(&mut self) -> Result<()> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let interval = self.bpm.interval();
        let sink = self.sink.clone();
        let ticks = Arc::clone(&self.ticks);

        let thread = std::thread::Builder::new()
            .name("octoechos-beat-clock".into())
            .spawn(move || run(sink, interval, stop_rx, &ticks))?;

        self.timer = Some(Timer {
            stop: stop_tx,
            thread,
        });
        Ok(())
    }
}

impl<S> BeatClock<S> {
    fn halt(&mut self) {
        if let Some(Timer { stop, thread }) = self.timer.take() {
            // Disconnecting the channel wakes the select.
            drop(stop);
            if thread.join().is_err() {
                tracing::error!("beat clock thread panicked");
            }
        }
    }
}

impl<S> Drop for BeatClock<S> {
    fn drop(&mut self) {
        self.halt();
    }
}

impl<S> std::fmt::Debug for BeatClock<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeatClock")
            .field("bpm", &self.bpm)
            .field("running", &self.timer.is_some())
            .field("ticks", &self.ticks.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn run<S: ToneSink>(
    mut sink: S,
    interval: std::time::Duration,
    stop: Receiver<()>,
    ticks: &AtomicU64,
) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                // A pending stop wins over a tick that became ready together with it.
                if matches!(stop.try_recv(), Err(TryRecvError::Disconnected)) {
                    break;
                }
                sink.start(VoiceId::CLICK, CLICK_FREQUENCY, CLICK_WAVEFORM);
                let n = ticks.fetch_add(1, Ordering::AcqRel) + 1;
                tracing::trace!(tick = n, beat = beat_in_bar(n - 1), "click");
            }
            recv(stop) -> _ => break,
        }
    }
}
