//! Control vocabulary of the tone engine.
//!
//! Callers talk to a [`ToneEngine`](crate::ToneEngine) through [`ToneSink`],
//! whether they own the engine directly or feed it through a queue to an
//! audio thread. The audio side pulls queued [`ToneCommand`]s from a
//! [`CommandSource`] at the start of each block.

use crate::oscillator::Waveform;
use crate::voice::VoiceId;

/// A single engine operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToneCommand {
    /// Start `id`, or glide it to `frequency` if it is already sounding.
    Start {
        /// Voice id.
        id: VoiceId,
        /// Pitch in Hz.
        frequency: f32,
        /// Timbre.
        waveform: Waveform,
    },
    /// Release `id`.
    Stop {
        /// Voice id.
        id: VoiceId,
    },
    /// Ramp the shared output gain toward a level in `0.0..=1.0`.
    SetMasterVolume(f32),
    /// Release every voice.
    AllNotesOff,
}

/// Something that yields pending commands in FIFO order.
///
/// Implemented for any `FnMut() -> Option<ToneCommand>`, so a channel
/// receiver plugs in as `|| rx.try_recv().ok()`.
pub trait CommandSource {
    /// Next pending command, or `None` when drained.
    fn next_command(&mut self) -> Option<ToneCommand>;
}

impl<F> CommandSource for F
where
    F: FnMut() -> Option<ToneCommand>,
{
    #[inline]
    fn next_command(&mut self) -> Option<ToneCommand> {
        self()
    }
}

/// Plain function-call interface to a tone engine.
///
/// Only [`send`](Self::send) is required. Implementations must preserve the
/// order of commands sent through the same sink.
pub trait ToneSink {
    /// Deliver one command.
    fn send(&mut self, command: ToneCommand);

    /// Start or retune a voice.
    fn start(&mut self, id: VoiceId, frequency: f32, waveform: Waveform) {
        self.send(ToneCommand::Start {
            id,
            frequency,
            waveform,
        });
    }

    /// Release a voice. Unknown ids are ignored.
    fn stop(&mut self, id: VoiceId) {
        self.send(ToneCommand::Stop { id });
    }

    /// Ramp the master volume.
    fn set_master_volume(&mut self, level: f32) {
        self.send(ToneCommand::SetMasterVolume(level));
    }

    /// Release every voice.
    fn all_notes_off(&mut self) {
        self.send(ToneCommand::AllNotesOff);
    }
}

impl<S: ToneSink + ?Sized> ToneSink for &mut S {
    fn send(&mut self, command: ToneCommand) {
        (**self).send(command);
    }
}
