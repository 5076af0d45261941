// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
};

use derive_more::{Display, From, Into};
use thiserror::Error;

use crate::{CcMessage, Vocabulary};

#[cfg(feature = "midir")]
pub mod midir;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("disconnected")]
    Disconnected,
    #[error("Send: {msg}")]
    Send { msg: Cow<'static, str> },
}

pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Time stamp of received input in microseconds.
///
/// The origin is undefined and depends on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display("{_0} us")]
#[repr(transparent)]
pub struct TimeStamp(u64);

impl TimeStamp {
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    #[must_use]
    pub const fn to_micros(self) -> u64 {
        self.0
    }
}

/// Outbound transport
///
/// Messages must be delivered in the order of invocation.
pub trait MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()>;
}

pub type BoxedMidiOutputConnection = Box<dyn MidiOutputConnection + Send + 'static>;

impl MidiOutputConnection for BoxedMidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()> {
        self.as_mut().send_midi_output(output)
    }
}

/// Passive callback for sinking MIDI input messages
///
/// Observes messages that are sent by the device, e.g.
/// echoed parameter changes.
pub trait MidiInputHandler: Send {
    /// Invoked for each incoming message.
    ///
    /// Returns `true` if the message has been accepted and handled
    /// or `false` otherwise.
    #[must_use]
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool;
}

impl<D> MidiInputHandler for D
where
    D: DerefMut + Send,
    <D as Deref>::Target: MidiInputHandler,
{
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool {
        self.deref_mut().handle_midi_input(ts, input)
    }
}

/// Forwards received Control-Change messages.
///
/// All other messages are rejected.
#[allow(missing_debug_implementations)]
pub struct ControlChangeHandler<F> {
    on_control_change: F,
}

impl<F> ControlChangeHandler<F>
where
    F: FnMut(TimeStamp, CcMessage) + Send,
{
    #[must_use]
    pub const fn new(on_control_change: F) -> Self {
        Self { on_control_change }
    }
}

impl<F> MidiInputHandler for ControlChangeHandler<F>
where
    F: FnMut(TimeStamp, CcMessage) + Send,
{
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool {
        let Some(msg) = CcMessage::try_from_bytes(input) else {
            return false;
        };
        (self.on_control_change)(ts, msg);
        true
    }
}

/// Logs all received messages.
///
/// Control-Change messages that match a known parameter
/// are logged by name.
#[derive(Debug, Clone, Default)]
pub struct LogMidiInput {
    vocabulary: Vocabulary,
}

impl LogMidiInput {
    #[must_use]
    pub const fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl MidiInputHandler for LogMidiInput {
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool {
        let Some(msg) = CcMessage::try_from_bytes(input) else {
            log::info!("Received MIDI input: {ts} {input:02x?}");
            return true;
        };
        match self.vocabulary.find_by_code(msg.control) {
            Some(spec) => log::info!(
                "Received {parameter} = {value} on channel {channel}: {ts}",
                parameter = spec.parameter,
                value = msg.value(),
                channel = msg.channel,
            ),
            None => log::info!(
                "Received control {control} = {value} on channel {channel}: {ts}",
                control = msg.control,
                value = msg.value(),
                channel = msg.channel,
            ),
        }
        true
    }
}
