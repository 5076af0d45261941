// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

//! Transport driven by [`midir`].

use midir::{
    ConnectErrorKind, Ignore, InitError, MidiInput, MidiInputConnection, MidiInputPort,
    MidiOutput, MidiOutputConnection, MidiOutputPort, SendError,
};
use thiserror::Error;

use super::{MidiInputHandler, OutputError, TimeStamp};

const CLIENT_NAME: &str = "cwkeyer";

#[derive(Debug, Error)]
pub enum MidiPortError {
    #[error("port \"{port_name}\" not found")]
    NotFound { port_name: String },
    #[error(transparent)]
    Init(#[from] InitError),
    #[error("failed to connect input port: {0}")]
    ConnectInput(ConnectErrorKind),
    #[error("failed to connect output port: {0}")]
    ConnectOutput(ConnectErrorKind),
}

impl From<SendError> for OutputError {
    fn from(err: SendError) -> Self {
        OutputError::Send {
            msg: err.to_string().into(),
        }
    }
}

impl super::MidiOutputConnection for MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> super::OutputResult<()> {
        self.send(output).map_err(Into::into)
    }
}

// Adapter for the midir callback closure
fn handle_input<I>(micros: u64, input: &[u8], input_handler: &mut I)
where
    I: MidiInputHandler,
{
    let ts = TimeStamp::from_micros(micros);
    log::trace!("Received MIDI input: {ts} {input:0x?}");
    if !input_handler.handle_midi_input(ts, input) {
        log::warn!("Unhandled MIDI input {ts} {input:x?}");
    }
}

fn new_input() -> Result<MidiInput, InitError> {
    let mut input = MidiInput::new(CLIENT_NAME)?;
    input.ignore(Ignore::None);
    Ok(input)
}

/// Names of all available input ports.
pub fn input_port_names() -> Result<Vec<String>, MidiPortError> {
    let input = new_input()?;
    Ok(input
        .ports()
        .iter()
        .filter_map(|port| input.port_name(port).ok())
        .collect())
}

/// Names of all available output ports.
pub fn output_port_names() -> Result<Vec<String>, MidiPortError> {
    let output = MidiOutput::new(CLIENT_NAME)?;
    Ok(output
        .ports()
        .iter()
        .filter_map(|port| output.port_name(port).ok())
        .collect())
}

fn find_input_port(input: &MidiInput, port_name: &str) -> Option<MidiInputPort> {
    input.ports().into_iter().find(|port| {
        input
            .port_name(port)
            .map_or(false, |name| name == port_name)
    })
}

fn find_output_port(output: &MidiOutput, port_name: &str) -> Option<MidiOutputPort> {
    output.ports().into_iter().find(|port| {
        output
            .port_name(port)
            .map_or(false, |name| name == port_name)
    })
}

/// Connect to the output port with the given name.
pub fn open_output(port_name: &str) -> Result<MidiOutputConnection, MidiPortError> {
    let output = MidiOutput::new(CLIENT_NAME)?;
    let Some(port) = find_output_port(&output, port_name) else {
        return Err(MidiPortError::NotFound {
            port_name: port_name.to_owned(),
        });
    };
    log::debug!("Connecting output port \"{port_name}\"");
    output
        .connect(&port, port_name)
        .map_err(|err| MidiPortError::ConnectOutput(err.kind()))
}

/// Connect to the input port with the given name.
///
/// All received messages are passed to the handler until
/// the returned connection is closed or dropped.
pub fn open_input<I>(
    port_name: &str,
    input_handler: I,
) -> Result<MidiInputConnection<I>, MidiPortError>
where
    I: MidiInputHandler + 'static,
{
    let input = new_input()?;
    let Some(port) = find_input_port(&input, port_name) else {
        return Err(MidiPortError::NotFound {
            port_name: port_name.to_owned(),
        });
    };
    log::debug!("Connecting input port \"{port_name}\"");
    input
        .connect(
            &port,
            port_name,
            |micros, input, input_handler| {
                handle_input(micros, input, input_handler);
            },
            input_handler,
        )
        .map_err(|err| MidiPortError::ConnectInput(err.kind()))
}
