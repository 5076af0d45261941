// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

use std::sync::{Mutex, PoisonError};

use crate::{
    nrpn::{NrpnDecoder, NrpnEncoder, NrpnParameter, NrpnReply},
    CcMessage, Channel, Encoder, Error, MidiOutputConnection, OutputError, OutputResult,
    Parameter, ProtocolVersion, RegisterWrite, TimeStamp, Value, Vocabulary,
};

/// Port name of the keyer shield on Linux/ALSA.
pub const DEFAULT_PORT_NAME: &str = "Teensy MIDI/Audio:Teensy MIDI/Audio MIDI 1 24:0";

/// Fixed settings of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub send_port_name: String,
    pub send_channel: Channel,
    pub receive_port_name: String,
    pub receive_channel: Channel,
    pub protocol: ProtocolVersion,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            send_port_name: DEFAULT_PORT_NAME.to_owned(),
            send_channel: Channel::MIN,
            receive_port_name: DEFAULT_PORT_NAME.to_owned(),
            receive_channel: Channel::MIN,
            protocol: Default::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Encode(#[from] Error),
    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Sends encoded parameter changes to the device.
///
/// The output connection is locked while sending all messages of
/// a single operation. Messages of concurrent operations are never
/// interleaved.
#[allow(missing_debug_implementations)]
pub struct Session<C> {
    config: SessionConfig,
    encoder: Encoder,
    nrpn_encoder: NrpnEncoder,
    output: Mutex<C>,
}

impl<C> Session<C>
where
    C: MidiOutputConnection,
{
    #[must_use]
    pub fn new(config: SessionConfig, output: C) -> Self {
        let encoder = Encoder::new(Vocabulary::new(config.protocol), config.send_channel);
        let nrpn_encoder = NrpnEncoder::new(config.send_channel);
        log::debug!(
            "Starting {protocol} session on port \"{port_name}\" (channel {channel})",
            protocol = config.protocol,
            port_name = config.send_port_name,
            channel = config.send_channel,
        );
        Self {
            config,
            encoder,
            nrpn_encoder,
            output: Mutex::new(output),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    #[must_use]
    pub fn into_output(self) -> C {
        self.output
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Send a sequence of messages without interruption.
    pub fn send(&self, messages: &[CcMessage]) -> OutputResult<()> {
        // The connection holds no state that could be corrupted
        // by a panicking thread.
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        for msg in messages {
            let bytes = msg.to_bytes();
            log::trace!("Sending MIDI output: {bytes:02x?}");
            output.send_midi_output(&bytes)?;
        }
        Ok(())
    }

    fn send_encoded(&self, messages: &[CcMessage]) -> SessionResult<()> {
        self.send(messages).map_err(Into::into)
    }

    /// Set a parameter given by name.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> SessionResult<()> {
        let messages = self.encoder.encode_named(name, value.into())?;
        self.send_encoded(&messages)
    }

    pub fn set_parameter(&self, parameter: Parameter, value: impl Into<Value>) -> SessionResult<()> {
        let value = value.into();
        log::debug!("Setting {parameter} = {value:?}");
        let messages = self.encoder.encode(parameter, value)?;
        self.send_encoded(&messages)
    }

    /// 0.0 to 1.0
    pub fn master_volume(&self, level: f64) -> SessionResult<()> {
        self.set_parameter(Parameter::MasterVolume, level)
    }

    /// 0.0 to 1.0
    pub fn sidetone_volume(&self, level: f64) -> SessionResult<()> {
        self.set_parameter(Parameter::SidetoneVolume, level)
    }

    /// 250 Hz to 1270 Hz
    pub fn sidetone_frequency(&self, hz: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::SidetoneFrequency, hz)
    }

    /// 1 to 127 WPM
    pub fn cw_speed(&self, wpm: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::CwSpeed, wpm)
    }

    /// Initialize the accumulator, overwriting any accumulated value.
    pub fn write_accum(&self, value: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::SetAccum, value)
    }

    /// Shift in the next lower 7 bits of the accumulator.
    pub fn shift_accum(&self, value: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::ShiftAccum, value)
    }

    /// Load a wide value into the accumulator.
    pub fn load_accum(&self, value: u32) -> SessionResult<()> {
        let messages = self.encoder.encode_accumulated(value)?;
        self.send_encoded(&messages)
    }

    /// Channel on which the keyer receives commands.
    ///
    /// The keyer responds to this command on any channel.
    pub fn rx_ch(&self, channel: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::RxCh, channel)
    }

    /// Channel for notes and responses sent by the keyer.
    pub fn tx_ch(&self, channel: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::TxCh, channel)
    }

    pub fn keydown_note(&self, note: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::KeydownNote, note)
    }

    pub fn cwptt_note(&self, note: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::CwpttNote, note)
    }

    pub fn ptt_mic_note(&self, note: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::PttMicNote, note)
    }

    pub fn ptt_in_note(&self, note: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::PttInNote, note)
    }

    /// Report parameter changes back to the controller.
    pub fn response(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::Response, enable)
    }

    pub fn enable_pots(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::EnablePots, enable)
    }

    /// PTT activation by the keyer.
    pub fn keyer_autoptt(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::KeyerAutoptt, enable)
    }

    /// PTT lead-in time, only with auto-PTT.
    pub fn keyer_leadin(&self, value: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::KeyerLeadin, value)
    }

    /// PTT hang time, only with auto-PTT.
    pub fn keyer_hang(&self, value: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::KeyerHang, value)
    }

    /// Mute RX audio during auto-PTT.
    pub fn mute_cwptt(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::MuteCwptt, enable)
    }

    /// Trigger the hardware PTT output from the microphone input.
    pub fn micptt_hwptt(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::MicpttHwptt, enable)
    }

    /// Trigger the hardware PTT output from the keyer.
    pub fn cwptt_hwptt(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::CwpttHwptt, enable)
    }

    /// Controller for the CW speed sent to the radio.
    pub fn speed_ctrl(&self, control: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::SpeedCtrl, control)
    }

    /// Controller for the sidetone frequency sent to the radio.
    pub fn freq_ctrl(&self, control: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::FreqCtrl, control)
    }

    /// Move the device to another receive channel.
    ///
    /// The device accepts this command on any channel. Subsequent
    /// commands must be sent on the new channel, i.e. by a new session.
    pub fn set_channel(&self, channel: Channel) -> SessionResult<()> {
        // The device counts channels from 1
        self.set_parameter(Parameter::SetChannel, i64::from(channel.value()) + 1)
    }

    pub fn wm8960_enable(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::Wm8960Enable, enable)
    }

    /// 0 = microphone, 1 = line in
    pub fn wm8960_input_select(&self, input: i64) -> SessionResult<()> {
        self.set_parameter(Parameter::Wm8960InputSelect, input)
    }

    fn set_stereo_volume(
        &self,
        parameter: Parameter,
        left: f64,
        right: Option<f64>,
    ) -> SessionResult<()> {
        log::debug!("Setting {parameter} = ({left}, {right:?})");
        let messages = self.encoder.encode_stereo_volume(parameter, left, right)?;
        self.send_encoded(&messages)
    }

    fn set_stereo_switch(&self, parameter: Parameter, left: bool, right: bool) -> SessionResult<()> {
        log::debug!("Setting {parameter} = ({left}, {right})");
        let messages = self.encoder.encode_stereo_switch(parameter, left, right)?;
        self.send_encoded(&messages)
    }

    /// Input level of the codec.
    ///
    /// Without a right level only the left level is sent.
    pub fn wm8960_input_level(&self, left: f64, right: Option<f64>) -> SessionResult<()> {
        self.set_stereo_volume(Parameter::Wm8960InputLevel, left, right)
    }

    /// Output volume of the codec.
    pub fn wm8960_volume(&self, left: f64, right: Option<f64>) -> SessionResult<()> {
        self.set_stereo_volume(Parameter::Wm8960Volume, left, right)
    }

    pub fn wm8960_headphone_volume(&self, left: f64, right: Option<f64>) -> SessionResult<()> {
        self.set_stereo_volume(Parameter::Wm8960HeadphoneVolume, left, right)
    }

    pub fn wm8960_headphone_power(&self, left: bool, right: bool) -> SessionResult<()> {
        self.set_stereo_switch(Parameter::Wm8960HeadphonePower, left, right)
    }

    pub fn wm8960_speaker_volume(&self, left: f64, right: Option<f64>) -> SessionResult<()> {
        self.set_stereo_volume(Parameter::Wm8960SpeakerVolume, left, right)
    }

    pub fn wm8960_speaker_power(&self, left: bool, right: bool) -> SessionResult<()> {
        self.set_stereo_switch(Parameter::Wm8960SpeakerPower, left, right)
    }

    /// Automatic level control.
    pub fn wm8960_enable_alc(&self, left: bool, right: bool) -> SessionResult<()> {
        self.set_stereo_switch(Parameter::Wm8960EnableAlc, left, right)
    }

    pub fn wm8960_mic_power(&self, left: bool, right: bool) -> SessionResult<()> {
        self.set_stereo_switch(Parameter::Wm8960MicPower, left, right)
    }

    pub fn wm8960_linein_power(&self, left: bool, right: bool) -> SessionResult<()> {
        self.set_stereo_switch(Parameter::Wm8960LineinPower, left, right)
    }

    pub fn wm8960_disable_adchpf(&self, disable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::Wm8960DisableAdchpf, disable)
    }

    pub fn wm8960_enable_micbias(&self, enable: bool) -> SessionResult<()> {
        self.set_parameter(Parameter::Wm8960EnableMicbias, enable)
    }

    /// Masked write into a codec register.
    pub fn raw_write(&self, write: RegisterWrite) -> SessionResult<()> {
        log::debug!("Writing codec register {write:?}");
        let messages = self.encoder.encode_raw_write(write)?;
        self.send_encoded(&messages)
    }

    pub fn send_nrpn(&self, parameter: NrpnParameter, value: u16) -> OutputResult<()> {
        log::debug!("Sending NRPN {parameter} = {value}");
        self.send(&self.nrpn_encoder.encode(parameter, value))
    }

    pub fn nrpn_switch(&self, parameter: NrpnParameter, on: bool) -> OutputResult<()> {
        log::debug!("Sending NRPN {parameter} = {on}");
        self.send(&self.nrpn_encoder.encode_switch(parameter, on))
    }

    /// Left and right level packed into a single NRPN value.
    pub fn nrpn_stereo_volume(
        &self,
        parameter: NrpnParameter,
        left: f64,
        right: f64,
    ) -> OutputResult<()> {
        log::debug!("Sending NRPN {parameter} = ({left}, {right})");
        self.send(&self.nrpn_encoder.encode_stereo_volume(parameter, left, right))
    }

    pub fn nrpn_stereo_switch(
        &self,
        parameter: NrpnParameter,
        left: bool,
        right: bool,
    ) -> OutputResult<()> {
        log::debug!("Sending NRPN {parameter} = ({left}, {right})");
        self.send(&self.nrpn_encoder.encode_stereo_switch(parameter, left, right))
    }

    /// Masked write into a codec register through NRPNs.
    pub fn nrpn_raw_write(&self, write: &RegisterWrite) -> OutputResult<()> {
        self.send(&self.nrpn_encoder.encode_raw_write(write))
    }

    /// The reply is received asynchronously, see [`Self::nrpn_decoder()`].
    pub fn query_keyer_id(&self) -> OutputResult<()> {
        self.send_nrpn(NrpnParameter::IdKeyer, 0)
    }

    /// The reply is received asynchronously, see [`Self::nrpn_decoder()`].
    pub fn query_version(&self) -> OutputResult<()> {
        self.send_nrpn(NrpnParameter::IdVersion, 0)
    }

    /// The reply is received asynchronously, see [`Self::nrpn_decoder()`].
    pub fn query_nrpn(&self, number: u16) -> OutputResult<()> {
        self.send(&self.nrpn_encoder.encode_query(number))
    }

    pub fn unset_nrpn(&self, number: u16) -> OutputResult<()> {
        self.send(&self.nrpn_encoder.encode_unset(number))
    }

    /// Decoder for NRPN replies on the receive channel.
    #[must_use]
    pub fn nrpn_decoder<F>(&self, on_reply: F) -> NrpnDecoder<F>
    where
        F: FnMut(TimeStamp, NrpnReply) + Send,
    {
        NrpnDecoder::new(self.config.receive_channel, on_reply)
    }
}

#[cfg(feature = "midir")]
impl Session<midir::MidiOutputConnection> {
    /// Connect to the configured send port.
    pub fn connect(config: SessionConfig) -> Result<Self, crate::midi::midir::MidiPortError> {
        let output = crate::midi::midir::open_output(&config.send_port_name)?;
        Ok(Self::new(config, output))
    }

    /// Listen on the configured receive port.
    pub fn listen<I>(
        &self,
        input_handler: I,
    ) -> Result<midir::MidiInputConnection<I>, crate::midi::midir::MidiPortError>
    where
        I: crate::MidiInputHandler + 'static,
    {
        crate::midi::midir::open_input(&self.config.receive_port_name, input_handler)
    }
}
