// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

//! Non-Registered Parameter Numbers (NRPN)
//!
//! The keyer firmware also accepts 14-bit parameter numbers and values
//! through the standard NRPN controllers. Each write consists of four
//! Control-Change messages. Writing the LSB of the data triggers the
//! update on the device.
//!
//! The device responds to identification requests with NRPN messages
//! that can be decoded by [`NrpnDecoder`].

use strum::{Display, EnumIter, FromRepr};

use crate::{
    quantize::{pack_stereo_switch, quantize_switch, quantize_unit_float},
    CcMessage, Channel, ControlCode, MidiInputHandler, RegisterWrite, TimeStamp,
};

pub const NUMBER_MSB: ControlCode = ControlCode::new(99);
pub const NUMBER_LSB: ControlCode = ControlCode::new(98);
pub const DATA_MSB: ControlCode = ControlCode::new(6);
pub const DATA_LSB: ControlCode = ControlCode::new(38);

const U14_MASK: u16 = 0x3fff;

const REGISTER_DATA_MASK: u16 = 0x1ff;

const RAW_WRITE_REGISTER_MASK: u8 = 0x3f;

const RAW_WRITE_FORCE_FLAG: u16 = 0x40;

/// Response to [`NrpnParameter::IdKeyer`].
pub const KEYER_ID: u16 = 0x50f;

/// Response to [`NrpnParameter::IdVersion`].
pub const KEYER_VERSION: u16 = 101;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[strum(serialize_all = "snake_case")]
#[repr(u16)]
pub enum NrpnParameter {
    /// Identify the keyer.
    IdKeyer = 1,
    /// Identify the firmware version.
    IdVersion = 2,
    /// Number of parameters maintained by the device.
    Nnrpn = 3,
    /// Request the current value of the parameter given as value.
    NrpnQuery = 4,
    /// Reset the parameter given as value.
    NrpnUnset = 5,
    #[strum(to_string = "wm8960_enable")]
    Wm8960Enable = 11,
    #[strum(to_string = "wm8960_input_level")]
    Wm8960InputLevel = 12,
    #[strum(to_string = "wm8960_input_select")]
    Wm8960InputSelect = 13,
    #[strum(to_string = "wm8960_volume")]
    Wm8960Volume = 14,
    #[strum(to_string = "wm8960_headphone_volume")]
    Wm8960HeadphoneVolume = 15,
    #[strum(to_string = "wm8960_headphone_power")]
    Wm8960HeadphonePower = 16,
    #[strum(to_string = "wm8960_speaker_volume")]
    Wm8960SpeakerVolume = 17,
    #[strum(to_string = "wm8960_speaker_power")]
    Wm8960SpeakerPower = 18,
    #[strum(to_string = "wm8960_disable_adchpf")]
    Wm8960DisableAdchpf = 19,
    #[strum(to_string = "wm8960_enable_micbias")]
    Wm8960EnableMicbias = 20,
    #[strum(to_string = "wm8960_enable_alc")]
    Wm8960EnableAlc = 21,
    #[strum(to_string = "wm8960_mic_power")]
    Wm8960MicPower = 22,
    #[strum(to_string = "wm8960_linein_power")]
    Wm8960LineinPower = 23,
    #[strum(to_string = "wm8960_raw_mask")]
    Wm8960RawMask = 24,
    #[strum(to_string = "wm8960_raw_data")]
    Wm8960RawData = 25,
    #[strum(to_string = "wm8960_raw_write")]
    Wm8960RawWrite = 26,
    KeydownNote = 27,
    PttNote = 28,
}

impl NrpnParameter {
    #[must_use]
    pub const fn number(self) -> u16 {
        self as u16
    }
}

/// Encode a single NRPN write.
///
/// Both number and value are wrapped into 14 bits.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn encode_nrpn(channel: Channel, number: u16, value: u16) -> [CcMessage; 4] {
    let number = number & U14_MASK;
    let value = value & U14_MASK;
    [
        CcMessage::new(channel, NUMBER_MSB, (number >> 7) as u8),
        CcMessage::new(channel, NUMBER_LSB, number as u8),
        CcMessage::new(channel, DATA_MSB, (value >> 7) as u8),
        CcMessage::new(channel, DATA_LSB, value as u8),
    ]
}

/// Encodes NRPN writes on a fixed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NrpnEncoder {
    channel: Channel,
}

impl NrpnEncoder {
    #[must_use]
    pub const fn new(channel: Channel) -> Self {
        Self { channel }
    }

    #[must_use]
    pub const fn encode(&self, parameter: NrpnParameter, value: u16) -> [CcMessage; 4] {
        encode_nrpn(self.channel, parameter.number(), value)
    }

    #[must_use]
    pub const fn encode_switch(&self, parameter: NrpnParameter, on: bool) -> [CcMessage; 4] {
        self.encode(parameter, quantize_switch(on) as u16)
    }

    /// Left level in the upper, right level in the lower 7 bits.
    #[must_use]
    pub fn encode_stereo_volume(
        &self,
        parameter: NrpnParameter,
        left: f64,
        right: f64,
    ) -> [CcMessage; 4] {
        let left = u16::from(quantize_unit_float(left));
        let right = u16::from(quantize_unit_float(right));
        self.encode(parameter, (left << 7) | right)
    }

    #[must_use]
    pub const fn encode_stereo_switch(
        &self,
        parameter: NrpnParameter,
        left: bool,
        right: bool,
    ) -> [CcMessage; 4] {
        self.encode(parameter, pack_stereo_switch(left, right) as u16)
    }

    /// Mask, data, and the triggering write.
    ///
    /// Only 6 bits are available for the register address.
    #[must_use]
    pub fn encode_raw_write(&self, write: &RegisterWrite) -> Vec<CcMessage> {
        let register = u16::from(write.register & RAW_WRITE_REGISTER_MASK);
        let force = if write.force { RAW_WRITE_FORCE_FLAG } else { 0 };
        [
            self.encode(NrpnParameter::Wm8960RawMask, write.mask & REGISTER_DATA_MASK),
            self.encode(NrpnParameter::Wm8960RawData, write.value & REGISTER_DATA_MASK),
            self.encode(NrpnParameter::Wm8960RawWrite, register | force),
        ]
        .concat()
    }

    /// Ask the device to send the current value of a parameter.
    #[must_use]
    pub const fn encode_query(&self, number: u16) -> [CcMessage; 4] {
        self.encode(NrpnParameter::NrpnQuery, number)
    }

    /// Ask the device to forget the current value of a parameter.
    #[must_use]
    pub const fn encode_unset(&self, number: u16) -> [CcMessage; 4] {
        self.encode(NrpnParameter::NrpnUnset, number)
    }
}

/// Parameter value received from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NrpnReply {
    pub number: u16,
    pub value: u16,
}

impl NrpnReply {
    #[must_use]
    pub fn parameter(&self) -> Option<NrpnParameter> {
        NrpnParameter::from_repr(self.number)
    }

    /// Check if this reply identifies a CW keyer.
    #[must_use]
    pub fn is_keyer_id(&self) -> bool {
        self.parameter() == Some(NrpnParameter::IdKeyer) && self.value == KEYER_ID
    }
}

/// Assembles NRPN replies from received Control-Change messages.
///
/// Only messages on the given channel are considered. The parameter
/// number is retained after each reply, i.e. subsequent data messages
/// refer to the same parameter.
#[allow(missing_debug_implementations)]
pub struct NrpnDecoder<F> {
    channel: Channel,
    number_msb: Option<u8>,
    number_lsb: Option<u8>,
    data_msb: u8,
    on_reply: F,
}

impl<F> NrpnDecoder<F>
where
    F: FnMut(TimeStamp, NrpnReply) + Send,
{
    #[must_use]
    pub const fn new(channel: Channel, on_reply: F) -> Self {
        Self {
            channel,
            number_msb: None,
            number_lsb: None,
            data_msb: 0,
            on_reply,
        }
    }

    /// Feed a single message.
    ///
    /// Returns `false` if the message is not part of an NRPN sequence.
    pub fn decode(&mut self, ts: TimeStamp, msg: CcMessage) -> bool {
        if msg.channel != self.channel {
            return false;
        }
        match msg.control {
            NUMBER_MSB => {
                self.number_msb = Some(msg.value());
            }
            NUMBER_LSB => {
                self.number_lsb = Some(msg.value());
            }
            DATA_MSB => {
                self.data_msb = msg.value();
            }
            DATA_LSB => {
                let (Some(number_msb), Some(number_lsb)) = (self.number_msb, self.number_lsb)
                else {
                    log::debug!("Ignoring NRPN data without parameter number: {ts}");
                    return true;
                };
                let reply = NrpnReply {
                    number: (u16::from(number_msb) << 7) | u16::from(number_lsb),
                    value: (u16::from(self.data_msb) << 7) | u16::from(msg.value()),
                };
                log::debug!("Received NRPN reply {reply:?}: {ts}");
                (self.on_reply)(ts, reply);
            }
            _ => return false,
        }
        true
    }
}

impl<F> MidiInputHandler for NrpnDecoder<F>
where
    F: FnMut(TimeStamp, NrpnReply) + Send,
{
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool {
        let Some(msg) = CcMessage::try_from_bytes(input) else {
            return false;
        };
        self.decode(ts, msg)
    }
}
