// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

//! Translation of semantic values into Control-Change messages
//!
//! Encoding is stateless. The same inputs always result in the
//! same sequence of messages. Sequences with more than one message
//! must be transmitted in order and without interleaving other
//! messages, because the device stages wide values in its
//! accumulator registers.

use derive_more::From;
use strum::IntoStaticStr;

use crate::{
    quantize::{
        pack_stereo_switch, quantize_coarse_frequency, quantize_controller_switch,
        quantize_frequency, quantize_switch, quantize_u7, quantize_unit_float,
    },
    CcMessage, Channel, Error, Parameter, ParameterSpec, Result, ValueDomain, Vocabulary,
};

#[cfg(test)]
mod tests;

/// Semantic value of a parameter.
///
/// Values are coerced into the domain of the target parameter if
/// possible, e.g. an integer can be used for setting a switch.
#[derive(Debug, Clone, Copy, PartialEq, From, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Left and right level
    Stereo(f64, f64),
    /// Left and right switch
    StereoSwitch(bool, bool),
    Register(RegisterWrite),
}

const REGISTER_DATA_MASK: u16 = 0x1ff;

const FORCE_FLAG: u8 = 0x10;

/// Masked write into a 9-bit codec register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterWrite {
    /// Register address, 7 bits.
    pub register: u8,
    /// Register data, 9 bits.
    pub value: u16,
    /// Only bits that are set are modified, 9 bits.
    pub mask: u16,
    /// Write unconditionally.
    pub force: bool,
}

impl RegisterWrite {
    /// Write all bits of a register.
    #[must_use]
    pub const fn new(register: u8, value: u16) -> Self {
        Self {
            register,
            value,
            mask: REGISTER_DATA_MASK,
            force: false,
        }
    }

    #[must_use]
    pub const fn with_mask(self, mask: u16) -> Self {
        Self { mask, ..self }
    }

    #[must_use]
    pub const fn forced(self) -> Self {
        Self {
            force: true,
            ..self
        }
    }

    /// Contents of the accumulator registers A, B, C.
    ///
    /// - A: bits [6:0] of the value
    /// - B: bits [6:0] of the mask
    /// - C: force flag at bit 4, bits [8:7] of the mask at bits [3:2],
    ///   and bits [8:7] of the value at bits [1:0]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn accumulators(&self) -> [u8; 3] {
        let value = self.value & REGISTER_DATA_MASK;
        let mask = self.mask & REGISTER_DATA_MASK;
        let a = (value & 0x7f) as u8;
        let b = (mask & 0x7f) as u8;
        let force = if self.force { FORCE_FLAG } else { 0 };
        let c = force | ((mask >> 5) & 0b01100) as u8 | ((value >> 7) & 0b011) as u8;
        [a, b, c]
    }

    /// Reassemble a register write from the accumulator registers.
    #[must_use]
    pub const fn from_accumulators(register: u8, [a, b, c]: [u8; 3]) -> Self {
        let value = (a as u16 & 0x7f) | ((c as u16 & 0b011) << 7);
        let mask = (b as u16 & 0x7f) | ((c as u16 & 0b01100) << 5);
        Self {
            register: register & 0x7f,
            value,
            mask,
            force: c & FORCE_FLAG != 0,
        }
    }
}

/// Encodes values for a fixed vocabulary and channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    vocabulary: Vocabulary,
    channel: Channel,
}

impl Encoder {
    #[must_use]
    pub const fn new(vocabulary: Vocabulary, channel: Channel) -> Self {
        Self {
            vocabulary,
            channel,
        }
    }

    #[must_use]
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    const fn message(&self, spec: &ParameterSpec, value: u8) -> CcMessage {
        CcMessage::new(self.channel, spec.code, value)
    }

    /// Encode a value for a parameter given by name.
    pub fn encode_named(&self, name: &str, value: Value) -> Result<Vec<CcMessage>> {
        let spec = self.vocabulary.lookup(name)?;
        self.encode_spec(spec, value)
    }

    /// Encode a value for a parameter.
    ///
    /// The resulting messages must be sent in order.
    pub fn encode(&self, parameter: Parameter, value: Value) -> Result<Vec<CcMessage>> {
        let spec = self.vocabulary.spec(parameter)?;
        self.encode_spec(spec, value)
    }

    fn encode_spec(&self, spec: &ParameterSpec, value: Value) -> Result<Vec<CcMessage>> {
        let messages = match spec.domain {
            ValueDomain::Accumulator | ValueDomain::U7 => {
                let value = coerce_int(value).ok_or_else(|| incompatible(spec, value))?;
                vec![self.message(spec, quantize_u7(value))]
            }
            ValueDomain::Switch => {
                let on = coerce_bool(value).ok_or_else(|| incompatible(spec, value))?;
                vec![self.message(spec, quantize_switch(on))]
            }
            ValueDomain::ControllerSwitch => {
                let on = coerce_bool(value).ok_or_else(|| incompatible(spec, value))?;
                vec![self.message(spec, quantize_controller_switch(on))]
            }
            ValueDomain::UnitFloat => {
                let level = coerce_float(value).ok_or_else(|| incompatible(spec, value))?;
                vec![self.message(spec, quantize_unit_float(level))]
            }
            ValueDomain::Frequency | ValueDomain::CoarseFrequency => {
                let hz = coerce_int(value).ok_or_else(|| incompatible(spec, value))?;
                vec![self.frequency_message(spec, hz)]
            }
            ValueDomain::StereoVolume => {
                let (left, right) = match value {
                    Value::Stereo(left, right) => (left, Some(right)),
                    value => {
                        let level =
                            coerce_float(value).ok_or_else(|| incompatible(spec, value))?;
                        (level, None)
                    }
                };
                self.stereo_volume_messages(spec, left, right)?
            }
            ValueDomain::StereoSwitch => {
                let (left, right) = match value {
                    Value::StereoSwitch(left, right) => (left, right),
                    Value::Bool(on) => (on, on),
                    value => return Err(incompatible(spec, value)),
                };
                vec![self.message(spec, pack_stereo_switch(left, right))]
            }
            ValueDomain::RawRegister => {
                let Value::Register(write) = value else {
                    return Err(incompatible(spec, value));
                };
                self.raw_write_messages(spec, &write)?.to_vec()
            }
        };
        log::trace!(
            "Encoded {parameter} = {value:?} as {messages:?}",
            parameter = spec.parameter
        );
        Ok(messages)
    }

    fn frequency_message(&self, spec: &ParameterSpec, hz: i64) -> CcMessage {
        let value = if spec.domain == ValueDomain::CoarseFrequency {
            quantize_coarse_frequency(hz)
        } else {
            quantize_frequency(hz)
        };
        self.message(spec, value)
    }

    fn stereo_volume_messages(
        &self,
        spec: &ParameterSpec,
        left: f64,
        right: Option<f64>,
    ) -> Result<Vec<CcMessage>> {
        let primary = self.message(spec, quantize_unit_float(left));
        let Some(right) = right else {
            return Ok(vec![primary]);
        };
        // The right level must be staged before the primary
        // message triggers the update.
        let set_a = self.vocabulary.spec(Parameter::SetA)?;
        Ok(vec![
            self.message(set_a, quantize_unit_float(right)),
            primary,
        ])
    }

    fn raw_write_messages(
        &self,
        spec: &ParameterSpec,
        write: &RegisterWrite,
    ) -> Result<[CcMessage; 4]> {
        let set_a = self.vocabulary.spec(Parameter::SetA)?;
        let set_b = self.vocabulary.spec(Parameter::SetB)?;
        let set_c = self.vocabulary.spec(Parameter::SetC)?;
        let [a, b, c] = write.accumulators();
        Ok([
            self.message(set_a, a),
            self.message(set_b, b),
            self.message(set_c, c),
            self.message(spec, write.register),
        ])
    }

    /// Encode a frequency in Hz for the sidetone.
    pub fn encode_frequency(&self, hz: i64) -> Result<CcMessage> {
        let spec = self.vocabulary.spec(Parameter::SidetoneFrequency)?;
        Ok(self.frequency_message(spec, hz))
    }

    /// Encode a level for a parameter with a single or a left/right value.
    pub fn encode_stereo_volume(
        &self,
        parameter: Parameter,
        left: f64,
        right: Option<f64>,
    ) -> Result<Vec<CcMessage>> {
        let value = match right {
            Some(right) => Value::Stereo(left, right),
            None => Value::Float(left),
        };
        self.encode(parameter, value)
    }

    /// Encode a pair of left/right switches into a single message.
    pub fn encode_stereo_switch(
        &self,
        parameter: Parameter,
        left: bool,
        right: bool,
    ) -> Result<Vec<CcMessage>> {
        self.encode(parameter, Value::StereoSwitch(left, right))
    }

    /// Encode a masked write into a codec register.
    ///
    /// The accumulators A, B, C are written before the final
    /// message that triggers the write.
    pub fn encode_raw_write(&self, write: RegisterWrite) -> Result<[CcMessage; 4]> {
        let spec = self.vocabulary.spec(Parameter::Wm8960RawWrite)?;
        self.raw_write_messages(spec, &write)
    }

    /// Load a wide value into the single accumulator.
    ///
    /// The value is split into 7-bit groups. The most significant group
    /// initializes the accumulator and all subsequent groups are shifted in.
    pub fn encode_accumulated(&self, value: u32) -> Result<Vec<CcMessage>> {
        let set_accum = self.vocabulary.spec(Parameter::SetAccum)?;
        let shift_accum = self.vocabulary.spec(Parameter::ShiftAccum)?;
        let mut groups = Vec::with_capacity(5);
        let mut rest = value;
        loop {
            groups.push(quantize_u7(i64::from(rest)));
            rest >>= 7;
            if rest == 0 {
                break;
            }
        }
        let messages = groups
            .into_iter()
            .rev()
            .enumerate()
            .map(|(index, group)| {
                let spec = if index == 0 { set_accum } else { shift_accum };
                self.message(spec, group)
            })
            .collect();
        Ok(messages)
    }
}

fn incompatible(spec: &ParameterSpec, value: Value) -> Error {
    Error::IncompatibleValue {
        parameter: spec.parameter,
        domain: spec.domain,
        value: value.into(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_int(value: Value) -> Option<i64> {
    match value {
        Value::Bool(on) => Some(i64::from(on)),
        Value::Int(value) => Some(value),
        // Truncation towards zero, saturating
        Value::Float(value) => Some(value as i64),
        Value::Stereo(..) | Value::StereoSwitch(..) | Value::Register(_) => None,
    }
}

fn coerce_bool(value: Value) -> Option<bool> {
    match value {
        Value::Bool(on) => Some(on),
        Value::Int(value) => Some(value != 0),
        Value::Float(value) => Some(value != 0.0),
        Value::Stereo(..) | Value::StereoSwitch(..) | Value::Register(_) => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn coerce_float(value: Value) -> Option<f64> {
    match value {
        Value::Bool(on) => Some(if on { 1.0 } else { 0.0 }),
        Value::Int(value) => Some(value as f64),
        Value::Float(value) => Some(value),
        Value::Stereo(..) | Value::StereoSwitch(..) | Value::Register(_) => None,
    }
}
