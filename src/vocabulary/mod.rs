// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

//! Control vocabulary
//!
//! Maps named device parameters onto control codes and value domains.
//!
//! The numbering is defined by the device firmware and must never
//! change within a protocol version. Parameters that are not supported
//! by a protocol version are absent from its table.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{ControlCode, Error, Result};


/// Named device parameter.
///
/// The string representation is used for looking up parameters by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Parameter {
    // Accumulator (single register)
    SetAccum,
    ShiftAccum,
    // Accumulators (three registers)
    SetA,
    SetB,
    SetC,
    // Audio
    MasterVolume,
    SidetoneVolume,
    SidetoneFrequency,
    // Keyer
    CwSpeed,
    EnablePots,
    KeyerAutoptt,
    KeyerLeadin,
    KeyerHang,
    Response,
    MuteCwptt,
    MicpttHwptt,
    CwpttHwptt,
    // Channels and notes
    RxCh,
    TxCh,
    KeydownNote,
    PttMicNote,
    PttInNote,
    CwpttNote,
    SpeedCtrl,
    FreqCtrl,
    /// Receive channel of the device, accepted on any channel.
    SetChannel,
    // WM8960 codec
    #[strum(to_string = "wm8960_enable")]
    Wm8960Enable,
    #[strum(to_string = "wm8960_input_level")]
    Wm8960InputLevel,
    #[strum(to_string = "wm8960_input_select")]
    Wm8960InputSelect,
    #[strum(to_string = "wm8960_volume")]
    Wm8960Volume,
    #[strum(to_string = "wm8960_headphone_volume")]
    Wm8960HeadphoneVolume,
    #[strum(to_string = "wm8960_headphone_power")]
    Wm8960HeadphonePower,
    #[strum(to_string = "wm8960_speaker_volume")]
    Wm8960SpeakerVolume,
    #[strum(to_string = "wm8960_speaker_power")]
    Wm8960SpeakerPower,
    #[strum(to_string = "wm8960_disable_adchpf")]
    Wm8960DisableAdchpf,
    #[strum(to_string = "wm8960_enable_micbias")]
    Wm8960EnableMicbias,
    #[strum(to_string = "wm8960_enable_alc")]
    Wm8960EnableAlc,
    #[strum(to_string = "wm8960_mic_power")]
    Wm8960MicPower,
    #[strum(to_string = "wm8960_linein_power")]
    Wm8960LineinPower,
    #[strum(to_string = "wm8960_raw_write")]
    Wm8960RawWrite,
}

/// Value domain of a parameter.
///
/// Determines how semantic values are quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ValueDomain {
    /// Raw 7-bit staging value for wide data.
    Accumulator,
    /// On/off, encoded as 1/0.
    Switch,
    /// 7-bit integer, wrapped.
    U7,
    /// Float in the interval [0, 1], saturated.
    UnitFloat,
    /// Sidetone frequency in Hz, saturated.
    Frequency,
    /// On/off, encoded as 127/0. Values above 63 are read as on.
    ControllerSwitch,
    /// Sidetone frequency in steps of 10 Hz, saturated.
    CoarseFrequency,
    /// Left/right levels, the right level is staged in accumulator A.
    StereoVolume,
    /// Left/right switches packed into a single value.
    StereoSwitch,
    /// Codec register write, staged in accumulators A, B, C.
    RawRegister,
}

/// Version of the control table.
///
/// There is no negotiation with the device, the version must match
/// the installed firmware.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ProtocolVersion {
    /// Single accumulator that is loaded and shifted in 7-bit steps.
    ///
    /// No codec controls.
    SingleAccumulator,
    /// Three accumulator registers A, B, C and codec controls.
    #[default]
    ThreeRegister,
    /// Controller map of the Teensy shield library.
    ///
    /// Follows the MIDI conventions for controller numbers and switches.
    /// Codec controls are only available through NRPNs.
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub parameter: Parameter,
    pub code: ControlCode,
    pub domain: ValueDomain,
}

const fn entry(parameter: Parameter, code: u8, domain: ValueDomain) -> ParameterSpec {
    ParameterSpec {
        parameter,
        code: ControlCode::new(code),
        domain,
    }
}

const SINGLE_ACCUMULATOR_TABLE: &[ParameterSpec] = &[
    entry(Parameter::SetAccum, 0, ValueDomain::Accumulator),
    entry(Parameter::ShiftAccum, 1, ValueDomain::Accumulator),
    entry(Parameter::MasterVolume, 4, ValueDomain::UnitFloat),
    entry(Parameter::SidetoneVolume, 5, ValueDomain::UnitFloat),
    entry(Parameter::SidetoneFrequency, 6, ValueDomain::Frequency),
    entry(Parameter::CwSpeed, 7, ValueDomain::U7),
    entry(Parameter::EnablePots, 8, ValueDomain::Switch),
    entry(Parameter::KeyerAutoptt, 9, ValueDomain::Switch),
    entry(Parameter::KeyerLeadin, 10, ValueDomain::U7),
    entry(Parameter::KeyerHang, 11, ValueDomain::U7),
    entry(Parameter::Response, 12, ValueDomain::Switch),
    entry(Parameter::MuteCwptt, 13, ValueDomain::Switch),
    entry(Parameter::MicpttHwptt, 14, ValueDomain::Switch),
    entry(Parameter::RxCh, 16, ValueDomain::U7),
    entry(Parameter::TxCh, 17, ValueDomain::U7),
    entry(Parameter::KeydownNote, 18, ValueDomain::U7),
    entry(Parameter::PttMicNote, 19, ValueDomain::U7),
    entry(Parameter::PttInNote, 20, ValueDomain::U7),
    entry(Parameter::CwpttNote, 21, ValueDomain::U7),
    entry(Parameter::SpeedCtrl, 22, ValueDomain::U7),
    entry(Parameter::FreqCtrl, 23, ValueDomain::U7),
];

const THREE_REGISTER_TABLE: &[ParameterSpec] = &[
    entry(Parameter::SetA, 0, ValueDomain::Accumulator),
    entry(Parameter::SetB, 1, ValueDomain::Accumulator),
    entry(Parameter::SetC, 2, ValueDomain::Accumulator),
    entry(Parameter::MasterVolume, 4, ValueDomain::UnitFloat),
    entry(Parameter::SidetoneVolume, 5, ValueDomain::UnitFloat),
    entry(Parameter::SidetoneFrequency, 6, ValueDomain::Frequency),
    entry(Parameter::CwSpeed, 7, ValueDomain::U7),
    entry(Parameter::EnablePots, 8, ValueDomain::Switch),
    entry(Parameter::KeyerAutoptt, 9, ValueDomain::Switch),
    entry(Parameter::KeyerLeadin, 10, ValueDomain::U7),
    entry(Parameter::KeyerHang, 11, ValueDomain::U7),
    entry(Parameter::Response, 12, ValueDomain::Switch),
    entry(Parameter::MuteCwptt, 13, ValueDomain::Switch),
    entry(Parameter::MicpttHwptt, 14, ValueDomain::Switch),
    entry(Parameter::CwpttHwptt, 15, ValueDomain::Switch),
    entry(Parameter::RxCh, 16, ValueDomain::U7),
    entry(Parameter::TxCh, 17, ValueDomain::U7),
    entry(Parameter::KeydownNote, 18, ValueDomain::U7),
    entry(Parameter::PttMicNote, 19, ValueDomain::U7),
    entry(Parameter::PttInNote, 20, ValueDomain::U7),
    entry(Parameter::CwpttNote, 21, ValueDomain::U7),
    entry(Parameter::SpeedCtrl, 22, ValueDomain::U7),
    entry(Parameter::FreqCtrl, 23, ValueDomain::U7),
    entry(Parameter::Wm8960Enable, 24, ValueDomain::Switch),
    entry(Parameter::Wm8960InputLevel, 25, ValueDomain::StereoVolume),
    entry(Parameter::Wm8960InputSelect, 26, ValueDomain::U7),
    entry(Parameter::Wm8960Volume, 27, ValueDomain::StereoVolume),
    entry(Parameter::Wm8960HeadphoneVolume, 28, ValueDomain::StereoVolume),
    entry(Parameter::Wm8960HeadphonePower, 29, ValueDomain::StereoSwitch),
    entry(Parameter::Wm8960SpeakerVolume, 30, ValueDomain::StereoVolume),
    entry(Parameter::Wm8960SpeakerPower, 31, ValueDomain::StereoSwitch),
    entry(Parameter::Wm8960DisableAdchpf, 32, ValueDomain::Switch),
    entry(Parameter::Wm8960EnableMicbias, 33, ValueDomain::Switch),
    entry(Parameter::Wm8960EnableAlc, 34, ValueDomain::StereoSwitch),
    entry(Parameter::Wm8960MicPower, 35, ValueDomain::StereoSwitch),
    entry(Parameter::Wm8960LineinPower, 36, ValueDomain::StereoSwitch),
    entry(Parameter::Wm8960RawWrite, 37, ValueDomain::RawRegister),
];

const SHIELD_TABLE: &[ParameterSpec] = &[
    entry(Parameter::MasterVolume, 7, ValueDomain::UnitFloat),
    entry(Parameter::SidetoneVolume, 12, ValueDomain::UnitFloat),
    entry(Parameter::SidetoneFrequency, 13, ValueDomain::CoarseFrequency),
    entry(Parameter::EnablePots, 64, ValueDomain::ControllerSwitch),
    entry(Parameter::KeyerAutoptt, 65, ValueDomain::ControllerSwitch),
    entry(Parameter::Response, 66, ValueDomain::ControllerSwitch),
    entry(Parameter::MuteCwptt, 67, ValueDomain::ControllerSwitch),
    entry(Parameter::MicpttHwptt, 68, ValueDomain::ControllerSwitch),
    entry(Parameter::CwpttHwptt, 69, ValueDomain::ControllerSwitch),
    entry(Parameter::KeyerHang, 72, ValueDomain::U7),
    entry(Parameter::KeyerLeadin, 73, ValueDomain::U7),
    entry(Parameter::CwSpeed, 74, ValueDomain::U7),
    entry(Parameter::SetChannel, 119, ValueDomain::U7),
];

/// Immutable control table of a single protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    version: ProtocolVersion,
    entries: &'static [ParameterSpec],
}

impl Vocabulary {
    #[must_use]
    pub const fn new(version: ProtocolVersion) -> Self {
        let entries = match version {
            ProtocolVersion::SingleAccumulator => SINGLE_ACCUMULATOR_TABLE,
            ProtocolVersion::ThreeRegister => THREE_REGISTER_TABLE,
            ProtocolVersion::Shield => SHIELD_TABLE,
        };
        Self { version, entries }
    }

    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ParameterSpec> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, parameter: Parameter) -> Option<&'static ParameterSpec> {
        self.entries
            .iter()
            .find(|entry| entry.parameter == parameter)
    }

    /// Same as [`Self::get()`], but fails for unsupported parameters.
    pub fn spec(&self, parameter: Parameter) -> Result<&'static ParameterSpec> {
        self.get(parameter)
            .ok_or_else(|| Error::UnknownParameter(parameter.to_string()))
    }

    /// Look up a parameter by its name.
    pub fn lookup(&self, name: &str) -> Result<&'static ParameterSpec> {
        let Ok(parameter) = name.parse::<Parameter>() else {
            return Err(Error::UnknownParameter(name.to_owned()));
        };
        self.spec(parameter)
    }

    /// Reverse lookup, e.g. for decoding messages that are echoed by the device.
    #[must_use]
    pub fn find_by_code(&self, code: ControlCode) -> Option<&'static ParameterSpec> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    #[must_use]
    pub fn supports(&self, parameter: Parameter) -> bool {
        self.get(parameter).is_some()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(Default::default())
    }
}
