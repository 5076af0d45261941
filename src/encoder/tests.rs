// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::{ControlCode, ProtocolVersion};

fn encoder(version: ProtocolVersion) -> Encoder {
    Encoder::new(Vocabulary::new(version), Channel::try_from(3).unwrap())
}

fn pairs(messages: &[CcMessage]) -> Vec<(u8, u8)> {
    messages
        .iter()
        .map(|msg| (msg.control.value(), msg.value()))
        .collect()
}

const SET_A: u8 = 0;
const SET_B: u8 = 1;
const SET_C: u8 = 2;
const RAW_WRITE: u8 = 37;

#[test]
fn raw_write_forced() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let write = RegisterWrite::new(0x05, 0x1a3).with_mask(0x1ff).forced();
    let messages = encoder.encode_raw_write(write).unwrap();
    assert_eq!(
        vec![(SET_A, 0x23), (SET_B, 0x7f), (SET_C, 0x1f), (RAW_WRITE, 0x05)],
        pairs(&messages)
    );
    assert!(messages
        .iter()
        .all(|msg| msg.channel == encoder.channel()));
}

#[test]
fn raw_write_unforced_with_partial_mask() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    // mask bit 8 set, bit 7 cleared; value bit 7 set, bit 8 cleared
    let write = RegisterWrite::new(0x1a, 0x0ff).with_mask(0x100);
    let messages = encoder.encode_raw_write(write).unwrap();
    assert_eq!(
        vec![(SET_A, 0x7f), (SET_B, 0x00), (SET_C, 0b01001), (RAW_WRITE, 0x1a)],
        pairs(&messages)
    );
}

#[test]
fn raw_write_wraps_out_of_range_inputs() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let wrapped = encoder
        .encode_raw_write(RegisterWrite {
            register: 0x85,
            value: 0xfe00 | 0x1a3,
            mask: 0xfe00 | 0x1ff,
            force: true,
        })
        .unwrap();
    let expected = encoder
        .encode_raw_write(RegisterWrite::new(0x05, 0x1a3).forced())
        .unwrap();
    assert_eq!(expected, wrapped);
}

#[test]
fn raw_write_from_value() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let write = RegisterWrite::new(0x05, 0x1a3).forced();
    assert_eq!(
        encoder.encode_raw_write(write).unwrap().to_vec(),
        encoder
            .encode_named("wm8960_raw_write", Value::Register(write))
            .unwrap()
    );
}

#[test]
fn raw_write_requires_three_registers() {
    let encoder = encoder(ProtocolVersion::SingleAccumulator);
    assert_eq!(
        Err(Error::UnknownParameter("wm8960_raw_write".to_owned())),
        encoder.encode_raw_write(RegisterWrite::new(0x05, 0x1a3))
    );
}

#[test]
fn accumulators_reassemble() {
    let write = RegisterWrite::new(0x05, 0x1a3).with_mask(0x0f0).forced();
    assert_eq!(
        write,
        RegisterWrite::from_accumulators(write.register, write.accumulators())
    );
    let write = RegisterWrite::new(0x7f, 0x000).with_mask(0x1ff);
    assert_eq!(
        write,
        RegisterWrite::from_accumulators(write.register, write.accumulators())
    );
}

#[test]
fn sidetone_frequency() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    assert_eq!(56, encoder.encode_frequency(700).unwrap().value());
    assert_eq!(0, encoder.encode_frequency(200).unwrap().value());
    assert_eq!(127, encoder.encode_frequency(2000).unwrap().value());
    assert_eq!(
        vec![(6, 56)],
        pairs(
            &encoder
                .encode(Parameter::SidetoneFrequency, Value::Int(700))
                .unwrap()
        )
    );
    assert_eq!(
        vec![(6, 56)],
        pairs(
            &encoder
                .encode(Parameter::SidetoneFrequency, Value::Float(700.9))
                .unwrap()
        )
    );
}

#[test]
fn master_volume() {
    let encoder = encoder(ProtocolVersion::SingleAccumulator);
    assert_eq!(
        vec![(4, 53)],
        pairs(&encoder.encode(Parameter::MasterVolume, 0.42_f64.into()).unwrap())
    );
    assert_eq!(
        vec![(4, 127)],
        pairs(&encoder.encode(Parameter::MasterVolume, 7.0_f64.into()).unwrap())
    );
    assert_eq!(
        vec![(5, 0)],
        pairs(&encoder.encode(Parameter::SidetoneVolume, (-1.0_f64).into()).unwrap())
    );
}

#[test]
fn u7_parameters_wrap() {
    let encoder = encoder(ProtocolVersion::SingleAccumulator);
    assert_eq!(
        vec![(7, 20)],
        pairs(&encoder.encode(Parameter::CwSpeed, Value::Int(20)).unwrap())
    );
    assert_eq!(
        vec![(7, 72)],
        pairs(&encoder.encode(Parameter::CwSpeed, Value::Int(200)).unwrap())
    );
    assert_eq!(
        vec![(7, 20)],
        pairs(&encoder.encode(Parameter::CwSpeed, Value::Float(20.9)).unwrap())
    );
    assert_eq!(
        vec![(16, 127)],
        pairs(&encoder.encode(Parameter::RxCh, Value::Int(-1)).unwrap())
    );
}

#[test]
fn switches_accept_truthy_values() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    for (value, expected) in [
        (Value::Bool(true), 1),
        (Value::Bool(false), 0),
        (Value::Int(64), 1),
        (Value::Int(0), 0),
        (Value::Float(0.5), 1),
        (Value::Float(0.0), 0),
    ] {
        assert_eq!(
            vec![(9, expected)],
            pairs(&encoder.encode(Parameter::KeyerAutoptt, value).unwrap()),
            "{value:?}"
        );
    }
}

#[test]
fn stereo_volume_stages_right_level_first() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let messages = encoder
        .encode_stereo_volume(Parameter::Wm8960HeadphoneVolume, 1.0, Some(0.5))
        .unwrap();
    assert_eq!(vec![(SET_A, 63), (28, 127)], pairs(&messages));
}

#[test]
fn stereo_volume_mono() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let messages = encoder
        .encode_stereo_volume(Parameter::Wm8960SpeakerVolume, 0.5, None)
        .unwrap();
    assert_eq!(vec![(30, 63)], pairs(&messages));
}

#[test]
fn stereo_switch_packing() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    for (left, right, expected) in [
        (true, false, 2),
        (false, true, 1),
        (true, true, 3),
        (false, false, 0),
    ] {
        let messages = encoder
            .encode_stereo_switch(Parameter::Wm8960HeadphonePower, left, right)
            .unwrap();
        assert_eq!(vec![(29, expected)], pairs(&messages));
    }
    let messages = encoder
        .encode(Parameter::Wm8960MicPower, Value::Bool(true))
        .unwrap();
    assert_eq!(vec![(35, 3)], pairs(&messages));
}

#[test]
fn incompatible_values_are_rejected() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    assert_eq!(
        Err(Error::IncompatibleValue {
            parameter: Parameter::MasterVolume,
            domain: ValueDomain::UnitFloat,
            value: "register",
        }),
        encoder.encode(
            Parameter::MasterVolume,
            Value::Register(RegisterWrite::new(0, 0))
        )
    );
    assert!(matches!(
        encoder.encode(Parameter::Wm8960RawWrite, Value::Int(5)),
        Err(Error::IncompatibleValue { .. })
    ));
    assert!(matches!(
        encoder.encode(Parameter::Wm8960SpeakerPower, Value::Float(1.0)),
        Err(Error::IncompatibleValue { .. })
    ));
}

#[test]
fn unknown_parameter_name() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    assert_eq!(
        Err(Error::UnknownParameter("volume".to_owned())),
        encoder.encode_named("volume", Value::Float(0.5))
    );
}

#[test]
fn encoding_is_idempotent() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let write = RegisterWrite::new(0x05, 0x1a3).forced();
    assert_eq!(
        encoder.encode_raw_write(write).unwrap(),
        encoder.encode_raw_write(write).unwrap()
    );
    let value = Value::Stereo(0.3, 0.7);
    assert_eq!(
        encoder.encode(Parameter::Wm8960Volume, value).unwrap(),
        encoder.encode(Parameter::Wm8960Volume, value).unwrap()
    );
}

#[test]
fn accumulated_value() {
    let encoder = encoder(ProtocolVersion::SingleAccumulator);
    assert_eq!(vec![(0, 0)], pairs(&encoder.encode_accumulated(0).unwrap()));
    assert_eq!(vec![(0, 127)], pairs(&encoder.encode_accumulated(127).unwrap()));
    assert_eq!(
        vec![(0, 0x03), (1, 0x23)],
        pairs(&encoder.encode_accumulated(0x1a3).unwrap())
    );
    assert_eq!(
        vec![(0, 0x01), (1, 0x00), (1, 0x00)],
        pairs(&encoder.encode_accumulated(1 << 14).unwrap())
    );
    assert_eq!(
        vec![(0, 0x0f), (1, 0x7f), (1, 0x7f), (1, 0x7f), (1, 0x7f)],
        pairs(&encoder.encode_accumulated(u32::MAX).unwrap())
    );
}

#[test]
fn accumulated_value_requires_single_accumulator() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    assert_eq!(
        Err(Error::UnknownParameter("set_accum".to_owned())),
        encoder.encode_accumulated(1)
    );
}

#[test]
fn accumulator_primitives() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    let messages = encoder.encode(Parameter::SetC, Value::Int(0x1f)).unwrap();
    assert_eq!(
        vec![CcMessage::new(encoder.channel(), ControlCode::new(SET_C), 0x1f)],
        messages
    );
}

#[test]
fn shield_switches_follow_controller_convention() {
    let encoder = encoder(ProtocolVersion::Shield);
    for (value, expected) in [
        (Value::Bool(true), 127),
        (Value::Bool(false), 0),
        (Value::Int(1), 127),
        (Value::Float(0.0), 0),
    ] {
        assert_eq!(
            vec![(66, expected)],
            pairs(&encoder.encode(Parameter::Response, value).unwrap()),
            "{value:?}"
        );
    }
}

#[test]
fn shield_sidetone_frequency() {
    let encoder = encoder(ProtocolVersion::Shield);
    assert_eq!(70, encoder.encode_frequency(700).unwrap().value());
    assert_eq!(25, encoder.encode_frequency(250).unwrap().value());
    assert_eq!(127, encoder.encode_frequency(2000).unwrap().value());
    assert_eq!(
        vec![(13, 70)],
        pairs(
            &encoder
                .encode(Parameter::SidetoneFrequency, Value::Int(700))
                .unwrap()
        )
    );
}

#[test]
fn unit_float_keeps_double_precision() {
    let encoder = encoder(ProtocolVersion::ThreeRegister);
    // Just below the boundary of step 64
    let level = 64.0 / 127.5 - 1e-12;
    assert_eq!(
        vec![(4, 63)],
        pairs(&encoder.encode(Parameter::MasterVolume, Value::Float(level)).unwrap())
    );
}
