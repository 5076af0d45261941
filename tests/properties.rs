// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

//! Invariants of the encoding for arbitrary inputs.

use cwkeyer::{
    quantize::{
        dequantize_frequency, quantize_frequency, quantize_u7, quantize_unit_float,
        FREQUENCY_MAX_HZ, FREQUENCY_MIN_HZ,
    },
    Channel, Encoder, Parameter, ProtocolVersion, RegisterWrite, Value, Vocabulary,
};

fn encoder() -> Encoder {
    Encoder::new(Vocabulary::new(ProtocolVersion::ThreeRegister), Channel::MIN)
}

proptest::proptest! {
    #[test]
    fn unit_float_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        assert!(quantize_unit_float(lo) <= quantize_unit_float(hi));
    }

    #[test]
    fn unit_float_saturates(x in proptest::num::f64::ANY) {
        let quantized = quantize_unit_float(x);
        assert!(quantized <= 127);
        if x >= 1.0 {
            assert_eq!(127, quantized);
        }
        if x <= 0.0 || x.is_nan() {
            assert_eq!(0, quantized);
        }
    }

    #[test]
    fn u7_keeps_low_bits(value in proptest::num::i64::ANY) {
        assert_eq!((value & 0x7f) as u8, quantize_u7(value));
    }

    #[test]
    fn frequency_round_trip_within_half_step(hz in FREQUENCY_MIN_HZ..=FREQUENCY_MAX_HZ) {
        let restored = i64::from(dequantize_frequency(quantize_frequency(hz)));
        assert!((restored - hz).abs() <= 4, "{hz} Hz restored as {restored} Hz");
    }

    #[test]
    fn frequency_is_clamped(hz in proptest::num::i64::ANY) {
        let quantized = quantize_frequency(hz);
        if hz <= FREQUENCY_MIN_HZ {
            assert_eq!(0, quantized);
        }
        if hz >= FREQUENCY_MAX_HZ {
            assert_eq!(127, quantized);
        }
    }

    #[test]
    fn raw_write_layout(register in 0u8..=127, value in 0u16..=0x1ff, mask in 0u16..=0x1ff, force: bool) {
        let mut write = RegisterWrite::new(register, value).with_mask(mask);
        if force {
            write = write.forced();
        }
        let messages = encoder().encode_raw_write(write).unwrap();
        let controls = messages.iter().map(|msg| msg.control.value()).collect::<Vec<_>>();
        assert_eq!(vec![0, 1, 2, 37], controls);
        assert_eq!((value & 0x7f) as u8, messages[0].value());
        assert_eq!((mask & 0x7f) as u8, messages[1].value());
        let expected_c = (if force { 0x10 } else { 0 })
            | (((mask >> 5) & 0b01100) as u8)
            | (((value >> 7) & 0b00011) as u8);
        assert_eq!(expected_c, messages[2].value());
        assert_eq!(register, messages[3].value());
    }

    #[test]
    fn stereo_volume_stages_before_trigger(left in 0.0f64..=1.0, right in 0.0f64..=1.0) {
        let messages = encoder()
            .encode(Parameter::Wm8960Volume, Value::Stereo(left, right))
            .unwrap();
        assert_eq!(2, messages.len());
        assert_eq!(0, messages[0].control.value());
        assert_eq!(quantize_unit_float(right), messages[0].value());
        assert_eq!(quantize_unit_float(left), messages[1].value());
    }

    #[test]
    fn encoding_is_deterministic(level in proptest::num::f64::ANY) {
        let encoder = encoder();
        assert_eq!(
            encoder.encode(Parameter::MasterVolume, Value::Float(level)),
            encoder.encode(Parameter::MasterVolume, Value::Float(level)),
        );
    }

    #[test]
    fn all_messages_are_control_changes(channel in 0u8..=15, wpm in proptest::num::i64::ANY) {
        let encoder = Encoder::new(Vocabulary::default(), Channel::try_from(channel).unwrap());
        for msg in encoder.encode(Parameter::CwSpeed, Value::Int(wpm)).unwrap() {
            let [status, control, value] = msg.to_bytes();
            assert_eq!(0xb0 | channel, status);
            assert!(control <= 0x7f);
            assert!(value <= 0x7f);
        }
    }
}
