// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

//! Quantization of semantic values into 7-bit protocol values
//!
//! All conversions are lossy and total. Out-of-range inputs are
//! either saturated or wrapped, but never rejected. The device
//! firmware tolerates any 7-bit value.

const U7_MASK: i64 = 0x7f;

/// Largest 7-bit value.
pub const U7_MAX: u8 = 0x7f;

/// Scale factor for unit floats.
///
/// Slightly larger than [`U7_MAX`] to give the top value
/// the same share of the input range as all others.
const UNIT_FLOAT_SCALE: f64 = 127.5;

/// Lowest sidetone frequency.
pub const FREQUENCY_MIN_HZ: i64 = 250;

/// Highest sidetone frequency.
pub const FREQUENCY_MAX_HZ: i64 = 1270;

const FREQUENCY_STEP_SHIFT: u32 = 3;

/// Width of a single frequency step.
pub const FREQUENCY_STEP_HZ: u32 = 1 << FREQUENCY_STEP_SHIFT;

/// Width of a single step of [`quantize_coarse_frequency()`].
pub const COARSE_FREQUENCY_STEP_HZ: i64 = 10;

/// Highest frequency of [`quantize_coarse_frequency()`].
pub const COARSE_FREQUENCY_MAX_HZ: i64 = 1270;

/// Encode a boolean switch.
#[must_use]
pub const fn quantize_switch(on: bool) -> u8 {
    if on {
        1
    } else {
        0
    }
}

/// Encode a boolean switch following the MIDI controller convention.
///
/// Receivers read all values above 63 as on.
#[must_use]
pub const fn quantize_controller_switch(on: bool) -> u8 {
    if on {
        U7_MAX
    } else {
        0
    }
}

/// Wrap an integer into 7 bits.
///
/// Only the lowest 7 bits are kept, i.e. negative numbers
/// wrap according to their two's complement representation.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn quantize_u7(value: i64) -> u8 {
    (value & U7_MASK) as u8
}

/// Map a float from the unit interval [0, 1] onto [0, 127].
///
/// Inputs outside of the unit interval are clamped and NaN is
/// treated as 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantize_unit_float(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let clamped = value.clamp(0.0, 1.0);
    // 1.0 * 127.5 = 127.5 is floored to 127
    (clamped * UNIT_FLOAT_SCALE).floor() as u8
}

/// Inverse of [`quantize_unit_float()`] as applied by the firmware.
#[must_use]
pub fn dequantize_unit_float(value: u8) -> f64 {
    f64::from(value & U7_MAX) / f64::from(U7_MAX)
}

/// Map a sidetone frequency in Hz onto [0, 127].
///
/// The frequency is clamped into the range
/// [`FREQUENCY_MIN_HZ`, `FREQUENCY_MAX_HZ`] and then divided into
/// steps of [`FREQUENCY_STEP_HZ`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn quantize_frequency(hz: i64) -> u8 {
    let clamped = if hz < FREQUENCY_MIN_HZ {
        FREQUENCY_MIN_HZ
    } else if hz > FREQUENCY_MAX_HZ {
        FREQUENCY_MAX_HZ
    } else {
        hz
    };
    ((clamped - FREQUENCY_MIN_HZ) >> FREQUENCY_STEP_SHIFT) as u8
}

/// Center frequency of a quantized frequency step.
///
/// Recovers every frequency within the valid range with an
/// error of at most half a step.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn dequantize_frequency(value: u8) -> u32 {
    let step = (value & U7_MAX) as u32;
    FREQUENCY_MIN_HZ as u32 + (step << FREQUENCY_STEP_SHIFT) + FREQUENCY_STEP_HZ / 2
}

/// Map a sidetone frequency in Hz onto steps of 10 Hz.
///
/// Rounds to the nearest step and saturates at 0 and
/// [`COARSE_FREQUENCY_MAX_HZ`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn quantize_coarse_frequency(hz: i64) -> u8 {
    let clamped = if hz < 0 {
        0
    } else if hz > COARSE_FREQUENCY_MAX_HZ {
        COARSE_FREQUENCY_MAX_HZ
    } else {
        hz
    };
    ((clamped + COARSE_FREQUENCY_STEP_HZ / 2) / COARSE_FREQUENCY_STEP_HZ) as u8
}

/// Pack a pair of left/right switches into bits 1 and 0.
#[must_use]
pub const fn pack_stereo_switch(left: bool, right: bool) -> u8 {
    (quantize_switch(left) << 1) | quantize_switch(right)
}

/// Inverse of [`pack_stereo_switch()`].
#[must_use]
pub const fn unpack_stereo_switch(value: u8) -> (bool, bool) {
    (value & 0b10 != 0, value & 0b01 != 0)
}
