// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

use derive_more::{Display, Into};

use crate::Error;

/// Status nibble of a Control-Change message.
pub const CC_STATUS: u8 = 0xb0;

const U7_MASK: u8 = 0x7f;

const CHANNEL_MAX: u8 = 0x0f;

/// MIDI channel in the range `0..=15`.
///
/// Channels are numbered from 0 on the wire, i.e. the first
/// channel that is displayed as "1" by most applications is 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Into)]
#[repr(transparent)]
pub struct Channel(u8);

impl Channel {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(CHANNEL_MAX);

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > CHANNEL_MAX {
            return Err(Error::InvalidChannel(value));
        }
        Ok(Self(value))
    }
}

/// Controller number of a Control-Change message.
///
/// Always a 7-bit value, excess bits are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Into)]
#[repr(transparent)]
pub struct ControlCode(u8);

impl ControlCode {
    #[must_use]
    pub const fn new(code: u8) -> Self {
        Self(code & U7_MASK)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A single Control-Change message.
///
/// The atomic unit of transmission. The value is always
/// masked to 7 bits on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CcMessage {
    pub channel: Channel,
    pub control: ControlCode,
    value: u8,
}

impl CcMessage {
    #[must_use]
    pub const fn new(channel: Channel, control: ControlCode, value: u8) -> Self {
        Self {
            channel,
            control,
            value: value & U7_MASK,
        }
    }

    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Wire representation: status, controller number, value.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 3] {
        [
            CC_STATUS | self.channel.value(),
            self.control.value(),
            self.value,
        ]
    }

    /// Parse a Control-Change message from its wire representation.
    ///
    /// Returns `None` for any other kind of MIDI message or if
    /// the data bytes are not 7-bit clean.
    #[must_use]
    pub fn try_from_bytes(input: &[u8]) -> Option<Self> {
        let [status, control, value] = *input else {
            return None;
        };
        if status & 0xf0 != CC_STATUS || control > U7_MASK || value > U7_MASK {
            return None;
        }
        let channel = Channel(status & CHANNEL_MAX);
        Some(Self::new(channel, ControlCode::new(control), value))
    }
}
