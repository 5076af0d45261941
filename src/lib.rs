// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
//#![warn(missing_docs)] // FIXME
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(rustdoc::broken_intra_doc_links)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]

use thiserror::Error;

mod message;
pub use self::message::{CcMessage, Channel, ControlCode, CC_STATUS};

pub mod quantize;

mod vocabulary;
pub use self::vocabulary::{Parameter, ParameterSpec, ProtocolVersion, ValueDomain, Vocabulary};

mod encoder;
pub use self::encoder::{Encoder, RegisterWrite, Value};

pub mod nrpn;

pub mod midi;
pub use self::midi::{
    MidiInputHandler, MidiOutputConnection, OutputError, OutputResult, TimeStamp,
};

mod session;
pub use self::session::{
    Session, SessionConfig, SessionError, SessionResult, DEFAULT_PORT_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown parameter \"{0}\"")]
    UnknownParameter(String),
    #[error("{parameter} ({domain}) cannot be set from {value}")]
    IncompatibleValue {
        parameter: Parameter,
        domain: ValueDomain,
        value: &'static str,
    },
    #[error("invalid MIDI channel {0}")]
    InvalidChannel(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
