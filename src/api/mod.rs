//! Public entry points of the register generator.
//!
//! `ValueDescriptor::from_record` turns one JSON record into a descriptor,
//! [`build_image`] places encoded entries into a register image, and
//! [`ModbusServer`] serves a populated bank.

pub use crate::protocol::{
    encoding::{
        decode_float, encode_words, swap_bytes, EncodedEntry, EncodedWords, EncodingKind,
        ValueDescriptor,
    },
    error::{DecodeError, PlacementError, UnknownRegisterCategory},
    modbus::{
        into_shared_storage, pull, FrameProtocol, GeneratorStorage, LoggingHook, ModbusHook,
        ModbusServer, ServerOptions, SharedStorage,
    },
    pipeline::{configure_bank, configure_category, configure_records, CategoryReport},
    register::{
        build_image, BankSnapshot, RegisterBank, RegisterCategory, RegisterImage, ADDRESS_SPACE,
    },
};
