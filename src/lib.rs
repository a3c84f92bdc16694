//! Modbus generator: a simulated Modbus slave whose register tables are
//! pre-populated from JSON value descriptions.
//!
//! Each of the four register categories (coils, discrete inputs, input
//! registers, holding registers) can be described by a JSON array of
//! `{type, number, regAddr}` records. Records are encoded into 16-bit words
//! in one of six layouts, placed into a register image and served over TCP.
//!
//! The public API lives in [`api`]. The process wiring (logging, command line)
//! is kept in hidden modules.

pub mod api;
#[doc(hidden)]
pub mod boot;
#[doc(hidden)]
pub mod cli;
#[doc(hidden)]
pub mod protocol;

pub use api::*;
