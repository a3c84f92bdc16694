//! Transport adapter: hands the populated bank to `rmodbus` and serves it
//! over TCP. Frame parsing, CRC and exception responses stay inside `rmodbus`.
mod frame;
mod hooks;
pub mod pull;
mod server;
mod slave;
mod storage;

pub use frame::read_modbus_frame;
pub use hooks::{format_hex_bytes, LoggingHook, ModbusHook};
pub use server::{FrameProtocol, ModbusServer, ServerOptions};
pub use slave::{build_slave_response, request_unit_id};
pub use storage::{into_shared_storage, storage_from_bank, GeneratorStorage, SharedStorage};
