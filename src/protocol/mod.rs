pub mod encoding;
pub mod error;
pub mod modbus;
pub mod pipeline;
pub mod register;
