//! Hooks the server calls around every request.
//!
//! Hooks are chained in the order they are installed. A failing hook is
//! logged and never stops the server.
use anyhow::Result;

pub trait ModbusHook: Send + Sync {
    /// Called with every complete request frame before it is processed.
    fn on_before_request(&self, _peer: &str, _request: &[u8]) -> Result<()> {
        Ok(())
    }

    /// Called after a response frame has been written back.
    fn on_after_response(&self, _peer: &str, _response: &[u8]) -> Result<()> {
        Ok(())
    }

    /// Called when a request could not be processed.
    fn on_error(&self, _peer: &str, _error: &anyhow::Error) {}
}

/// Logs every frame in hex at debug level.
pub struct LoggingHook;

impl ModbusHook for LoggingHook {
    fn on_before_request(&self, peer: &str, request: &[u8]) -> Result<()> {
        log::debug!("{peer} -> {}", format_hex_bytes(request));
        Ok(())
    }

    fn on_after_response(&self, peer: &str, response: &[u8]) -> Result<()> {
        log::debug!("{peer} <- {}", format_hex_bytes(response));
        Ok(())
    }

    fn on_error(&self, peer: &str, error: &anyhow::Error) {
        log::debug!("{peer} !! {error:#}");
    }
}

/// Convert a byte slice into an uppercase hexadecimal string separated by spaces.
pub fn format_hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
