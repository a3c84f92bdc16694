use anyhow::{anyhow, Result};
use rmodbus::{server::ModbusFrame, ModbusProto};

use super::SharedStorage;

/// Unit id a request is addressed to.
pub fn request_unit_id(request: &[u8], proto: ModbusProto) -> Option<u8> {
    match proto {
        ModbusProto::TcpUdp => request.get(6).copied(),
        _ => request.first().copied(),
    }
}

/// Process one request frame against the storage and build the response.
///
/// With `station_id` set only that unit id is answered; with `None` the slave
/// answers whatever unit id the request carries. Returns `Ok(None)` when no
/// response is due (other unit, broadcast).
pub fn build_slave_response(
    request: &[u8],
    station_id: Option<u8>,
    proto: ModbusProto,
    storage: &SharedStorage,
) -> Result<Option<Vec<u8>>> {
    let unit_id = station_id
        .or_else(|| request_unit_id(request, proto))
        .ok_or_else(|| anyhow!("Empty Modbus frame"))?;

    let mut response = Vec::new();
    let mut frame = ModbusFrame::new(unit_id, request, proto, &mut response);
    frame.parse()?;

    if frame.processing_required {
        let result = if frame.readonly {
            frame.process_read(&**storage.read())
        } else {
            frame.process_write(&mut **storage.write())
        };
        if result.is_err() {
            return Err(anyhow!("Frame processing error"));
        }
    }

    if frame.response_required {
        frame.finalize_response()?;
        log::debug!("Send Modbus response: {:02x?}", frame.response);
        return Ok(Some(frame.response.clone()));
    }

    Ok(None)
}
