//! Master-side helpers for reading a slave's tables back, e.g. to check what a
//! configuration actually serves.
use anyhow::{ensure, Result};
use rmodbus::{client::ModbusRequest, ModbusProto};

use crate::protocol::register::RegisterCategory;

/// Build a read request for `count` units of `category` starting at `start_address`.
pub fn generate_pull_request(
    category: RegisterCategory,
    station_id: u8,
    proto: ModbusProto,
    start_address: u16,
    count: u16,
) -> Result<(ModbusRequest, Vec<u8>)> {
    let mut request = ModbusRequest::new(station_id, proto);
    let mut raw = Vec::with_capacity(12);
    match category {
        RegisterCategory::Coil => request.generate_get_coils(start_address, count, &mut raw)?,
        RegisterCategory::DiscreteInput => {
            request.generate_get_discretes(start_address, count, &mut raw)?
        }
        RegisterCategory::InputRegister => {
            request.generate_get_inputs(start_address, count, &mut raw)?
        }
        RegisterCategory::HoldingRegister => {
            request.generate_get_holdings(start_address, count, &mut raw)?
        }
    }
    Ok((request, raw))
}

/// Data bytes of a read response, after the byte count.
fn response_payload(response: &[u8], proto: ModbusProto) -> Result<&[u8]> {
    let (start, trailer) = match proto {
        ModbusProto::TcpUdp => (9, 0),
        _ => (3, 2),
    };
    ensure!(
        response.len() >= start + trailer,
        "Modbus response too short: {} bytes",
        response.len()
    );
    Ok(&response[start..response.len() - trailer])
}

/// Parse a register read response into words.
pub fn parse_pull_words(
    request: &mut ModbusRequest,
    proto: ModbusProto,
    response: &[u8],
) -> Result<Vec<u16>> {
    request.parse_ok(response)?;
    let values = response_payload(response, proto)?
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect::<Vec<_>>();
    log::debug!("Received registers: {values:04X?}");
    Ok(values)
}

/// Parse a coil or discrete read response into `count` bits.
pub fn parse_pull_bits(
    request: &mut ModbusRequest,
    proto: ModbusProto,
    response: &[u8],
    count: u16,
) -> Result<Vec<bool>> {
    request.parse_ok(response)?;

    // First bit is the LSB of the first data byte.
    let mut values = response_payload(response, proto)?
        .iter()
        .flat_map(|byte| (0..8).map(move |i| (*byte & (1 << i)) != 0))
        .collect::<Vec<bool>>();
    values.truncate(count as usize);
    ensure!(
        values.len() == count as usize,
        "Invalid number of bits in response"
    );
    log::debug!("Received bits: {values:?}");
    Ok(values)
}
