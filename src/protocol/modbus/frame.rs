use anyhow::{ensure, Result};
use bytes::Bytes;
use rmodbus::{guess_request_frame_len, ModbusProto};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Shortest RTU request we answer: unit, function, four data bytes, CRC.
const RTU_HEADER_LEN: usize = 8;
const MBAP_HEADER_LEN: usize = 6;
const MAX_FRAME_LEN: usize = 260;

/// Read one complete request frame from a stream.
///
/// Returns `Ok(None)` when the peer closes the stream before a new frame
/// starts.
pub async fn read_modbus_frame<R>(reader: &mut R, proto: ModbusProto) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let header_len = match proto {
        ModbusProto::TcpUdp => MBAP_HEADER_LEN,
        _ => RTU_HEADER_LEN,
    };

    let mut buf = vec![0u8; header_len];
    match reader.read_exact(&mut buf).await {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }

    let len = match proto {
        ModbusProto::TcpUdp => MBAP_HEADER_LEN + u16::from_be_bytes([buf[4], buf[5]]) as usize,
        _ => guess_request_frame_len(&buf, proto)? as usize,
    };
    ensure!(
        (header_len..=MAX_FRAME_LEN).contains(&len),
        "Invalid Modbus frame length {len} (header {:02X?})",
        buf
    );

    buf.resize(len, 0);
    reader.read_exact(&mut buf[header_len..]).await?;

    Ok(Some(Bytes::from(buf)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmodbus::client::ModbusRequest;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_read_rtu_frame_in_pieces() {
        let mut raw = Vec::new();
        ModbusRequest::new(1, ModbusProto::Rtu)
            .generate_get_holdings(100, 4, &mut raw)
            .unwrap();
        assert_eq!(raw.len(), 8);

        let mut mock = Builder::new().read(&raw[..3]).read(&raw[3..]).build();
        let frame = read_modbus_frame(&mut mock, ModbusProto::Rtu)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.as_ref(), raw.as_slice());
        assert!(read_modbus_frame(&mut mock, ModbusProto::Rtu)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_read_rtu_write_frame() {
        let mut raw = Vec::new();
        ModbusRequest::new(1, ModbusProto::Rtu)
            .generate_set_holdings_bulk(10, &[1, 2, 3], &mut raw)
            .unwrap();
        assert_eq!(raw.len(), 15);

        let mut mock = Builder::new().read(&raw).build();
        let frame = read_modbus_frame(&mut mock, ModbusProto::Rtu)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.len(), 15);
    }

    #[tokio::test]
    async fn test_read_tcp_frames_back_to_back() {
        let mut request = ModbusRequest::new(1, ModbusProto::TcpUdp);
        let mut first = Vec::new();
        request.generate_get_coils(0, 8, &mut first).unwrap();
        let mut second = Vec::new();
        request.generate_get_inputs(5, 2, &mut second).unwrap();
        let mut stream = first.clone();
        stream.extend_from_slice(&second);

        let mut mock = Builder::new().read(&stream).build();
        let a = read_modbus_frame(&mut mock, ModbusProto::TcpUdp)
            .await
            .unwrap()
            .unwrap();
        let b = read_modbus_frame(&mut mock, ModbusProto::TcpUdp)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.as_ref(), first.as_slice());
        assert_eq!(b.as_ref(), second.as_slice());
    }

    #[tokio::test]
    async fn test_truncated_body_is_an_error() {
        let mut raw = Vec::new();
        ModbusRequest::new(1, ModbusProto::TcpUdp)
            .generate_get_holdings(0, 1, &mut raw)
            .unwrap();
        let mut mock = Builder::new().read(&raw[..8]).build();
        assert!(read_modbus_frame(&mut mock, ModbusProto::TcpUdp)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unframeable_rtu_header_is_an_error() {
        // Write multiple registers announcing 255 data bytes: longer than any RTU frame.
        let header = [1u8, 0x10, 0, 0, 0, 0x7F, 0xFF, 0];
        let mut mock = Builder::new().read(&header).build();
        assert!(read_modbus_frame(&mut mock, ModbusProto::Rtu)
            .await
            .is_err());
    }
}
