use std::sync::Arc;

use anyhow::Result;
use modbus_generator::{
    configure_records, into_shared_storage, pull, FrameProtocol, LoggingHook, ModbusHook,
    ModbusServer, RegisterBank, RegisterCategory, ServerOptions,
};
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

async fn start_server(station_id: Option<u8>, protocol: FrameProtocol) -> Result<ModbusServer> {
    let mut bank = RegisterBank::new();
    configure_records(
        &mut bank,
        RegisterCategory::HoldingRegister,
        &[
            json!({"type": "float32BigWordBigEndian", "number": 3.1415, "regAddr": 101}),
            json!({"type": "wordInt16BigEndian", "number": 2, "regAddr": 103}),
        ],
        -1,
    )?;
    configure_records(
        &mut bank,
        RegisterCategory::Coil,
        &[json!({"type": "wordInt16LittleEndian", "number": 1, "regAddr": 5})],
        -1,
    )?;

    let hooks: Vec<Arc<dyn ModbusHook>> = vec![Arc::new(LoggingHook)];
    ModbusServer::listen(
        "127.0.0.1:0",
        into_shared_storage(bank)?,
        ServerOptions {
            station_id,
            protocol,
        },
        hooks,
    )
    .await
}

async fn exchange(stream: &mut TcpStream, request: &[u8], response_len: usize) -> Result<Vec<u8>> {
    stream.write_all(request).await?;
    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;
    Ok(response)
}

#[tokio::test]
async fn test_read_holdings_over_rtu() -> Result<()> {
    let server = start_server(None, FrameProtocol::RtuOverTcp).await?;
    let mut stream = TcpStream::connect(server.local_addr()).await?;

    let proto = FrameProtocol::RtuOverTcp.proto();
    let (mut request, raw) =
        pull::generate_pull_request(RegisterCategory::HoldingRegister, 1, proto, 100, 3)?;
    // unit, function, byte count, three words, CRC
    let response = exchange(&mut stream, &raw, 3 + 6 + 2).await?;
    let words = pull::parse_pull_words(&mut request, proto, &response)?;
    assert_eq!(words, vec![0x4049, 0x0E56, 0x0201]);

    server.close();
    Ok(())
}

#[tokio::test]
async fn test_read_coils_over_tcp() -> Result<()> {
    let server = start_server(Some(1), FrameProtocol::Tcp).await?;
    let mut stream = TcpStream::connect(server.local_addr()).await?;

    let proto = FrameProtocol::Tcp.proto();
    let (mut request, raw) = pull::generate_pull_request(RegisterCategory::Coil, 1, proto, 3, 4)?;
    // MBAP header, unit, function, byte count, one data byte
    let response = exchange(&mut stream, &raw, 7 + 2 + 1).await?;
    let bits = pull::parse_pull_bits(&mut request, proto, &response, 4)?;
    assert_eq!(bits, vec![false, true, false, false]);

    server.close();
    Ok(())
}

#[tokio::test]
async fn test_several_requests_on_one_connection() -> Result<()> {
    let server = start_server(None, FrameProtocol::RtuOverTcp).await?;
    let mut stream = TcpStream::connect(server.local_addr()).await?;
    let proto = FrameProtocol::RtuOverTcp.proto();

    for _ in 0..3 {
        let (mut request, raw) =
            pull::generate_pull_request(RegisterCategory::HoldingRegister, 4, proto, 102, 1)?;
        let response = exchange(&mut stream, &raw, 3 + 2 + 2).await?;
        assert_eq!(response[0], 4);
        assert_eq!(pull::parse_pull_words(&mut request, proto, &response)?, vec![0x0201]);
    }

    server.close();
    Ok(())
}

#[tokio::test]
async fn test_bad_crc_is_dropped_and_connection_keeps_serving() -> Result<()> {
    let server = start_server(None, FrameProtocol::RtuOverTcp).await?;
    let mut stream = TcpStream::connect(server.local_addr()).await?;
    let proto = FrameProtocol::RtuOverTcp.proto();

    let (_, mut corrupted) =
        pull::generate_pull_request(RegisterCategory::HoldingRegister, 1, proto, 100, 1)?;
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xFF;
    stream.write_all(&corrupted).await?;

    let (mut request, raw) =
        pull::generate_pull_request(RegisterCategory::HoldingRegister, 1, proto, 100, 1)?;
    let response = exchange(&mut stream, &raw, 3 + 2 + 2).await?;
    assert_eq!(pull::parse_pull_words(&mut request, proto, &response)?, vec![0x4049]);

    server.close();
    Ok(())
}

#[tokio::test]
async fn test_high_holding_address_is_served() -> Result<()> {
    let mut bank = RegisterBank::new();
    configure_records(
        &mut bank,
        RegisterCategory::HoldingRegister,
        &[json!({"type": "float32BigWordBigEndian", "number": 3.1415, "regAddr": 30001})],
        -1,
    )?;
    let hooks: Vec<Arc<dyn ModbusHook>> = Vec::new();
    let server = ModbusServer::listen(
        "127.0.0.1:0",
        into_shared_storage(bank)?,
        ServerOptions::default(),
        hooks,
    )
    .await?;
    let mut stream = TcpStream::connect(server.local_addr()).await?;

    let proto = FrameProtocol::RtuOverTcp.proto();
    let (mut request, raw) =
        pull::generate_pull_request(RegisterCategory::HoldingRegister, 1, proto, 30000, 2)?;
    let response = exchange(&mut stream, &raw, 3 + 4 + 2).await?;
    assert_eq!(
        pull::parse_pull_words(&mut request, proto, &response)?,
        vec![0x4049, 0x0E56]
    );

    server.close();
    Ok(())
}

#[tokio::test]
async fn test_closed_server_refuses_connections() -> Result<()> {
    let server = start_server(None, FrameProtocol::RtuOverTcp).await?;
    let address = server.local_addr();
    server.close();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert!(TcpStream::connect(address).await.is_err());
    Ok(())
}
