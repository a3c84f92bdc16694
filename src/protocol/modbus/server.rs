use anyhow::{Context, Result};
use rmodbus::ModbusProto;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use strum::{Display, EnumString};
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
    task::{JoinHandle, JoinSet},
};

use super::{build_slave_response, read_modbus_frame, ModbusHook, SharedStorage};

/// Framing used on accepted TCP connections.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum FrameProtocol {
    /// RTU frames (with CRC) carried over a TCP stream.
    #[default]
    #[strum(
        to_string = "rtu_over_tcp",
        serialize = "rtu-over-tcp",
        serialize = "rtu_tcp",
        serialize = "rtu"
    )]
    RtuOverTcp,
    /// Modbus TCP with MBAP header.
    #[strum(to_string = "tcp")]
    Tcp,
}

impl FrameProtocol {
    pub fn proto(self) -> ModbusProto {
        match self {
            FrameProtocol::RtuOverTcp => ModbusProto::Rtu,
            FrameProtocol::Tcp => ModbusProto::TcpUdp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerOptions {
    /// Answer only this unit id; `None` answers every unit id.
    pub station_id: Option<u8>,
    pub protocol: FrameProtocol,
}

/// A running Modbus slave serving a storage over TCP.
///
/// Dropping the handle stops the server like [`ModbusServer::close`].
pub struct ModbusServer {
    local_addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ModbusServer {
    /// Bind `address` and start accepting connections in the background.
    pub async fn listen(
        address: &str,
        storage: SharedStorage,
        options: ServerOptions,
        hooks: Vec<Arc<dyn ModbusHook>>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to listen on {address}"))?;
        let local_addr = listener.local_addr()?;
        log::info!(
            "Modbus slave listening on {local_addr} ({}, station id {})",
            options.protocol,
            options
                .station_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "any".to_string())
        );

        let handle = tokio::spawn(accept_loop(listener, storage, options, hooks.into()));
        Ok(Self { local_addr, handle })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and drop every open connection.
    pub fn close(self) {
        log::info!("Closing Modbus slave on {}", self.local_addr);
    }
}

impl Drop for ModbusServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn accept_loop(
    listener: TcpListener,
    storage: SharedStorage,
    options: ServerOptions,
    hooks: Arc<[Arc<dyn ModbusHook>]>,
) {
    // Aborting this task drops the set, which aborts every connection.
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    log::info!("Accepted connection from {peer}");
                    let storage = storage.clone();
                    let hooks = hooks.clone();
                    connections.spawn(async move {
                        if let Err(err) = serve_connection(stream, peer, storage, options, &hooks).await {
                            log::warn!("Connection from {peer} failed: {err:#}");
                        }
                        log::info!("Connection from {peer} closed");
                    });
                }
                Err(err) => {
                    log::warn!("Failed to accept connection: {err}");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    storage: SharedStorage,
    options: ServerOptions,
    hooks: &[Arc<dyn ModbusHook>],
) -> Result<()> {
    let peer = peer.to_string();
    let proto = options.protocol.proto();

    while let Some(request) = read_modbus_frame(&mut stream, proto).await? {
        for hook in hooks {
            if let Err(err) = hook.on_before_request(&peer, &request) {
                log::warn!("Hook on_before_request failed: {err}");
            }
        }

        match build_slave_response(&request, options.station_id, proto, &storage) {
            Ok(Some(response)) => {
                stream.write_all(&response).await?;
                for hook in hooks {
                    if let Err(err) = hook.on_after_response(&peer, &response) {
                        log::warn!("Hook on_after_response failed: {err}");
                    }
                }
            }
            Ok(None) => log::debug!("No response due for request from {peer}"),
            Err(err) => {
                log::warn!("Dropped request from {peer}: {err}");
                for hook in hooks {
                    hook.on_error(&peer, &err);
                }
            }
        }
    }

    Ok(())
}
