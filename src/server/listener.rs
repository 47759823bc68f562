use std::io;
use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::SetupError;

/// Pending-connection queue length passed to listen(2).
pub const LISTEN_BACKLOG: u32 = 10;

/// Resolves the configured host, binds the first address that accepts a
/// socket, and starts listening.
pub async fn bind(cfg: &ServerConfig) -> Result<TcpListener, SetupError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((cfg.host.as_str(), cfg.port))
        .await
        .map_err(|source| SetupError::Resolve {
            host: cfg.host.clone(),
            port: cfg.port,
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(SetupError::NoAddress {
            host: cfg.host.clone(),
            port: cfg.port,
        });
    }

    let mut last_err = None;

    for addr in addrs {
        match bind_one(addr) {
            Ok(socket) => {
                let listener = socket.listen(LISTEN_BACKLOG).map_err(SetupError::Listen)?;
                info!("Listening on {}", addr);
                return Ok(listener);
            }
            Err(e) => {
                debug!(%addr, error = %e, "Bind attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(SetupError::Bind(
        last_err.unwrap_or_else(|| io::Error::other("no address could be bound")),
    ))
}

fn bind_one(addr: SocketAddr) -> io::Result<TcpSocket> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    Ok(socket)
}
