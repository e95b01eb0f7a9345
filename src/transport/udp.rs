//! UDP dial and bind

use super::{wildcard_socket, Endpoint, Protocol};
use crate::error::{NetroError, Result};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// "Dial" `endpoint` over UDP: bind an ephemeral local socket and connect it
///
/// No datagram is sent; this only proves the address resolves and a route
/// exists.
pub async fn dial_udp(endpoint: &Endpoint, timeout: Duration) -> Result<UdpSocket> {
    let result = match tokio::time::timeout(timeout, connect_any(endpoint)).await {
        Ok(result) => result,
        Err(_) => Err(NetroError::timed_out(timeout)),
    };

    result.map_err(|source| NetroError::Connect {
        protocol: Protocol::Udp.label(),
        addr: endpoint.addr(),
        source,
    })
}

async fn connect_any(endpoint: &Endpoint) -> io::Result<UdpSocket> {
    let mut last_err = None;
    for addr in endpoint.resolve().await? {
        let local: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = match UdpSocket::bind(local).await {
            Ok(socket) => socket,
            Err(e) => {
                tracing::debug!("UDP bind for {} failed: {}", addr, e);
                last_err = Some(e);
                continue;
            }
        };
        match socket.connect(addr).await {
            Ok(()) => return Ok(socket),
            Err(e) => {
                tracing::debug!("UDP connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address")))
}

/// Bind a UDP socket on all interfaces
pub async fn bind_udp(port: u16) -> Result<UdpSocket> {
    let bind = || -> io::Result<UdpSocket> {
        let socket = wildcard_socket(port, Protocol::Udp)?;
        UdpSocket::from_std(socket.into())
    };

    bind().map_err(|source| NetroError::Bind {
        protocol: Protocol::Udp.label(),
        addr: format!(":{port}"),
        source,
    })
}
