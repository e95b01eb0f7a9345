//! TCP dial and listen
//!
//! Provides timed TCP dials and wildcard TCP listeners.

use super::{wildcard_socket, Acceptor, Endpoint, Protocol};
use crate::error::{NetroError, Result};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Pending connections the kernel queues for the accept loop
const LISTEN_BACKLOG: i32 = 1024;

/// Dial `endpoint` over TCP, trying each resolved address within `timeout`
pub async fn dial_tcp(endpoint: &Endpoint, timeout: Duration) -> Result<TcpStream> {
    let result = match tokio::time::timeout(timeout, connect_any(endpoint)).await {
        Ok(result) => result,
        Err(_) => Err(NetroError::timed_out(timeout)),
    };

    result.map_err(|source| NetroError::Connect {
        protocol: Protocol::Tcp.label(),
        addr: endpoint.addr(),
        source,
    })
}

async fn connect_any(endpoint: &Endpoint) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in endpoint.resolve().await? {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("TCP connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address")))
}

/// Bind a TCP listener on all interfaces
pub async fn bind_tcp(port: u16) -> Result<TcpListener> {
    let bind = || -> io::Result<TcpListener> {
        let socket = wildcard_socket(port, Protocol::Tcp)?;
        socket.listen(LISTEN_BACKLOG)?;
        TcpListener::from_std(socket.into())
    };

    let listener = bind().map_err(|source| NetroError::Bind {
        protocol: Protocol::Tcp.label(),
        addr: format!(":{port}"),
        source,
    })?;

    tracing::debug!("TCP listener bound to {:?}", listener.local_addr());
    Ok(listener)
}

#[async_trait]
impl Acceptor for TcpListener {
    type Stream = TcpStream;

    async fn accept(&mut self) -> io::Result<(Self::Stream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}
