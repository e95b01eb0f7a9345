//! Transport module for Netro
//!
//! This module provides the socket layer for the nc relay: endpoint
//! resolution, timed TCP/UDP dials, wildcard listeners and the accept
//! abstraction the listener loop runs on.

mod addr;
mod tcp;
mod udp;

pub use addr::{display_addr, Endpoint};
pub use tcp::{bind_tcp, dial_tcp};
pub use udp::{bind_udp, dial_udp};

use crate::error::NetroError;
use async_trait::async_trait;
use socket2::{Domain, Socket, Type};
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use tokio::io::{AsyncRead, AsyncWrite};

/// Transport protocol of a connection or listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Stream sockets
    Tcp,
    /// Datagram sockets
    Udp,
}

impl Protocol {
    /// Upper-case label used in status lines
    pub fn label(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }

    fn socket_type(self) -> Type {
        match self {
            Protocol::Tcp => Type::STREAM,
            Protocol::Udp => Type::DGRAM,
        }
    }

    fn socket_protocol(self) -> socket2::Protocol {
        match self {
            Protocol::Tcp => socket2::Protocol::TCP,
            Protocol::Udp => socket2::Protocol::UDP,
        }
    }
}

impl FromStr for Protocol {
    type Err = NetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            _ => Err(NetroError::UnsupportedProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// Source of accepted connections for the listener loop
///
/// Any error returned from `accept` ends the listener.
#[async_trait]
pub trait Acceptor: Send {
    /// The stream type of an accepted connection
    type Stream: AsyncRead + AsyncWrite + Send + 'static;

    /// Wait for the next inbound connection
    async fn accept(&mut self) -> io::Result<(Self::Stream, SocketAddr)>;
}

/// Create a non-blocking socket bound to every local interface
///
/// Prefers a dual-stack IPv6 wildcard socket and falls back to the IPv4
/// wildcard when the host has no IPv6.
pub(crate) fn wildcard_socket(port: u16, protocol: Protocol) -> io::Result<Socket> {
    let v6: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();
    match bind_socket(Domain::IPV6, v6, protocol) {
        Ok(socket) => Ok(socket),
        Err(e) if ipv6_unavailable(&e) => {
            tracing::debug!("IPv6 wildcard bind unavailable ({}), using IPv4", e);
            let v4: SocketAddr = (Ipv4Addr::UNSPECIFIED, port).into();
            bind_socket(Domain::IPV4, v4, protocol)
        }
        Err(e) => Err(e),
    }
}

fn bind_socket(domain: Domain, addr: SocketAddr, protocol: Protocol) -> io::Result<Socket> {
    let socket = Socket::new(
        domain,
        protocol.socket_type(),
        Some(protocol.socket_protocol()),
    )?;
    if domain == Domain::IPV6 {
        socket.set_only_v6(false)?;
    }
    #[cfg(unix)]
    {
        if protocol == Protocol::Tcp {
            socket.set_reuse_address(true)?;
        }
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    Ok(socket)
}

// Errors that would hit the IPv4 bind just the same are not worth a retry
fn ipv6_unavailable(err: &io::Error) -> bool {
    !matches!(
        err.kind(),
        io::ErrorKind::AddrInUse | io::ErrorKind::PermissionDenied
    )
}
