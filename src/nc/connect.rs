//! Connection initiator
//!
//! Dials one endpoint, directly or through an HTTP CONNECT proxy, and
//! reports whether it is reachable. The connection is closed right after;
//! no payload is exchanged.

use super::proxy::{http_connect, ProxyUrl};
use super::ConnectionRequest;
use crate::error::Result;
use crate::transport::{dial_tcp, dial_udp, Protocol};
use std::fmt;
use std::net::SocketAddr;
use tracing::{debug, info};

/// A successful reachability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connected {
    /// The dialed `host:port`
    pub addr: String,
    /// Protocol used
    pub protocol: Protocol,
    /// Address the socket actually connected to (the proxy's when tunneled)
    pub peer: Option<SocketAddr>,
    /// Proxy the tunnel went through
    pub proxy: Option<ProxyUrl>,
}

impl fmt::Display for Connected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.proxy {
            Some(proxy) => write!(f, "Connected to {} through HTTP proxy {}", self.addr, proxy),
            None => write!(f, "Connected to {} ({})", self.addr, self.protocol.label()),
        }
    }
}

/// Establish, confirm and release one connection
pub async fn connect(request: &ConnectionRequest) -> Result<Connected> {
    let addr = request.endpoint.addr();

    let peer = match (request.protocol, &request.proxy) {
        (Protocol::Tcp, Some(proxy)) => {
            let session = http_connect(proxy, &request.endpoint, request.timeout).await?;
            debug!(
                "Tunnel to {} ready: {} ({} early bytes discarded)",
                addr,
                session.status_line(),
                session.buffered().len()
            );
            session.into_stream().get_ref().peer_addr().ok()
        }
        (Protocol::Tcp, None) => {
            let stream = dial_tcp(&request.endpoint, request.timeout).await?;
            stream.peer_addr().ok()
        }
        (Protocol::Udp, _) => {
            let socket = dial_udp(&request.endpoint, request.timeout).await?;
            socket.peer_addr().ok()
        }
    };

    info!("Reached {} ({}) via {:?}", addr, request.protocol.label(), peer);
    Ok(Connected {
        addr,
        protocol: request.protocol,
        peer,
        proxy: request.proxy.clone(),
    })
}
