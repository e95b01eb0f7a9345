//! Netcat-style TCP/UDP relay
//!
//! Two independent entry points share no state:
//!
//! - [`connect`] dials one endpoint (optionally through an HTTP CONNECT
//!   proxy) to check that it is reachable, then releases the connection;
//! - [`listen`] binds a local port and relays every accepted TCP
//!   connection to the process's standard streams, or acknowledges every
//!   UDP datagram.

mod connect;
mod listen;
mod proxy;
mod relay;
mod stdio;
mod udp;

pub use connect::{connect, Connected};
pub use listen::{listen, serve_tcp};
pub use proxy::{http_connect, negotiate, ProxyUrl, TunnelSession};
pub use relay::{pump, relay, RelayStats};
pub use stdio::{write_line, LocalIo, Stdio};
pub use udp::echo_datagrams;

use crate::config::NcConfig;
use crate::error::{NetroError, Result};
use crate::helper::parse_duration;
use crate::transport::{Endpoint, Protocol};
use clap::Args;
use std::time::Duration;

/// One outbound reachability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    /// Target host and port
    pub endpoint: Endpoint,
    /// Protocol to dial with
    pub protocol: Protocol,
    /// Bound on the dial and, when proxied, the CONNECT handshake
    pub timeout: Duration,
    /// HTTP proxy to tunnel through (TCP only)
    pub proxy: Option<ProxyUrl>,
}

/// One listening session on all local interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenRequest {
    /// Local port, 0 for an ephemeral one
    pub port: u16,
    /// Protocol to listen with
    pub protocol: Protocol,
}

/// What an nc invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NcRequest {
    /// Client mode
    Connect(ConnectionRequest),
    /// Listen mode
    Listen(ListenRequest),
}

/// Tunables for listen mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenOptions {
    /// Chunk size of each relay direction
    pub relay_buffer_size: usize,
    /// Datagram buffer size; longer datagrams are truncated
    pub udp_buffer_size: usize,
    /// Payload answered to every datagram
    pub udp_ack: Vec<u8>,
}

impl From<&NcConfig> for ListenOptions {
    fn from(config: &NcConfig) -> Self {
        ListenOptions {
            relay_buffer_size: config.relay_buffer_size,
            udp_buffer_size: config.udp_buffer_size,
            udp_ack: config.udp_ack.as_bytes().to_vec(),
        }
    }
}

impl Default for ListenOptions {
    fn default() -> Self {
        ListenOptions::from(&NcConfig::default())
    }
}

/// Command line of the nc command
#[derive(Args, Debug, Clone, Default)]
pub struct NcArgs {
    /// [host] <port>; the host is omitted in listen mode
    #[arg(value_name = "HOST_PORT", num_args = 1..=2, required = true)]
    pub args: Vec<String>,

    /// Specify the protocol to use (tcp or udp)
    #[arg(short, long)]
    pub protocol: Option<String>,

    /// Set timeout duration for the connection (e.g. 5s, 500ms)
    #[arg(short, long)]
    pub timeout: Option<String>,

    /// HTTP proxy URL for TCP connections (e.g. http://proxy.example.com:8080)
    #[arg(short = 'x', long)]
    pub proxy: Option<String>,

    /// Listen for incoming connections on the specified port
    #[arg(short, long)]
    pub listen: bool,
}

impl NcArgs {
    /// Validate the arguments against `config` defaults
    ///
    /// Every configuration error is raised here, before any socket exists.
    pub fn to_request(&self, config: &NcConfig) -> Result<NcRequest> {
        let protocol: Protocol = self
            .protocol
            .as_deref()
            .unwrap_or(&config.protocol)
            .parse()?;

        let (host, port) = match self.args.as_slice() {
            [port] => (None, port),
            [host, port] => (Some(host.as_str()), port),
            _ => return Err(NetroError::Config("expected [host] <port>".to_string())),
        };
        let port: u16 = port
            .parse()
            .map_err(|_| NetroError::Config(format!("invalid port: {port}")))?;
        let proxy = self.proxy.as_deref().filter(|p| !p.is_empty());

        if self.listen {
            if host.is_some() {
                return Err(NetroError::Config(
                    "host must be omitted in listen mode".to_string(),
                ));
            }
            if proxy.is_some() {
                return Err(NetroError::Config(
                    "--proxy cannot be used with --listen".to_string(),
                ));
            }
            return Ok(NcRequest::Listen(ListenRequest { port, protocol }));
        }

        let host = host.ok_or_else(|| {
            NetroError::Config("a host is required unless --listen is set".to_string())
        })?;
        if port == 0 {
            return Err(NetroError::Config(
                "port 0 is only valid with --listen".to_string(),
            ));
        }

        let timeout = match &self.timeout {
            Some(t) => parse_duration(t).map_err(|e| NetroError::Config(e.to_string()))?,
            None => config.timeout().map_err(NetroError::Config)?,
        };
        if timeout.is_zero() {
            return Err(NetroError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let proxy = match proxy {
            Some(url) if protocol == Protocol::Tcp => Some(ProxyUrl::parse(url)?),
            Some(_) => {
                return Err(NetroError::Config(
                    "--proxy is only supported for TCP".to_string(),
                ))
            }
            None => None,
        };

        Ok(NcRequest::Connect(ConnectionRequest {
            endpoint: Endpoint::new(host, port),
            protocol,
            timeout,
            proxy,
        }))
    }
}
