//! Error types for Netro
//!
//! This module defines the error taxonomy of the nc relay: configuration
//! errors rejected before any I/O, dial/bind errors, proxy handshake errors,
//! and listener-fatal errors.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Netro operations
#[derive(Error, Debug)]
pub enum NetroError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Protocol string other than tcp or udp
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// Proxy URL could not be parsed or has no host
    #[error("invalid proxy URL: {0}")]
    InvalidProxyUrl(String),

    /// Proxy URL with a scheme other than http
    #[error("unsupported proxy scheme: {0}")]
    UnsupportedProxyScheme(String),

    /// Outbound dial failed
    #[error("failed to establish {protocol} connection to {addr}: {source}")]
    Connect {
        /// Protocol label (TCP or UDP)
        protocol: &'static str,
        /// Dial address
        addr: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Dial to the HTTP proxy failed
    #[error("failed to connect to proxy {addr}: {source}")]
    ProxyConnect {
        /// Proxy address
        addr: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Proxy answered CONNECT with a non-200 status
    #[error("proxy connection failed: {status}")]
    ProxyRejected {
        /// Status code and reason, e.g. `407 Proxy Authentication Required`
        status: String,
        /// Numeric status code
        code: u16,
    },

    /// Proxy response could not be parsed
    #[error("failed to read proxy response: {0}")]
    MalformedProxyResponse(String),

    /// Listener bind failed
    #[error("failed to start {protocol} listener on {addr}: {source}")]
    Bind {
        /// Protocol label (TCP or UDP)
        protocol: &'static str,
        /// Bind address
        addr: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Accept loop failure, fatal to the listener
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// Receiving a datagram failed, fatal to the echo handler
    #[error("error reading from UDP connection: {0}")]
    DatagramRecv(#[source] io::Error),

    /// Sending the acknowledgment failed, fatal to the echo handler
    #[error("error sending response to {peer}: {source}")]
    DatagramSend {
        /// Datagram sender
        peer: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Operation did not complete in time
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl NetroError {
    /// Whether the error was raised before any socket operation
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            NetroError::Config(_)
                | NetroError::UnsupportedProtocol(_)
                | NetroError::InvalidProxyUrl(_)
                | NetroError::UnsupportedProxyScheme(_)
        )
    }

    /// Build a timeout error as an `io::Error` so it can sit under a dial error
    pub fn timed_out(after: Duration) -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, NetroError::Timeout(after))
    }
}

/// Result alias used across the library
pub type Result<T, E = NetroError> = std::result::Result<T, E>;
