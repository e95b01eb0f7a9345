//! nc configuration types
//!
//! Defaults for the relay command. Every field can be overridden from the
//! command line.

use crate::helper::{
    format_duration, parse_duration, DEFAULT_BUFFER_SIZE, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_UDP_ACK, DEFAULT_UDP_BUFFER_SIZE,
};
use crate::transport::Protocol;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_protocol() -> String {
    "tcp".to_string()
}

fn default_timeout() -> String {
    format_duration(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
}

fn default_relay_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_udp_buffer_size() -> usize {
    DEFAULT_UDP_BUFFER_SIZE
}

fn default_udp_ack() -> String {
    DEFAULT_UDP_ACK.to_string()
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// nc command configuration
    #[serde(default)]
    pub nc: NcConfig,
}

/// nc command configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NcConfig {
    /// Default protocol (tcp or udp)
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Dial timeout, humanized (e.g. "5s", "500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Chunk size used by each relay direction
    #[serde(default = "default_relay_buffer_size")]
    pub relay_buffer_size: usize,

    /// Datagram buffer size in UDP listen mode; longer datagrams are truncated
    #[serde(default = "default_udp_buffer_size")]
    pub udp_buffer_size: usize,

    /// Acknowledgment payload sent to each datagram sender
    #[serde(default = "default_udp_ack")]
    pub udp_ack: String,
}

impl Default for NcConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            timeout: default_timeout(),
            relay_buffer_size: default_relay_buffer_size(),
            udp_buffer_size: default_udp_buffer_size(),
            udp_ack: default_udp_ack(),
        }
    }
}

impl NcConfig {
    /// Parsed dial timeout
    pub fn timeout(&self) -> Result<Duration, String> {
        let timeout = parse_duration(&self.timeout).map_err(|e| e.to_string())?;
        if timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }
        Ok(timeout)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.protocol
            .parse::<Protocol>()
            .map_err(|e| e.to_string())?;
        self.timeout()?;
        if self.relay_buffer_size == 0 {
            return Err("relay_buffer_size must be greater than zero".to_string());
        }
        if self.udp_buffer_size == 0 {
            return Err("udp_buffer_size must be greater than zero".to_string());
        }
        if self.udp_ack.is_empty() {
            return Err("udp_ack must not be empty".to_string());
        }
        Ok(())
    }
}
