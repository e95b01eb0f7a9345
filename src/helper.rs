//! Helper utilities for Netro
//!
//! This module provides constants and small parsing helpers shared by the
//! command line and the configuration file.

use anyhow::{anyhow, Result};
use humanize_rs::ParseError;
use std::str::FromStr;
use std::time::Duration;

/// Default chunk size for relay IO operations
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default datagram buffer size in UDP listen mode
pub const DEFAULT_UDP_BUFFER_SIZE: usize = 1024;

/// Default dial timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Payload sent back to every datagram sender in UDP listen mode
pub const DEFAULT_UDP_ACK: &str = "Message received";

/// Parse a humanized duration such as `500ms`, `5s` or `1m`
///
/// A bare number is taken as seconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value = value.trim();
    match humanize_rs::duration::parse(value) {
        Ok(v) => Ok(v),
        Err(ParseError::MissingUnit) => {
            if let Ok(u) = u64::from_str(value) {
                Ok(Duration::from_secs(u))
            } else if let Ok(f) = f64::from_str(value) {
                Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
            } else {
                Err(anyhow!("unsupported duration string: {value}"))
            }
        }
        Err(e) => Err(anyhow!("invalid duration string {value:?}: {e}")),
    }
}

/// Render a duration the way it was most likely written
pub fn format_duration(d: Duration) -> String {
    if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BUFFER_SIZE, 8192);
        assert_eq!(DEFAULT_UDP_BUFFER_SIZE, 1024);
        assert_eq!(DEFAULT_CONNECT_TIMEOUT_SECS, 5);
        assert_eq!(DEFAULT_UDP_ACK, "Message received");
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_duration_bare_number() {
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    }
}
