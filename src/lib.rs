//! # Netro - Networking Troubleshooting Toolkit
//!
//! Netro is a command-line toolkit for developers and administrators. This
//! crate holds its netcat-style relay (`netro nc`), the one part of the tool
//! with real protocol and concurrency logic.
//!
//! ## Features
//!
//! - **Reachability checks**: dial a TCP or UDP endpoint within a timeout
//!   and release it without sending payload
//! - **HTTP CONNECT tunnels**: reach TCP endpoints through an HTTP proxy,
//!   with optional basic authentication from the proxy URL
//! - **TCP listen mode**: relay every accepted connection to standard
//!   input/output, one independent relay per connection
//! - **UDP listen mode**: log and acknowledge every datagram
//!
//! ## Usage
//!
//! ```rust,ignore
//! use netro::config::NcConfig;
//! use netro::nc::{connect, NcArgs, NcRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = NcArgs {
//!         args: vec!["example.com".into(), "443".into()],
//!         ..Default::default()
//!     };
//!     if let NcRequest::Connect(request) = args.to_request(&NcConfig::default())? {
//!         println!("{}", connect(&request).await?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! client mode:  Initiator -> [CONNECT negotiator] -> target   (closed at once)
//! listen mode:  accept loop -> relay per connection <-> stdin/stdout
//!               UDP socket  -> echo handler
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod helper;
pub mod nc;
pub mod transport;

// Re-export commonly used items
pub use config::{load_config, Config, NcConfig};
pub use error::NetroError;

/// Version of the Netro library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build date stamped in by the release pipeline
pub const BUILD_DATE: &str = match option_env!("NETRO_BUILD_DATE") {
    Some(date) => date,
    None => "undefined",
};

/// The line printed by `netro version`
pub fn version_string() -> String {
    format!("Netro version: v{} (built on {})", VERSION, BUILD_DATE)
}
