//! Network transport for pinbridge.
//!
//! This crate provides the HTTP backend used by boards configured with a
//! `url`. Each pin operation is one JSON `POST` to the remote firmware.
//!
//! # Components
//!
//! - **HttpPinClient**: reads and writes single pins over HTTP
//!
//! # Example
//!
//! ```no_run
//! use pinbridge_core::{HttpConfig, PinAddress};
//! use pinbridge_network::HttpPinClient;
//!
//! # async fn example() -> pinbridge_core::Result<()> {
//! let client = HttpPinClient::new(&HttpConfig::new("http://192.168.4.1"))?;
//! let state = client.read_pin(PinAddress::new(34)).await?;
//! # Ok(())
//! # }
//! ```

mod client;

pub use client::HttpPinClient;
