//! # SSL Labs
//!
//! Check the SSL Labs grade of a host and map it to a monitoring status.
//!
#![deny(missing_docs, unused_imports)]
#![allow(clippy::result_large_err)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod grade;
#[cfg(feature = "client")]
pub mod scan;
pub mod status;
pub mod utils;

pub use error::SslLabsError;
pub use grade::{Grade, Thresholds};
pub use status::CheckStatus;
pub use utils::config::Config;

#[cfg(feature = "client")]
pub use client::SslLabsClient;
#[cfg(feature = "client")]
pub use scan::ScanRequest;

/// SSL Labs check version
pub const SSLLABS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default SSL Labs analyze endpoint
pub const SSLLABS_API_URL: &str = "https://api.ssllabs.com/api/v2/analyze";
