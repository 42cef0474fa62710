//! Licence query client.
//!
//! This module provides the HTTP client for the ICP licence API and the
//! lookup trait the batch runner is generic over.

pub mod api;

pub use api::{ClientConfig, IcpClient, LicenceLookup};
