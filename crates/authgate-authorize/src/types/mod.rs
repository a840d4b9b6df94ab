//! Common types shared by the endpoint and its provider.
//!
//! - [`Client`] - OAuth 2.0 client registration

pub mod client;

pub use client::Client;
