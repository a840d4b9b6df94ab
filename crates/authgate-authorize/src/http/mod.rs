//! HTTP handlers for the authorization endpoint.
//!
//! # Available Handlers
//!
//! - [`authorize`] - Authorization endpoint (RFC 6749 Section 4.1.1)

pub mod authorize;

pub use authorize::{AuthorizeState, authorize_get, authorize_post, authorize_router};
