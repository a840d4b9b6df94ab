//! # authgate-authorize
//!
//! OAuth 2.0 authorization endpoint for the authorization code grant.
//!
//! This crate provides:
//! - Parameter extraction from query strings and form bodies
//! - Field-level validation of authorization requests (PKCE required)
//! - Client, redirect URI and scope resolution through a provider
//! - RFC 6749 Section 4.1.2.1 error delivery, by redirect or directly
//!
//! ## Modules
//!
//! - [`config`] - Endpoint configuration
//! - [`error`] - Error types
//! - [`oauth`] - The authorization request pipeline
//! - [`provider`] - Collaborator trait implemented by the host server
//! - [`types`] - Client registration data
//! - [`http`] - Axum handlers

pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod provider;
pub mod types;

pub use config::{AuthorizeConfig, ConfigError};
pub use error::{AuthError, ErrorCategory};
pub use http::{AuthorizeState, authorize_get, authorize_post, authorize_router};
pub use oauth::{
    AuthorizationErrorCode, AuthorizationErrorResponse, AuthorizationHandler, AuthorizationParams,
    AuthorizationRequest, AuthorizeResponse, RequestParams,
};
pub use provider::AuthorizationProvider;
pub use types::Client;

/// Type alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use authgate_authorize::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthorizeConfig, ConfigError};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::http::{AuthorizeState, authorize_router};
    pub use crate::oauth::{
        AuthorizationErrorCode, AuthorizationHandler, AuthorizationParams, AuthorizeResponse,
        RequestParams,
    };
    pub use crate::provider::AuthorizationProvider;
    pub use crate::types::Client;
}
