//! OAuth 2.0 authorization endpoint.
//!
//! The endpoint is split into small stages:
//!
//! - [`params`] - Raw request parameters from the query string or form body
//! - [`validation`] - Field-level validation into an [`AuthorizationRequest`]
//! - [`resolver`] - Client lookup, redirect URI and scope checks
//! - [`responder`] - RFC 6749 Section 4.1.2.1 error delivery
//! - [`dispatcher`] - The pipeline tying the stages together
//! - [`authorize`] - Request, response and error code types
//!
//! # Example
//!
//! ```ignore
//! use authgate_authorize::oauth::{AuthorizationHandler, RequestParams};
//!
//! let handler = AuthorizationHandler::new(provider);
//! let params =
//!     RequestParams::from_urlencoded(b"client_id=c1&response_type=code&code_challenge=abc");
//! let response = handler.handle(Ok(params)).await;
//! ```

pub mod authorize;
pub mod dispatcher;
pub mod params;
pub mod resolver;
pub mod responder;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use authorize::{
    AuthorizationErrorCode, AuthorizationErrorResponse, AuthorizationParams, AuthorizationRequest,
    CodeChallengeMethod, ResponseType, construct_redirect_uri,
};
pub use dispatcher::AuthorizationHandler;
pub use params::{ParamValue, RequestParams};
pub use resolver::ClientResolver;
pub use responder::{AuthorizeResponse, ErrorResponder, RecoveryContext};
pub use validation::{FieldError, FieldErrorKind, ValidationFailure, validate_request};
