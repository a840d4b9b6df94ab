//! Authorization endpoint types.
//!
//! This module provides the typed request produced by structural validation,
//! the parameter bundle handed to the provider, and the RFC 6749 error
//! response with its two delivery encodings (redirect query and JSON body).
//!
//! # Authorization Code Flow
//!
//! 1. Client redirects the user agent to the authorization endpoint
//! 2. The endpoint validates the request and resolves the client
//! 3. The provider decides where the user goes next (consent, auto-approval)
//! 4. Errors go back to the client's redirect URI when it has been validated,
//!    and are returned directly otherwise
//!
//! # Security Requirements
//!
//! - PKCE is required (`code_challenge`)
//! - Only the S256 challenge method is accepted

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Supported `response_type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Authorization code grant.
    Code,
}

impl ResponseType {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
        }
    }
}

/// Supported PKCE code challenge methods.
///
/// The "plain" method is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    /// SHA-256 of the code verifier, base64url-encoded.
    S256,
}

impl CodeChallengeMethod {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
        }
    }
}

/// A structurally valid authorization request.
///
/// Produced by [`validate_request`](crate::oauth::validation::validate_request)
/// from the raw query or form parameters.
///
/// # Example
///
/// ```ignore
/// GET /authorize?
///   response_type=code
///   &client_id=my-app
///   &redirect_uri=https://app.example.com/callback
///   &scope=read write
///   &state=abc123xyz
///   &code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM
///   &code_challenge_method=S256
///   &resource=https://api.example.com
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRequest {
    /// Client identifier issued during registration.
    pub client_id: String,

    /// Redirect URI requested by the client.
    /// `None` means the client's default URI should be used.
    pub redirect_uri: Option<Url>,

    /// Always [`ResponseType::Code`].
    pub response_type: ResponseType,

    /// PKCE code challenge.
    pub code_challenge: String,

    /// PKCE code challenge method, if the client sent one.
    pub code_challenge_method: Option<CodeChallengeMethod>,

    /// Opaque client state, echoed back in every response.
    pub state: Option<String>,

    /// Requested scopes (space-separated).
    pub scope: Option<String>,

    /// RFC 8707 resource indicator.
    pub resource: Option<String>,
}

/// Validated parameters passed to the provider's authorize step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationParams {
    /// Client state, if any.
    pub state: Option<String>,

    /// Granted scope tokens, in the order the client requested them.
    pub scopes: Vec<String>,

    /// PKCE code challenge.
    pub code_challenge: String,

    /// Redirect URI resolved against the client's registration.
    pub redirect_uri: Url,

    /// Whether the client sent `redirect_uri` explicitly.
    /// The token endpoint must then require the same value.
    pub redirect_uri_provided_explicitly: bool,

    /// RFC 8707 resource indicator.
    pub resource: Option<String>,
}

/// Authorization error response.
///
/// Delivered either as query parameters on the client's redirect URI or as a
/// JSON body. In the JSON form absent fields are rendered as `null`.
///
/// # Example
///
/// ```ignore
/// HTTP/1.1 302 Found
/// Location: https://app.example.com/callback?
///   error=invalid_scope
///   &error_description=Client+was+not+registered+with+scope+admin
///   &state=abc123xyz
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationErrorResponse {
    /// OAuth 2.0 error code.
    pub error: AuthorizationErrorCode,

    /// Human-readable error description.
    pub error_description: Option<String>,

    /// Link to a page describing the error. Never populated by this endpoint.
    pub error_uri: Option<String>,

    /// State echoed from the request.
    pub state: Option<String>,
}

impl AuthorizationErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(
        error: AuthorizationErrorCode,
        error_description: Option<String>,
        state: Option<String>,
    ) -> Self {
        Self {
            error,
            error_description,
            error_uri: None,
            state,
        }
    }

    /// Builds the redirect URL carrying this error.
    ///
    /// Only present fields are appended. Query parameters already on
    /// `redirect_uri` are preserved.
    #[must_use]
    pub fn to_redirect_url(&self, redirect_uri: &Url) -> Url {
        let mut pairs = vec![("error", self.error.as_str())];
        if let Some(ref desc) = self.error_description {
            pairs.push(("error_description", desc.as_str()));
        }
        if let Some(ref uri) = self.error_uri {
            pairs.push(("error_uri", uri.as_str()));
        }
        if let Some(ref state) = self.state {
            pairs.push(("state", state.as_str()));
        }
        construct_redirect_uri(redirect_uri, pairs)
    }
}

/// Appends `params` to the query of `base`, keeping any existing parameters.
#[must_use]
pub fn construct_redirect_uri<'a, I>(base: &Url, params: I) -> Url
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    url
}

/// OAuth 2.0 authorization error codes.
///
/// These error codes are defined in RFC 6749 Section 4.1.2.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorCode {
    /// The request is missing a required parameter, includes an invalid
    /// parameter value, includes a parameter more than once, or is
    /// otherwise malformed.
    InvalidRequest,

    /// The client is not authorized to request an authorization code
    /// using this method.
    UnauthorizedClient,

    /// The resource owner or authorization server denied the request.
    AccessDenied,

    /// The authorization server does not support obtaining an authorization
    /// code using this method.
    UnsupportedResponseType,

    /// The requested scope is invalid, unknown, or malformed.
    InvalidScope,

    /// The authorization server encountered an unexpected condition.
    ServerError,

    /// The authorization server is temporarily unable to handle the request.
    TemporarilyUnavailable,
}

impl AuthorizationErrorCode {
    /// Returns the string representation of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::AccessDenied => "access_denied",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidScope => "invalid_scope",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }
}

impl fmt::Display for AuthorizationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
