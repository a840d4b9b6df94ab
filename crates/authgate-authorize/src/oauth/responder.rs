//! Error delivery for the authorization endpoint.
//!
//! RFC 6749 Section 4.1.2.1 gives an error two possible destinations:
//!
//! 1. The request has a resolved client and a redirect URI validated against
//!    it: the error goes back to that URI as query parameters, so the client
//!    learns about it.
//! 2. Otherwise the error is returned directly to the user agent. This
//!    endpoint answers with a JSON body.
//!
//! A failure can happen before the request has been validated or the client
//! loaded. [`ErrorResponder`] therefore makes a best-effort attempt to recover
//! the missing pieces from the raw parameters. Recovery only fills gaps in the
//! [`RecoveryContext`], never replaces what the main pipeline established, and
//! never lets a secondary failure hide the original error.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use url::Url;

use super::authorize::{AuthorizationErrorCode, AuthorizationErrorResponse};
use super::params::RequestParams;
use super::resolver::ClientResolver;
use crate::types::Client;

// =============================================================================
// Recovery Context
// =============================================================================

/// What is known about the request so far.
///
/// The dispatcher sets fields as each pipeline stage succeeds. The responder
/// may fill fields that are still empty, but never overwrites one.
#[derive(Debug, Clone, Default)]
pub struct RecoveryContext {
    client: Option<Client>,
    redirect_uri: Option<Url>,
    state: Option<String>,
}

impl RecoveryContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved client, if any.
    #[must_use]
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// The redirect URI validated against [`client`](Self::client), if any.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&Url> {
        self.redirect_uri.as_ref()
    }

    /// The state to echo, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Records the client resolved from a validated `client_id`.
    pub fn set_client(&mut self, client: Client) {
        self.client = Some(client);
    }

    /// Records a redirect URI that passed client validation.
    pub fn set_redirect_uri(&mut self, redirect_uri: Url) {
        self.redirect_uri = Some(redirect_uri);
    }

    /// Records the request state.
    pub fn set_state(&mut self, state: Option<String>) {
        self.state = state;
    }
}

// =============================================================================
// Response
// =============================================================================

/// Outcome of an authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeResponse {
    /// The provider accepted the request; send the user agent on.
    Redirect(HeaderValue),

    /// The error is delivered to the client's validated redirect URI.
    ErrorRedirect {
        /// Redirect URI with the error parameters appended.
        location: Url,
        /// The error that was delivered.
        error: AuthorizationErrorResponse,
    },

    /// The error is returned directly as JSON.
    Error(AuthorizationErrorResponse),
}

impl AuthorizeResponse {
    /// HTTP status code of this response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Redirect(_) | Self::ErrorRedirect { .. } => StatusCode::FOUND,
            Self::Error(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The `Location` header value for redirects.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect(location) => location.to_str().ok(),
            Self::ErrorRedirect { location, .. } => Some(location.as_str()),
            Self::Error(_) => None,
        }
    }

    /// The error carried by this response, if it is an error.
    #[must_use]
    pub fn error(&self) -> Option<&AuthorizationErrorResponse> {
        match self {
            Self::Redirect(_) => None,
            Self::ErrorRedirect { error, .. } | Self::Error(error) => Some(error),
        }
    }
}

impl IntoResponse for AuthorizeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(location) => (
                StatusCode::FOUND,
                [
                    (header::LOCATION, location),
                    (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
                ],
            )
                .into_response(),
            Self::ErrorRedirect { location, .. } => (
                StatusCode::FOUND,
                [
                    (header::LOCATION, location.as_str()),
                    (header::CACHE_CONTROL, "no-store"),
                ],
            )
                .into_response(),
            Self::Error(error) => (
                StatusCode::BAD_REQUEST,
                [(header::CACHE_CONTROL, "no-store")],
                Json(error),
            )
                .into_response(),
        }
    }
}

// =============================================================================
// Error Responder
// =============================================================================

/// Builds error responses, recovering missing context where it safely can.
pub struct ErrorResponder<'a> {
    resolver: &'a ClientResolver,
    params: Option<&'a RequestParams>,
}

impl<'a> ErrorResponder<'a> {
    /// Creates a responder. `params` is `None` when the request parameters
    /// could not be read at all.
    #[must_use]
    pub fn new(resolver: &'a ClientResolver, params: Option<&'a RequestParams>) -> Self {
        Self { resolver, params }
    }

    /// Produces the response for `error`.
    ///
    /// With `attempt_recovery` unset, no client lookup is attempted; the
    /// redirect URI and state may still be recovered.
    pub async fn respond(
        &self,
        ctx: &mut RecoveryContext,
        error: AuthorizationErrorCode,
        description: Option<String>,
        attempt_recovery: bool,
    ) -> AuthorizeResponse {
        if ctx.client.is_none() && attempt_recovery {
            ctx.client = self.recover_client().await;
        }

        if ctx.redirect_uri.is_none()
            && let Some(client) = ctx.client.as_ref()
        {
            ctx.redirect_uri = self.recover_redirect_uri(client);
        }

        // The error response MUST contain the client's state, if any.
        if ctx.state.is_none() {
            ctx.state = self.param("state").map(str::to_string);
        }

        let body = AuthorizationErrorResponse::new(error, description, ctx.state.clone());

        match (ctx.client.as_ref(), ctx.redirect_uri.as_ref()) {
            (Some(client), Some(redirect_uri)) => {
                tracing::debug!(
                    client_id = %client.client_id,
                    error = %error,
                    "Delivering authorization error by redirect"
                );
                AuthorizeResponse::ErrorRedirect {
                    location: body.to_redirect_url(redirect_uri),
                    error: body,
                }
            }
            _ => {
                tracing::debug!(error = %error, "Returning authorization error directly");
                AuthorizeResponse::Error(body)
            }
        }
    }

    fn param(&self, key: &str) -> Option<&'a str> {
        self.params.and_then(|params| params.get(key))
    }

    async fn recover_client(&self) -> Option<Client> {
        let client_id = self.param("client_id").filter(|id| !id.is_empty())?;

        match self.resolver.get_client(client_id).await {
            Ok(client) => client,
            Err(e) => {
                tracing::debug!(client_id = %client_id, error = %e, "Client recovery failed");
                None
            }
        }
    }

    fn recover_redirect_uri(&self, client: &Client) -> Option<Url> {
        let params = self.params?;

        let candidate = if params.contains("redirect_uri") {
            // Present but repeated or unparsable: no trusted redirect.
            Some(Url::parse(params.get("redirect_uri")?).ok()?)
        } else {
            None
        };

        match self.resolver.validate_redirect_uri(client, candidate.as_ref()) {
            Ok(uri) => Some(uri),
            Err(e) => {
                tracing::debug!(
                    client_id = %client.client_id,
                    error = %e,
                    "Redirect URI recovery failed"
                );
                None
            }
        }
    }
}
