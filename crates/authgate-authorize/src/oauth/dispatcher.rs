//! Authorization request pipeline.
//!
//! [`AuthorizationHandler`] runs one request through every stage in order and
//! stops at the first failure:
//!
//! ```text
//! params ─► validate ─► get_client ─► redirect_uri ─► scope ─► provider.authorize
//!              │            │              │            │              │
//!              └────────────┴──────────────┴────────────┴──────────────┴─► ErrorResponder
//! ```
//!
//! Domain failures are answered by the [`ErrorResponder`]. Anything else
//! propagates to a single boundary in [`AuthorizationHandler::handle`], which
//! logs it and answers with `server_error`.

use std::sync::Arc;

use axum::http::HeaderValue;

use super::authorize::{AuthorizationErrorCode, AuthorizationParams};
use super::params::RequestParams;
use super::resolver::ClientResolver;
use super::responder::{AuthorizeResponse, ErrorResponder, RecoveryContext};
use super::validation::validate_request;
use crate::AuthResult;
use crate::error::AuthError;
use crate::provider::AuthorizationProvider;

/// Description sent with `server_error`. Internal details are only logged.
const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Handles authorization requests for `response_type=code`.
///
/// See RFC 6749 Section 4.1.1.
#[derive(Clone)]
pub struct AuthorizationHandler {
    resolver: ClientResolver,
}

impl AuthorizationHandler {
    /// Creates a handler backed by `provider`.
    pub fn new(provider: Arc<dyn AuthorizationProvider>) -> Self {
        Self {
            resolver: ClientResolver::new(provider),
        }
    }

    /// Processes one authorization request.
    ///
    /// `params` is an error when the request parameters could not be read.
    /// The result is always a well-formed response.
    pub async fn handle(&self, params: AuthResult<RequestParams>) -> AuthorizeResponse {
        let mut ctx = RecoveryContext::new();

        let (params, outcome) = match params {
            Ok(params) => {
                let outcome = self.dispatch(&params, &mut ctx).await;
                (Some(params), outcome)
            }
            Err(e) => (None, Err(e)),
        };

        match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = %e.category(),
                    client_id = ?ctx.client().map(|c| c.client_id.as_str()),
                    "Unexpected error in authorization handler"
                );
                ErrorResponder::new(&self.resolver, params.as_ref())
                    .respond(
                        &mut ctx,
                        AuthorizationErrorCode::ServerError,
                        Some(UNEXPECTED_ERROR.to_string()),
                        true,
                    )
                    .await
            }
        }
    }

    async fn dispatch(
        &self,
        params: &RequestParams,
        ctx: &mut RecoveryContext,
    ) -> AuthResult<AuthorizeResponse> {
        let responder = ErrorResponder::new(&self.resolver, Some(params));

        // Keep the state even if validation fails below.
        ctx.set_state(params.get("state").map(str::to_string));

        let request = match validate_request(params) {
            Ok(request) => request,
            Err(failure) => {
                tracing::debug!(
                    error = %failure.error_code(),
                    fields = failure.errors.len(),
                    "Authorization request failed validation"
                );
                return Ok(responder
                    .respond(
                        ctx,
                        failure.error_code(),
                        Some(failure.description()),
                        true,
                    )
                    .await);
            }
        };
        ctx.set_state(request.state.clone());

        tracing::debug!(client_id = %request.client_id, "Processing authorization request");

        let Some(client) = self.resolver.get_client(&request.client_id).await? else {
            tracing::warn!(
                client_id = %request.client_id,
                "Authorization request for unknown client"
            );
            // The lookup already failed, recovering the client again is pointless.
            return Ok(responder
                .respond(
                    ctx,
                    AuthorizationErrorCode::InvalidRequest,
                    Some(format!("Client ID '{}' not found", request.client_id)),
                    false,
                )
                .await);
        };
        ctx.set_client(client.clone());

        let redirect_uri = match self
            .resolver
            .validate_redirect_uri(&client, request.redirect_uri.as_ref())
        {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(
                    client_id = %client.client_id,
                    error = %e,
                    "Rejected redirect_uri"
                );
                return reject(&responder, ctx, e).await;
            }
        };
        ctx.set_redirect_uri(redirect_uri.clone());

        let scopes = match self
            .resolver
            .validate_scope(&client, request.scope.as_deref())
        {
            Ok(scopes) => scopes,
            Err(e) => return reject(&responder, ctx, e).await,
        };

        let auth_params = AuthorizationParams {
            state: request.state,
            scopes,
            code_challenge: request.code_challenge,
            redirect_uri,
            redirect_uri_provided_explicitly: request.redirect_uri.is_some(),
            resource: request.resource,
        };

        match self.resolver.provider().authorize(&client, auth_params).await {
            Ok(target) => {
                let location = HeaderValue::try_from(target).map_err(|e| {
                    AuthError::internal(format!(
                        "provider returned an invalid redirect target: {e}"
                    ))
                })?;
                tracing::debug!(client_id = %client.client_id, "Authorization request accepted");
                Ok(AuthorizeResponse::Redirect(location))
            }
            Err(e) => reject(&responder, ctx, e).await,
        }
    }
}

/// Delivers a domain error through the responder. Faults are returned
/// unchanged for the boundary in [`AuthorizationHandler::handle`].
async fn reject(
    responder: &ErrorResponder<'_>,
    ctx: &mut RecoveryContext,
    error: AuthError,
) -> AuthResult<AuthorizeResponse> {
    if !error.is_domain_error() {
        return Err(error);
    }

    tracing::debug!(
        error = %error,
        category = %error.category(),
        "Authorization request rejected"
    );
    Ok(responder
        .respond(
            ctx,
            error.oauth_error_code(),
            error.public_description(),
            true,
        )
        .await)
}
