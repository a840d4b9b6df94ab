//! Client resolution.
//!
//! [`ClientResolver`] looks clients up through the provider and runs the
//! redirect URI and scope checks the client exposes.

use std::sync::Arc;

use url::Url;

use crate::AuthResult;
use crate::provider::AuthorizationProvider;
use crate::types::Client;

/// Resolves clients and validates request values against them.
#[derive(Clone)]
pub struct ClientResolver {
    provider: Arc<dyn AuthorizationProvider>,
}

impl ClientResolver {
    /// Creates a resolver backed by `provider`.
    pub fn new(provider: Arc<dyn AuthorizationProvider>) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn AuthorizationProvider> {
        &self.provider
    }

    /// Looks up a client. `Ok(None)` means the client is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider lookup fails.
    pub async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>> {
        self.provider.get_client(client_id).await
    }

    /// Resolves the redirect URI for `client`.
    ///
    /// # Errors
    ///
    /// See [`Client::validate_redirect_uri`].
    pub fn validate_redirect_uri(
        &self,
        client: &Client,
        candidate: Option<&Url>,
    ) -> AuthResult<Url> {
        client.validate_redirect_uri(candidate)
    }

    /// Resolves the granted scopes for `client`.
    ///
    /// # Errors
    ///
    /// See [`Client::validate_scope`].
    pub fn validate_scope(&self, client: &Client, scope: Option<&str>) -> AuthResult<Vec<String>> {
        client.validate_scope(scope)
    }
}
