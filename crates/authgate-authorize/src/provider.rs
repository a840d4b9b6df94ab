//! Provider collaborator trait.
//!
//! The provider owns the client registry and decides where a valid
//! authorization request goes next. The endpoint calls it through this narrow
//! interface only.

use async_trait::async_trait;

use crate::AuthResult;
use crate::oauth::authorize::AuthorizationParams;
use crate::types::Client;

/// Authorization server operations consumed by the authorize endpoint.
///
/// Implementations are shared by all in-flight requests and must tolerate
/// concurrent calls.
///
/// # Example
///
/// ```ignore
/// use authgate_authorize::provider::AuthorizationProvider;
///
/// async fn example(provider: &impl AuthorizationProvider) -> AuthResult<()> {
///     if let Some(client) = provider.get_client("my-app").await? {
///         println!("Found client: {}", client.client_id);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Find a client by its OAuth client_id.
    ///
    /// Returns `None` if the client is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Handle a validated authorization request.
    ///
    /// Returns the URI the user agent should be sent to next, typically a
    /// consent page or, for auto-approval, the client's redirect URI with a
    /// code attached.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Authorize`](crate::AuthError::Authorize) to refuse
    /// the request with a protocol error. Any other error is treated as an
    /// unexpected fault.
    async fn authorize(&self, client: &Client, params: AuthorizationParams) -> AuthResult<String>;
}
