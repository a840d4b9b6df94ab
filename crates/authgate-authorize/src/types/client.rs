//! OAuth 2.0 client registration.
//!
//! A [`Client`] is owned by the provider. The endpoint only relies on the two
//! checks it exposes: resolving the redirect URI for a request and narrowing
//! the requested scope to what the client was registered for.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::AuthResult;
use crate::error::AuthError;

// =============================================================================
// Client
// =============================================================================

/// OAuth 2.0 client registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    pub client_id: String,

    /// Human-readable display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    /// Registered redirect URIs. Matching is exact.
    #[serde(default)]
    pub redirect_uris: Vec<Url>,

    /// Scopes this client may request. Also the default grant when the
    /// request carries no scope.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Client {
    /// Creates a client with the given redirect URIs and no scopes.
    #[must_use]
    pub fn new(client_id: impl Into<String>, redirect_uris: Vec<Url>) -> Self {
        Self {
            client_id: client_id.into(),
            client_name: None,
            redirect_uris,
            scopes: Vec::new(),
        }
    }

    /// Sets the allowed scopes.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Resolves the redirect URI for an authorization request.
    ///
    /// A supplied URI must exactly match a registered one. Without one, the
    /// client's only registered URI is used.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidRedirectUri`] if the URI is not registered,
    /// or if none was supplied and the client does not have exactly one
    /// registered URI.
    pub fn validate_redirect_uri(&self, redirect_uri: Option<&Url>) -> AuthResult<Url> {
        match redirect_uri {
            Some(uri) if self.is_redirect_uri_allowed(uri) => Ok(uri.clone()),
            Some(uri) => Err(AuthError::invalid_redirect_uri(format!(
                "Redirect URI '{uri}' not registered for client"
            ))),
            None => match self.redirect_uris.as_slice() {
                [only] => Ok(only.clone()),
                _ => Err(AuthError::invalid_redirect_uri(
                    "redirect_uri must be specified when client has multiple registered URIs",
                )),
            },
        }
    }

    /// Resolves the scopes for an authorization request.
    ///
    /// Without a scope the client's registered scopes are granted. A supplied
    /// scope is split on whitespace and returned in the caller's order.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidScope`] for the first token the client was
    /// not registered with.
    pub fn validate_scope(&self, scope: Option<&str>) -> AuthResult<Vec<String>> {
        let Some(scope) = scope else {
            return Ok(self.scopes.clone());
        };

        scope
            .split_whitespace()
            .map(|requested| {
                if self.is_scope_allowed(requested) {
                    Ok(requested.to_string())
                } else {
                    Err(AuthError::invalid_scope(format!(
                        "Client was not registered with scope {requested}"
                    )))
                }
            })
            .collect()
    }

    /// Checks if the given redirect URI is registered for this client.
    #[must_use]
    pub fn is_redirect_uri_allowed(&self, uri: &Url) -> bool {
        self.redirect_uris.iter().any(|allowed| allowed == uri)
    }

    /// Checks if the given scope token is allowed for this client.
    #[must_use]
    pub fn is_scope_allowed(&self, scope: &str) -> bool {
        self.scopes.iter().any(|allowed| allowed == scope)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn single_uri_client() -> Client {
        Client::new("c1", vec![url("https://app.example.com/cb")]).with_scopes(["read", "write"])
    }

    fn multi_uri_client() -> Client {
        Client::new(
            "c2",
            vec![
                url("https://app.example.com/cb"),
                url("http://localhost:3000/cb"),
            ],
        )
    }

    #[test]
    fn test_default_redirect_uri_with_single_registration() {
        let client = single_uri_client();

        let uri = client.validate_redirect_uri(None).unwrap();
        assert_eq!(uri.as_str(), "https://app.example.com/cb");
    }

    #[test]
    fn test_default_redirect_uri_is_ambiguous_with_multiple_registrations() {
        let err = multi_uri_client().validate_redirect_uri(None).unwrap_err();

        assert!(matches!(err, AuthError::InvalidRedirectUri { .. }));
        assert_eq!(
            err.public_description().as_deref(),
            Some("redirect_uri must be specified when client has multiple registered URIs")
        );
    }

    #[test]
    fn test_no_registered_uri_has_no_default() {
        let client = Client::new("c3", vec![]);
        assert!(client.validate_redirect_uri(None).is_err());
    }

    #[test]
    fn test_registered_redirect_uri_is_accepted() {
        let client = multi_uri_client();
        let requested = url("http://localhost:3000/cb");

        assert_eq!(
            client.validate_redirect_uri(Some(&requested)).unwrap(),
            requested
        );
    }

    #[test]
    fn test_unregistered_redirect_uri_is_rejected() {
        let client = single_uri_client();
        let requested = url("https://evil.example.com/cb");

        let err = client.validate_redirect_uri(Some(&requested)).unwrap_err();
        assert_eq!(
            err.public_description().as_deref(),
            Some("Redirect URI 'https://evil.example.com/cb' not registered for client")
        );
    }

    #[test]
    fn test_redirect_uri_match_is_exact() {
        let client = single_uri_client();
        let with_query = url("https://app.example.com/cb?next=/admin");

        assert!(!client.is_redirect_uri_allowed(&with_query));
    }

    #[test]
    fn test_absent_scope_grants_registered_scopes() {
        let scopes = single_uri_client().validate_scope(None).unwrap();
        assert_eq!(scopes, vec!["read", "write"]);
    }

    #[test]
    fn test_requested_scope_keeps_caller_order() {
        let scopes = single_uri_client()
            .validate_scope(Some("write  read"))
            .unwrap();
        assert_eq!(scopes, vec!["write", "read"]);
    }

    #[test]
    fn test_unknown_scope_is_rejected() {
        let err = single_uri_client()
            .validate_scope(Some("read admin"))
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidScope { .. }));
        assert_eq!(
            err.public_description().as_deref(),
            Some("Client was not registered with scope admin")
        );
    }

    #[test]
    fn test_client_without_scopes_allows_none() {
        let client = Client::new("c3", vec![]);
        assert!(client.validate_scope(Some("read")).is_err());
        assert!(client.validate_scope(None).unwrap().is_empty());
    }

    #[test]
    fn test_client_deserialize() {
        let json = r#"{
            "client_id": "my-app",
            "client_name": "My App",
            "redirect_uris": ["https://app.example.com/cb"],
            "scopes": ["read"]
        }"#;

        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.client_id, "my-app");
        assert_eq!(client.client_name.as_deref(), Some("My App"));
        assert_eq!(client.redirect_uris.len(), 1);
        assert_eq!(client.scopes, vec!["read"]);
    }
}
