//! In-memory provider backed by the configured client list.
//!
//! Accepted requests are parked under a fresh id and the user agent is sent
//! to the consent page with that id in the `req` parameter. The consent page
//! itself lives outside this server and claims the request with
//! [`StaticProvider::take`].
//!
//! Parked requests expire after a TTL and their number is capped. Expired
//! entries are swept on every insert.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use authgate_authorize::oauth::construct_redirect_uri;
use authgate_authorize::{
    AuthError, AuthResult, AuthorizationErrorCode, AuthorizationParams, AuthorizationProvider,
    Client,
};
use dashmap::DashMap;
use url::Url;
use uuid::Uuid;

/// Default lifetime of a parked request.
pub const DEFAULT_PENDING_TTL: Duration = Duration::from_secs(600);

/// Default cap on parked requests.
pub const DEFAULT_MAX_PENDING: usize = 10_000;

/// An accepted request waiting for the user's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthorization {
    pub client_id: String,
    pub params: AuthorizationParams,
    pub expires_at: Instant,
}

impl PendingAuthorization {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct StaticProvider {
    clients: DashMap<String, Client>,
    pending: DashMap<Uuid, PendingAuthorization>,
    consent_url: Url,
    pending_ttl: Duration,
    max_pending: usize,
}

impl StaticProvider {
    pub fn new(consent_url: Url, clients: impl IntoIterator<Item = Client>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|c| (c.client_id.clone(), c))
                .collect(),
            pending: DashMap::new(),
            consent_url,
            pending_ttl: DEFAULT_PENDING_TTL,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }

    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl = ttl;
        self
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Returns the parked request for `id` unless it has expired.
    pub fn pending(&self, id: &Uuid) -> Option<PendingAuthorization> {
        self.pending
            .get(id)
            .map(|entry| entry.value().clone())
            .filter(|pending| !pending.is_expired())
    }

    /// Removes and returns the parked request for `id` unless it has expired.
    pub fn take(&self, id: &Uuid) -> Option<PendingAuthorization> {
        self.pending
            .remove(id)
            .map(|(_, pending)| pending)
            .filter(|pending| !pending.is_expired())
    }

    /// Drops expired requests and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, pending| !pending.is_expired());
        before.saturating_sub(self.pending.len())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl AuthorizationProvider for StaticProvider {
    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.get(client_id).map(|entry| entry.value().clone()))
    }

    async fn authorize(&self, client: &Client, params: AuthorizationParams) -> AuthResult<String> {
        let expired = self.cleanup_expired();
        if expired > 0 {
            tracing::debug!(expired, "Dropped expired pending authorizations");
        }

        if self.pending.len() >= self.max_pending {
            tracing::warn!(
                client_id = %client.client_id,
                max_pending = self.max_pending,
                "Pending authorization store is full"
            );
            return Err(AuthError::authorize(
                AuthorizationErrorCode::TemporarilyUnavailable,
                "Too many pending authorization requests",
            ));
        }

        let id = Uuid::new_v4();
        self.pending.insert(
            id,
            PendingAuthorization {
                client_id: client.client_id.clone(),
                params,
                expires_at: Instant::now() + self.pending_ttl,
            },
        );
        tracing::info!(
            client_id = %client.client_id,
            request_id = %id,
            "Authorization request pending consent"
        );

        let req = id.to_string();
        Ok(construct_redirect_uri(&self.consent_url, [("req", req.as_str())]).into())
    }
}
