//! In-memory provider used by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use url::Url;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::authorize::{AuthorizationErrorCode, AuthorizationParams};
use crate::provider::AuthorizationProvider;
use crate::types::Client;

/// What the mock does when asked to authorize.
#[derive(Debug, Clone)]
pub(crate) enum AuthorizeBehavior {
    Redirect(String),
    Refuse(AuthorizationErrorCode, Option<String>),
    Raise(fn() -> AuthError),
    Fail,
}

pub(crate) struct MockProvider {
    clients: HashMap<String, Client>,
    fail_lookup: bool,
    behavior: AuthorizeBehavior,
    lookups: AtomicUsize,
    authorized: Mutex<Vec<AuthorizationParams>>,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self {
            clients: HashMap::new(),
            fail_lookup: false,
            behavior: AuthorizeBehavior::Redirect("https://as/consent?req=1".to_string()),
            lookups: AtomicUsize::new(0),
            authorized: Mutex::new(Vec::new()),
        }
    }

    /// Client `c1` with the single redirect URI `https://app/cb` and scopes
    /// `read write`.
    pub(crate) fn with_default_client() -> Self {
        Self::new().with_client(default_client())
    }

    pub(crate) fn failing_lookup() -> Self {
        let mut provider = Self::with_default_client();
        provider.fail_lookup = true;
        provider
    }

    pub(crate) fn with_client(mut self, client: Client) -> Self {
        self.clients.insert(client.client_id.clone(), client);
        self
    }

    pub(crate) fn with_behavior(mut self, behavior: AuthorizeBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn authorized(&self) -> Vec<AuthorizationParams> {
        self.authorized.lock().unwrap().clone()
    }
}

pub(crate) fn default_client() -> Client {
    Client::new("c1", vec![Url::parse("https://app/cb").unwrap()]).with_scopes(["read", "write"])
}

#[async_trait]
impl AuthorizationProvider for MockProvider {
    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(AuthError::storage("client registry unavailable"));
        }
        Ok(self.clients.get(client_id).cloned())
    }

    async fn authorize(&self, _client: &Client, params: AuthorizationParams) -> AuthResult<String> {
        self.authorized.lock().unwrap().push(params);
        match &self.behavior {
            AuthorizeBehavior::Redirect(target) => Ok(target.clone()),
            AuthorizeBehavior::Refuse(code, description) => Err(AuthError::Authorize {
                error: *code,
                description: description.clone(),
            }),
            AuthorizeBehavior::Raise(make_error) => Err(make_error()),
            AuthorizeBehavior::Fail => Err(AuthError::internal("consent store exploded")),
        }
    }
}
