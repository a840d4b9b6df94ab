use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use authgate_authorize::{AuthorizationProvider, AuthorizeState, authorize_router};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::{config::AppConfig, handlers, provider::StaticProvider};

pub struct AuthGateServer {
    addr: SocketAddr,
    app: Router,
}

/// Builds the application with the configured static provider.
pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let provider = build_provider(cfg)?;
    Ok(build_app_with_provider(cfg, Arc::new(provider)))
}

pub fn build_provider(cfg: &AppConfig) -> anyhow::Result<StaticProvider> {
    let consent_url = Url::parse(&cfg.provider.consent_url)
        .with_context(|| format!("invalid consent_url '{}'", cfg.provider.consent_url))?;
    Ok(
        StaticProvider::new(consent_url, cfg.provider.clients.iter().cloned())
            .with_pending_ttl(Duration::from_secs(cfg.provider.pending_ttl_secs))
            .with_max_pending(cfg.provider.max_pending),
    )
}

pub fn build_app_with_provider(
    cfg: &AppConfig,
    provider: Arc<dyn AuthorizationProvider>,
) -> Router {
    let state = AuthorizeState::new(provider, cfg.authorize.clone());
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(authorize_router(state))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<AuthGateServer> {
        let app = build_app(&self.config)?;
        Ok(AuthGateServer {
            addr: self.addr,
            app,
        })
    }
}

impl AuthGateServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
