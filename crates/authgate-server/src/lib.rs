pub mod config;
pub mod handlers;
pub mod observability;
pub mod provider;
pub mod server;

pub use config::AppConfig;
pub use provider::{PendingAuthorization, StaticProvider};
pub use server::{AuthGateServer, ServerBuilder, build_app, build_app_with_provider, build_provider};
