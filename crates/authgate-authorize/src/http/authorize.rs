//! Authorization endpoint handlers.
//!
//! `GET` reads parameters from the query string, `POST` from an
//! `application/x-www-form-urlencoded` or `multipart/form-data` body. Both are
//! handed to the same [`AuthorizationHandler`].
//!
//! # Usage
//!
//! ```ignore
//! use authgate_authorize::http::{AuthorizeState, authorize_router};
//!
//! let state = AuthorizeState::new(provider, AuthorizeConfig::default());
//! let app = axum::Router::new().merge(authorize_router(state));
//! ```

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, RawQuery, Request, State},
    http::{HeaderMap, header::CONTENT_TYPE},
    routing::get,
};

use crate::AuthResult;
use crate::config::AuthorizeConfig;
use crate::error::AuthError;
use crate::oauth::{AuthorizationHandler, AuthorizeResponse, RequestParams};
use crate::provider::AuthorizationProvider;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Body encodings `POST` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormEncoding {
    UrlEncoded,
    Multipart,
}

// =============================================================================
// State Types
// =============================================================================

/// State required for the authorization endpoint.
#[derive(Clone)]
pub struct AuthorizeState {
    /// Request pipeline.
    pub handler: Arc<AuthorizationHandler>,
    /// Endpoint settings.
    pub config: AuthorizeConfig,
}

impl AuthorizeState {
    /// Creates endpoint state backed by `provider`.
    pub fn new(provider: Arc<dyn AuthorizationProvider>, config: AuthorizeConfig) -> Self {
        Self {
            handler: Arc::new(AuthorizationHandler::new(provider)),
            config,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /authorize`
pub async fn authorize_get(
    State(state): State<AuthorizeState>,
    RawQuery(query): RawQuery,
) -> AuthorizeResponse {
    let params = RequestParams::from_urlencoded(query.unwrap_or_default().as_bytes());
    state.handler.handle(Ok(params)).await
}

/// `POST /authorize`
///
/// Any other content type is read as an empty parameter set. File parts of a
/// multipart body are ignored. Body read failures are not rejected here. They
/// reach the handler as an error so the response still follows the
/// endpoint's error rules.
pub async fn authorize_post(
    State(state): State<AuthorizeState>,
    request: Request,
) -> AuthorizeResponse {
    let params = read_form(request, state.config.max_form_body_bytes).await;
    state.handler.handle(params).await
}

/// Builds a router serving both methods on the configured path.
pub fn authorize_router(state: AuthorizeState) -> Router {
    let path = state.config.path.clone();
    let limit = state.config.max_form_body_bytes;
    Router::new()
        .route(&path, get(authorize_get).post(authorize_post))
        // Multipart reads honour this limit; urlencoded reads apply it directly.
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

async fn read_form(request: Request, limit: usize) -> AuthResult<RequestParams> {
    match form_encoding(request.headers()) {
        Some(FormEncoding::UrlEncoded) => {
            let bytes = axum::body::to_bytes(request.into_body(), limit)
                .await
                .map_err(|e| AuthError::body_read(format!("form body: {e}")))?;
            Ok(RequestParams::from_urlencoded(&bytes))
        }
        Some(FormEncoding::Multipart) => read_multipart(request).await,
        None => Ok(RequestParams::default()),
    }
}

async fn read_multipart(request: Request) -> AuthResult<RequestParams> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| AuthError::body_read(format!("multipart body: {e}")))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuthError::body_read(format!("multipart field: {e}")))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AuthError::body_read(format!("multipart field '{name}': {e}")))?;
        pairs.push((name, value));
    }

    Ok(RequestParams::new(pairs))
}

fn form_encoding(headers: &HeaderMap) -> Option<FormEncoding> {
    let mime = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())?
        .trim();

    if mime.eq_ignore_ascii_case(FORM_URLENCODED) {
        Some(FormEncoding::UrlEncoded)
    } else if mime.eq_ignore_ascii_case(MULTIPART_FORM_DATA) {
        Some(FormEncoding::Multipart)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;

    use super::*;
    use crate::oauth::testing::MockProvider;

    fn app(config: AuthorizeConfig) -> (Router, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::with_default_client());
        (authorize_router(AuthorizeState::new(provider.clone(), config)), provider)
    }

    async fn send(router: Router, request: Request<Body>) -> Response {
        router.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, content_type: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_get_redirects_to_provider_target() {
        let (router, _) = app(AuthorizeConfig::default());

        let response = send(
            router,
            Request::builder()
                .uri("/authorize?client_id=c1&response_type=code&code_challenge=abc&state=xyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://as/consent?req=1"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[tokio::test]
    async fn test_post_form_is_processed_like_get() {
        let (router, provider) = app(AuthorizeConfig::default());

        let response = send(
            router,
            post(
                "/authorize",
                Some("application/x-www-form-urlencoded; charset=UTF-8"),
                "client_id=c1&response_type=code&code_challenge=abc&scope=read",
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(provider.authorized()[0].scopes, vec!["read"]);
    }

    #[tokio::test]
    async fn test_post_json_body_is_treated_as_empty() {
        let (router, provider) = app(AuthorizeConfig::default());

        let response = send(
            router,
            post(
                "/authorize",
                Some("application/json"),
                r#"{"client_id": "c1"}"#,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_request");
        assert_eq!(provider.lookups(), 0);
    }

    #[tokio::test]
    async fn test_post_oversized_body_is_server_error() {
        let (router, provider) = app(AuthorizeConfig {
            max_form_body_bytes: 16,
            ..Default::default()
        });

        let response = send(
            router,
            post(
                "/authorize",
                Some(FORM_URLENCODED),
                "client_id=c1&response_type=code&code_challenge=abc",
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "server_error");
        assert_eq!(body["error_description"], "An unexpected error occurred");
        assert_eq!(provider.lookups(), 0);
    }

    #[tokio::test]
    async fn test_direct_error_body_shape() {
        let (router, _) = app(AuthorizeConfig::default());

        let response = send(
            router,
            Request::builder()
                .uri("/authorize?client_id=nobody&response_type=code&code_challenge=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert_eq!(
            json_body(response).await,
            serde_json::json!({
                "error": "invalid_request",
                "error_description": "Client ID 'nobody' not found",
                "error_uri": null,
                "state": null,
            })
        );
    }

    #[tokio::test]
    async fn test_custom_path() {
        let (router, _) = app(AuthorizeConfig {
            path: "/oauth/authorize".to_string(),
            ..Default::default()
        });

        let response = send(
            router,
            Request::builder()
                .uri("/oauth/authorize?client_id=c1&response_type=code&code_challenge=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
    }

    const MULTIPART_BODY: &str = "--XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"client_id\"\r\n\r\n\
        c1\r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"response_type\"\r\n\r\n\
        code\r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"code_challenge\"\r\n\r\n\
        abc\r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"scope\"\r\n\r\n\
        write\r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"state\"; filename=\"state.txt\"\r\n\
        Content-Type: text/plain\r\n\r\n\
        ignored\r\n\
        --XBOUNDARY--\r\n";

    #[tokio::test]
    async fn test_post_multipart_form_is_processed() {
        let (router, provider) = app(AuthorizeConfig::default());

        let response = send(
            router,
            post(
                "/authorize",
                Some("multipart/form-data; boundary=XBOUNDARY"),
                MULTIPART_BODY,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let authorized = provider.authorized();
        assert_eq!(authorized[0].scopes, vec!["write"]);
        assert_eq!(authorized[0].state, None);
    }

    #[tokio::test]
    async fn test_post_oversized_multipart_is_server_error() {
        let (router, provider) = app(AuthorizeConfig {
            max_form_body_bytes: 32,
            ..Default::default()
        });

        let response = send(
            router,
            post(
                "/authorize",
                Some("multipart/form-data; boundary=XBOUNDARY"),
                MULTIPART_BODY,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "server_error");
        assert_eq!(provider.lookups(), 0);
    }

    #[test]
    fn test_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert_eq!(form_encoding(&headers), None);

        headers.insert(CONTENT_TYPE, "Application/X-WWW-Form-Urlencoded".parse().unwrap());
        assert_eq!(form_encoding(&headers), Some(FormEncoding::UrlEncoded));

        headers.insert(CONTENT_TYPE, "multipart/form-data; boundary=x".parse().unwrap());
        assert_eq!(form_encoding(&headers), Some(FormEncoding::Multipart));

        headers.insert(CONTENT_TYPE, "text/plain".parse().unwrap());
        assert_eq!(form_encoding(&headers), None);
    }
}
