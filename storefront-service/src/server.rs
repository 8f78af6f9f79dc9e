//! HTTP server with graceful shutdown

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    dispatcher::ApiRequest,
    error::{Result, GENERIC_INTERNAL_MESSAGE},
    responses::Reply,
    routing::QueryMap,
    state::AppState,
};

/// Router that sends every request through the API dispatcher
pub fn app(state: AppState) -> Router {
    Router::new().fallback(handle_api).with_state(state)
}

/// Request boundary: decode, dispatch, and render any error as an envelope
async fn handle_api(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    // Preflights carrying CORS headers are answered by the CORS layer
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let query = Query::<QueryMap>::try_from_uri(&uri)
        .map(|Query(query)| query)
        .unwrap_or_default();

    let request = ApiRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query,
    };

    match state.dispatcher().dispatch(&state, request).await {
        Ok(reply) => reply.into_response(),
        Err(err) => err
            .into_reply(state.config().service.reveals_error_details())
            .into_response(),
    }
}

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server with the given router until SIGINT or SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.apply_middleware(app);

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Wrap `app` in the standard middleware stack
    ///
    /// Each `layer` call wraps everything before it, so panic recovery ends
    /// up outermost.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let body_limit = self.config.middleware.body_limit_mb * 1024 * 1024;

        app.layer(self.build_cors_layer())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.service.timeout_secs),
            ))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(CatchPanicLayer::custom(panic_reply))
    }

    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        tracing::info!(
            body_limit_mb = middleware.body_limit_mb,
            cors_origins = middleware.cors_allowed_origins.len(),
            timeout_secs = self.config.service.timeout_secs,
            environment = ?self.config.service.environment,
            api_prefix = %self.config.api.prefix,
            "Middleware configured"
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Credentialed CORS for the configured origins only
    fn build_cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .config
            .middleware
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}

fn panic_reply(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "Handler panicked");

    Reply::internal(GENERIC_INTERNAL_MESSAGE).into_response()
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Environment,
        persistence::recording::{record, RecordingStore},
    };
    use axum::{body::Body, http::Request, routing::get};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(config: Config, store: RecordingStore) -> Router {
        let state = AppState::new(config, Arc::new(store)).unwrap();
        app(state)
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn production() -> Config {
        let mut config = Config::default();
        config.service.environment = Environment::Production;
        config
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let (status, body) = call(
            router(Config::default(), RecordingStore::empty()),
            "GET",
            "/api/wishlist",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "success": false, "message": "Endpoint not found" }));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(
            router(Config::default(), RecordingStore::empty()),
            "GET",
            "/api/health",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Kamran Sports API is running");
    }

    #[tokio::test]
    async fn test_listing_query_reaches_catalog() {
        let store = RecordingStore::new(|sql, _| {
            if sql.contains("COUNT(*) AS total") {
                Ok(vec![record(json!({ "total": 3 }))])
            } else {
                Ok(vec![record(json!({ "id": 1, "slug": "air-max-90" }))])
            }
        });
        let app = router(Config::default(), store.clone());

        let (status, body) = call(
            app,
            "GET",
            "/api/products?min_price=50&max_price=150&search=shoe&page=oops&limit=2",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"], json!({ "total": 3, "page": 1, "limit": 2, "pages": 2 }));

        let count = &store.calls()[0];
        assert_eq!(count.bindings.len(), 3);
        assert!(count.query.contains("p.base_price >= :min_price"));
        assert!(count.query.contains("p.base_price <= :max_price"));
        assert!(count.query.contains("ILIKE :search"));
        assert!(!count.query.contains("shoe"));
    }

    #[tokio::test]
    async fn test_missing_product_is_404() {
        let (status, body) = call(
            router(Config::default(), RecordingStore::empty()),
            "GET",
            "/api/products/ghost",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_stub_is_501() {
        let (status, body) = call(
            router(Config::default(), RecordingStore::empty()),
            "POST",
            "/api/cart/add",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["message"], "Add to cart endpoint - coming soon");
    }

    #[tokio::test]
    async fn test_failure_detail_only_in_development() {
        let (status, body) = call(
            router(Config::default(), RecordingStore::failing("connection reset")),
            "GET",
            "/api/categories",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("connection reset"));

        let (status, body) = call(
            router(production(), RecordingStore::failing("connection reset")),
            "GET",
            "/api/categories",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "message": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_options_is_ok() {
        let (status, body) = call(
            router(Config::default(), RecordingStore::empty()),
            "OPTIONS",
            "/api/anything/at/all",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    async fn explode() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_500() {
        let server = Server::new(Config::default());
        let app = server.apply_middleware(Router::new().route("/explode", get(explode)));

        let (status, body) = call(app, "GET", "/explode").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "message": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let server = Server::new(Config::default());
        let state = AppState::new(Config::default(), Arc::new(RecordingStore::empty())).unwrap();
        let service = server.apply_middleware(app(state));

        let preflight = |origin: &str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/api/products")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = service.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );

        let denied = service.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
