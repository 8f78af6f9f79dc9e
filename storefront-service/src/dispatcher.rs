//! Request dispatch over the route table

use tracing::instrument;

use crate::{
    error::Result,
    responses::Reply,
    routing::{Handler, QueryMap, RouteTable},
    state::AppState,
};

const ENDPOINT_NOT_FOUND: &str = "Endpoint not found";

/// One inbound API call, already decoded from HTTP
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    /// Full request path, prefix included
    pub path: String,
    pub query: QueryMap,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: QueryMap::new(),
        }
    }

    pub fn with_query(mut self, query: QueryMap) -> Self {
        self.query = query;
        self
    }
}

/// Resolves requests against an immutable [`RouteTable`] and runs the handler
///
/// Handler errors are returned unchanged; turning them into a response is
/// left to the HTTP boundary.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    prefix: String,
}

impl Dispatcher {
    pub fn new(routes: RouteTable, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        Self { routes, prefix }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strip the API prefix when it ends on a segment boundary
    ///
    /// `/api/products` becomes `/products` and `/api` becomes `/`, while
    /// `/apiary` is left alone.
    pub fn normalize<'p>(&self, path: &'p str) -> &'p str {
        if self.prefix.is_empty() {
            return if path.is_empty() { "/" } else { path };
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }

    #[instrument(skip(self, state, request), fields(method = %request.method, path = %request.path))]
    pub async fn dispatch(&self, state: &AppState, request: ApiRequest) -> Result<Reply> {
        let path = self.normalize(&request.path);

        let Some(found) = self.routes.match_route(&request.method, path) else {
            tracing::debug!(path, "No route matched");
            return Ok(Reply::not_found(ENDPOINT_NOT_FOUND));
        };

        tracing::debug!(template = found.template, params = found.params.len(), "Route matched");

        match found.handler {
            Handler::Inline(handler) => handler(found.params).await,
            Handler::Action(action) => {
                tracing::debug!(action = action.name(), "Invoking controller action");
                action.invoke(state, &request.query, found.params).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        controllers::AuthAction,
        error::Error,
        persistence::recording::RecordingStore,
        routing::PathParams,
    };
    use http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Config::default(), Arc::new(RecordingStore::empty())).unwrap()
    }

    async fn echo(params: PathParams) -> Result<Reply> {
        Ok(Reply::ok(serde_json::to_value(params).unwrap()))
    }

    fn dispatcher() -> Dispatcher {
        let mut routes = RouteTable::builder();
        routes
            .get("/products/{slug}", Handler::inline(echo))
            .unwrap()
            .post("/auth/login", AuthAction::Login)
            .unwrap()
            .get("/boom", Handler::inline(|_| async {
                Err(Error::Internal("handler exploded".into()))
            }))
            .unwrap();
        Dispatcher::new(routes.build(), "/api")
    }

    #[test]
    fn test_normalize() {
        let d = dispatcher();
        assert_eq!(d.normalize("/api/products"), "/products");
        assert_eq!(d.normalize("/api"), "/");
        assert_eq!(d.normalize("/api/"), "/");
        assert_eq!(d.normalize("/apiary"), "/apiary");
        assert_eq!(d.normalize("/products"), "/products");
    }

    #[test]
    fn test_trailing_slash_on_prefix_is_ignored() {
        let d = Dispatcher::new(RouteTable::default(), "/api/");
        assert_eq!(d.prefix(), "/api");
        assert_eq!(d.normalize("/api/cart"), "/cart");
    }

    #[tokio::test]
    async fn test_inline_handler_receives_params() {
        let reply = dispatcher()
            .dispatch(&state(), ApiRequest::new("GET", "/api/products/air-max-90"))
            .await
            .unwrap();
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(reply.envelope().data, Some(json!({ "slug": "air-max-90" })));
    }

    #[tokio::test]
    async fn test_unprefixed_path_still_matches() {
        let reply = dispatcher()
            .dispatch(&state(), ApiRequest::new("get", "/products/predator-edge"))
            .await
            .unwrap();
        assert_eq!(reply.envelope().data, Some(json!({ "slug": "predator-edge" })));
    }

    #[tokio::test]
    async fn test_miss_is_not_found_envelope() {
        let d = dispatcher();
        let state = state();
        for (method, path) in [
            ("GET", "/api/nowhere"),
            ("DELETE", "/api/products/air-max-90"),
            ("PATCH", "/api/products/air-max-90"),
            ("GET", "/api/products/air-max-90/reviews"),
        ] {
            let reply = d.dispatch(&state, ApiRequest::new(method, path)).await.unwrap();
            assert_eq!(reply.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                serde_json::to_value(reply.envelope()).unwrap(),
                json!({ "success": false, "message": "Endpoint not found" })
            );
        }
    }

    #[tokio::test]
    async fn test_controller_action_runs() {
        let err = dispatcher()
            .dispatch(&state(), ApiRequest::new("POST", "/api/auth/login"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotImplemented(ref m) if m == "Login endpoint - coming soon"));
    }

    #[tokio::test]
    async fn test_handler_errors_are_not_swallowed() {
        let err = dispatcher()
            .dispatch(&state(), ApiRequest::new("GET", "/api/boom"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
