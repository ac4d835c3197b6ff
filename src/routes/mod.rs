//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/catalog", get(http::http_get_catalog))
        .route("/api/v1/generate", post(http::http_post_generate))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::seeds::builtin_catalog;
    use crate::selection::RecentCache;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    fn offline_router() -> Router {
        let config = AgentConfig::default();
        let recent = Mutex::new(RecentCache::from_config(&config.recent_cache));
        let state = AppState { catalog: builtin_catalog(), config, openai: None, recent };
        build_router(Arc::new(state))
    }

    async fn response_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_generate(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn generate_without_api_key_is_200_with_fallback_problem() {
        let res = offline_router()
            .oneshot(post_generate(r#"{"lengthKey":"short","levels":["N1"]}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["success"], false);
        assert!(json["problem"]["questions"].as_array().map(|a| !a.is_empty()).unwrap_or(false));
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let res = offline_router().oneshot(post_generate("{not json")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = response_json(res).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn custom_without_prompt_is_400() {
        let res = offline_router()
            .oneshot(post_generate(r#"{"type":"custom"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_method_on_generate_is_405() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/api/v1/generate")
            .body(Body::empty())
            .unwrap();
        let res = offline_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_and_catalog_respond() {
        let req = Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap();
        let res = offline_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(response_json(res).await["ok"], true);

        let req = Request::builder().uri("/api/v1/catalog").body(Body::empty()).unwrap();
        let res = offline_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        let classes = json["lengthClasses"].as_array().unwrap();
        assert!(classes.iter().any(|c| c["key"] == "comparative"));
        assert!(json["levels"].as_array().unwrap().iter().any(|l| l.as_str() == Some("N1")));
    }
}
