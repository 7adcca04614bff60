//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`, plus `/health` at the root.
//! Middleware: CORS, request tracing.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mindful_types::config::CorsConfig;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let api_routes = Router::new()
        // Chat relay
        .route("/chat", post(handlers::chat::send_message))
        .route(
            "/chat/history/{session_id}",
            get(handlers::chat::get_history),
        )
        // Forum
        .route("/forum/channels", get(handlers::forum::list_channels))
        .route(
            "/forum/{channel}",
            get(handlers::forum::list_posts).post(handlers::forum::create_post),
        )
        .route(
            "/forum/{channel}/{post_id}/reply",
            post(handlers::forum::add_reply),
        )
        // Operators
        .route(
            "/admin/crisis-alerts",
            get(handlers::admin::list_crisis_alerts),
        );

    Router::new()
        .route("/api", get(handlers::root::root))
        .route("/api/", get(handlers::root::root))
        .nest("/api", api_routes)
        .route("/health", get(handlers::root::health_check))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer allowing the configured origins with any method and header.
///
/// `*` or an empty list allows any origin. Origins that are not valid
/// header values are skipped with a warning.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::STORE_ERROR_DETAIL;
    use crate::state::test_support::{test_state, test_state_with_pool};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_liveness_with_and_without_slash() {
        let router = build_router(test_state().await, &CorsConfig::default());

        for uri in ["/api/", "/api"] {
            let (status, body) = send(router.clone(), get_req(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["message"], "Mindful Mind API is running");
        }
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state().await, &CorsConfig::default());
        let (status, body) = send(router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_chat_endpoint_ignores_client_crisis_flag() {
        let router = build_router(test_state().await, &CorsConfig::default());
        let (status, body) = send(
            router,
            post_json(
                "/api/chat",
                serde_json::json!({"session_id": "s", "message": "hello", "is_crisis": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_crisis"], false);
        assert!(!body["response"].as_str().unwrap().is_empty());
        assert!(body["id"].is_string());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_forum_flow_over_http() {
        let router = build_router(test_state().await, &CorsConfig::default());

        let (status, body) = send(router.clone(), get_req("/api/forum/channels")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["channels"][0], "general");

        let (status, post) = send(
            router.clone(),
            post_json(
                "/api/forum/anxiety",
                serde_json::json!({"title": "Test Anxiety", "content": "Any tips?"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let post_id = post["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            router.clone(),
            post_json(
                &format!("/api/forum/anxiety/{post_id}/reply"),
                serde_json::json!({"content": "Breathing exercises help me"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, posts) = send(router, get_req("/api/forum/anxiety")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(posts.as_array().unwrap().len(), 1);
        assert_eq!(posts[0]["replies"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_bodies() {
        let router = build_router(test_state().await, &CorsConfig::default());

        let (status, body) = send(
            router.clone(),
            post_json(
                "/api/forum/general",
                serde_json::json!({"title": "", "content": "x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            router.clone(),
            post_json(
                "/api/forum/general/not-a-uuid/reply",
                serde_json::json!({"content": "hi"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(
            router,
            post_json("/api/chat", serde_json::json!({"message": "no session"})),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_closed_store_hides_driver_error() {
        let (state, pool) = test_state_with_pool().await;
        let router = build_router(state, &CorsConfig::default());
        pool.reader.close().await;
        pool.writer.close().await;

        for request in [
            get_req("/api/forum/general"),
            get_req("/api/admin/crisis-alerts"),
            get_req("/api/chat/history/s-1"),
            post_json(
                "/api/forum/general",
                serde_json::json!({"title": "Hello", "content": "Anyone here?"}),
            ),
        ] {
            let (status, body) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["code"], "STORE_ERROR");
            assert_eq!(body["detail"], STORE_ERROR_DETAIL);
            assert!(!body.to_string().contains("pool"), "driver text leaked: {body}");
        }

        // Chat still answers when nothing can be stored.
        let (status, body) = send(
            router,
            post_json("/api/chat", serde_json::json!({"session_id": "s-1", "message": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cors_restricted_origin() {
        let cors = CorsConfig::from_list("https://mindful.example");
        let router = build_router(test_state().await, &cors);

        let allowed = Request::builder()
            .uri("/api/")
            .header(header::ORIGIN, "https://mindful.example")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(allowed).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://mindful.example"
        );

        let denied = Request::builder()
            .uri("/api/")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(denied).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_any_origin() {
        let router = build_router(test_state().await, &CorsConfig::default());
        let request = Request::builder()
            .uri("/api/")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
