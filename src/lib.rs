use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};

pub mod calendar;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod session;

use calendar::NamedayProvider;
use session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub calendar: Arc<dyn NamedayProvider>,
}

impl AppState {
    /// Each front end owns its own registry; tests can stand up several
    /// independent apps without shared state.
    pub fn new(calendar: Arc<dyn NamedayProvider>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            calendar,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::docs))
        .route("/health", get(http::handlers::health))
        .route(
            "/api/tools",
            get(http::handlers::list_tools).post(http::handlers::invoke_tool),
        )
        .route(
            "/mcp",
            get(http::handlers::mcp_get)
                .post(http::handlers::mcp_post)
                .delete(http::handlers::mcp_delete)
                .options(http::cors::preflight),
        )
        .layer(middleware::from_fn(http::cors::apply_cors_headers))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::calendar::{CalendarDate, Locale, NamedayProvider};
    use crate::errors::AppError;
    use crate::http::handlers::MCP_SESSION_ID_HEADER;
    use crate::mcp::server::SUPPORTED_PROTOCOL_VERSION;

    use super::*;

    struct MockCalendar;

    #[async_trait::async_trait]
    impl NamedayProvider for MockCalendar {
        async fn names_for_date(
            &self,
            _locale: Locale,
            month: u32,
            day: u32,
        ) -> Result<Vec<String>, AppError> {
            if (month, day) == (1, 14) {
                Ok(vec!["Radovan".to_string()])
            } else {
                Ok(vec![])
            }
        }

        async fn date_for_name(
            &self,
            _locale: Locale,
            name: &str,
        ) -> Result<Option<CalendarDate>, AppError> {
            if name.eq_ignore_ascii_case("radovan") {
                Ok(Some(CalendarDate { month: 1, day: 14 }))
            } else {
                Ok(None)
            }
        }
    }

    fn app() -> Router {
        build_app(AppState::new(Arc::new(MockCalendar)))
    }

    fn initialize_request() -> Request<Body> {
        Request::builder()
            .uri("/mcp")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(
                r#"{{"jsonrpc":"2.0","id":1,"method":"initialize","params":{{"protocolVersion":"{SUPPORTED_PROTOCOL_VERSION}","clientInfo":{{"name":"test-client","version":"1.0.0"}},"capabilities":{{}}}}}}"#
            )))
            .expect("request build")
    }

    fn mcp_request(session_id: &str, body: &str) -> Request<Body> {
        Request::builder()
            .uri("/mcp")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .header(MCP_SESSION_ID_HEADER, session_id)
            .body(Body::from(body.to_string()))
            .expect("request build")
    }

    async fn body_json(response: Response) -> Value {
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&body).expect("valid json response")
    }

    async fn initialize_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(initialize_request())
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(MCP_SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("session id header on initializing response")
            .to_string()
    }

    #[tokio::test]
    async fn health_reports_server_identity() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["server"], json!(env!("CARGO_PKG_NAME")));
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn docs_page_is_served_at_root() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let page = String::from_utf8(body.to_vec()).expect("utf-8 page");
        assert!(page.contains("Nameday MCP Server"));
    }

    #[tokio::test]
    async fn api_tools_lists_descriptors() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/tools")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tools"][0]["name"], json!("find_name_day"));
        assert_eq!(body["tools"][1]["name"], json!("find_names_by_date"));
        assert_eq!(body["tools"][2]["name"], json!("get_today_name_days"));
    }

    #[tokio::test]
    async fn api_tools_invokes_tool_directly() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/tools")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"tool":"find_name_day","args":{"name":"Radovan"}}"#,
                    ))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["content"][0]["text"],
            json!("Radovan has name day on January 14.")
        );
    }

    #[tokio::test]
    async fn api_tools_missing_fields_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/tools")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"tool":"find_name_day"}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            json!("Missing tool or args in request body")
        );
    }

    #[tokio::test]
    async fn options_preflight_returns_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("OPTIONS")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").map(|v| v.as_bytes()),
            Some(b"*".as_slice())
        );
        let methods = headers
            .get("access-control-allow-methods")
            .and_then(|value| value.to_str().ok())
            .expect("allow-methods header");
        assert!(methods.contains("DELETE"));
        let allowed = headers
            .get("access-control-allow-headers")
            .and_then(|value| value.to_str().ok())
            .expect("allow-headers header");
        assert!(allowed.contains("mcp-session-id"));
        assert!(allowed.contains("mcp-protocol-version"));
    }

    #[tokio::test]
    async fn initialize_assigns_session_id() {
        let app = app();

        let response = app
            .clone()
            .oneshot(initialize_request())
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(MCP_SESSION_ID_HEADER).is_some());
        let body = body_json(response).await;
        assert_eq!(body["jsonrpc"], json!("2.0"));
        assert_eq!(
            body["result"]["protocolVersion"],
            json!(SUPPORTED_PROTOCOL_VERSION)
        );
        assert_eq!(
            body["result"]["serverInfo"]["name"],
            json!(env!("CARGO_PKG_NAME"))
        );
    }

    #[tokio::test]
    async fn follow_up_request_routes_to_same_session() {
        let app = app();
        let session_id = initialize_session(&app).await;

        let response = app
            .clone()
            .oneshot(mcp_request(
                &session_id,
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#,
            ))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["result"]["tools"].is_array());
        assert_eq!(body["result"]["tools"][0]["name"], json!("find_name_day"));
    }

    #[tokio::test]
    async fn tools_call_round_trip_through_session() {
        let app = app();
        let session_id = initialize_session(&app).await;

        let response = app
            .clone()
            .oneshot(mcp_request(
                &session_id,
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"find_names_by_date","arguments":{"month":1,"day":14}}}"#,
            ))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["result"]["content"][0]["text"],
            json!("January 14 has name days: Radovan.")
        );
    }

    #[tokio::test]
    async fn unknown_session_receives_exact_error_envelope() {
        let response = app()
            .oneshot(mcp_request(
                "ZZZ",
                r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#,
            ))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "error": {
                    "code": -32001,
                    "message": "Session not found"
                },
                "id": null
            })
        );
    }

    #[tokio::test]
    async fn unknown_session_is_stable_while_other_sessions_live() {
        let app = app();
        let _live = initialize_session(&app).await;

        let response = app
            .clone()
            .oneshot(mcp_request(
                "never-issued",
                r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            ))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_initialize_request_without_header_is_not_registered() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#,
                    ))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(MCP_SESSION_ID_HEADER).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!(-32000));
    }

    #[tokio::test]
    async fn failed_initialize_does_not_assign_session_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"1999-01-01","clientInfo":{"name":"test-client","version":"1.0.0"},"capabilities":{}}}"#,
                    ))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(MCP_SESSION_ID_HEADER).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn delete_tears_down_the_session() {
        let app = app();
        let session_id = initialize_session(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("DELETE")
                    .header(MCP_SESSION_ID_HEADER, session_id.as_str())
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(mcp_request(
                &session_id,
                r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            ))
            .await
            .expect("request execution");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!(-32001));
    }

    #[tokio::test]
    async fn second_delete_reports_unknown_session() {
        let app = app();
        let session_id = initialize_session(&app).await;

        for expected in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/mcp")
                        .method("DELETE")
                        .header(MCP_SESSION_ID_HEADER, session_id.as_str())
                        .body(Body::empty())
                        .expect("request build"),
                )
                .await
                .expect("request execution");
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn delete_without_header_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("DELETE")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_without_sse_accept_serves_help_text() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let text = String::from_utf8(body.to_vec()).expect("utf-8 body");
        assert!(text.contains("Streamable HTTP endpoint"));
    }

    #[tokio::test]
    async fn get_with_sse_accept_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("GET")
                    .header(header::ACCEPT, "text/event-stream")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn sessions_do_not_observe_each_other() {
        let app = app();
        let session_a = initialize_session(&app).await;
        let session_b = initialize_session(&app).await;
        assert_ne!(session_a, session_b);

        // tearing down A must leave B fully operational
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("DELETE")
                    .header(MCP_SESSION_ID_HEADER, session_a.as_str())
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(mcp_request(
                &session_b,
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"find_name_day","arguments":{"name":"Radovan"}}}"#,
            ))
            .await
            .expect("request execution");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["result"]["content"][0]["text"],
            json!("Radovan has name day on January 14.")
        );

        let response = app
            .clone()
            .oneshot(mcp_request(
                &session_a,
                r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#,
            ))
            .await
            .expect("request execution");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn concurrent_initializations_yield_unique_sessions() {
        let app = app();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                let response = app
                    .oneshot(initialize_request())
                    .await
                    .expect("request execution");
                assert_eq!(response.status(), StatusCode::OK);
                response
                    .headers()
                    .get(MCP_SESSION_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .expect("session id header")
                    .to_string()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("task completion"));
        }

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn parse_error_on_initialization_path_is_in_band() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{"))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(MCP_SESSION_ID_HEADER).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!(-32700));
    }
}
