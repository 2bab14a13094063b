//! Axum HTTP handlers for the web server
//!
//! Provides the session-multiplexed `/mcp` protocol endpoint and the general
//! metadata endpoints around it.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::tools::{build_tools_list, call_tool};
use crate::http::docs::DOCS_HTML;
use crate::mcp::rpc::{json_rpc_error, session_not_found};
use crate::mcp::server::McpServer;
use crate::session::CloseOnDisconnect;
use crate::AppState;

/// Clients echo this header on every call after the initializing response.
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

pub const MCP_HELP_TEXT: &str = "Nameday MCP Streamable HTTP endpoint\n\n\
    - POST /mcp with 'Accept: application/json, text/event-stream' to initialize a session.\n\
    - Reuse the returned mcp-session-id header on subsequent POST /mcp calls.\n\
    - Open GET / for human-friendly documentation.";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub server: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        server: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}

pub async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": build_tools_list() }))
}

pub async fn invoke_tool(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON body" })),
            )
                .into_response()
        }
    };

    let tool = payload.get("tool").and_then(Value::as_str);
    let args = payload.get("args").cloned();
    let (Some(tool), Some(args)) = (tool, args) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing tool or args in request body" })),
        )
            .into_response();
    };

    let result = call_tool(state.calendar.as_ref(), tool, args).await;
    Json(result).into_response()
}

/// The request router for the protocol path: no session header means an
/// initialization request; a known header forwards into that session; an
/// unknown header is answered immediately and permanently for this request.
pub async fn mcp_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match session_id_header(&headers) {
        Some(session_id) => match state.sessions.lookup(session_id) {
            Some(session) => {
                let guard =
                    CloseOnDisconnect::arm(state.sessions.clone(), session.id().to_string());
                let response = session.handle_exchange(&body).await;
                guard.disarm();
                response
            }
            None => session_not_found_response(),
        },
        None => initialize_session(&state, &body).await,
    }
}

pub async fn mcp_get(headers: HeaderMap) -> Response {
    let accepts_event_stream = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("text/event-stream"))
        .unwrap_or(false);

    if accepts_event_stream {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json_rpc_error(
                None,
                -32000,
                "SSE streaming is not supported",
            )),
        )
            .into_response();
    }

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        MCP_HELP_TEXT,
    )
        .into_response()
}

/// Explicit protocol-level close: one of the two signals feeding the shared
/// teardown routine.
pub async fn mcp_delete(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match session_id_header(&headers) {
        Some(session_id) => {
            if state.sessions.teardown(session_id) {
                info!(session_id = %session_id, "session terminated by client");
                StatusCode::NO_CONTENT.into_response()
            } else {
                session_not_found_response()
            }
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json_rpc_error(None, -32600, "Invalid Request")),
        )
            .into_response(),
    }
}

async fn initialize_session(state: &AppState, body: &Bytes) -> Response {
    let engine = McpServer::new(state.calendar.clone());
    let pending = state.sessions.begin_session(engine);

    let mut response = pending.session().handle_exchange(body).await;

    if pending.session().is_initialized() {
        let session = state.sessions.confirm_session(pending);
        info!(session_id = %session.id(), "session initialized");
        if let Ok(value) = HeaderValue::from_str(session.id()) {
            response.headers_mut().insert(MCP_SESSION_ID_HEADER, value);
        }
    }

    response
}

/// The first occurrence wins when the header repeats.
fn session_id_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(MCP_SESSION_ID_HEADER)
        .iter()
        .next()
        .and_then(|value| value.to_str().ok())
}

fn session_not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Json(session_not_found())).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;

    use super::*;

    #[test]
    fn first_session_header_occurrence_wins() {
        let mut headers = HeaderMap::new();
        headers.append(MCP_SESSION_ID_HEADER, "first".parse().expect("header value"));
        headers.append(MCP_SESSION_ID_HEADER, "second".parse().expect("header value"));

        assert_eq!(session_id_header(&headers), Some("first"));
    }

    #[test]
    fn missing_session_header_is_none() {
        assert_eq!(session_id_header(&HeaderMap::new()), None);
    }
}
