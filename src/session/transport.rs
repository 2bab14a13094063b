//! HTTP exchange binding for one protocol session
//!
//! Provides the transport adapter that feeds the bytes of a single HTTP
//! exchange into the session's protocol engine and maps the engine's output
//! back to an HTTP response.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::McpServer;
use crate::session::registry::SessionRegistry;

/// Binds one protocol engine to the stream of HTTP exchanges that share a
/// session identifier. Constructed once per session and owned by it.
pub struct StreamableHttpTransport {
    engine: Mutex<McpServer>,
    initialized: AtomicBool,
}

impl StreamableHttpTransport {
    pub fn connect(engine: McpServer) -> Self {
        Self {
            engine: Mutex::new(engine),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Process one HTTP exchange. The engine lock is held for the whole
    /// exchange: two concurrent requests naming the same session are served
    /// one after the other, never interleaved.
    pub async fn handle_exchange(&self, body: &[u8]) -> Response {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => {
                return (
                    StatusCode::OK,
                    Json(json_rpc_error(None, -32700, "Parse error")),
                )
                    .into_response()
            }
        };

        let mut engine = self.engine.lock().await;

        let response = if let Some(batch) = payload.as_array() {
            if batch.is_empty() {
                (
                    StatusCode::OK,
                    Json(vec![json_rpc_error(None, -32600, "Invalid Request")]),
                )
                    .into_response()
            } else {
                let mut responses = Vec::new();
                for item in batch {
                    if let Some(response) = engine.handle_message(item.clone()).await {
                        responses.push(response);
                    }
                }

                if responses.is_empty() {
                    StatusCode::NO_CONTENT.into_response()
                } else {
                    (StatusCode::OK, Json(Value::Array(responses))).into_response()
                }
            }
        } else {
            match engine.handle_message(payload).await {
                Some(response) => (StatusCode::OK, Json(response)).into_response(),
                None => StatusCode::NO_CONTENT.into_response(),
            }
        };

        if engine.is_initialized() {
            self.initialized.store(true, Ordering::Release);
        }

        response
    }

    pub async fn close(&self) {
        self.engine.lock().await.close();
    }
}

/// Armed around a forwarded exchange. If the exchange future is dropped
/// before `disarm` runs the client went away mid-exchange, which counts as a
/// connection-close signal for the whole session.
pub struct CloseOnDisconnect {
    registry: Arc<SessionRegistry>,
    session_id: String,
    armed: bool,
}

impl CloseOnDisconnect {
    pub fn arm(registry: Arc<SessionRegistry>, session_id: String) -> Self {
        Self {
            registry,
            session_id,
            armed: true,
        }
    }

    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CloseOnDisconnect {
    fn drop(&mut self) {
        if self.armed {
            debug!(session_id = %self.session_id, "client disconnected mid-exchange");
            self.registry.teardown(&self.session_id);
        }
    }
}
