//! Authoritative mapping from session identifier to live session
//!
//! Provides two-phase session creation (begin, then confirm once the protocol
//! handshake succeeded) and the idempotent teardown shared by every close
//! signal.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::response::Response;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::mcp::server::McpServer;
use crate::session::transport::StreamableHttpTransport;

/// One logical protocol conversation. The session is the exclusive owner of
/// its transport, which in turn owns the protocol engine.
pub struct Session {
    id: String,
    transport: StreamableHttpTransport,
    closed: AtomicBool,
}

impl Session {
    pub(crate) fn new(id: String, engine: McpServer) -> Self {
        Self {
            id,
            transport: StreamableHttpTransport::connect(engine),
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True once the protocol layer confirmed the `initialize` handshake.
    pub fn is_initialized(&self) -> bool {
        self.transport.is_initialized()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn handle_exchange(&self, body: &[u8]) -> Response {
        self.transport.handle_exchange(body).await
    }

    /// The `live -> closed` transition. Safe to call from both close signals;
    /// `closed -> closed` is a no-op.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.transport.close().await;
        debug!(session_id = %self.id, "session closed");
    }
}

/// A session that has been created but not yet confirmed by the protocol
/// layer. Dropping it without confirmation discards the session; it never
/// becomes visible to lookups.
pub struct PendingSession {
    session: Arc<Session>,
}

impl PendingSession {
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

/// The single shared mutable structure of the server. All critical sections
/// are synchronous and short; no lock is held across an await point.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// First phase of session creation: build the session around a freshly
    /// connected engine under a server-generated identifier. The identifier
    /// is not valid for lookups until `confirm_session` runs.
    pub fn begin_session(&self, engine: McpServer) -> PendingSession {
        let id = Uuid::new_v4().to_string();
        PendingSession {
            session: Arc::new(Session::new(id, engine)),
        }
    }

    /// Second phase: make the session visible. Returns the now-live session.
    pub fn confirm_session(&self, pending: PendingSession) -> Arc<Session> {
        self.register(pending.session.clone());
        pending.session
    }

    /// Insert a session under its identifier. If the identifier is already
    /// present the stale entry is torn down first, so at most one live
    /// session is ever reachable per identifier.
    pub fn register(&self, session: Arc<Session>) {
        let stale = self
            .write_sessions()
            .insert(session.id().to_string(), session);

        if let Some(stale) = stale {
            warn!(session_id = %stale.id(), "replacing stale session registration");
            tokio::spawn(async move { stale.close().await });
        }
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<Session>> {
        self.read_sessions().get(id).cloned()
    }

    /// Remove-if-present. Absent is a normal outcome, not an error.
    pub fn unregister(&self, id: &str) -> Option<Arc<Session>> {
        self.write_sessions().remove(id)
    }

    /// The teardown routine both close signals funnel into: unregister, then
    /// close the session off the request path. Whichever signal fires first
    /// wins; later calls find nothing to remove.
    pub fn teardown(&self, id: &str) -> bool {
        match self.unregister(id) {
            Some(session) => {
                tokio::spawn(async move { session.close().await });
                true
            }
            None => false,
        }
    }

    pub fn live_sessions(&self) -> usize {
        self.read_sessions().len()
    }

    fn read_sessions(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
