//! Session multiplexing for the streamable HTTP protocol endpoint
//!
//! Provides the registry mapping `mcp-session-id` values to live protocol
//! sessions, and the per-session transport binding HTTP exchanges to one
//! protocol engine.

pub mod registry;
pub mod transport;

pub use registry::{PendingSession, Session, SessionRegistry};
pub use transport::{CloseOnDisconnect, StreamableHttpTransport};
