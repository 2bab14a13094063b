//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the external API routing, including the base `/mcp` listener and other endpoints.

pub mod cors;
pub mod docs;
pub mod handlers;
