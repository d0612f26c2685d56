//! HTTP transport layer for the todo MCP server
//!
//! Provides the `/mcp` RPC endpoint handlers plus the health and discovery
//! metadata endpoints.

pub mod handlers;
