//! Todo domain logic exposed over the MCP protocol
//!
//! Provides the tool catalog and the dispatch from string-typed tool
//! arguments to typed store calls.

pub mod todos;
pub mod utils;
