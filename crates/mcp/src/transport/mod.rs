// Transports carrying JSON-RPC messages to the MCP server

pub mod http;
pub mod stdio;

pub use http::{create_router, serve_http};
pub use stdio::{serve_lines, serve_stdio};
