// MCP (Model Context Protocol) server for Semaphore UI
// Exposes projects, templates, tasks, environments, inventory and
// repositories as tools for agent clients.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod startup;
pub mod tools;
pub mod transport;

pub use config::{Args, Settings, Transport};
pub use server::McpServer;
pub use tools::semaphore_registry;
