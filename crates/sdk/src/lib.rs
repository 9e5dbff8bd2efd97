//! # Semaphore SDK
//!
//! Async Rust client for the Semaphore UI REST API.
//!
//! Resources are returned as raw `serde_json::Value`s so that fields added by
//! newer Semaphore releases pass through untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use semaphore_sdk::{SemaphoreClient, SemaphoreResult};
//!
//! #[tokio::main]
//! async fn main() -> SemaphoreResult<()> {
//!     let client = SemaphoreClient::builder()
//!         .base_url("http://localhost:3000")
//!         .api_token("your-api-token")
//!         .build()?;
//!
//!     let projects = client.projects().list().await?;
//!     println!("Found {} projects", projects.len());
//!
//!     let tasks = client.tasks().list(1).await?;
//!     println!("Project 1 has {} tasks", tasks.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

pub use api::RunTaskRequest;
pub use client::{SemaphoreClient, SemaphoreClientBuilder};
pub use config::ClientConfig;
pub use error::{SemaphoreError, SemaphoreResult};
pub use types::TaskStatus;
