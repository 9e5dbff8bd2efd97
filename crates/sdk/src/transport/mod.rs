//! Transport layer for the Semaphore SDK.

pub mod http;

pub use http::HttpTransport;
