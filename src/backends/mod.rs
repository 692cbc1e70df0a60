//! Client backend implementations
//!
//! This module contains concrete implementations of the Client trait
//! for each transport SurrealDB speaks.

pub mod http;
pub mod ws;

pub use http::HttpClient;
pub use ws::WsClient;
