//! Core query builder types and traits
//!
//! This module provides the fundamental building blocks of the crate,
//! including error types, the client trait, argument rendering, configuration and the builder itself.

pub mod client;
pub mod client_kind;
pub mod config;
pub mod error;
pub mod query_builder;
pub mod response;
pub mod value;

// Re-export commonly used types
pub use client::{Client, ClientHandle};
pub use client_kind::ClientKind;
pub use config::{Config, ConfigBuilder, ConnectionParams, DEFAULT_ENV_FILE};
pub use error::{QueryError, Result};
pub use query_builder::Query;
pub use response::Envelope;
pub use value::{QueryArg, Quoting};
