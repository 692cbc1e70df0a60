//! Client trait
//!
//! This module defines the transport-facing trait the query builder submits statements through.

use super::client_kind::ClientKind;
use super::error::{QueryError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Shared client handle, as held by [`Config`](super::config::Config) and every query built from it
pub type ClientHandle = Arc<dyn Client>;

/// Core client trait that every transport must implement
///
/// `query` returns the raw response: an array of per-statement envelopes. Unwrapping
/// happens in the query builder so every transport is treated the same way.
#[async_trait]
pub trait Client: Send + Sync {
    /// Get the client kind
    fn kind(&self) -> ClientKind;

    /// Check if the client has a live connection
    ///
    /// Clients that are not connection oriented are always connected.
    fn is_connected(&self) -> bool {
        true
    }

    /// Establish the connection
    ///
    /// Must be idempotent: calling it on a connected client is a no-op.
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Submit a SurrealQL string and return the envelope array
    async fn query(&self, statement: &str) -> Result<Value>;

    /// Switch namespace and database
    ///
    /// Connection oriented clients switch in place and return `None`. Clients that
    /// embed the namespace in every request return a replacement handle instead.
    async fn use_ns(&self, namespace: &str, database: &str) -> Result<Option<ClientHandle>>;

    /// Sign in with a credential payload and return the token
    async fn signin(&self, _credentials: Value) -> Result<Value> {
        Err(QueryError::auth(format!(
            "{} client does not support signin",
            self.kind()
        )))
    }

    /// Sign up with a credential payload and return the token
    async fn signup(&self, _credentials: Value) -> Result<Value> {
        Err(QueryError::auth(format!(
            "{} client does not support signup",
            self.kind()
        )))
    }
}
