//! Client kind definitions
//!
//! This module defines the transports a client can use, selected from the URL scheme.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported client transports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientKind {
    /// Request/response client (`http`, `https`)
    Http,
    /// Persistent socket client (`ws`, `wss`)
    Socket,
}

impl ClientKind {
    /// Convert client kind to string representation
    pub fn to_str(&self) -> &'static str {
        match self {
            ClientKind::Http => "http",
            ClientKind::Socket => "socket",
        }
    }

    /// Resolve the client kind for a URL scheme
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_lowercase().as_str() {
            "http" | "https" => Some(ClientKind::Http),
            "ws" | "wss" => Some(ClientKind::Socket),
            _ => None,
        }
    }

    /// Whether this transport keeps session state on a live connection
    ///
    /// HTTP clients carry namespace and database on every request instead.
    pub fn is_connection_oriented(&self) -> bool {
        matches!(self, ClientKind::Socket)
    }
}

impl std::fmt::Display for ClientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for ClientKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "https" => Ok(ClientKind::Http),
            "socket" | "ws" | "wss" => Ok(ClientKind::Socket),
            _ => Err(format!("Invalid client kind: '{}'", s)),
        }
    }
}
