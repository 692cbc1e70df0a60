//! Error types for the query builder
//!
//! This module defines all error types that can occur while configuring a client,
//! building a statement, or executing it against SurrealDB.

/// Result type alias for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Error types for query operations
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// No usable client could be resolved, or the configuration is malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A statement or session operation was attempted without a client
    #[error("No client provided!")]
    NoClient,

    /// There is nothing to execute
    #[error("Query is empty")]
    EmptyQuery,

    /// The database reported a failed statement
    #[error("Query error: {detail}")]
    Query { detail: String },

    /// The response did not match a known envelope
    #[error("Unrecognized response: {0}")]
    UnrecognizedResponse(String),

    /// JSON-RPC error reply from a socket connection
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Non-success HTTP status
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Connection error (generic)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Authentication did not yield a token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[source] Box<tokio_tungstenite::tungstenite::Error>),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Unreadable environment file
    #[error("Environment file error: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for QueryError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        QueryError::WebSocket(Box::new(err))
    }
}

impl QueryError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        QueryError::Config(msg.into())
    }

    /// Create a query error carrying the server-supplied detail
    pub fn query<S: Into<String>>(detail: S) -> Self {
        QueryError::Query {
            detail: detail.into(),
        }
    }

    /// Create an unrecognized-response error
    pub fn unrecognized<S: Into<String>>(raw: S) -> Self {
        QueryError::UnrecognizedResponse(raw.into())
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        QueryError::Connection(msg.into())
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        QueryError::Auth(msg.into())
    }

    /// Create a server error from an HTTP status and body
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        QueryError::Server {
            status,
            message: message.into(),
        }
    }

    /// Whether the database itself rejected the statement
    pub fn is_query_error(&self) -> bool {
        matches!(self, QueryError::Query { .. })
    }
}
