//! # Surreal Query
//!
//! A fluent SurrealQL query builder. Statements are assembled through method chaining,
//! then sent to SurrealDB over HTTP or a persistent WebSocket connection.
//!
//! ## Features
//!
//! - **Fluent Builder**: `SELECT`, `INSERT`, `CREATE`, `UPDATE`, `DELETE`, `RELATE`, `DEFINE`, `USE`
//! - **Typed Arguments**: Strings, lists, maps, tuples, numbers and nested queries as one enum
//! - **Two Transports**: HTTP (`http`/`https`) and WebSocket RPC (`ws`/`wss`), picked by URL scheme
//! - **Flexible Configuration**: Explicit client, `.db_conf` file, explicit parameters, or `SURREAL_*` variables
//! - **Async Support**: Async/await support with Tokio
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! surreal_query = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ### Basic Usage
//!
//! ```rust,no_run
//! use surreal_query::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::builder()
//!         .url("ws://localhost:8000/rpc")
//!         .namespace("test")
//!         .database("test")
//!         .username("root")
//!         .password("root")
//!         .build()?;
//!
//!     // Create a record
//!     let mut query = Query::new(&config);
//!     query.create("person").content(QueryArg::map([
//!         ("name", QueryArg::from("Tobie")),
//!         ("skills", QueryArg::from(vec!["Rust", "Go"])),
//!     ]));
//!     query.execute().await?;
//!
//!     // Read it back
//!     let people = query.select(vec!["name", "skills"]).from("person").execute().await?;
//!     println!("{}", people);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Project Structure
//!
//! ```text
//! surreal_query/
//! ├── src/
//! │   ├── core/              # Core types and traits
//! │   │   ├── client.rs      # Client trait
//! │   │   ├── client_kind.rs # Transport enum
//! │   │   ├── config.rs      # Client resolution
//! │   │   ├── error.rs       # Error types
//! │   │   ├── query_builder.rs # Fluent builder
//! │   │   ├── response.rs    # Response envelopes
//! │   │   ├── value.rs       # Argument types
//! │   │   └── mod.rs
//! │   ├── backends/          # Transport implementations
//! │   │   ├── http.rs
//! │   │   ├── ws.rs
//! │   │   └── mod.rs
//! │   └── lib.rs
//! ├── demos/                 # Example programs
//! ├── tests/                 # Integration tests
//! └── Cargo.toml
//! ```

/// Core query builder types and traits
pub mod core;

/// Client backend implementations
pub mod backends;

/// Prelude for convenient imports
///
/// ```rust
/// use surreal_query::prelude::*;
///
/// let mut query = Query::default();
/// query.select("*").from("person");
/// assert_eq!(query.to_string(), "SELECT * FROM person;");
/// ```
pub mod prelude {
    pub use crate::backends::{HttpClient, WsClient};
    pub use crate::core::{
        Client, ClientHandle, ClientKind, Config, ConfigBuilder, ConnectionParams, Envelope,
        Query, QueryArg, QueryError, Quoting, Result,
    };
}

// Re-export at root level for convenience
pub use crate::backends::{HttpClient, WsClient};
pub use crate::core::{
    Client, ClientHandle, ClientKind, Config, ConfigBuilder, ConnectionParams, Envelope, Query,
    QueryArg, QueryError, Quoting, Result,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let kind = ClientKind::Socket;
        assert_eq!(kind.to_str(), "socket");
        assert!(kind.is_connection_oriented());
    }

    #[test]
    fn test_value_conversions() {
        use prelude::*;

        let val: QueryArg = 42.into();
        assert_eq!(val.render(Quoting::Quoted), "42");

        let val: QueryArg = "test".into();
        assert_eq!(val.render(Quoting::Quoted), "'test'");

        let val: QueryArg = true.into();
        assert_eq!(val, QueryArg::Bool(true));
    }
}
