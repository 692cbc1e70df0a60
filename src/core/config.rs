//! Client configuration
//!
//! Resolves connection parameters from an explicit client, an environment file, explicit
//! arguments, or environment variables into a single shared client handle.

use super::client::ClientHandle;
use super::client_kind::ClientKind;
use super::error::{QueryError, Result};
use crate::backends::{HttpClient, WsClient};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Environment file looked up when none is given
pub const DEFAULT_ENV_FILE: &str = ".db_conf";

const ENV_FILE_KEYS: [&str; 5] = ["URL", "NAMESPACE", "DATABASE", "USERNAME", "PASSWORD"];

const ENV_URL: &str = "SURREAL_URL";
const ENV_NAMESPACE: &str = "SURREAL_NS";
const ENV_DATABASE: &str = "SURREAL_DB";
const ENV_USERNAME: &str = "SURREAL_USER";
const ENV_PASSWORD: &str = "SURREAL_PASSWORD";

/// Connection parameters for a transport client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub url: Option<String>,
    pub namespace: Option<String>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectionParams {
    /// Create a complete parameter set
    pub fn new(
        url: impl Into<String>,
        namespace: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            namespace: Some(namespace.into()),
            database: Some(database.into()),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Check that every field is present and non-empty
    pub fn is_complete(&self) -> bool {
        [
            &self.url,
            &self.namespace,
            &self.database,
            &self.username,
            &self.password,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// Parse the URL
    pub fn parsed_url(&self) -> Result<Url> {
        let url = self
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| QueryError::config("no URL given"))?;
        Url::parse(url).map_err(|e| QueryError::config(format!("invalid URL '{}': {}", url, e)))
    }

    /// Get the client kind selected by the URL scheme
    pub fn kind(&self) -> Result<ClientKind> {
        let url = self.parsed_url()?;
        ClientKind::from_scheme(url.scheme())
            .ok_or_else(|| QueryError::config(format!("unsupported URL scheme '{}'", url.scheme())))
    }

    /// Same credentials with a different namespace and database
    pub fn with_namespace(&self, namespace: &str, database: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            database: Some(database.to_string()),
            ..self.clone()
        }
    }

    /// Load parameters from an environment file
    ///
    /// Returns `None` when the file does not exist or lacks one of the required keys.
    /// Lines that do not parse are skipped.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(None);
        }

        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            match item {
                Ok((key, value)) => {
                    values.insert(key, value);
                }
                Err(e) => debug!(path = %path.display(), error = %e, "skipping env file line"),
            }
        }

        if let Some(missing) = ENV_FILE_KEYS.iter().find(|key| !values.contains_key(**key)) {
            debug!(path = %path.display(), key = missing, "environment file is incomplete");
            return Ok(None);
        }

        Ok(Some(Self {
            url: values.remove("URL"),
            namespace: values.remove("NAMESPACE"),
            database: values.remove("DATABASE"),
            username: values.remove("USERNAME"),
            password: values.remove("PASSWORD"),
        }))
    }

    /// Load parameters from `SURREAL_*` environment variables
    ///
    /// Returns `None` unless `SURREAL_URL` is set.
    pub fn from_env_vars() -> Option<Self> {
        let url = std::env::var(ENV_URL).ok()?;
        Some(Self {
            url: Some(url),
            namespace: std::env::var(ENV_NAMESPACE).ok(),
            database: std::env::var(ENV_DATABASE).ok(),
            username: std::env::var(ENV_USERNAME).ok(),
            password: std::env::var(ENV_PASSWORD).ok(),
        })
    }

    /// Construct the transport client for these parameters
    ///
    /// No network I/O happens here; socket clients connect on first use.
    pub fn open(&self) -> Result<(ClientHandle, ClientKind)> {
        let kind = self.kind()?;
        let client: ClientHandle = match kind {
            ClientKind::Http => Arc::new(HttpClient::new(self)?),
            ClientKind::Socket => Arc::new(WsClient::new(self)?),
        };
        debug!(%kind, url = self.url.as_deref().unwrap_or_default(), "client configured");
        Ok((client, kind))
    }
}

/// Resolved client configuration
///
/// Cloning shares the client handle.
#[derive(Clone, Default)]
pub struct Config {
    client: Option<ClientHandle>,
    kind: Option<ClientKind>,
}

impl Config {
    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Wrap an already constructed client
    pub fn from_client(client: ClientHandle) -> Self {
        let kind = client.kind();
        Self {
            client: Some(client),
            kind: Some(kind),
        }
    }

    /// Resolve from an environment file, falling back like [`ConfigBuilder::build`]
    pub fn from_env_file(path: impl Into<PathBuf>) -> Result<Self> {
        ConfigBuilder::new().env_file(path).build()
    }

    /// Construct a client from explicit parameters
    pub fn from_params(params: &ConnectionParams) -> Result<Self> {
        let (client, kind) = params.open()?;
        Ok(Self {
            client: Some(client),
            kind: Some(kind),
        })
    }

    /// Get the client handle, failing when none was resolved
    pub fn client(&self) -> Result<ClientHandle> {
        self.client.clone().ok_or_else(|| {
            QueryError::config(
                "no usable client was resolved from the client, env file, parameters or environment",
            )
        })
    }

    /// Get the client handle if one was resolved
    pub fn client_handle(&self) -> Option<&ClientHandle> {
        self.client.as_ref()
    }

    /// Get the kind of the resolved client
    pub fn kind(&self) -> Option<ClientKind> {
        self.kind
    }

    /// Check if a client was resolved
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client", &self.client.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Configuration builder
///
/// Sources are tried in order, first match wins:
/// 1. an explicit client,
/// 2. the environment file when it holds every required key,
/// 3. the explicit parameters when all of them are non-empty,
/// 4. an explicit `ws`/`wss` URL alone, for an unauthenticated socket client,
/// 5. the `SURREAL_*` environment variables.
pub struct ConfigBuilder {
    client: Option<ClientHandle>,
    env_file: PathBuf,
    params: ConnectionParams,
}

impl ConfigBuilder {
    /// Create a new builder reading `.db_conf` by default
    pub fn new() -> Self {
        Self {
            client: None,
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            params: ConnectionParams::default(),
        }
    }

    /// Use a pre-built client
    pub fn client(mut self, client: ClientHandle) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the environment file path
    pub fn env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = path.into();
        self
    }

    /// Set every explicit parameter at once
    pub fn params(mut self, params: ConnectionParams) -> Self {
        self.params = params;
        self
    }

    /// Set the database URL
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.params.url = Some(url.into());
        self
    }

    /// Set the namespace
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.params.namespace = Some(namespace.into());
        self
    }

    /// Set the database name
    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.params.database = Some(database.into());
        self
    }

    /// Set the username
    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.params.username = Some(username.into());
        self
    }

    /// Set the password
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.params.password = Some(password.into());
        self
    }

    /// Resolve the configuration
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Config` when the selected source has an unparsable URL or an
    /// unsupported scheme. When no source matches, a configuration without a client is
    /// returned and every later use of it fails.
    pub fn build(self) -> Result<Config> {
        if let Some(client) = self.client {
            return Ok(Config::from_client(client));
        }

        if let Some(params) = ConnectionParams::from_env_file(&self.env_file)? {
            debug!(path = %self.env_file.display(), "using environment file");
            return Config::from_params(&params);
        }

        if self.params.is_complete() {
            return Config::from_params(&self.params);
        }

        if self.params.url.is_some() && self.params.kind().ok() == Some(ClientKind::Socket) {
            return Config::from_params(&self.params);
        }

        if let Some(params) = ConnectionParams::from_env_vars() {
            debug!("using SURREAL_* environment variables");
            return Config::from_params(&params);
        }

        warn!("no database client could be resolved; queries will fail until one is provided");
        Ok(Config::default())
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_complete() {
        let params = ConnectionParams::new("http://localhost:8000", "test", "test", "root", "root");
        assert!(params.is_complete());

        let mut partial = params.clone();
        partial.password = Some(String::new());
        assert!(!partial.is_complete());

        assert!(!ConnectionParams::default().is_complete());
    }

    #[test]
    fn test_params_kind() {
        let params = ConnectionParams::new("wss://db.example.com/rpc", "ns", "db", "u", "p");
        assert_eq!(params.kind().unwrap(), ClientKind::Socket);

        let params = ConnectionParams::new("https://db.example.com", "ns", "db", "u", "p");
        assert_eq!(params.kind().unwrap(), ClientKind::Http);

        let params = ConnectionParams::new("ftp://db.example.com", "ns", "db", "u", "p");
        assert!(matches!(params.kind(), Err(QueryError::Config(_))));

        let params = ConnectionParams::new("127.0.0.1:9120", "ns", "db", "u", "p");
        assert!(matches!(params.kind(), Err(QueryError::Config(_))));
    }

    #[test]
    fn test_with_namespace_keeps_credentials() {
        let params = ConnectionParams::new("http://localhost:8000", "a", "b", "root", "secret");
        let rebound = params.with_namespace("c", "d");
        assert_eq!(rebound.namespace.as_deref(), Some("c"));
        assert_eq!(rebound.database.as_deref(), Some("d"));
        assert_eq!(rebound.username, params.username);
        assert_eq!(rebound.password, params.password);
        assert_eq!(rebound.url, params.url);
    }

    #[test]
    fn test_builder_explicit_params() {
        let config = Config::builder()
            .env_file("does-not-exist.conf")
            .url("http://localhost:8000")
            .namespace("test")
            .database("test")
            .username("root")
            .password("root")
            .build()
            .unwrap();

        assert!(config.has_client());
        assert_eq!(config.kind(), Some(ClientKind::Http));
    }

    #[test]
    fn test_builder_socket_url_only() {
        let config = Config::builder()
            .env_file("does-not-exist.conf")
            .url("ws://localhost:8000/rpc")
            .build()
            .unwrap();

        assert_eq!(config.kind(), Some(ClientKind::Socket));
    }

    #[test]
    fn test_builder_bad_scheme() {
        let result = Config::builder()
            .env_file("does-not-exist.conf")
            .params(ConnectionParams::new("gopher://x", "a", "b", "c", "d"))
            .build();
        assert!(matches!(result, Err(QueryError::Config(_))));
    }
}
