//! HTTP client backend
//!
//! Request/response transport. Namespace, database and credentials travel with every
//! request, so switching namespace means building a new client.

use crate::core::{
    client::{Client, ClientHandle},
    client_kind::ClientKind,
    config::ConnectionParams,
    error::{QueryError, Result},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::RequestBuilder;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// HTTP client for the SurrealDB REST endpoints
#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    params: ConnectionParams,
    http: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Config` if the URL is missing or not `http`/`https`.
    pub fn new(params: &ConnectionParams) -> Result<Self> {
        if params.kind()? != ClientKind::Http {
            return Err(QueryError::config(
                "HTTP client requires an http or https URL",
            ));
        }

        let mut base = params.parsed_url()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base,
            params: params.clone(),
            http,
        })
    }

    /// Get the connection parameters this client sends
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Resolve an endpoint below the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Same credentials, different namespace and database
    pub fn rebind(&self, namespace: &str, database: &str) -> Self {
        Self {
            base: self.base.clone(),
            params: self.params.with_namespace(namespace, database),
            http: self.http.clone(),
        }
    }

    fn with_session(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(namespace) = &self.params.namespace {
            request = request.header("NS", namespace);
        }
        if let Some(database) = &self.params.database {
            request = request.header("DB", database);
        }
        if let Some(username) = &self.params.username {
            request = request.basic_auth(username, self.params.password.as_ref());
        }
        request
    }

    async fn send(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(QueryError::server(status.as_u16(), body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn authenticate(&self, path: &str, credentials: Value) -> Result<Value> {
        let request = self.http.post(self.endpoint(path)?).json(&credentials);
        let body = match Self::send(request).await {
            Err(QueryError::Server { status, message }) => {
                return Err(QueryError::auth(format!("{} failed ({}): {}", path, status, message)))
            }
            other => other?,
        };
        Ok(body.get("token").cloned().unwrap_or(body))
    }
}

#[async_trait]
impl Client for HttpClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Http
    }

    async fn query(&self, statement: &str) -> Result<Value> {
        debug!(url = %self.base, "POST /sql");
        let request = self
            .with_session(self.http.post(self.endpoint("sql")?))
            .body(statement.to_string());
        Self::send(request).await
    }

    async fn use_ns(&self, namespace: &str, database: &str) -> Result<Option<ClientHandle>> {
        Ok(Some(Arc::new(self.rebind(namespace, database))))
    }

    async fn signin(&self, credentials: Value) -> Result<Value> {
        self.authenticate("signin", credentials).await
    }

    async fn signup(&self, credentials: Value) -> Result<Value> {
        self.authenticate("signup", credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(url: &str) -> ConnectionParams {
        ConnectionParams::new(url, "test", "test", "root", "root")
    }

    #[test]
    fn test_endpoints() {
        let client = HttpClient::new(&params("http://localhost:8000")).unwrap();
        assert_eq!(
            client.endpoint("sql").unwrap().as_str(),
            "http://localhost:8000/sql"
        );

        let client = HttpClient::new(&params("https://example.com/surreal")).unwrap();
        assert_eq!(
            client.endpoint("signin").unwrap().as_str(),
            "https://example.com/surreal/signin"
        );
    }

    #[test]
    fn test_rejects_socket_url() {
        let result = HttpClient::new(&params("ws://localhost:8000"));
        assert!(matches!(result, Err(QueryError::Config(_))));
    }

    #[tokio::test]
    async fn test_use_ns_returns_rebound_client() {
        let client = HttpClient::new(&params("http://localhost:8000")).unwrap();
        assert!(client.is_connected());

        let replacement = client.use_ns("other", "db2").await.unwrap();
        assert!(replacement.is_some());

        let rebound = client.rebind("other", "db2");
        assert_eq!(rebound.params().namespace.as_deref(), Some("other"));
        assert_eq!(rebound.params().database.as_deref(), Some("db2"));
        assert_eq!(rebound.params().username.as_deref(), Some("root"));
    }
}
