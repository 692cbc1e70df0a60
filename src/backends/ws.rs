//! WebSocket client backend
//!
//! Persistent-socket transport speaking SurrealDB's JSON-RPC protocol. The connection is
//! opened lazily on first use; round trips are serialized over a single stream.

use crate::core::{
    client::{Client, ClientHandle},
    client_kind::ClientKind,
    config::ConnectionParams,
    error::{QueryError, Result},
};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Namespace, database and token of the live session
#[derive(Debug, Clone, Default)]
struct Session {
    namespace: Option<String>,
    database: Option<String>,
    token: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    result: Value,
    error: Option<RpcFault>,
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    code: i64,
    message: String,
}

/// WebSocket client for the SurrealDB RPC endpoint
pub struct WsClient {
    endpoint: Url,
    params: ConnectionParams,
    stream: Mutex<Option<WsStream>>,
    connected: AtomicBool,
    next_id: AtomicU64,
    session: parking_lot::Mutex<Session>,
}

impl WsClient {
    /// Create a new WebSocket client
    ///
    /// Nothing is sent until the first operation. `/rpc` is appended to the URL path if
    /// it is not already there.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Config` if the URL is missing or not `ws`/`wss`.
    pub fn new(params: &ConnectionParams) -> Result<Self> {
        if params.kind()? != ClientKind::Socket {
            return Err(QueryError::config("socket client requires a ws or wss URL"));
        }

        let mut endpoint = params.parsed_url()?;
        let path = endpoint.path().trim_end_matches('/').to_string();
        if !path.ends_with("/rpc") {
            endpoint.set_path(&format!("{}/rpc", path));
        }

        Ok(Self {
            endpoint,
            params: params.clone(),
            stream: Mutex::new(None),
            connected: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            session: parking_lot::Mutex::new(Session {
                namespace: params.namespace.clone(),
                database: params.database.clone(),
                token: None,
            }),
        })
    }

    /// Get the RPC endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the namespace and database the session is bound to
    pub fn namespace(&self) -> (Option<String>, Option<String>) {
        let session = self.session.lock();
        (session.namespace.clone(), session.database.clone())
    }

    /// Get the token from the last successful signin or signup
    pub fn token(&self) -> Option<Value> {
        self.session.lock().token.clone()
    }

    /// Close the connection
    pub async fn disconnect(&self) -> Result<()> {
        let mut guard = self.stream.lock().await;
        self.connected.store(false, Ordering::SeqCst);
        if let Some(mut stream) = guard.take() {
            debug!(endpoint = %self.endpoint, "closing socket");
            stream.close(None).await?;
        }
        Ok(())
    }

    async fn round_trip(&self, stream: &mut WsStream, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let request = json!({ "id": id, "method": method, "params": params });
        stream.send(Message::text(request.to_string())).await?;

        while let Some(message) = stream.next().await {
            let text = match message? {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            let reply: RpcReply = serde_json::from_str(&text)?;
            if reply.id.as_str() != Some(id.as_str()) {
                continue;
            }
            return match reply.error {
                Some(fault) => Err(QueryError::Rpc {
                    code: fault.code,
                    message: fault.message,
                }),
                None => Ok(reply.result),
            };
        }

        Err(QueryError::connection("socket closed before a reply arrived"))
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let mut guard = self.stream.lock().await;
        let stream = guard
            .as_mut()
            .ok_or_else(|| QueryError::connection("not connected"))?;

        let result = self.round_trip(stream, method, params).await;
        if let Err(QueryError::WebSocket(_) | QueryError::Connection(_)) = &result {
            *guard = None;
            self.connected.store(false, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl Client for WsClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Socket
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        let mut guard = self.stream.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        debug!(endpoint = %self.endpoint, "opening socket");
        let (mut stream, _) = connect_async(self.endpoint.as_str()).await?;

        if let (Some(user), Some(pass)) = (&self.params.username, &self.params.password) {
            let token = self
                .round_trip(&mut stream, "signin", json!([{ "user": user, "pass": pass }]))
                .await?;
            self.session.lock().token = Some(token);
        }

        let (namespace, database) = self.namespace();
        if let (Some(namespace), Some(database)) = (namespace, database) {
            self.round_trip(&mut stream, "use", json!([namespace, database]))
                .await?;
        }

        *guard = Some(stream);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&self, statement: &str) -> Result<Value> {
        debug!(endpoint = %self.endpoint, "rpc query");
        self.call("query", json!([statement])).await
    }

    async fn use_ns(&self, namespace: &str, database: &str) -> Result<Option<ClientHandle>> {
        self.call("use", json!([namespace, database])).await?;
        let mut session = self.session.lock();
        session.namespace = Some(namespace.to_string());
        session.database = Some(database.to_string());
        Ok(None)
    }

    async fn signin(&self, credentials: Value) -> Result<Value> {
        let token = self.call("signin", json!([credentials])).await?;
        self.session.lock().token = Some(token.clone());
        Ok(token)
    }

    async fn signup(&self, credentials: Value) -> Result<Value> {
        let token = self.call("signup", json!([credentials])).await?;
        self.session.lock().token = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_gets_rpc_suffix() {
        let params = ConnectionParams::new("ws://localhost:8000", "ns", "db", "root", "root");
        let client = WsClient::new(&params).unwrap();
        assert_eq!(client.endpoint().as_str(), "ws://localhost:8000/rpc");

        let params = ConnectionParams::new("wss://example.com/rpc", "ns", "db", "root", "root");
        let client = WsClient::new(&params).unwrap();
        assert_eq!(client.endpoint().as_str(), "wss://example.com/rpc");
    }

    #[test]
    fn test_not_connected_until_used() {
        let params = ConnectionParams::new("ws://localhost:8000", "ns", "db", "root", "root");
        let client = WsClient::new(&params).unwrap();
        assert!(!client.is_connected());
        assert_eq!(
            client.namespace(),
            (Some("ns".to_string()), Some("db".to_string()))
        );
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_call_without_connection() {
        let params = ConnectionParams::new("ws://localhost:8000", "ns", "db", "root", "root");
        let client = WsClient::new(&params).unwrap();
        let err = client.query("INFO FOR DB;").await.unwrap_err();
        assert!(matches!(err, QueryError::Connection(_)));
    }

    #[test]
    fn test_rejects_http_url() {
        let params = ConnectionParams::new("http://localhost:8000", "ns", "db", "root", "root");
        assert!(matches!(WsClient::new(&params), Err(QueryError::Config(_))));
    }
}
