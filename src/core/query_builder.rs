//! Fluent SurrealQL query builder
//!
//! Clause methods append a keyword and a rendered argument to a pending statement;
//! [`Query::execute`] finalizes the statement, submits it and unwraps the response.

use super::client::ClientHandle;
use super::config::Config;
use super::error::{QueryError, Result};
use super::response::{self, Envelope};
use super::value::{QueryArg, Quoting};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Statement terminator
pub const TERMINATOR: char = ';';

/// Query builder bound to a client
///
/// # Example
///
/// ```
/// use surreal_query::Query;
///
/// let mut query = Query::default();
/// query.select(["name", "founded"]).from("company");
/// assert_eq!(query.finalized(), "SELECT name, founded FROM company;");
/// ```
#[derive(Clone, Default)]
pub struct Query {
    query: String,
    last_query: String,
    client: Option<ClientHandle>,
    warnings: Vec<String>,
}

impl Query {
    /// Create a query using the client resolved by `config`
    pub fn new(config: &Config) -> Self {
        Self {
            client: config.client_handle().cloned(),
            ..Self::default()
        }
    }

    /// Create a query bound to a client handle
    pub fn with_client(client: ClientHandle) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    /// Get the client handle, if any
    pub fn client(&self) -> Option<&ClientHandle> {
        self.client.as_ref()
    }

    /// Get the pending statement as accumulated so far
    pub fn pending(&self) -> &str {
        &self.query
    }

    /// Get the last statement that executed successfully
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Get the warnings raised while building
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get the pending statement as it would be submitted, without modifying it
    pub fn finalized(&self) -> String {
        let trimmed = self.query.trim();
        if trimmed.is_empty() || trimmed.ends_with(TERMINATOR) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, TERMINATOR)
        }
    }

    /// Get the pending statement without its terminator, for nesting
    pub fn statement(&self) -> &str {
        self.query.trim().trim_end_matches(TERMINATOR).trim_end()
    }

    fn clause(&mut self, keyword: &str, args: QueryArg, quoting: Quoting) -> &mut Self {
        self.query.push(' ');
        self.query.push_str(keyword);
        self.query.push(' ');
        self.query.push_str(&args.render(quoting));
        self
    }

    fn skip(&mut self, keyword: &str) -> &mut Self {
        let message = format!(
            "No arguments for {keyword} statement. {keyword} statement not added to the query."
        );
        warn!("{}", message);
        self.warnings.push(message);
        self
    }

    /// Append verbatim SurrealQL
    pub fn custom(&mut self, text: &str) -> &mut Self {
        self.query.push(' ');
        self.query.push_str(text);
        self
    }

    /// SELECT statement
    ///
    /// Starts a new statement, discarding anything pending. An empty argument selects `*`.
    pub fn select(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        let args = args.into();
        self.query.clear();
        if args.is_empty() {
            self.clause("SELECT", QueryArg::raw("*"), Quoting::Unquoted)
        } else {
            self.clause("SELECT", args, Quoting::Unquoted)
        }
    }

    /// FROM clause
    pub fn from(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("FROM", args.into(), Quoting::Unquoted)
    }

    /// WHERE clause, skipped with a warning when `args` is empty
    pub fn where_(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        let args = args.into();
        if args.is_empty() {
            return self.skip("WHERE");
        }
        self.clause("WHERE", args, Quoting::Unquoted)
    }

    /// USE statement
    pub fn use_(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("USE", args.into(), Quoting::Unquoted)
    }

    /// RETURN clause, skipped with a warning when `args` is empty
    pub fn return_(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        let args = args.into();
        if args.is_empty() {
            return self.skip("RETURN");
        }
        self.clause("RETURN", args, Quoting::Unquoted)
    }

    /// INSERT statement
    ///
    /// `target` is a table name, optionally followed by a column list. A tuple or scalar
    /// payload is emitted as `VALUES (...)`; a map, list or subquery is emitted as is.
    /// An empty payload emits the target alone.
    pub fn insert(
        &mut self,
        target: impl Into<QueryArg>,
        values: impl Into<QueryArg>,
    ) -> &mut Self {
        let values = values.into();
        self.query.push_str(" INSERT INTO ");
        self.query.push_str(&target.into().render(Quoting::Unquoted));
        self.query.push(' ');

        if values.is_empty() {
            return self;
        }
        match values {
            QueryArg::Tuple(_) => self.clause("VALUES", values, Quoting::Quoted),
            scalar if scalar.is_scalar() => {
                self.clause("VALUES", QueryArg::Tuple(vec![scalar]), Quoting::Quoted)
            }
            payload => {
                self.query.push_str(&payload.render(Quoting::Quoted));
                self
            }
        }
    }

    /// DELETE statement
    pub fn delete(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("DELETE", args.into(), Quoting::Unquoted)
    }

    /// UPDATE statement
    pub fn update(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("UPDATE", args.into(), Quoting::Unquoted)
    }

    /// CREATE statement
    pub fn create(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("CREATE", args.into(), Quoting::Unquoted)
    }

    /// SET clause
    pub fn set(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("SET", args.into(), Quoting::Unquoted)
    }

    /// MERGE clause
    pub fn merge(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("MERGE", args.into(), Quoting::Quoted)
    }

    /// RELATE statement: `RELATE node1->edge->node2`
    pub fn relate(&mut self, node1: &str, edge: &str, node2: &str) -> &mut Self {
        self.query
            .push_str(&format!(" RELATE {}->{}->{}", node1, edge, node2));
        self
    }

    /// RELATE statement with a CONTENT payload, omitted when empty
    pub fn relate_content(
        &mut self,
        node1: &str,
        edge: &str,
        node2: &str,
        content: impl Into<QueryArg>,
    ) -> &mut Self {
        let content = content.into();
        self.relate(node1, edge, node2);
        if content.is_empty() {
            return self;
        }
        self.clause("CONTENT", content, Quoting::Quoted)
    }

    /// CONTENT clause
    pub fn content(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("CONTENT", args.into(), Quoting::Quoted)
    }

    /// DEFINE statement
    pub fn define(&mut self, args: impl Into<QueryArg>) -> &mut Self {
        self.clause("DEFINE", args.into(), Quoting::Unquoted)
    }

    fn finalize(&mut self) -> Result<()> {
        let finalized = self.finalized();
        if finalized.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        self.query = finalized;
        Ok(())
    }

    async fn submit(&mut self) -> Result<Value> {
        let client = self.client.clone().ok_or(QueryError::NoClient)?;
        self.finalize()?;
        ensure_connected(&client).await?;
        debug!(statement = %self.query, "executing query");
        client.query(&self.query).await
    }

    fn complete(&mut self) {
        self.last_query = std::mem::take(&mut self.query);
    }

    /// Execute the pending statement and return the first statement's result
    ///
    /// # Errors
    ///
    /// - `QueryError::NoClient` before any I/O when no client is bound
    /// - `QueryError::EmptyQuery` when nothing is pending
    /// - `QueryError::Query` with the server's detail when the first statement failed
    /// - `QueryError::UnrecognizedResponse` when the response has an unknown shape
    ///
    /// On error the pending statement stays in its finalized form.
    pub async fn execute(&mut self) -> Result<Value> {
        let raw = self.submit().await?;
        let result = response::first_result(raw)?;
        self.complete();
        Ok(result)
    }

    /// Execute the pending statement and return every statement's envelope
    pub async fn execute_all(&mut self) -> Result<Vec<Envelope>> {
        let raw = self.submit().await?;
        let envelopes = response::parse_envelopes(raw)?;
        self.complete();
        Ok(envelopes)
    }

    /// Switch namespace and database for this query's client
    ///
    /// Socket clients switch the live session. HTTP clients are replaced by a client
    /// with the same credentials; other queries sharing the old handle are unaffected.
    pub async fn use_ns(&mut self, namespace: &str, database: &str) -> Result<()> {
        let client = self.client.clone().ok_or(QueryError::NoClient)?;
        ensure_connected(&client).await?;
        if let Some(replacement) = client.use_ns(namespace, database).await? {
            debug!(namespace, database, "replaced client handle");
            self.client = Some(replacement);
        }
        Ok(())
    }

    /// Sign in and return the token
    ///
    /// `extra` is merged into the `{user, pass}` payload (namespace, database, scope...).
    pub async fn signin(
        &self,
        username: &str,
        password: &str,
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let client = self.client.clone().ok_or(QueryError::NoClient)?;
        ensure_connected(&client).await?;
        client.signin(credentials(username, password, extra)).await
    }

    /// Sign up and return the token
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let client = self.client.clone().ok_or(QueryError::NoClient)?;
        ensure_connected(&client).await?;
        client.signup(credentials(username, password, extra)).await
    }
}

async fn ensure_connected(client: &ClientHandle) -> Result<()> {
    if !client.is_connected() {
        client.connect().await?;
    }
    Ok(())
}

fn credentials(username: &str, password: &str, extra: Map<String, Value>) -> Value {
    let mut payload = Map::new();
    payload.insert("user".to_string(), Value::from(username));
    payload.insert("pass".to_string(), Value::from(password));
    payload.extend(extra);
    Value::Object(payload)
}

impl From<&Query> for QueryArg {
    fn from(query: &Query) -> Self {
        QueryArg::Subquery(query.statement().to_string())
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.finalized())
    }
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("query", &self.query)
            .field("last_query", &self.last_query)
            .field("client", &self.client.as_ref().map(|c| c.kind()))
            .field("warnings", &self.warnings)
            .finish()
    }
}
