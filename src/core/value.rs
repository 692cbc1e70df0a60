//! Query argument types
//!
//! This module defines the values a clause method accepts and how each one is rendered
//! as a SurrealQL literal.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;

/// How strings are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Strings become single-quoted literals
    Quoted,
    /// Strings are emitted verbatim (identifiers, expressions)
    Unquoted,
}

/// Argument to a clause method
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    /// Absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String, quoted depending on the clause
    Str(String),
    /// Text that is never quoted
    Raw(String),
    /// Text that is always quoted
    Literal(String),
    /// Timestamp, rendered as a quoted RFC 3339 string
    Datetime(DateTime<Utc>),
    /// Ordered sequence
    List(Vec<QueryArg>),
    /// Fixed-size tuple
    Tuple(Vec<QueryArg>),
    /// Mapping with insertion order preserved
    Map(IndexMap<String, QueryArg>),
    /// Nested statement, without its terminator
    Subquery(String),
}

impl QueryArg {
    /// Build a list argument
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryArg>,
    {
        QueryArg::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple argument
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryArg>,
    {
        QueryArg::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a map argument, keeping the iteration order
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryArg>,
    {
        QueryArg::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a raw argument
    pub fn raw(text: impl Into<String>) -> Self {
        QueryArg::Raw(text.into())
    }

    /// Build an always-quoted string argument
    pub fn literal(text: impl Into<String>) -> Self {
        QueryArg::Literal(text.into())
    }

    /// Whether the argument carries nothing worth emitting
    pub fn is_empty(&self) -> bool {
        match self {
            QueryArg::Null => true,
            QueryArg::Str(s) | QueryArg::Raw(s) | QueryArg::Subquery(s) => s.is_empty(),
            QueryArg::List(items) | QueryArg::Tuple(items) => items.is_empty(),
            QueryArg::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Whether the argument is a single value rather than a collection
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            QueryArg::List(_) | QueryArg::Tuple(_) | QueryArg::Map(_) | QueryArg::Subquery(_)
        )
    }

    /// Get the type name of this argument
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryArg::Null => "null",
            QueryArg::Bool(_) => "bool",
            QueryArg::Int(_) => "int",
            QueryArg::Float(_) => "float",
            QueryArg::Str(_) => "string",
            QueryArg::Raw(_) => "raw",
            QueryArg::Literal(_) => "literal",
            QueryArg::Datetime(_) => "datetime",
            QueryArg::List(_) => "list",
            QueryArg::Tuple(_) => "tuple",
            QueryArg::Map(_) => "map",
            QueryArg::Subquery(_) => "subquery",
        }
    }

    /// Render the argument as SurrealQL
    ///
    /// A quoted string that contains a colon is left bare so record ids such as
    /// `person:tobie` keep working; use [`QueryArg::Literal`] to force quotes.
    pub fn render(&self, quoting: Quoting) -> String {
        match self {
            QueryArg::Null => "NULL".to_string(),
            QueryArg::Bool(v) => v.to_string(),
            QueryArg::Int(v) => v.to_string(),
            QueryArg::Float(v) if v.is_nan() => "math::nan".to_string(),
            QueryArg::Float(v) if v.is_infinite() => {
                if v.is_sign_positive() {
                    "math::inf".to_string()
                } else {
                    "-math::inf".to_string()
                }
            }
            QueryArg::Float(v) => format!("{v:?}"),
            QueryArg::Str(s) => match quoting {
                Quoting::Quoted if !s.contains(':') => quote(s),
                _ => s.clone(),
            },
            QueryArg::Raw(s) => s.clone(),
            QueryArg::Literal(s) => quote(s),
            QueryArg::Datetime(dt) => quote(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            QueryArg::List(items) => match quoting {
                Quoting::Quoted => format!("[{}]", join(items, Quoting::Quoted)),
                Quoting::Unquoted => join(items, Quoting::Unquoted),
            },
            QueryArg::Tuple(items) => format!("({})", join(items, Quoting::Quoted)),
            QueryArg::Map(entries) => {
                let fields: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value.render(Quoting::Quoted)))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            QueryArg::Subquery(statement) => format!("({})", statement),
        }
    }
}

fn join(items: &[QueryArg], quoting: Quoting) -> String {
    items
        .iter()
        .map(|item| item.render(quoting))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl From<bool> for QueryArg {
    fn from(v: bool) -> Self {
        QueryArg::Bool(v)
    }
}

impl From<i32> for QueryArg {
    fn from(v: i32) -> Self {
        QueryArg::Int(v.into())
    }
}

impl From<u32> for QueryArg {
    fn from(v: u32) -> Self {
        QueryArg::Int(v.into())
    }
}

impl From<i64> for QueryArg {
    fn from(v: i64) -> Self {
        QueryArg::Int(v)
    }
}

impl From<f32> for QueryArg {
    fn from(v: f32) -> Self {
        QueryArg::Float(v.into())
    }
}

impl From<f64> for QueryArg {
    fn from(v: f64) -> Self {
        QueryArg::Float(v)
    }
}

impl From<String> for QueryArg {
    fn from(v: String) -> Self {
        QueryArg::Str(v)
    }
}

impl From<&String> for QueryArg {
    fn from(v: &String) -> Self {
        QueryArg::Str(v.clone())
    }
}

impl From<&str> for QueryArg {
    fn from(v: &str) -> Self {
        QueryArg::Str(v.to_string())
    }
}

impl From<DateTime<Utc>> for QueryArg {
    fn from(v: DateTime<Utc>) -> Self {
        QueryArg::Datetime(v)
    }
}

impl<T: Into<QueryArg>> From<Option<T>> for QueryArg {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => QueryArg::Null,
        }
    }
}

impl<T: Into<QueryArg>> From<Vec<T>> for QueryArg {
    fn from(v: Vec<T>) -> Self {
        QueryArg::list(v)
    }
}

impl<T: Into<QueryArg>, const N: usize> From<[T; N]> for QueryArg {
    fn from(v: [T; N]) -> Self {
        QueryArg::list(v)
    }
}

impl<K: Into<String>, V: Into<QueryArg>> From<IndexMap<K, V>> for QueryArg {
    fn from(v: IndexMap<K, V>) -> Self {
        QueryArg::map(v)
    }
}

macro_rules! impl_from_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Into<QueryArg>),+> From<($($ty,)+)> for QueryArg {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                QueryArg::Tuple(vec![$($var.into()),+])
            }
        }
    };
}

impl_from_tuple!(A a, B b);
impl_from_tuple!(A a, B b, C c);
impl_from_tuple!(A a, B b, C c, D d);
impl_from_tuple!(A a, B b, C c, D d, E e);

impl From<Value> for QueryArg {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => QueryArg::Null,
            Value::Bool(b) => QueryArg::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => QueryArg::Int(i),
                None => QueryArg::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => QueryArg::Str(s),
            Value::Array(items) => QueryArg::list(items),
            Value::Object(entries) => QueryArg::map(entries),
        }
    }
}
