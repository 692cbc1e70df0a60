//! Response envelopes
//!
//! Every transport answers a submitted string with an array holding one envelope per
//! statement. This module parses that array and turns envelopes into results or errors.

use super::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status reported for a successful statement
pub const STATUS_OK: &str = "OK";

/// Status reported for a failed statement
pub const STATUS_ERR: &str = "ERR";

/// Per-statement response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Time the statement took, as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// `OK` or `ERR`
    pub status: String,
    /// Result payload, or the error text on newer servers
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
    /// Error text on older servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Envelope {
    /// Check if the statement succeeded
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Unwrap the envelope into its result payload
    pub fn into_result(self) -> Result<Value> {
        match self.status.as_str() {
            STATUS_OK => Ok(self.result),
            STATUS_ERR => {
                let detail = match (self.detail, self.result) {
                    (Some(detail), _) => detail,
                    (None, Value::String(message)) => message,
                    (None, Value::Null) => String::new(),
                    (None, other) => other.to_string(),
                };
                Err(QueryError::query(detail))
            }
            _ => Err(QueryError::unrecognized(
                serde_json::to_string(&self).unwrap_or_else(|_| format!("{:?}", self)),
            )),
        }
    }
}

/// Parse a raw response into its envelopes
pub fn parse_envelopes(raw: Value) -> Result<Vec<Envelope>> {
    match raw {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                let text = item.to_string();
                serde_json::from_value(item).map_err(|_| QueryError::unrecognized(text))
            })
            .collect(),
        other => Err(QueryError::unrecognized(other.to_string())),
    }
}

/// Unwrap the first envelope of a raw response
///
/// Later envelopes of a multi-statement submission are not inspected.
pub fn first_result(raw: Value) -> Result<Value> {
    let text = raw.to_string();
    parse_envelopes(raw)?
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::unrecognized(text))?
        .into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let raw = json!([{ "time": "1ms", "status": "OK", "result": [{ "id": "person:1" }] }]);
        let result = first_result(raw).unwrap();
        assert_eq!(result, json!([{ "id": "person:1" }]));
    }

    #[test]
    fn test_err_envelope_detail() {
        let raw = json!([{ "status": "ERR", "detail": "table not found" }]);
        let err = first_result(raw).unwrap_err();
        match err {
            QueryError::Query { detail } => assert_eq!(detail, "table not found"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_err_envelope_result_message() {
        let raw = json!([{ "status": "ERR", "result": "Parse error" }]);
        let err = first_result(raw).unwrap_err();
        assert_eq!(err.to_string(), "Query error: Parse error");
    }

    #[test]
    fn test_unknown_status() {
        let raw = json!([{ "status": "MAYBE", "result": 1 }]);
        let err = first_result(raw).unwrap_err();
        match err {
            QueryError::UnrecognizedResponse(text) => assert!(text.contains("MAYBE")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(matches!(
            first_result(json!({ "status": "OK" })),
            Err(QueryError::UnrecognizedResponse(_))
        ));
        assert!(matches!(
            first_result(json!([])),
            Err(QueryError::UnrecognizedResponse(_))
        ));
        assert!(matches!(
            first_result(json!([{ "result": 1 }])),
            Err(QueryError::UnrecognizedResponse(_))
        ));
    }

    #[test]
    fn test_only_first_envelope_is_unwrapped() {
        let raw = json!([
            { "status": "OK", "result": [] },
            { "status": "ERR", "detail": "ignored" }
        ]);
        assert_eq!(first_result(raw).unwrap(), json!([]));
    }
}
