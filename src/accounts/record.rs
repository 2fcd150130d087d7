//! User records submitted to the registration endpoint.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved field stamped by the server on every record.
pub const ID_FIELD: &str = "id";

/// Reasons a registration body is rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The body is not valid JSON at all.
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// An open mapping of caller-supplied fields plus the server-assigned `id`.
///
/// Records are echoed back to the caller and then dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserRecord {
    fields: Map<String, Value>,
}

impl UserRecord {
    /// Decode a request body, which must be a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, RecordError> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RecordError::NotAnObject(kind_of(&other))),
        }
    }

    /// Set `id`, replacing any value the caller sent.
    pub fn assign_id(&mut self, id: u64) {
        self.fields.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// The assigned identifier, if any.
    pub fn id(&self) -> Option<u64> {
        self.fields.get(ID_FIELD).and_then(Value::as_u64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Human-readable JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> String {
        // `{:#}` on a Value is serde_json's infallible pretty printer.
        format!("{:#}", Value::Object(self.fields.clone()))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_object_and_keeps_arbitrary_fields() {
        let record = UserRecord::from_slice(
            br#"{"firstName":"A","lastName":"B","accountNumber":"123","vip":true,"age":41}"#,
        )
        .unwrap();
        assert_eq!(record.get("firstName"), Some(&Value::from("A")));
        assert_eq!(record.get("vip"), Some(&Value::from(true)));
        assert_eq!(record.get("age"), Some(&Value::from(41)));
        assert_eq!(record.id(), None);
    }

    #[test]
    fn assigned_id_overwrites_caller_value() {
        let mut record = UserRecord::from_slice(br#"{"id":"mine","firstName":"A"}"#).unwrap();
        record.assign_id(7);
        assert_eq!(record.id(), Some(7));
        assert_eq!(record.get("firstName"), Some(&Value::from("A")));
    }

    #[test]
    fn rejects_json_that_is_not_an_object() {
        let cases: [(&[u8], &str); 4] = [
            (br#""hello""#, "a string"),
            (b"[1,2]", "an array"),
            (b"42", "a number"),
            (b"null", "null"),
        ];
        for (body, kind) in cases {
            match UserRecord::from_slice(body) {
                Err(RecordError::NotAnObject(got)) => assert_eq!(got, kind),
                other => panic!("expected NotAnObject for {body:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_invalid_syntax_and_empty_body() {
        assert!(matches!(
            UserRecord::from_slice(b"{firstName: A"),
            Err(RecordError::InvalidJson(_))
        ));
        assert!(matches!(
            UserRecord::from_slice(b""),
            Err(RecordError::InvalidJson(_))
        ));
    }

    #[test]
    fn pretty_json_is_indented_and_parses_back() {
        let mut record = UserRecord::from_slice(br#"{"firstName":"A"}"#).unwrap();
        record.assign_id(3);
        let text = record.to_pretty_json();
        assert!(text.contains("\n  \"firstName\": \"A\""), "not pretty: {text}");
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["id"], 3);
    }
}
