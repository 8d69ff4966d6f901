use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The one response shape every endpoint wrapper returns.
///
/// Bodies are normalized into this at the transport boundary:
/// - an object with a numeric `code` keeps its `code`, `message` and `data`;
/// - an object without `code` takes the HTTP status as its code, and if it has no
///   `data` key the whole object becomes `data` (the legacy `{token, user}` shape);
/// - anything else becomes `data` under the HTTP status.
///
/// `body_code` keeps the code the body itself carried, if any, so callers can
/// tell a business 200 from a bare HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEnvelope {
    pub code: i64,
    #[serde(skip)]
    pub body_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ServerEnvelope {
    pub fn normalize(body: Value, status: u16) -> Self {
        let status_code = i64::from(status);
        match body {
            Value::Object(mut obj) => {
                let code = obj.get("code").and_then(business_code);
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match code {
                    Some(code) => Self {
                        code,
                        body_code: Some(code),
                        message,
                        data: obj.remove("data").filter(|v| !v.is_null()),
                    },
                    None if obj.contains_key("data") => Self {
                        code: status_code,
                        body_code: None,
                        message,
                        data: obj.remove("data").filter(|v| !v.is_null()),
                    },
                    None if obj.is_empty() => Self {
                        code: status_code,
                        body_code: None,
                        message: None,
                        data: None,
                    },
                    None => Self {
                        code: status_code,
                        body_code: None,
                        message,
                        data: Some(Value::Object(obj)),
                    },
                }
            }
            Value::Null => Self {
                code: status_code,
                body_code: None,
                message: None,
                data: None,
            },
            other => Self {
                code: status_code,
                body_code: None,
                message: None,
                data: Some(other),
            },
        }
    }

    /// True only when the body itself carried `code`.
    pub fn has_body_code(&self, code: i64) -> bool {
        self.body_code == Some(code)
    }

    pub fn is_success(&self) -> bool {
        self.code == 200 || self.code == 201
    }

    /// Deserialize `data` into a typed payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).context("Failed to parse response data")
    }
}

/// Read a business code from a body field. Only integral numbers count;
/// `"401"` or `401.5` are not codes.
pub(crate) fn business_code(value: &Value) -> Option<i64> {
    let n = value.as_number()?;
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_standard_shape() {
        let env = ServerEnvelope::normalize(
            json!({ "code": 200, "message": "ok", "data": { "id": "1" } }),
            200,
        );
        assert_eq!(env.code, 200);
        assert_eq!(env.message.as_deref(), Some("ok"));
        assert_eq!(env.data, Some(json!({ "id": "1" })));
        assert!(env.is_success());
    }

    #[test]
    fn test_normalize_data_without_code() {
        let env = ServerEnvelope::normalize(json!({ "data": { "token": "t" } }), 200);
        assert_eq!(env.code, 200);
        assert_eq!(env.data, Some(json!({ "token": "t" })));
    }

    #[test]
    fn test_normalize_bare_legacy_object() {
        let env = ServerEnvelope::normalize(json!({ "token": "t", "user": { "id": "1" } }), 201);
        assert_eq!(env.code, 201);
        assert_eq!(env.data, Some(json!({ "token": "t", "user": { "id": "1" } })));
    }

    #[test]
    fn test_normalize_non_object_bodies() {
        let env = ServerEnvelope::normalize(json!([1, 2, 3]), 200);
        assert_eq!(env.data, Some(json!([1, 2, 3])));

        let env = ServerEnvelope::normalize(json!({}), 204);
        assert_eq!(env.code, 204);
        assert_eq!(env.data, None);

        let env = ServerEnvelope::normalize(Value::Null, 200);
        assert_eq!(env.data, None);
    }

    #[test]
    fn test_only_integral_numbers_are_codes() {
        assert_eq!(business_code(&json!(401)), Some(401));
        assert_eq!(business_code(&json!(200.0)), Some(200));
        assert_eq!(business_code(&json!(401.9)), None);
        assert_eq!(business_code(&json!("401")), None);

        let env = ServerEnvelope::normalize(json!({ "code": "201", "ok": true }), 200);
        assert_eq!(env.body_code, None);
        assert_eq!(env.code, 200);
    }

    #[test]
    fn test_body_code_tracks_origin() {
        let env = ServerEnvelope::normalize(json!({ "code": 200, "data": {} }), 200);
        assert!(env.has_body_code(200));

        let env = ServerEnvelope::normalize(json!({ "token": "t" }), 200);
        assert_eq!(env.code, 200);
        assert!(!env.has_body_code(200));
    }

    #[test]
    fn test_data_as() {
        #[derive(Deserialize)]
        struct Stats {
            total: u32,
        }
        let env = ServerEnvelope::normalize(json!({ "code": 200, "data": { "total": 7 } }), 200);
        let stats: Stats = env.data_as().unwrap();
        assert_eq!(stats.total, 7);
    }
}
