//! Turns a raw response into a body or a classified `ApiError`, applying the
//! session side effects (silent refresh, teardown and redirect) on the way.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::access::{CredentialAccessor, Navigator};
use super::error::{ApiError, SESSION_EXPIRED_MESSAGE};
use super::url::login_redirect;
use crate::config::ClientConfig;
use crate::models::envelope::business_code;

pub(crate) struct ResponseClassifier<'a> {
    pub credentials: &'a dyn CredentialAccessor,
    pub navigator: &'a dyn Navigator,
    pub config: &'a ClientConfig,
}

impl ResponseClassifier<'_> {
    /// Apply a replacement token from the refresh header, if the response carries one.
    pub fn apply_refresh_header(&self, headers: &HeaderMap) -> bool {
        let new_token = headers
            .get(self.config.refresh_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match new_token {
            Some(token) => {
                self.credentials.apply_refreshed_token(token);
                info!("Token silently refreshed from response header");
                true
            }
            None => false,
        }
    }

    pub fn classify(
        &self,
        status: StatusCode,
        headers: &HeaderMap,
        body: &str,
    ) -> Result<Value, ApiError> {
        // Runs before any error handling: failed responses may still carry a new token
        self.apply_refresh_header(headers);

        let parsed: Value = serde_json::from_str(body).unwrap_or_else(|_| {
            if !body.trim().is_empty() {
                debug!(body = %ApiError::truncate_body(body), "Response body is not JSON");
            }
            Value::Object(Map::new())
        });

        let code = parsed.get("code").and_then(business_code);
        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        if status == StatusCode::UNAUTHORIZED || code == Some(401) {
            self.end_session();
            return Err(ApiError::Unauthorized(
                message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ));
        }

        if let Some(code) = code {
            if code != 200 && code != 201 {
                return Err(ApiError::Business {
                    code,
                    message: message
                        .unwrap_or_else(|| format!("Request failed with code {}", code)),
                });
            }
        }

        if !status.is_success() {
            let fallback = parsed
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: message
                    .or(fallback)
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
            });
        }

        Ok(parsed)
    }

    /// Tear down the session and send the user to the login page.
    fn end_session(&self) {
        self.credentials.invalidate();

        let current = self.navigator.current_path();
        if current == self.config.login_path || current == self.config.register_path {
            return;
        }

        warn!(path = %current, "Session expired, redirecting to login");
        self.credentials.set_login_message(SESSION_EXPIRED_MESSAGE);
        self.navigator
            .navigate(&login_redirect(&self.config.login_path, &current));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;
    use crate::api::TrackingNavigator;
    use crate::auth::storage::{KeyValueStore, LOGIN_MESSAGE_KEY, TOKEN_KEY};
    use crate::auth::{CredentialStore, MemoryStore};

    struct Fixture {
        session: Arc<MemoryStore>,
        store: CredentialStore,
        navigator: TrackingNavigator,
        config: ClientConfig,
    }

    fn fixture(path: &str) -> Fixture {
        let session = Arc::new(MemoryStore::new());
        let store = CredentialStore::init(Arc::new(MemoryStore::new()), session.clone()).unwrap();
        store.set_token("abc", false).unwrap();
        Fixture {
            session,
            store,
            navigator: TrackingNavigator::new(path),
            config: ClientConfig::default(),
        }
    }

    impl Fixture {
        fn classify(&self, status: u16, headers: HeaderMap, body: &str) -> Result<Value, ApiError> {
            ResponseClassifier {
                credentials: &self.store,
                navigator: &self.navigator,
                config: &self.config,
            }
            .classify(StatusCode::from_u16(status).unwrap(), &headers, body)
        }
    }

    fn refresh_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-new-token", HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_success_returns_body() {
        let f = fixture("/admin");
        let body = f
            .classify(200, HeaderMap::new(), r#"{"code":200,"data":{"id":"1"}}"#)
            .unwrap();
        assert_eq!(body["data"]["id"], json!("1"));
    }

    #[test]
    fn test_created_code_is_success() {
        let f = fixture("/admin");
        assert!(f.classify(200, HeaderMap::new(), r#"{"code":201}"#).is_ok());
    }

    #[test]
    fn test_business_code_401_tears_down_session() {
        let f = fixture("/admin/clothing");
        let err = f
            .classify(200, HeaderMap::new(), r#"{"code":401,"message":"Token invalid"}"#)
            .unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Token invalid"));
        assert!(!f.store.is_logged_in());
        assert_eq!(f.session.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(f.navigator.current_path(), "/login");
        assert_eq!(
            f.session.get(LOGIN_MESSAGE_KEY).unwrap().as_deref(),
            Some(SESSION_EXPIRED_MESSAGE)
        );
    }

    #[test]
    fn test_http_401_uses_default_message() {
        let f = fixture("/");
        let err = f.classify(401, HeaderMap::new(), "Unauthorized").unwrap_err();
        assert_eq!(err.to_string(), SESSION_EXPIRED_MESSAGE);
        assert!(!f.store.is_logged_in());
    }

    #[test]
    fn test_401_on_login_page_does_not_redirect() {
        let f = fixture("/login");
        let err = f
            .classify(401, HeaderMap::new(), r#"{"message":"Wrong password"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Wrong password");
        assert_eq!(f.navigator.current_path(), "/login");
        assert_eq!(f.session.get(LOGIN_MESSAGE_KEY).unwrap(), None);
        assert!(!f.store.is_logged_in());
    }

    #[test]
    fn test_business_error_keeps_session() {
        let f = fixture("/admin");
        let err = f.classify(200, HeaderMap::new(), r#"{"code":400}"#).unwrap_err();
        assert!(matches!(err, ApiError::Business { code: 400, .. }));
        assert_eq!(err.to_string(), "Request failed with code 400");
        assert!(f.store.is_logged_in());
    }

    #[test]
    fn test_http_error_message_extraction() {
        let f = fixture("/admin");
        let err = f
            .classify(500, HeaderMap::new(), r#"{"error":"Database down"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Database down");

        let err = f.classify(502, HeaderMap::new(), "<html>Bad gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 502, .. }));
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }

    #[test]
    fn test_malformed_body_is_empty_object_on_success() {
        let f = fixture("/admin");
        let body = f.classify(200, HeaderMap::new(), "not json").unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_refresh_header_applied_even_on_error() {
        let f = fixture("/admin");
        let err = f.classify(500, refresh_headers("fresh"), "{}");
        assert!(err.is_err());
        assert_eq!(f.store.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_refresh_header_applied_on_success() {
        let f = fixture("/admin");
        f.classify(200, refresh_headers("fresh"), r#"{"code":200}"#).unwrap();
        assert_eq!(f.session.get(TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
    }
}
