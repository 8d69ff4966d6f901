//! The signed-in user: login, registration, logout and menu permissions.
//!
//! `UserSession` owns the credential store and the API client built on top of
//! it, so the transport only ever sees the store through `CredentialAccessor`.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::credentials::CredentialStore;
use super::storage::KeyValueStore;
use crate::api::{ApiClient, Navigator};
use crate::config::ClientConfig;
use crate::models::{AuthPayload, LoginRequest, RegisterRequest, ServerEnvelope, UserProfile};

#[derive(Clone)]
pub struct UserSession {
    credentials: Arc<CredentialStore>,
    client: ApiClient,
}

impl UserSession {
    /// Load credentials from the two storage areas and build a client around them.
    pub fn new(
        config: ClientConfig,
        persistent: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let credentials = Arc::new(
            CredentialStore::init(persistent, session).context("Failed to load credentials")?,
        );
        let client = ApiClient::new(config, credentials.clone(), navigator)?;
        Ok(Self::from_parts(credentials, client))
    }

    /// `client` must have been built with `credentials` as its accessor.
    pub fn from_parts(credentials: Arc<CredentialStore>, client: ApiClient) -> Self {
        Self { credentials, client }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_logged_in()
    }

    pub fn has_menu_permission(&self, key: &str) -> bool {
        self.credentials.has_menu_permission(key)
    }

    pub fn take_login_message(&self) -> Result<Option<String>> {
        self.credentials.take_login_message()
    }

    pub fn set_remember_me(&self, remember: bool) -> Result<()> {
        self.credentials.set_remember_me(remember)
    }

    /// Store the profile and, when there is one, reload menu permissions in the background.
    ///
    /// Outside a tokio runtime the reload is skipped; `load_menu_permissions` can
    /// be awaited later instead.
    pub fn set_user_info(
        &self,
        info: Option<UserProfile>,
        persistent: bool,
    ) -> Result<Option<JoinHandle<()>>> {
        let reload = info.is_some();
        self.credentials.set_user_info(info, persistent)?;
        if !reload {
            return Ok(None);
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime, menu permissions not reloaded");
            return Ok(None);
        };
        let session = self.clone();
        Ok(Some(runtime.spawn(async move {
            session.load_menu_permissions().await;
        })))
    }

    /// Sign in. Succeeds only on code 200 with a payload.
    pub async fn login(&self, request: &LoginRequest, remember: bool) -> Result<ServerEnvelope> {
        let envelope = self.client.login(request).await?;

        // A bare HTTP 200 is not enough; the body must say `code: 200`
        let payload = match &envelope.data {
            Some(data) if envelope.has_body_code(200) && !data.is_null() => {
                serde_json::from_value::<AuthPayload>(data.clone())
                    .context("Unexpected login response")?
            }
            _ => {
                return Err(anyhow!(envelope
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Login failed".to_string())))
            }
        };

        self.set_remember_me(remember)?;
        self.apply_auth_payload(payload, remember)?;
        info!(username = %request.username, persistent = remember, "Logged in");
        Ok(envelope)
    }

    /// Create an account and start a session from the response.
    pub async fn register(&self, request: &RegisterRequest, remember: bool) -> Result<ServerEnvelope> {
        let envelope = self.client.register(request).await?;
        self.handle_register_response(&envelope, remember)?;
        Ok(envelope)
    }

    /// Start a session from a registration response.
    ///
    /// Three shapes are recognized:
    /// - `{code:200, data:{user, token}}` applies whichever of the two is present;
    /// - `{data:{user, token}}` and a bare `{token, user}` (both arrive with the
    ///   payload in `data` after normalization) need both fields.
    ///
    /// Anything else leaves the store untouched.
    pub fn handle_register_response(&self, envelope: &ServerEnvelope, remember: bool) -> Result<()> {
        self.set_remember_me(remember)?;

        let Some(data) = envelope.data.as_ref().filter(|d| !d.is_null()) else {
            debug!(code = envelope.code, "Registration response carries no session");
            return Ok(());
        };
        let payload: AuthPayload = match serde_json::from_value(data.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Registration response has an unexpected shape");
                return Ok(());
            }
        };

        let complete = payload.token.as_deref().is_some_and(|t| !t.is_empty()) && payload.user.is_some();
        if !envelope.has_body_code(200) && !complete {
            debug!(code = envelope.code, "Registration response carries no complete session");
            return Ok(());
        }
        self.apply_auth_payload(payload, remember)
    }

    fn apply_auth_payload(&self, payload: AuthPayload, remember: bool) -> Result<()> {
        if let Some(token) = payload.token.as_deref().filter(|t| !t.is_empty()) {
            self.credentials.set_token(token, remember)?;
        }
        if let Some(user) = payload.user {
            self.set_user_info(Some(user), remember)?;
        }
        Ok(())
    }

    /// End the session locally. The backend has no logout call.
    pub fn logout(&self) -> Result<()> {
        self.credentials.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the user's menu permission keys. On failure the set is left empty.
    pub async fn load_menu_permissions(&self) -> Vec<String> {
        let keys = match self.client.fetch_my_menu_permissions().await {
            Ok(envelope) => envelope.data.as_ref().map(permission_keys).unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to load menu permissions");
                Vec::new()
            }
        };
        debug!(count = keys.len(), "Menu permissions loaded");
        self.credentials.set_menu_permissions(keys.clone());
        keys
    }

    /// Whether the signed-in user may open the menu entry `key`, loading
    /// permissions first if none are cached.
    pub async fn can_access(&self, key: &str) -> bool {
        if !self.is_logged_in() {
            return false;
        }
        if self.credentials.menu_permissions().is_empty() {
            self.load_menu_permissions().await;
        }
        self.has_menu_permission(key)
    }
}

/// Permission keys from either a bare array or `{menuPermissions: [...]}`.
fn permission_keys(data: &Value) -> Vec<String> {
    let list = match data {
        Value::Array(_) => Some(data),
        Value::Object(map) => map.get("menuPermissions"),
        _ => None,
    };
    list.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TrackingNavigator;
    use crate::auth::storage::{TOKEN_KEY, USER_INFO_KEY};
    use crate::auth::MemoryStore;
    use serde_json::json;

    struct Fixture {
        persistent: Arc<MemoryStore>,
        session: Arc<MemoryStore>,
        user: UserSession,
    }

    fn fixture() -> Fixture {
        let persistent = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let user = UserSession::new(
            // Nothing listens here; permission reloads fail and are logged
            ClientConfig::new("http://127.0.0.1:9/api"),
            persistent.clone(),
            session.clone(),
            Arc::new(TrackingNavigator::default()),
        )
        .unwrap();
        Fixture {
            persistent,
            session,
            user,
        }
    }

    fn envelope(code: i64, data: Value) -> ServerEnvelope {
        ServerEnvelope::normalize(json!({ "code": code, "data": data }), 200)
    }

    #[test]
    fn test_permission_keys_shapes() {
        assert_eq!(permission_keys(&json!(["dashboard", "clothing"])), vec!["dashboard", "clothing"]);
        assert_eq!(
            permission_keys(&json!({ "menuPermissions": ["media", 3] })),
            vec!["media"]
        );
        assert!(permission_keys(&json!("nope")).is_empty());
    }

    #[tokio::test]
    async fn test_register_response_standard_shape() {
        let f = fixture();
        let response = envelope(200, json!({ "token": "t1", "user": { "id": "1", "username": "ana" } }));
        f.user.handle_register_response(&response, true).unwrap();

        assert_eq!(f.persistent.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        assert!(f.persistent.get(USER_INFO_KEY).unwrap().is_some());
        assert_eq!(f.session.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(f.user.credentials().user_name(), "ana");
    }

    #[tokio::test]
    async fn test_register_response_partial_payload_needs_code_200() {
        let f = fixture();
        f.user
            .handle_register_response(&envelope(201, json!({ "token": "t1" })), false)
            .unwrap();
        assert!(!f.user.is_logged_in());

        f.user
            .handle_register_response(&envelope(200, json!({ "token": "t1" })), false)
            .unwrap();
        assert_eq!(f.session.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_register_response_codeless_needs_token_and_user() {
        let f = fixture();
        for body in [json!({ "data": { "token": "t1" } }), json!({ "token": "t1" })] {
            let response = ServerEnvelope::normalize(body, 200);
            f.user.handle_register_response(&response, false).unwrap();
            assert!(!f.user.is_logged_in());
        }

        let response =
            ServerEnvelope::normalize(json!({ "token": "t2", "user": { "username": "bo" } }), 200);
        f.user.handle_register_response(&response, false).unwrap();
        assert_eq!(f.user.credentials().token().as_deref(), Some("t2"));
        assert_eq!(f.user.credentials().user_name(), "bo");
    }

    #[test]
    fn test_register_response_outside_runtime_skips_reload() {
        let f = fixture();
        let response = envelope(200, json!({ "token": "t1", "user": { "id": "1" } }));
        f.user.handle_register_response(&response, false).unwrap();

        assert!(f.user.is_logged_in());
        let profile = f.user.credentials().user_info();
        assert!(f.user.set_user_info(profile, false).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_response_without_data_is_ignored() {
        let f = fixture();
        let response =
            ServerEnvelope::normalize(json!({ "code": 400, "message": "Username taken" }), 200);
        f.user.handle_register_response(&response, false).unwrap();
        assert!(!f.user.is_logged_in());
    }

    #[tokio::test]
    async fn test_set_user_info_none_skips_reload() {
        let f = fixture();
        assert!(f.user.set_user_info(None, false).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_permission_load_leaves_set_empty() {
        let f = fixture();
        f.user.credentials().set_token("abc", false).unwrap();
        let handle = f
            .user
            .set_user_info(Some(serde_json::from_value(json!({ "id": "1" })).unwrap()), false)
            .unwrap()
            .unwrap();
        handle.await.unwrap();
        assert!(f.user.credentials().menu_permissions().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let f = fixture();
        f.user.credentials().set_token("abc", true).unwrap();
        f.user.logout().unwrap();
        assert!(!f.user.is_logged_in());
        assert_eq!(f.persistent.get(TOKEN_KEY).unwrap(), None);
        assert!(!f.user.can_access("dashboard").await);
    }
}
