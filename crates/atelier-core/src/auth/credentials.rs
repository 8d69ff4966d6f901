use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use super::storage::{KeyValueStore, LOGIN_MESSAGE_KEY, TOKEN_KEY, USER_INFO_KEY};
use crate::api::CredentialAccessor;
use crate::models::{Role, UserProfile};

#[derive(Debug, Default)]
struct CredentialState {
    token: String,
    user_info: Option<UserProfile>,
    remember_me: bool,
    menu_permissions: BTreeSet<String>,
}

/// Holds the session token and profile, and decides where they live.
///
/// Two storage areas back the store: `persistent` survives restarts and is
/// used when the user asked to be remembered, `session` does not. A value is
/// only ever present in one of them.
pub struct CredentialStore {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    state: RwLock<CredentialState>,
}

impl CredentialStore {
    /// Build the store from whatever the storage areas already hold.
    ///
    /// The persistent area wins when both have a value. The store remembers
    /// the user iff a token was found in the persistent area.
    pub fn init(persistent: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Result<Self> {
        let persistent_token = persistent.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let remember_me = persistent_token.is_some();
        let token = match persistent_token {
            Some(token) => token,
            None => session.get(TOKEN_KEY)?.unwrap_or_default(),
        };

        let raw_info = match persistent.get(USER_INFO_KEY)? {
            Some(info) => Some(info),
            None => session.get(USER_INFO_KEY)?,
        };
        let user_info = match raw_info {
            Some(raw) => match serde_json::from_str::<Option<UserProfile>>(&raw) {
                Ok(info) => info,
                Err(e) => {
                    error!(error = %e, "Stored user info is not valid JSON, ignoring it");
                    None
                }
            },
            None => None,
        };

        debug!(logged_in = !token.is_empty(), remember_me, "Credential store initialized");

        Ok(Self {
            persistent,
            session,
            state: RwLock::new(CredentialState {
                token,
                user_info,
                remember_me,
                menu_permissions: BTreeSet::new(),
            }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, CredentialState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CredentialState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn area(&self, persistent: bool) -> &dyn KeyValueStore {
        if persistent {
            self.persistent.as_ref()
        } else {
            self.session.as_ref()
        }
    }

    /// Remove `key` from both areas, then write `value` to the chosen one.
    fn place(&self, key: &str, value: Option<&str>, persistent: bool) -> Result<()> {
        self.persistent.remove(key)?;
        self.session.remove(key)?;
        if let Some(value) = value {
            self.area(persistent).set(key, value)?;
        }
        Ok(())
    }

    /// Set the token. An empty token is stored nowhere.
    pub fn set_token(&self, token: &str, persistent: bool) -> Result<()> {
        self.write().token = token.to_string();
        let value = (!token.is_empty()).then_some(token);
        self.place(TOKEN_KEY, value, persistent)
            .context("Failed to store token")
    }

    /// Set the user profile, following the same placement rule as the token.
    ///
    /// Permission reloading is the caller's job; see `UserSession::set_user_info`.
    pub fn set_user_info(&self, info: Option<UserProfile>, persistent: bool) -> Result<()> {
        let serialized = match &info {
            Some(profile) => Some(serde_json::to_string(profile)?),
            None => None,
        };
        self.write().user_info = info;
        self.place(USER_INFO_KEY, serialized.as_deref(), persistent)
            .context("Failed to store user info")
    }

    /// Change the persistence preference, moving an active session to the matching area.
    pub fn set_remember_me(&self, remember: bool) -> Result<()> {
        let (token, info) = {
            let mut state = self.write();
            state.remember_me = remember;
            (state.token.clone(), state.user_info.clone())
        };
        if !token.is_empty() {
            self.set_token(&token, remember)?;
            self.set_user_info(info, remember)?;
        }
        Ok(())
    }

    /// Remove token, profile and permissions everywhere, and forget the preference.
    pub fn clear(&self) -> Result<()> {
        {
            let mut state = self.write();
            state.token.clear();
            state.user_info = None;
            state.remember_me = false;
            state.menu_permissions.clear();
        }
        for area in [&self.persistent, &self.session] {
            area.remove(TOKEN_KEY)?;
            area.remove(USER_INFO_KEY)?;
        }
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        let state = self.read();
        (!state.token.is_empty()).then(|| state.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        !self.read().token.is_empty()
    }

    pub fn remember_me(&self) -> bool {
        self.read().remember_me
    }

    pub fn user_info(&self) -> Option<UserProfile> {
        self.read().user_info.clone()
    }

    pub fn user_name(&self) -> String {
        self.read()
            .user_info
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    pub fn user_id(&self) -> String {
        self.read()
            .user_info
            .as_ref()
            .map(|u| u.id.clone())
            .unwrap_or_default()
    }

    pub fn role(&self) -> Role {
        self.read()
            .user_info
            .as_ref()
            .map(UserProfile::role)
            .unwrap_or_default()
    }

    pub fn vip_level(&self) -> u32 {
        self.read()
            .user_info
            .as_ref()
            .map(UserProfile::vip_level)
            .unwrap_or(0)
    }

    pub fn menu_permissions(&self) -> Vec<String> {
        self.read().menu_permissions.iter().cloned().collect()
    }

    pub fn set_menu_permissions<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write().menu_permissions = keys.into_iter().map(Into::into).collect();
    }

    pub fn has_menu_permission(&self, key: &str) -> bool {
        self.read().menu_permissions.contains(key)
    }

    /// Read and remove the one-shot login notice.
    pub fn take_login_message(&self) -> Result<Option<String>> {
        let message = self.session.get(LOGIN_MESSAGE_KEY)?;
        if message.is_some() {
            self.session.remove(LOGIN_MESSAGE_KEY)?;
        }
        Ok(message)
    }
}

impl CredentialAccessor for CredentialStore {
    fn token(&self) -> Option<String> {
        CredentialStore::token(self)
    }

    fn apply_refreshed_token(&self, token: &str) {
        let remember = self.remember_me();
        match self.set_token(token, remember) {
            Ok(()) => info!(persistent = remember, "Token refreshed"),
            Err(e) => error!(error = %e, "Failed to store refreshed token"),
        }
    }

    fn invalidate(&self) {
        if let Err(e) = self.clear() {
            error!(error = %e, "Failed to clear credentials");
        }
    }

    fn set_login_message(&self, message: &str) {
        if let Err(e) = self.session.set(LOGIN_MESSAGE_KEY, message) {
            error!(error = %e, "Failed to store login message");
        }
    }
}
