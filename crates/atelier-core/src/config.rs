//! Client configuration.
//!
//! `ClientConfig` carries everything the transport needs to resolve URLs and
//! drive the session: the API base, the origin relative bases resolve against,
//! the refresh threshold and the auth-related paths.

use std::time::Duration;

use crate::auth::token::DEFAULT_REFRESH_THRESHOLD_SECS;

/// API base used when none is configured
pub const DEFAULT_API_BASE: &str = "/api";

/// Origin used to resolve a scheme-less API base
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Response header carrying a replacement token
pub const DEFAULT_REFRESH_HEADER: &str = "X-New-Token";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Either an absolute URL (`https://host/api`) or a path (`/api`).
    pub api_base: String,
    /// Scheme and host that a path-only `api_base` is joined to.
    pub origin: String,
    /// Tokens with less remaining lifetime than this trigger a background refresh.
    pub refresh_threshold_secs: i64,
    /// No timeout is applied unless one is set here.
    pub request_timeout: Option<Duration>,
    pub refresh_header: String,
    pub verify_path: String,
    pub login_path: String,
    pub register_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
            request_timeout: None,
            refresh_header: DEFAULT_REFRESH_HEADER.to_string(),
            verify_path: "/auth/verify".to_string(),
            login_path: "/login".to_string(),
            register_path: "/register".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_refresh_threshold(mut self, secs: i64) -> Self {
        self.refresh_threshold_secs = secs;
        self
    }
}
