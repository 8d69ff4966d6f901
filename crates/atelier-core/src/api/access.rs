//! Narrow capabilities the transport receives instead of the whole credential store.

use std::sync::Mutex;

use tracing::warn;

/// What the transport may do with the credentials.
pub trait CredentialAccessor: Send + Sync {
    /// Current bearer token, `None` when signed out.
    fn token(&self) -> Option<String>;

    /// Store a token delivered through the refresh header, keeping the current
    /// persistence preference.
    fn apply_refreshed_token(&self, token: &str);

    /// Drop every trace of the session from every storage area.
    fn invalidate(&self);

    /// Leave a one-shot notice for the next login screen.
    fn set_login_message(&self, message: &str);
}

/// Where the user "is", and how to send them elsewhere.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, location: &str);
}

/// Navigator that only tracks the location it was sent to.
///
/// Suits headless callers: there is no page to leave, so a redirect is logged
/// and remembered for the caller to inspect.
pub struct TrackingNavigator {
    current: Mutex<String>,
}

impl TrackingNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(path.into()),
        }
    }

    /// Full location last navigated to, query included.
    pub fn location(&self) -> String {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for TrackingNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for TrackingNavigator {
    fn current_path(&self) -> String {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        // Strip any query so `/login?redirect=..` still reads as the login page
        current.split('?').next().unwrap_or_default().to_string()
    }

    fn navigate(&self, location: &str) {
        warn!(location = location, "Redirecting to login");
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = location.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_navigator() {
        let nav = TrackingNavigator::new("/admin/media");
        assert_eq!(nav.current_path(), "/admin/media");

        nav.navigate("/login?redirect=%2Fadmin%2Fmedia");
        assert_eq!(nav.current_path(), "/login");
    }
}
