//! Client session layer for the atelier content administration backend.
//!
//! - `api`: HTTP transport with silent token refresh, scheme fallback and
//!   response classification, plus one wrapper per backend endpoint
//! - `auth`: credential storage over persistent and session areas, and the
//!   signed-in `UserSession`
//! - `models`: the normalized `ServerEnvelope`, user, upload and paging types
//! - `config`: `ClientConfig`
//! - `utils`: display helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, CredentialAccessor, Navigator, TrackingNavigator};
pub use auth::{CredentialStore, UserSession};
pub use config::ClientConfig;
pub use models::ServerEnvelope;
