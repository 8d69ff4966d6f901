//! REST API client module for the content administration backend.
//!
//! `ApiClient` is the transport: URL resolution, bearer auth, silent token
//! refresh, scheme fallback and response classification. The endpoint
//! wrappers live in their own files as further `impl ApiClient` blocks, one
//! per backend area (auth, users, menu permissions, clothing, media, pages,
//! settings, uploads).
//!
//! The transport never sees the credential store directly; it receives a
//! `CredentialAccessor` and a `Navigator`.

pub mod access;
mod classify;
pub mod client;
pub mod error;
pub mod refresh;
pub mod url;

mod auth;
mod clothing;
mod media;
mod pages;
mod permissions;
mod settings;
mod upload;
mod users;

pub use access::{CredentialAccessor, Navigator, TrackingNavigator};
pub use client::{ApiClient, Payload, RequestOptions};
pub use error::{ApiError, SESSION_EXPIRED_MESSAGE};
pub use pages::PublicPageQuery;
pub use refresh::{RefreshOutcome, RefreshTask};

use serde_json::{Map, Value};

/// `{id, ...data}`: the id first, then the fields of `data`.
pub(crate) fn with_id(id: &str, data: Value) -> Value {
    let mut merged = Map::new();
    merged.insert("id".to_string(), Value::String(id.to_string()));
    if let Value::Object(fields) = data {
        merged.extend(fields);
    }
    Value::Object(merged)
}
