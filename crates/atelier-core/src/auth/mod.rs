//! Authentication: credential storage, token freshness and the user session.
//!
//! - `CredentialStore`: token, profile and permissions over two storage areas
//! - `KeyValueStore` backends: in-memory, JSON file, OS keychain
//! - `token`: expiry decoding for the background refresh
//! - `UserSession`: login, registration, logout, menu permissions

pub mod credentials;
pub mod session;
pub mod storage;
pub mod token;

pub use credentials::CredentialStore;
pub use session::UserSession;
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
