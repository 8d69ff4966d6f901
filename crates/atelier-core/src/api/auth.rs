use anyhow::Result;
use serde_json::Value;

use super::ApiClient;
use crate::models::{ChangePasswordRequest, LoginRequest, RegisterRequest, ServerEnvelope};

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<ServerEnvelope> {
        self.post("/auth/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<ServerEnvelope> {
        self.post("/auth/login", request).await
    }

    pub async fn fetch_profile(&self) -> Result<ServerEnvelope> {
        self.post_empty("/auth/profile").await
    }

    /// Goes through the normal transport; the background refresh uses its own call.
    pub async fn verify_token(&self) -> Result<ServerEnvelope> {
        self.post_empty("/auth/verify").await
    }

    /// Update the signed-in user's `username` and/or `email`.
    pub async fn update_profile(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/auth/update", data).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<ServerEnvelope> {
        self.post("/auth/change-password", request).await
    }
}
