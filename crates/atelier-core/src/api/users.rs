use anyhow::Result;
use serde_json::{json, Value};

use super::ApiClient;
use crate::models::{Role, ServerEnvelope};

// Admin-only user management.
impl ApiClient {
    /// `params` may carry `page`, `limit`, `username`, `email`.
    pub async fn list_users(&self, params: &Value) -> Result<ServerEnvelope> {
        self.post("/auth/users", params).await
    }

    pub async fn update_user_role(&self, user_id: &str, role: Role) -> Result<ServerEnvelope> {
        self.post(&format!("/auth/users/{}/role", user_id), &json!({ "role": role }))
            .await
    }

    pub async fn update_user_status(&self, user_id: &str, is_active: bool) -> Result<ServerEnvelope> {
        self.post(
            &format!("/auth/users/{}/status", user_id),
            &json!({ "isActive": is_active }),
        )
        .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<ServerEnvelope> {
        self.post(&format!("/auth/users/{}/delete", user_id), &json!({}))
            .await
    }
}
