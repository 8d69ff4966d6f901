use anyhow::Result;
use serde_json::{json, Value};

use super::ApiClient;
use crate::models::ServerEnvelope;

impl ApiClient {
    pub async fn basic_settings(&self) -> Result<ServerEnvelope> {
        self.post("/settings/getBasic", &json!({})).await
    }

    /// `siteName`, `siteDescription`, `logo`.
    pub async fn update_basic_settings(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/settings/updateBasic", data).await
    }

    pub async fn security_settings(&self) -> Result<ServerEnvelope> {
        self.post("/settings/getSecurity", &json!({})).await
    }

    /// `allowRegister`, `requireEmailVerify`, `minPasswordLength`, `sessionTimeout`.
    pub async fn update_security_settings(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/settings/updateSecurity", data).await
    }

    pub async fn notification_settings(&self) -> Result<ServerEnvelope> {
        self.post("/settings/getNotification", &json!({})).await
    }

    pub async fn update_notification_settings(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/settings/updateNotification", data).await
    }

    pub async fn all_settings(&self) -> Result<ServerEnvelope> {
        self.post("/settings/getAll", &json!({})).await
    }
}
