use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};

use super::{with_id, ApiClient};
use crate::models::ServerEnvelope;

/// Filters for the public page list. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublicPageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ===== Pages =====

impl ApiClient {
    pub async fn create_page(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/page/create", data).await
    }

    pub async fn list_pages(&self, params: &Value) -> Result<ServerEnvelope> {
        self.post("/page/list", params).await
    }

    pub async fn page_by_id(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/page/findById", &json!({ "id": id })).await
    }

    pub async fn update_page(&self, id: &str, data: Value) -> Result<ServerEnvelope> {
        self.post("/page/update", &with_id(id, data)).await
    }

    pub async fn remove_page(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/page/remove", &json!({ "id": id })).await
    }

    pub async fn remove_pages(&self, ids: &[String]) -> Result<ServerEnvelope> {
        self.post("/page/remove", &json!({ "ids": ids })).await
    }

    /// Published pages, readable without a session.
    pub async fn public_pages(&self, query: &PublicPageQuery) -> Result<ServerEnvelope> {
        let params = serde_json::to_value(query)?;
        self.get("/page/public/list", Some(params)).await
    }

    pub async fn public_page(&self, id: &str) -> Result<ServerEnvelope> {
        self.get(&format!("/page/public/{}", urlencoding::encode(id)), None)
            .await
    }
}

// ===== Page components =====

impl ApiClient {
    pub async fn create_page_component(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/page-component/create", data).await
    }

    pub async fn list_page_components(&self, params: &Value) -> Result<ServerEnvelope> {
        self.post("/page-component/list", params).await
    }

    pub async fn page_component_by_id(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/page-component/findById", &json!({ "id": id }))
            .await
    }

    pub async fn update_page_component(&self, id: &str, data: Value) -> Result<ServerEnvelope> {
        self.post("/page-component/update", &with_id(id, data)).await
    }

    pub async fn remove_page_component(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/page-component/remove", &json!({ "id": id }))
            .await
    }

    pub async fn remove_page_components(&self, ids: &[String]) -> Result<ServerEnvelope> {
        self.post("/page-component/remove", &json!({ "ids": ids }))
            .await
    }
}
