use anyhow::Result;
use serde_json::{json, Value};

use super::{with_id, ApiClient};
use crate::models::ServerEnvelope;

impl ApiClient {
    pub async fn create_clothing(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/clothing/create", data).await
    }

    /// Paged query; `params` carries `page`, `limit` and a `query` object.
    pub async fn find_clothing(&self, params: &Value) -> Result<ServerEnvelope> {
        self.post("/clothing/find", params).await
    }

    pub async fn find_clothing_by_id(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/clothing/findById", &json!({ "id": id })).await
    }

    pub async fn update_clothing(&self, id: &str, data: Value) -> Result<ServerEnvelope> {
        self.post("/clothing/update", &with_id(id, data)).await
    }

    pub async fn remove_clothing(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/clothing/remove", &json!({ "id": id })).await
    }

    pub async fn restock_clothing(&self, id: &str, quantity: i64) -> Result<ServerEnvelope> {
        self.post("/clothing/restock", &json!({ "id": id, "quantity": quantity }))
            .await
    }

    pub async fn clothing_stats(&self) -> Result<ServerEnvelope> {
        self.post("/clothing/stats", &json!({})).await
    }

    /// A clothing item is bound to at most one page.
    pub async fn bind_page(&self, id: &str, page_id: &str) -> Result<ServerEnvelope> {
        self.post("/clothing/bindPage", &json!({ "id": id, "pageId": page_id }))
            .await
    }

    pub async fn unbind_page(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/clothing/unbindPage", &json!({ "id": id })).await
    }

    pub async fn bound_page(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/clothing/getBoundPage", &json!({ "id": id })).await
    }

    /// Works without a session.
    pub async fn clothing_public_detail(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/clothing/getPublicDetail", &json!({ "id": id }))
            .await
    }
}
