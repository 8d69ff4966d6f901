use anyhow::Result;
use serde_json::{json, Value};

use super::{with_id, ApiClient};
use crate::models::ServerEnvelope;

impl ApiClient {
    /// Register an uploaded file in the media library.
    pub async fn create_media(&self, data: &Value) -> Result<ServerEnvelope> {
        self.post("/media/create", data).await
    }

    /// `params` may carry `page`, `limit` and `type` (`image` or `video`).
    pub async fn list_media(&self, params: &Value) -> Result<ServerEnvelope> {
        self.post("/media/list", params).await
    }

    pub async fn media_by_id(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/media/findById", &json!({ "id": id })).await
    }

    pub async fn update_media(&self, id: &str, data: Value) -> Result<ServerEnvelope> {
        self.post("/media/update", &with_id(id, data)).await
    }

    pub async fn delete_media(&self, id: &str) -> Result<ServerEnvelope> {
        self.post("/media/remove", &json!({ "id": id })).await
    }

    pub async fn add_media_description(&self, id: &str, text: &str) -> Result<ServerEnvelope> {
        self.post("/media/addDescription", &json!({ "id": id, "text": text }))
            .await
    }

    pub async fn remove_media_description(
        &self,
        id: &str,
        description_id: &str,
    ) -> Result<ServerEnvelope> {
        self.post(
            "/media/removeDescription",
            &json!({ "id": id, "descriptionId": description_id }),
        )
        .await
    }

    pub async fn update_media_description(
        &self,
        id: &str,
        description_id: &str,
        text: &str,
    ) -> Result<ServerEnvelope> {
        self.post(
            "/media/updateDescription",
            &json!({ "id": id, "descriptionId": description_id, "text": text }),
        )
        .await
    }
}
