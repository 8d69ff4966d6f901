use anyhow::{bail, Result};
use serde_json::json;

use super::ApiClient;
use crate::models::{ServerEnvelope, UploadFile};

impl ApiClient {
    pub async fn list_images(&self) -> Result<ServerEnvelope> {
        self.post("/upload/list", &json!({})).await
    }

    pub async fn delete_image(&self, filename: &str) -> Result<ServerEnvelope> {
        self.post("/upload/delete", &json!({ "filename": filename }))
            .await
    }

    /// Upload one or more images in a single multipart request.
    pub async fn upload_images(&self, files: Vec<UploadFile>) -> Result<ServerEnvelope> {
        if files.is_empty() {
            bail!("No files to upload");
        }
        self.upload("/upload/images", files).await
    }
}
