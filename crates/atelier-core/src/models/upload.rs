//! Upload payloads and helpers for reading upload responses.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FileType, ServerEnvelope};

/// Multipart field name every uploaded file is sent under.
pub const UPLOAD_FIELD: &str = "file";

/// Default upload size limits in megabytes.
pub const MAX_FILE_SIZE_STANDARD_MB: u64 = 100;
pub const MAX_FILE_SIZE_SETTINGS_MB: u64 = 50;
pub const MAX_FILE_SIZE_CLOTHING_MB: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadContext {
    Standard,
    Settings,
    Clothing,
}

impl UploadContext {
    pub fn max_file_size_mb(&self) -> u64 {
        match self {
            UploadContext::Standard => MAX_FILE_SIZE_STANDARD_MB,
            UploadContext::Settings => MAX_FILE_SIZE_SETTINGS_MB,
            UploadContext::Clothing => MAX_FILE_SIZE_CLOTHING_MB,
        }
    }
}

/// One file to send in a multipart request.
///
/// Bytes are held in memory so the request can be rebuilt for a retry.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = FileType::mime_for(&file_name).map(str::to_string);
        Self {
            file_name,
            bytes,
            mime,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read upload file {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }
}

/// File information returned by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

impl UploadedFile {
    /// Prefer the full `url`, fall back to `path`. Blank values are ignored.
    pub fn image_url(&self) -> Option<&str> {
        [self.url.as_deref(), self.path.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// The body must carry `code: 200` itself and a non-null `data`.
pub fn is_valid_upload_response(envelope: &ServerEnvelope) -> bool {
    envelope.has_body_code(200) && envelope.data.is_some()
}

/// Files in an upload response. Handles `{files: [...]}`, a bare array and a
/// single file object.
pub fn extract_files(envelope: &ServerEnvelope) -> Vec<UploadedFile> {
    if !is_valid_upload_response(envelope) {
        return Vec::new();
    }
    let Some(data) = envelope.data.as_ref() else {
        return Vec::new();
    };

    let parse_all = |items: &Vec<Value>| -> Vec<UploadedFile> {
        items
            .iter()
            .filter(|v| !v.is_null())
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    };

    match data {
        Value::Object(obj) => match obj.get("files") {
            Some(Value::Array(files)) => parse_all(files),
            _ => serde_json::from_value(data.clone()).ok().into_iter().collect(),
        },
        Value::Array(items) => parse_all(items),
        _ => Vec::new(),
    }
}

pub fn extract_image_urls(envelope: &ServerEnvelope) -> Vec<String> {
    extract_files(envelope)
        .iter()
        .filter_map(|f| f.image_url().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(body: Value) -> ServerEnvelope {
        ServerEnvelope::normalize(body, 200)
    }

    #[test]
    fn test_extract_single_file() {
        let env = envelope(json!({ "code": 200, "data": { "url": "https://cdn/a.png", "path": "/a.png" } }));
        let files = extract_files(&env);
        assert_eq!(files.len(), 1);
        assert_eq!(extract_image_urls(&env), vec!["https://cdn/a.png"]);
    }

    #[test]
    fn test_extract_multiple_files() {
        let env = envelope(json!({
            "code": 200,
            "data": { "files": [ { "url": "u1" }, null, { "path": "/p2" }, { "url": "  ", "path": "" } ] }
        }));
        assert_eq!(extract_files(&env).len(), 3);
        assert_eq!(extract_image_urls(&env), vec!["u1", "/p2"]);
    }

    #[test]
    fn test_extract_array_data() {
        let env = envelope(json!({ "code": 200, "data": [ { "url": "u1" }, { "url": "u2" } ] }));
        assert_eq!(extract_image_urls(&env), vec!["u1", "u2"]);
    }

    #[test]
    fn test_invalid_responses_yield_nothing() {
        assert!(extract_files(&envelope(json!({ "code": 500, "data": { "url": "u" } }))).is_empty());
        assert!(extract_files(&envelope(json!({ "code": 200 }))).is_empty());
        assert!(!is_valid_upload_response(&envelope(json!({ "code": 200 }))));
        assert!(!is_valid_upload_response(&envelope(json!({ "url": "u" }))));
    }

    #[test]
    fn test_upload_file_mime_detection() {
        let file = UploadFile::new("shirt.png", vec![0u8; 10]);
        assert_eq!(file.mime.as_deref(), Some("image/png"));
        let file = UploadFile::new("blob.bin", vec![]);
        assert_eq!(file.mime, None);
    }

    #[test]
    fn test_upload_context_limits() {
        assert_eq!(UploadContext::Standard.max_file_size_mb(), 100);
        assert_eq!(UploadContext::Settings.max_file_size_mb(), 50);
        assert_eq!(UploadContext::Clothing.max_file_size_mb(), 100);
    }
}
