use std::path::PathBuf;

use anyhow::{bail, Result};
use atelier_core::models::{
    extract_files, is_valid_upload_response, FileType, ListKind, Pagination, UploadContext,
    UploadFile,
};
use atelier_core::utils::format_file_size;
use serde_json::{json, Map, Value};

use super::{print_json, Context};
use crate::cli::{ClothingCommand, MediaCommand, SettingsSection, UploadTarget};

fn page_params(kind: ListKind, page: Option<u32>, limit: Option<u32>) -> Map<String, Value> {
    let defaults = Pagination::first(kind);
    let mut params = Map::new();
    params.insert("page".into(), json!(page.unwrap_or(defaults.page)));
    params.insert("limit".into(), json!(limit.unwrap_or(defaults.limit)));
    params
}

pub async fn clothing(ctx: &Context, command: ClothingCommand) -> Result<()> {
    ctx.require_login()?;
    let client = ctx.user.client();
    let envelope = match command {
        ClothingCommand::Get { id } => client.find_clothing_by_id(&id).await?,
        ClothingCommand::List { page, limit, name } => {
            let mut params = page_params(ListKind::List, page, limit);
            let mut query = Map::new();
            if let Some(name) = name {
                query.insert("name".into(), Value::String(name));
            }
            params.insert("query".into(), Value::Object(query));
            client.find_clothing(&Value::Object(params)).await?
        }
        ClothingCommand::Stats => client.clothing_stats().await?,
    };
    print_json(&envelope.data)
}

pub async fn media(ctx: &Context, command: MediaCommand) -> Result<()> {
    ctx.require_login()?;
    let MediaCommand::List {
        page,
        limit,
        media_type,
    } = command;

    let mut params = page_params(ListKind::Media, page, limit);
    if let Some(media_type) = media_type {
        params.insert("type".into(), json!(media_type.as_str()));
    }
    let envelope = ctx.user.client().list_media(&Value::Object(params)).await?;
    print_json(&envelope.data)
}

pub async fn upload(ctx: &Context, paths: Vec<PathBuf>, target: UploadTarget) -> Result<()> {
    ctx.require_login()?;
    let context = match target {
        UploadTarget::Standard => UploadContext::Standard,
        UploadTarget::Settings => UploadContext::Settings,
        UploadTarget::Clothing => UploadContext::Clothing,
    };

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = UploadFile::from_path(path)?;
        if FileType::from_file_name(&file.file_name) != FileType::Image {
            bail!("{} is not an image", file.file_name);
        }
        if file.size_mb() > context.max_file_size_mb() as f64 {
            bail!(
                "{} is {}, the limit is {} MB",
                file.file_name,
                format_file_size(file.bytes.len() as u64),
                context.max_file_size_mb()
            );
        }
        files.push(file);
    }

    let envelope = ctx.user.client().upload_images(files).await?;
    if !is_valid_upload_response(&envelope) {
        bail!(envelope
            .message
            .unwrap_or_else(|| "Upload failed".to_string()));
    }
    print_json(&extract_files(&envelope))
}

pub async fn settings(ctx: &Context, section: SettingsSection) -> Result<()> {
    ctx.require_login()?;
    let client = ctx.user.client();
    let envelope = match section {
        SettingsSection::Basic => client.basic_settings().await?,
        SettingsSection::Security => client.security_settings().await?,
        SettingsSection::Notification => client.notification_settings().await?,
        SettingsSection::All => client.all_settings().await?,
    };
    print_json(&envelope.data)
}
