use serde::{Deserialize, Serialize};

/// Broad category of an uploaded file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Document,
    Archive,
    Text,
    Other,
}

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "ico", "tiff", "tif", "heic", "heif",
    "avif", "jfif", "jp2", "jpx", "j2k", "j2c", "psd", "raw", "cr2", "nef", "orf", "sr2",
];

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "wmv", "flv", "mkv"];

pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];

pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];

pub const TEXT_EXTENSIONS: &[&str] = &["txt", "csv", "json", "xml", "md", "markdown"];

impl FileType {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Image => IMAGE_EXTENSIONS,
            FileType::Video => VIDEO_EXTENSIONS,
            FileType::Document => DOCUMENT_EXTENSIONS,
            FileType::Archive => ARCHIVE_EXTENSIONS,
            FileType::Text => TEXT_EXTENSIONS,
            FileType::Other => &[],
        }
    }

    pub fn from_file_name(file_name: &str) -> FileType {
        let Some(ext) = extension(file_name) else {
            return FileType::Other;
        };
        [
            FileType::Image,
            FileType::Video,
            FileType::Document,
            FileType::Archive,
            FileType::Text,
        ]
        .into_iter()
        .find(|t| t.extensions().contains(&ext.as_str()))
        .unwrap_or(FileType::Other)
    }

    /// MIME type to send for a file of this name, if one is known.
    pub fn mime_for(file_name: &str) -> Option<&'static str> {
        let ext = extension(file_name)?;
        let mime = match ext.as_str() {
            "jpg" | "jpeg" | "jfif" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "svg" => "image/svg+xml",
            "ico" => "image/x-icon",
            "tif" | "tiff" => "image/tiff",
            "heic" => "image/heic",
            "heif" => "image/heif",
            "avif" => "image/avif",
            "mp4" => "video/mp4",
            "webm" => "video/webm",
            "ogg" => "video/ogg",
            "mov" => "video/quicktime",
            "pdf" => "application/pdf",
            "zip" => "application/zip",
            "json" => "application/json",
            "txt" => "text/plain",
            "csv" => "text/csv",
            "md" | "markdown" => "text/markdown",
            _ => return None,
        };
        Some(mime)
    }
}

/// True if the file name's extension belongs to `file_type`.
pub fn validate_extension(file_name: &str, file_type: FileType) -> bool {
    extension(file_name)
        .map(|ext| file_type.extensions().contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name() {
        assert_eq!(FileType::from_file_name("photo.JPG"), FileType::Image);
        assert_eq!(FileType::from_file_name("clip.mkv"), FileType::Video);
        assert_eq!(FileType::from_file_name("report.final.pdf"), FileType::Document);
        assert_eq!(FileType::from_file_name("bundle.7z"), FileType::Archive);
        assert_eq!(FileType::from_file_name("README.md"), FileType::Text);
        assert_eq!(FileType::from_file_name("binary.exe"), FileType::Other);
        assert_eq!(FileType::from_file_name("noext"), FileType::Other);
        assert_eq!(FileType::from_file_name(""), FileType::Other);
    }

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension("a.png", FileType::Image));
        assert!(!validate_extension("a.png", FileType::Video));
        assert!(!validate_extension("a.", FileType::Image));
        assert!(!validate_extension("a.png", FileType::Other));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(FileType::mime_for("a.jpeg"), Some("image/jpeg"));
        assert_eq!(FileType::mime_for("a.MP4"), Some("video/mp4"));
        assert_eq!(FileType::mime_for("a.raw"), None);
    }
}
