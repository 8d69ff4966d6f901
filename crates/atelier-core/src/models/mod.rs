//! Data models shared by the client and its callers.
//!
//! - `ServerEnvelope`: the normalized `{code, message, data}` response shape
//! - `UserProfile`, `Role`, auth request/response payloads
//! - `FileType`, `UploadFile`, `UploadedFile`: upload inputs and results
//! - `Pagination`: list paging defaults

pub mod envelope;
pub mod file_type;
pub mod pagination;
pub mod upload;
pub mod user;

pub use envelope::ServerEnvelope;
pub use file_type::{validate_extension, FileType};
pub use pagination::{ListKind, Pagination, DEFAULT_PAGE};
pub use upload::{
    extract_files, extract_image_urls, is_valid_upload_response, UploadContext, UploadFile,
    UploadedFile, UPLOAD_FIELD,
};
pub use user::{AuthPayload, ChangePasswordRequest, LoginRequest, RegisterRequest, Role, UserProfile};
