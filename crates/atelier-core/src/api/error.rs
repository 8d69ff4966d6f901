use thiserror::Error;

/// Message used when the server rejects a session without saying why.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 401, or a body carrying `code: 401`. The session has already been torn down.
    #[error("{0}")]
    Unauthorized(String),

    /// HTTP success but the body carries a code other than 200/201.
    #[error("{message}")]
    Business { code: i64, message: String },

    /// Non-success HTTP status without a recognized business code.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// True for failures that happened before any response was classified.
    /// Only these are eligible for the scheme fallback.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Business code or HTTP status, whichever the failure carries.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Business { code, .. } => Some(*code),
            ApiError::Http { status, .. } => Some(i64::from(*status)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(ApiError::truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(600);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }

    #[test]
    fn test_truncate_body_multibyte_boundary() {
        let body = "é".repeat(400);
        // Must not panic on a split character
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::Unauthorized("x".into()).code(), Some(401));
        assert_eq!(
            ApiError::Business { code: 500, message: "x".into() }.code(),
            Some(500)
        );
        assert_eq!(
            ApiError::Http { status: 404, message: "x".into() }.code(),
            Some(404)
        );
        assert_eq!(ApiError::InvalidRequest("x".into()).code(), None);
    }

    #[test]
    fn test_display_uses_server_message() {
        let err = ApiError::Business { code: 400, message: "Name is required".into() };
        assert_eq!(err.to_string(), "Name is required");
    }
}
