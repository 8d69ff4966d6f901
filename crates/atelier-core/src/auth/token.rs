//! Best-effort expiry inspection for JWT-shaped bearer tokens.
//!
//! Only the payload's `exp` claim is read. Signatures are never checked; the
//! result is a hint for scheduling a background refresh, nothing more.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

/// Default remaining lifetime (seconds) under which a token counts as expiring.
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<serde_json::Value>,
}

/// Read the `exp` claim (epoch seconds) from a three-segment token.
pub fn expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let segment = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| STANDARD_NO_PAD.decode(segment))
        .map_err(|e| debug!(error = %e, "Token payload is not base64"))
        .ok()?;

    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| debug!(error = %e, "Token payload is not JSON"))
        .ok()?;

    let exp = claims.exp?.as_f64()? as i64;
    if exp == 0 {
        return None;
    }
    Some(exp)
}

/// True iff the token expires within `threshold_secs` of `now` and has not expired yet.
pub fn is_expiring_soon_at(token: &str, threshold_secs: i64, now: i64) -> bool {
    match expiry(token) {
        Some(exp) => {
            let remaining = exp - now;
            remaining > 0 && remaining < threshold_secs
        }
        None => false,
    }
}

pub fn is_expiring_soon(token: &str, threshold_secs: i64) -> bool {
    is_expiring_soon_at(token, threshold_secs, Utc::now().timestamp())
}

#[cfg(test)]
pub(crate) fn make_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_expiring_within_threshold() {
        let token = make_token(&json!({ "exp": NOW + 600 }));
        assert!(is_expiring_soon_at(&token, 3600, NOW));
    }

    #[test]
    fn test_not_expiring_outside_threshold() {
        let token = make_token(&json!({ "exp": NOW + 7200 }));
        assert!(!is_expiring_soon_at(&token, 3600, NOW));

        // Boundary: exactly the threshold is not "soon"
        let token = make_token(&json!({ "exp": NOW + 3600 }));
        assert!(!is_expiring_soon_at(&token, 3600, NOW));
    }

    #[test]
    fn test_already_expired_is_not_expiring() {
        let token = make_token(&json!({ "exp": NOW - 10 }));
        assert!(!is_expiring_soon_at(&token, 3600, NOW));

        let token = make_token(&json!({ "exp": NOW }));
        assert!(!is_expiring_soon_at(&token, 3600, NOW));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(!is_expiring_soon_at("", 3600, NOW));
        assert!(!is_expiring_soon_at("abc", 3600, NOW));
        assert!(!is_expiring_soon_at("a.b", 3600, NOW));
        assert!(!is_expiring_soon_at("a.b.c.d", 3600, NOW));
        assert!(!is_expiring_soon_at("a.!!!not-base64!!!.c", 3600, NOW));

        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"));
        assert!(!is_expiring_soon_at(&not_json, 3600, NOW));
    }

    #[test]
    fn test_missing_exp() {
        let token = make_token(&json!({ "sub": "42" }));
        assert!(!is_expiring_soon_at(&token, 3600, NOW));
        assert_eq!(expiry(&token), None);

        let token = make_token(&json!({ "exp": "soon" }));
        assert!(!is_expiring_soon_at(&token, 3600, NOW));
    }

    #[test]
    fn test_standard_alphabet_with_padding() {
        let body = base64::engine::general_purpose::STANDARD
            .encode(json!({ "exp": NOW + 60, "n": "??>>" }).to_string());
        let token = format!("h.{}.s", body);
        assert!(is_expiring_soon_at(&token, 3600, NOW));
    }

    #[test]
    fn test_custom_threshold() {
        let token = make_token(&json!({ "exp": NOW + 120 }));
        assert!(!is_expiring_soon_at(&token, 60, NOW));
        assert!(is_expiring_soon_at(&token, 300, NOW));
    }

    #[test]
    fn test_against_wall_clock() {
        let exp = Utc::now().timestamp() + 30;
        let token = make_token(&json!({ "exp": exp }));
        assert!(is_expiring_soon(&token, DEFAULT_REFRESH_THRESHOLD_SECS));
    }
}
