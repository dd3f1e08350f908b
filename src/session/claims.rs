//! Best-effort inspection of the access token's `exp` claim.
//!
//! No signature verification happens here: the backend is authoritative and
//! will answer 401 regardless. Decoding locally just avoids a guaranteed
//! round-trip when the token is already past its expiry. Anything that does
//! not parse as a three-part JWT with a numeric `exp` is treated as expired.

use base64::Engine;
use chrono::{DateTime, Utc};

/// Extract the `exp` claim (Unix seconds) from a JWT without verifying it.
pub fn expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let payload_bytes = engine.decode(parts[1]).ok()?;
    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;
    payload.get("exp").and_then(|v| v.as_i64())
}

/// True when the token should no longer be sent as-is. Malformed tokens are
/// expired by definition.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match expiry(token) {
        Some(exp) => exp <= now.timestamp(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &str) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        format!("{}.{}.signature", header, engine.encode(payload))
    }

    #[test]
    fn test_future_expiry_not_expired() {
        let token = make_token(r#"{"sub":"1","exp":9999999999}"#);
        assert_eq!(expiry(&token), Some(9999999999));
        assert!(!is_expired(&token, Utc::now()));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let token = make_token(r#"{"sub":"1","exp":1000000000}"#);
        assert!(is_expired(&token, Utc::now()));
    }

    #[test]
    fn test_malformed_token_is_expired() {
        assert!(is_expired("not-a-jwt", Utc::now()));
        assert!(is_expired("a.b", Utc::now()));
        assert!(is_expired("", Utc::now()));
    }

    #[test]
    fn test_missing_exp_claim_is_expired() {
        let token = make_token(r#"{"sub":"1"}"#);
        assert_eq!(expiry(&token), None);
        assert!(is_expired(&token, Utc::now()));
    }

    #[test]
    fn test_exp_equal_to_now_is_expired() {
        let now = Utc::now();
        let token = make_token(&format!(r#"{{"exp":{}}}"#, now.timestamp()));
        assert!(is_expired(&token, now));
    }
}
