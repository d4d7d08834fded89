//! Advisory token lifecycle checks
//!
//! Nothing here verifies signatures. Results only tell a client when to
//! refresh pre-emptively; authorization always goes through full validation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Window before expiry in which a token counts as "near expiry"
pub const NEAR_EXPIRY_WINDOW_MINUTES: i64 = 15;

/// Check whether a token expires within the near-expiry window
pub fn is_near_expiry(token: &str) -> bool {
    is_near_expiry_at(token, Utc::now())
}

/// Same as [`is_near_expiry`] against an explicit clock.
///
/// An unreadable token or expiry counts as near expiry.
pub fn is_near_expiry_at(token: &str, now: DateTime<Utc>) -> bool {
    match read_expiry(token) {
        Some(exp) => exp <= (now + Duration::minutes(NEAR_EXPIRY_WINDOW_MINUTES)).timestamp(),
        None => true,
    }
}

/// Read the `exp` claim from the payload segment without verifying anything
pub fn read_expiry(token: &str) -> Option<i64> {
    let mut segments = token.trim().split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);

    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    match claims.get("exp")? {
        Value::Number(exp) => exp.as_i64(),
        Value::String(exp) => exp.trim().parse().ok(),
        _ => None,
    }
}
