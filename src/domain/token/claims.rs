//! Identity claim set carried inside access tokens

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// Identity facts embedded into a token at issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub subject_id: String,
    pub display_name: String,
    pub email: String,
    pub organization: String,
    pub is_active: bool,
}

impl From<&User> for TokenIdentity {
    fn from(user: &User) -> Self {
        Self {
            subject_id: user.id().as_str().to_string(),
            display_name: user.full_name().to_string(),
            email: user.email().to_string(),
            organization: user.company().to_string(),
            is_active: user.is_active(),
        }
    }
}

/// Full claim set as serialized into the token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "Company", default)]
    pub company: String,
    #[serde(rename = "IsActive", with = "bool_string", default)]
    pub is_active: bool,
    /// Unique token identifier
    pub jti: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Not before (Unix epoch seconds)
    pub nbf: i64,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims for an identity issued at `now` and valid for `lifetime`
    pub fn new(
        identity: &TokenIdentity,
        issuer: &str,
        audience: &str,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let issued_at = now.timestamp();

        Self {
            sub: identity.subject_id.clone(),
            name: identity.display_name.clone(),
            email: identity.email.clone(),
            company: identity.organization.clone(),
            is_active: identity.is_active,
            jti: uuid::Uuid::new_v4().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Identity portion of the claims
    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity {
            subject_id: self.sub.clone(),
            display_name: self.name.clone(),
            email: self.email.clone(),
            organization: self.company.clone(),
            is_active: self.is_active,
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.sub
    }

    pub fn token_id(&self) -> &str {
        &self.jti
    }

    /// Expiration as a UTC timestamp; out-of-range values clamp to the epoch
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Check whether the claims have expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// `IsActive` travels as a string claim ("true"/"false"); decoding is
/// case-insensitive and also tolerates a JSON boolean.
mod bool_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => Ok(value),
            Raw::Text(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            Raw::Text(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            Raw::Text(text) => Err(D::Error::custom(format!(
                "invalid IsActive claim: {}",
                text
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> TokenIdentity {
        TokenIdentity {
            subject_id: "u1".to_string(),
            display_name: "A B".to_string(),
            email: "a@b.com".to_string(),
            organization: "Acme".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_claims_timing() {
        let now = Utc::now();
        let claims = TokenClaims::new(
            &identity(),
            "trade-api",
            "trade-client",
            now,
            Duration::minutes(60),
        );

        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp, claims.iat + 3600);
        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::minutes(61)));
    }

    #[test]
    fn test_claims_identity_roundtrip() {
        let claims = TokenClaims::new(&identity(), "iss", "aud", Utc::now(), Duration::minutes(5));
        assert_eq!(claims.identity(), identity());
        assert_eq!(claims.subject_id(), "u1");
    }

    #[test]
    fn test_token_ids_are_unique() {
        let now = Utc::now();
        let a = TokenClaims::new(&identity(), "iss", "aud", now, Duration::minutes(5));
        let b = TokenClaims::new(&identity(), "iss", "aud", now, Duration::minutes(5));
        assert_ne!(a.token_id(), b.token_id());
    }

    #[test]
    fn test_wire_keys() {
        let claims = TokenClaims::new(&identity(), "iss", "aud", Utc::now(), Duration::minutes(5));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "u1");
        assert_eq!(json["name"], "A B");
        assert_eq!(json["Company"], "Acme");
        assert_eq!(json["IsActive"], "true");
        assert!(json["iat"].is_i64());
        assert!(json["exp"].is_i64());
    }

    #[test]
    fn test_is_active_accepts_mixed_case() {
        let json = serde_json::json!({
            "sub": "u1",
            "IsActive": "False",
            "jti": "id",
            "iss": "iss",
            "aud": "aud",
            "iat": 1,
            "nbf": 1,
            "exp": 2
        });

        let claims: TokenClaims = serde_json::from_value(json).unwrap();
        assert!(!claims.is_active);
        assert_eq!(claims.company, "");
    }

    #[test]
    fn test_is_active_rejects_garbage() {
        let json = serde_json::json!({
            "sub": "u1",
            "IsActive": "maybe",
            "jti": "id",
            "iss": "iss",
            "aud": "aud",
            "iat": 1,
            "nbf": 1,
            "exp": 2
        });

        assert!(serde_json::from_value::<TokenClaims>(json).is_err());
    }
}
