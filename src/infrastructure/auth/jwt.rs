//! HS256 access token issuance and validation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt::Debug;
use tracing::debug;

use super::signing::SigningConfig;
use crate::domain::token::{TokenClaims, TokenIdentity, TokenRejection};
use crate::domain::DomainError;

/// Claims every token must carry to be considered well-formed
const REQUIRED_CLAIMS: [&str; 6] = ["sub", "iss", "aud", "iat", "nbf", "exp"];

/// A freshly signed token together with its bookkeeping fields
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Trait for access token operations
pub trait TokenCodec: Send + Sync + Debug {
    /// Sign a token for `identity` as if issued at `now`
    fn issue_at(
        &self,
        identity: &TokenIdentity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, DomainError>;

    /// Fully validate a token (signature, issuer, audience, lifetime) at `now`
    fn validate_at(&self, token: &str, now: DateTime<Utc>)
        -> Result<TokenClaims, TokenRejection>;

    /// Verify signature, issuer and audience but ignore the lifetime.
    ///
    /// Refresh path only: an expired but correctly signed token still yields
    /// its identity. Callers must re-check that the subject exists and is
    /// active before issuing a replacement.
    fn extract_claims(&self, token: &str) -> Option<TokenIdentity>;

    /// Lifetime applied to newly issued tokens
    fn lifetime(&self) -> Duration;

    fn issue(&self, identity: &TokenIdentity) -> Result<IssuedToken, DomainError> {
        self.issue_at(identity, Utc::now())
    }

    fn validate(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        self.validate_at(token, Utc::now())
    }
}

/// Token codec backed by a shared HMAC-SHA256 secret
#[derive(Clone)]
pub struct JwtTokenService {
    config: SigningConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtTokenService {
    /// Create a new token service from a validated signing configuration
    pub fn new(config: SigningConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret());
        let decoding_key = DecodingKey::from_secret(config.secret());

        let mut validation = Validation::new(Algorithm::HS256);
        // Lifetime is checked against the caller's clock with zero skew.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Parse and verify signature, issuer and audience
    fn decode_verified(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        if token.trim().is_empty() {
            return Err(TokenRejection::EmptyInput);
        }

        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify(&e))
    }
}

impl TokenCodec for JwtTokenService {
    fn issue_at(
        &self,
        identity: &TokenIdentity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, DomainError> {
        let claims = TokenClaims::new(
            identity,
            self.config.issuer(),
            self.config.audience(),
            now,
            self.config.lifetime(),
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
            token_id: claims.jti,
        })
    }

    fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenRejection> {
        let claims = self.decode_verified(token)?;

        if claims.is_expired_at(now) {
            return Err(TokenRejection::Expired);
        }

        if now.timestamp() < claims.nbf {
            return Err(TokenRejection::NotYetValid);
        }

        Ok(claims)
    }

    fn extract_claims(&self, token: &str) -> Option<TokenIdentity> {
        match self.decode_verified(token) {
            Ok(claims) => Some(claims.identity()),
            Err(rejection) => {
                debug!(reason = rejection.code(), "Refusing to extract token claims");
                None
            }
        }
    }

    fn lifetime(&self) -> Duration {
        self.config.lifetime()
    }
}

/// Map a decoding failure onto the rejection taxonomy
fn classify(error: &jsonwebtoken::errors::Error) -> TokenRejection {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
            TokenRejection::IssuerOrAudienceMismatch
        }
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::ImmatureSignature => TokenRejection::NotYetValid,
        _ => TokenRejection::MalformedToken,
    }
}
