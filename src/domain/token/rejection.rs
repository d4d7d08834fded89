use thiserror::Error;

/// Reasons a presented token is refused
///
/// Only for internal diagnostics: callers collapse every variant into one
/// "invalid or expired token" outcome.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("token is empty")]
    EmptyInput,

    #[error("token is malformed")]
    MalformedToken,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token issuer or audience does not match")]
    IssuerOrAudienceMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,
}

impl TokenRejection {
    /// Short machine-readable code for log fields
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::MalformedToken => "malformed_token",
            Self::InvalidSignature => "invalid_signature",
            Self::IssuerOrAudienceMismatch => "issuer_or_audience_mismatch",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
        }
    }
}
