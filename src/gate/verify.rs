// gate/verify.rs - Credential Verifier
//
// Pure function of (token, audience, secret, now). Every failure is reported
// as a `VerifyError`; callers treat all of them as "logged out".

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::auth::{Claims, ALGORITHM};
use crate::types::Audience;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("no credential presented")]
    Absent,
    #[error("credential is malformed")]
    Malformed,
    #[error("credential signature does not match")]
    BadSignature,
    #[error("credential has expired")]
    Expired,
    #[error("credential was issued for another audience")]
    WrongAudience,
    #[error("credential carries no usable subject")]
    InvalidSubject,
    #[error("signing secret is not configured")]
    Unconfigured,
}

impl VerifyError {
    /// Stable identifier for log fields
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::Absent => "absent",
            VerifyError::Malformed => "malformed",
            VerifyError::BadSignature => "bad_signature",
            VerifyError::Expired => "expired",
            VerifyError::WrongAudience => "wrong_audience",
            VerifyError::InvalidSubject => "invalid_subject",
            VerifyError::Unconfigured => "unconfigured",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => VerifyError::BadSignature,
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidAudience => VerifyError::WrongAudience,
            _ => VerifyError::Malformed,
        }
    }
}

pub type VerifyResult = Result<Claims, VerifyError>;

/// Validate a raw cookie value for `audience` at instant `now`
pub fn verify(token: Option<&str>, audience: Audience, secret: &str, now: DateTime<Utc>) -> VerifyResult {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(VerifyError::Absent)?;

    if secret.is_empty() {
        return Err(VerifyError::Unconfigured);
    }

    // Expiry is checked below against the injected clock, not the system one.
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_audience(&[audience.as_str()]);

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;

    if !crate::auth::is_usable_subject(&claims.sub) {
        return Err(VerifyError::InvalidSubject);
    }
    if claims.exp <= now.timestamp() {
        return Err(VerifyError::Expired);
    }

    Ok(claims)
}

/// Short digest identifying a token in logs without revealing it
pub fn fingerprint(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .take(6)
        .map(|b| format!("{:02x}", b))
        .collect()
}
