// auth/mod.rs - Credential claims and token issuance
//
// The login flows for both audiences mint tokens through `issue_token`; the
// gate verifies them through `gate::verify`. Both sides share `Claims`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::Audience;

/// Signing algorithm for every token this system issues or accepts
pub const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (admin user id or client id)
    #[serde(deserialize_with = "deserialize_subject")]
    pub sub: String,
    pub aud: String,
    /// Only meaningful for client tokens; absent means not verified
    #[serde(rename = "otpVerified", default, skip_serializing_if = "Option::is_none")]
    pub otp_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        audience: Audience,
        subject: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let otp_verified = match audience {
            Audience::Admin => None,
            Audience::Client => Some(false),
        };
        let expires = now.checked_add_signed(ttl).ok_or(TokenError::ExpiryOutOfRange)?;

        Ok(Self {
            sub: subject.into(),
            aud: audience.as_str().to_string(),
            otp_verified,
            jti: Some(Uuid::new_v4().to_string()),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        })
    }

    /// Mark a client token as having completed the OTP step
    pub fn with_otp_verified(mut self, verified: bool) -> Self {
        if self.aud == Audience::Client.as_str() {
            self.otp_verified = Some(verified);
        }
        self
    }

    pub fn otp_verified(&self) -> bool {
        self.otp_verified.unwrap_or(false)
    }
}

// Older issuers wrote numeric ids; keep their exact decimal form.
fn deserialize_subject<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSubject {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawSubject::deserialize(deserializer)? {
        RawSubject::Text(s) => s,
        RawSubject::Signed(n) => n.to_string(),
        RawSubject::Unsigned(n) => n.to_string(),
    })
}

/// Session length in whole hours, as configured or passed on the command line
pub fn session_ttl(hours: u64) -> Result<Duration, TokenError> {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .ok_or(TokenError::ExpiryOutOfRange)
}

/// Subjects end up as a path segment of the client landing page
pub fn is_usable_subject(subject: &str) -> bool {
    !matches!(subject.trim(), "" | "." | "..")
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret is not configured")]
    InvalidSecret,

    #[error("token subject must be a non-empty path segment")]
    InvalidSubject,

    #[error("token lifetime is out of range")]
    ExpiryOutOfRange,

    #[error("token generation error: {0}")]
    Generation(#[from] jsonwebtoken::errors::Error),
}

/// Sign a set of claims with the shared secret
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }
    if !is_usable_subject(&claims.sub) {
        return Err(TokenError::InvalidSubject);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::new(ALGORITHM), claims, &encoding_key)?)
}
