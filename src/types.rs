/// Shared types used across the gate, middleware and CLI

use serde::{Deserialize, Serialize};
use std::fmt;

/// Independently secured area of the application a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Admin,
    Client,
}

impl Audience {
    /// Value carried in the `aud` claim of tokens minted for this audience
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Admin => "admin",
            Audience::Client => "client",
        }
    }

    /// Name of the cookie holding this audience's credential
    pub fn cookie_name(&self) -> &'static str {
        match self {
            Audience::Admin => "auth-token",
            Audience::Client => "client_token",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Audience::Admin),
            "client" => Ok(Audience::Client),
            other => Err(format!("unknown audience '{}' (expected admin or client)", other)),
        }
    }
}

/// Classification of a path within its audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Login-type pages: reachable only while logged out
    Public,
    /// The bare audience prefix, e.g. `/admin`
    Root,
    /// The client one-time-passcode verification page
    OtpStep,
    /// Everything else under the audience prefix
    Protected,
}

/// Result of classifying a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Unrelated,
    Scoped(Audience, Category),
}

/// Session state recomputed on every request from the verifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    /// Client session whose OTP step has not been completed
    AuthenticatedIncomplete,
    AuthenticatedComplete,
}

/// Output of the gate for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "location", rename_all = "snake_case")]
pub enum Decision {
    Continue,
    /// Absolute path, always a valid `Location` header value
    RedirectTo(String),
}

impl Decision {
    pub fn redirect(path: impl Into<String>) -> Self {
        Decision::RedirectTo(path.into())
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Decision::Continue)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Continue => f.write_str("continue"),
            Decision::RedirectTo(path) => write!(f, "redirect -> {}", path),
        }
    }
}
