// gate/mod.rs - Gate Entry Point
//
// classify path -> verify the audience's credential -> apply policy.
// Unrelated paths never touch a credential.

pub mod classify;
pub mod policy;
pub mod verify;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use classify::PathClassifier;
pub use policy::{session_state, subject_home_path, SessionPolicy};
pub use verify::{fingerprint, verify, VerifyError, VerifyResult};

use crate::auth::Claims;
use crate::config::GateConfig;
use crate::types::{Audience, Category, Decision, PathClass, SessionState};

/// Verified caller identity for the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub subject: String,
    pub audience: Audience,
    pub otp_verified: bool,
}

impl Session {
    fn from_claims(claims: Claims, audience: Audience, otp_bypass: bool) -> Self {
        let otp_verified = match audience {
            Audience::Admin => true,
            Audience::Client => otp_bypass || claims.otp_verified(),
        };
        Self {
            subject: claims.sub,
            audience,
            otp_verified,
        }
    }

    pub fn state(&self) -> SessionState {
        session_state(Some(self))
    }
}

/// The parts of an HTTP request the gate looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct GateRequest<'a> {
    pub path: &'a str,
    pub admin_token: Option<&'a str>,
    pub client_token: Option<&'a str>,
}

impl<'a> GateRequest<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn admin_token(mut self, token: &'a str) -> Self {
        self.admin_token = Some(token);
        self
    }

    pub fn client_token(mut self, token: &'a str) -> Self {
        self.client_token = Some(token);
        self
    }

    fn token_for(&self, audience: Audience) -> Option<&'a str> {
        match audience {
            Audience::Admin => self.admin_token,
            Audience::Client => self.client_token,
        }
    }
}

/// Full evaluation result; `decision` is what the caller acts on
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub class: PathClass,
    pub session: Option<Session>,
    pub rejection: Option<VerifyError>,
    pub decision: Decision,
}

#[derive(Clone)]
pub struct Gate {
    classifier: PathClassifier,
    policy: SessionPolicy,
    secret: String,
    audit_logging: bool,
}

impl Gate {
    pub fn new(config: GateConfig) -> Self {
        if config.otp_bypass {
            tracing::warn!("client OTP enforcement is bypassed; client portal paths are open");
        }

        Self {
            classifier: PathClassifier::new(&config.routes),
            policy: SessionPolicy::new(config.routes, config.otp_bypass),
            secret: config.secret,
            audit_logging: config.audit_logging,
        }
    }

    /// Decide what to do with a request, using the wall clock
    pub fn handle(&self, request: &GateRequest<'_>) -> Decision {
        self.evaluate(request, Utc::now()).decision
    }

    pub fn evaluate(&self, request: &GateRequest<'_>, now: DateTime<Utc>) -> Verdict {
        let (audience, category) = match self.classifier.classify(request.path) {
            PathClass::Unrelated => {
                return Verdict {
                    class: PathClass::Unrelated,
                    session: None,
                    rejection: None,
                    decision: Decision::Continue,
                }
            }
            PathClass::Scoped(audience, category) => (audience, category),
        };

        let token = request.token_for(audience);
        let (session, rejection) = match verify(token, audience, &self.secret, now) {
            Ok(claims) => (Some(Session::from_claims(claims, audience, self.policy.otp_bypass())), None),
            Err(err) => {
                if err != VerifyError::Absent {
                    tracing::debug!(
                        %audience,
                        reason = err.code(),
                        token = %token.map(fingerprint).unwrap_or_default(),
                        "credential rejected"
                    );
                }
                (None, Some(err))
            }
        };

        let decision = self.policy.decide(audience, category, session.as_ref());
        self.log_decision(request.path, audience, category, session.as_ref(), &decision);

        Verdict {
            class: PathClass::Scoped(audience, category),
            session,
            rejection,
            decision,
        }
    }

    fn log_decision(
        &self,
        path: &str,
        audience: Audience,
        category: Category,
        session: Option<&Session>,
        decision: &Decision,
    ) {
        let state = session_state(session);
        tracing::debug!(path, %audience, ?category, ?state, %decision, "gate decision");

        if self.audit_logging {
            if let Decision::RedirectTo(location) = decision {
                tracing::info!(
                    path,
                    %audience,
                    subject = session.map(|s| s.subject.as_str()).unwrap_or("-"),
                    location = location.as_str(),
                    "gate redirect"
                );
            }
        }
    }
}
