// gate/policy.rs - Session Policy
//
// Decision table over (audience, category, session state). Nothing here is
// stored between requests; the state is recomputed from the verifier output.

use url::Url;

use super::Session;
use crate::config::{ClientRoutes, RouteConfig};
use crate::types::{Audience, Category, Decision, SessionState};

#[derive(Debug, Clone)]
pub struct SessionPolicy {
    routes: RouteConfig,
    otp_bypass: bool,
}

impl SessionPolicy {
    pub fn new(routes: RouteConfig, otp_bypass: bool) -> Self {
        Self { routes, otp_bypass }
    }

    pub fn otp_bypass(&self) -> bool {
        self.otp_bypass
    }

    pub fn decide(&self, audience: Audience, category: Category, session: Option<&Session>) -> Decision {
        match audience {
            Audience::Admin => self.decide_admin(category, session),
            Audience::Client => self.decide_client(category, session),
        }
    }

    fn decide_admin(&self, category: Category, session: Option<&Session>) -> Decision {
        let admin = &self.routes.admin;
        let authenticated = session_state(session) != SessionState::Unauthenticated;

        match category {
            Category::Public | Category::Root if authenticated => Decision::redirect(&admin.dashboard),
            Category::Public | Category::Root => Decision::Continue,
            Category::Protected | Category::OtpStep if authenticated => Decision::Continue,
            Category::Protected | Category::OtpStep => Decision::redirect(&admin.login),
        }
    }

    fn decide_client(&self, category: Category, session: Option<&Session>) -> Decision {
        let client = &self.routes.client;

        if self.otp_bypass {
            return match category {
                Category::Root => Decision::redirect(&client.login),
                _ => Decision::Continue,
            };
        }

        match (category, session_state(session), session) {
            (Category::Public | Category::Root | Category::OtpStep, SessionState::AuthenticatedComplete, Some(s)) => {
                self.client_home(&s.subject)
            }
            (Category::Public | Category::Root | Category::Protected, SessionState::AuthenticatedIncomplete, _) => {
                Decision::redirect(&client.verify_otp)
            }
            (Category::Public, SessionState::Unauthenticated, _) => Decision::Continue,
            (Category::Protected, SessionState::AuthenticatedComplete, _) => Decision::Continue,
            (Category::OtpStep, SessionState::AuthenticatedIncomplete, _) => Decision::Continue,
            _ => Decision::redirect(&client.login),
        }
    }

    fn client_home(&self, subject: &str) -> Decision {
        match subject_home_path(&self.routes.client, subject) {
            Some(path) => Decision::RedirectTo(path),
            None => {
                // Redirecting to login here would bounce straight back.
                tracing::error!(subject, "could not build client home path");
                Decision::Continue
            }
        }
    }
}

pub fn session_state(session: Option<&Session>) -> SessionState {
    match session {
        None => SessionState::Unauthenticated,
        Some(s) if s.audience == Audience::Client && !s.otp_verified => SessionState::AuthenticatedIncomplete,
        Some(_) => SessionState::AuthenticatedComplete,
    }
}

/// `{prefix}/{subject}/{home}` with the subject percent-encoded as one segment
pub fn subject_home_path(routes: &ClientRoutes, subject: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut()
        .ok()?
        .clear()
        .extend(routes.prefix.split('/').filter(|s| !s.is_empty()))
        .push(subject)
        .push(&routes.home);
    Some(url.path().to_string())
}
