// gate/classify.rs - Path Classifier
//
// An ordered table of (prefix, audience) entries, first match wins. Inside an
// audience, categories come from exact string membership only.

use std::collections::HashSet;

use crate::config::RouteConfig;
use crate::types::{Audience, Category, PathClass};

#[derive(Debug, Clone)]
struct AudienceEntry {
    prefix: String,
    audience: Audience,
    public: HashSet<String>,
    otp_step: Option<String>,
}

impl AudienceEntry {
    fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    fn category(&self, path: &str) -> Category {
        if path == self.prefix {
            Category::Root
        } else if self.public.contains(path) {
            Category::Public
        } else if self.otp_step.as_deref() == Some(path) {
            Category::OtpStep
        } else {
            Category::Protected
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathClassifier {
    entries: Vec<AudienceEntry>,
}

impl PathClassifier {
    pub fn new(routes: &RouteConfig) -> Self {
        let mut admin_public: HashSet<String> = routes.admin.public.iter().cloned().collect();
        admin_public.insert(routes.admin.login.clone());

        let mut client_public: HashSet<String> = routes.client.public.iter().cloned().collect();
        client_public.insert(routes.client.login.clone());

        let entries = vec![
            AudienceEntry {
                prefix: routes.admin.prefix.clone(),
                audience: Audience::Admin,
                public: admin_public,
                otp_step: None,
            },
            AudienceEntry {
                prefix: routes.client.prefix.clone(),
                audience: Audience::Client,
                public: client_public,
                otp_step: Some(routes.client.verify_otp.clone()),
            },
        ];

        Self { entries }
    }

    pub fn classify(&self, path: &str) -> PathClass {
        let path = normalize(path);

        self.entries
            .iter()
            .find(|entry| entry.matches(path))
            .map(|entry| PathClass::Scoped(entry.audience, entry.category(path)))
            .unwrap_or(PathClass::Unrelated)
    }
}

/// Strip trailing slashes so `/admin/` and `/admin` classify the same
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
