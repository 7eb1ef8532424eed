// config/routes.rs - Static route table consumed by the path classifier and policy

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read route file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse route file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("route '{0}' must be an absolute path without a trailing slash")]
    NotAbsolute(String),

    #[error("route '{0}' is not a valid Location header value")]
    InvalidHeader(String),

    #[error("route '{path}' is outside its audience prefix '{prefix}'")]
    OutsidePrefix { path: String, prefix: String },

    #[error("route '{0}' would redirect to itself")]
    RedirectLoop(String),

    #[error("audience prefixes must differ")]
    DuplicatePrefix,
}

/// Admin back-office routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminRoutes {
    pub prefix: String,
    pub login: String,
    pub dashboard: String,
    pub public: Vec<String>,
}

impl Default for AdminRoutes {
    fn default() -> Self {
        Self {
            prefix: "/admin".to_string(),
            login: "/admin/login".to_string(),
            dashboard: "/admin/dashboard".to_string(),
            public: vec![
                "/admin/login".to_string(),
                "/admin/forgot-password".to_string(),
                "/admin/reset-password".to_string(),
            ],
        }
    }
}

/// Client self-service portal routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRoutes {
    pub prefix: String,
    pub login: String,
    pub verify_otp: String,
    /// Final segment of the per-subject landing page, `{prefix}/{id}/{home}`
    pub home: String,
    pub public: Vec<String>,
}

impl Default for ClientRoutes {
    fn default() -> Self {
        Self {
            prefix: "/client".to_string(),
            login: "/client/login".to_string(),
            verify_otp: "/client/verify-otp".to_string(),
            home: "home".to_string(),
            public: vec![
                "/client/login".to_string(),
                "/client/register".to_string(),
                "/client/forgot-password".to_string(),
                "/client/reset-password".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub admin: AdminRoutes,
    pub client: ClientRoutes,
}

impl RouteConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Reject tables that would produce unusable redirects or redirect loops
    pub fn validate(&self) -> Result<(), ConfigError> {
        let admin = &self.admin;
        let client = &self.client;

        if admin.prefix == client.prefix {
            return Err(ConfigError::DuplicatePrefix);
        }

        for prefix in [&admin.prefix, &client.prefix] {
            check_path(prefix)?;
        }

        for path in [&admin.login, &admin.dashboard].into_iter().chain(&admin.public) {
            check_path(path)?;
            check_under(path, &admin.prefix)?;
        }
        for path in [&client.login, &client.verify_otp].into_iter().chain(&client.public) {
            check_path(path)?;
            check_under(path, &client.prefix)?;
        }

        // Landing pages must be protected, otherwise an authenticated caller
        // would bounce between the public page and its landing page forever.
        // The classifier always treats the login page as public.
        if admin.dashboard == admin.prefix || is_public(&admin.dashboard, &admin.login, &admin.public) {
            return Err(ConfigError::RedirectLoop(admin.dashboard.clone()));
        }
        if client.verify_otp == client.prefix || is_public(&client.verify_otp, &client.login, &client.public) {
            return Err(ConfigError::RedirectLoop(client.verify_otp.clone()));
        }
        if client.home.is_empty() || client.home.contains('/') {
            return Err(ConfigError::NotAbsolute(client.home.clone()));
        }

        Ok(())
    }
}

fn is_public(path: &str, login: &str, public: &[String]) -> bool {
    path == login || public.iter().any(|p| p == path)
}

fn check_path(path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') || (path.len() > 1 && path.ends_with('/')) {
        return Err(ConfigError::NotAbsolute(path.to_string()));
    }
    if HeaderValue::from_str(path).is_err() {
        return Err(ConfigError::InvalidHeader(path.to_string()));
    }
    Ok(())
}

fn check_under(path: &str, prefix: &str) -> Result<(), ConfigError> {
    let inside = path
        .strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false);
    if inside {
        Ok(())
    } else {
        Err(ConfigError::OutsidePrefix {
            path: path.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes_are_valid() {
        RouteConfig::default().validate().unwrap();
    }

    #[test]
    fn yaml_overrides_merge_with_defaults() {
        let routes = RouteConfig::from_yaml_str(
            r#"
admin:
  prefix: /backoffice
  login: /backoffice/signin
  dashboard: /backoffice/overview
  public: [/backoffice/signin]
"#,
        )
        .unwrap();

        assert_eq!(routes.admin.prefix, "/backoffice");
        assert_eq!(routes.client, ClientRoutes::default());
        routes.validate().unwrap();
    }

    #[test]
    fn public_dashboard_is_rejected() {
        let mut routes = RouteConfig::default();
        routes.admin.public.push("/admin/dashboard".to_string());
        assert!(matches!(routes.validate(), Err(ConfigError::RedirectLoop(_))));
    }

    #[test]
    fn dashboard_on_login_page_is_rejected() {
        let routes = RouteConfig::from_yaml_str("admin:\n  dashboard: /admin/login\n  public: []\n").unwrap();
        assert!(matches!(
            routes.validate(),
            Err(ConfigError::RedirectLoop(path)) if path == "/admin/login"
        ));
    }

    #[test]
    fn otp_step_on_login_page_is_rejected() {
        let routes =
            RouteConfig::from_yaml_str("client:\n  verify_otp: /client/login\n  public: []\n").unwrap();
        assert!(matches!(
            routes.validate(),
            Err(ConfigError::RedirectLoop(path)) if path == "/client/login"
        ));
    }

    #[test]
    fn login_outside_prefix_is_rejected() {
        let mut routes = RouteConfig::default();
        routes.client.login = "/login".to_string();
        assert!(matches!(routes.validate(), Err(ConfigError::OutsidePrefix { .. })));
    }

    #[test]
    fn trailing_slash_is_rejected() {
        let mut routes = RouteConfig::default();
        routes.admin.prefix = "/admin/".to_string();
        assert!(matches!(routes.validate(), Err(ConfigError::NotAbsolute(_))));
    }

    #[test]
    fn missing_route_file_reports_path() {
        let err = RouteConfig::from_yaml_file(Path::new("/nonexistent/routes.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/routes.yaml"));
    }
}
