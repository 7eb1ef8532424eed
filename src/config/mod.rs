use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub mod routes;

pub use routes::{AdminRoutes, ClientRoutes, ConfigError, RouteConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub security: SecurityConfig,
    pub gate: GateSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub admin_session_hours: u64,
    pub client_session_hours: u64,
    pub otp_bypass: bool,
    pub enable_audit_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Optional YAML file replacing the built-in route table
    pub routes_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = parse_env("SECURITY_ADMIN_SESSION_HOURS") {
            self.security.admin_session_hours = v;
        }
        if let Some(v) = parse_env("SECURITY_CLIENT_SESSION_HOURS") {
            self.security.client_session_hours = v;
        }
        if let Some(v) = parse_env("SECURITY_OTP_BYPASS") {
            self.set_otp_bypass(v);
        }
        if let Some(v) = parse_env("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v;
        }
        if let Ok(v) = env::var("GATE_ROUTES_FILE") {
            if !v.trim().is_empty() {
                self.gate.routes_file = Some(PathBuf::from(v));
            }
        }

        self
    }

    /// Production builds never honour the OTP bypass
    pub fn set_otp_bypass(&mut self, requested: bool) {
        if requested && self.environment == Environment::Production {
            tracing::warn!("OTP bypass requested in production; ignoring");
            self.security.otp_bypass = false;
        } else {
            self.security.otp_bypass = requested;
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            security: SecurityConfig {
                jwt_secret: String::new(),
                admin_session_hours: 24 * 7,
                client_session_hours: 24 * 7,
                otp_bypass: false,
                enable_audit_logging: false,
            },
            gate: GateSettings { routes_file: None },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                jwt_secret: String::new(),
                admin_session_hours: 24,
                client_session_hours: 24 * 7,
                otp_bypass: false,
                enable_audit_logging: true,
            },
            gate: GateSettings { routes_file: None },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            security: SecurityConfig {
                jwt_secret: String::new(),
                admin_session_hours: 12,
                client_session_hours: 24 * 7,
                otp_bypass: false,
                enable_audit_logging: true,
            },
            gate: GateSettings { routes_file: None },
        }
    }

    /// Build the immutable configuration handed to the gate
    pub fn gate_config(&self) -> Result<GateConfig, ConfigError> {
        let routes = match &self.gate.routes_file {
            Some(path) => RouteConfig::from_yaml_file(path)?,
            None => RouteConfig::default(),
        };
        routes.validate()?;

        Ok(GateConfig {
            secret: self.security.jwt_secret.clone(),
            otp_bypass: self.security.otp_bypass,
            audit_logging: self.security.enable_audit_logging,
            routes,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse_setting(key, &raw)
}

// Unparseable values keep the preset, but operators need to see that.
fn parse_setting<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = raw, "ignoring unparseable setting; keeping default");
            None
        }
    }
}

/// Everything the gate reads, fixed at construction time
#[derive(Clone)]
pub struct GateConfig {
    pub secret: String,
    pub otp_bypass: bool,
    pub audit_logging: bool,
    pub routes: RouteConfig,
}

impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateConfig")
            .field("secret", &"<redacted>")
            .field("otp_bypass", &self.otp_bypass)
            .field("audit_logging", &self.audit_logging)
            .field("routes", &self.routes)
            .finish()
    }
}

impl GateConfig {
    /// Default routes with the given secret, bypass off
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            otp_bypass: false,
            audit_logging: false,
            routes: RouteConfig::default(),
        }
    }

    pub fn otp_bypass(mut self, enabled: bool) -> Self {
        self.otp_bypass = enabled;
        self
    }
}

// Global singleton config - initialized once at startup by the binaries
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
