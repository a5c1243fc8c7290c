//! Shared configuration for the business lookup workspace.
//!
//! Owns the provider credentials and every tunable the lookup client reads,
//! loaded from the process environment (and `.env`) with fail-fast
//! validation.

pub mod app_config;
pub mod config;

use thiserror::Error;

pub use app_config::{AppConfig, Credentials, Environment};
pub use config::{load_app_config, load_app_config_from_env};

/// Env var holding the DataForSEO API login.
pub const LOGIN_VAR: &str = "DATAFORSEO_LOGIN";
/// Env var holding the DataForSEO API password.
pub const PASSWORD_VAR: &str = "DATAFORSEO_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Either credential is absent. Both variable names are reported so the
    /// operator can fix the environment in one pass.
    #[error("missing DataForSEO credentials: both {login_var} and {password_var} must be set")]
    MissingCredentials {
        login_var: &'static str,
        password_var: &'static str,
    },

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
