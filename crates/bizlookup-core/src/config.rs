use crate::app_config::{AppConfig, Credentials, Environment};
use crate::{ConfigError, LOGIN_VAR, PASSWORD_VAR};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if the credentials are missing or a value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it in tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if the credentials are missing or a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let credentials = build_credentials(&lookup)?;

    let env = parse_environment(&or_default("BIZLOOKUP_ENV", "development"));
    let log_level = or_default("BIZLOOKUP_LOG_LEVEL", "info");
    let base_url = or_default("DATAFORSEO_BASE_URL", "https://api.dataforseo.com");

    let request_timeout_secs = parse_u64("BIZLOOKUP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BIZLOOKUP_USER_AGENT", "bizlookup/0.1 (business-lookup)");
    let language_code = or_default("BIZLOOKUP_LANGUAGE_CODE", "en");
    let language_name = or_default("BIZLOOKUP_LANGUAGE_NAME", "English");

    let reviews_initial_wait_ms = parse_u64("BIZLOOKUP_REVIEWS_INITIAL_WAIT_MS", "5000")?;
    let reviews_poll_interval_ms = parse_u64("BIZLOOKUP_REVIEWS_POLL_INTERVAL_MS", "3000")?;
    let reviews_timeout_ms = parse_u64("BIZLOOKUP_REVIEWS_TIMEOUT_MS", "120000")?;

    if reviews_poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BIZLOOKUP_REVIEWS_POLL_INTERVAL_MS".to_string(),
            reason: "poll interval must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        credentials,
        env,
        log_level,
        base_url,
        request_timeout_secs,
        user_agent,
        language_code,
        language_name,
        reviews_initial_wait_ms,
        reviews_poll_interval_ms,
        reviews_timeout_ms,
    })
}

/// Reads both credentials, failing with a single error that names both
/// variables when either is absent or blank.
fn build_credentials<F>(lookup: &F) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let present = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());

    match (present(LOGIN_VAR), present(PASSWORD_VAR)) {
        (Some(login), Some(password)) => Ok(Credentials::new(login, password)),
        _ => Err(ConfigError::MissingCredentials {
            login_var: LOGIN_VAR,
            password_var: PASSWORD_VAR,
        }),
    }
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
