#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// DataForSEO API credentials.
///
/// Immutable once built. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub env: Environment,
    pub log_level: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub language_code: String,
    pub language_name: String,
    pub reviews_initial_wait_ms: u64,
    pub reviews_poll_interval_ms: u64,
    pub reviews_timeout_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("language_code", &self.language_code)
            .field("language_name", &self.language_name)
            .field("reviews_initial_wait_ms", &self.reviews_initial_wait_ms)
            .field("reviews_poll_interval_ms", &self.reviews_poll_interval_ms)
            .field("reviews_timeout_ms", &self.reviews_timeout_ms)
            .finish()
    }
}
