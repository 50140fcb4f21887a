//! Configuration loading and resolution.

use std::time::Duration;

/// Upstream site used when neither the CLI nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "https://dev.ehq.test";

pub const BASE_URL_ENV: &str = "EHQ_BASE_URL";
pub const LOGIN_ENV: &str = "EHQ_LOGIN";
pub const PASSWORD_ENV: &str = "EHQ_PASSWORD";

/// Where the `get_projects` tool fetches from and how it signs in.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub login: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl UpstreamConfig {
    pub fn new(base_url: &str, login: Option<&str>, password: Option<&str>) -> Self {
        Self {
            base_url: base_url.to_string(),
            login: login.map(str::to_string),
            password: password.map(str::to_string),
            timeout: ehq_api::DEFAULT_TIMEOUT,
        }
    }

    /// Resolve from an explicit base URL, then the environment.
    pub fn resolve(explicit_base_url: Option<&str>) -> Self {
        let base_url = resolve_base_url(explicit_base_url);
        let login = non_empty_env(LOGIN_ENV);
        let password = non_empty_env(PASSWORD_ENV);

        if login.is_none() || password.is_none() {
            tracing::warn!(
                "{LOGIN_ENV}/{PASSWORD_ENV} not set; get_projects will report missing credentials"
            );
        }

        Self {
            base_url,
            login,
            password,
            timeout: ehq_api::DEFAULT_TIMEOUT,
        }
    }

    /// Login and password, when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.login.as_deref()?, self.password.as_deref()?))
    }
}

/// Resolve the upstream base URL.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit.filter(|u| !u.is_empty()) {
        return url.to_string();
    }

    non_empty_env(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
