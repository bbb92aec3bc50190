use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the identity service lives and how long to wait for it.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct GatewayConfig {
    /// Absolute origin of the identity service, prefixed to every endpoint path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    /// A `name=value` cookie sent with every request, for sessions obtained
    /// outside this process (e.g. copied from a browser after login).
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Paths of the three identity endpoints, relative to `base_url`.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct EndpointsConfig {
    #[serde(default = "default_profile_path")]
    pub profile: String,
    #[serde(default = "default_login_path")]
    pub login: String,
    #[serde(default = "default_logout_path")]
    pub logout: String,
}

pub const DEFAULT_TIMEOUT_IN_MS: u64 = 10_000;

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_in_ms() -> u64 {
    DEFAULT_TIMEOUT_IN_MS
}

fn default_profile_path() -> String {
    "/v1/profile".to_string()
}

fn default_login_path() -> String {
    "/v1/auth/google/login".to_string()
}

fn default_logout_path() -> String {
    "/v1/auth/logout".to_string()
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_ms)
    }

    /// Convenience for tests and embedders: defaults pointed at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        GatewayConfig {
            base_url: base_url.into(),
            ..GatewayConfig::default()
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: default_base_url(),
            timeout_in_ms: default_timeout_in_ms(),
            session_cookie: None,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        EndpointsConfig {
            profile: default_profile_path(),
            login: default_login_path(),
            logout: default_logout_path(),
        }
    }
}
