use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::gateway::GatewayConfig;
use super::logging::LoggingConfig;
use super::navigator::NavigatorConfig;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Prefix of environment variables overriding file values,
/// e.g. `CHRONOTES_GATEWAY__BASE_URL`.
pub const ENV_PREFIX: &str = "CHRONOTES_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: where the identity service lives, how to log,
/// and how to perform login redirects.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub navigator: NavigatorConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

/// Layer built-in defaults, the YAML file at `path` (if it exists) and
/// `CHRONOTES_*` environment variables, in that order.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load config from the YAML file at `path`, with defaults and env overrides applied.
pub fn load_config(path: &Path) -> Result<ConfigV1, ConfigError> {
    extract(figment_for(path))
}

/// Extract a versioned config from an arbitrary figment.
pub fn extract(figment: Figment) -> Result<ConfigV1, ConfigError> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
        // handle configuration migration between versions here when necessary
    }
}

/// The JSON schema of the configuration file, pretty printed.
pub fn schema_json() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    println!("{}", schema_json()?);
    Ok(())
}
