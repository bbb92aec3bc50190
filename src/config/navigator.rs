use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a login redirect is carried out. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
#[serde(tag = "type")]
pub enum NavigatorConfig {
    /// Open the login page in the system browser.
    #[default]
    #[serde(rename = "browser")]
    Browser,
    /// Only print the login URL.
    #[serde(rename = "print")]
    Print,
}
