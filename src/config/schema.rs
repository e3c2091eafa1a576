use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ergast::DEFAULT_BASE_URL;
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the Ergast-compatible results API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Season used when --season is not given (current year otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Chart colour per constructor name, e.g. `Ferrari: "#dc0000"`
    #[serde(default)]
    pub palette: BTreeMap<String, String>,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            season: None,
            scoring: ScoringConfig::default(),
            palette: BTreeMap::new(),
        }
    }
}
