//! Registry credentials and endpoints, read from the environment.
//!
//! A `.env` file in the working directory is loaded by the binary before
//! [`RegistryConfig::from_env`] runs.

use anyhow::{Result, anyhow};

pub const TRANSITLAND_API_KEY: &str = "TRANSITLAND_API_KEY";
pub const TRANSITLAND_BASE_URL: &str = "TRANSITLAND_BASE_URL";
pub const TRANSITFEEDS_API_KEY: &str = "TRANSITFEEDS_API_KEY";
pub const TRANSITFEEDS_BASE_URL: &str = "TRANSITFEEDS_BASE_URL";

pub const DEFAULT_TRANSITLAND_BASE_URL: &str = "https://transit.land";
pub const DEFAULT_TRANSITFEEDS_BASE_URL: &str = "https://api.transitfeeds.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub transitland_api_key: String,
    pub transitland_base_url: String,
    pub transitfeeds_api_key: String,
    pub transitfeeds_base_url: String,
}

impl RegistryConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required =
            |name: &str| get(name).ok_or_else(|| anyhow!("{name} must be set"));

        Ok(Self {
            transitland_api_key: required(TRANSITLAND_API_KEY)?,
            transitland_base_url: get(TRANSITLAND_BASE_URL)
                .unwrap_or_else(|| DEFAULT_TRANSITLAND_BASE_URL.to_string()),
            transitfeeds_api_key: required(TRANSITFEEDS_API_KEY)?,
            transitfeeds_base_url: get(TRANSITFEEDS_BASE_URL)
                .unwrap_or_else(|| DEFAULT_TRANSITFEEDS_BASE_URL.to_string()),
        })
    }
}
