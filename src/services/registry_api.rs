//! Trait and types for reading a transit feed registry.

use anyhow::Result;

use crate::results::Registry;

/// One feed URL as listed by a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    /// Human-facing page for the feed on the registry's website.
    pub public_web_url: String,
    /// The feed URL itself, compared against candidates after normalization.
    pub url: String,
}

impl RegistryRecord {
    pub fn new(public_web_url: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            public_web_url: public_web_url.into(),
            url: url.into(),
        }
    }
}

/// Abstraction over a feed registry (e.g., Transitland).
#[async_trait::async_trait]
pub trait RegistryApi: Send + Sync {
    /// Which registry this client reads.
    fn registry(&self) -> Registry;

    /// Returns every feed URL the registry knows about, walking all pages.
    async fn list_urls(&self) -> Result<Vec<RegistryRecord>>;
}
