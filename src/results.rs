//! Per-URL check results and the result set written to the JSON report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The external registries a URL is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registry {
    Transitland,
    TransitFeeds,
}

impl Registry {
    /// Key used for this registry in the JSON report.
    pub fn name(&self) -> &'static str {
        match self {
            Registry::Transitland => "transitland",
            Registry::TransitFeeds => "transitfeeds",
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Present,
    Missing,
}

/// Presence of one URL in one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_web_url: Option<String>,
}

impl RegistryStatus {
    pub fn missing() -> Self {
        Self {
            status: Status::Missing,
            public_web_url: None,
        }
    }

    pub fn present(public_web_url: impl Into<String>) -> Self {
        Self {
            status: Status::Present,
            public_web_url: Some(public_web_url.into()),
        }
    }

    pub fn is_present(&self) -> bool {
        self.status == Status::Present
    }
}

/// An agency's `itp_id` as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgencyId {
    Number(i64),
    Text(String),
}

/// Where a manifest URL came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub url_type: String,
    pub itp_id: AgencyId,
    /// Zero-based position of `url_type` within its feed.
    pub url_number: usize,
}

/// Check outcome for a single candidate URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    #[serde(flatten)]
    pub provenance: Option<Provenance>,
    pub transitfeeds: RegistryStatus,
    pub transitland: RegistryStatus,
}

impl CheckResult {
    /// A fresh entry, missing from every registry.
    pub fn new(provenance: Option<Provenance>) -> Self {
        Self {
            provenance,
            transitfeeds: RegistryStatus::missing(),
            transitland: RegistryStatus::missing(),
        }
    }

    pub fn status(&self, registry: Registry) -> &RegistryStatus {
        match registry {
            Registry::Transitland => &self.transitland,
            Registry::TransitFeeds => &self.transitfeeds,
        }
    }

    pub fn status_mut(&mut self, registry: Registry) -> &mut RegistryStatus {
        match registry {
            Registry::Transitland => &mut self.transitland,
            Registry::TransitFeeds => &mut self.transitfeeds,
        }
    }

    /// `true` if at least one registry lists this URL.
    pub fn is_found(&self) -> bool {
        self.transitfeeds.is_present() || self.transitland.is_present()
    }
}

/// Check results keyed by the raw candidate URL.
///
/// Inserting a URL that is already present replaces its entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: BTreeMap<String, CheckResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, result: CheckResult) {
        self.entries.insert(url.into(), result);
    }

    pub fn get(&self, url: &str) -> Option<&CheckResult> {
        self.entries.get(url)
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut CheckResult> {
        self.entries.get_mut(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckResult)> {
        self.entries.iter().map(|(url, result)| (url.as_str(), result))
    }
}
