//! Matches registry feed URLs against the candidate URLs.
//!
//! Both sides go through [`clean_url`] so a candidate carrying an API key
//! still matches the registry's bare URL.

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::normalize::clean_url;
use crate::results::{Registry, RegistryStatus, ResultSet};
use crate::services::registry_api::{RegistryApi, RegistryRecord};

/// Lookup from normalized URL to every raw candidate URL that normalizes to it.
#[derive(Debug, Default)]
pub struct MatchIndex {
    by_clean_url: HashMap<String, Vec<String>>,
}

impl MatchIndex {
    pub fn build(results: &ResultSet) -> Self {
        let mut by_clean_url: HashMap<String, Vec<String>> = HashMap::new();
        for url in results.urls() {
            by_clean_url
                .entry(clean_url(url))
                .or_default()
                .push(url.to_string());
        }
        Self { by_clean_url }
    }

    /// Raw candidate URLs matching `url` after normalization.
    pub fn lookup(&self, url: &str) -> &[String] {
        self.by_clean_url
            .get(&clean_url(url))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Marks every candidate listed in `records` as present in `registry`.
///
/// Returns the number of candidate entries found in the registry. A URL
/// listed more than once keeps the last display URL.
pub fn apply_records(
    results: &mut ResultSet,
    registry: Registry,
    records: &[RegistryRecord],
) -> usize {
    let index = MatchIndex::build(results);

    for record in records {
        for raw in index.lookup(&record.url) {
            if let Some(entry) = results.get_mut(raw) {
                debug!(%registry, url = %raw, page = %record.public_web_url, "Candidate matched");
                *entry.status_mut(registry) = RegistryStatus::present(&record.public_web_url);
            }
        }
    }

    results
        .iter()
        .filter(|(_, entry)| entry.status(registry).is_present())
        .count()
}

/// Fetches the registry's full URL list and applies it to `results`.
pub async fn match_registry<R>(results: &mut ResultSet, api: &R) -> Result<usize>
where
    R: RegistryApi + ?Sized,
{
    let registry = api.registry();
    let records = api.list_urls().await?;
    let found = apply_records(results, registry, &records);

    info!(
        %registry,
        records = records.len(),
        found,
        total = results.len(),
        "Registry matched"
    );
    Ok(found)
}
