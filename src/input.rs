//! Candidate URL loading from a single URL, a CSV file, or an agency manifest.
//!
//! The manifest is a YAML mapping of agency name to agency record:
//!
//! ```yaml
//! caltrain:
//!   agency_name: Caltrain
//!   itp_id: 45
//!   feeds:
//!     - gtfs_schedule_url: https://example.com/caltrain.zip
//!       gtfs_rt_vehicle_positions_url: https://example.com/vp?api_key=abc
//! ```
//!
//! Each non-empty URL in a feed becomes a candidate tagged with its url type,
//! the agency's `itp_id` and its position within the feed.

use anyhow::{Context, Result};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::results::{AgencyId, CheckResult, Provenance, ResultSet};

/// Where candidate URLs are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Url(String),
    Csv(PathBuf),
    Manifest(PathBuf),
}

impl InputSource {
    /// Picks the input mode: a single URL beats a CSV file, which beats the
    /// manifest. Empty values count as not given.
    pub fn select(url: Option<&str>, csv_file: Option<&Path>, manifest: &Path) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            return InputSource::Url(url.to_string());
        }
        if let Some(csv_file) = csv_file.filter(|p| !p.as_os_str().is_empty()) {
            return InputSource::Csv(csv_file.to_path_buf());
        }
        InputSource::Manifest(manifest.to_path_buf())
    }

    /// Reads every candidate URL into a fresh [`ResultSet`].
    pub fn load(&self) -> Result<ResultSet> {
        let results = match self {
            InputSource::Url(url) => {
                let mut results = ResultSet::new();
                results.insert(url.as_str(), CheckResult::new(None));
                results
            }
            InputSource::Csv(path) => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
                load_csv(file)
                    .with_context(|| format!("Failed to read CSV file {}", path.display()))?
            }
            InputSource::Manifest(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read manifest {}", path.display()))?;
                load_manifest(&content)
                    .with_context(|| format!("Failed to parse manifest {}", path.display()))?
            }
        };

        info!(source = ?self, candidates = results.len(), "Candidate URLs loaded");
        Ok(results)
    }
}

/// Reads one raw URL per line, skipping blank lines.
///
/// Each line is a single field: commas and quotes are part of the URL.
pub fn load_csv<R: Read>(reader: R) -> Result<ResultSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b'\0')
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut results = ResultSet::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0) {
            Some(url) if !url.is_empty() => results.insert(url, CheckResult::new(None)),
            _ => continue,
        }
    }

    Ok(results)
}

/// Parses an agency manifest and returns its candidate URLs with provenance.
pub fn load_manifest(content: &str) -> Result<ResultSet> {
    let mut results = ResultSet::new();
    if content.trim().is_empty() {
        return Ok(results);
    }

    let agencies: OrderedPairs<AgencyRecord> = serde_yaml::from_str(content)?;

    for (agency, record) in agencies.0 {
        debug!(agency = %agency, feeds = record.feeds.len(), "Reading agency");
        for feed in record.feeds {
            for (url_number, (url_type, url)) in feed.0.into_iter().enumerate() {
                let Some(url) = url.filter(|u| !u.is_empty()) else {
                    continue;
                };
                let provenance = Provenance {
                    url_type,
                    itp_id: record.itp_id.clone(),
                    url_number,
                };
                results.insert(url, CheckResult::new(Some(provenance)));
            }
        }
    }

    Ok(results)
}

#[derive(Debug, serde::Deserialize)]
struct AgencyRecord {
    itp_id: AgencyId,
    #[serde(default)]
    feeds: Vec<OrderedPairs<Option<String>>>,
}

/// A mapping read as `(key, value)` pairs in document order.
#[derive(Debug)]
pub struct OrderedPairs<V>(pub Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedPairs<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
            type Value = OrderedPairs<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    pairs.push((key, value));
                }
                Ok(OrderedPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor(PhantomData))
    }
}
