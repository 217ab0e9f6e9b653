//! Summary printing and JSON report output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::results::ResultSet;

/// Matched/missing partition of a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub matched: usize,
    /// URLs found in neither registry, in report order.
    pub missing: Vec<String>,
}

impl Summary {
    pub fn from_results(results: &ResultSet) -> Self {
        let missing: Vec<String> = results
            .iter()
            .filter(|(_, entry)| !entry.is_found())
            .map(|(url, _)| url.to_string())
            .collect();

        Self {
            total: results.len(),
            matched: results.len() - missing.len(),
            missing,
        }
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Writes the listing of missing URLs when `verbose` and any are
    /// missing, otherwise the one-line found count.
    pub fn write_to<W: Write>(&self, out: &mut W, verbose: bool) -> std::io::Result<()> {
        if verbose && self.has_missing() {
            writeln!(out, "Unable to find {}/{} urls:", self.missing.len(), self.total)?;
            for url in &self.missing {
                writeln!(out, "{url}")?;
            }
        } else {
            writeln!(out, "Found {}/{} urls were found", self.matched, self.total)?;
        }
        Ok(())
    }
}

/// Serializes the full result set as JSON indented with four spaces.
pub fn write_json<W: Write>(out: W, results: &ResultSet) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(out, formatter);
    results.serialize(&mut serializer)?;
    Ok(())
}

/// Writes the JSON report to `path`.
pub fn save_json(path: &Path, results: &ResultSet) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, results)
        .with_context(|| format!("Failed to write report file {}", path.display()))?;
    writer.flush()?;

    info!(path = %path.display(), entries = results.len(), "JSON report written");
    Ok(())
}
