//! Orchestration: load candidates, then match them against each registry.

use anyhow::Result;
use tracing::info;

use crate::input::InputSource;
use crate::matcher::match_registry;
use crate::results::ResultSet;
use crate::services::registry_api::RegistryApi;

/// Loads the candidates from `source` and checks them against every
/// registry, in the given order. Registry errors abort the check.
#[tracing::instrument(skip(registries), fields(registries = registries.len()))]
pub async fn check(source: &InputSource, registries: &[&dyn RegistryApi]) -> Result<ResultSet> {
    let mut results = source.load()?;

    for api in registries {
        info!(registry = %api.registry(), "Fetching registry feed URLs");
        match_registry(&mut results, *api).await?;
    }

    Ok(results)
}
