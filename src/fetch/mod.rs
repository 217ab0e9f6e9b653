mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Issues a GET for `url` and decodes the JSON response body.
///
/// Non-success statuses are returned as errors carrying the response body.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: url::Url,
) -> Result<T> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;

    let status = resp.status();
    debug!(%url, %status, "Response received");
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("API returned status {}: {}", status, body));
    }

    resp.json()
        .await
        .with_context(|| format!("Failed to parse response from {url}"))
}
