use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::results::Registry;
use crate::services::registry_api::{RegistryApi, RegistryRecord};

const PAGE_SIZE: u32 = 100;
const FEED_PAGE_BASE: &str = "https://www.transit.land/feeds";

#[derive(Deserialize)]
struct FeedsPage {
    #[serde(default)]
    feeds: Vec<Feed>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Deserialize)]
struct PageMeta {
    after: Option<i64>,
}

#[derive(Deserialize)]
struct Feed {
    onestop_id: String,
    #[serde(default)]
    urls: BTreeMap<String, serde_json::Value>,
}

impl Feed {
    /// Every URL the feed lists; `static_historic` and friends hold arrays.
    fn records(&self) -> impl Iterator<Item = RegistryRecord> + '_ {
        let page = format!("{}/{}", FEED_PAGE_BASE, self.onestop_id);
        self.urls
            .values()
            .flat_map(|value| match value {
                serde_json::Value::String(url) => vec![url.as_str()],
                serde_json::Value::Array(items) => {
                    items.iter().filter_map(|item| item.as_str()).collect()
                }
                _ => Vec::new(),
            })
            .filter(|url| !url.is_empty())
            .map(move |url| RegistryRecord::new(page.clone(), url))
    }
}

/// Reads feeds from the Transitland v2 REST API.
pub struct TransitlandClient<C> {
    http: C,
    base_url: String,
}

impl TransitlandClient<ApiKey<BasicClient>> {
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let http = ApiKey::new(BasicClient::new()?, "apikey", &config.transitland_api_key)?;
        Ok(Self::new(http, &config.transitland_base_url))
    }
}

impl<C: HttpClient> TransitlandClient<C> {
    pub fn new(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, after: Option<i64>) -> Result<url::Url> {
        let mut url = url::Url::parse(&format!("{}/api/v2/rest/feeds", self.base_url))
            .with_context(|| format!("Invalid Transitland base URL '{}'", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_SIZE.to_string());
        if let Some(after) = after {
            url.query_pairs_mut()
                .append_pair("after", &after.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> RegistryApi for TransitlandClient<C> {
    fn registry(&self) -> Registry {
        Registry::Transitland
    }

    #[tracing::instrument(skip(self), fields(registry = "transitland"))]
    async fn list_urls(&self) -> Result<Vec<RegistryRecord>> {
        let mut records = Vec::new();
        let mut after = None;
        let mut pages = 0;

        loop {
            let page: FeedsPage = fetch_json(&self.http, self.page_url(after)?).await?;
            pages += 1;
            debug!(page = pages, feeds = page.feeds.len(), "Transitland page fetched");

            for feed in &page.feeds {
                records.extend(feed.records());
            }

            let next = page.meta.and_then(|m| m.after);
            if page.feeds.is_empty() || next.is_none() || next == after {
                break;
            }
            after = next;
        }

        info!(pages, records = records.len(), "Transitland feed URLs fetched");
        Ok(records)
    }
}
