use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::results::Registry;
use crate::services::registry_api::{RegistryApi, RegistryRecord};

const PAGE_SIZE: u32 = 100;
const FEED_PAGE_BASE: &str = "https://transitfeeds.com/p";

#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    results: Option<FeedsPage>,
}

#[derive(Deserialize)]
struct FeedsPage {
    #[serde(rename = "numPages", default)]
    num_pages: u32,
    #[serde(default)]
    feeds: Vec<Feed>,
}

#[derive(Deserialize)]
struct Feed {
    id: String,
    #[serde(default)]
    u: Option<FeedUrls>,
}

/// `d` is the download URL, `i` the provider's info page.
#[derive(Deserialize)]
struct FeedUrls {
    #[serde(default)]
    d: Option<String>,
}

impl Feed {
    fn record(&self) -> Option<RegistryRecord> {
        let url = self.u.as_ref()?.d.as_deref().filter(|d| !d.is_empty())?;
        Some(RegistryRecord::new(
            format!("{}/{}", FEED_PAGE_BASE, self.id),
            url,
        ))
    }
}

/// Reads feeds from the TransitFeeds (OpenMobilityData) v1 API.
pub struct TransitFeedsClient<C> {
    http: C,
    base_url: String,
}

impl TransitFeedsClient<UrlParam<BasicClient>> {
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let http = UrlParam {
            inner: BasicClient::new()?,
            param_name: "key".to_string(),
            key: config.transitfeeds_api_key.clone(),
        };
        Ok(Self::new(http, &config.transitfeeds_base_url))
    }
}

impl<C: HttpClient> TransitFeedsClient<C> {
    pub fn new(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, page: u32) -> Result<url::Url> {
        let mut url = url::Url::parse(&format!("{}/v1/getFeeds", self.base_url))
            .with_context(|| format!("Invalid TransitFeeds base URL '{}'", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> RegistryApi for TransitFeedsClient<C> {
    fn registry(&self) -> Registry {
        Registry::TransitFeeds
    }

    #[tracing::instrument(skip(self), fields(registry = "transitfeeds"))]
    async fn list_urls(&self) -> Result<Vec<RegistryRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let envelope: Envelope = fetch_json(&self.http, self.page_url(page)?).await?;
            if envelope.status != "OK" {
                return Err(anyhow!(
                    "TransitFeeds returned status {}: {}",
                    envelope.status,
                    envelope.msg.unwrap_or_default()
                ));
            }
            let Some(results) = envelope.results else {
                break;
            };
            debug!(
                page,
                num_pages = results.num_pages,
                feeds = results.feeds.len(),
                "TransitFeeds page fetched"
            );

            records.extend(results.feeds.iter().filter_map(Feed::record));

            if page >= results.num_pages {
                break;
            }
            page += 1;
        }

        info!(pages = page, records = records.len(), "TransitFeeds feed URLs fetched");
        Ok(records)
    }
}
