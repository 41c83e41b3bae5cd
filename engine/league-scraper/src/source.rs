use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::types::StatType;

/// A page the orchestrator needs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageRequest {
    Standings,
    Stats { div_id: String, stat_type: StatType },
}

/// Fetches raw HTML for a page request
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<String>;
}

/// League site over HTTP
pub struct HttpPageSource {
    client: Client,
    standings_url: Url,
    stats_url: Url,
}

impl HttpPageSource {
    /// Create a new HTTP page source
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        let standings_url = Url::parse(&config.standings_url)
            .with_context(|| format!("Invalid standings URL: {}", config.standings_url))?;
        let stats_url = Url::parse(&config.stats_url)
            .with_context(|| format!("Invalid stats URL: {}", config.stats_url))?;

        Ok(Self { client, standings_url, stats_url })
    }

    /// URL for a page request
    pub fn url_for(&self, request: &PageRequest) -> Url {
        match request {
            PageRequest::Standings => self.standings_url.clone(),
            PageRequest::Stats { div_id, stat_type } => {
                let mut url = self.stats_url.clone();
                url.query_pairs_mut()
                    .append_pair("divID", div_id)
                    .append_pair("statType", stat_type.as_query());
                url
            }
        }
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<String> {
        let url = self.url_for(request);
        info!("Fetching data from: {}", url);

        let response =
            self.client.get(url.clone()).send().await.with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP request to {} failed with status: {}", url, response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Fetched HTML ({} bytes)", html.len());

        Ok(html)
    }
}

/// Canned pages keyed by request (for testing and offline runs)
#[derive(Debug, Default, Clone)]
pub struct StaticPageSource {
    pages: HashMap<PageRequest, String>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, request: PageRequest, html: impl Into<String>) -> Self {
        self.pages.insert(request, html.into());
        self
    }
}

#[async_trait::async_trait]
impl PageSource for StaticPageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<String> {
        self.pages
            .get(request)
            .cloned()
            .with_context(|| format!("No page available for {request:?}"))
    }
}
