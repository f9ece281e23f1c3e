use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{dates, dedupe, recency_filter, sort_most_recent_first, within_window, NewsItem, NewsSource};
use crate::config::{SearchSettings, SerperConfig};
use crate::error::FetchError;

#[derive(Serialize, Debug)]
struct SearchRequest<'a> {
    q: &'a str,
    num: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    tbs: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub news: Vec<SearchHit>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub(crate) struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub source: String,
    pub date: String,
}

/// Client for the Serper news endpoint.
#[derive(Clone)]
pub struct SerperClient {
    client: Client,
    config: SerperConfig,
    num_results: u32,
}

impl SerperClient {
    pub fn new(config: SerperConfig, settings: &SearchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            num_results: settings.num_results,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/news", self.config.base_url.trim_end_matches('/'))
    }

    /// Raw search without post-processing, used by the health check.
    pub(crate) async fn search(&self, query: &str, num: u32, tbs: Option<String>) -> Result<SearchResponse, FetchError> {
        let body = SearchRequest {
            q: query,
            num,
            tbs: tbs.unwrap_or_default(),
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("X-API-KEY", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Map raw hits into a clean batch: drop link-less hits, dedupe, keep the
/// window, newest first.
pub(crate) fn collect_items(hits: Vec<SearchHit>, now: DateTime<Utc>, window: Duration) -> Vec<NewsItem> {
    let items: Vec<NewsItem> = hits
        .into_iter()
        .filter(|hit| !hit.link.trim().is_empty())
        .map(|hit| NewsItem {
            published_at: dates::parse_published(&hit.date, now),
            title: hit.title,
            snippet: hit.snippet,
            url: hit.link.trim().to_string(),
            source: hit.source,
        })
        .collect();

    let mut items: Vec<NewsItem> = dedupe(items)
        .into_iter()
        .filter(|item| within_window(item, now, window))
        .collect();
    sort_most_recent_first(&mut items);
    items
}

#[async_trait]
impl NewsSource for SerperClient {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn fetch(&self, query: &str, window: Duration) -> Result<Vec<NewsItem>, FetchError> {
        let tbs = recency_filter(window);
        info!(
            "🔎 [FETCH] Searching news (q='{}', num={}, tbs={})",
            query, self.num_results, tbs
        );

        let response = self.search(query, self.num_results, Some(tbs)).await?;
        let raw_count = response.news.len();
        let items = collect_items(response.news, Utc::now(), window);

        if raw_count != items.len() {
            warn!(
                "🧹 [FETCH] Dropped {} of {} results (duplicates, missing links or outside window)",
                raw_count - items.len(),
                raw_count
            );
        }

        if items.is_empty() {
            return Err(FetchError::EmptyResult {
                query: query.to_string(),
            });
        }

        info!("📰 [FETCH] {} unique articles", items.len());
        Ok(items)
    }
}
