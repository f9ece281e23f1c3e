//! News items and the fetch stage (NewsHunter role)
//!
//! A `NewsSource` issues one search per run and hands back a batch of
//! `NewsItem`s that is deduplicated and ordered most-recent first.

pub mod dates;
pub mod serper;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

use crate::error::FetchError;

pub use serper::SerperClient;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
    /// Publisher name as reported by the search API
    pub source: String,
    /// `None` when the API date could not be parsed
    pub published_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// One search scoped to `window`. Returns `FetchError::EmptyResult` when
    /// nothing survives filtering.
    async fn fetch(&self, query: &str, window: Duration) -> Result<Vec<NewsItem>, FetchError>;
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Drop repeated URLs and repeated titles (trimmed, case-folded). The first
/// occurrence wins.
pub fn dedupe(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen_urls = HashSet::new();
    let mut seen_titles = HashSet::new();

    items
        .into_iter()
        .filter(|item| {
            let title = normalize_title(&item.title);
            if seen_urls.contains(&item.url) || (!title.is_empty() && seen_titles.contains(&title)) {
                return false;
            }
            seen_urls.insert(item.url.clone());
            if !title.is_empty() {
                seen_titles.insert(title);
            }
            true
        })
        .collect()
}

/// Undated items are kept: the search API already applied its recency filter.
pub fn within_window(item: &NewsItem, now: DateTime<Utc>, window: Duration) -> bool {
    match item.published_at {
        Some(ts) => ts >= now - window,
        None => true,
    }
}

/// Stable sort, newest first, undated items last in their original order.
pub fn sort_most_recent_first(items: &mut [NewsItem]) {
    items.sort_by_key(|item| Reverse(item.published_at));
}

/// Serper `tbs` recency filter for a lookback window.
pub fn recency_filter(window: Duration) -> String {
    let hours = window.num_hours().max(1);
    if hours == 1 {
        return "qdr:h".to_string();
    }
    if hours % 24 == 0 {
        return match hours / 24 {
            1 => "qdr:d".to_string(),
            7 => "qdr:w".to_string(),
            days => format!("qdr:d{}", days),
        };
    }
    format!("qdr:h{}", hours)
}
