use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::parser::{parse_highlights, parse_verdict};
use super::{AnalysisResult, Direction, MarketAnalyst};
use crate::agents::{Agent, MarketAnalystAgent, NewsHunterAgent};
use crate::error::AnalysisError;
use crate::llm::ChatModel;
use crate::news::NewsItem;

/// Two-agent analysis: the NewsHunter filters the batch, the MarketAnalyst
/// turns the filtered news into a verdict.
pub struct AgentAnalyst {
    llm: Arc<dyn ChatModel>,
    max_articles: usize,
    hunter: NewsHunterAgent,
    analyst: MarketAnalystAgent,
}

impl AgentAnalyst {
    pub fn new(llm: Arc<dyn ChatModel>, max_articles: usize) -> Self {
        Self {
            llm,
            max_articles: max_articles.max(1),
            hunter: NewsHunterAgent,
            analyst: MarketAnalystAgent,
        }
    }

    /// Numbered article list shared by both agents; numbers start at 1.
    pub fn format_articles(items: &[NewsItem]) -> String {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let published = item
                    .published_at
                    .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "unknown date".to_string());
                format!(
                    "[{}] 📰 {}\n    Source: {} | {}\n    {}\n    {}",
                    i + 1,
                    item.title.trim(),
                    item.source,
                    published,
                    item.snippet.trim(),
                    item.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Map 1-based citation numbers onto the batch. Repeats and numbers
    /// outside the batch are dropped.
    fn resolve_citations(numbers: &[usize], batch: &[NewsItem]) -> Vec<NewsItem> {
        let mut seen = HashSet::new();
        let mut cited = Vec::new();
        for &n in numbers {
            if !seen.insert(n) {
                continue;
            }
            match batch.get(n.wrapping_sub(1)) {
                Some(item) => cited.push(item.clone()),
                None => warn!(
                    "⚠️ [ANALYSIS] Ignoring citation [{}] outside the batch of {}",
                    n,
                    batch.len()
                ),
            }
        }
        cited
    }
}

#[async_trait]
impl MarketAnalyst for AgentAnalyst {
    async fn analyze(&self, items: &[NewsItem]) -> Result<AnalysisResult, AnalysisError> {
        if items.is_empty() {
            info!("⚪ [ANALYSIS] No articles to analyze; verdict is Neutral");
            return Ok(AnalysisResult::insufficient_data());
        }

        let batch = &items[..items.len().min(self.max_articles)];
        let articles = Self::format_articles(batch);
        info!("🧠 [ANALYSIS] Analyzing {} of {} articles", batch.len(), items.len());

        // 1. NewsHunter
        let hunter_input = format!("Analyze and filter the following news:\n\n{}", articles);
        let hunter_response = self.hunter.run(&hunter_input, self.llm.as_ref()).await?;
        let highlights = match parse_highlights(&hunter_response) {
            Ok(h) => h,
            Err(e) => {
                warn!("⚠️ [ANALYSIS] NewsHunter highlights unreadable, continuing without them: {}", e);
                Vec::new()
            }
        };

        // 2. MarketAnalyst
        let analyst_input = format!(
            "Filtered news from NewsHunter:\n{}\n\nArticle list (cite by number):\n\n{}\n\nAnalyze the gold/silver price trend.",
            hunter_response.trim(),
            articles
        );
        let analyst_response = self.analyst.run(&analyst_input, self.llm.as_ref()).await?;

        let verdict = parse_verdict(&analyst_response)?;
        let direction: Direction = verdict.direction.parse()?;
        let silver_direction = match verdict.silver_direction.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(s.parse::<Direction>()?),
            _ => None,
        };
        let rationale = verdict.rationale.trim().to_string();
        if rationale.is_empty() {
            return Err(AnalysisError::Parse("verdict has an empty rationale".to_string()));
        }

        let cited_items = Self::resolve_citations(&verdict.cited_numbers(), batch);
        let recommendation = verdict
            .recommendation
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        info!(
            "{} [ANALYSIS] Verdict: {} ({} sources cited)",
            direction.emoji(),
            direction,
            cited_items.len()
        );

        Ok(AnalysisResult {
            direction,
            silver_direction,
            rationale,
            confidence: verdict.normalized_confidence(),
            recommendation,
            highlights,
            cited_items,
        })
    }
}
