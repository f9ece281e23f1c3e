//! Market analysis stage (MarketAnalyst role)

pub mod orchestrator;
pub mod parser;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants;
use crate::error::AnalysisError;
use crate::news::NewsItem;

pub use orchestrator::AgentAnalyst;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::Bullish => "🟢",
            Direction::Bearish => "🔴",
            Direction::Neutral => "⚪",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
            Direction::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullish" | "up" | "long" => Ok(Direction::Bullish),
            "bearish" | "down" | "short" => Ok(Direction::Bearish),
            "neutral" | "sideways" | "mixed" => Ok(Direction::Neutral),
            other => Err(AnalysisError::Parse(format!("unknown direction '{}'", other))),
        }
    }
}

/// Verdict for one fetch batch. `cited_items` only ever holds items from that
/// batch, in the order the analyst cited them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Gold trend, the headline call
    pub direction: Direction,
    pub silver_direction: Option<Direction>,
    pub rationale: String,
    /// 0.0 to 1.0
    pub confidence: Option<f64>,
    pub recommendation: Option<String>,
    /// Key headlines kept by the NewsHunter
    pub highlights: Vec<String>,
    pub cited_items: Vec<NewsItem>,
}

impl AnalysisResult {
    pub fn insufficient_data() -> Self {
        Self {
            direction: Direction::Neutral,
            silver_direction: None,
            rationale: constants::analysis::INSUFFICIENT_DATA.to_string(),
            confidence: None,
            recommendation: None,
            highlights: Vec::new(),
            cited_items: Vec::new(),
        }
    }
}

#[async_trait]
pub trait MarketAnalyst: Send + Sync {
    /// Classify a batch. An empty batch yields `AnalysisResult::insufficient_data()`.
    async fn analyze(&self, items: &[NewsItem]) -> Result<AnalysisResult, AnalysisError>;
}
