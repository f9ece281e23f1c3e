//! Gold-Silver Intelligence - market news to Telegram alerts
//!
//! This library provides the news-to-alert pipeline: fetch gold/silver news,
//! analyze it with a two-agent LLM flow, render a report and deliver it.

pub mod agents;
pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod health;
pub mod llm;
pub mod news;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod scheduler;

// Re-export commonly used types
pub use analysis::{AnalysisResult, Direction, MarketAnalyst};
pub use config::AppConfig;
pub use error::PipelineError;
pub use news::{NewsItem, NewsSource};
pub use notify::Notifier;
pub use pipeline::{build_pipeline, Pipeline, RunState, RunSummary};
pub use report::{format_report, Report};

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod test_support;
