//! Test doubles for the pipeline seams.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::analysis::{AnalysisResult, Direction, MarketAnalyst};
use crate::error::{AnalysisError, DeliveryError, FetchError, LlmError};
use crate::llm::ChatModel;
use crate::news::{NewsItem, NewsSource};
use crate::notify::Notifier;

pub fn news_item(n: usize) -> NewsItem {
    NewsItem {
        title: format!("Gold headline {}", n),
        snippet: format!("Snippet {}", n),
        url: format!("https://news.example.com/gold/{}", n),
        source: "Example Wire".to_string(),
        published_at: Some(Utc::now() - Duration::hours(n as i64)),
    }
}

pub fn news_batch(count: usize) -> Vec<NewsItem> {
    (1..=count).map(news_item).collect()
}

pub enum SourceBehavior {
    Items(Vec<NewsItem>),
    Empty,
    Http(u16),
}

pub struct StubSource {
    behavior: SourceBehavior,
    pub calls: AtomicUsize,
}

impl StubSource {
    pub fn new(behavior: SourceBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NewsSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, query: &str, _window: Duration) -> Result<Vec<NewsItem>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            SourceBehavior::Items(items) => Ok(items.clone()),
            SourceBehavior::Empty => Err(FetchError::EmptyResult {
                query: query.to_string(),
            }),
            SourceBehavior::Http(status) => Err(FetchError::Http {
                status: *status,
                body: "upstream error".to_string(),
            }),
        }
    }
}

/// Analyst that answers with a fixed direction and cites every item, or fails.
pub struct StubAnalyst {
    direction: Option<Direction>,
    pub calls: AtomicUsize,
    pub seen_batch_sizes: Mutex<Vec<usize>>,
}

impl StubAnalyst {
    pub fn returning(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            calls: AtomicUsize::new(0),
            seen_batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            direction: None,
            calls: AtomicUsize::new(0),
            seen_batch_sizes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketAnalyst for StubAnalyst {
    async fn analyze(&self, items: &[NewsItem]) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_batch_sizes.lock().unwrap().push(items.len());

        let direction = self
            .direction
            .ok_or_else(|| AnalysisError::Parse("stub analyst refuses".to_string()))?;
        if items.is_empty() {
            return Ok(AnalysisResult::insufficient_data());
        }

        Ok(AnalysisResult {
            direction,
            silver_direction: None,
            rationale: "Dovish Fed and a weaker dollar.".to_string(),
            confidence: Some(0.7),
            recommendation: None,
            highlights: Vec::new(),
            cited_items: items.to_vec(),
        })
    }
}

/// Notifier that records each message, optionally rejecting with a status.
pub struct RecordingNotifier {
    reject_with: Option<u16>,
    pub attempts: AtomicUsize,
    pub sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn accepting() -> Self {
        Self {
            reject_with: None,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            ..Self::accepting()
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.reject_with {
            return Err(DeliveryError::Rejected {
                status,
                description: "Forbidden: bot is not a member of the chat".to_string(),
            });
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Chat model that answers by agent: the NewsHunter gets `hunter_reply`,
/// the MarketAnalyst gets `analyst_reply`. `None` makes that agent's call fail.
pub struct ScriptedChat {
    hunter_reply: Option<String>,
    analyst_reply: Option<String>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedChat {
    pub fn new(hunter_reply: Option<&str>, analyst_reply: Option<&str>) -> Self {
        Self {
            hunter_reply: hunter_reply.map(str::to_string),
            analyst_reply: analyst_reply.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, system_prompt: &str, user_input: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_input.to_string()));

        let reply = if system_prompt.contains("You are NewsHunter") {
            &self.hunter_reply
        } else {
            &self.analyst_reply
        };
        reply.clone().ok_or(LlmError::EmptyResponse)
    }
}
