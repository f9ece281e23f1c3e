//! Pipeline driver
//!
//! Runs Fetch → Analyze → Format → Notify once per call. Any stage failure
//! moves the run straight to `Failed`; nothing is delivered for a failed run.

use chrono::{Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::{AgentAnalyst, AnalysisResult, MarketAnalyst};
use crate::config::{AppConfig, ReportSettings};
use crate::error::PipelineError;
use crate::llm::LLMClient;
use crate::news::{NewsSource, SerperClient};
use crate::notify::{Notifier, TelegramNotifier};
use crate::report::{format_report, Report};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    Analyzing,
    Formatting,
    Notifying,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything one successful run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub items_fetched: usize,
    pub analysis: AnalysisResult,
    pub report: Report,
    /// False when delivery is disabled
    pub delivered: bool,
}

pub struct Pipeline {
    source: Arc<dyn NewsSource>,
    analyst: Arc<dyn MarketAnalyst>,
    notifier: Option<Arc<dyn Notifier>>,
    query: String,
    window: Duration,
    report_settings: ReportSettings,
    state: RunState,
    trail: Vec<RunState>,
}

impl Pipeline {
    /// `notifier: None` disables delivery; the run ends after formatting.
    pub fn new(
        source: Arc<dyn NewsSource>,
        analyst: Arc<dyn MarketAnalyst>,
        notifier: Option<Arc<dyn Notifier>>,
        query: impl Into<String>,
        window: Duration,
        report_settings: ReportSettings,
    ) -> Self {
        Self {
            source,
            analyst,
            notifier,
            query: query.into(),
            window,
            report_settings,
            state: RunState::Idle,
            trail: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// States visited by the most recent run, excluding the initial `Idle`.
    pub fn last_trail(&self) -> &[RunState] {
        &self.trail
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    fn transition(&mut self, next: RunState) {
        info!("🔁 [PIPELINE] {} -> {}", self.state, next);
        self.state = next;
        self.trail.push(next);
    }

    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        self.trail.clear();

        let span = info_span!("run", %run_id);
        let result = self.execute(run_id).instrument(span).await;

        match &result {
            Ok(summary) => {
                self.transition(RunState::Done);
                info!(
                    "✅ [PIPELINE] Run {} completed ({} articles, delivered: {})",
                    run_id, summary.items_fetched, summary.delivered
                );
            }
            Err(e) => {
                self.transition(RunState::Failed);
                error!("❌ [PIPELINE] Run {} failed: {}", run_id, e);
            }
        }

        self.state = RunState::Idle;
        result
    }

    async fn execute(&mut self, run_id: Uuid) -> Result<RunSummary, PipelineError> {
        self.transition(RunState::Fetching);
        info!("🚀 [PIPELINE] Fetching news from {}...", self.source.name());
        let items = match self.source.fetch(&self.query, self.window).await {
            Ok(items) => items,
            Err(e) if e.is_empty_result() => {
                warn!("📭 [PIPELINE] {}; continuing with an empty batch", e);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        self.transition(RunState::Analyzing);
        let analysis = self.analyst.analyze(&items).await?;

        self.transition(RunState::Formatting);
        let report = format_report(&analysis, &self.report_settings, Utc::now());

        let delivered = match self.notifier.clone() {
            Some(notifier) => {
                self.transition(RunState::Notifying);
                notifier.send(&report.text).await?;
                true
            }
            None => {
                info!("🔕 [PIPELINE] Delivery disabled; skipping notification");
                false
            }
        };

        Ok(RunSummary {
            run_id,
            items_fetched: items.len(),
            analysis,
            report,
            delivered,
        })
    }
}

/// Wire the production collaborators from configuration.
pub fn build_pipeline(
    config: &AppConfig,
    query_override: Option<String>,
    deliver: bool,
) -> Result<Pipeline, PipelineError> {
    let settings = &config.settings;

    let source = SerperClient::new(config.serper.clone(), &settings.search)?;

    info!(
        "🤖 Using LLM provider {} (model: {})",
        config.llm.provider, config.llm.model
    );
    let llm = LLMClient::from_config(&config.llm, settings.analysis.temperature);
    let analyst = AgentAnalyst::new(Arc::new(llm), settings.analysis.max_articles);

    let notifier: Option<Arc<dyn Notifier>> = if deliver {
        let telegram = config.telegram()?.clone();
        Some(Arc::new(TelegramNotifier::new(telegram, &settings.telegram)?))
    } else {
        None
    };

    let query = query_override
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| settings.search.query.clone());

    Ok(Pipeline::new(
        Arc::new(source),
        Arc::new(analyst),
        notifier,
        query,
        Duration::hours(i64::from(settings.search.lookback_hours)),
        settings.report.clone(),
    ))
}
