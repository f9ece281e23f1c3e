//! Custom error types for the news-to-alert pipeline
//!
//! Every stage returns its own typed error; `PipelineError` aggregates them so
//! the driver can compose stages with `?`.

use thiserror::Error;

/// Missing or invalid configuration. Raised before any network call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("No LLM provider configured (set one of: {0})")]
    NoLlmProvider(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Search API errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Search API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Search API unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed search response: {0}")]
    Decode(String),

    /// Non-fatal: the driver continues with an empty batch.
    #[error("No news matched query '{query}'")]
    EmptyResult { query: String },
}

impl FetchError {
    pub fn is_empty_result(&self) -> bool {
        matches!(self, FetchError::EmptyResult { .. })
    }
}

/// Chat-completion transport errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("LLM returned no choices")]
    EmptyResponse,
}

/// Agent orchestration errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{agent} failed: {source}")]
    Llm {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("Unparseable analyst response: {0}")]
    Parse(String),
}

/// Telegram delivery errors
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram rejected message (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("Telegram unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

/// Scheduled-mode errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Scheduler error for '{cron}': {source}")]
    Scheduler {
        cron: String,
        #[source]
        source: tokio_cron_scheduler::JobSchedulerError,
    },

    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

/// Top-level run errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

impl PipelineError {
    /// Process exit status for this failure. Always non-zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Config(_) => 2,
            PipelineError::Fetch(_) => 3,
            PipelineError::Analysis(_) => 4,
            PipelineError::Delivery(_) => 5,
        }
    }
}
