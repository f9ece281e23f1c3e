//! Application-wide constants and defaults
//!
//! Centralizes endpoints, limits and tunable defaults so the rest of the
//! crate never hardcodes them.

/// Search API constants
pub mod search {
    /// Serper base URL (news lives under `/news`)
    pub const DEFAULT_BASE_URL: &str = "https://google.serper.dev";

    /// Default query, gold/silver plus the macro drivers that move them
    pub const DEFAULT_QUERY: &str = "gold silver price news Fed interest rate";

    /// Results requested per run
    pub const DEFAULT_NUM_RESULTS: u32 = 10;

    /// Lookback window for news
    pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
}

/// Agent orchestration constants
pub mod analysis {
    /// Articles handed to the agents per run
    pub const DEFAULT_MAX_ARTICLES: usize = 8;

    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Rationale used when there is nothing to analyze
    pub const INSUFFICIENT_DATA: &str = "insufficient data.";
}

/// LLM provider defaults (all OpenAI-compatible endpoints)
pub mod llm {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
    pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

    pub const GLM_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
    pub const GLM_MODEL: &str = "glm-4-flash";

    pub const OPENAI_MODEL: &str = "gpt-4o-mini";

    /// Env vars accepted as an LLM provider, in precedence order
    pub const PROVIDER_VARS: &str = "LLM_API_KEY, GLM_API_KEY, GEMINI_API_KEY, OPENAI_API_KEY";
}

/// Report rendering constants
pub mod report {
    pub const DEFAULT_TITLE: &str = "Gold-Silver Intelligence Report";

    /// Cited links rendered before collapsing into "...and N more"
    pub const DEFAULT_MAX_CITATIONS: usize = 5;

    /// Highlights rendered from the NewsHunter stage
    pub const MAX_HIGHLIGHTS: usize = 5;

    /// Rationale is truncated past this many characters
    pub const MAX_RATIONALE_CHARS: usize = 2000;

    pub const NO_SOURCES: &str = "No sources cited.";

    pub const NO_RATIONALE: &str = "No rationale given.";

    pub const DISCLAIMER: &str = "This is a reference analysis, not investment advice.";
}

/// Telegram Bot API constants
pub mod telegram {
    pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

    pub const DEFAULT_PARSE_MODE: &str = "HTML";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Hard limit imposed by the Bot API, in UTF-16 units of the parsed text
    pub const MAX_MESSAGE_CHARS: usize = 4096;
}

/// Config file location
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
