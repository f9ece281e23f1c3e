//! Connectivity health check
//!
//! Validates the search key, the Telegram bot and the LLM credentials before
//! a real run. Each check is independent; a missing key fails only its own
//! check.

use tracing::{error, info, warn};

use crate::config::CheckedConfig;
use crate::news::SerperClient;
use crate::notify::TelegramNotifier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            ok: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            ok: false,
            detail: detail.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthReport {
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.ok)
    }
}

async fn check_search(config: &CheckedConfig) -> CheckResult {
    let serper = match &config.serper {
        Ok(serper) => serper.clone(),
        Err(e) => return CheckResult::fail("serper", e.to_string()),
    };
    let client = match SerperClient::new(serper, &config.settings.search) {
        Ok(client) => client,
        Err(e) => return CheckResult::fail("serper", e.to_string()),
    };

    match client.search("gold price", 1, None).await {
        Ok(resp) => CheckResult::pass("serper", format!("found {} news article(s)", resp.news.len())),
        Err(e) => CheckResult::fail("serper", e.to_string()),
    }
}

async fn check_telegram(config: &CheckedConfig) -> CheckResult {
    let telegram = match &config.telegram {
        Ok(telegram) => telegram.clone(),
        Err(e) => return CheckResult::fail("telegram", e.to_string()),
    };

    let notifier = match TelegramNotifier::new(telegram, &config.settings.telegram) {
        Ok(notifier) => notifier,
        Err(e) => return CheckResult::fail("telegram", e.to_string()),
    };

    match notifier.get_me().await {
        Ok(bot) => CheckResult::pass(
            "telegram",
            format!("@{}", bot.username.unwrap_or_else(|| bot.first_name.clone())),
        ),
        Err(e) => CheckResult::fail("telegram", e.to_string()),
    }
}

/// Reports which provider the precedence rules picked; no request is made.
fn check_llm(config: &CheckedConfig) -> CheckResult {
    match &config.llm {
        Ok(llm) => CheckResult::pass("llm", format!("{} configured (model: {})", llm.provider, llm.model)),
        Err(e) => CheckResult::fail("llm", e.to_string()),
    }
}

pub async fn run_health_check(config: &CheckedConfig) -> HealthReport {
    info!("🏥 [HEALTH] Gold-Silver Intelligence Agent - Health Check");

    let checks = vec![
        check_search(config).await,
        check_telegram(config).await,
        check_llm(config),
    ];

    for check in &checks {
        if check.ok {
            info!("✅ [HEALTH] {}: {}", check.name, check.detail);
        } else {
            error!("❌ [HEALTH] {}: {}", check.name, check.detail);
        }
    }

    let report = HealthReport { checks };
    if report.all_passed() {
        info!("✅ [HEALTH] All systems operational");
    } else {
        warn!("⚠️ [HEALTH] Completed with failures");
    }
    report
}
