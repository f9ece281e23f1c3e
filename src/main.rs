use clap::Parser;
use gold_silver_intel::{
    build_pipeline,
    config::{AppConfig, CheckedConfig},
    constants, health, scheduler::PipelineScheduler, PipelineError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gold-silver-intel",
    about = "Gold-Silver Intelligence Agent - Market News Analyzer"
)]
struct Cli {
    /// Search query for news (defaults to search.query from the config file)
    #[arg(long)]
    query: Option<String>,

    /// Print the report without sending it to Telegram
    #[arg(long)]
    no_telegram: bool,

    /// Check API connectivity and exit
    #[arg(long)]
    health_check: bool,

    /// Run on a cron schedule (e.g. "0 0 */4 * * *") instead of once
    #[arg(long)]
    schedule: Option<String>,

    /// Path to the optional settings file
    #[arg(long, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Setup Logging (stdout is reserved for the report)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("🥇 Starting Gold-Silver Intelligence Agent...");

    if cli.health_check {
        // Missing credentials are reported as failed checks, not config errors
        let config = match CheckedConfig::load(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                error!("❌ {}", e);
                return ExitCode::FAILURE;
            }
        };
        let report = health::run_health_check(&config).await;
        return if report.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let deliver = !cli.no_telegram;
    let config = match AppConfig::load(&cli.config, deliver) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            return ExitCode::from(PipelineError::from(e).exit_code());
        }
    };
    info!("Loaded Configuration: {:?}", config);

    let mut pipeline = match build_pipeline(&config, cli.query, deliver) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("❌ {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    if let Some(cron) = cli.schedule.or_else(|| config.settings.schedule.clone()) {
        info!("📅 Scheduled mode: {}", cron);
        let scheduler = PipelineScheduler::new(pipeline);
        return match scheduler.run_until_shutdown(&cron).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("❌ {}", e);
                ExitCode::FAILURE
            }
        };
    }

    info!("🔎 Query: {}", pipeline.query());
    match pipeline.run().await {
        Ok(summary) => {
            println!("{}", summary.report.text);
            info!("✅ Analysis completed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
