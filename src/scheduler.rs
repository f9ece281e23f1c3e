//! Cron-driven scheduled mode
//!
//! Triggers one pipeline run per cron tick. A tick that fires while the
//! previous run is still going is skipped, so runs never overlap.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info, warn};

use crate::error::ScheduleError;
use crate::pipeline::Pipeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    /// Carries the exit code the one-shot command would have returned
    Failed(u8),
    Skipped,
}

#[derive(Clone)]
pub struct PipelineScheduler {
    pipeline: Arc<Mutex<Pipeline>>,
}

impl PipelineScheduler {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
        }
    }

    /// One scheduled trigger.
    pub async fn tick(&self) -> TickOutcome {
        let mut pipeline = match self.pipeline.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("⏭️ [SCHEDULER] Previous run still in progress; skipping this tick");
                return TickOutcome::Skipped;
            }
        };

        match pipeline.run().await {
            Ok(_) => TickOutcome::Completed,
            Err(e) => TickOutcome::Failed(e.exit_code()),
        }
    }

    /// Register the cron job and start ticking.
    pub async fn start(&self, cron_expression: &str) -> Result<JobScheduler, ScheduleError> {
        let to_err = |source: JobSchedulerError| ScheduleError::Scheduler {
            cron: cron_expression.to_string(),
            source,
        };

        let scheduler = JobScheduler::new().await.map_err(to_err)?;

        let this = self.clone();
        let job = Job::new_async(cron_expression, move |_uuid, _l| {
            let this = this.clone();
            Box::pin(async move {
                info!("⏰ [SCHEDULER] Tick");
                match this.tick().await {
                    TickOutcome::Completed => info!("✅ [SCHEDULER] Scheduled run completed"),
                    TickOutcome::Failed(code) => {
                        error!("❌ [SCHEDULER] Scheduled run failed (exit code {})", code)
                    }
                    TickOutcome::Skipped => {}
                }
            })
        })
        .map_err(to_err)?;

        scheduler.add(job).await.map_err(to_err)?;
        scheduler.start().await.map_err(to_err)?;

        info!("🔔 [SCHEDULER] Cron job started with schedule: {}", cron_expression);
        Ok(scheduler)
    }

    /// Tick until Ctrl-C, then shut the scheduler down.
    pub async fn run_until_shutdown(&self, cron_expression: &str) -> Result<(), ScheduleError> {
        let mut scheduler = self.start(cron_expression).await?;

        tokio::signal::ctrl_c().await.map_err(ScheduleError::Signal)?;
        info!("🛑 [SCHEDULER] Shutdown requested");

        scheduler
            .shutdown()
            .await
            .map_err(|source| ScheduleError::Scheduler {
                cron: cron_expression.to_string(),
                source,
            })
    }
}
