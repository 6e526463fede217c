use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::UploadStage;
use crate::services::notify::Notifier;
use crate::services::registry::IngestRegistry;
use crate::services::validator::{DatasetValidator, Verdict};

/// Tick cadence and handoff delays for the two in-flight stages
#[derive(Debug, Clone)]
pub struct StageTiming {
    /// Upload phase tick interval
    pub upload_tick: Duration,
    /// Percentage points added per upload tick
    pub upload_step: u8,
    /// Delay between upload completion and validation start
    pub settle_delay: Duration,
    /// Validation phase tick interval
    pub validation_tick: Duration,
    /// Percentage points added per validation tick
    pub validation_step: u8,
    /// Delay before the pass/fail decision is taken
    pub decision_delay: Duration,
}

impl Default for StageTiming {
    fn default() -> Self {
        Self {
            upload_tick: Duration::from_millis(100),
            upload_step: 10,
            settle_delay: Duration::from_millis(1000),
            validation_tick: Duration::from_millis(200),
            validation_step: 20,
            decision_delay: Duration::from_millis(500),
        }
    }
}

impl From<&AppConfig> for StageTiming {
    fn from(config: &AppConfig) -> Self {
        Self {
            upload_tick: Duration::from_millis(config.upload_tick_ms),
            upload_step: config.upload_step.max(1),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            validation_tick: Duration::from_millis(config.validation_tick_ms),
            validation_step: config.validation_step.max(1),
            decision_delay: Duration::from_millis(config.decision_delay_ms),
        }
    }
}

/// Advances one record at a time through its lifecycle stages on a fixed
/// tick cadence. Each accepted upload gets its own task; tasks never
/// coordinate with each other.
///
/// A task owns nothing but the record id. Every tick resolves the id
/// through the registry at fire time, so a record removed mid-flight simply
/// stops receiving writes and its task winds down silently.
#[derive(Clone)]
pub struct StageDriver {
    registry: Arc<IngestRegistry>,
    validator: Arc<dyn DatasetValidator>,
    notifier: Notifier,
    timing: StageTiming,
}

impl StageDriver {
    pub fn new(
        registry: Arc<IngestRegistry>,
        validator: Arc<dyn DatasetValidator>,
        notifier: Notifier,
        timing: StageTiming,
    ) -> Self {
        Self {
            registry,
            validator,
            notifier,
            timing,
        }
    }

    /// Begin advancing the record with the given id on its own task
    pub fn start(&self, id: Uuid) -> JoinHandle<()> {
        let driver = self.clone();
        tokio::spawn(async move { driver.run(id).await })
    }

    async fn run(self, id: Uuid) {
        if !self
            .advance(id, UploadStage::Uploading, self.timing.upload_step, self.timing.upload_tick)
            .await
        {
            return;
        }

        // Transport-to-validator handoff: the progress bar starts over
        sleep(self.timing.settle_delay).await;
        if self
            .registry
            .update_in_stage(&id, UploadStage::Uploading, |r| {
                r.stage = UploadStage::Validating;
                r.progress = 0;
            })
            .is_none()
        {
            return;
        }
        tracing::debug!(%id, "upload settled, validating");

        if !self
            .advance(
                id,
                UploadStage::Validating,
                self.timing.validation_step,
                self.timing.validation_tick,
            )
            .await
        {
            return;
        }

        sleep(self.timing.decision_delay).await;
        self.resolve(id).await;
    }

    /// Runs one stage's tick loop until progress reaches 100%. Returns false
    /// when the record disappeared (user removal) and the task should stop.
    async fn advance(&self, id: Uuid, stage: UploadStage, step: u8, tick: Duration) -> bool {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; progress starts moving one
        // full period after entering the stage.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(record) = self.registry.update_in_stage(&id, stage, |r| {
                r.progress = r.progress.saturating_add(step).min(100);
            }) else {
                // Stale tick: the record was removed (or already moved on).
                // Expected race, not a fault.
                return false;
            };

            tracing::debug!(%id, stage = ?stage, progress = record.progress, "tick");
            if record.progress >= 100 {
                return true;
            }
        }
    }

    /// Final pass/fail decision. Runs at most once per record: the stage is
    /// re-checked as Validating under the registry lock at transition time,
    /// so a concurrent duplicate attempt finds the record already settled.
    async fn resolve(&self, id: Uuid) {
        let Some(record) = self.registry.get(&id) else {
            return;
        };
        if record.stage != UploadStage::Validating {
            return;
        }

        match self.validator.validate(&record).await {
            Verdict::Pass => {
                let settled = self
                    .registry
                    .update_in_stage(&id, UploadStage::Validating, |r| {
                        r.stage = UploadStage::Completed;
                    });
                if settled.is_some() {
                    tracing::info!(%id, name = %record.name, "dataset validated");
                    self.notifier.success(&record.name);
                }
            }
            Verdict::Fail { reason } => {
                let settled = self
                    .registry
                    .update_in_stage(&id, UploadStage::Validating, |r| {
                        r.stage = UploadStage::Failed;
                        r.diagnostic = Some(reason.clone());
                    });
                if settled.is_some() {
                    tracing::warn!(%id, name = %record.name, %reason, "dataset failed validation");
                }
            }
        }
    }
}
