use std::sync::Arc;

use crate::models::UploadRecord;
use crate::services::driver::StageDriver;
use crate::services::notify::Notifier;
use crate::services::registry::IngestRegistry;
use crate::utils::validation::{check_dataset_format, sanitize_filename};

/// One candidate file captured at the HTTP boundary. Only metadata survives
/// the request; the body bytes are drained and never retained.
#[derive(Debug, Clone)]
pub struct DatasetCandidate {
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_hint: Option<String>,
}

/// A candidate that failed the allow-list, with the user-facing reason
#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub file_name: String,
    pub reason: String,
}

/// Per-file fan of one submitted batch
#[derive(Debug, Default)]
pub struct IntakeOutcome {
    pub accepted: Vec<UploadRecord>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Accepts candidate batches, applies the format allow-list, and starts the
/// pipeline for each accepted file.
pub struct IntakeGateway {
    registry: Arc<IngestRegistry>,
    driver: StageDriver,
    notifier: Notifier,
}

impl IntakeGateway {
    pub fn new(registry: Arc<IngestRegistry>, driver: StageDriver, notifier: Notifier) -> Self {
        Self {
            registry,
            driver,
            notifier,
        }
    }

    /// Single entry point for every input modality. Acceptance is per-file
    /// and independent: a rejected candidate never blocks its siblings.
    pub fn submit(&self, candidates: Vec<DatasetCandidate>) -> IntakeOutcome {
        let mut outcome = IntakeOutcome::default();

        for candidate in candidates {
            let name = match sanitize_filename(&candidate.file_name) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(file = %candidate.file_name, "rejected upload: {}", e);
                    self.notifier.rejection(&candidate.file_name, &e.to_string());
                    outcome.rejected.push(RejectedCandidate {
                        file_name: candidate.file_name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if let Err(e) = check_dataset_format(&name, candidate.mime_hint.as_deref()) {
                tracing::warn!(file = %name, "rejected upload: {}", e);
                self.notifier.rejection(&name, &e.to_string());
                outcome.rejected.push(RejectedCandidate {
                    file_name: name,
                    reason: e.to_string(),
                });
                continue;
            }

            let record = UploadRecord::new(
                name,
                candidate.size_bytes,
                candidate
                    .mime_hint
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            );
            tracing::info!(
                id = %record.id,
                name = %record.name,
                size = record.size_bytes,
                "accepted dataset upload"
            );
            self.registry.insert(record.clone());
            self.driver.start(record.id);
            outcome.accepted.push(record);
        }

        outcome
    }
}
