use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle stage of a tracked upload.
///
/// Transitions are strictly forward: `Uploading -> Validating -> Completed`
/// or `Uploading -> Validating -> Failed`. A record never re-enters an
/// earlier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    Uploading,
    Validating,
    Completed,
    Failed,
}

impl UploadStage {
    /// Label shown in the dashboard row for this stage.
    pub fn label(&self) -> &'static str {
        match self {
            UploadStage::Uploading => "Uploading...",
            UploadStage::Validating => "Validating...",
            UploadStage::Completed => "Completed",
            UploadStage::Failed => "Error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStage::Completed | UploadStage::Failed)
    }
}

/// One tracked file's upload/validation lifecycle entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: u64,
    pub mime_hint: String,
    pub stage: UploadStage,
    /// Percentage in [0, 100]; meaningful only while the record is in
    /// `Uploading` or `Validating`. Reset to 0 on the handoff to validation.
    pub progress: u8,
    /// Human-readable failure message, set only when `stage` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn new(name: String, size_bytes: u64, mime_hint: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            size_bytes,
            mime_hint,
            stage: UploadStage::Uploading,
            progress: 0,
            diagnostic: None,
            created_at: Utc::now(),
        }
    }
}
