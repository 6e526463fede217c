use std::convert::Infallible;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::models::{UploadRecord, UploadStage};
use crate::services::intake::DatasetCandidate;
use crate::services::notify::Notification;
use crate::utils::validation::format_file_size;

/// One dashboard row: an upload record enriched with display fields
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: u64,
    pub size_display: String,
    pub stage: UploadStage,
    pub stage_label: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// Success affordance: the record can be handed to the processing subsystem
    pub ready_for_processing: bool,
}

impl From<UploadRecord> for DatasetRow {
    fn from(record: UploadRecord) -> Self {
        Self {
            id: record.id,
            size_display: format_file_size(record.size_bytes),
            stage_label: record.stage.label().to_string(),
            ready_for_processing: record.stage == UploadStage::Completed,
            name: record.name,
            size_bytes: record.size_bytes,
            stage: record.stage,
            progress: record.progress,
            diagnostic: record.diagnostic,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectedUpload {
    pub file_name: String,
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub accepted: Vec<DatasetRow>,
    pub rejected: Vec<RejectedUpload>,
}

#[utoipa::path(
    post,
    path = "/datasets/upload",
    request_body(content = Multipart, description = "One or more dataset files"),
    responses(
        (status = 200, description = "Per-file intake outcome", body = SubmitResponse),
        (status = 400, description = "Malformed multipart request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "datasets"
)]
pub async fn upload_datasets(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, (StatusCode, String)> {
    let mut candidates = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let mime_hint = field.content_type().map(|s| s.to_string());

        // Drain the body to count it; content is never parsed or stored
        let mut size_bytes: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
        {
            size_bytes += chunk.len() as u64;
        }

        candidates.push(DatasetCandidate {
            file_name,
            size_bytes,
            mime_hint,
        });
    }

    if candidates.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No file provided".to_string()));
    }

    let outcome = state.intake.submit(candidates);

    Ok(Json(SubmitResponse {
        accepted: outcome.accepted.into_iter().map(Into::into).collect(),
        rejected: outcome
            .rejected
            .into_iter()
            .map(|r| RejectedUpload {
                file_name: r.file_name,
                reason: r.reason,
            })
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/datasets",
    responses(
        (status = 200, description = "All records in display order", body = [DatasetRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "datasets"
)]
pub async fn list_datasets(State(state): State<AppState>) -> Json<Vec<DatasetRow>> {
    Json(state.registry.list().into_iter().map(Into::into).collect())
}

#[utoipa::path(
    delete,
    path = "/datasets/{id}",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 204, description = "Record removed"),
        (status = 404, description = "Unknown record id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "datasets"
)]
pub async fn remove_dataset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.registry.remove(&id) {
        tracing::info!(%id, "dataset removed by user");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Dataset not found".to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/datasets/notifications",
    responses(
        (status = 200, description = "Server-sent event stream of intake and completion notices"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "datasets"
)]
pub async fn notification_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.notifier.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(notification) => {
                    if let Ok(event) = event_for(&notification) {
                        yield Ok(event);
                    }
                }
                // A slow consumer skips what it missed; notifications are
                // fire-and-forget, not a ledger
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "notification subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn event_for(notification: &Notification) -> Result<Event, axum::Error> {
    Event::default().json_data(notification)
}
