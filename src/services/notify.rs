use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

/// User-facing toast events emitted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notification {
    /// A candidate file failed the intake allow-list
    #[serde(rename_all = "camelCase")]
    Rejection { file_name: String, message: String },
    /// A dataset finished the pipeline successfully
    #[serde(rename_all = "camelCase")]
    Success { file_name: String, message: String },
}

impl Notification {
    pub fn file_name(&self) -> &str {
        match self {
            Notification::Rejection { file_name, .. } => file_name,
            Notification::Success { file_name, .. } => file_name,
        }
    }
}

/// Fire-and-forget notification channel. Nobody listening is fine; sends
/// are never awaited and never fail the pipeline.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn rejection(&self, file_name: &str, message: &str) {
        self.emit(Notification::Rejection {
            file_name: file_name.to_string(),
            message: message.to_string(),
        });
    }

    pub fn success(&self, file_name: &str) {
        self.emit(Notification::Success {
            file_name: file_name.to_string(),
            message: format!("{} has been processed successfully.", file_name),
        });
    }

    fn emit(&self, notification: Notification) {
        tracing::debug!(?notification, "emitting notification");
        let _ = self.tx.send(notification);
    }
}
