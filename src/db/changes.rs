use serde::Deserialize;
use sqlx::postgres::PgListener;
use tokio::sync::mpsc;

use super::{Database, StoreError};

/// Notification channel a trigger on `projects` publishes to.
pub const PROJECTS_CHANNEL: &str = "studio_projects_changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
}

#[derive(Deserialize)]
struct Payload {
    table: Option<String>,
    op: Option<String>,
}

impl ChangeEvent {
    /// Parse a trigger payload such as `{"table":"projects","op":"UPDATE"}`.
    /// Anything unreadable still counts as a change to `projects`.
    pub fn from_payload(payload: &str) -> Self {
        let parsed: Option<Payload> = serde_json::from_str(payload).ok();
        let (table, op) = match parsed {
            Some(p) => (p.table, p.op),
            None => (None, None),
        };

        let kind = match op.as_deref().map(str::to_ascii_uppercase).as_deref() {
            Some("INSERT") => ChangeKind::Insert,
            Some("UPDATE") => ChangeKind::Update,
            Some("DELETE") => ChangeKind::Delete,
            _ => ChangeKind::Unknown,
        };

        Self {
            table: table.unwrap_or_else(|| "projects".to_string()),
            kind,
        }
    }
}

/// Start listening for changes to `projects`.
///
/// The listener runs until the returned receiver is dropped. Reconnection is
/// whatever `PgListener` does on its own.
pub async fn subscribe_projects(db: &Database) -> Result<mpsc::Receiver<ChangeEvent>, StoreError> {
    let mut listener = PgListener::connect_with(db.get_pool()).await?;
    listener.listen(PROJECTS_CHANNEL).await?;

    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => {
                    tracing::debug!("projects subscription released");
                    break;
                }
                notification = listener.recv() => match notification {
                    Ok(notification) => {
                        let event = ChangeEvent::from_payload(notification.payload());
                        tracing::debug!(table = %event.table, kind = ?event.kind, "change notification");
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "projects listener stopped");
                        break;
                    }
                }
            }
        }
    });

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_payloads_map_to_change_kinds() {
        let event = ChangeEvent::from_payload(r#"{"table":"projects","op":"UPDATE"}"#);
        assert_eq!(event.kind, ChangeKind::Update);
        assert_eq!(event.table, "projects");

        assert_eq!(ChangeEvent::from_payload(r#"{"op":"delete"}"#).kind, ChangeKind::Delete);
        assert_eq!(ChangeEvent::from_payload(r#"{"op":"INSERT"}"#).kind, ChangeKind::Insert);
    }

    #[test]
    fn unreadable_payloads_are_unknown_changes() {
        let event = ChangeEvent::from_payload("not json");
        assert_eq!(event.kind, ChangeKind::Unknown);
        assert_eq!(event.table, "projects");

        assert_eq!(ChangeEvent::from_payload(r#"{"op":"TRUNCATE"}"#).kind, ChangeKind::Unknown);
    }
}
