//! Optimistic writes: the entry is returned for immediate display and the
//! insert runs in the background. A failed insert leaves the local entry in
//! place and posts one notice.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::Store;
use crate::metrics::plain_amount;
use crate::models::{Message, Payment, Platform, Sender};
use crate::notice::Notifier;

pub const MESSAGE_SYNCED: &str = "Log Entry Synced to DB";
pub const MESSAGE_SYNC_FAILED: &str = "Sync Error: Logging locally only";
pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Studio Session Pay";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("Message text is empty")]
    EmptyMessage,

    #[error("Payment amount must be greater than zero")]
    InvalidAmount,
}

/// A locally applied entry and the background insert backing it.
///
/// The handle resolves to whether the insert reached the store.
pub struct PendingWrite<T> {
    pub entry: T,
    pub handle: JoinHandle<bool>,
}

/// Log an operator message against a client.
pub fn log_message<S: Store>(
    store: Arc<S>,
    notifier: &Notifier,
    client_id: &str,
    text: &str,
) -> Result<PendingWrite<Message>, WriteError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WriteError::EmptyMessage);
    }

    let message = Message {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        sender: Sender::Operator,
        text: text.to_string(),
        timestamp: Utc::now(),
        platform: Platform::WhatsApp,
    };

    let notifier = notifier.clone();
    let row = message.clone();
    let handle = tokio::spawn(async move {
        match store.insert_message(&row).await {
            Ok(()) => {
                notifier.success(MESSAGE_SYNCED);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, client_id = %row.client_id, "message insert failed");
                notifier.warning(MESSAGE_SYNC_FAILED);
                false
            }
        }
    });

    Ok(PendingWrite {
        entry: message,
        handle,
    })
}

/// Record a payment against a project. A blank description becomes
/// [`DEFAULT_PAYMENT_DESCRIPTION`].
pub fn log_payment<S: Store>(
    store: Arc<S>,
    notifier: &Notifier,
    project_id: &str,
    amount: f64,
    description: &str,
) -> Result<PendingWrite<Payment>, WriteError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(WriteError::InvalidAmount);
    }

    let description = match description.trim() {
        "" => DEFAULT_PAYMENT_DESCRIPTION,
        d => d,
    };
    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        project_id: project_id.to_string(),
        amount,
        description: description.to_string(),
        date: Utc::now(),
    };

    let notifier = notifier.clone();
    let row = payment.clone();
    let handle = tokio::spawn(async move {
        match store.insert_payment(&row).await {
            Ok(()) => {
                notifier.success(format!(
                    "Payment of ${} Recorded securely in DB",
                    plain_amount(row.amount)
                ));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, project_id = %row.project_id, "payment insert failed");
                notifier.error(format!("Error: {e}"));
                false
            }
        }
    });

    Ok(PendingWrite {
        entry: payment,
        handle,
    })
}
