use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum! {
    pub enum DocStatus {
        Draft => "Draft",
        Sent => "Sent",
        Viewed => "Viewed",
        Paid => "Paid",
        Overdue => "Overdue",
        Signed => "Signed",
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: DocStatus,
    pub due_date: NaiveDate,
    pub items: Vec<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
}
