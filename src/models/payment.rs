use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub project_id: String,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
}
