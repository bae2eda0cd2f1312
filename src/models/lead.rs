use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum! {
    pub enum LeadPlatform {
        WhatsApp => "WhatsApp",
        Messenger => "Messenger",
        Sms => "SMS",
    }
}

text_enum! {
    pub enum LeadStatus {
        Cold => "Cold",
        Warm => "Warm",
        Converted => "Converted",
        Lost => "Lost",
    }
}

/// A marketing contact that has not become a client. Converting one removes
/// it from the local list; no client record is derived from it.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeadIntake {
    pub id: String,
    pub name: String,
    pub source: String,
    pub date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub platform: LeadPlatform,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    pub initial_budget: Option<f64>,
}
