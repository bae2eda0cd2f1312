use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{text_enum, Payment};

text_enum! {
    pub enum ProjectStatus {
        Lead => "Lead",
        Active => "Active",
        Completed => "Completed",
        OnHold => "On Hold",
    }
}

text_enum! {
    pub enum PackageType {
        Combo1 => "Combo 1",
        Combo2 => "Combo 2",
        Custom => "Custom",
    }
}

/// A production job for one client.
///
/// `progress` is stored as entered by the operator and can disagree with the
/// checklist; nothing recomputes it.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub client_id: String,
    pub title: String,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub package: PackageType,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub progress: i32,
    pub value: f64,
    #[sqlx(json)]
    pub payments: Vec<Payment>,
    #[sqlx(json)]
    pub checklist: Vec<ChecklistItem>,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub genre: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub is_completed: bool,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ChecklistItem {
    pub fn new(id: &str, label: &str, is_completed: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            is_completed,
            date: None,
        }
    }
}
