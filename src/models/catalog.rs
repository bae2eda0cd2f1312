use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::text_enum;

/// A package on the studio menu.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub includes: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LegalTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppPlan {
    pub id: String,
    pub name: String,
    pub price: String,
    pub features: Vec<String>,
    pub is_popular: bool,
}

text_enum! {
    pub enum SplitStatus {
        Draft => "Draft",
        Sent => "Sent",
        Signed => "Signed",
    }
}

/// Ownership shares of one track among its collaborators.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SplitSheet {
    pub id: String,
    pub project_id: String,
    pub track_title: String,
    pub status: SplitStatus,
    pub participants: Vec<SplitParticipant>,
    pub sent_at: Option<NaiveDate>,
    pub viewed_at: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SplitParticipant {
    pub name: String,
    pub role: String,
    /// Percentage of ownership.
    pub share: f64,
}

impl SplitSheet {
    pub fn total_share(&self) -> f64 {
        self.participants.iter().map(|p| p.share).sum()
    }
}
