use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{text_enum, Message, ProjectStatus};

text_enum! {
    pub enum Brand {
        CantiRecords => "Canti Records",
        CantiMedia => "Canti Media",
    }
}

text_enum! {
    pub enum EventKind {
        Message => "message",
        Milestone => "milestone",
        Payment => "payment",
        Document => "document",
        Asset => "asset",
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
    pub email: String,
    pub phone: String,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub bio: Option<String>,
    pub whatsapp_link: String,
    pub source: String,
    #[sqlx(try_from = "String")]
    pub brand: Brand,
    pub genre_tags: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub last_contact_date: NaiveDate,
    pub avatar_url: String,
    #[sqlx(json)]
    pub conversations: Vec<Message>,
    #[sqlx(json)]
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub icon: String,
}

impl Client {
    /// Alias when one is set, otherwise the full name.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}
