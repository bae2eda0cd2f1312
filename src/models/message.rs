use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum! {
    pub enum Sender {
        Client => "client",
        Operator => "operator",
    }
}

text_enum! {
    pub enum Platform {
        WhatsApp => "WhatsApp",
        Messenger => "Messenger",
        Instagram => "Instagram",
        Email => "Email",
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub client_id: String,
    #[sqlx(try_from = "String")]
    pub sender: Sender,
    pub text: String,
    #[sqlx(rename = "created_at")]
    pub timestamp: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
}
