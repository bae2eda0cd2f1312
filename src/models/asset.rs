use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum! {
    pub enum AssetKind {
        Instrumental => "Instrumental",
        VocalStems => "Vocal Stems",
        Demo => "Demo",
        Master => "Master",
        Video => "Video",
        Art => "Art",
    }
}

/// A file in a project's vault. `size` is display text such as "8.4 MB".
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub url: String,
    pub uploaded_at: NaiveDate,
    pub size: String,
}
