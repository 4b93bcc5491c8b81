use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Validate for Announcement {
    const ENTITY: &'static str = "announcement";

    fn validate(&self) -> Result<(), String> {
        require(&self.id, "id")?;
        require(&self.title, "title")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
