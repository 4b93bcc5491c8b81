use reqwest::Method;

use super::client::{ensure_deleted, inserted_id};
use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{Announcement, NewAnnouncement};
use crate::services::cache::QueryKey;

impl ApiClient {
    /// `GET /announcements`
    pub async fn announcements(&self) -> AppResult<Vec<Announcement>> {
        self.cached_list(
            QueryKey::all("announcements"),
            self.endpoint(&["announcements"]),
        )
        .await
    }

    /// `POST /announcements`
    pub async fn create_announcement(&self, announcement: &NewAnnouncement) -> AppResult<String> {
        let ack = self
            .write(
                Method::POST,
                self.endpoint(&["announcements"]),
                Some(announcement),
                &["announcements"],
            )
            .await?;
        inserted_id(&ack).ok_or_else(|| AppError::Decode {
            entity: "announcement",
            message: "response carried no inserted id".to_string(),
        })
    }

    /// `PATCH /announcements/:id`
    pub async fn update_announcement(
        &self,
        id: &str,
        announcement: &NewAnnouncement,
    ) -> AppResult<()> {
        self.write(
            Method::PATCH,
            self.endpoint(&["announcements", id]),
            Some(announcement),
            &["announcements"],
        )
        .await?;
        Ok(())
    }

    /// `DELETE /announcements/:id`
    pub async fn delete_announcement(&self, id: &str) -> AppResult<()> {
        let ack = self
            .write::<()>(
                Method::DELETE,
                self.endpoint(&["announcements", id]),
                None,
                &["announcements"],
            )
            .await?;
        ensure_deleted(&ack, "announcement")
    }
}
