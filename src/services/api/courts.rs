use reqwest::Method;

use super::client::{ensure_deleted, inserted_id};
use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{Court, NewCourt};
use crate::services::cache::QueryKey;

impl ApiClient {
    /// `GET /courts`
    pub async fn courts(&self) -> AppResult<Vec<Court>> {
        self.cached_list(QueryKey::all("courts"), self.endpoint(&["courts"]))
            .await
    }

    /// `POST /courts`, returning the new court's id.
    pub async fn create_court(&self, court: &NewCourt) -> AppResult<String> {
        let ack = self
            .write(Method::POST, self.endpoint(&["courts"]), Some(court), &["courts"])
            .await?;
        inserted_id(&ack).ok_or_else(|| AppError::Decode {
            entity: "court",
            message: "response carried no inserted id".to_string(),
        })
    }

    /// `PATCH /courts/:id`
    pub async fn update_court(&self, id: &str, court: &NewCourt) -> AppResult<()> {
        self.write(
            Method::PATCH,
            self.endpoint(&["courts", id]),
            Some(court),
            &["courts"],
        )
        .await?;
        Ok(())
    }

    /// `DELETE /courts/:id`
    pub async fn delete_court(&self, id: &str) -> AppResult<()> {
        let ack = self
            .write::<()>(Method::DELETE, self.endpoint(&["courts", id]), None, &["courts"])
            .await?;
        ensure_deleted(&ack, "court")
    }
}
