use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use super::client::ensure_deleted;
use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{Account, AccountUpsert, AdminOverview, Role};
use crate::services::cache::QueryKey;

#[derive(Deserialize)]
struct RoleResponse {
    role: Role,
}

impl ApiClient {
    /// `GET /users`
    pub async fn users(&self) -> AppResult<Vec<Account>> {
        self.cached_list(QueryKey::all("users"), self.endpoint(&["users"]))
            .await
    }

    /// `GET /users/:email`
    pub async fn user(&self, email: &str) -> AppResult<Account> {
        self.fetch_one(self.endpoint(&["users", email])).await
    }

    /// `GET /users/role/:email`
    pub async fn role(&self, email: &str) -> AppResult<Role> {
        let value = self
            .fetch_value(self.endpoint(&["users", "role", email]))
            .await?;
        let parsed: RoleResponse = serde_json::from_value(value).map_err(|e| AppError::Decode {
            entity: "role",
            message: e.to_string(),
        })?;
        Ok(parsed.role)
    }

    /// `PUT /users`, creating the account on first sign-in.
    pub async fn upsert_user(&self, account: &AccountUpsert) -> AppResult<()> {
        self.write(Method::PUT, self.endpoint(&["users"]), Some(account), &["users"])
            .await?;
        Ok(())
    }

    /// `PATCH /users/:email` with `{role}`.
    pub async fn set_role(&self, email: &str, role: Role) -> AppResult<()> {
        self.write(
            Method::PATCH,
            self.endpoint(&["users", email]),
            Some(&json!({ "role": role })),
            &["users"],
        )
        .await?;
        Ok(())
    }

    /// `DELETE /users/:id`
    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        let ack: Value = self
            .write::<()>(Method::DELETE, self.endpoint(&["users", id]), None, &["users"])
            .await?;
        ensure_deleted(&ack, "user")
    }

    /// `GET /admin/overview`
    pub async fn overview(&self) -> AppResult<AdminOverview> {
        let value = self.fetch_value(self.endpoint(&["admin", "overview"])).await?;
        serde_json::from_value(value).map_err(|e| AppError::Decode {
            entity: "overview",
            message: e.to_string(),
        })
    }
}
