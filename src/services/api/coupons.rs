use reqwest::Method;

use super::client::{ensure_deleted, inserted_id};
use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{Coupon, NewCoupon};
use crate::services::cache::QueryKey;

impl ApiClient {
    /// `GET /coupons`
    pub async fn coupons(&self) -> AppResult<Vec<Coupon>> {
        self.cached_list(QueryKey::all("coupons"), self.endpoint(&["coupons"]))
            .await
    }

    /// `POST /coupons`
    pub async fn create_coupon(&self, coupon: &NewCoupon) -> AppResult<String> {
        let ack = self
            .write(Method::POST, self.endpoint(&["coupons"]), Some(coupon), &["coupons"])
            .await?;
        inserted_id(&ack).ok_or_else(|| AppError::Decode {
            entity: "coupon",
            message: "response carried no inserted id".to_string(),
        })
    }

    /// `PATCH /coupons/:id`
    pub async fn update_coupon(&self, id: &str, coupon: &NewCoupon) -> AppResult<()> {
        self.write(
            Method::PATCH,
            self.endpoint(&["coupons", id]),
            Some(coupon),
            &["coupons"],
        )
        .await?;
        Ok(())
    }

    /// `DELETE /coupons/:id`
    pub async fn delete_coupon(&self, id: &str) -> AppResult<()> {
        let ack = self
            .write::<()>(Method::DELETE, self.endpoint(&["coupons", id]), None, &["coupons"])
            .await?;
        ensure_deleted(&ack, "coupon")
    }
}
