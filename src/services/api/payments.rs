use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::Payment;
use crate::services::cache::QueryKey;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentResponse {
    client_secret: String,
}

impl ApiClient {
    /// `POST /create-payment-intent`, returning the gateway client secret.
    pub async fn create_payment_intent(&self, price: f64) -> AppResult<String> {
        let value = self
            .write(
                Method::POST,
                self.endpoint(&["create-payment-intent"]),
                Some(&json!({ "price": price })),
                &[],
            )
            .await?;
        let intent: IntentResponse =
            serde_json::from_value(value).map_err(|e| AppError::Decode {
                entity: "payment intent",
                message: e.to_string(),
            })?;
        if intent.client_secret.is_empty() {
            return Err(AppError::Payment("payment intent has no client secret".into()));
        }
        Ok(intent.client_secret)
    }

    /// `POST /payments`. The backend marks the booking paid in the same write.
    pub async fn record_payment(&self, payment: &Payment) -> AppResult<()> {
        self.write(
            Method::POST,
            self.endpoint(&["payments"]),
            Some(payment),
            &["payments", "bookings"],
        )
        .await?;
        Ok(())
    }

    /// `GET /payments/:email`
    pub async fn payments_for(&self, email: &str) -> AppResult<Vec<Payment>> {
        self.cached_list(
            QueryKey::new("payments", email.to_string()),
            self.endpoint(&["payments", email]),
        )
        .await
    }
}
