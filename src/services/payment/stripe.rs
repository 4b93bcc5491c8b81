use async_trait::async_trait;
use serde_json::Value;

use super::{BillingDetails, PaymentGateway, PaymentOutcome, PaymentStatus};
use crate::errors::{AppError, AppResult};

const STRIPE_API_URL: &str = "https://api.stripe.com/v1";

/// Client-side confirmation of Stripe payment intents with a publishable key.
pub struct StripeGateway {
    publishable_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(publishable_key: String) -> Self {
        Self {
            publishable_key,
            base_url: STRIPE_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// `pi_123_secret_abc` belongs to intent `pi_123`.
fn intent_id(client_secret: &str) -> Option<&str> {
    client_secret
        .split_once("_secret_")
        .map(|(id, _)| id)
        .filter(|id| id.starts_with("pi_"))
}

/// Stable across retries of the same confirmation, so a resend after a
/// dropped response cannot charge twice. A different card gets its own key.
fn idempotency_key(intent: &str, payment_method: &str) -> String {
    format!("confirm-{intent}-{payment_method}")
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        payment_method: &str,
        billing: &BillingDetails,
    ) -> AppResult<PaymentOutcome> {
        if self.publishable_key.is_empty() {
            return Err(AppError::Config("STRIPE_PUBLISHABLE_KEY must be set".to_string()));
        }
        let intent = intent_id(client_secret)
            .ok_or_else(|| AppError::Payment("malformed payment intent secret".to_string()))?;

        let url = format!("{}/payment_intents/{intent}/confirm", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.publishable_key)
            .header("Idempotency-Key", idempotency_key(intent, payment_method))
            .form(&[
                ("client_secret", client_secret),
                ("payment_method", payment_method),
                ("receipt_email", billing.email.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let data: Value = resp.json().await?;
        if !status.is_success() {
            let message = data["error"]["message"]
                .as_str()
                .unwrap_or("Card payment was not accepted.")
                .to_string();
            tracing::warn!(%status, intent, message = %message, "card confirmation rejected");
            return Err(AppError::Payment(message));
        }

        let transaction_id = data["id"].as_str().unwrap_or(intent).to_string();
        let outcome = PaymentOutcome {
            status: PaymentStatus::from_gateway(data["status"].as_str().unwrap_or("")),
            transaction_id,
        };
        tracing::info!(intent, status = ?outcome.status, name = %billing.name, "card confirmation finished");
        Ok(outcome)
    }
}
