pub mod stripe;

use async_trait::async_trait;

use crate::errors::AppResult;

#[derive(Debug, Clone, PartialEq)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    Failed,
}

impl PaymentStatus {
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "succeeded" => PaymentStatus::Succeeded,
            "processing" => PaymentStatus::Processing,
            "requires_action" | "requires_confirmation" => PaymentStatus::RequiresAction,
            _ => PaymentStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    pub transaction_id: String,
}

/// Card payment confirmation against a third-party gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Confirms the intent behind `client_secret` with a tokenised card.
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        payment_method: &str,
        billing: &BillingDetails,
    ) -> AppResult<PaymentOutcome>;
}
