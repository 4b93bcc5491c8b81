use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub transaction_id: String,
    pub booking_id: String,
    pub email: String,
    pub court_id: String,
    pub court_name: String,
    pub slots: u32,
    pub date: NaiveDate,
    pub price: f64,
    pub original_price: f64,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub discount_applied: f64,
    pub paid_at: DateTime<Utc>,
}

impl Validate for Payment {
    const ENTITY: &'static str = "payment";

    fn validate(&self) -> Result<(), String> {
        require(&self.transaction_id, "transactionId")?;
        require(&self.booking_id, "bookingId")
    }
}
