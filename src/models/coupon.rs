use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(alias = "_id")]
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Flat currency amount taken off the booking total.
    pub discount_amount: f64,
}

impl Coupon {
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    pub fn apply_to(&self, total: f64) -> f64 {
        (total - self.discount_amount).max(0.0)
    }
}

impl Validate for Coupon {
    const ENTITY: &'static str = "coupon";

    fn validate(&self) -> Result<(), String> {
        require(&self.code, "code")?;
        if !self.discount_amount.is_finite() || self.discount_amount < 0.0 {
            return Err(format!("discountAmount {} is negative", self.discount_amount));
        }
        Ok(())
    }
}

/// Body for `POST /coupons` and `PATCH /coupons/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
    pub code: String,
    pub title: String,
    pub description: String,
    pub discount_amount: f64,
}
