use chrono::Utc;

use crate::errors::{AppError, AppResult, FieldErrors};
use crate::flows::access::Route;
use crate::flows::court_name;
use crate::models::{Booking, BookingStatus, Coupon, Payment};
use crate::services::api::ApiClient;
use crate::services::payment::{BillingDetails, PaymentGateway, PaymentStatus};

const CHARGED: &str = "Coupons cannot be changed after the card was charged";

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Ready,
    Paying,
    Done,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: f64,
}

/// Paying for one approved booking, with at most one coupon. Built by
/// `load` once the booking and its court name are known.
#[derive(Debug)]
pub struct Checkout {
    state: CheckoutState,
    booking: Booking,
    court_name: String,
    coupon: Option<AppliedCoupon>,
    final_price: f64,
    coupon_error: Option<String>,
    charged: Option<String>,
    payment: Option<Payment>,
}

impl Checkout {
    /// Loads the booking, then the court list to name its court.
    pub async fn load(api: &ApiClient, booking_id: &str) -> AppResult<Self> {
        let booking = api.booking(booking_id).await?;
        let courts = api.courts().await?;
        let name = court_name(&courts, &booking.court_id).to_string();
        Self::for_booking(booking, name)
    }

    pub fn for_booking(booking: Booking, court_name: String) -> AppResult<Self> {
        if booking.paid || booking.status == BookingStatus::Paid {
            return Err(AppError::Validation(FieldErrors::single(
                "form",
                "This booking has already been paid",
            )));
        }
        if booking.status != BookingStatus::Approved {
            return Err(AppError::Validation(FieldErrors::single(
                "form",
                "Only approved bookings can be paid",
            )));
        }
        Ok(Self {
            state: CheckoutState::Ready,
            final_price: booking.total_price,
            booking,
            court_name,
            coupon: None,
            coupon_error: None,
            charged: None,
            payment: None,
        })
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn court_name(&self) -> &str {
        &self.court_name
    }

    pub fn original_price(&self) -> f64 {
        self.booking.total_price
    }

    pub fn final_price(&self) -> f64 {
        self.final_price
    }

    /// Amount actually taken off, which a large coupon caps at the total.
    pub fn discount(&self) -> f64 {
        self.booking.total_price - self.final_price
    }

    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    pub fn coupon_error(&self) -> Option<&str> {
        self.coupon_error.as_deref()
    }

    /// The coupon input is disabled once a code has been accepted or the
    /// card has been charged.
    pub fn coupon_locked(&self) -> bool {
        self.coupon.is_some() || self.charged.is_some()
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    pub async fn apply_coupon(&mut self, api: &ApiClient, code: &str) -> AppResult<f64> {
        if self.charged.is_some() {
            return Err(self.reject_coupon(CHARGED));
        }
        if self.coupon_locked() {
            return Ok(self.final_price);
        }
        let coupons = api.coupons().await?;
        self.apply_coupon_from(&coupons, code)
    }

    /// Matches `code` case-insensitively. A miss restores the original
    /// total; a repeat after a successful apply changes nothing.
    pub fn apply_coupon_from(&mut self, coupons: &[Coupon], code: &str) -> AppResult<f64> {
        // The charged amount is what gets recorded.
        if self.charged.is_some() {
            return Err(self.reject_coupon(CHARGED));
        }
        if self.coupon_locked() {
            tracing::debug!(code, "coupon already applied, ignoring");
            return Ok(self.final_price);
        }
        match coupons.iter().find(|c| c.matches_code(code)) {
            Some(coupon) => {
                self.final_price = coupon.apply_to(self.booking.total_price);
                self.coupon = Some(AppliedCoupon {
                    code: coupon.code.clone(),
                    discount: coupon.discount_amount,
                });
                self.coupon_error = None;
                tracing::info!(
                    booking_id = %self.booking.id,
                    code = %coupon.code,
                    final_price = self.final_price,
                    "coupon applied"
                );
                Ok(self.final_price)
            }
            None => {
                self.final_price = self.booking.total_price;
                Err(self.reject_coupon("Invalid coupon code"))
            }
        }
    }

    fn reject_coupon(&mut self, message: &str) -> AppError {
        self.coupon_error = Some(message.to_string());
        AppError::Validation(FieldErrors::single("coupon", message))
    }

    /// Charges the card and records the payment. The record is written only
    /// after the gateway reports success.
    pub async fn pay(
        &mut self,
        api: &ApiClient,
        gateway: &dyn PaymentGateway,
        payment_method: &str,
        billing: &BillingDetails,
    ) -> AppResult<Payment> {
        match self.state {
            CheckoutState::Ready | CheckoutState::Failed(_) => {}
            _ => {
                return Err(AppError::Validation(FieldErrors::single(
                    "form",
                    "Payment is not available right now",
                )))
            }
        }
        self.state = CheckoutState::Paying;

        // A retry after a failed record write must not charge the card again.
        let transaction_id = match self.charged.clone() {
            Some(id) => id,
            None => match self.charge(api, gateway, payment_method, billing).await {
                Ok(id) => {
                    self.charged = Some(id.clone());
                    id
                }
                Err(e) => {
                    tracing::error!(error = %e, booking_id = %self.booking.id, "payment failed");
                    self.state = CheckoutState::Failed(e.user_message());
                    return Err(e);
                }
            },
        };

        let payment = Payment {
            transaction_id,
            booking_id: self.booking.id.clone(),
            email: self.booking.user_email.clone(),
            court_id: self.booking.court_id.clone(),
            court_name: self.court_name.clone(),
            slots: self.booking.slots,
            date: self.booking.date,
            price: self.final_price,
            original_price: self.booking.total_price,
            coupon_code: self.coupon.as_ref().map(|c| c.code.clone()),
            discount_applied: self.discount(),
            paid_at: Utc::now(),
        };

        if let Err(e) = api.record_payment(&payment).await {
            tracing::error!(
                error = %e,
                transaction_id = %payment.transaction_id,
                booking_id = %payment.booking_id,
                "charge succeeded but payment record was not saved"
            );
            self.state = CheckoutState::Failed(e.user_message());
            return Err(e);
        }

        tracing::info!(
            transaction_id = %payment.transaction_id,
            booking_id = %payment.booking_id,
            price = payment.price,
            "payment recorded"
        );
        self.payment = Some(payment.clone());
        self.state = CheckoutState::Done;
        Ok(payment)
    }

    async fn charge(
        &self,
        api: &ApiClient,
        gateway: &dyn PaymentGateway,
        payment_method: &str,
        billing: &BillingDetails,
    ) -> AppResult<String> {
        if self.final_price <= 0.0 {
            // Gateways refuse zero-amount charges; the coupon covered it all.
            return Ok(format!("coupon-{}", uuid::Uuid::new_v4()));
        }
        let client_secret = api.create_payment_intent(self.final_price).await?;
        let outcome = gateway
            .confirm_card_payment(&client_secret, payment_method, billing)
            .await?;
        if outcome.status != PaymentStatus::Succeeded {
            return Err(AppError::Payment(format!(
                "Payment was not completed (status: {:?})",
                outcome.status
            )));
        }
        Ok(outcome.transaction_id)
    }

    /// Where to go once the payment is done.
    pub fn next_route(&self) -> Option<Route> {
        (self.state == CheckoutState::Done).then_some(Route::PaymentHistory)
    }
}
