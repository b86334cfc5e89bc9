//! Plan upgrades.

#[cfg(test)]
#[path = "billing_test.rs"]
mod billing_test;

use super::client::ApiClient;
use super::types::{PaymentRequest, PaymentResponse};
use crate::error::StudioError;

/// Plans the backend sells.
pub const PURCHASABLE_PLANS: &[&str] = &["pro"];

impl ApiClient {
    /// Start a checkout for `plan` and return where to send the user.
    ///
    /// # Errors
    ///
    /// Validation error for an unknown plan, API errors otherwise.
    pub async fn create_payment(&self, plan: &str) -> Result<PaymentResponse, StudioError> {
        let plan = plan.trim().to_lowercase();
        if !PURCHASABLE_PLANS.contains(&plan.as_str()) {
            return Err(StudioError::validation(format!("Unknown plan: {plan}")));
        }
        let body = PaymentRequest { plan };
        let builder =
            self.authorize_required(self.http.post(self.url("/api/v1/billing/create-payment")).json(&body))?;
        let payment: PaymentResponse = self.send_json("create_payment", builder).await?;
        tracing::info!(payment_id = %payment.payment_id, plan = %body.plan, "payment created");
        Ok(payment)
    }
}
