//! Payment Gateway Adapter
//!
//! Boundary to the external payment-intent provider. The adapter authorizes
//! a charge for a caller-supplied, already-discounted amount; it performs no
//! discount computation of its own. Provider failures surface verbatim to
//! the caller and are never retried here.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::AppError;

const STRIPE_API_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Opaque authorization handle from the gateway
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    /// Client-facing secret the frontend uses to confirm the charge
    pub client_secret: String,
}

/// Gateway errors
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("{0}")]
    Provider(String),

    #[error("failed to reach payment provider: {0}")]
    Transport(String),
}

/// External payment-intent provider
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorize a charge of `amount_minor` minor units (centavos)
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Convert a major-unit decimal amount to the minor-unit integer the gateway
/// expects (x100, truncating any residual fraction). Non-positive results are
/// a client error.
pub fn to_minor_units(amount: Decimal) -> Result<i64, AppError> {
    let minor = (amount * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or_else(|| AppError::validation("Payment amount out of range"))?;
    if minor <= 0 {
        return Err(AppError::validation("Invalid payment amount."));
    }
    Ok(minor)
}

// =============================================================================
// Stripe implementation
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeIntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: String,
}

/// Stripe payment-intent gateway
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .http
            .post(STRIPE_API_URL)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        if response.status().is_success() {
            let intent: StripeIntentResponse = response
                .json()
                .await
                .map_err(|e| PaymentError::Transport(e.to_string()))?;
            Ok(PaymentIntent {
                id: intent.id,
                client_secret: intent.client_secret,
            })
        } else {
            let status = response.status();
            let message = match response.json::<StripeErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("payment provider returned {}", status),
            };
            tracing::warn!(%status, %message, "payment intent rejected");
            Err(PaymentError::Provider(message))
        }
    }
}

// =============================================================================
// Offline implementation
// =============================================================================

/// Canned gateway used when no provider key is configured, and by tests.
/// Issues well-formed intents without talking to anyone.
pub struct MockGateway;

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        _currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount_minor <= 0 {
            return Err(PaymentError::Provider(
                "amount must be positive".to_string(),
            ));
        }
        let id = format!("pi_{}", Uuid::new_v4().simple());
        let client_secret = format!("{}_secret_{}", id, Uuid::new_v4().simple());
        Ok(PaymentIntent { id, client_secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn major_amount_converts_to_centavos() {
        assert_eq!(to_minor_units(dec("900.00")).unwrap(), 90000);
        assert_eq!(to_minor_units(dec("0.01")).unwrap(), 1);
    }

    #[test]
    fn residual_fraction_is_truncated() {
        assert_eq!(to_minor_units(dec("10.999")).unwrap(), 1099);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        assert!(to_minor_units(Decimal::ZERO).is_err());
        assert!(to_minor_units(dec("-5.00")).is_err());
        // rounds down to zero minor units
        assert!(to_minor_units(dec("0.001")).is_err());
    }

    #[tokio::test]
    async fn mock_gateway_issues_intent_and_secret() {
        let intent = MockGateway.create_intent(90000, "php").await.unwrap();
        assert!(intent.id.starts_with("pi_"));
        assert!(intent.client_secret.contains("_secret_"));
    }
}
