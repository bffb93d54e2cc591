//! Payment confirmation webhook
//!
//! Verifies the provider's signed event and confirms the referenced order.
//! Once the signature is valid the provider always gets an acknowledgment,
//! even when the order update fails, so it does not keep redelivering.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::signature::{self, SignatureError};
use crate::models::OrderId;
use crate::store::BookingStore;

/// Event type that confirms an order
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Configuration error")]
    MissingSecret,

    #[error("Webhook Error: {0}")]
    Signature(#[from] SignatureError),

    #[error("Webhook Error: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Provider event envelope. Only the fields used here are modelled.
#[derive(Debug, Deserialize)]
pub struct ProviderEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

impl ProviderEvent {
    /// `data.object.metadata.order_id`, if present as a string.
    pub fn order_id(&self) -> Option<&str> {
        self.data
            .object
            .get("metadata")?
            .get("order_id")?
            .as_str()
    }
}

/// What the handler did with a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Confirmed(OrderId),
    /// Unknown order, or already confirmed
    Unchanged(OrderId),
    MissingOrderId,
    InvalidOrderId(String),
    UpdateFailed(OrderId),
    Ignored(String),
}

pub struct PaymentConfirmationHandler {
    store: Arc<dyn BookingStore>,
    signing_secret: Option<String>,
    tolerance_secs: i64,
}

impl PaymentConfirmationHandler {
    pub fn new(
        store: Arc<dyn BookingStore>,
        signing_secret: Option<String>,
        tolerance_secs: i64,
    ) -> Self {
        Self {
            store,
            signing_secret: signing_secret.filter(|s| !s.is_empty()),
            tolerance_secs,
        }
    }

    /// Verify and apply one raw webhook delivery.
    pub async fn handle(
        &self,
        signature_header: Option<&str>,
        body: &[u8],
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(secret) = self.signing_secret.as_deref() else {
            tracing::error!("Missing payment webhook signing secret");
            return Err(WebhookError::MissingSecret);
        };

        let now = chrono::Utc::now().timestamp();
        if let Err(e) = signature::verify(signature_header, body, secret, self.tolerance_secs, now)
        {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            return Err(e.into());
        }

        let event: ProviderEvent = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "Webhook payload is not a valid event");
            WebhookError::InvalidPayload(e)
        })?;

        Ok(self.apply(&event).await)
    }

    async fn apply(&self, event: &ProviderEvent) -> WebhookOutcome {
        if event.event_type != CHECKOUT_COMPLETED {
            tracing::info!(event_type = %event.event_type, "Unhandled event type");
            return WebhookOutcome::Ignored(event.event_type.clone());
        }

        let Some(raw_id) = event.order_id() else {
            tracing::warn!(event_id = ?event.id, "checkout completed without order_id metadata");
            return WebhookOutcome::MissingOrderId;
        };
        let Ok(order_id) = Uuid::parse_str(raw_id) else {
            tracing::warn!(event_id = ?event.id, order_id = raw_id, "checkout completed with malformed order_id");
            return WebhookOutcome::InvalidOrderId(raw_id.to_string());
        };

        match self.store.confirm_order(order_id).await {
            Ok(true) => {
                tracing::info!(%order_id, "order confirmed");
                WebhookOutcome::Confirmed(order_id)
            }
            Ok(false) => {
                tracing::info!(%order_id, "order unknown or already confirmed");
                WebhookOutcome::Unchanged(order_id)
            }
            Err(e) => {
                tracing::error!(%order_id, error = %e, "Error updating order status");
                WebhookOutcome::UpdateFailed(order_id)
            }
        }
    }
}
