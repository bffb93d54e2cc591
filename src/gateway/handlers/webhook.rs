//! Payment provider webhook

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
};

use super::super::state::AppState;
use super::super::types::{ApiResult, ErrorBody, WebhookAck, ok};
use crate::payment::SIGNATURE_HEADER;

/// Payment provider callback
///
/// The raw body is verified against the `Stripe-Signature` header before
/// parsing. Verified events are always acknowledged.
#[utoipa::path(
    post,
    path = "/webhooks/payment-provider",
    request_body(content = String, description = "Signed provider event (raw JSON)", content_type = "application/json"),
    params(
        ("Stripe-Signature" = String, Header, description = "t=<unix>,v1=<hex hmac-sha256>")
    ),
    responses(
        (status = 200, description = "Event received", body = WebhookAck),
        (status = 400, description = "Signature verification failed", body = ErrorBody),
        (status = 500, description = "Signing secret not configured", body = ErrorBody)
    ),
    tag = "Payments"
)]
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<WebhookAck> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state.payments.handle(signature, &body).await?;
    tracing::debug!(?outcome, "webhook processed");
    ok(WebhookAck { received: true })
}
