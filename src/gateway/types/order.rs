//! Order request types and validation
//!
//! - `CreateOrderRequest`: loosely typed body, so type mistakes become 400s
//!   with our own messages instead of serde rejections
//! - `validate_create_order`: request -> `CreateOrder`
//! - `ValidatedOrderExtractor`: Axum extractor running the validation

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use axum::{
    Json,
    body::Body,
    extract::{FromRequest, Request},
};

use super::response::ApiError;
use crate::gateway::state::AppState;
use crate::models::parse_pickup_date;
use crate::orders::CreateOrder;

pub const MISSING_REQUIRED: &str = "Missing or invalid zone_id or pickup_date";

/// `POST /orders` body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(value_type = i64, example = 1)]
    #[serde(default)]
    pub zone_id: Option<Value>,
    #[schema(value_type = String, example = "2026-10-20")]
    #[serde(default)]
    pub pickup_date: Option<Value>,
    #[schema(value_type = Option<bool>)]
    #[serde(default)]
    pub is_express: Option<Value>,
    #[schema(value_type = Option<String>)]
    #[serde(default)]
    pub notes: Option<Value>,
    #[schema(value_type = Option<String>, format = "uuid")]
    #[serde(default)]
    pub user_id: Option<Value>,
}

fn optional<'a>(v: &'a Option<Value>) -> Option<&'a Value> {
    v.as_ref().filter(|v| !v.is_null())
}

/// Integer ids may arrive as `3` or `3.0`.
fn integral(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        let f = v.as_f64()?;
        (f.fract() == 0.0 && (1.0..=i64::MAX as f64).contains(&f)).then_some(f as i64)
    })
}

pub fn validate_create_order(req: CreateOrderRequest) -> Result<CreateOrder, &'static str> {
    let zone_id = optional(&req.zone_id)
        .and_then(integral)
        .filter(|id| *id > 0)
        .ok_or(MISSING_REQUIRED)?;

    let pickup_date = optional(&req.pickup_date)
        .and_then(Value::as_str)
        .and_then(parse_pickup_date)
        .ok_or(MISSING_REQUIRED)?;

    let is_express = match optional(&req.is_express) {
        None => false,
        Some(v) => v.as_bool().ok_or("Invalid is_express")?,
    };

    let notes = match optional(&req.notes) {
        None => None,
        Some(v) => Some(v.as_str().ok_or("Invalid notes")?.to_string()),
    };

    let user_id = match optional(&req.user_id) {
        None => None,
        Some(v) => Some(
            v.as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or("Invalid user_id")?,
        ),
    };

    Ok(CreateOrder {
        zone_id,
        pickup_date,
        is_express,
        notes,
        user_id,
    })
}

/// Validated order body; handlers never see an invalid request.
#[derive(Debug)]
pub struct ValidatedOrderExtractor(pub CreateOrder);

impl FromRequest<Arc<AppState>> for ValidatedOrderExtractor {
    type Rejection = ApiError;

    async fn from_request(req: Request<Body>, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Json(body): Json<CreateOrderRequest> =
            Json::from_request(req, state).await.map_err(|e| {
                tracing::warn!(error = %e, "order request rejected: unreadable body");
                ApiError::bad_request("Invalid JSON body")
            })?;

        let cmd = validate_create_order(body).map_err(|msg| {
            tracing::warn!(reason = msg, "order request rejected");
            ApiError::bad_request(msg)
        })?;

        Ok(ValidatedOrderExtractor(cmd))
    }
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ZonesQuery {
    /// Pickup date, `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrdersQuery {
    /// Only orders of this user
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LedgerQuery {
    /// Only rows of this order
    pub order_id: Option<String>,
}

/// Empty or absent means no filter; anything else must be a UUID.
pub fn parse_uuid_filter(raw: Option<&str>, message: &'static str) -> Result<Option<Uuid>, ApiError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| ApiError::bad_request(message)),
    }
}
