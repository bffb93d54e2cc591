//! Zone availability handler

use std::sync::Arc;

use axum::extract::{Query, State};

use super::super::state::AppState;
use super::super::types::{ApiResult, ErrorBody, ZonesQuery, ZonesResponse, ok};

/// Zone availability for a date
///
/// Every zone is listed, full ones included.
#[utoipa::path(
    get,
    path = "/zones",
    params(ZonesQuery),
    responses(
        (status = 200, description = "Availability per zone", body = ZonesResponse),
        (status = 400, description = "Missing or invalid date", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Booking"
)]
pub async fn get_zones(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ZonesQuery>,
) -> ApiResult<ZonesResponse> {
    let zones = state.availability.for_date(query.date.as_deref()).await?;
    ok(ZonesResponse { zones })
}
