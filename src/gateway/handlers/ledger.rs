use std::sync::Arc;

use axum::extract::{Query, State};

use super::super::state::AppState;
use super::super::types::{
    ApiResult, ErrorBody, LedgerQuery, LedgerResponse, ok, parse_uuid_filter,
};

/// Ledger rows, newest first
#[utoipa::path(
    get,
    path = "/ledger",
    params(LedgerQuery),
    responses(
        (status = 200, description = "Ledger rows", body = LedgerResponse),
        (status = 400, description = "Malformed order_id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Ledger"
)]
pub async fn get_ledger(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<LedgerResponse> {
    let order_id = parse_uuid_filter(query.order_id.as_deref(), "Invalid order_id")?;
    let ledger = state.ledger.list(order_id).await?;
    ok(LedgerResponse { ledger })
}
