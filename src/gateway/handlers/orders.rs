//! Order handlers (list, create)

use std::sync::Arc;

use axum::extract::{Query, State};

use super::super::state::AppState;
use super::super::types::{
    ApiResult, CreateOrderRequest, ErrorBody, OrdersQuery, OrdersResponse,
    ValidatedOrderExtractor, created, ok, parse_uuid_filter,
};
use crate::orders::CreatedOrder;

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/orders",
    params(OrdersQuery),
    responses(
        (status = 200, description = "Orders", body = OrdersResponse),
        (status = 400, description = "Malformed user_id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Orders"
)]
pub async fn get_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<OrdersResponse> {
    let user_id = parse_uuid_filter(query.user_id.as_deref(), "Invalid user_id")?;
    let orders = state.orders.list_orders(user_id).await?;
    ok(OrdersResponse { orders })
}

/// Create order
///
/// Prices the order against the zone's load for the date and records two
/// ledger rows (order payment, bonus pool).
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreatedOrder),
        (status = 400, description = "Invalid request or zone", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    ValidatedOrderExtractor(cmd): ValidatedOrderExtractor,
) -> ApiResult<CreatedOrder> {
    tracing::debug!(?cmd, "create order");
    let created_order = state.orders.create_order(cmd).await?;
    created(created_order)
}
