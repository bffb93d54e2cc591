//! Gateway types module
//!
//! ## Input Types
//! - [`CreateOrderRequest`]: order body as received
//! - [`ValidatedOrderExtractor`]: Axum extractor for framework-level validation
//! - Query structs for the list endpoints
//!
//! ## Output Types
//! - [`ApiError`] / [`ApiResult`]: `{error}` bodies and status mapping
//! - Response envelopes (`{zones}`, `{orders}`, `{ledger}`, `{received}`)

pub mod order;
pub mod response;

pub use order::{
    CreateOrderRequest, LedgerQuery, MISSING_REQUIRED, OrdersQuery, ValidatedOrderExtractor,
    ZonesQuery, parse_uuid_filter, validate_create_order,
};
pub use response::{
    ApiError, ApiResult, ErrorBody, LedgerResponse, OrdersResponse, WebhookAck, ZonesResponse,
    created, ok,
};
