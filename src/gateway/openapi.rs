//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`
//!
//! Paths are documented at the root; the same routes are also served
//! under `/api`.

use utoipa::OpenApi;

use crate::availability::ZoneAvailability;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CreateOrderRequest, ErrorBody, LedgerResponse, OrdersResponse, WebhookAck, ZonesResponse,
};
use crate::models::{LedgerEntry, LedgerEntryType, Order, OrderStatus, Zone};
use crate::orders::CreatedOrder;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Laundry Loop Booking API",
        version = "1.0.0",
        description = "Pickup booking: zone availability, order pricing, ledger and payment confirmation."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::zones::get_zones,
        crate::gateway::handlers::orders::get_orders,
        crate::gateway::handlers::orders::create_order,
        crate::gateway::handlers::ledger::get_ledger,
        crate::gateway::handlers::webhook::payment_webhook,
    ),
    components(
        schemas(
            HealthResponse,
            Zone,
            ZoneAvailability,
            ZonesResponse,
            Order,
            OrderStatus,
            OrdersResponse,
            CreateOrderRequest,
            CreatedOrder,
            LedgerEntry,
            LedgerEntryType,
            LedgerResponse,
            WebhookAck,
            ErrorBody,
        )
    ),
    tags(
        (name = "System", description = "Health and build info"),
        (name = "Booking", description = "Zone availability"),
        (name = "Orders", description = "Order pricing and creation"),
        (name = "Ledger", description = "Revenue and bonus pool records"),
        (name = "Payments", description = "Payment provider callbacks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_public_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/zones",
            "/orders",
            "/ledger",
            "/webhooks/payment-provider",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_openapi_serializes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("Laundry Loop Booking API"));
    }
}
