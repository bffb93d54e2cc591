//! Order pricing and creation

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::admission::AdmissionGate;
use crate::error::ServiceError;
use crate::models::{NewOrder, Order, UserId, ZoneId};
use crate::pricing;
use crate::store::BookingStore;

/// Validated order creation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub zone_id: ZoneId,
    pub pickup_date: NaiveDate,
    pub is_express: bool,
    pub notes: Option<String>,
    pub user_id: Option<UserId>,
}

/// Result of a successful creation; also the 201 response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedOrder {
    pub order: Order,
    #[schema(example = 1300)]
    pub price_cents: i64,
    pub overflow: bool,
}

pub struct OrderService {
    store: Arc<dyn BookingStore>,
    admission: AdmissionGate,
    transactional_ledger: bool,
}

impl OrderService {
    pub fn new(store: Arc<dyn BookingStore>, transactional_ledger: bool) -> Self {
        Self {
            store,
            admission: AdmissionGate::new(),
            transactional_ledger,
        }
    }

    /// Price and persist an order, then record its ledger lines.
    ///
    /// With `transactional_ledger` off, a failed ledger write is logged and
    /// the order is still returned. The order then has no ledger rows and
    /// needs manual cleanup.
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<CreatedOrder, ServiceError> {
        let zone = match self.store.get_zone(cmd.zone_id).await {
            Ok(Some(zone)) => zone,
            Ok(None) => {
                tracing::warn!(zone_id = cmd.zone_id, "order rejected: unknown zone");
                return Err(ServiceError::Lookup("Invalid zone_id"));
            }
            Err(e) => {
                tracing::error!(zone_id = cmd.zone_id, error = %e, "Error fetching zone");
                return Err(ServiceError::Lookup("Invalid zone_id"));
            }
        };

        let _permit = self.admission.acquire(zone.id, cmd.pickup_date).await;

        let existing = self
            .store
            .count_orders(zone.id, cmd.pickup_date)
            .await
            .map_err(|e| ServiceError::retrieval("Failed to compute capacity", e))?;

        let quote = pricing::quote(existing, zone.capacity_per_day, cmd.is_express);

        let new_order = NewOrder {
            user_id: cmd.user_id,
            zone_id: zone.id,
            pickup_date: cmd.pickup_date,
            is_express: cmd.is_express,
            is_overflow: quote.is_overflow,
            price_cents: quote.price_cents,
            notes: cmd.notes,
        };
        let lines = pricing::ledger_lines(quote.price_cents);

        let order = if self.transactional_ledger {
            self.store
                .insert_order_with_ledger(&new_order, &lines)
                .await
                .map_err(|e| ServiceError::persistence("Failed to create order", e))?
        } else {
            let order = self
                .store
                .insert_order(&new_order)
                .await
                .map_err(|e| ServiceError::persistence("Failed to create order", e))?;

            if let Err(e) = self.store.insert_ledger_lines(order.id, &lines).await {
                // Order stays committed without ledger rows; manual cleanup required.
                tracing::error!(
                    order_id = %order.id,
                    error = %e,
                    "Error creating ledger entries"
                );
            }
            order
        };

        tracing::info!(
            order_id = %order.id,
            zone_id = order.zone_id,
            pickup_date = %order.pickup_date,
            existing,
            capacity = zone.capacity_per_day,
            overflow = quote.is_overflow,
            price_cents = quote.price_cents,
            "order created"
        );

        Ok(CreatedOrder {
            order,
            price_cents: quote.price_cents,
            overflow: quote.is_overflow,
        })
    }

    /// Orders newest first, optionally for one user.
    pub async fn list_orders(&self, user_id: Option<UserId>) -> Result<Vec<Order>, ServiceError> {
        self.store
            .list_orders(user_id)
            .await
            .map_err(|e| ServiceError::retrieval("Failed to fetch orders", e))
    }
}
