//! Booking store
//!
//! Persistence boundary for zones, orders and the ledger. Handlers and
//! services only see [`BookingStore`]; the backing implementation is chosen
//! at startup.
//!
//! - [`PgStore`]: PostgreSQL via sqlx
//! - [`MemoryStore`]: in-process store for dev mode and tests

pub mod memory;
pub mod postgres;

pub use memory::{FailPoint, MemoryStore};
pub use postgres::PgStore;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    LedgerEntry, LedgerLine, NewOrder, Order, OrderId, UserId, Zone, ZoneId,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Store unavailable: {0}")]
    Unavailable(&'static str),
}

/// Storage operations used by the booking services.
///
/// Listing operations return rows newest first.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &'static str;

    async fn list_zones(&self) -> Result<Vec<Zone>, StoreError>;

    async fn get_zone(&self, zone_id: ZoneId) -> Result<Option<Zone>, StoreError>;

    /// Order counts per zone for one pickup date. Zones without orders are absent.
    async fn count_orders_by_zone(
        &self,
        pickup_date: NaiveDate,
    ) -> Result<HashMap<ZoneId, i64>, StoreError>;

    async fn count_orders(&self, zone_id: ZoneId, pickup_date: NaiveDate)
    -> Result<i64, StoreError>;

    /// Insert an order in `created` status.
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError>;

    /// Insert all lines for `order_id` as one batch write.
    async fn insert_ledger_lines(
        &self,
        order_id: OrderId,
        lines: &[LedgerLine],
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Insert an order and its ledger lines atomically. Nothing is written on error.
    async fn insert_order_with_ledger(
        &self,
        order: &NewOrder,
        lines: &[LedgerLine],
    ) -> Result<Order, StoreError>;

    async fn list_orders(&self, user_id: Option<UserId>) -> Result<Vec<Order>, StoreError>;

    async fn list_ledger(&self, order_id: Option<OrderId>) -> Result<Vec<LedgerEntry>, StoreError>;

    /// CAS update `created -> confirmed`.
    ///
    /// Returns true if a row changed, false if the order is unknown or
    /// already confirmed.
    async fn confirm_order(&self, order_id: OrderId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
