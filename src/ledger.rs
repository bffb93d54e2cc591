//! Ledger - order revenue and bonus pool records
//!
//! Read-only reporting path. Access control is expected from whatever
//! fronts this service; none is enforced here.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::{LedgerEntry, OrderId};
use crate::store::BookingStore;

pub struct LedgerReader {
    store: Arc<dyn BookingStore>,
}

impl LedgerReader {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Ledger rows newest first, optionally for one order.
    pub async fn list(&self, order_id: Option<OrderId>) -> Result<Vec<LedgerEntry>, ServiceError> {
        self.store
            .list_ledger(order_id)
            .await
            .map_err(|e| ServiceError::retrieval("Failed to fetch ledger", e))
    }
}
