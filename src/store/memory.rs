//! In-memory booking store
//!
//! Used by `--memory` dev mode and by tests. Fail points let tests force
//! individual operations to error.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::{BookingStore, StoreError};
use crate::models::{
    LedgerEntry, LedgerLine, NewOrder, Order, OrderId, OrderStatus, UserId, Zone, ZoneId,
};

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    ListZones,
    GetZone,
    CountOrders,
    InsertOrder,
    InsertLedger,
    ListOrders,
    ListLedger,
    ConfirmOrder,
}

impl FailPoint {
    const ALL: [FailPoint; 8] = [
        FailPoint::ListZones,
        FailPoint::GetZone,
        FailPoint::CountOrders,
        FailPoint::InsertOrder,
        FailPoint::InsertLedger,
        FailPoint::ListOrders,
        FailPoint::ListLedger,
        FailPoint::ConfirmOrder,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Default)]
struct Tables {
    zones: Vec<Zone>,
    orders: Vec<Order>,
    ledger: Vec<LedgerEntry>,
    next_ledger_id: i64,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_points: [AtomicBool; FailPoint::ALL.len()],
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_ledger_id: 1,
                ..Default::default()
            }),
            fail_points: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    /// Store pre-populated with zones.
    pub fn with_zones(zones: Vec<Zone>) -> Self {
        let store = Self::new();
        store.lock().zones = zones;
        store
    }

    /// Demo zones for `--memory` mode.
    pub fn seeded() -> Self {
        Self::with_zones(vec![
            Zone {
                id: 1,
                name: "Downtown".to_string(),
                capacity_per_day: 20,
            },
            Zone {
                id: 2,
                name: "Riverside".to_string(),
                capacity_per_day: 10,
            },
            Zone {
                id: 3,
                name: "Hillcrest".to_string(),
                capacity_per_day: 5,
            },
        ])
    }

    pub fn fail_on(&self, point: FailPoint) {
        self.fail_points[point.index()].store(true, Ordering::SeqCst);
    }

    pub fn clear_fail(&self, point: FailPoint) {
        self.fail_points[point.index()].store(false, Ordering::SeqCst);
    }

    /// Snapshot of one order, for assertions.
    pub fn order(&self, order_id: OrderId) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == order_id).cloned()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    fn check(&self, point: FailPoint) -> Result<(), StoreError> {
        if self.fail_points[point.index()].load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure"));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A poisoned lock only means a test panicked mid-operation.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Tables {
    fn push_order(&mut self, order: &NewOrder) -> Order {
        let row = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            zone_id: order.zone_id,
            pickup_date: order.pickup_date,
            is_express: order.is_express,
            is_overflow: order.is_overflow,
            price_cents: order.price_cents,
            status: OrderStatus::Created,
            notes: order.notes.clone(),
            created_at: Utc::now(),
        };
        self.orders.push(row.clone());
        row
    }

    fn push_ledger(&mut self, order_id: OrderId, lines: &[LedgerLine]) -> Vec<LedgerEntry> {
        let now = Utc::now();
        lines
            .iter()
            .map(|line| {
                let entry = LedgerEntry {
                    id: self.next_ledger_id,
                    order_id,
                    amount_cents: line.amount_cents,
                    entry_type: line.entry_type,
                    description: line.description.to_string(),
                    created_at: now,
                };
                self.next_ledger_id += 1;
                self.ledger.push(entry.clone());
                entry
            })
            .collect()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, StoreError> {
        self.check(FailPoint::ListZones)?;
        Ok(self.lock().zones.clone())
    }

    async fn get_zone(&self, zone_id: ZoneId) -> Result<Option<Zone>, StoreError> {
        self.check(FailPoint::GetZone)?;
        Ok(self.lock().zones.iter().find(|z| z.id == zone_id).cloned())
    }

    async fn count_orders_by_zone(
        &self,
        pickup_date: NaiveDate,
    ) -> Result<HashMap<ZoneId, i64>, StoreError> {
        self.check(FailPoint::CountOrders)?;
        let mut counts = HashMap::new();
        for order in self.lock().orders.iter().filter(|o| o.pickup_date == pickup_date) {
            *counts.entry(order.zone_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_orders(
        &self,
        zone_id: ZoneId,
        pickup_date: NaiveDate,
    ) -> Result<i64, StoreError> {
        self.check(FailPoint::CountOrders)?;
        let count = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.zone_id == zone_id && o.pickup_date == pickup_date)
            .count();
        Ok(count as i64)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        self.check(FailPoint::InsertOrder)?;
        Ok(self.lock().push_order(order))
    }

    async fn insert_ledger_lines(
        &self,
        order_id: OrderId,
        lines: &[LedgerLine],
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.check(FailPoint::InsertLedger)?;
        Ok(self.lock().push_ledger(order_id, lines))
    }

    async fn insert_order_with_ledger(
        &self,
        order: &NewOrder,
        lines: &[LedgerLine],
    ) -> Result<Order, StoreError> {
        self.check(FailPoint::InsertOrder)?;
        self.check(FailPoint::InsertLedger)?;
        let mut tables = self.lock();
        let row = tables.push_order(order);
        tables.push_ledger(row.id, lines);
        Ok(row)
    }

    async fn list_orders(&self, user_id: Option<UserId>) -> Result<Vec<Order>, StoreError> {
        self.check(FailPoint::ListOrders)?;
        let mut rows: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .rev()
            .filter(|o| user_id.is_none() || o.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_ledger(&self, order_id: Option<OrderId>) -> Result<Vec<LedgerEntry>, StoreError> {
        self.check(FailPoint::ListLedger)?;
        let mut rows: Vec<LedgerEntry> = self
            .lock()
            .ledger
            .iter()
            .filter(|e| order_id.is_none_or(|id| e.order_id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn confirm_order(&self, order_id: OrderId) -> Result<bool, StoreError> {
        self.check(FailPoint::ConfirmOrder)?;
        let mut tables = self.lock();
        match tables.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) if order.status.can_transition_to(OrderStatus::Confirmed) => {
                order.status = OrderStatus::Confirmed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
