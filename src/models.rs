//! Domain types: zones, orders and ledger entries.
//!
//! Field names follow the persisted/external JSON contract
//! (`zone_id`, `pickup_date`, `is_express`, `is_overflow`, `price_cents`,
//! `status`, `order_id`, `amount_cents`, `type`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub type ZoneId = i64;
pub type OrderId = Uuid;
pub type UserId = Uuid;

/// Service area with a fixed daily pickup capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Zone {
    #[schema(example = 1)]
    pub id: ZoneId,
    #[schema(example = "Downtown")]
    pub name: String,
    #[schema(example = 20)]
    pub capacity_per_day: i32,
}

// ============================================================================
// Order
// ============================================================================

/// Order lifecycle. The only transition is `Created -> Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Confirmed => "confirmed",
        }
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!((self, next), (Self::Created, Self::Confirmed))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "confirmed" => Ok(Self::Confirmed),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Persisted order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[schema(value_type = Uuid)]
    pub id: OrderId,
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<UserId>,
    pub zone_id: ZoneId,
    #[schema(value_type = String, example = "2026-10-20")]
    pub pickup_date: NaiveDate,
    pub is_express: bool,
    pub is_overflow: bool,
    #[schema(example = 1500)]
    pub price_cents: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Order fields computed by the pricing service, before the store assigns
/// identity, status and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub zone_id: ZoneId,
    pub pickup_date: NaiveDate,
    pub is_express: bool,
    pub is_overflow: bool,
    pub price_cents: i64,
    pub notes: Option<String>,
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    Order,
    BonusPool,
}

impl LedgerEntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::BonusPool => "bonus_pool",
        }
    }
}

impl FromStr for LedgerEntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(Self::Order),
            "bonus_pool" => Ok(Self::BonusPool),
            other => Err(format!("unknown ledger entry type: {}", other)),
        }
    }
}

/// Immutable financial record tied to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntry {
    pub id: i64,
    #[schema(value_type = Uuid)]
    pub order_id: OrderId,
    pub amount_cents: i64,
    #[serde(rename = "type")]
    pub entry_type: LedgerEntryType,
    pub description: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Ledger line to be written for an order; the store fills in `order_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLine {
    pub amount_cents: i64,
    pub entry_type: LedgerEntryType,
    pub description: &'static str,
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_pickup_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
