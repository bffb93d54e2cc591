//! Order pricing
//!
//! All amounts are integer cents.

use crate::models::{LedgerEntryType, LedgerLine};

/// Base price per order ($10.00)
pub const BASE_PRICE: i64 = 1000;

/// Express pickup surcharge ($5.00)
pub const EXPRESS_SURCHARGE: i64 = 500;

/// Surcharge once the zone's daily capacity is already met ($3.00)
pub const OVERFLOW_SURCHARGE: i64 = 300;

/// Fixed per-order contribution to the bonus pool ($2.50), independent of price
pub const BONUS_POOL_CENTS: i64 = 250;

/// Price breakdown for a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub price_cents: i64,
    pub is_overflow: bool,
}

/// An order is overflow when the zone already holds at least `capacity`
/// orders for the day.
#[inline]
pub fn is_overflow(existing_count: i64, capacity_per_day: i32) -> bool {
    existing_count >= i64::from(capacity_per_day)
}

/// Compute the order price.
///
/// # Example
/// ```
/// use laundry_loop::pricing::calculate_price;
/// assert_eq!(calculate_price(true, true), 1800);
/// ```
#[inline]
pub fn calculate_price(is_express: bool, is_overflow: bool) -> i64 {
    let mut price = BASE_PRICE;
    if is_express {
        price += EXPRESS_SURCHARGE;
    }
    if is_overflow {
        price += OVERFLOW_SURCHARGE;
    }
    price
}

/// Quote an order given the current same-day count for its zone.
pub fn quote(existing_count: i64, capacity_per_day: i32, is_express: bool) -> Quote {
    let is_overflow = is_overflow(existing_count, capacity_per_day);
    Quote {
        price_cents: calculate_price(is_express, is_overflow),
        is_overflow,
    }
}

/// The two ledger lines recorded for every order: revenue and bonus pool.
pub fn ledger_lines(price_cents: i64) -> [LedgerLine; 2] {
    [
        LedgerLine {
            amount_cents: price_cents,
            entry_type: LedgerEntryType::Order,
            description: "Order payment",
        },
        LedgerLine {
            amount_cents: BONUS_POOL_CENTS,
            entry_type: LedgerEntryType::BonusPool,
            description: "Bonus pool contribution",
        },
    ]
}
