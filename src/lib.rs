//! Laundry Loop - laundry pickup booking service
//!
//! Customers pick a date and a service zone, optionally add express
//! handling, schedule a pickup window and pay. Each zone has a daily
//! capacity; orders beyond it are accepted at an overflow surcharge.
//!
//! # Modules
//!
//! - [`models`] - Zone, Order and LedgerEntry types
//! - [`pricing`] - Price and ledger line computation
//! - [`availability`] - Remaining slots per zone for a date
//! - [`orders`] - Order creation with per zone/date admission
//! - [`ledger`] - Ledger reader
//! - [`payment`] - Signed payment webhook handling
//! - [`booking`] - Booking flow steps, pages and API client
//! - [`store`] - Store abstraction with PostgreSQL and in-memory backends
//! - [`gateway`] - axum HTTP surface

pub mod availability;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod orders;
pub mod payment;
pub mod pricing;
pub mod store;

// Convenient re-exports at crate root
pub use availability::{AvailabilityCalculator, ZoneAvailability};
pub use error::ServiceError;
pub use ledger::LedgerReader;
pub use models::{LedgerEntry, LedgerEntryType, Order, OrderId, OrderStatus, UserId, Zone, ZoneId};
pub use orders::{CreateOrder, CreatedOrder, OrderService};
pub use payment::PaymentConfirmationHandler;
pub use store::{BookingStore, MemoryStore, PgStore, StoreError};
