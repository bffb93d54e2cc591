//! HTTP handlers
//!
//! - `zones`, `orders`, `ledger`: JSON API
//! - `webhook`: payment provider callback
//! - `health`: liveness + store ping
//! - `pages`: server-rendered booking flow

pub mod health;
pub mod ledger;
pub mod orders;
pub mod pages;
pub mod webhook;
pub mod zones;

pub use health::{HealthResponse, health_check};
pub use ledger::get_ledger;
pub use orders::{create_order, get_orders};
pub use webhook::payment_webhook;
pub use zones::get_zones;
