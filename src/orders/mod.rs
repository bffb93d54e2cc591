//! Order pricing and creation
//!
//! - [`service`]: overflow check, pricing, persistence and ledger writes
//! - [`admission`]: per zone/date serialization of the count-then-insert step

pub mod admission;
pub mod service;

pub use admission::{AdmissionGate, AdmissionPermit};
pub use service::{CreateOrder, CreatedOrder, OrderService};
