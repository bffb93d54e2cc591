//! Payment provider integration.
//!
//! ## Components
//! - `signature`: HMAC-SHA256 webhook signature scheme
//! - `webhook`: event parsing and order confirmation

pub mod signature;
pub mod webhook;

pub use signature::{DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER, SignatureError};
pub use webhook::{
    CHECKOUT_COMPLETED, PaymentConfirmationHandler, ProviderEvent, WebhookError, WebhookOutcome,
};
