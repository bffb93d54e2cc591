//! Booking flow: book -> schedule -> review/pay -> outcome.

pub mod client;
pub mod flow;
pub mod pages;

pub use client::{BookingClient, BookingClientError};
pub use flow::{BookingQuery, BookingSelection, BookingStep, OrderRequestBody};
