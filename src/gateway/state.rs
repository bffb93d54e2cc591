use std::sync::Arc;

use crate::availability::AvailabilityCalculator;
use crate::config::{BookingConfig, PaymentConfig};
use crate::ledger::LedgerReader;
use crate::orders::OrderService;
use crate::payment::PaymentConfirmationHandler;
use crate::store::BookingStore;

/// Gateway application state (shared)
///
/// Every component holds the same store handle; nothing is global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub availability: Arc<AvailabilityCalculator>,
    pub orders: Arc<OrderService>,
    pub ledger: Arc<LedgerReader>,
    pub payments: Arc<PaymentConfirmationHandler>,
    pub booking: BookingConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn BookingStore>,
        transactional_ledger: bool,
        payment: &PaymentConfig,
        booking: BookingConfig,
    ) -> Self {
        Self {
            availability: Arc::new(AvailabilityCalculator::new(store.clone())),
            orders: Arc::new(OrderService::new(store.clone(), transactional_ledger)),
            ledger: Arc::new(LedgerReader::new(store.clone())),
            payments: Arc::new(PaymentConfirmationHandler::new(
                store.clone(),
                payment.webhook_secret.clone(),
                payment.tolerance_secs,
            )),
            store,
            booking,
        }
    }
}
