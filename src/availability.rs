//! Zone availability for a pickup date

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ServiceError;
use crate::models::{Zone, ZoneId, parse_pickup_date};
use crate::store::BookingStore;

/// A zone plus its booking load on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ZoneAvailability {
    #[serde(flatten)]
    pub zone: Zone,
    #[schema(value_type = String, example = "2026-10-20")]
    pub date: NaiveDate,
    pub orders_count: i64,
    /// `max(capacity_per_day - orders_count, 0)`
    pub available_slots: i64,
    pub is_available: bool,
}

/// Remaining slots; never negative once a zone is in overflow.
#[inline]
pub fn available_slots(capacity_per_day: i32, orders_count: i64) -> i64 {
    (i64::from(capacity_per_day) - orders_count).max(0)
}

/// Join zones with per-zone counts. Every zone is returned, full or not.
pub fn summarize(
    zones: Vec<Zone>,
    counts: &HashMap<ZoneId, i64>,
    date: NaiveDate,
) -> Vec<ZoneAvailability> {
    zones
        .into_iter()
        .map(|zone| {
            let orders_count = counts.get(&zone.id).copied().unwrap_or(0);
            let available_slots = available_slots(zone.capacity_per_day, orders_count);
            ZoneAvailability {
                zone,
                date,
                orders_count,
                available_slots,
                is_available: available_slots > 0,
            }
        })
        .collect()
}

pub struct AvailabilityCalculator {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityCalculator {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Availability of every zone on `date` (`YYYY-MM-DD`).
    pub async fn for_date(&self, date: Option<&str>) -> Result<Vec<ZoneAvailability>, ServiceError> {
        let date = date
            .filter(|d| !d.is_empty())
            .and_then(parse_pickup_date)
            .ok_or(ServiceError::Validation("Missing or invalid date parameter"))?;

        let zones = self
            .store
            .list_zones()
            .await
            .map_err(|e| ServiceError::retrieval("Failed to fetch zones", e))?;

        let counts = self
            .store
            .count_orders_by_zone(date)
            .await
            .map_err(|e| ServiceError::retrieval("Failed to compute availability", e))?;

        tracing::debug!(%date, zones = zones.len(), "computed zone availability");
        Ok(summarize(zones, &counts, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FailPoint, MemoryStore};

    fn zone(id: ZoneId, capacity: i32) -> Zone {
        Zone {
            id,
            name: format!("Zone {}", id),
            capacity_per_day: capacity,
        }
    }

    #[test]
    fn test_available_slots_never_negative() {
        assert_eq!(available_slots(5, 0), 5);
        assert_eq!(available_slots(5, 3), 2);
        assert_eq!(available_slots(5, 5), 0);
        assert_eq!(available_slots(5, 9), 0);
        assert_eq!(available_slots(0, 0), 0);
    }

    #[test]
    fn test_summarize_keeps_full_zones() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let counts = HashMap::from([(1, 7), (2, 1)]);
        let rows = summarize(vec![zone(1, 5), zone(2, 3), zone(3, 4)], &counts, date);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].orders_count, 7);
        assert_eq!(rows[0].available_slots, 0);
        assert!(!rows[0].is_available);
        assert_eq!(rows[1].available_slots, 2);
        assert_eq!(rows[2].orders_count, 0);
        assert_eq!(rows[2].available_slots, 4);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let rows = summarize(vec![zone(1, 5)], &HashMap::new(), date);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["capacity_per_day"], 5);
        assert_eq!(json["date"], "2026-10-20");
        assert_eq!(json["available_slots"], 5);
    }

    #[tokio::test]
    async fn test_for_date_rejects_missing_or_bad_date() {
        let calc = AvailabilityCalculator::new(Arc::new(MemoryStore::seeded()));
        for input in [None, Some(""), Some("tomorrow"), Some("2026-02-30")] {
            let err = calc.for_date(input).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "input {:?}", input);
        }
    }

    #[tokio::test]
    async fn test_for_date_count_failure_is_retrieval_error() {
        let store = Arc::new(MemoryStore::seeded());
        store.fail_on(FailPoint::CountOrders);
        let calc = AvailabilityCalculator::new(store);
        let err = calc.for_date(Some("2026-10-20")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Retrieval { .. }));
        assert_eq!(err.to_string(), "Failed to compute availability");
    }
}
