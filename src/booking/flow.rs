//! Booking steps and the query parameters that carry state between them.
//!
//! The flow keeps no server-side session: every step URL carries `date`,
//! `zoneId` and (when chosen) `express=1`.

use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::models::{ZoneId, parse_pickup_date};

/// Steps of the booking flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Book,
    Schedule,
    Review,
    Success,
    Cancel,
}

impl BookingStep {
    pub fn path(self) -> &'static str {
        match self {
            Self::Book => "/book",
            Self::Schedule => "/schedule",
            Self::Review => "/review",
            Self::Success => "/success",
            Self::Cancel => "/cancel",
        }
    }
}

/// Raw step query as it appears in the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "zoneId", skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express: Option<String>,
}

impl BookingQuery {
    pub fn is_express(&self) -> bool {
        self.express.as_deref() == Some("1")
    }

    /// Parsed selection, or `None` when date or zone is missing or unusable.
    pub fn selection(&self) -> Option<BookingSelection> {
        let date = self.date.as_deref().and_then(parse_pickup_date)?;
        let zone_id = self
            .zone_id
            .as_deref()?
            .parse::<ZoneId>()
            .ok()
            .filter(|id| *id > 0)?;
        Some(BookingSelection {
            date,
            zone_id,
            express: self.is_express(),
        })
    }
}

/// A complete date + zone choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSelection {
    pub date: NaiveDate,
    pub zone_id: ZoneId,
    pub express: bool,
}

impl BookingSelection {
    /// Relative URL of `step` carrying this selection.
    pub fn step_url(self, step: BookingStep) -> String {
        // date and zone are already validated, no escaping needed
        let mut url = format!(
            "{}?date={}&zoneId={}",
            step.path(),
            self.date.format("%Y-%m-%d"),
            self.zone_id
        );
        if self.express {
            url.push_str("&express=1");
        }
        url
    }

    /// External scheduler URL: `<base>?date=..[&express=1]`.
    pub fn calendar_url(self, base: &str) -> Option<Url> {
        let mut url = Url::parse(base).ok()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("date", &self.date.format("%Y-%m-%d").to_string());
            if self.express {
                pairs.append_pair("express", "1");
            }
        }
        Some(url)
    }

    /// Body for `POST /orders`.
    pub fn order_request(self) -> OrderRequestBody {
        OrderRequestBody {
            zone_id: self.zone_id,
            pickup_date: self.date.format("%Y-%m-%d").to_string(),
            is_express: self.express,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequestBody {
    pub zone_id: ZoneId,
    pub pickup_date: String,
    pub is_express: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(date: Option<&str>, zone: Option<&str>, express: Option<&str>) -> BookingQuery {
        BookingQuery {
            date: date.map(String::from),
            zone_id: zone.map(String::from),
            express: express.map(String::from),
        }
    }

    #[test]
    fn test_step_paths() {
        assert_eq!(BookingStep::Book.path(), "/book");
        assert_eq!(BookingStep::Schedule.path(), "/schedule");
        assert_eq!(BookingStep::Review.path(), "/review");
        assert_eq!(BookingStep::Success.path(), "/success");
        assert_eq!(BookingStep::Cancel.path(), "/cancel");
    }

    #[test]
    fn test_selection_requires_date_and_zone() {
        assert!(query(None, Some("1"), None).selection().is_none());
        assert!(query(Some("2026-10-20"), None, None).selection().is_none());
        assert!(query(Some("tomorrow"), Some("1"), None).selection().is_none());
        assert!(query(Some("2026-10-20"), Some("0"), None).selection().is_none());

        let sel = query(Some("2026-10-20"), Some("2"), Some("1"))
            .selection()
            .unwrap();
        assert_eq!(sel.zone_id, 2);
        assert!(sel.express);
    }

    #[test]
    fn test_express_only_when_one() {
        assert!(query(None, None, Some("1")).is_express());
        assert!(!query(None, None, Some("true")).is_express());
        assert!(!query(None, None, None).is_express());
    }

    #[test]
    fn test_step_urls() {
        let sel = query(Some("2026-10-20"), Some("3"), None).selection().unwrap();
        assert_eq!(
            sel.step_url(BookingStep::Schedule),
            "/schedule?date=2026-10-20&zoneId=3"
        );
        let express = BookingSelection { express: true, ..sel };
        assert_eq!(
            express.step_url(BookingStep::Review),
            "/review?date=2026-10-20&zoneId=3&express=1"
        );
        let round_trip = query(Some("2026-10-20"), Some("3"), Some("1")).selection();
        assert_eq!(round_trip, Some(express));
    }

    #[test]
    fn test_calendar_url() {
        let sel = query(Some("2026-10-20"), Some("3"), Some("1")).selection().unwrap();
        let url = sel.calendar_url("https://cal.example.com/laundry/pickup").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cal.example.com/laundry/pickup?date=2026-10-20&express=1"
        );
        assert!(sel.calendar_url("not a url").is_none());
    }

    #[test]
    fn test_order_request_uses_is_express() {
        let sel = query(Some("2026-10-20"), Some("3"), Some("1")).selection().unwrap();
        let body = serde_json::to_value(sel.order_request()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"zone_id": 3, "pickup_date": "2026-10-20", "is_express": true})
        );
    }
}
