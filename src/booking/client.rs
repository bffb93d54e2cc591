//! HTTP client for the booking API, as used by the booking flow.

use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use super::flow::BookingSelection;
use crate::availability::ZoneAvailability;
use crate::orders::CreatedOrder;

#[derive(Debug, Error)]
pub enum BookingClientError {
    #[error("Invalid API base URL: {0}")]
    BaseUrl(String),

    #[error("Booking API unavailable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

#[derive(Deserialize)]
struct ZonesResponse {
    zones: Vec<ZoneAvailability>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct BookingClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BookingClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str) -> Result<Self, BookingClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| BookingClientError::BaseUrl(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BookingClientError> {
        self.base_url
            .join(path)
            .map_err(|e| BookingClientError::BaseUrl(e.to_string()))
    }

    /// `GET zones?date=`
    pub async fn get_zones(&self, date: NaiveDate) -> Result<Vec<ZoneAvailability>, BookingClientError> {
        let mut url = self.endpoint("zones")?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());

        let resp = self.client.get(url).send().await?;
        let body: ZonesResponse = Self::check(resp, "Failed to fetch zones").await?.json().await?;
        Ok(body.zones)
    }

    /// `POST orders` for a completed selection.
    pub async fn create_order(
        &self,
        selection: BookingSelection,
    ) -> Result<CreatedOrder, BookingClientError> {
        let url = self.endpoint("orders")?;
        let resp = self
            .client
            .post(url)
            .json(&selection.order_request())
            .send()
            .await?;
        Ok(Self::check(resp, "Failed to create order").await?.json().await?)
    }

    async fn check(
        resp: reqwest::Response,
        fallback: &str,
    ) -> Result<reqwest::Response, BookingClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => fallback.to_string(),
        };
        tracing::warn!(status = status.as_u16(), %message, "booking API call failed");
        Err(BookingClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
