use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::services::availability::{
    AvailabilityChecker, AvailabilityError, AvailabilitySnapshot, normalize_availability,
};
use crate::services::booking_api::{
    BookingConfirmation, BookingGateway, BookingPayload, SubmissionError, parse_booking_response,
};
use crate::services::dates::DateRange;
use crate::services::rooms::{RoomDirectory, RoomType, RoomsError, normalize_rooms};

const DATE_FMT: &str = "%Y-%m-%d";

/// One reqwest client for everything the engine consumes from the REST
/// backend: the rooms listing, the check-dates availability endpoint and
/// booking submission. The client-side timeout is the hard bound on request
/// lifetime; there is no caching here, results are owned by the aggregate.
#[derive(Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
}

impl HttpBackendClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, String> {
        debug!(url, "backend request");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }
        response.json::<Value>().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl AvailabilityChecker for HttpBackendClient {
    async fn check(
        &self,
        room_id: &str,
        range: &DateRange,
    ) -> Result<AvailabilitySnapshot, AvailabilityError> {
        let url = format!("{}/rooms/{room_id}/check-dates", self.base_url);
        let query = [
            ("checkInDate", range.check_in.format(DATE_FMT).to_string()),
            ("checkOutDate", range.check_out.format(DATE_FMT).to_string()),
        ];
        let body = self
            .get_json(&url, &query)
            .await
            .map_err(AvailabilityError::Unreachable)?;
        let snapshot = normalize_availability(&body)?;
        debug!(
            room_id,
            available = snapshot.available_rooms,
            total = snapshot.total_rooms,
            "availability check"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl RoomDirectory for HttpBackendClient {
    async fn list_rooms(&self) -> Result<Vec<RoomType>, RoomsError> {
        let url = format!("{}/rooms", self.base_url);
        let body = self
            .get_json(&url, &[])
            .await
            .map_err(RoomsError::Unreachable)?;
        normalize_rooms(&body)
    }
}

#[async_trait]
impl BookingGateway for HttpBackendClient {
    async fn submit(
        &self,
        payload: &BookingPayload,
    ) -> Result<BookingConfirmation, SubmissionError> {
        let url = format!("{}/bookings", self.base_url);
        debug!(url, room = %payload.room, nights = payload.nights, "submitting booking");
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Unreachable(e.to_string()))?;
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SubmissionError::Unreachable(e.to_string()))?;
        if !status.is_success() {
            // the backend sends its reason in the error body
            warn!(%status, "booking submission rejected");
            return Err(parse_booking_response(&body)
                .err()
                .unwrap_or_else(|| SubmissionError::Rejected(format!("unexpected status {status}"))));
        }
        parse_booking_response(&body)
    }
}
