use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::services::dates::DateRange;

/// Canonical availability record for one (room type, date range) query.
/// Invariant: `available_rooms + booked_rooms == total_rooms`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    pub available: bool,
    pub available_rooms: u32,
    pub total_rooms: u32,
    pub booked_rooms: u32,
}

impl AvailabilitySnapshot {
    /// Builds a snapshot that holds the counting invariant even when the
    /// backend reports partial or inconsistent counts. `booked_rooms` is
    /// always derived from the other two.
    #[must_use]
    pub fn reconcile(available: bool, available_rooms: u32, total_rooms: u32) -> Self {
        let total_rooms = total_rooms.max(available_rooms).max(1);
        Self {
            available,
            available_rooms,
            total_rooms,
            booked_rooms: total_rooms - available_rooms,
        }
    }
}

/// Why an availability check produced no usable answer. Every variant means
/// "could not determine availability" and blocks submission with a retryable
/// message; none of them means "definitely unavailable".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("availability service unreachable: {0}")]
    Unreachable(String),
    #[error("availability check failed: {0}")]
    Rejected(String),
    #[error("unrecognized availability response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    async fn check(
        &self,
        room_id: &str,
        range: &DateRange,
    ) -> Result<AvailabilitySnapshot, AvailabilityError>;
}

/// The backend has been observed answering the check-dates endpoint with the
/// availability fields at three different nesting depths: flat, under `data`,
/// and under `data.data`. This is the single place that knows about all of
/// them. A body without a boolean `available` field anywhere is an error,
/// never "available".
pub fn normalize_availability(body: &Value) -> Result<AvailabilitySnapshot, AvailabilityError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let reason = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("backend reported failure");
        return Err(AvailabilityError::Rejected(reason.to_string()));
    }

    let node = locate_availability_node(body).ok_or_else(|| {
        AvailabilityError::MalformedResponse(
            "no boolean `available` field in any known position".to_string(),
        )
    })?;

    // `available` is guaranteed boolean by the locate step.
    let available = node["available"].as_bool().unwrap_or(false);
    let available_rooms = count_field(node, "availableRooms").unwrap_or(u32::from(available));
    let total_rooms = count_field(node, "totalRooms").unwrap_or(available_rooms.max(1));
    Ok(AvailabilitySnapshot::reconcile(
        available,
        available_rooms,
        total_rooms,
    ))
}

fn locate_availability_node(body: &Value) -> Option<&Value> {
    if body.get("available").is_some_and(Value::is_boolean) {
        return Some(body);
    }
    let data = body.get("data")?;
    if data.get("available").is_some_and(Value::is_boolean) {
        return Some(data);
    }
    let inner = data.get("data")?;
    if inner.get("available").is_some_and(Value::is_boolean) {
        return Some(inner);
    }
    None
}

fn count_field(node: &Value, key: &str) -> Option<u32> {
    let raw = node.get(key)?.as_u64()?;
    u32::try_from(raw).ok()
}
