use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A bookable room type as listed by the backend. `price` is whole rupees
/// per night and must be non-negative; negative values from the backend are
/// rejected at selection time rather than propagated into pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomType {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomsError {
    #[error("rooms service unreachable: {0}")]
    Unreachable(String),
    #[error("rooms listing failed: {0}")]
    Rejected(String),
    #[error("unrecognized rooms response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn list_rooms(&self) -> Result<Vec<RoomType>, RoomsError>;
}

/// The rooms listing arrives in three shapes depending on backend version:
/// a top-level `rooms` array, an array under `data.rooms`, or `data` itself
/// being the array. Normalized here, in one place.
pub fn normalize_rooms(body: &Value) -> Result<Vec<RoomType>, RoomsError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let reason = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("backend reported failure");
        return Err(RoomsError::Rejected(reason.to_string()));
    }

    let list = body
        .get("rooms")
        .filter(|v| v.is_array())
        .or_else(|| body.get("data").and_then(|data| data.get("rooms")).filter(|v| v.is_array()))
        .or_else(|| body.get("data").filter(|v| v.is_array()))
        .ok_or_else(|| {
            RoomsError::MalformedResponse("no rooms array in any known position".to_string())
        })?;

    serde_json::from_value(list.clone())
        .map_err(|e| RoomsError::MalformedResponse(e.to_string()))
}
