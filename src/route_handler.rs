use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use uuid::Uuid;

use crate::command_extractor::CommandExtractor;
use crate::state::ApplicationState;

// Serves as our query endpoint to respond with the materialized
// `BookingFormView` for the requested session.
pub async fn query_handler(
    Path(session_id): Path<String>,
    State(state): State<ApplicationState>,
) -> Response {
    let Ok(uuid) = Uuid::parse_str(&session_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID format").into_response();
    };

    match state.booking_query.load(&uuid).await {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// Serves as our command endpoint to make changes in a `BookingFlow`
// aggregate. Validation failures come back as plain-text messages the form
// renders inline.
pub async fn command_handler(
    Path(session_id): Path<String>,
    State(state): State<ApplicationState>,
    CommandExtractor(metadata, command): CommandExtractor,
) -> Response {
    match state
        .cqrs
        .execute_with_metadata(&session_id, command, metadata)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%session_id, error = %err, "command rejected");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
    }
}

// The rooms listing the booking form renders its selector from, already
// normalized from the backend's shape variants.
pub async fn rooms_handler(State(state): State<ApplicationState>) -> Response {
    match state.rooms.list_rooms().await {
        Ok(rooms) => (StatusCode::OK, Json(rooms)).into_response(),
        Err(err) => {
            error!(error = %err, "rooms listing failed");
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}
