use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::USER_AGENT;
use axum::response::{IntoResponse, Response};

use crate::domain::commands::BookingCommand;

/// Pairs the deserialized command with request metadata worth recording
/// alongside the resulting events.
pub struct CommandExtractor(pub HashMap<String, String>, pub BookingCommand);

const USER_AGENT_KEY: &str = "userAgent";

impl<S: Send + Sync> FromRequest<S> for CommandExtractor {
    type Rejection = CommandExtractionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut metadata = HashMap::default();
        metadata.insert("time".to_string(), chrono::Utc::now().to_rfc3339());
        if let Some(user_agent) = req.headers().get(USER_AGENT) {
            if let Ok(value) = user_agent.to_str() {
                metadata.insert(USER_AGENT_KEY.to_string(), value.to_string());
            }
        }

        let Json(command): Json<BookingCommand> = Json::from_request(req, state).await?;
        Ok(CommandExtractor(metadata, command))
    }
}

pub struct CommandExtractionError(JsonRejection);

impl From<JsonRejection> for CommandExtractionError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection)
    }
}

impl IntoResponse for CommandExtractionError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.0.body_text()).into_response()
    }
}
