use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use cqrs_es::mem_store::MemStore;
use cqrs_es::{CqrsFramework, Query};

use crate::EventLoggingQuery;
use crate::domain::booking::{BookingFlow, BookingServices};
use crate::view_repository::SessionViewRepository;

/// The event-sourced framework for booking sessions, backed by an in-memory
/// store: drafts live for one browsing session and are never persisted.
pub type SessionCqrs = CqrsFramework<BookingFlow, MemStore<BookingFlow>>;

/// Environment-driven settings with local-development defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub max_stay_nights: u32,
    pub port: u16,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("BOOKING_API_URL")
                .unwrap_or_else(|_| "http://localhost:3001/api".to_string()),
            api_timeout: Duration::from_secs(env_or("BOOKING_API_TIMEOUT_SECS", 30)),
            max_stay_nights: env_or("BOOKING_MAX_STAY_NIGHTS", 30),
            port: env_or("PORT", 3030),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[must_use]
pub fn cqrs_framework(
    services: BookingServices,
) -> (Arc<SessionCqrs>, Arc<SessionViewRepository>) {
    // A very simple query that writes each event to the log.
    let logging_query = EventLoggingQuery {};

    // A query that keeps the current state of each booking session for the
    // display layer to read.
    let session_views = Arc::new(SessionViewRepository::new());

    // Create and return an event-sourced `CqrsFramework`.
    let queries: Vec<Box<dyn Query<BookingFlow>>> =
        vec![Box::new(logging_query), Box::new((*session_views).clone())];

    (
        Arc::new(CqrsFramework::new(MemStore::default(), queries, services)),
        session_views,
    )
}
