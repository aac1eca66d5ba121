use std::sync::Arc;

use crate::config::{SessionCqrs, Settings, cqrs_framework};
use crate::domain::booking::{BookingPolicy, BookingServices};
use crate::services::HttpBackendClient;
use crate::services::rooms::RoomDirectory;
use crate::view_repository::SessionViewRepository;

#[derive(Clone)]
pub struct ApplicationState {
    pub cqrs: Arc<SessionCqrs>,
    pub booking_query: Arc<SessionViewRepository>,
    pub rooms: Arc<dyn RoomDirectory>,
}

#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn new_application_state(settings: &Settings) -> ApplicationState {
    // One shared HTTP client serves all three backend concerns: the rooms
    // listing, availability checks and booking submission. Its timeout is
    // the hard bound on any in-flight request.
    let backend = Arc::new(
        HttpBackendClient::new(&settings.api_base_url, settings.api_timeout).unwrap(),
    );

    let services = BookingServices::new(backend.clone(), backend.clone()).with_policy(
        BookingPolicy {
            max_stay_nights: settings.max_stay_nights,
        },
    );

    let (cqrs, booking_query) = cqrs_framework(services);
    ApplicationState {
        cqrs,
        booking_query,
        rooms: backend,
    }
}
