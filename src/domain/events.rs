use chrono::NaiveDate;
use cqrs_es::DomainEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::booking::RoomCountSource;
use crate::services::availability::AvailabilitySnapshot;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BookingEvent {
    Opened {
        id: Uuid,
    },
    RoomSelected {
        room_id: String,
        room_name: String,
        price_per_night: i64,
    },
    DatesChosen {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    /// Availability events carry the full (room, range) key they were
    /// queried for so a result that arrives after the selection moved on
    /// can be recognized and discarded.
    AvailabilityChecked {
        room_id: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
        snapshot: AvailabilitySnapshot,
    },
    AvailabilityCheckFailed {
        room_id: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
        reason: String,
    },
    GuestCountSet {
        guests: u32,
        children: u32,
    },
    RoomCountSet {
        rooms: u32,
        source: RoomCountSource,
    },
    GuestDetailsProvided {
        name: String,
        phone: String,
        special_requests: String,
    },
    SubmissionAccepted {
        booking_reference: Option<String>,
    },
}

impl DomainEvent for BookingEvent {
    fn event_type(&self) -> String {
        let event_type: &str = match self {
            BookingEvent::Opened { .. } => "BookingOpened",
            BookingEvent::RoomSelected { .. } => "RoomSelected",
            BookingEvent::DatesChosen { .. } => "DatesChosen",
            BookingEvent::AvailabilityChecked { .. } => "AvailabilityChecked",
            BookingEvent::AvailabilityCheckFailed { .. } => "AvailabilityCheckFailed",
            BookingEvent::GuestCountSet { .. } => "GuestCountSet",
            BookingEvent::RoomCountSet { .. } => "RoomCountSet",
            BookingEvent::GuestDetailsProvided { .. } => "GuestDetailsProvided",
            BookingEvent::SubmissionAccepted { .. } => "BookingSubmitted",
        };
        event_type.to_string()
    }

    fn event_version(&self) -> String {
        "1.0".to_string()
    }
}
