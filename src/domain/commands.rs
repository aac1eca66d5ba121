use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// User input events forwarded by the presentation layer. Any collaborator
/// may post these: a room tile elsewhere on the page selects a room by
/// sending `SelectRoom` rather than through a shared broadcast channel.
#[derive(Debug, Deserialize)]
pub enum BookingCommand {
    Open {
        id: Uuid,
    },
    SelectRoom {
        room_id: String,
        room_name: String,
        price_per_night: i64,
    },
    SelectDates {
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    },
    SetGuests {
        guests: u32,
    },
    SetChildren {
        children: u32,
    },
    SetRoomCount {
        rooms: u32,
    },
    SetGuestDetails {
        name: String,
        phone: String,
        #[serde(default)]
        special_requests: String,
    },
    Submit,
}
