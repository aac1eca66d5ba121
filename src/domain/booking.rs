use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use cqrs_es::Aggregate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::commands::BookingCommand;
use crate::domain::events::BookingEvent;
use crate::services::availability::{AvailabilityChecker, AvailabilitySnapshot};
use crate::services::booking_api::{BookingGateway, BookingPayload, guest_email_from_phone};
use crate::services::capacity::{CapacityProfile, capacity_profile_for, recommended_rooms};
use crate::services::dates::{DateRange, DateRangeError, validate_date_range};
use crate::services::pricing::pricing_breakdown;

#[cfg(test)]
mod flow_tests;

/// The booking-flow aggregate: one instance per booking attempt, sole owner
/// of the draft. Display components observe it through the materialized
/// view; they never mutate it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFlow {
    id: Uuid,
    stage: FlowStage,
    room: Option<SelectedRoom>,
    dates: Option<DateRange>,
    guests: u32,
    children: u32,
    rooms_requested: u32,
    room_count_source: RoomCountSource,
    guest: Option<GuestContact>,
    availability: AvailabilityState,
    last_booking_reference: Option<String>,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self {
            id: Uuid::default(),
            stage: FlowStage::default(),
            room: None,
            dates: None,
            guests: 1,
            children: 0,
            rooms_requested: 1,
            room_count_source: RoomCountSource::default(),
            guest: None,
            availability: AvailabilityState::default(),
            last_booking_reference: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlowStage {
    #[default]
    Idle,
    RoomSelected,
    DatesSelected,
    AvailabilityChecked,
}

/// Whether the room count was last set by the recommendation or typed by the
/// user. A manual choice is never silently overwritten while guest count and
/// room type stay the same; either of those changing flips the source back
/// to `Auto` and the recommendation runs again.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoomCountSource {
    #[default]
    Auto,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedRoom {
    pub room_id: String,
    pub name: String,
    pub price_per_night: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestContact {
    pub name: String,
    pub phone: String,
    pub special_requests: String,
}

/// Availability for the current (room, date range) selection. `Unknown`
/// covers both "not checked yet" and "invalidated by a newer selection";
/// `CheckFailed` means the check ran and produced no usable answer, which is
/// retryable and must never be conflated with a sold-out `Known` result.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AvailabilityState {
    #[default]
    Unknown,
    CheckFailed {
        reason: String,
    },
    Known {
        snapshot: AvailabilitySnapshot,
    },
}

#[async_trait]
impl Aggregate for BookingFlow {
    type Command = BookingCommand;
    type Event = BookingEvent;
    type Error = BookingError;
    type Services = BookingServices;

    fn aggregate_type() -> String {
        "BookingFlow".to_string()
    }

    async fn handle(
        &self,
        command: Self::Command,
        services: &Self::Services,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        if !matches!(command, BookingCommand::Open { .. }) && self.id == Uuid::default() {
            return Err(BookingError::NotFound);
        }

        match command {
            BookingCommand::Open { id } => {
                if self.id == id {
                    Err(BookingError::AlreadyOpened)
                } else {
                    Ok(vec![BookingEvent::Opened { id }])
                }
            }
            BookingCommand::SelectRoom {
                room_id,
                room_name,
                price_per_night,
            } => {
                self.handle_select_room(room_id, room_name, price_per_night, services)
                    .await
            }
            BookingCommand::SelectDates {
                check_in,
                check_out,
            } => {
                let room = self.room.as_ref().ok_or(BookingError::RoomNotSelected)?;
                let today = Local::now().date_naive();
                let range = validate_date_range(
                    today,
                    check_in,
                    check_out,
                    services.policy().max_stay_nights,
                )?;
                Ok(vec![
                    BookingEvent::DatesChosen {
                        check_in: range.check_in,
                        check_out: range.check_out,
                    },
                    Self::availability_event(services, &room.room_id, &range).await,
                ])
            }
            BookingCommand::SetGuests { guests } => {
                let profile = self.capacity_profile();
                if guests > profile.max_guests_total {
                    return Err(BookingError::GuestLimitExceeded {
                        max: profile.max_guests_total,
                    });
                }
                let children = clamp_children(guests, self.children);
                let mut events = vec![BookingEvent::GuestCountSet { guests, children }];
                if guests > 0 {
                    // a guest-count change always clears any manual override
                    events.push(BookingEvent::RoomCountSet {
                        rooms: recommended_rooms(guests, &profile),
                        source: RoomCountSource::Auto,
                    });
                }
                Ok(events)
            }
            BookingCommand::SetChildren { children } => {
                if self.guests == 0 {
                    // counts stay as they are until a guest total arrives
                    return Ok(vec![]);
                }
                Ok(vec![BookingEvent::GuestCountSet {
                    guests: self.guests,
                    children: children.min(self.guests - 1),
                }])
            }
            BookingCommand::SetRoomCount { rooms } => {
                if rooms < 1 {
                    return Err(BookingError::RoomCountRequired);
                }
                let profile = self.capacity_profile();
                if rooms > profile.max_rooms_of_type {
                    return Err(BookingError::RoomCountExceedsLimit {
                        max: profile.max_rooms_of_type,
                    });
                }
                let required = recommended_rooms(self.guests, &profile);
                if rooms < required {
                    return Err(BookingError::RoomCountBelowMinimum {
                        required,
                        guests: self.guests,
                    });
                }
                Ok(vec![BookingEvent::RoomCountSet {
                    rooms,
                    source: RoomCountSource::Manual,
                }])
            }
            BookingCommand::SetGuestDetails {
                name,
                phone,
                special_requests,
            } => {
                let name = validate_name(&name)?;
                let phone = validate_phone(&phone)?;
                let special_requests = validate_special_requests(&special_requests)?;
                Ok(vec![BookingEvent::GuestDetailsProvided {
                    name,
                    phone,
                    special_requests,
                }])
            }
            BookingCommand::Submit => self.handle_submit(services).await,
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            BookingEvent::Opened { id } => {
                self.id = id;
                self.stage = FlowStage::Idle;
            }
            BookingEvent::RoomSelected {
                room_id,
                room_name,
                price_per_night,
            } => {
                self.room = Some(SelectedRoom {
                    room_id,
                    name: room_name,
                    price_per_night,
                });
                self.stage = FlowStage::RoomSelected;
                // availability and pricing were tied to the previous room
                self.availability = AvailabilityState::Unknown;
                self.room_count_source = RoomCountSource::Auto;
            }
            BookingEvent::DatesChosen {
                check_in,
                check_out,
            } => {
                self.dates = Some(DateRange {
                    check_in,
                    check_out,
                });
                self.stage = FlowStage::DatesSelected;
                self.availability = AvailabilityState::Unknown;
            }
            BookingEvent::AvailabilityChecked {
                room_id,
                check_in,
                check_out,
                snapshot,
            } => {
                // a result for a superseded selection is stale: discard it
                if self.matches_current_selection(&room_id, check_in, check_out) {
                    self.availability = AvailabilityState::Known { snapshot };
                    self.stage = FlowStage::AvailabilityChecked;
                }
            }
            BookingEvent::AvailabilityCheckFailed {
                room_id,
                check_in,
                check_out,
                reason,
            } => {
                if self.matches_current_selection(&room_id, check_in, check_out) {
                    self.availability = AvailabilityState::CheckFailed { reason };
                    self.stage = FlowStage::AvailabilityChecked;
                }
            }
            BookingEvent::GuestCountSet { guests, children } => {
                self.guests = guests;
                self.children = children;
            }
            BookingEvent::RoomCountSet { rooms, source } => {
                self.rooms_requested = rooms;
                self.room_count_source = source;
            }
            BookingEvent::GuestDetailsProvided {
                name,
                phone,
                special_requests,
            } => {
                self.guest = Some(GuestContact {
                    name,
                    phone,
                    special_requests,
                });
            }
            BookingEvent::SubmissionAccepted { booking_reference } => {
                // the draft is done with; a fresh one starts on this session
                *self = Self {
                    id: self.id,
                    last_booking_reference: booking_reference,
                    ..Self::default()
                };
            }
        }
    }
}

impl BookingFlow {
    async fn handle_select_room(
        &self,
        room_id: String,
        room_name: String,
        price_per_night: i64,
        services: &BookingServices,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        if price_per_night < 0 {
            return Err(BookingError::InvalidRoomPrice);
        }
        let profile = capacity_profile_for(&room_name);
        let mut events = vec![BookingEvent::RoomSelected {
            room_id: room_id.clone(),
            room_name,
            price_per_night,
        }];
        // the new type may hold fewer guests than the draft carries
        let guests = self.guests.min(profile.max_guests_total);
        let children = clamp_children(guests, self.children);
        if guests != self.guests || children != self.children {
            events.push(BookingEvent::GuestCountSet { guests, children });
        }
        events.push(BookingEvent::RoomCountSet {
            rooms: recommended_rooms(guests, &profile),
            source: RoomCountSource::Auto,
        });
        if let Some(range) = self.dates {
            events.push(Self::availability_event(services, &room_id, &range).await);
        }
        Ok(events)
    }

    async fn handle_submit(
        &self,
        services: &BookingServices,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let room = self.room.as_ref().ok_or(BookingError::RoomNotSelected)?;
        let range = self.dates.ok_or(BookingError::DatesNotSelected)?;
        if self.guests < 1 {
            return Err(BookingError::GuestsRequired);
        }
        let guest = self.guest.as_ref().ok_or(BookingError::GuestDetailsMissing)?;

        match &self.availability {
            AvailabilityState::Unknown => {
                return Err(BookingError::AvailabilityUnknown(
                    "availability has not been checked for this selection".to_string(),
                ));
            }
            AvailabilityState::CheckFailed { reason } => {
                return Err(BookingError::AvailabilityUnknown(reason.clone()));
            }
            AvailabilityState::Known { .. } => {}
        }

        // availability may have changed between the last check and the
        // click; re-verify before constructing the payload
        let snapshot = services
            .availability()
            .check(&room.room_id, &range)
            .await
            .map_err(|e| BookingError::AvailabilityUnknown(e.to_string()))?;
        if snapshot.available_rooms == 0 {
            return Err(BookingError::SoldOut);
        }
        if self.rooms_requested > snapshot.available_rooms {
            return Err(BookingError::InsufficientAvailability {
                available: snapshot.available_rooms,
                requested: self.rooms_requested,
            });
        }

        let payload = self.build_payload(room, &range, guest);
        let confirmation = services
            .gateway()
            .submit(&payload)
            .await
            .map_err(|e| BookingError::SubmissionFailed(e.to_string()))?;
        Ok(vec![BookingEvent::SubmissionAccepted {
            booking_reference: confirmation.booking_reference,
        }])
    }

    fn build_payload(
        &self,
        room: &SelectedRoom,
        range: &DateRange,
        guest: &GuestContact,
    ) -> BookingPayload {
        let nights = range.nights();
        let breakdown = pricing_breakdown(room.price_per_night, nights, self.rooms_requested);
        BookingPayload {
            room: room.room_id.clone(),
            check_in: range.check_in,
            check_out: range.check_out,
            guests: self.guests,
            children: self.children,
            number_of_rooms: self.rooms_requested,
            adults: self.guests.saturating_sub(self.children),
            guest_name: guest.name.clone(),
            guest_email: guest_email_from_phone(&guest.phone),
            guest_phone: guest.phone.clone(),
            nights,
            price_per_night: room.price_per_night,
            total_price: breakdown.total_price,
            tax_amount: breakdown.gst_amount,
            discount_amount: 0,
            payment_status: "pending".to_string(),
            status: "confirmed".to_string(),
            special_requests: guest.special_requests.clone(),
        }
    }

    async fn availability_event(
        services: &BookingServices,
        room_id: &str,
        range: &DateRange,
    ) -> BookingEvent {
        match services.availability().check(room_id, range).await {
            Ok(snapshot) => BookingEvent::AvailabilityChecked {
                room_id: room_id.to_string(),
                check_in: range.check_in,
                check_out: range.check_out,
                snapshot,
            },
            Err(e) => BookingEvent::AvailabilityCheckFailed {
                room_id: room_id.to_string(),
                check_in: range.check_in,
                check_out: range.check_out,
                reason: e.to_string(),
            },
        }
    }

    fn matches_current_selection(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> bool {
        self.room.as_ref().is_some_and(|r| r.room_id == room_id)
            && self
                .dates
                .is_some_and(|d| d.check_in == check_in && d.check_out == check_out)
    }

    fn capacity_profile(&self) -> CapacityProfile {
        capacity_profile_for(self.room.as_ref().map_or("", |r| r.name.as_str()))
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    #[must_use]
    pub fn room(&self) -> Option<&SelectedRoom> {
        self.room.as_ref()
    }

    #[must_use]
    pub fn dates(&self) -> Option<DateRange> {
        self.dates
    }

    #[must_use]
    pub fn guests(&self) -> u32 {
        self.guests
    }

    #[must_use]
    pub fn children(&self) -> u32 {
        self.children
    }

    #[must_use]
    pub fn rooms_requested(&self) -> u32 {
        self.rooms_requested
    }

    #[must_use]
    pub fn room_count_source(&self) -> RoomCountSource {
        self.room_count_source
    }

    #[must_use]
    pub fn availability(&self) -> &AvailabilityState {
        &self.availability
    }

    #[must_use]
    pub fn last_booking_reference(&self) -> Option<&String> {
        self.last_booking_reference.as_ref()
    }
}

/// At least one adult must remain; a children edit can never reach the
/// guest total. With no guests yet, counts are left alone until one arrives.
fn clamp_children(guests: u32, children: u32) -> u32 {
    if guests == 0 {
        children
    } else {
        children.min(guests - 1)
    }
}

fn validate_name(name: &str) -> Result<String, BookingError> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();
    if length < 2 {
        return Err(BookingError::InvalidName(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    if length > 100 {
        return Err(BookingError::InvalidName("Name is too long".to_string()));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err(BookingError::InvalidName(
            "Name can only contain letters, spaces, hyphens and apostrophes".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_phone(phone: &str) -> Result<String, BookingError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 || !matches!(digits.as_bytes()[0], b'6'..=b'9') {
        return Err(BookingError::InvalidPhone);
    }
    Ok(digits)
}

fn validate_special_requests(text: &str) -> Result<String, BookingError> {
    let trimmed = text.trim();
    if trimmed.chars().count() > 1000 {
        return Err(BookingError::InvalidSpecialRequests(
            "Special requests cannot exceed 1000 characters".to_string(),
        ));
    }
    let words = trimmed.split_whitespace().count();
    if words > 30 {
        return Err(BookingError::InvalidSpecialRequests(format!(
            "Special requests must be 30 words or less (currently {words} words)"
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Error, Debug, PartialEq)]
pub enum BookingError {
    #[error("Booking session not found")]
    NotFound,
    #[error("Booking session already opened")]
    AlreadyOpened,
    #[error("Please select a room type")]
    RoomNotSelected,
    #[error("Room price cannot be negative")]
    InvalidRoomPrice,
    #[error(transparent)]
    InvalidDateRange(#[from] DateRangeError),
    #[error("Maximum {max} guests allowed for this room type")]
    GuestLimitExceeded { max: u32 },
    #[error("At least 1 guest is required")]
    GuestsRequired,
    #[error("At least 1 room is required")]
    RoomCountRequired,
    #[error("Minimum {required} room(s) required for {guests} guests")]
    RoomCountBelowMinimum { required: u32, guests: u32 },
    #[error("Maximum {max} room(s) of this type can be booked")]
    RoomCountExceedsLimit { max: u32 },
    #[error("{0}")]
    InvalidName(String),
    #[error("Phone number must be exactly 10 digits starting with 6-9")]
    InvalidPhone,
    #[error("{0}")]
    InvalidSpecialRequests(String),
    #[error("Check-in and check-out dates are not selected")]
    DatesNotSelected,
    #[error("Please fill in your name and phone number")]
    GuestDetailsMissing,
    #[error("Could not verify room availability, please try again: {0}")]
    AvailabilityUnknown(String),
    #[error("No rooms available for the selected dates, please choose different dates")]
    SoldOut,
    #[error("Only {available} room(s) available, you're trying to book {requested}")]
    InsufficientAvailability { available: u32, requested: u32 },
    #[error("Failed to submit booking, please try again: {0}")]
    SubmissionFailed(String),
}

pub struct BookingServices {
    availability: Arc<dyn AvailabilityChecker>,
    gateway: Arc<dyn BookingGateway>,
    policy: BookingPolicy,
}

/// Property-level booking rules that are configuration, not code.
#[derive(Debug, Clone, Copy)]
pub struct BookingPolicy {
    pub max_stay_nights: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_stay_nights: 30,
        }
    }
}

impl BookingServices {
    pub fn new(availability: Arc<dyn AvailabilityChecker>, gateway: Arc<dyn BookingGateway>) -> Self {
        Self {
            availability,
            gateway,
            policy: BookingPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: BookingPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn availability(&self) -> &Arc<dyn AvailabilityChecker> {
        &self.availability
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<dyn BookingGateway> {
        &self.gateway
    }

    #[must_use]
    pub fn policy(&self) -> BookingPolicy {
        self.policy
    }
}
