use chrono::NaiveDate;
use cqrs_es::{EventEnvelope, View};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::booking::{BookingFlow, FlowStage, RoomCountSource};
use crate::domain::events::BookingEvent;
use crate::services::pricing::{PricingBreakdown, nights_between, pricing_breakdown};

/// The read surface for display components: every field the booking form
/// renders, and nothing it may write to. Updated as events are committed.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingFormView {
    pub id: Uuid,
    pub stage: FlowStage,
    pub room: Option<RoomSummary>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub nights: u32,
    pub guests: u32,
    pub children: u32,
    pub adults: u32,
    pub number_of_rooms: u32,
    pub room_count_source: RoomCountSource,
    pub availability: AvailabilityView,
    /// Recomputed from price, nights and room count on every change; never
    /// the source of truth for what gets submitted.
    pub pricing: Option<PricingBreakdown>,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub special_requests: Option<String>,
    pub booking_reference: Option<String>,
}

impl Default for BookingFormView {
    fn default() -> Self {
        Self {
            id: Uuid::default(),
            stage: FlowStage::default(),
            room: None,
            check_in: None,
            check_out: None,
            nights: 0,
            guests: 1,
            children: 0,
            adults: 1,
            number_of_rooms: 1,
            room_count_source: RoomCountSource::default(),
            availability: AvailabilityView::default(),
            pricing: None,
            guest_name: None,
            guest_phone: None,
            special_requests: None,
            booking_reference: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub name: String,
    pub price_per_night: i64,
}

/// Availability as the form renders it: a banner state plus counts when the
/// check succeeded. `CheckFailed` asks the guest to retry; a known zero is
/// "sold out, pick different dates".
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AvailabilityView {
    #[default]
    Unknown,
    #[serde(rename_all = "camelCase")]
    CheckFailed { reason: String },
    #[serde(rename_all = "camelCase")]
    Known {
        available: bool,
        available_rooms: u32,
        total_rooms: u32,
        booked_rooms: u32,
    },
}

impl View<BookingFlow> for BookingFormView {
    fn update(&mut self, event: &EventEnvelope<BookingFlow>) {
        match &event.payload {
            BookingEvent::Opened { id } => {
                *self = Self {
                    id: *id,
                    ..Self::default()
                };
            }

            BookingEvent::RoomSelected {
                room_id,
                room_name,
                price_per_night,
            } => {
                self.room = Some(RoomSummary {
                    room_id: room_id.clone(),
                    name: room_name.clone(),
                    price_per_night: *price_per_night,
                });
                self.stage = FlowStage::RoomSelected;
                self.availability = AvailabilityView::Unknown;
                self.room_count_source = RoomCountSource::Auto;
                self.recompute_pricing();
            }

            BookingEvent::DatesChosen {
                check_in,
                check_out,
            } => {
                self.check_in = Some(*check_in);
                self.check_out = Some(*check_out);
                self.nights = nights_between(*check_in, *check_out);
                self.stage = FlowStage::DatesSelected;
                self.availability = AvailabilityView::Unknown;
                self.recompute_pricing();
            }

            BookingEvent::AvailabilityChecked {
                room_id,
                check_in,
                check_out,
                snapshot,
            } => {
                // same staleness rule as the aggregate: a result for a
                // superseded selection never reaches the screen
                if self.matches_current_selection(room_id, *check_in, *check_out) {
                    self.availability = AvailabilityView::Known {
                        available: snapshot.available,
                        available_rooms: snapshot.available_rooms,
                        total_rooms: snapshot.total_rooms,
                        booked_rooms: snapshot.booked_rooms,
                    };
                    self.stage = FlowStage::AvailabilityChecked;
                }
            }

            BookingEvent::AvailabilityCheckFailed {
                room_id,
                check_in,
                check_out,
                reason,
            } => {
                if self.matches_current_selection(room_id, *check_in, *check_out) {
                    self.availability = AvailabilityView::CheckFailed {
                        reason: reason.clone(),
                    };
                    self.stage = FlowStage::AvailabilityChecked;
                }
            }

            BookingEvent::GuestCountSet { guests, children } => {
                self.guests = *guests;
                self.children = *children;
                self.adults = guests.saturating_sub(*children);
            }

            BookingEvent::RoomCountSet { rooms, source } => {
                self.number_of_rooms = *rooms;
                self.room_count_source = *source;
                self.recompute_pricing();
            }

            BookingEvent::GuestDetailsProvided {
                name,
                phone,
                special_requests,
            } => {
                self.guest_name = Some(name.clone());
                self.guest_phone = Some(phone.clone());
                self.special_requests = Some(special_requests.clone());
            }

            BookingEvent::SubmissionAccepted { booking_reference } => {
                *self = Self {
                    id: self.id,
                    booking_reference: booking_reference.clone(),
                    ..Self::default()
                };
            }
        }
    }
}

impl BookingFormView {
    fn matches_current_selection(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> bool {
        self.room.as_ref().is_some_and(|r| r.room_id == room_id)
            && self.check_in == Some(check_in)
            && self.check_out == Some(check_out)
    }

    fn recompute_pricing(&mut self) {
        self.pricing = match &self.room {
            Some(room) if self.nights > 0 && self.number_of_rooms > 0 => Some(pricing_breakdown(
                room.price_per_night,
                self.nights,
                self.number_of_rooms,
            )),
            _ => None,
        };
    }
}
