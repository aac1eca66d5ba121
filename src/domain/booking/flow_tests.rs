use std::sync::Arc;

use cqrs_es::test::TestFramework;
use uuid::Uuid;

use super::test_support::*;
use super::*;
use crate::services::availability::AvailabilitySnapshot;
use crate::services::pricing::pricing_breakdown;

type BookingTester = TestFramework<BookingFlow>;

// End-to-end command scenarios for a family weekend stay, following the
// shape of the flows exercised manually against the staging backend.

#[test]
fn family_weekend_reaches_availability_checked() {
    let id = Uuid::new_v4();
    let snapshot = plenty_available();

    BookingTester::with(services_with(Ok(snapshot)))
        .given(vec![opened(id), suite_selected()])
        .when(BookingCommand::SelectDates {
            check_in: Some(date(2030, 8, 10)),
            check_out: Some(date(2030, 8, 12)),
        })
        .then_expect_events(vec![
            dates_chosen(),
            availability_known("room-suite", snapshot),
        ]);
}

#[test]
fn seven_guests_fill_three_suites() {
    let id = Uuid::new_v4();

    BookingTester::with(services_with(Ok(plenty_available())))
        .given(vec![opened(id), suite_selected()])
        .when(BookingCommand::SetGuests { guests: 7 })
        .then_expect_events(vec![
            BookingEvent::GuestCountSet {
                guests: 7,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 3,
                source: RoomCountSource::Auto,
            },
        ]);
}

#[test]
fn a_fourth_suite_cannot_be_requested() {
    let id = Uuid::new_v4();

    BookingTester::with(services_with(Ok(plenty_available())))
        .given(vec![
            opened(id),
            suite_selected(),
            BookingEvent::GuestCountSet {
                guests: 7,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 3,
                source: RoomCountSource::Auto,
            },
        ])
        .when(BookingCommand::SetRoomCount { rooms: 4 })
        .then_expect_error(BookingError::RoomCountExceedsLimit { max: 3 });
}

#[test]
fn the_cabin_hosts_three_but_never_four() {
    let id = Uuid::new_v4();

    BookingTester::with(services_with(Ok(plenty_available())))
        .given(vec![opened(id), cabin_selected()])
        .when(BookingCommand::SetGuests { guests: 3 })
        .then_expect_events(vec![
            BookingEvent::GuestCountSet {
                guests: 3,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 1,
                source: RoomCountSource::Auto,
            },
        ]);

    BookingTester::with(services_with(Ok(plenty_available())))
        .given(vec![opened(id), cabin_selected()])
        .when(BookingCommand::SetGuests { guests: 4 })
        .then_expect_error(BookingError::GuestLimitExceeded { max: 3 });
}

#[test]
fn growing_the_party_overrides_a_stale_manual_room_count() {
    let id = Uuid::new_v4();

    // the user typed rooms=2 for 4 guests, then grew the party to 8
    // without touching the rooms field; the recommendation must win
    BookingTester::with(services_with(Ok(plenty_available())))
        .given(vec![
            opened(id),
            suite_selected(),
            BookingEvent::GuestCountSet {
                guests: 4,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 2,
                source: RoomCountSource::Manual,
            },
        ])
        .when(BookingCommand::SetGuests { guests: 8 })
        .then_expect_events(vec![
            BookingEvent::GuestCountSet {
                guests: 8,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 3,
                source: RoomCountSource::Auto,
            },
        ]);
}

#[test]
fn shrinking_the_party_also_clears_the_manual_override() {
    let id = Uuid::new_v4();

    BookingTester::with(services_with(Ok(plenty_available())))
        .given(vec![
            opened(id),
            suite_selected(),
            BookingEvent::GuestCountSet {
                guests: 6,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 3,
                source: RoomCountSource::Manual,
            },
        ])
        .when(BookingCommand::SetGuests { guests: 2 })
        .then_expect_events(vec![
            BookingEvent::GuestCountSet {
                guests: 2,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 1,
                source: RoomCountSource::Auto,
            },
        ]);
}

#[test]
fn switching_rooms_re_checks_availability_for_the_new_room() {
    let id = Uuid::new_v4();
    let snapshot = AvailabilitySnapshot::reconcile(true, 1, 1);

    BookingTester::with(services_with(Ok(snapshot)))
        .given(vec![
            opened(id),
            suite_selected(),
            dates_chosen(),
            availability_known("room-suite", plenty_available()),
        ])
        .when(BookingCommand::SelectRoom {
            room_id: "room-cabin".to_string(),
            room_name: "Cozy Mountain Cabin".to_string(),
            price_per_night: 3500,
        })
        .then_expect_events(vec![
            cabin_selected(),
            BookingEvent::RoomCountSet {
                rooms: 1,
                source: RoomCountSource::Auto,
            },
            availability_known("room-cabin", snapshot),
        ]);
}

#[test]
fn two_rooms_cannot_be_booked_when_one_is_left() {
    let id = Uuid::new_v4();
    let one_left = AvailabilitySnapshot::reconcile(true, 1, 2);
    let services = BookingServices::new(
        Arc::new(FixedAvailability(Ok(one_left))),
        RecordingGateway::accepting("AAM-TEST-0001"),
    );

    BookingTester::with(services)
        .given(vec![
            opened(id),
            suite_selected(),
            dates_chosen(),
            availability_known("room-suite", one_left),
            BookingEvent::GuestCountSet {
                guests: 4,
                children: 0,
            },
            BookingEvent::RoomCountSet {
                rooms: 2,
                source: RoomCountSource::Auto,
            },
            guest_details(),
        ])
        .when(BookingCommand::Submit)
        .then_expect_error(BookingError::InsufficientAvailability {
            available: 1,
            requested: 2,
        });
}

#[test]
fn full_flow_submits_a_payload_matching_the_displayed_price() {
    let id = Uuid::new_v4();
    let gateway = RecordingGateway::accepting("AAM-2030-0099");
    let services = BookingServices::new(
        Arc::new(FixedAvailability(Ok(plenty_available()))),
        gateway.clone(),
    );

    BookingTester::with(services)
        .given(vec![
            opened(id),
            suite_selected(),
            dates_chosen(),
            availability_known("room-suite", plenty_available()),
            BookingEvent::GuestCountSet {
                guests: 5,
                children: 2,
            },
            BookingEvent::RoomCountSet {
                rooms: 2,
                source: RoomCountSource::Auto,
            },
            BookingEvent::GuestDetailsProvided {
                name: "Asha Rao".to_string(),
                phone: "9876543210".to_string(),
                special_requests: "vegetarian meals".to_string(),
            },
        ])
        .when(BookingCommand::Submit)
        .then_expect_events(vec![BookingEvent::SubmissionAccepted {
            booking_reference: Some("AAM-2030-0099".to_string()),
        }]);

    // what went over the wire must match an independent recomputation
    let payload = gateway.last_payload.lock().unwrap().clone().unwrap();
    let recomputed = pricing_breakdown(
        payload.price_per_night,
        payload.nights,
        payload.number_of_rooms,
    );
    assert_eq!(payload.total_price, recomputed.total_price);
    assert_eq!(payload.tax_amount, recomputed.gst_amount);
    assert_eq!(payload.adults + payload.children, payload.guests);
    assert_eq!(payload.guest_email, "9876543210@guest.com");
    assert_eq!(payload.special_requests, "vegetarian meals");
    assert_eq!(payload.payment_status, "pending");
    assert_eq!(payload.status, "confirmed");
}
