// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk::{CoreError, FailureCategory, NewTicket};
use fleetdesk_domain::{DomainError, Ticket, TicketId, TicketSide};

use crate::tests::{
    Fleet, book, booking_count, create_test_actor, create_test_cause, create_test_fleet,
    fill_route_b_morning, force_booking_count, min_required_capacity,
};
use crate::{OperationError, Persistence};

fn setup() -> (Persistence, Fleet) {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create persistence");
    let fleet: Fleet = create_test_fleet(&mut persistence);
    (persistence, fleet)
}

fn try_book(
    persistence: &mut Persistence,
    fleet: &Fleet,
    code: &str,
    pickup: Option<fleetdesk_domain::SideAssignment>,
    drop: Option<fleetdesk_domain::SideAssignment>,
) -> Result<Ticket, OperationError> {
    persistence.book_ticket(&NewTicket {
        registration_id: fleet.registration_id,
        code: code.to_string(),
        pickup,
        drop,
    })
}

fn remove(
    persistence: &mut Persistence,
    fleet: &Fleet,
    ticket_id: TicketId,
) -> Result<Ticket, OperationError> {
    persistence.remove_ticket(
        fleet.registration_id,
        ticket_id,
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_booking_takes_one_seat_per_side() {
    let (mut persistence, fleet) = setup();

    let ticket: Ticket = book(
        &mut persistence,
        &fleet,
        "TW-001",
        Some(fleet.morning_at_s()),
        Some(fleet.evening_at_t()),
    );

    assert_eq!(ticket.sides().count(), 2);
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_morning), 1);
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_evening), 1);
    assert_eq!(min_required_capacity(&mut persistence, fleet.bus_a), 1);
    assert_eq!(
        persistence
            .find_ticket(ticket.ticket_id())
            .expect("Failed to load ticket"),
        Some(ticket)
    );
}

#[test]
fn test_booking_full_trip_is_rejected() {
    let (mut persistence, fleet) = setup();
    fill_route_b_morning(&mut persistence, &fleet, 10);

    let err: OperationError =
        try_book(&mut persistence, &fleet, "LATE", Some(fleet.morning_at_u()), None).unwrap_err();

    assert_eq!(err.failure_category(), FailureCategory::NoCapacityAvailable);
    assert_eq!(booking_count(&mut persistence, fleet.trip_b_morning), 10);
    assert_eq!(
        persistence
            .list_tickets(fleet.registration_id)
            .expect("Failed to list tickets")
            .len(),
        10
    );
}

#[test]
fn test_booking_side_without_trip_is_rejected() {
    let (mut persistence, fleet) = setup();
    // Bus B never runs route A.
    let side = Fleet::side(fleet.route_a, fleet.stop_s, fleet.morning, fleet.bus_b);

    let err: OperationError =
        try_book(&mut persistence, &fleet, "NT-001", Some(side), None).unwrap_err();

    assert!(matches!(
        err,
        OperationError::Core(CoreError::NoMatchingTrip {
            side: TicketSide::Pickup,
            ..
        })
    ));
    assert!(
        persistence
            .list_tickets(fleet.registration_id)
            .expect("Failed to list tickets")
            .is_empty()
    );
}

#[test]
fn test_booking_on_route_without_trips_is_no_matching_trip() {
    let (mut persistence, fleet) = setup();
    let side = Fleet::side(fleet.route_c, fleet.stop_v, fleet.morning, fleet.bus_a);

    let err: OperationError =
        try_book(&mut persistence, &fleet, "NT-002", Some(side), None).unwrap_err();

    assert_eq!(err.failure_category(), FailureCategory::NoMatchingTrip);
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_morning), 0);
    assert_eq!(min_required_capacity(&mut persistence, fleet.bus_a), 0);
}

#[test]
fn test_booking_rejects_stop_on_other_route() {
    let (mut persistence, fleet) = setup();
    let side = Fleet::side(fleet.route_b, fleet.stop_s, fleet.morning, fleet.bus_b);

    let err: OperationError =
        try_book(&mut persistence, &fleet, "BAD-001", Some(side), None).unwrap_err();

    assert_eq!(err.failure_category(), FailureCategory::InvalidRequest);
    assert!(matches!(
        err,
        OperationError::Core(CoreError::DomainViolation(DomainError::StopNotOnRoute { .. }))
    ));
}

#[test]
fn test_booking_rejects_drop_schedule_on_pickup_side() {
    let (mut persistence, fleet) = setup();

    let err: OperationError =
        try_book(&mut persistence, &fleet, "BAD-002", Some(fleet.evening_at_t()), None)
            .unwrap_err();

    assert!(matches!(
        err,
        OperationError::Core(CoreError::DomainViolation(
            DomainError::ScheduleRoleMismatch { .. }
        ))
    ));
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_evening), 0);
}

#[test]
fn test_booking_rejects_ticket_without_sides() {
    let (mut persistence, fleet) = setup();

    let err: OperationError = try_book(&mut persistence, &fleet, "EMPTY", None, None).unwrap_err();

    assert!(matches!(
        err,
        OperationError::Core(CoreError::DomainViolation(DomainError::EmptyTicket))
    ));
}

#[test]
fn test_removal_gives_back_one_seat_per_side() {
    let (mut persistence, fleet) = setup();
    let ticket: Ticket = book(
        &mut persistence,
        &fleet,
        "TW-001",
        Some(fleet.morning_at_s()),
        Some(fleet.evening_at_t()),
    );
    book(&mut persistence, &fleet, "OW-002", Some(fleet.morning_at_s()), None);

    let removed: Ticket =
        remove(&mut persistence, &fleet, ticket.ticket_id()).expect("Removal should succeed");

    assert_eq!(removed, ticket);
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_morning), 1);
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_evening), 0);
    assert_eq!(min_required_capacity(&mut persistence, fleet.bus_a), 1);
    assert_eq!(
        persistence
            .find_ticket(ticket.ticket_id())
            .expect("Failed to look up ticket"),
        None
    );
}

#[test]
fn test_removal_holds_counter_at_zero() {
    let (mut persistence, fleet) = setup();
    let ticket: Ticket = book(&mut persistence, &fleet, "OW-001", Some(fleet.morning_at_s()), None);
    force_booking_count(&mut persistence, fleet.trip_a_morning, 0);

    remove(&mut persistence, &fleet, ticket.ticket_id()).expect("Removal should succeed");

    assert_eq!(booking_count(&mut persistence, fleet.trip_a_morning), 0);
    assert_eq!(min_required_capacity(&mut persistence, fleet.bus_a), 0);
}

#[test]
fn test_removal_of_missing_ticket_is_invalid_request() {
    let (mut persistence, fleet) = setup();

    let err: OperationError = remove(&mut persistence, &fleet, TicketId::new(404)).unwrap_err();

    assert_eq!(err.failure_category(), FailureCategory::InvalidRequest);
    assert!(matches!(
        err,
        OperationError::Core(CoreError::TicketNotFound(_))
    ));
}

#[test]
fn test_removal_from_other_registration_is_rejected() {
    let (mut persistence, fleet) = setup();
    let ticket: Ticket = book(&mut persistence, &fleet, "OW-001", Some(fleet.morning_at_s()), None);
    let other = persistence
        .create_registration("Southside School")
        .expect("Failed to create registration");

    let err: OperationError = persistence
        .remove_ticket(
            other.registration_id(),
            ticket.ticket_id(),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        OperationError::Core(CoreError::RegistrationMismatch { .. })
    ));
    assert_eq!(booking_count(&mut persistence, fleet.trip_a_morning), 1);
}

#[test]
fn test_booking_and_removal_keep_ledger_consistent() {
    let (mut persistence, fleet) = setup();
    let first: Ticket = book(
        &mut persistence,
        &fleet,
        "TW-001",
        Some(fleet.morning_at_s()),
        Some(fleet.evening_at_t()),
    );
    book(&mut persistence, &fleet, "OW-002", None, Some(fleet.evening_at_s()));
    fill_route_b_morning(&mut persistence, &fleet, 4);
    remove(&mut persistence, &fleet, first.ticket_id()).expect("Removal should succeed");

    assert!(
        persistence
            .verify_ledger(fleet.registration_id)
            .expect("Verification should run")
            .is_empty()
    );
}
