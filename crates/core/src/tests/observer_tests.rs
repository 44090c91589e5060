// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::time;

use crate::tests::helpers::{
    BUS_A, EVENING_DROP, MORNING_PICKUP, REGISTRATION, ROUTE_A, STOP_S1, STOP_T,
    TRIP_A_MORNING, bus, side, stop, ticket, trip,
};
use crate::{
    BookingSide, CoreError, CounterAdjustment, FailureCategory, NewTicket, plan_booking,
    removal_audit_event, removal_decrements,
};
use fleetdesk_audit::{Actor, AuditEvent, Cause};
use fleetdesk_domain::{
    DomainError, Schedule, ScheduleId, ScheduleRole, SideAssignment, Ticket, TicketSide, Trip,
    TripId,
};

const TRIP_A_EVENING: TripId = TripId::new(3);

fn schedule(schedule_id: ScheduleId, role: ScheduleRole) -> Schedule {
    Schedule::new(
        schedule_id,
        REGISTRATION,
        format!("Schedule {schedule_id}"),
        role,
        time!(07:00),
        time!(08:00),
    )
}

fn pickup_side(booking_count: u32, capacity: u32) -> BookingSide {
    BookingSide {
        side: TicketSide::Pickup,
        assignment: side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A),
        stop: stop(STOP_S1, ROUTE_A),
        schedule: schedule(MORNING_PICKUP, ScheduleRole::Pickup),
        trip: Some(trip(TRIP_A_MORNING, BUS_A, ROUTE_A, MORNING_PICKUP, booking_count)),
        bus_assignment: Some(bus(BUS_A, capacity, booking_count)),
    }
}

fn new_ticket(pickup: Option<SideAssignment>, drop: Option<SideAssignment>) -> NewTicket {
    NewTicket {
        registration_id: REGISTRATION,
        code: String::from("T-0100"),
        pickup,
        drop,
    }
}

#[test]
fn test_removal_decrements_once_per_side() {
    let trips: Vec<Trip> = vec![
        trip(TRIP_A_MORNING, BUS_A, ROUTE_A, MORNING_PICKUP, 1),
        trip(TRIP_A_EVENING, BUS_A, ROUTE_A, EVENING_DROP, 1),
    ];
    let two_way: Ticket = ticket(
        1,
        Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)),
        Some(side(ROUTE_A, STOP_T, EVENING_DROP, BUS_A)),
    );

    let adjustments: Vec<CounterAdjustment> = removal_decrements(&two_way, &trips);

    assert_eq!(
        adjustments,
        vec![
            CounterAdjustment {
                side: TicketSide::Pickup,
                trip_id: TRIP_A_MORNING,
            },
            CounterAdjustment {
                side: TicketSide::Drop,
                trip_id: TRIP_A_EVENING,
            },
        ]
    );
}

#[test]
fn test_removal_of_one_way_ticket_touches_one_trip() {
    let trips: Vec<Trip> = vec![trip(TRIP_A_EVENING, BUS_A, ROUTE_A, EVENING_DROP, 1)];
    let one_way: Ticket = ticket(1, None, Some(side(ROUTE_A, STOP_T, EVENING_DROP, BUS_A)));

    assert_eq!(removal_decrements(&one_way, &trips).len(), 1);
}

#[test]
fn test_removal_skips_sides_without_trip() {
    let one_way: Ticket = ticket(1, Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)), None);

    assert!(removal_decrements(&one_way, &[]).is_empty());
}

#[test]
fn test_booking_increments_matching_trip() {
    let ticket: NewTicket = new_ticket(Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)), None);

    let adjustments: Vec<CounterAdjustment> = plan_booking(&ticket, &[pickup_side(9, 10)]).unwrap();

    assert_eq!(
        adjustments,
        vec![CounterAdjustment {
            side: TicketSide::Pickup,
            trip_id: TRIP_A_MORNING,
        }]
    );
}

#[test]
fn test_booking_on_full_trip_is_rejected() {
    let ticket: NewTicket = new_ticket(Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)), None);

    let err: CoreError = plan_booking(&ticket, &[pickup_side(10, 10)]).unwrap_err();

    assert_eq!(err.failure_category(), FailureCategory::NoCapacityAvailable);
}

#[test]
fn test_booking_without_trip_is_rejected() {
    let ticket: NewTicket = new_ticket(Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)), None);
    let mut found: BookingSide = pickup_side(0, 10);
    found.trip = None;
    found.bus_assignment = None;

    let err: CoreError = plan_booking(&ticket, &[found]).unwrap_err();

    assert_eq!(
        err,
        CoreError::NoMatchingTrip {
            ticket_code: String::from("T-0100"),
            side: TicketSide::Pickup,
            schedule_id: MORNING_PICKUP,
            route_id: ROUTE_A,
        }
    );
}

#[test]
fn test_booking_with_wrong_schedule_role_is_rejected() {
    let ticket: NewTicket = new_ticket(Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)), None);
    let mut found: BookingSide = pickup_side(0, 10);
    found.schedule = schedule(MORNING_PICKUP, ScheduleRole::Drop);

    let err: CoreError = plan_booking(&ticket, &[found]).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::ScheduleRoleMismatch { .. })
    ));
}

#[test]
fn test_booking_without_sides_is_rejected() {
    let ticket: NewTicket = new_ticket(None, None);

    assert_eq!(
        plan_booking(&ticket, &[]),
        Err(CoreError::DomainViolation(DomainError::EmptyTicket))
    );
}

#[test]
fn test_removal_audit_event_names_ticket_and_released_seats() {
    let trips: Vec<Trip> = vec![trip(TRIP_A_MORNING, BUS_A, ROUTE_A, MORNING_PICKUP, 1)];
    let one_way: Ticket = ticket(7, Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)), None);
    let released: Vec<CounterAdjustment> = removal_decrements(&one_way, &trips);

    let event: AuditEvent = removal_audit_event(
        &one_way,
        &released,
        Actor::new(String::from("dispatcher"), String::from("operator")),
        Cause::new(String::from("req-9"), String::from("Parent cancelled")),
    );

    assert_eq!(event.registration_id, REGISTRATION);
    assert_eq!(event.action.name, "RemoveTicket");
    assert!(event.before.data.contains("code=T-0007"));
    assert!(event.after.data.contains("released_seats=1"));
    assert_eq!(event.event_id, None);
}
