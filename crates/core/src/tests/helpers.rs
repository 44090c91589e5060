// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::TransferContext;
use fleetdesk_audit::{Actor, Cause};
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, RegistrationId, Route, RouteId, ScheduleId, SideAssignment,
    Stop, StopId, Ticket, TicketId, Trip, TripId,
};

pub const REGISTRATION: RegistrationId = RegistrationId::new(1);
pub const ROUTE_A: RouteId = RouteId::new(1);
pub const ROUTE_B: RouteId = RouteId::new(2);
pub const STOP_S1: StopId = StopId::new(10);
pub const STOP_T: StopId = StopId::new(11);
pub const MORNING_PICKUP: ScheduleId = ScheduleId::new(1);
pub const EVENING_DROP: ScheduleId = ScheduleId::new(2);
pub const BUS_A: BusAssignmentId = BusAssignmentId::new(1);
pub const BUS_B: BusAssignmentId = BusAssignmentId::new(2);
pub const TRIP_A_MORNING: TripId = TripId::new(1);
pub const TRIP_B_MORNING: TripId = TripId::new(2);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("operator-1"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Route rework"))
}

pub fn route(route_id: RouteId, name: &str) -> Route {
    Route::new(route_id, REGISTRATION, String::from(name))
}

pub fn stop(stop_id: StopId, route_id: RouteId) -> Stop {
    Stop::new(stop_id, REGISTRATION, route_id, format!("Stop {stop_id}"))
}

pub fn bus(bus_assignment_id: BusAssignmentId, capacity: u32, min_required: u32) -> BusAssignment {
    BusAssignment::new(
        bus_assignment_id,
        REGISTRATION,
        format!("Bus {bus_assignment_id}"),
        capacity,
        min_required,
    )
}

pub fn trip(
    trip_id: TripId,
    bus_assignment_id: BusAssignmentId,
    route_id: RouteId,
    schedule_id: ScheduleId,
    booking_count: u32,
) -> Trip {
    Trip::new(
        trip_id,
        REGISTRATION,
        bus_assignment_id,
        route_id,
        schedule_id,
        booking_count,
    )
}

pub fn side(
    route_id: RouteId,
    stop_id: StopId,
    schedule_id: ScheduleId,
    bus_assignment_id: BusAssignmentId,
) -> SideAssignment {
    SideAssignment {
        route_id,
        stop_id,
        schedule_id,
        bus_assignment_id,
    }
}

pub fn ticket(
    ticket_id: i64,
    pickup: Option<SideAssignment>,
    drop: Option<SideAssignment>,
) -> Ticket {
    Ticket::new(
        TicketId::new(ticket_id),
        REGISTRATION,
        format!("T-{ticket_id:04}"),
        pickup,
        drop,
    )
}

/// `count` one-way tickets picked up at S1 on route A's morning trip.
pub fn morning_tickets_at_s1(count: i64) -> Vec<Ticket> {
    (1..=count)
        .map(|id| {
            ticket(
                id,
                Some(side(ROUTE_A, STOP_S1, MORNING_PICKUP, BUS_A)),
                None,
            )
        })
        .collect()
}

/// Route A has S1 used by three morning tickets; route B has one morning
/// trip on a 10-seat bus holding `route_b_count` bookings.
pub fn three_ticket_context(route_b_count: u32) -> TransferContext {
    TransferContext {
        registration_id: REGISTRATION,
        stop: stop(STOP_S1, ROUTE_A),
        source_route: route(ROUTE_A, "Route A"),
        destination_route: route(ROUTE_B, "Route B"),
        tickets: morning_tickets_at_s1(3),
        trips: vec![
            trip(TRIP_A_MORNING, BUS_A, ROUTE_A, MORNING_PICKUP, 3),
            trip(TRIP_B_MORNING, BUS_B, ROUTE_B, MORNING_PICKUP, route_b_count),
        ],
        bus_assignments: vec![bus(BUS_A, 10, 3), bus(BUS_B, 10, route_b_count)],
    }
}
