// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod booking_tests;

use diesel::RunQueryDsl;
use fleetdesk::NewTicket;
use fleetdesk_audit::{Actor, Cause};
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, RegistrationId, Route, RouteId, Schedule, ScheduleId,
    ScheduleRole, SideAssignment, Stop, StopId, Ticket, Trip, TripId, TripKey,
};
use time::macros::time;

use crate::store::LedgerStore;
use crate::{BackendConnection, Persistence};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-dispatcher"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// A registration with two routes, each with a morning pickup trip and an
/// evening drop trip on its own ten-seat bus.
///
/// Route A has stops S and T, route B has stop U, and route C has stop V
/// but no trips.
pub struct Fleet {
    pub registration_id: RegistrationId,
    pub route_a: RouteId,
    pub route_b: RouteId,
    pub route_c: RouteId,
    pub stop_s: StopId,
    pub stop_t: StopId,
    pub stop_u: StopId,
    pub stop_v: StopId,
    pub morning: ScheduleId,
    pub evening: ScheduleId,
    pub bus_a: BusAssignmentId,
    pub bus_b: BusAssignmentId,
    pub trip_a_morning: TripId,
    pub trip_a_evening: TripId,
    pub trip_b_morning: TripId,
    pub trip_b_evening: TripId,
}

impl Fleet {
    /// The side assignment of a stop on a route for a schedule and bus.
    pub const fn side(
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

    pub const fn morning_at_s(&self) -> SideAssignment {
        Self::side(self.route_a, self.stop_s, self.morning, self.bus_a)
    }

    pub const fn evening_at_s(&self) -> SideAssignment {
        Self::side(self.route_a, self.stop_s, self.evening, self.bus_a)
    }

    pub const fn evening_at_t(&self) -> SideAssignment {
        Self::side(self.route_a, self.stop_t, self.evening, self.bus_a)
    }

    pub const fn morning_at_u(&self) -> SideAssignment {
        Self::side(self.route_b, self.stop_u, self.morning, self.bus_b)
    }
}

pub fn create_test_fleet(persistence: &mut Persistence) -> Fleet {
    let registration_id: RegistrationId = persistence
        .create_registration("Northside School")
        .expect("Failed to create registration")
        .registration_id();
    create_fleet_in(persistence, registration_id, 10)
}

/// Builds the fleet layout inside an existing registration with the given
/// seat count on both buses.
pub fn create_fleet_in(
    persistence: &mut Persistence,
    registration_id: RegistrationId,
    capacity: u32,
) -> Fleet {
    let route = |p: &mut Persistence, name: &str| -> Route {
        p.create_route(registration_id, name)
            .expect("Failed to create route")
    };
    let route_a: RouteId = route(persistence, "Route A").route_id();
    let route_b: RouteId = route(persistence, "Route B").route_id();
    let route_c: RouteId = route(persistence, "Route C").route_id();

    let stop = |p: &mut Persistence, route_id: RouteId, name: &str| -> Stop {
        p.create_stop(registration_id, route_id, name)
            .expect("Failed to create stop")
    };
    let stop_s: StopId = stop(persistence, route_a, "Elm Street").stop_id();
    let stop_t: StopId = stop(persistence, route_a, "Oak Avenue").stop_id();
    let stop_u: StopId = stop(persistence, route_b, "Pine Road").stop_id();
    let stop_v: StopId = stop(persistence, route_c, "Birch Lane").stop_id();

    let morning: Schedule = persistence
        .create_schedule(
            registration_id,
            "Morning pickup",
            ScheduleRole::Pickup,
            time!(07:00),
            time!(08:30),
        )
        .expect("Failed to create morning schedule");
    let evening: Schedule = persistence
        .create_schedule(
            registration_id,
            "Evening drop",
            ScheduleRole::Drop,
            time!(15:00),
            time!(16:30),
        )
        .expect("Failed to create evening schedule");

    let bus = |p: &mut Persistence, label: &str| -> BusAssignment {
        p.create_bus_assignment(registration_id, label, capacity)
            .expect("Failed to create bus assignment")
    };
    let bus_a: BusAssignmentId = bus(persistence, "Bus 12").bus_assignment_id();
    let bus_b: BusAssignmentId = bus(persistence, "Bus 31").bus_assignment_id();

    let trip = |p: &mut Persistence,
                bus_assignment_id: BusAssignmentId,
                route_id: RouteId,
                schedule_id: ScheduleId|
     -> Trip {
        p.create_trip(
            registration_id,
            TripKey {
                bus_assignment_id,
                route_id,
                schedule_id,
            },
        )
        .expect("Failed to create trip")
    };
    let trip_a_morning = trip(persistence, bus_a, route_a, morning.schedule_id()).trip_id();
    let trip_a_evening = trip(persistence, bus_a, route_a, evening.schedule_id()).trip_id();
    let trip_b_morning = trip(persistence, bus_b, route_b, morning.schedule_id()).trip_id();
    let trip_b_evening = trip(persistence, bus_b, route_b, evening.schedule_id()).trip_id();

    Fleet {
        registration_id,
        route_a,
        route_b,
        route_c,
        stop_s,
        stop_t,
        stop_u,
        stop_v,
        morning: morning.schedule_id(),
        evening: evening.schedule_id(),
        bus_a,
        bus_b,
        trip_a_morning,
        trip_a_evening,
        trip_b_morning,
        trip_b_evening,
    }
}

/// Books a ticket with the given sides.
pub fn book(
    persistence: &mut Persistence,
    fleet: &Fleet,
    code: &str,
    pickup: Option<SideAssignment>,
    drop: Option<SideAssignment>,
) -> Ticket {
    persistence
        .book_ticket(&NewTicket {
            registration_id: fleet.registration_id,
            code: code.to_string(),
            pickup,
            drop,
        })
        .expect("Failed to book ticket")
}

/// Books `count` one-way morning tickets at stop U on route B.
pub fn fill_route_b_morning(persistence: &mut Persistence, fleet: &Fleet, count: usize) {
    for n in 0..count {
        book(
            persistence,
            fleet,
            &format!("B-{n:03}"),
            Some(fleet.morning_at_u()),
            None,
        );
    }
}

pub fn booking_count(persistence: &mut Persistence, trip_id: TripId) -> u32 {
    persistence
        .get_trip(trip_id)
        .expect("Failed to load trip")
        .booking_count()
}

pub fn min_required_capacity(
    persistence: &mut Persistence,
    bus_assignment_id: BusAssignmentId,
) -> u32 {
    persistence
        .get_bus_assignment(bus_assignment_id)
        .expect("Failed to load bus assignment")
        .min_required_capacity()
}

/// Overwrites a stored booking count, bypassing every counter rule.
pub fn force_booking_count(persistence: &mut Persistence, trip_id: TripId, booking_count: u32) {
    match &mut persistence.conn {
        BackendConnection::Sqlite(conn) => conn.set_trip_booking_count(trip_id, booking_count),
        BackendConnection::Mysql(conn) => conn.set_trip_booking_count(trip_id, booking_count),
    }
    .expect("Failed to force booking count");
}

/// Drops the audit table so every later audit write fails.
pub fn break_audit_sink(persistence: &mut Persistence) {
    let drop_table = diesel::sql_query("DROP TABLE audit_events");
    match &mut persistence.conn {
        BackendConnection::Sqlite(conn) => drop_table.execute(conn),
        BackendConnection::Mysql(conn) => drop_table.execute(conn),
    }
    .expect("Failed to drop audit table");
}
