// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One trait over both backends for the reads and writes the engine
//! operations need.
//!
//! Each method forwards to the `_sqlite` or `_mysql` function generated by
//! `backend_fn!`, so the operations in `operations/` are written once,
//! generic over the connection.

use diesel::{MysqlConnection, SqliteConnection};
use fleetdesk::NewTicket;
use fleetdesk_audit::AuditEvent;
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, Registration, RegistrationId, Route, RouteId, Schedule,
    ScheduleId, ScheduleRole, SideAssignment, Stop, StopId, Ticket, TicketId, TicketSide, Trip,
    TripId, TripKey,
};

use crate::backend::PersistenceBackend;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Reads and writes of the booking ledger on one connection.
#[allow(clippy::missing_errors_doc)]
pub trait LedgerStore: PersistenceBackend {
    fn get_registration(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<Registration, PersistenceError>;
    fn find_route(&mut self, route_id: RouteId) -> Result<Option<Route>, PersistenceError>;
    fn list_routes(&mut self, registration_id: RegistrationId)
    -> Result<Vec<Route>, PersistenceError>;
    fn find_stop(&mut self, stop_id: StopId) -> Result<Option<Stop>, PersistenceError>;
    fn list_stops_on_route(&mut self, route_id: RouteId) -> Result<Vec<Stop>, PersistenceError>;
    fn count_stops_on_route(&mut self, route_id: RouteId) -> Result<usize, PersistenceError>;
    fn get_schedule(&mut self, schedule_id: ScheduleId) -> Result<Schedule, PersistenceError>;
    fn list_schedules(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<Vec<Schedule>, PersistenceError>;
    fn get_bus_assignment(
        &mut self,
        bus_assignment_id: BusAssignmentId,
    ) -> Result<BusAssignment, PersistenceError>;
    fn list_bus_assignments(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<Vec<BusAssignment>, PersistenceError>;
    fn list_bus_assignments_by_id(
        &mut self,
        ids: &[BusAssignmentId],
    ) -> Result<Vec<BusAssignment>, PersistenceError>;
    fn get_trip(&mut self, trip_id: TripId) -> Result<Trip, PersistenceError>;
    fn find_trip(&mut self, key: TripKey) -> Result<Option<Trip>, PersistenceError>;
    fn list_trips(&mut self, registration_id: RegistrationId) -> Result<Vec<Trip>, PersistenceError>;
    fn list_trips_on_route(&mut self, route_id: RouteId) -> Result<Vec<Trip>, PersistenceError>;
    fn list_trips_for_bus_assignment(
        &mut self,
        bus_assignment_id: BusAssignmentId,
    ) -> Result<Vec<Trip>, PersistenceError>;
    fn find_ticket(&mut self, ticket_id: TicketId) -> Result<Option<Ticket>, PersistenceError>;
    fn list_tickets(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<Vec<Ticket>, PersistenceError>;
    fn list_tickets_at_stop(&mut self, stop_id: StopId) -> Result<Vec<Ticket>, PersistenceError>;
    fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError>;
    fn list_audit_events(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<Vec<AuditEvent>, PersistenceError>;

    fn insert_registration(&mut self, name: &str) -> Result<RegistrationId, PersistenceError>;
    fn insert_route(
        &mut self,
        registration_id: RegistrationId,
        name: &str,
    ) -> Result<RouteId, PersistenceError>;
    fn insert_stop(
        &mut self,
        registration_id: RegistrationId,
        route_id: RouteId,
        name: &str,
    ) -> Result<StopId, PersistenceError>;
    fn insert_schedule(
        &mut self,
        registration_id: RegistrationId,
        name: &str,
        role: ScheduleRole,
        start_time: time::Time,
        end_time: time::Time,
    ) -> Result<ScheduleId, PersistenceError>;
    fn insert_bus_assignment(
        &mut self,
        registration_id: RegistrationId,
        label: &str,
        capacity: u32,
    ) -> Result<BusAssignmentId, PersistenceError>;
    fn insert_trip(
        &mut self,
        registration_id: RegistrationId,
        key: TripKey,
    ) -> Result<TripId, PersistenceError>;
    fn insert_ticket(&mut self, ticket: &NewTicket) -> Result<TicketId, PersistenceError>;
    fn delete_ticket(&mut self, ticket_id: TicketId) -> Result<(), PersistenceError>;
    fn set_stop_route(&mut self, stop_id: StopId, route_id: RouteId)
    -> Result<(), PersistenceError>;
    fn set_ticket_side(
        &mut self,
        ticket_id: TicketId,
        side: TicketSide,
        assignment: &SideAssignment,
    ) -> Result<(), PersistenceError>;
    fn set_trip_booking_count(
        &mut self,
        trip_id: TripId,
        booking_count: u32,
    ) -> Result<(), PersistenceError>;
    fn set_min_required_capacity(
        &mut self,
        bus_assignment_id: BusAssignmentId,
        min_required_capacity: u32,
    ) -> Result<(), PersistenceError>;
    fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError>;
}

/// Implements `LedgerStore` for a connection type by forwarding to the
/// functions `backend_fn!` generated for it.
macro_rules! ledger_store_impl {
    ($conn:ty, $suffix:ident) => {
        pastey::paste! {
            impl LedgerStore for $conn {
                fn get_registration(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Registration, PersistenceError> {
                    queries::entities::[<get_registration_ $suffix>](self, registration_id)
                }

                fn find_route(&mut self, route_id: RouteId) -> Result<Option<Route>, PersistenceError> {
                    queries::entities::[<find_route_ $suffix>](self, route_id)
                }

                fn list_routes(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Vec<Route>, PersistenceError> {
                    queries::entities::[<list_routes_ $suffix>](self, registration_id)
                }

                fn find_stop(&mut self, stop_id: StopId) -> Result<Option<Stop>, PersistenceError> {
                    queries::entities::[<find_stop_ $suffix>](self, stop_id)
                }

                fn list_stops_on_route(&mut self, route_id: RouteId) -> Result<Vec<Stop>, PersistenceError> {
                    queries::entities::[<list_stops_on_route_ $suffix>](self, route_id)
                }

                fn count_stops_on_route(&mut self, route_id: RouteId) -> Result<usize, PersistenceError> {
                    queries::entities::[<count_stops_on_route_ $suffix>](self, route_id)
                }

                fn get_schedule(&mut self, schedule_id: ScheduleId) -> Result<Schedule, PersistenceError> {
                    queries::entities::[<get_schedule_ $suffix>](self, schedule_id)
                }

                fn list_schedules(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Vec<Schedule>, PersistenceError> {
                    queries::entities::[<list_schedules_ $suffix>](self, registration_id)
                }

                fn get_bus_assignment(
                    &mut self,
                    bus_assignment_id: BusAssignmentId,
                ) -> Result<BusAssignment, PersistenceError> {
                    queries::entities::[<get_bus_assignment_ $suffix>](self, bus_assignment_id)
                }

                fn list_bus_assignments(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Vec<BusAssignment>, PersistenceError> {
                    queries::entities::[<list_bus_assignments_ $suffix>](self, registration_id)
                }

                fn list_bus_assignments_by_id(
                    &mut self,
                    ids: &[BusAssignmentId],
                ) -> Result<Vec<BusAssignment>, PersistenceError> {
                    queries::entities::[<list_bus_assignments_by_id_ $suffix>](self, ids)
                }

                fn get_trip(&mut self, trip_id: TripId) -> Result<Trip, PersistenceError> {
                    queries::entities::[<get_trip_ $suffix>](self, trip_id)
                }

                fn find_trip(&mut self, key: TripKey) -> Result<Option<Trip>, PersistenceError> {
                    queries::entities::[<find_trip_ $suffix>](self, key)
                }

                fn list_trips(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Vec<Trip>, PersistenceError> {
                    queries::entities::[<list_trips_ $suffix>](self, registration_id)
                }

                fn list_trips_on_route(&mut self, route_id: RouteId) -> Result<Vec<Trip>, PersistenceError> {
                    queries::entities::[<list_trips_on_route_ $suffix>](self, route_id)
                }

                fn list_trips_for_bus_assignment(
                    &mut self,
                    bus_assignment_id: BusAssignmentId,
                ) -> Result<Vec<Trip>, PersistenceError> {
                    queries::entities::[<list_trips_for_bus_assignment_ $suffix>](self, bus_assignment_id)
                }

                fn find_ticket(&mut self, ticket_id: TicketId) -> Result<Option<Ticket>, PersistenceError> {
                    queries::entities::[<find_ticket_ $suffix>](self, ticket_id)
                }

                fn list_tickets(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Vec<Ticket>, PersistenceError> {
                    queries::entities::[<list_tickets_ $suffix>](self, registration_id)
                }

                fn list_tickets_at_stop(&mut self, stop_id: StopId) -> Result<Vec<Ticket>, PersistenceError> {
                    queries::entities::[<list_tickets_at_stop_ $suffix>](self, stop_id)
                }

                fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
                    queries::audit::[<get_audit_event_ $suffix>](self, event_id)
                }

                fn list_audit_events(
                    &mut self,
                    registration_id: RegistrationId,
                ) -> Result<Vec<AuditEvent>, PersistenceError> {
                    queries::audit::[<list_audit_events_ $suffix>](self, registration_id)
                }

                fn insert_registration(&mut self, name: &str) -> Result<RegistrationId, PersistenceError> {
                    mutations::entities::[<insert_registration_ $suffix>](self, name)
                }

                fn insert_route(
                    &mut self,
                    registration_id: RegistrationId,
                    name: &str,
                ) -> Result<RouteId, PersistenceError> {
                    mutations::entities::[<insert_route_ $suffix>](self, registration_id, name)
                }

                fn insert_stop(
                    &mut self,
                    registration_id: RegistrationId,
                    route_id: RouteId,
                    name: &str,
                ) -> Result<StopId, PersistenceError> {
                    mutations::entities::[<insert_stop_ $suffix>](self, registration_id, route_id, name)
                }

                fn insert_schedule(
                    &mut self,
                    registration_id: RegistrationId,
                    name: &str,
                    role: ScheduleRole,
                    start_time: time::Time,
                    end_time: time::Time,
                ) -> Result<ScheduleId, PersistenceError> {
                    mutations::entities::[<insert_schedule_ $suffix>](
                        self,
                        registration_id,
                        name,
                        role,
                        start_time,
                        end_time,
                    )
                }

                fn insert_bus_assignment(
                    &mut self,
                    registration_id: RegistrationId,
                    label: &str,
                    capacity: u32,
                ) -> Result<BusAssignmentId, PersistenceError> {
                    mutations::entities::[<insert_bus_assignment_ $suffix>](
                        self,
                        registration_id,
                        label,
                        capacity,
                    )
                }

                fn insert_trip(
                    &mut self,
                    registration_id: RegistrationId,
                    key: TripKey,
                ) -> Result<TripId, PersistenceError> {
                    mutations::entities::[<insert_trip_ $suffix>](self, registration_id, key)
                }

                fn insert_ticket(&mut self, ticket: &NewTicket) -> Result<TicketId, PersistenceError> {
                    mutations::entities::[<insert_ticket_ $suffix>](self, ticket)
                }

                fn delete_ticket(&mut self, ticket_id: TicketId) -> Result<(), PersistenceError> {
                    mutations::entities::[<delete_ticket_ $suffix>](self, ticket_id)
                }

                fn set_stop_route(
                    &mut self,
                    stop_id: StopId,
                    route_id: RouteId,
                ) -> Result<(), PersistenceError> {
                    mutations::entities::[<set_stop_route_ $suffix>](self, stop_id, route_id)
                }

                fn set_ticket_side(
                    &mut self,
                    ticket_id: TicketId,
                    side: TicketSide,
                    assignment: &SideAssignment,
                ) -> Result<(), PersistenceError> {
                    mutations::entities::[<set_ticket_side_ $suffix>](self, ticket_id, side, assignment)
                }

                fn set_trip_booking_count(
                    &mut self,
                    trip_id: TripId,
                    booking_count: u32,
                ) -> Result<(), PersistenceError> {
                    mutations::entities::[<set_trip_booking_count_ $suffix>](self, trip_id, booking_count)
                }

                fn set_min_required_capacity(
                    &mut self,
                    bus_assignment_id: BusAssignmentId,
                    min_required_capacity: u32,
                ) -> Result<(), PersistenceError> {
                    mutations::entities::[<set_min_required_capacity_ $suffix>](
                        self,
                        bus_assignment_id,
                        min_required_capacity,
                    )
                }

                fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
                    mutations::audit::[<persist_audit_event_ $suffix>](self, event)
                }
            }
        }
    };
}

ledger_store_impl!(SqliteConnection, sqlite);
ledger_store_impl!(MysqlConnection, mysql);
