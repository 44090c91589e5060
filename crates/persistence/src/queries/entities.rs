// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reads of registrations, routes, stops, schedules, bus assignments,
//! trips and tickets.
//!
//! `find_*` functions return `None` for a missing row so callers can turn
//! it into the right engine error. `get_*` functions treat a missing row
//! as a storage failure.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, Registration, RegistrationId, Route, RouteId, Schedule,
    ScheduleId, Stop, StopId, Ticket, TicketId, Trip, TripId, TripKey,
};
use num_traits::ToPrimitive;

use crate::data_models::{
    BusAssignmentRow, RegistrationRow, RouteRow, ScheduleRow, StopRow, TicketRow, TripRow,
};
use crate::diesel_schema::{
    bus_assignments, registrations, routes, schedules, stops, tickets, trips,
};
use crate::error::PersistenceError;

fn trips_from_rows(rows: Vec<TripRow>) -> Result<Vec<Trip>, PersistenceError> {
    rows.into_iter().map(Trip::try_from).collect()
}

fn tickets_from_rows(rows: Vec<TicketRow>) -> Result<Vec<Ticket>, PersistenceError> {
    rows.into_iter().map(Ticket::try_from).collect()
}

backend_fn! {
/// Retrieves a registration by id.
///
/// # Errors
///
/// Returns an error if the registration does not exist or the query fails.
pub fn get_registration(
    conn: &mut _,
    registration_id: RegistrationId,
) -> Result<Registration, PersistenceError> {
    registrations::table
        .filter(registrations::registration_id.eq(registration_id.value()))
        .select(RegistrationRow::as_select())
        .first::<RegistrationRow>(conn)
        .optional()?
        .map(Registration::from)
        .ok_or_else(|| PersistenceError::EntityNotFound {
            entity: "Registration",
            id: registration_id.value(),
        })
}
}

backend_fn! {
/// Looks up a route by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_route(conn: &mut _, route_id: RouteId) -> Result<Option<Route>, PersistenceError> {
    Ok(routes::table
        .filter(routes::route_id.eq(route_id.value()))
        .select(RouteRow::as_select())
        .first::<RouteRow>(conn)
        .optional()?
        .map(Route::from))
}
}

backend_fn! {
/// Lists a registration's routes in id order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_routes(
    conn: &mut _,
    registration_id: RegistrationId,
) -> Result<Vec<Route>, PersistenceError> {
    let rows: Vec<RouteRow> = routes::table
        .filter(routes::registration_id.eq(registration_id.value()))
        .order(routes::route_id.asc())
        .select(RouteRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Route::from).collect())
}
}

backend_fn! {
/// Looks up a stop by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_stop(conn: &mut _, stop_id: StopId) -> Result<Option<Stop>, PersistenceError> {
    Ok(stops::table
        .filter(stops::stop_id.eq(stop_id.value()))
        .select(StopRow::as_select())
        .first::<StopRow>(conn)
        .optional()?
        .map(Stop::from))
}
}

backend_fn! {
/// Lists the stops on a route in id order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_stops_on_route(conn: &mut _, route_id: RouteId) -> Result<Vec<Stop>, PersistenceError> {
    let rows: Vec<StopRow> = stops::table
        .filter(stops::route_id.eq(route_id.value()))
        .order(stops::stop_id.asc())
        .select(StopRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Stop::from).collect())
}
}

backend_fn! {
/// Counts the stops on a route.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_stops_on_route(conn: &mut _, route_id: RouteId) -> Result<usize, PersistenceError> {
    let count: i64 = stops::table
        .filter(stops::route_id.eq(route_id.value()))
        .count()
        .get_result(conn)?;
    count.to_usize().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("Stop count {count} out of range"))
    })
}
}

backend_fn! {
/// Retrieves a schedule by id.
///
/// # Errors
///
/// Returns an error if the schedule does not exist, is malformed, or the
/// query fails.
pub fn get_schedule(conn: &mut _, schedule_id: ScheduleId) -> Result<Schedule, PersistenceError> {
    let row: ScheduleRow = schedules::table
        .filter(schedules::schedule_id.eq(schedule_id.value()))
        .select(ScheduleRow::as_select())
        .first::<ScheduleRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::EntityNotFound {
            entity: "Schedule",
            id: schedule_id.value(),
        })?;
    Schedule::try_from(row)
}
}

backend_fn! {
/// Lists a registration's schedules in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_schedules(
    conn: &mut _,
    registration_id: RegistrationId,
) -> Result<Vec<Schedule>, PersistenceError> {
    let rows: Vec<ScheduleRow> = schedules::table
        .filter(schedules::registration_id.eq(registration_id.value()))
        .order(schedules::schedule_id.asc())
        .select(ScheduleRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Schedule::try_from).collect()
}
}

backend_fn! {
/// Retrieves a bus assignment by id.
///
/// # Errors
///
/// Returns an error if the bus assignment does not exist, is malformed, or
/// the query fails.
pub fn get_bus_assignment(
    conn: &mut _,
    bus_assignment_id: BusAssignmentId,
) -> Result<BusAssignment, PersistenceError> {
    let row: BusAssignmentRow = bus_assignments::table
        .filter(bus_assignments::bus_assignment_id.eq(bus_assignment_id.value()))
        .select(BusAssignmentRow::as_select())
        .first::<BusAssignmentRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::EntityNotFound {
            entity: "Bus assignment",
            id: bus_assignment_id.value(),
        })?;
    BusAssignment::try_from(row)
}
}

backend_fn! {
/// Lists a registration's bus assignments in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_bus_assignments(
    conn: &mut _,
    registration_id: RegistrationId,
) -> Result<Vec<BusAssignment>, PersistenceError> {
    let rows: Vec<BusAssignmentRow> = bus_assignments::table
        .filter(bus_assignments::registration_id.eq(registration_id.value()))
        .order(bus_assignments::bus_assignment_id.asc())
        .select(BusAssignmentRow::as_select())
        .load(conn)?;
    rows.into_iter().map(BusAssignment::try_from).collect()
}
}

backend_fn! {
/// Retrieves the given bus assignments in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_bus_assignments_by_id(
    conn: &mut _,
    ids: &[BusAssignmentId],
) -> Result<Vec<BusAssignment>, PersistenceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<i64> = ids.iter().map(|id| id.value()).collect();
    let rows: Vec<BusAssignmentRow> = bus_assignments::table
        .filter(bus_assignments::bus_assignment_id.eq_any(&raw))
        .order(bus_assignments::bus_assignment_id.asc())
        .select(BusAssignmentRow::as_select())
        .load(conn)?;
    rows.into_iter().map(BusAssignment::try_from).collect()
}
}

backend_fn! {
/// Retrieves a trip by id.
///
/// # Errors
///
/// Returns an error if the trip does not exist, is malformed, or the query
/// fails.
pub fn get_trip(conn: &mut _, trip_id: TripId) -> Result<Trip, PersistenceError> {
    let row: TripRow = trips::table
        .filter(trips::trip_id.eq(trip_id.value()))
        .select(TripRow::as_select())
        .first::<TripRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::EntityNotFound {
            entity: "Trip",
            id: trip_id.value(),
        })?;
    Trip::try_from(row)
}
}

backend_fn! {
/// Looks up the trip a side assignment points at.
///
/// # Errors
///
/// Returns an error if the row is malformed or the query fails.
pub fn find_trip(conn: &mut _, key: TripKey) -> Result<Option<Trip>, PersistenceError> {
    trips::table
        .filter(trips::bus_assignment_id.eq(key.bus_assignment_id.value()))
        .filter(trips::route_id.eq(key.route_id.value()))
        .filter(trips::schedule_id.eq(key.schedule_id.value()))
        .select(TripRow::as_select())
        .first::<TripRow>(conn)
        .optional()?
        .map(Trip::try_from)
        .transpose()
}
}

backend_fn! {
/// Lists a registration's trips in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_trips(conn: &mut _, registration_id: RegistrationId) -> Result<Vec<Trip>, PersistenceError> {
    let rows: Vec<TripRow> = trips::table
        .filter(trips::registration_id.eq(registration_id.value()))
        .order(trips::trip_id.asc())
        .select(TripRow::as_select())
        .load(conn)?;
    trips_from_rows(rows)
}
}

backend_fn! {
/// Lists every trip on a route in id order, across all schedules.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_trips_on_route(conn: &mut _, route_id: RouteId) -> Result<Vec<Trip>, PersistenceError> {
    let rows: Vec<TripRow> = trips::table
        .filter(trips::route_id.eq(route_id.value()))
        .order(trips::trip_id.asc())
        .select(TripRow::as_select())
        .load(conn)?;
    trips_from_rows(rows)
}
}

backend_fn! {
/// Lists every trip run by a bus assignment in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_trips_for_bus_assignment(
    conn: &mut _,
    bus_assignment_id: BusAssignmentId,
) -> Result<Vec<Trip>, PersistenceError> {
    let rows: Vec<TripRow> = trips::table
        .filter(trips::bus_assignment_id.eq(bus_assignment_id.value()))
        .order(trips::trip_id.asc())
        .select(TripRow::as_select())
        .load(conn)?;
    trips_from_rows(rows)
}
}

backend_fn! {
/// Looks up a ticket by id.
///
/// # Errors
///
/// Returns an error if the row is malformed or the query fails.
pub fn find_ticket(conn: &mut _, ticket_id: TicketId) -> Result<Option<Ticket>, PersistenceError> {
    tickets::table
        .filter(tickets::ticket_id.eq(ticket_id.value()))
        .select(TicketRow::as_select())
        .first::<TicketRow>(conn)
        .optional()?
        .map(Ticket::try_from)
        .transpose()
}
}

backend_fn! {
/// Lists a registration's tickets in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_tickets(
    conn: &mut _,
    registration_id: RegistrationId,
) -> Result<Vec<Ticket>, PersistenceError> {
    let rows: Vec<TicketRow> = tickets::table
        .filter(tickets::registration_id.eq(registration_id.value()))
        .order(tickets::ticket_id.asc())
        .select(TicketRow::as_select())
        .load(conn)?;
    tickets_from_rows(rows)
}
}

backend_fn! {
/// Lists every ticket with a pickup or drop at the stop, in id order.
///
/// # Errors
///
/// Returns an error if a row is malformed or the query fails.
pub fn list_tickets_at_stop(conn: &mut _, stop_id: StopId) -> Result<Vec<Ticket>, PersistenceError> {
    let rows: Vec<TicketRow> = tickets::table
        .filter(
            tickets::pickup_stop_id
                .eq(stop_id.value())
                .or(tickets::drop_stop_id.eq(stop_id.value())),
        )
        .order(tickets::ticket_id.asc())
        .select(TicketRow::as_select())
        .load(conn)?;
    tickets_from_rows(rows)
}
}
