// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row inserts and updates.
//!
//! These are single statements. Validation, locking and counter bookkeeping
//! live in `operations`, which calls them inside one transaction.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetdesk::NewTicket;
use fleetdesk_domain::{
    BusAssignmentId, RegistrationId, RouteId, ScheduleId, ScheduleRole, SideAssignment, StopId,
    TicketId, TicketSide, TripId, TripKey,
};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{counter_to_stored, format_time_of_day};
use crate::diesel_schema::{
    bus_assignments, registrations, routes, schedules, stops, tickets, trips,
};
use crate::error::PersistenceError;

/// Fails when an update matched no row.
const fn ensure_updated(
    updated: usize,
    entity: &'static str,
    id: i64,
) -> Result<(), PersistenceError> {
    if updated == 0 {
        return Err(PersistenceError::EntityNotFound { entity, id });
    }
    Ok(())
}

backend_fn! {
/// Inserts a registration and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_registration(conn: &mut _, name: &str) -> Result<RegistrationId, PersistenceError> {
    diesel::insert_into(registrations::table)
        .values(registrations::name.eq(name))
        .execute(conn)?;
    Ok(RegistrationId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Inserts a route and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_route(
    conn: &mut _,
    registration_id: RegistrationId,
    name: &str,
) -> Result<RouteId, PersistenceError> {
    diesel::insert_into(routes::table)
        .values((
            routes::registration_id.eq(registration_id.value()),
            routes::name.eq(name),
        ))
        .execute(conn)?;
    Ok(RouteId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Inserts a stop and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_stop(
    conn: &mut _,
    registration_id: RegistrationId,
    route_id: RouteId,
    name: &str,
) -> Result<StopId, PersistenceError> {
    diesel::insert_into(stops::table)
        .values((
            stops::registration_id.eq(registration_id.value()),
            stops::route_id.eq(route_id.value()),
            stops::name.eq(name),
        ))
        .execute(conn)?;
    Ok(StopId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Inserts a schedule and returns its id.
///
/// # Errors
///
/// Returns an error if the times cannot be formatted or the insert fails.
pub fn insert_schedule(
    conn: &mut _,
    registration_id: RegistrationId,
    name: &str,
    role: ScheduleRole,
    start_time: time::Time,
    end_time: time::Time,
) -> Result<ScheduleId, PersistenceError> {
    let start: String = format_time_of_day(start_time)?;
    let end: String = format_time_of_day(end_time)?;
    diesel::insert_into(schedules::table)
        .values((
            schedules::registration_id.eq(registration_id.value()),
            schedules::name.eq(name),
            schedules::role.eq(role.as_str()),
            schedules::start_time.eq(start),
            schedules::end_time.eq(end),
        ))
        .execute(conn)?;
    Ok(ScheduleId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Inserts a bus assignment with no bookings and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_bus_assignment(
    conn: &mut _,
    registration_id: RegistrationId,
    label: &str,
    capacity: u32,
) -> Result<BusAssignmentId, PersistenceError> {
    diesel::insert_into(bus_assignments::table)
        .values((
            bus_assignments::registration_id.eq(registration_id.value()),
            bus_assignments::label.eq(label),
            bus_assignments::capacity.eq(counter_to_stored(capacity)?),
            bus_assignments::min_required_capacity.eq(0),
        ))
        .execute(conn)?;
    Ok(BusAssignmentId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Inserts an empty trip and returns its id.
///
/// # Errors
///
/// Returns an error if the key is already taken or the insert fails.
pub fn insert_trip(
    conn: &mut _,
    registration_id: RegistrationId,
    key: TripKey,
) -> Result<TripId, PersistenceError> {
    diesel::insert_into(trips::table)
        .values((
            trips::registration_id.eq(registration_id.value()),
            trips::bus_assignment_id.eq(key.bus_assignment_id.value()),
            trips::route_id.eq(key.route_id.value()),
            trips::schedule_id.eq(key.schedule_id.value()),
            trips::booking_count.eq(0),
        ))
        .execute(conn)?;
    Ok(TripId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Inserts a ticket with its sides and returns its id.
///
/// Trip counters are not touched here.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_ticket(conn: &mut _, ticket: &NewTicket) -> Result<TicketId, PersistenceError> {
    let pickup: Option<&SideAssignment> = ticket.pickup.as_ref();
    let drop: Option<&SideAssignment> = ticket.drop.as_ref();
    diesel::insert_into(tickets::table)
        .values((
            tickets::registration_id.eq(ticket.registration_id.value()),
            tickets::code.eq(&ticket.code),
            tickets::pickup_route_id.eq(pickup.map(|a| a.route_id.value())),
            tickets::pickup_stop_id.eq(pickup.map(|a| a.stop_id.value())),
            tickets::pickup_schedule_id.eq(pickup.map(|a| a.schedule_id.value())),
            tickets::pickup_bus_assignment_id.eq(pickup.map(|a| a.bus_assignment_id.value())),
            tickets::drop_route_id.eq(drop.map(|a| a.route_id.value())),
            tickets::drop_stop_id.eq(drop.map(|a| a.stop_id.value())),
            tickets::drop_schedule_id.eq(drop.map(|a| a.schedule_id.value())),
            tickets::drop_bus_assignment_id.eq(drop.map(|a| a.bus_assignment_id.value())),
        ))
        .execute(conn)?;
    Ok(TicketId::new(conn.get_last_insert_rowid()?))
}
}

backend_fn! {
/// Deletes a ticket.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or the delete fails.
pub fn delete_ticket(conn: &mut _, ticket_id: TicketId) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(tickets::table.filter(tickets::ticket_id.eq(ticket_id.value())))
            .execute(conn)?;
    ensure_updated(deleted, "Ticket", ticket_id.value())
}
}

backend_fn! {
/// Moves a stop onto a route.
///
/// # Errors
///
/// Returns an error if the stop does not exist or the update fails.
pub fn set_stop_route(
    conn: &mut _,
    stop_id: StopId,
    route_id: RouteId,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(stops::table.filter(stops::stop_id.eq(stop_id.value())))
        .set(stops::route_id.eq(route_id.value()))
        .execute(conn)?;
    debug!(stop_id = %stop_id, route_id = %route_id, "Reparented stop");
    ensure_updated(updated, "Stop", stop_id.value())
}
}

backend_fn! {
/// Rewrites one side of a ticket.
///
/// The other side is left as it is.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or the update fails.
pub fn set_ticket_side(
    conn: &mut _,
    ticket_id: TicketId,
    side: TicketSide,
    assignment: &SideAssignment,
) -> Result<(), PersistenceError> {
    let target = tickets::table.filter(tickets::ticket_id.eq(ticket_id.value()));
    let updated: usize = match side {
        TicketSide::Pickup => diesel::update(target)
            .set((
                tickets::pickup_route_id.eq(assignment.route_id.value()),
                tickets::pickup_stop_id.eq(assignment.stop_id.value()),
                tickets::pickup_schedule_id.eq(assignment.schedule_id.value()),
                tickets::pickup_bus_assignment_id.eq(assignment.bus_assignment_id.value()),
            ))
            .execute(conn)?,
        TicketSide::Drop => diesel::update(target)
            .set((
                tickets::drop_route_id.eq(assignment.route_id.value()),
                tickets::drop_stop_id.eq(assignment.stop_id.value()),
                tickets::drop_schedule_id.eq(assignment.schedule_id.value()),
                tickets::drop_bus_assignment_id.eq(assignment.bus_assignment_id.value()),
            ))
            .execute(conn)?,
    };
    debug!(
        ticket_id = %ticket_id,
        side = %side,
        route_id = %assignment.route_id,
        bus_assignment_id = %assignment.bus_assignment_id,
        "Reassigned ticket side"
    );
    ensure_updated(updated, "Ticket", ticket_id.value())
}
}

backend_fn! {
/// Writes a trip's absolute booking count.
///
/// # Errors
///
/// Returns an error if the trip does not exist or the update fails.
pub fn set_trip_booking_count(
    conn: &mut _,
    trip_id: TripId,
    booking_count: u32,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(trips::table.filter(trips::trip_id.eq(trip_id.value())))
        .set(trips::booking_count.eq(counter_to_stored(booking_count)?))
        .execute(conn)?;
    debug!(trip_id = %trip_id, booking_count, "Updated trip booking count");
    ensure_updated(updated, "Trip", trip_id.value())
}
}

backend_fn! {
/// Writes a bus assignment's derived minimum required capacity.
///
/// # Errors
///
/// Returns an error if the bus assignment does not exist or the update
/// fails.
pub fn set_min_required_capacity(
    conn: &mut _,
    bus_assignment_id: BusAssignmentId,
    min_required_capacity: u32,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        bus_assignments::table
            .filter(bus_assignments::bus_assignment_id.eq(bus_assignment_id.value())),
    )
    .set(bus_assignments::min_required_capacity.eq(counter_to_stored(min_required_capacity)?))
    .execute(conn)?;
    debug!(
        bus_assignment_id = %bus_assignment_id,
        min_required_capacity,
        "Updated minimum required capacity"
    );
    ensure_updated(updated, "Bus assignment", bus_assignment_id.value())
}
}
