// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Creation of registrations, routes, stops, schedules, bus assignments and
//! trips.
//!
//! Every entity is checked against its registration before it is written.
//! New trips and bus assignments start empty.

use fleetdesk::{CoreError, ensure_registration};
use fleetdesk_domain::{
    BusAssignment, Registration, RegistrationId, Route, RouteId, Schedule, ScheduleRole, Stop,
    Trip, TripKey, validate_capacity, validate_name, validate_schedule_window,
};
use tracing::info;

use crate::error::OperationError;
use crate::store::LedgerStore;

fn load_route<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    route_id: RouteId,
) -> Result<Route, OperationError> {
    let route: Route = conn
        .find_route(route_id)?
        .ok_or(CoreError::RouteNotFound(route_id))?;
    ensure_registration(
        "Route",
        route_id.value(),
        registration_id,
        route.registration_id(),
    )?;
    Ok(route)
}

/// Creates a registration.
///
/// # Errors
///
/// Returns an error if the name is blank or the insert fails.
pub fn create_registration<C: LedgerStore>(
    conn: &mut C,
    name: &str,
) -> Result<Registration, OperationError> {
    validate_name(name)?;
    let registration_id: RegistrationId = conn.insert_registration(name)?;
    info!(registration_id = %registration_id, name, "Created registration");
    Ok(Registration::new(registration_id, name.to_string()))
}

/// Creates a route in a registration.
///
/// # Errors
///
/// Returns an error if the name is blank, the registration does not exist,
/// or the insert fails.
pub fn create_route<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    name: &str,
) -> Result<Route, OperationError> {
    validate_name(name)?;
    conn.get_registration(registration_id)?;
    let route_id: RouteId = conn.insert_route(registration_id, name)?;
    info!(route_id = %route_id, registration_id = %registration_id, name, "Created route");
    Ok(Route::new(route_id, registration_id, name.to_string()))
}

/// Creates a stop on a route.
///
/// # Errors
///
/// Returns an error if the name is blank, the route does not exist or
/// belongs to another registration, or the insert fails.
pub fn create_stop<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    route_id: RouteId,
    name: &str,
) -> Result<Stop, OperationError> {
    validate_name(name)?;
    load_route(conn, registration_id, route_id)?;
    let stop_id = conn.insert_stop(registration_id, route_id, name)?;
    info!(stop_id = %stop_id, route_id = %route_id, name, "Created stop");
    Ok(Stop::new(stop_id, registration_id, route_id, name.to_string()))
}

/// Creates a pickup or drop schedule.
///
/// # Errors
///
/// Returns an error if the name is blank, the window is empty, the
/// registration does not exist, or the insert fails.
pub fn create_schedule<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    name: &str,
    role: ScheduleRole,
    start_time: time::Time,
    end_time: time::Time,
) -> Result<Schedule, OperationError> {
    validate_name(name)?;
    validate_schedule_window(start_time, end_time)?;
    conn.get_registration(registration_id)?;
    let schedule_id = conn.insert_schedule(registration_id, name, role, start_time, end_time)?;
    info!(schedule_id = %schedule_id, role = %role, name, "Created schedule");
    Ok(Schedule::new(
        schedule_id,
        registration_id,
        name.to_string(),
        role,
        start_time,
        end_time,
    ))
}

/// Binds a bus to a registration.
///
/// # Errors
///
/// Returns an error if the label is blank, the capacity is zero, the
/// registration does not exist, or the insert fails.
pub fn create_bus_assignment<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    label: &str,
    capacity: u32,
) -> Result<BusAssignment, OperationError> {
    validate_name(label)?;
    validate_capacity(capacity)?;
    conn.get_registration(registration_id)?;
    let bus_assignment_id = conn.insert_bus_assignment(registration_id, label, capacity)?;
    info!(
        bus_assignment_id = %bus_assignment_id,
        label,
        capacity,
        "Created bus assignment"
    );
    Ok(BusAssignment::new(
        bus_assignment_id,
        registration_id,
        label.to_string(),
        capacity,
        0,
    ))
}

/// Creates an empty trip for a bus assignment on a route and schedule.
///
/// # Errors
///
/// Returns an error if any referenced entity is missing or belongs to
/// another registration, the key is already taken, or the insert fails.
pub fn create_trip<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    key: TripKey,
) -> Result<Trip, OperationError> {
    let bus: BusAssignment = conn.get_bus_assignment(key.bus_assignment_id)?;
    ensure_registration(
        "Bus assignment",
        key.bus_assignment_id.value(),
        registration_id,
        bus.registration_id(),
    )?;
    load_route(conn, registration_id, key.route_id)?;
    let schedule: Schedule = conn.get_schedule(key.schedule_id)?;
    ensure_registration(
        "Schedule",
        key.schedule_id.value(),
        registration_id,
        schedule.registration_id(),
    )?;

    let trip_id = conn.insert_trip(registration_id, key)?;
    info!(
        trip_id = %trip_id,
        bus_assignment_id = %key.bus_assignment_id,
        route_id = %key.route_id,
        schedule_id = %key.schedule_id,
        "Created trip"
    );
    Ok(Trip::new(
        trip_id,
        registration_id,
        key.bus_assignment_id,
        key.route_id,
        key.schedule_id,
        0,
    ))
}
