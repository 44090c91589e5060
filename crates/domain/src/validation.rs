// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::RouteId;
use crate::types::{Schedule, SideAssignment, TicketSide};
use time::macros::format_description;

/// Validates that a display name is not blank.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a bus seats at least one passenger.
///
/// # Errors
///
/// Returns an error if `capacity` is 0.
pub const fn validate_capacity(capacity: u32) -> Result<(), DomainError> {
    if capacity == 0 {
        return Err(DomainError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// Validates that a schedule window ends strictly after it starts.
///
/// # Errors
///
/// Returns an error if `end_time <= start_time`.
pub fn validate_schedule_window(
    start_time: time::Time,
    end_time: time::Time,
) -> Result<(), DomainError> {
    if end_time <= start_time {
        return Err(DomainError::InvalidScheduleWindow {
            start_time,
            end_time,
        });
    }
    Ok(())
}

/// Parses an `HH:MM` time of day.
///
/// # Errors
///
/// Returns an error if the string is not a valid 24-hour `HH:MM` value.
pub fn parse_time_of_day(value: &str) -> Result<time::Time, DomainError> {
    time::Time::parse(value, format_description!("[hour]:[minute]")).map_err(|e| {
        DomainError::TimeParseError {
            time_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Validates that a schedule can serve the given ticket side.
///
/// # Errors
///
/// Returns an error if the schedule's role does not match the side.
pub fn validate_side_schedule(side: TicketSide, schedule: &Schedule) -> Result<(), DomainError> {
    if schedule.role() != side.required_role() {
        return Err(DomainError::ScheduleRoleMismatch {
            side,
            schedule_id: schedule.schedule_id(),
            role: schedule.role(),
        });
    }
    Ok(())
}

/// Validates that at least one side of a ticket is assigned.
///
/// # Errors
///
/// Returns an error if both sides are `None`.
pub const fn validate_ticket_sides(
    pickup: Option<&SideAssignment>,
    drop: Option<&SideAssignment>,
) -> Result<(), DomainError> {
    if pickup.is_none() && drop.is_none() {
        return Err(DomainError::EmptyTicket);
    }
    Ok(())
}

/// Validates that a side's stop lies on the side's route.
///
/// `stop_route` is the route the stop currently belongs to.
///
/// # Errors
///
/// Returns an error if the stop is on a different route.
pub fn validate_stop_on_route(
    assignment: &SideAssignment,
    stop_route: RouteId,
) -> Result<(), DomainError> {
    if assignment.route_id != stop_route {
        return Err(DomainError::StopNotOnRoute {
            stop_id: assignment.stop_id,
            route_id: assignment.route_id,
        });
    }
    Ok(())
}

