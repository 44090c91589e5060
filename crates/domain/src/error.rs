// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ids::{BusAssignmentId, RouteId, ScheduleId, StopId, TripId};
use crate::types::{ScheduleRole, TicketSide};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A name field is empty or invalid.
    InvalidName(String),
    /// A schedule role string was not recognized.
    InvalidScheduleRole(String),
    /// A ticket side string was not recognized.
    InvalidTicketSide(String),
    /// A schedule window ends before it starts.
    InvalidScheduleWindow {
        /// The window start.
        start_time: time::Time,
        /// The window end.
        end_time: time::Time,
    },
    /// Failed to parse a time-of-day value.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A bus assignment must seat at least one passenger.
    InvalidCapacity(u32),
    /// A ticket has neither a pickup nor a drop assignment.
    EmptyTicket,
    /// A ticket side uses a schedule whose role does not match the side.
    ScheduleRoleMismatch {
        /// The ticket side.
        side: TicketSide,
        /// The schedule.
        schedule_id: ScheduleId,
        /// The role carried by the schedule.
        role: ScheduleRole,
    },
    /// A ticket side names a stop that is not on the side's route.
    StopNotOnRoute {
        /// The stop.
        stop_id: StopId,
        /// The route the side claims.
        route_id: RouteId,
    },
    /// A trip's booking count exceeds its bus assignment's capacity.
    CapacityExceeded {
        /// The trip.
        trip_id: TripId,
        /// The booking count.
        booking_count: u32,
        /// The capacity of the trip's bus assignment.
        capacity: u32,
    },
    /// A trip was evaluated against a bus assignment it does not belong to.
    TripAssignmentMismatch {
        /// The trip.
        trip_id: TripId,
        /// The bus assignment the trip belongs to.
        expected: BusAssignmentId,
        /// The bus assignment it was evaluated against.
        actual: BusAssignmentId,
    },
    /// A stored count does not fit the domain's counter type.
    CounterOutOfRange(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidScheduleRole(value) => write!(f, "Invalid schedule role: {value}"),
            Self::InvalidTicketSide(value) => write!(f, "Invalid ticket side: {value}"),
            Self::InvalidScheduleWindow {
                start_time,
                end_time,
            } => {
                write!(
                    f,
                    "Schedule window must end after it starts ({start_time} - {end_time})"
                )
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
            Self::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {capacity}. Must be at least 1")
            }
            Self::EmptyTicket => write!(f, "Ticket must have a pickup or a drop assignment"),
            Self::ScheduleRoleMismatch {
                side,
                schedule_id,
                role,
            } => {
                write!(
                    f,
                    "Schedule {schedule_id} is a {role} schedule and cannot serve the {side} side"
                )
            }
            Self::StopNotOnRoute { stop_id, route_id } => {
                write!(f, "Stop {stop_id} is not on route {route_id}")
            }
            Self::CapacityExceeded {
                trip_id,
                booking_count,
                capacity,
            } => {
                write!(
                    f,
                    "Trip {trip_id} has {booking_count} bookings but capacity {capacity}"
                )
            }
            Self::TripAssignmentMismatch {
                trip_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Trip {trip_id} belongs to bus assignment {expected}, not {actual}"
                )
            }
            Self::CounterOutOfRange(value) => {
                write!(f, "Counter value {value} is out of range")
            }
        }
    }
}

impl std::error::Error for DomainError {}
