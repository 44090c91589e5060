// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod capacity;
mod error;
mod ids;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use capacity::{check_trip_capacity, counter_from_stored, derive_min_required_capacity};
pub use error::DomainError;
pub use ids::{BusAssignmentId, RegistrationId, RouteId, ScheduleId, StopId, TicketId, TripId};
pub use types::{
    BusAssignment, Registration, Route, Schedule, ScheduleRole, SideAssignment, Stop, Ticket,
    TicketKind, TicketSide, Trip, TripKey,
};
pub use validation::{
    parse_time_of_day, validate_capacity, validate_name, validate_schedule_window,
    validate_side_schedule, validate_stop_on_route, validate_ticket_sides,
};
