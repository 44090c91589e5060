// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{
    BusAssignmentId, DomainError, RegistrationId, RouteId, ScheduleId, StopId, TicketId,
    TicketSide, TripId,
};

/// The failure classes a caller of the engine can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// The request itself is wrong. Nothing was looked up or changed.
    InvalidRequest,
    /// Every candidate trip for a required schedule is full.
    NoCapacityAvailable,
    /// The destination route has no trip for a required schedule.
    NoMatchingTrip,
    /// Concurrent activity invalidated the plan. The caller may retry.
    ConcurrentCapacityViolation,
    /// Storage failed or holds inconsistent data.
    PersistenceFailure,
}

impl FailureCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::NoCapacityAvailable => "NoCapacityAvailable",
            Self::NoMatchingTrip => "NoMatchingTrip",
            Self::ConcurrentCapacityViolation => "ConcurrentCapacityViolation",
            Self::PersistenceFailure => "PersistenceFailure",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced while planning or validating engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The destination route is the stop's current route.
    SameRoute {
        /// The stop.
        stop_id: StopId,
        /// The route the stop is already on.
        route_id: RouteId,
    },
    /// The stop does not exist.
    StopNotFound(StopId),
    /// The route does not exist.
    RouteNotFound(RouteId),
    /// The ticket does not exist.
    TicketNotFound(TicketId),
    /// An entity belongs to a different registration than the request.
    RegistrationMismatch {
        /// What kind of entity was checked (e.g. "stop").
        entity: &'static str,
        /// The entity's identifier.
        id: i64,
        /// The registration the request is scoped to.
        expected: RegistrationId,
        /// The registration the entity belongs to.
        actual: RegistrationId,
    },
    /// No trip exists for the required route and schedule.
    NoMatchingTrip {
        /// The ticket that could not be placed.
        ticket_code: String,
        /// The side that could not be placed.
        side: TicketSide,
        /// The required schedule.
        schedule_id: ScheduleId,
        /// The route that was searched.
        route_id: RouteId,
    },
    /// Every trip for the required route and schedule is full.
    NoCapacityAvailable {
        /// The ticket that could not be placed.
        ticket_code: String,
        /// The side that could not be placed.
        side: TicketSide,
        /// The required schedule.
        schedule_id: ScheduleId,
        /// The route that was searched.
        route_id: RouteId,
    },
    /// Committed counts no longer leave room for the plan.
    ConcurrentCapacityViolation {
        /// The trip that would overflow.
        trip_id: TripId,
        /// Seats on the trip's bus.
        capacity: u32,
        /// Seats the plan needs in total.
        required: u32,
    },
    /// The data a plan was built from has changed since planning.
    PlanOutdated(String),
    /// A plan move does not keep its stop and schedule or does not land
    /// on the destination route.
    MalformedPlan(String),
    /// A counter would drop below zero.
    CounterUnderflow(TripId),
    /// A trip references a bus assignment that was not loaded.
    UnknownBusAssignment(BusAssignmentId),
    /// A trip the operation depends on was not loaded.
    UnknownTrip(TripId),
}

impl CoreError {
    /// Classifies this error for the caller.
    #[must_use]
    pub const fn failure_category(&self) -> FailureCategory {
        match self {
            Self::DomainViolation(_)
            | Self::SameRoute { .. }
            | Self::StopNotFound(_)
            | Self::RouteNotFound(_)
            | Self::TicketNotFound(_)
            | Self::RegistrationMismatch { .. }
            | Self::MalformedPlan(_) => FailureCategory::InvalidRequest,
            Self::NoMatchingTrip { .. } => FailureCategory::NoMatchingTrip,
            Self::NoCapacityAvailable { .. } => FailureCategory::NoCapacityAvailable,
            Self::ConcurrentCapacityViolation { .. } | Self::PlanOutdated(_) => {
                FailureCategory::ConcurrentCapacityViolation
            }
            Self::CounterUnderflow(_) | Self::UnknownBusAssignment(_) | Self::UnknownTrip(_) => {
                FailureCategory::PersistenceFailure
            }
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::SameRoute { stop_id, route_id } => {
                write!(f, "Stop {stop_id} is already on route {route_id}")
            }
            Self::StopNotFound(id) => write!(f, "Stop {id} not found"),
            Self::RouteNotFound(id) => write!(f, "Route {id} not found"),
            Self::TicketNotFound(id) => write!(f, "Ticket {id} not found"),
            Self::RegistrationMismatch {
                entity,
                id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{entity} {id} belongs to registration {actual}, not {expected}"
                )
            }
            Self::NoMatchingTrip {
                ticket_code,
                side,
                schedule_id,
                route_id,
            } => {
                write!(
                    f,
                    "No trip on route {route_id} for schedule {schedule_id} ({side} of ticket {ticket_code})"
                )
            }
            Self::NoCapacityAvailable {
                ticket_code,
                side,
                schedule_id,
                route_id,
            } => {
                write!(
                    f,
                    "No seats left on route {route_id} for schedule {schedule_id} ({side} of ticket {ticket_code})"
                )
            }
            Self::ConcurrentCapacityViolation {
                trip_id,
                capacity,
                required,
            } => {
                write!(
                    f,
                    "Trip {trip_id} needs {required} seats but only has {capacity}; capacity was consumed concurrently"
                )
            }
            Self::PlanOutdated(reason) => write!(f, "Transfer plan is outdated: {reason}"),
            Self::MalformedPlan(reason) => write!(f, "Transfer plan is malformed: {reason}"),
            Self::CounterUnderflow(id) => {
                write!(f, "Booking count of trip {id} would drop below zero")
            }
            Self::UnknownBusAssignment(id) => write!(f, "Bus assignment {id} not loaded"),
            Self::UnknownTrip(id) => write!(f, "Trip {id} not loaded"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
