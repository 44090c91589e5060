// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::{
    BusAssignmentId, RegistrationId, RouteId, ScheduleId, StopId, TicketId, TripId,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether a schedule serves pickup trips or drop trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleRole {
    /// Collects passengers at their stop.
    Pickup,
    /// Delivers passengers to their stop.
    Drop,
}

impl ScheduleRole {
    /// Converts this role to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Drop => "drop",
        }
    }
}

impl FromStr for ScheduleRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(Self::Pickup),
            "drop" => Ok(Self::Drop),
            _ => Err(DomainError::InvalidScheduleRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScheduleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the two independent halves of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketSide {
    /// The pickup half.
    Pickup,
    /// The drop half.
    Drop,
}

impl TicketSide {
    /// Both sides, pickup first.
    pub const ALL: [Self; 2] = [Self::Pickup, Self::Drop];

    /// Converts this side to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Drop => "drop",
        }
    }

    /// The schedule role a trip must carry to serve this side.
    #[must_use]
    pub const fn required_role(&self) -> ScheduleRole {
        match self {
            Self::Pickup => ScheduleRole::Pickup,
            Self::Drop => ScheduleRole::Drop,
        }
    }
}

impl FromStr for TicketSide {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(Self::Pickup),
            "drop" => Ok(Self::Drop),
            _ => Err(DomainError::InvalidTicketSide(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a ticket by the sides it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketKind {
    /// Exactly one side is assigned.
    OneWay(TicketSide),
    /// Both sides are assigned.
    TwoWay,
}

/// A time-boxed booking period scoping routes, schedules, and tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Registration {
    registration_id: RegistrationId,
    name: String,
}

impl Registration {
    /// Creates a new `Registration`.
    #[must_use]
    pub const fn new(registration_id: RegistrationId, name: String) -> Self {
        Self {
            registration_id,
            name,
        }
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A route within a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Route {
    route_id: RouteId,
    registration_id: RegistrationId,
    name: String,
}

impl Route {
    /// Creates a new `Route`.
    #[must_use]
    pub const fn new(route_id: RouteId, registration_id: RegistrationId, name: String) -> Self {
        Self {
            route_id,
            registration_id,
            name,
        }
    }

    #[must_use]
    pub const fn route_id(&self) -> RouteId {
        self.route_id
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A stop. Belongs to exactly one route at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Stop {
    stop_id: StopId,
    registration_id: RegistrationId,
    route_id: RouteId,
    name: String,
}

impl Stop {
    /// Creates a new `Stop`.
    #[must_use]
    pub const fn new(
        stop_id: StopId,
        registration_id: RegistrationId,
        route_id: RouteId,
        name: String,
    ) -> Self {
        Self {
            stop_id,
            registration_id,
            route_id,
            name,
        }
    }

    #[must_use]
    pub const fn stop_id(&self) -> StopId {
        self.stop_id
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    /// The route this stop currently belongs to.
    #[must_use]
    pub const fn route_id(&self) -> RouteId {
        self.route_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registration-scoped schedule shared across routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Schedule {
    schedule_id: ScheduleId,
    registration_id: RegistrationId,
    name: String,
    role: ScheduleRole,
    start_time: time::Time,
    end_time: time::Time,
}

impl Schedule {
    /// Creates a new `Schedule`.
    #[must_use]
    pub const fn new(
        schedule_id: ScheduleId,
        registration_id: RegistrationId,
        name: String,
        role: ScheduleRole,
        start_time: time::Time,
        end_time: time::Time,
    ) -> Self {
        Self {
            schedule_id,
            registration_id,
            name,
            role,
            start_time,
            end_time,
        }
    }

    #[must_use]
    pub const fn schedule_id(&self) -> ScheduleId {
        self.schedule_id
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn role(&self) -> ScheduleRole {
        self.role
    }

    #[must_use]
    pub const fn start_time(&self) -> time::Time {
        self.start_time
    }

    #[must_use]
    pub const fn end_time(&self) -> time::Time {
        self.end_time
    }
}

/// A bus bound to a registration.
///
/// `min_required_capacity` is derived: it always equals the largest
/// `booking_count` across this assignment's trips. It is recomputed by the
/// storage layer whenever one of those trips changes and is never assigned
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct BusAssignment {
    bus_assignment_id: BusAssignmentId,
    registration_id: RegistrationId,
    label: String,
    capacity: u32,
    min_required_capacity: u32,
}

impl BusAssignment {
    /// Creates a new `BusAssignment`.
    #[must_use]
    pub const fn new(
        bus_assignment_id: BusAssignmentId,
        registration_id: RegistrationId,
        label: String,
        capacity: u32,
        min_required_capacity: u32,
    ) -> Self {
        Self {
            bus_assignment_id,
            registration_id,
            label,
            capacity,
            min_required_capacity,
        }
    }

    #[must_use]
    pub const fn bus_assignment_id(&self) -> BusAssignmentId {
        self.bus_assignment_id
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Seats on the underlying bus.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    #[must_use]
    pub const fn min_required_capacity(&self) -> u32 {
        self.min_required_capacity
    }
}

/// The (bus assignment, route, schedule) triple that identifies a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TripKey {
    pub bus_assignment_id: BusAssignmentId,
    pub route_id: RouteId,
    pub schedule_id: ScheduleId,
}

/// A bookable (bus, route, schedule) combination with a live seat counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Trip {
    trip_id: TripId,
    registration_id: RegistrationId,
    bus_assignment_id: BusAssignmentId,
    route_id: RouteId,
    schedule_id: ScheduleId,
    booking_count: u32,
}

impl Trip {
    /// Creates a new `Trip`.
    #[must_use]
    pub const fn new(
        trip_id: TripId,
        registration_id: RegistrationId,
        bus_assignment_id: BusAssignmentId,
        route_id: RouteId,
        schedule_id: ScheduleId,
        booking_count: u32,
    ) -> Self {
        Self {
            trip_id,
            registration_id,
            bus_assignment_id,
            route_id,
            schedule_id,
            booking_count,
        }
    }

    #[must_use]
    pub const fn trip_id(&self) -> TripId {
        self.trip_id
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    #[must_use]
    pub const fn bus_assignment_id(&self) -> BusAssignmentId {
        self.bus_assignment_id
    }

    #[must_use]
    pub const fn route_id(&self) -> RouteId {
        self.route_id
    }

    #[must_use]
    pub const fn schedule_id(&self) -> ScheduleId {
        self.schedule_id
    }

    #[must_use]
    pub const fn booking_count(&self) -> u32 {
        self.booking_count
    }

    #[must_use]
    pub const fn key(&self) -> TripKey {
        TripKey {
            bus_assignment_id: self.bus_assignment_id,
            route_id: self.route_id,
            schedule_id: self.schedule_id,
        }
    }

    /// Seats still free given the capacity of this trip's bus assignment.
    #[must_use]
    pub const fn available_seats(&self, capacity: u32) -> u32 {
        capacity.saturating_sub(self.booking_count)
    }

    /// Share of seats taken, as a percentage rounded to two decimals.
    ///
    /// A zero-capacity bus reports 0.
    #[must_use]
    pub fn filled_percentage(&self, capacity: u32) -> f64 {
        if capacity == 0 {
            return 0.0;
        }
        let ratio: f64 = f64::from(self.booking_count) / f64::from(capacity) * 100.0;
        (ratio * 100.0).round() / 100.0
    }
}

/// Where one side of a ticket boards or alights.
///
/// When present on a ticket, `(bus_assignment_id, route_id, schedule_id)`
/// must name an existing trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideAssignment {
    pub route_id: RouteId,
    pub stop_id: StopId,
    pub schedule_id: ScheduleId,
    pub bus_assignment_id: BusAssignmentId,
}

impl SideAssignment {
    /// The trip this side occupies a seat on.
    #[must_use]
    pub const fn trip_key(&self) -> TripKey {
        TripKey {
            bus_assignment_id: self.bus_assignment_id,
            route_id: self.route_id,
            schedule_id: self.schedule_id,
        }
    }
}

/// A passenger ticket carrying independent pickup and drop assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Ticket {
    ticket_id: TicketId,
    registration_id: RegistrationId,
    code: String,
    pickup: Option<SideAssignment>,
    drop: Option<SideAssignment>,
}

impl Ticket {
    /// Creates a new `Ticket`.
    #[must_use]
    pub const fn new(
        ticket_id: TicketId,
        registration_id: RegistrationId,
        code: String,
        pickup: Option<SideAssignment>,
        drop: Option<SideAssignment>,
    ) -> Self {
        Self {
            ticket_id,
            registration_id,
            code,
            pickup,
            drop,
        }
    }

    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub const fn pickup(&self) -> Option<&SideAssignment> {
        self.pickup.as_ref()
    }

    #[must_use]
    pub const fn drop_assignment(&self) -> Option<&SideAssignment> {
        self.drop.as_ref()
    }

    /// Returns the assignment for one side.
    #[must_use]
    pub const fn side(&self, side: TicketSide) -> Option<&SideAssignment> {
        match side {
            TicketSide::Pickup => self.pickup.as_ref(),
            TicketSide::Drop => self.drop.as_ref(),
        }
    }

    /// Iterates the present sides, pickup first.
    pub fn sides(&self) -> impl Iterator<Item = (TicketSide, &SideAssignment)> {
        TicketSide::ALL
            .into_iter()
            .filter_map(|side| self.side(side).map(|assignment| (side, assignment)))
    }

    /// Returns `None` for a ticket with no sides at all.
    #[must_use]
    pub const fn kind(&self) -> Option<TicketKind> {
        match (&self.pickup, &self.drop) {
            (Some(_), Some(_)) => Some(TicketKind::TwoWay),
            (Some(_), None) => Some(TicketKind::OneWay(TicketSide::Pickup)),
            (None, Some(_)) => Some(TicketKind::OneWay(TicketSide::Drop)),
            (None, None) => None,
        }
    }

    /// The sides whose stop is `stop_id`.
    #[must_use]
    pub fn sides_at_stop(&self, stop_id: StopId) -> Vec<TicketSide> {
        self.sides()
            .filter(|(_, assignment)| assignment.stop_id == stop_id)
            .map(|(side, _)| side)
            .collect()
    }
}
