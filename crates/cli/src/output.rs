// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON shapes printed by the command line.

use fleetdesk::{SideMove, TransferPlan};
use fleetdesk_audit::AuditEvent;
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, Registration, RegistrationId, Route, RouteId, Schedule,
    ScheduleId, Stop, StopId, Ticket, TicketId, TicketSide, Trip, TripId,
};
use fleetdesk_persistence::{OperationError, ReconcileReport, TransferOutcome};
use serde::Serialize;

/// Everything a command can print on success.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Registration(Registration),
    Route(Route),
    Stop(Stop),
    Schedule(Schedule),
    BusAssignment(BusAssignment),
    Trip(Trip),
    Ticket(Ticket),
    Preview(TransferPreviewResponse),
    Transfer(TransferResponse),
    Verify(VerifyResponse),
    Reconcile(ReconcileResponse),
    Trips(TripsResponse),
    Audit(AuditResponse),
}

#[derive(Debug, Clone, Serialize)]
pub struct SideMoveResponse {
    pub ticket_id: TicketId,
    pub ticket_code: String,
    pub side: TicketSide,
    pub schedule_id: ScheduleId,
    /// `None` when the side's old trip no longer exists.
    pub old_trip_id: Option<TripId>,
    pub new_trip_id: TripId,
    pub new_bus_assignment_id: BusAssignmentId,
}

impl From<&SideMove> for SideMoveResponse {
    fn from(m: &SideMove) -> Self {
        Self {
            ticket_id: m.ticket_id,
            ticket_code: m.ticket_code.clone(),
            side: m.side,
            schedule_id: m.schedule_id,
            old_trip_id: m.old_trip,
            new_trip_id: m.new_trip,
            new_bus_assignment_id: m.new_assignment.bus_assignment_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferPreviewResponse {
    pub stop_id: StopId,
    pub stop_name: String,
    pub source_route_id: RouteId,
    pub source_route_name: String,
    pub destination_route_id: RouteId,
    pub destination_route_name: String,
    pub moved_ticket_count: usize,
    pub moves: Vec<SideMoveResponse>,
}

impl From<&TransferPlan> for TransferPreviewResponse {
    fn from(plan: &TransferPlan) -> Self {
        Self {
            stop_id: plan.stop_id,
            stop_name: plan.stop_name.clone(),
            source_route_id: plan.source_route_id,
            source_route_name: plan.source_route_name.clone(),
            destination_route_id: plan.destination_route_id,
            destination_route_name: plan.destination_route_name.clone(),
            moved_ticket_count: plan.moved_ticket_count(),
            moves: plan.moves.iter().map(SideMoveResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferResponse {
    pub moved_ticket_count: usize,
    pub source_route_stop_count: usize,
    pub destination_route_stop_count: usize,
    pub audit_event_id: Option<i64>,
}

impl From<TransferOutcome> for TransferResponse {
    fn from(outcome: TransferOutcome) -> Self {
        Self {
            moved_ticket_count: outcome.moved_ticket_count,
            source_route_stop_count: outcome.source_route_stop_count,
            destination_route_stop_count: outcome.destination_route_stop_count,
            audit_event_id: outcome.audit_event_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub registration_id: RegistrationId,
    pub consistent: bool,
    pub violations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    pub registration_id: RegistrationId,
    pub corrected_rows: usize,
    pub corrected_trips: Vec<TripId>,
    pub corrected_bus_assignments: Vec<BusAssignmentId>,
    /// Problems a recount cannot fix, such as sides with no trip.
    pub remaining: Vec<String>,
}

impl ReconcileResponse {
    pub fn new(registration_id: RegistrationId, report: &ReconcileReport) -> Self {
        Self {
            registration_id,
            corrected_rows: report.corrected_rows(),
            corrected_trips: report.corrected_trips.clone(),
            corrected_bus_assignments: report.corrected_bus_assignments.clone(),
            remaining: report.remaining.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TripOccupancyResponse {
    pub trip_id: TripId,
    pub bus_assignment_id: BusAssignmentId,
    pub route_id: RouteId,
    pub schedule_id: ScheduleId,
    pub booking_count: u32,
    pub capacity: u32,
    pub available_seats: u32,
    pub filled_percentage: f64,
}

impl TripOccupancyResponse {
    pub fn new(trip: &Trip, capacity: u32) -> Self {
        Self {
            trip_id: trip.trip_id(),
            bus_assignment_id: trip.bus_assignment_id(),
            route_id: trip.route_id(),
            schedule_id: trip.schedule_id(),
            booking_count: trip.booking_count(),
            capacity,
            available_seats: trip.available_seats(capacity),
            filled_percentage: trip.filled_percentage(capacity),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TripsResponse {
    pub registration_id: RegistrationId,
    pub trips: Vec<TripOccupancyResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEventResponse {
    pub event_id: Option<i64>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
}

impl From<AuditEvent> for AuditEventResponse {
    fn from(event: AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            cause_id: event.cause.id,
            cause_description: event.cause.description,
            action: event.action.name,
            details: event.action.details,
            before: event.before.data,
            after: event.after.data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditResponse {
    pub registration_id: RegistrationId,
    pub events: Vec<AuditEventResponse>,
}

/// Printed when a command fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub category: &'static str,
    pub error: String,
}

impl From<&OperationError> for ErrorResponse {
    fn from(err: &OperationError) -> Self {
        Self {
            category: err.failure_category().as_str(),
            error: err.to_string(),
        }
    }
}
