// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stop transfer: load, plan, and apply in one write transaction.
//!
//! Planning runs against a read snapshot and may be shown to an operator
//! before anything is written. Execution takes the row locks, re-reads
//! everything the plan depends on, and revalidates the plan against that
//! state before the first write. Only the revalidated ledger decides the
//! new counters.

use fleetdesk::{
    CapacityLedger, CoreError, TransferContext, TransferPlan, TransferRequest,
    ensure_distinct_route, ensure_registration, plan_transfer as build_plan,
};
use fleetdesk_audit::{Actor, AuditEvent, Cause};
use fleetdesk_domain::{BusAssignment, BusAssignmentId, Route, Stop, Ticket, Trip, TripId};
use tracing::{debug, info, warn};

use crate::error::OperationError;
use crate::operations::{lock_order, refresh_bus_assignments};
use crate::store::LedgerStore;

/// What a committed transfer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Distinct tickets with at least one side moved.
    pub moved_ticket_count: usize,
    /// Stops left on the source route after the move.
    pub source_route_stop_count: usize,
    /// Stops on the destination route after the move.
    pub destination_route_stop_count: usize,
    /// `None` when the audit event could not be stored. The transfer
    /// itself is committed either way.
    pub audit_event_id: Option<i64>,
}

/// Reads everything the planner needs for one transfer.
///
/// The same-route check runs on the stop before any other lookup.
///
/// # Errors
///
/// Returns an error if the stop or a route does not exist, the stop is
/// already on the destination route or belongs to another registration,
/// or a read fails.
pub fn load_transfer_context<C: LedgerStore>(
    conn: &mut C,
    request: TransferRequest,
) -> Result<TransferContext, OperationError> {
    let stop: Stop = conn
        .find_stop(request.stop_id)?
        .ok_or(CoreError::StopNotFound(request.stop_id))?;
    ensure_distinct_route(&stop, request.destination_route_id)?;
    ensure_registration(
        "Stop",
        stop.stop_id().value(),
        request.registration_id,
        stop.registration_id(),
    )?;

    let destination_route: Route = conn
        .find_route(request.destination_route_id)?
        .ok_or(CoreError::RouteNotFound(request.destination_route_id))?;
    let source_route: Route = conn
        .find_route(stop.route_id())?
        .ok_or_else(|| CoreError::RouteNotFound(stop.route_id()))?;

    let tickets: Vec<Ticket> = conn.list_tickets_at_stop(stop.stop_id())?;

    // Destination candidates plus every trip a moving side sits on now.
    let mut trips: Vec<Trip> = conn.list_trips_on_route(request.destination_route_id)?;
    for ticket in &tickets {
        for side in ticket.sides_at_stop(stop.stop_id()) {
            let Some(assignment) = ticket.side(side) else {
                continue;
            };
            let key = assignment.trip_key();
            if trips.iter().any(|t| t.key() == key) {
                continue;
            }
            if let Some(trip) = conn.find_trip(key)? {
                trips.push(trip);
            }
        }
    }

    let bus_ids: Vec<BusAssignmentId> = lock_order(trips.iter().map(Trip::bus_assignment_id));
    let bus_assignments: Vec<BusAssignment> = conn.list_bus_assignments_by_id(&bus_ids)?;

    debug!(
        stop_id = %stop.stop_id(),
        tickets = tickets.len(),
        trips = trips.len(),
        bus_assignments = bus_assignments.len(),
        "Loaded transfer context"
    );

    Ok(TransferContext {
        registration_id: request.registration_id,
        stop,
        source_route,
        destination_route,
        tickets,
        trips,
        bus_assignments,
    })
}

/// Builds a transfer plan without writing anything.
///
/// # Errors
///
/// Returns an error if the request is invalid, some side cannot be placed
/// on the destination route, or a read fails.
pub fn plan_transfer<C: LedgerStore>(
    conn: &mut C,
    request: TransferRequest,
) -> Result<TransferPlan, OperationError> {
    conn.transaction::<_, OperationError, _>(|c| {
        let ctx: TransferContext = load_transfer_context(c, request)?;
        Ok(build_plan(&ctx)?)
    })
}

/// Applies a plan atomically, then records its audit event.
///
/// Lock order is the stop, then the touched bus assignments, then the
/// touched trips, each by id. The plan is revalidated against state read
/// after the locks; if anything it relied on has changed, nothing is
/// written.
///
/// The audit event is stored after commit. Failing to store it is logged
/// and does not undo the transfer.
///
/// # Errors
///
/// Returns an error if:
/// - The stop has moved or the tickets at it changed since planning
/// - Committed counts no longer leave room for the plan
/// - A write fails; the transaction is rolled back
pub fn execute_transfer<C: LedgerStore>(
    conn: &mut C,
    plan: &TransferPlan,
    actor: Actor,
    cause: Cause,
) -> Result<TransferOutcome, OperationError> {
    let request: TransferRequest = TransferRequest::new(
        plan.registration_id,
        plan.stop_id,
        plan.destination_route_id,
    );
    let touched_trips: Vec<TripId> = plan.touched_trips();
    let touched_buses: Vec<BusAssignmentId> = plan.touched_bus_assignments();

    let (source_route_stop_count, destination_route_stop_count) = conn
        .write_transaction::<_, OperationError, _>(|c| {
            c.lock_stops(&[plan.stop_id])?;
            c.lock_bus_assignments(&touched_buses)?;
            c.lock_trips(&touched_trips)?;

            let stop: Stop = c
                .find_stop(plan.stop_id)?
                .ok_or(CoreError::StopNotFound(plan.stop_id))?;
            if stop.route_id() != plan.source_route_id {
                return Err(CoreError::PlanOutdated(format!(
                    "stop {} is now on route {}",
                    plan.stop_id,
                    stop.route_id()
                ))
                .into());
            }

            let fresh: TransferContext = load_transfer_context(c, request)?;
            let ledger: CapacityLedger = plan.revalidate(&fresh)?;

            c.set_stop_route(plan.stop_id, plan.destination_route_id)?;
            for m in &plan.moves {
                c.set_ticket_side(m.ticket_id, m.side, &m.new_assignment)?;
            }
            for (trip_id, booking_count) in ledger.changed_counts() {
                c.set_trip_booking_count(trip_id, booking_count)?;
            }
            refresh_bus_assignments(c, &touched_buses)?;

            Ok((
                c.count_stops_on_route(plan.source_route_id)?,
                c.count_stops_on_route(plan.destination_route_id)?,
            ))
        })?;

    info!(
        stop_id = %plan.stop_id,
        source_route_id = %plan.source_route_id,
        destination_route_id = %plan.destination_route_id,
        moved_tickets = plan.moved_ticket_count(),
        moved_sides = plan.moves.len(),
        "Transferred stop"
    );

    let event: AuditEvent = plan.audit_event(actor, cause);
    let audit_event_id: Option<i64> = match conn.persist_audit_event(&event) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(stop_id = %plan.stop_id, error = %e, "Failed to record transfer audit event");
            None
        }
    };

    Ok(TransferOutcome {
        moved_ticket_count: plan.moved_ticket_count(),
        source_route_stop_count,
        destination_route_stop_count,
        audit_event_id,
    })
}

/// Plans and executes a stop transfer.
///
/// # Errors
///
/// Returns whatever `plan_transfer` or `execute_transfer` returns.
pub fn transfer_stop<C: LedgerStore>(
    conn: &mut C,
    request: TransferRequest,
    actor: Actor,
    cause: Cause,
) -> Result<TransferOutcome, OperationError> {
    let plan: TransferPlan = plan_transfer(conn, request)?;
    execute_transfer(conn, &plan, actor, cause)
}
