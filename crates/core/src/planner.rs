// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use fleetdesk_domain::{SideAssignment, Ticket, TicketSide, Trip, TripId, TripKey};

use crate::context::{TransferContext, ensure_distinct_route};
use crate::error::CoreError;
use crate::ledger::CapacityLedger;
use crate::plan::{SideMove, TransferPlan};
use crate::resolver::resolve;

/// Builds the full reassignment plan for moving a stop to another route.
///
/// Only the sides of a ticket that sit at the stop are planned. The other
/// side of a two-way ticket is never touched, even when it is on the same
/// source route. Tickets are processed in id order against one working
/// ledger, so every tentative seat in the batch counts against the next.
///
/// A side whose current assignment names no existing trip is still moved,
/// but releases nothing.
///
/// # Arguments
///
/// * `ctx` - The state read for this transfer
///
/// # Errors
///
/// Returns an error if:
/// - The destination is the stop's current route
/// - Any entity belongs to another registration
/// - Any side cannot be placed on the destination route; no partial plan
///   is ever returned
pub fn plan_transfer(ctx: &TransferContext) -> Result<TransferPlan, CoreError> {
    ensure_distinct_route(&ctx.stop, ctx.destination_route.route_id())?;
    ctx.ensure_scoped()?;

    let mut ledger: CapacityLedger = CapacityLedger::from_trips(&ctx.trips, &ctx.bus_assignments)?;
    let by_key: HashMap<TripKey, TripId> =
        ctx.trips.iter().map(|t| (t.key(), t.trip_id())).collect();

    let mut tickets: Vec<&Ticket> = ctx.tickets.iter().collect();
    tickets.sort_by_key(|t| t.ticket_id());

    let mut moves: Vec<SideMove> = Vec::new();
    for ticket in tickets {
        for side in ticket.sides_at_stop(ctx.stop.stop_id()) {
            let Some(assignment) = ticket.side(side) else {
                continue;
            };
            moves.push(plan_side(ctx, &mut ledger, &by_key, ticket, side, assignment)?);
        }
    }

    Ok(TransferPlan {
        registration_id: ctx.registration_id,
        stop_id: ctx.stop.stop_id(),
        stop_name: ctx.stop.name().to_string(),
        source_route_id: ctx.source_route.route_id(),
        source_route_name: ctx.source_route.name().to_string(),
        destination_route_id: ctx.destination_route.route_id(),
        destination_route_name: ctx.destination_route.name().to_string(),
        moves,
    })
}

fn plan_side(
    ctx: &TransferContext,
    ledger: &mut CapacityLedger,
    by_key: &HashMap<TripKey, TripId>,
    ticket: &Ticket,
    side: TicketSide,
    assignment: &SideAssignment,
) -> Result<SideMove, CoreError> {
    let old_trip: Option<TripId> = by_key.get(&assignment.trip_key()).copied();
    if let Some(old) = old_trip {
        ledger.release(old)?;
    }

    let destination: &Trip = resolve(
        ticket,
        side,
        assignment,
        ctx.destination_route.route_id(),
        &ctx.trips,
        ledger,
    )?;
    ledger.reserve(destination.trip_id())?;

    Ok(SideMove {
        ticket_id: ticket.ticket_id(),
        ticket_code: ticket.code().to_string(),
        side,
        schedule_id: assignment.schedule_id,
        old_assignment: *assignment,
        old_trip,
        new_trip: destination.trip_id(),
        new_assignment: SideAssignment {
            route_id: destination.route_id(),
            stop_id: assignment.stop_id,
            schedule_id: assignment.schedule_id,
            bus_assignment_id: destination.bus_assignment_id(),
        },
    })
}
