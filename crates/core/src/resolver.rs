// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{RouteId, SideAssignment, Ticket, TicketSide, Trip};

use crate::error::CoreError;
use crate::ledger::CapacityLedger;

/// Finds the trip one side of a ticket should move to on another route.
///
/// Candidates are the trips on `destination_route` that run the side's
/// schedule. Among those with a free seat under the ledger's projection,
/// the least loaded wins; equal loads fall back to the lowest trip id so
/// the choice is deterministic. The ledger is only read.
///
/// # Errors
///
/// Returns an error if:
/// - No trip on the destination route runs the schedule
/// - Every such trip is full under the projection
pub fn resolve<'a>(
    ticket: &Ticket,
    side: TicketSide,
    assignment: &SideAssignment,
    destination_route: RouteId,
    trips: &'a [Trip],
    ledger: &CapacityLedger,
) -> Result<&'a Trip, CoreError> {
    let mut candidates: Vec<&Trip> = trips
        .iter()
        .filter(|t| t.route_id() == destination_route && t.schedule_id() == assignment.schedule_id)
        .collect();

    if candidates.is_empty() {
        return Err(CoreError::NoMatchingTrip {
            ticket_code: ticket.code().to_string(),
            side,
            schedule_id: assignment.schedule_id,
            route_id: destination_route,
        });
    }

    candidates.sort_by_key(|t| {
        (
            ledger.projected_count(t.trip_id()).unwrap_or(u32::MAX),
            t.trip_id(),
        )
    });

    candidates
        .into_iter()
        .find(|t| ledger.has_room(t.trip_id()))
        .ok_or_else(|| CoreError::NoCapacityAvailable {
            ticket_code: ticket.code().to_string(),
            side,
            schedule_id: assignment.schedule_id,
            route_id: destination_route,
        })
}
