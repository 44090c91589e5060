// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Counter effects of ticket creation and removal outside a transfer.
//!
//! The storage layer applies these inside the same transaction as the
//! ticket insert or delete.

use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::{
    BusAssignment, RegistrationId, Schedule, SideAssignment, Stop, Ticket, TicketSide, Trip,
    TripId, validate_side_schedule, validate_stop_on_route, validate_ticket_sides,
};

use crate::context::ensure_registration;
use crate::error::CoreError;
use crate::ledger::CapacityLedger;

/// A ticket that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub registration_id: RegistrationId,
    pub code: String,
    pub pickup: Option<SideAssignment>,
    pub drop: Option<SideAssignment>,
}

impl NewTicket {
    /// Iterates the present sides, pickup first.
    pub fn sides(&self) -> impl Iterator<Item = (TicketSide, &SideAssignment)> {
        [
            (TicketSide::Pickup, self.pickup.as_ref()),
            (TicketSide::Drop, self.drop.as_ref()),
        ]
        .into_iter()
        .filter_map(|(side, a)| a.map(|a| (side, a)))
    }
}

/// What the storage layer found for one side of a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSide {
    pub side: TicketSide,
    pub assignment: SideAssignment,
    pub stop: Stop,
    pub schedule: Schedule,
    /// The trip named by the assignment, if one exists.
    pub trip: Option<Trip>,
    /// The trip's bus assignment, if the trip exists.
    pub bus_assignment: Option<BusAssignment>,
}

/// One seat to take or give back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAdjustment {
    pub side: TicketSide,
    pub trip_id: TripId,
}

/// Validates a new ticket and returns one increment per side.
///
/// # Errors
///
/// Returns an error if:
/// - The ticket has no sides, or a side's schedule, stop, or registration
///   is inconsistent
/// - A side names no existing trip
/// - A side's trip is full
pub fn plan_booking(
    ticket: &NewTicket,
    sides: &[BookingSide],
) -> Result<Vec<CounterAdjustment>, CoreError> {
    validate_ticket_sides(ticket.pickup.as_ref(), ticket.drop.as_ref())?;

    let mut ledger: CapacityLedger = CapacityLedger::default();
    for found in sides {
        ensure_registration(
            "Stop",
            found.stop.stop_id().value(),
            ticket.registration_id,
            found.stop.registration_id(),
        )?;
        ensure_registration(
            "Schedule",
            found.schedule.schedule_id().value(),
            ticket.registration_id,
            found.schedule.registration_id(),
        )?;
        validate_side_schedule(found.side, &found.schedule)?;
        validate_stop_on_route(&found.assignment, found.stop.route_id())?;

        if let (Some(trip), Some(bus)) = (&found.trip, &found.bus_assignment)
            && !ledger.is_tracked(trip.trip_id())
        {
            ledger.track(trip, bus.capacity());
        }
    }

    let mut adjustments: Vec<CounterAdjustment> = Vec::new();
    for found in sides {
        let Some(trip) = &found.trip else {
            return Err(CoreError::NoMatchingTrip {
                ticket_code: ticket.code.clone(),
                side: found.side,
                schedule_id: found.assignment.schedule_id,
                route_id: found.assignment.route_id,
            });
        };
        if !ledger.has_room(trip.trip_id()) {
            return Err(CoreError::NoCapacityAvailable {
                ticket_code: ticket.code.clone(),
                side: found.side,
                schedule_id: found.assignment.schedule_id,
                route_id: found.assignment.route_id,
            });
        }
        ledger.reserve(trip.trip_id())?;
        adjustments.push(CounterAdjustment {
            side: found.side,
            trip_id: trip.trip_id(),
        });
    }
    Ok(adjustments)
}

/// Returns one decrement per present side of a removed ticket.
///
/// Two sides on different trips yield two decrements. A side whose trip no
/// longer exists yields nothing.
#[must_use]
pub fn removal_decrements(ticket: &Ticket, trips: &[Trip]) -> Vec<CounterAdjustment> {
    ticket
        .sides()
        .filter_map(|(side, assignment)| {
            trips
                .iter()
                .find(|t| t.key() == assignment.trip_key())
                .map(|t| CounterAdjustment {
                    side,
                    trip_id: t.trip_id(),
                })
        })
        .collect()
}

/// Builds the audit event recording a ticket removal.
#[must_use]
pub fn removal_audit_event(
    ticket: &Ticket,
    released: &[CounterAdjustment],
    actor: Actor,
    cause: Cause,
) -> AuditEvent {
    let sides: Vec<String> = ticket
        .sides()
        .map(|(side, a)| format!("{side}@stop={},route={}", a.stop_id, a.route_id))
        .collect();
    let before: StateSnapshot = StateSnapshot::new(format!(
        "ticket_id={},code={},sides=[{}]",
        ticket.ticket_id(),
        ticket.code(),
        sides.join(";")
    ));
    let after: StateSnapshot = StateSnapshot::new(format!(
        "ticket_id={},removed,released_seats={}",
        ticket.ticket_id(),
        released.len()
    ));
    let action: Action = Action::new(
        String::from("RemoveTicket"),
        Some(format!(
            "Removed ticket '{}' ({} seats released)",
            ticket.code(),
            released.len()
        )),
    );

    AuditEvent::new(ticket.registration_id(), actor, cause, action, before, after)
}
