// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Counter upkeep when tickets are booked or removed outside a transfer.
//!
//! The ticket write and its counter changes commit together. A booking
//! takes one seat per side; a removal gives one back per side, even when
//! both sides sit on the same trip.

use std::collections::BTreeMap;

use fleetdesk::{
    BookingSide, CoreError, CounterAdjustment, NewTicket, ensure_registration, plan_booking,
    removal_audit_event, removal_decrements,
};
use fleetdesk_audit::{Actor, AuditEvent, Cause};
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, RegistrationId, Schedule, Stop, StopId, Ticket, TicketId,
    Trip, TripId,
};
use tracing::{info, warn};

use crate::error::OperationError;
use crate::operations::{lock_order, refresh_bus_assignments};
use crate::store::LedgerStore;

/// Counts how many seats each trip gains or loses.
fn per_trip(adjustments: &[CounterAdjustment]) -> BTreeMap<TripId, u32> {
    let mut counts: BTreeMap<TripId, u32> = BTreeMap::new();
    for adjustment in adjustments {
        *counts.entry(adjustment.trip_id).or_insert(0) += 1;
    }
    counts
}

/// Stores a new ticket and takes one seat on each side's trip.
///
/// # Errors
///
/// Returns an error if:
/// - The ticket has no sides or a side is inconsistent with its stop,
///   schedule or registration
/// - A side names no existing trip (`NoMatchingTrip`)
/// - A side's trip is full (`NoCapacityAvailable`)
/// - A write fails; nothing is stored
pub fn book_ticket<C: LedgerStore>(
    conn: &mut C,
    ticket: &NewTicket,
) -> Result<Ticket, OperationError> {
    let stop_ids: Vec<StopId> = lock_order(ticket.sides().map(|(_, a)| a.stop_id));
    let bus_ids: Vec<BusAssignmentId> =
        lock_order(ticket.sides().map(|(_, a)| a.bus_assignment_id));

    let booked: Ticket = conn.write_transaction::<_, OperationError, _>(|c| {
        c.lock_stops(&stop_ids)?;
        c.lock_bus_assignments(&bus_ids)?;

        let mut found: Vec<BookingSide> = Vec::new();
        for (side, assignment) in ticket.sides() {
            let stop: Stop = c
                .find_stop(assignment.stop_id)?
                .ok_or(CoreError::StopNotFound(assignment.stop_id))?;
            let schedule: Schedule = c.get_schedule(assignment.schedule_id)?;
            let trip: Option<Trip> = c.find_trip(assignment.trip_key())?;
            let bus_assignment: Option<BusAssignment> = match &trip {
                Some(t) => Some(c.get_bus_assignment(t.bus_assignment_id())?),
                None => None,
            };
            found.push(BookingSide {
                side,
                assignment: *assignment,
                stop,
                schedule,
                trip,
                bus_assignment,
            });
        }

        let adjustments: Vec<CounterAdjustment> = plan_booking(ticket, &found)?;
        let seats: BTreeMap<TripId, u32> = per_trip(&adjustments);
        c.lock_trips(&seats.keys().copied().collect::<Vec<TripId>>())?;

        let ticket_id: TicketId = c.insert_ticket(ticket)?;
        for (trip_id, taken) in &seats {
            let current: u32 = found
                .iter()
                .filter_map(|f| f.trip.as_ref())
                .find(|t| t.trip_id() == *trip_id)
                .map(Trip::booking_count)
                .ok_or(CoreError::UnknownTrip(*trip_id))?;
            c.set_trip_booking_count(*trip_id, current + taken)?;
        }
        refresh_bus_assignments(c, &bus_ids)?;

        Ok(Ticket::new(
            ticket_id,
            ticket.registration_id,
            ticket.code.clone(),
            ticket.pickup,
            ticket.drop,
        ))
    })?;

    info!(
        ticket_id = %booked.ticket_id(),
        code = booked.code(),
        sides = booked.sides().count(),
        "Booked ticket"
    );
    Ok(booked)
}

/// Deletes a ticket and gives back one seat per side.
///
/// This is also the termination flow for a ticket. There is no soft
/// terminated state: the row is removed permanently, and each side's
/// decrement is clamped at zero exactly as a termination would be.
///
/// A side whose trip no longer exists gives nothing back. A counter that
/// would drop below zero is held at zero and logged. The audit event is
/// stored after commit on a best-effort basis.
///
/// # Errors
///
/// Returns an error if the ticket does not exist, belongs to another
/// registration, changes while being removed, or a write fails.
pub fn remove_ticket<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
    ticket_id: TicketId,
    actor: Actor,
    cause: Cause,
) -> Result<Ticket, OperationError> {
    let seen: Ticket = conn
        .find_ticket(ticket_id)?
        .ok_or(CoreError::TicketNotFound(ticket_id))?;
    ensure_registration(
        "Ticket",
        ticket_id.value(),
        registration_id,
        seen.registration_id(),
    )?;
    let stop_ids: Vec<StopId> = lock_order(seen.sides().map(|(_, a)| a.stop_id));
    let bus_ids: Vec<BusAssignmentId> = lock_order(seen.sides().map(|(_, a)| a.bus_assignment_id));

    let released: Vec<CounterAdjustment> = conn.write_transaction::<_, OperationError, _>(|c| {
        c.lock_stops(&stop_ids)?;
        c.lock_bus_assignments(&bus_ids)?;

        let current: Ticket = c
            .find_ticket(ticket_id)?
            .ok_or(CoreError::TicketNotFound(ticket_id))?;
        if current != seen {
            return Err(CoreError::PlanOutdated(format!(
                "ticket {} changed while being removed",
                current.code()
            ))
            .into());
        }

        let mut trips: Vec<Trip> = Vec::new();
        for (_, assignment) in current.sides() {
            if let Some(trip) = c.find_trip(assignment.trip_key())? {
                trips.push(trip);
            }
        }
        let decrements: Vec<CounterAdjustment> = removal_decrements(&current, &trips);
        let seats: BTreeMap<TripId, u32> = per_trip(&decrements);
        c.lock_trips(&seats.keys().copied().collect::<Vec<TripId>>())?;

        c.delete_ticket(ticket_id)?;
        for (trip_id, given_back) in &seats {
            let stored: u32 = trips
                .iter()
                .find(|t| t.trip_id() == *trip_id)
                .map(Trip::booking_count)
                .ok_or(CoreError::UnknownTrip(*trip_id))?;
            if stored < *given_back {
                warn!(
                    trip_id = %trip_id,
                    stored,
                    released = given_back,
                    "Booking count would drop below zero; holding at zero"
                );
            }
            c.set_trip_booking_count(*trip_id, stored.saturating_sub(*given_back))?;
        }
        refresh_bus_assignments(c, &bus_ids)?;
        Ok(decrements)
    })?;

    info!(
        ticket_id = %ticket_id,
        code = seen.code(),
        released_seats = released.len(),
        actor = %actor.id,
        "Removed ticket"
    );

    let event: AuditEvent = removal_audit_event(&seen, &released, actor, cause);
    if let Err(e) = conn.persist_audit_event(&event) {
        warn!(ticket_id = %ticket_id, error = %e, "Failed to record ticket removal audit event");
    }
    Ok(seen)
}
