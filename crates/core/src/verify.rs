// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeMap, HashMap};

use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, Ticket, TicketId, TicketSide, Trip, TripId, TripKey,
    derive_min_required_capacity,
};

/// Everything stored for one registration's seat ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub tickets: Vec<Ticket>,
    pub trips: Vec<Trip>,
    pub bus_assignments: Vec<BusAssignment>,
}

/// A broken ledger invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A ticket side names a (bus assignment, route, schedule) with no trip.
    MissingTrip {
        ticket_id: TicketId,
        side: TicketSide,
        key: TripKey,
    },
    /// A trip's stored count differs from the sides that reference it.
    CountDrift {
        trip_id: TripId,
        stored: u32,
        actual: u32,
    },
    /// A trip holds more bookings than its bus seats.
    OverCapacity {
        trip_id: TripId,
        booking_count: u32,
        capacity: u32,
    },
    /// A bus assignment's stored minimum differs from its trips' maximum.
    StaleMinCapacity {
        bus_assignment_id: BusAssignmentId,
        stored: u32,
        expected: u32,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTrip {
                ticket_id,
                side,
                key,
            } => write!(
                f,
                "Ticket {ticket_id} {side} references missing trip (bus assignment {}, route {}, schedule {})",
                key.bus_assignment_id, key.route_id, key.schedule_id
            ),
            Self::CountDrift {
                trip_id,
                stored,
                actual,
            } => write!(
                f,
                "Trip {trip_id} stores {stored} bookings but {actual} ticket sides reference it"
            ),
            Self::OverCapacity {
                trip_id,
                booking_count,
                capacity,
            } => write!(
                f,
                "Trip {trip_id} has {booking_count} bookings but capacity {capacity}"
            ),
            Self::StaleMinCapacity {
                bus_assignment_id,
                stored,
                expected,
            } => write!(
                f,
                "Bus assignment {bus_assignment_id} stores minimum capacity {stored}, expected {expected}"
            ),
        }
    }
}

/// Counts recomputed from tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recount {
    /// Actual booking count of every trip.
    pub trip_counts: BTreeMap<TripId, u32>,
    /// Minimum required capacity of every bus assignment under
    /// `trip_counts`.
    pub min_required_capacities: BTreeMap<BusAssignmentId, u32>,
    /// Ticket sides that name no trip.
    pub orphaned_sides: Vec<(TicketId, TicketSide, TripKey)>,
}

/// Recounts every trip from the ticket sides that reference it.
#[must_use]
pub fn recount(snapshot: &LedgerSnapshot) -> Recount {
    let by_key: HashMap<TripKey, TripId> = snapshot
        .trips
        .iter()
        .map(|t| (t.key(), t.trip_id()))
        .collect();

    let mut result: Recount = Recount {
        trip_counts: snapshot.trips.iter().map(|t| (t.trip_id(), 0)).collect(),
        ..Recount::default()
    };

    for ticket in &snapshot.tickets {
        for (side, assignment) in ticket.sides() {
            let key: TripKey = assignment.trip_key();
            match by_key.get(&key) {
                Some(trip_id) => {
                    *result.trip_counts.entry(*trip_id).or_insert(0) += 1;
                }
                None => result.orphaned_sides.push((ticket.ticket_id(), side, key)),
            }
        }
    }

    let recounted: Vec<Trip> = snapshot
        .trips
        .iter()
        .map(|t| {
            Trip::new(
                t.trip_id(),
                t.registration_id(),
                t.bus_assignment_id(),
                t.route_id(),
                t.schedule_id(),
                result.trip_counts.get(&t.trip_id()).copied().unwrap_or(0),
            )
        })
        .collect();
    result.min_required_capacities = snapshot
        .bus_assignments
        .iter()
        .map(|b| {
            let id: BusAssignmentId = b.bus_assignment_id();
            let trips = recounted.iter().filter(|t| t.bus_assignment_id() == id);
            (id, derive_min_required_capacity(trips))
        })
        .collect();

    result
}

/// Reports every violation of the ledger invariants in a snapshot.
///
/// Violations are ordered: missing trips, then per-trip problems in trip
/// order, then stale bus assignments in id order.
#[must_use]
pub fn verify_ledger(snapshot: &LedgerSnapshot) -> Vec<InvariantViolation> {
    let counted: Recount = recount(snapshot);
    let capacities: HashMap<BusAssignmentId, u32> = snapshot
        .bus_assignments
        .iter()
        .map(|b| (b.bus_assignment_id(), b.capacity()))
        .collect();

    let mut violations: Vec<InvariantViolation> = counted
        .orphaned_sides
        .iter()
        .map(|(ticket_id, side, key)| InvariantViolation::MissingTrip {
            ticket_id: *ticket_id,
            side: *side,
            key: *key,
        })
        .collect();

    let mut trips: Vec<&Trip> = snapshot.trips.iter().collect();
    trips.sort_by_key(|t| t.trip_id());
    for trip in trips {
        let actual: u32 = counted
            .trip_counts
            .get(&trip.trip_id())
            .copied()
            .unwrap_or(0);
        if actual != trip.booking_count() {
            violations.push(InvariantViolation::CountDrift {
                trip_id: trip.trip_id(),
                stored: trip.booking_count(),
                actual,
            });
        }
        if let Some(capacity) = capacities.get(&trip.bus_assignment_id())
            && trip.booking_count() > *capacity
        {
            violations.push(InvariantViolation::OverCapacity {
                trip_id: trip.trip_id(),
                booking_count: trip.booking_count(),
                capacity: *capacity,
            });
        }
    }

    let mut assignments: Vec<&BusAssignment> = snapshot.bus_assignments.iter().collect();
    assignments.sort_by_key(|b| b.bus_assignment_id());
    for bus in assignments {
        let expected: u32 = derive_min_required_capacity(
            snapshot
                .trips
                .iter()
                .filter(|t| t.bus_assignment_id() == bus.bus_assignment_id()),
        );
        if expected != bus.min_required_capacity() {
            violations.push(InvariantViolation::StaleMinCapacity {
                bus_assignment_id: bus.bus_assignment_id(),
                stored: bus.min_required_capacity(),
                expected,
            });
        }
    }

    violations
}
