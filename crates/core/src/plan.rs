// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::{
    BusAssignmentId, RegistrationId, RouteId, ScheduleId, SideAssignment, StopId, TicketId,
    TicketSide, Trip, TripId, TripKey,
};

use crate::context::TransferContext;
use crate::error::CoreError;
use crate::ledger::CapacityLedger;

/// One ticket side moving from its old trip to a trip on the new route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideMove {
    pub ticket_id: TicketId,
    pub ticket_code: String,
    pub side: TicketSide,
    /// Preserved across the move.
    pub schedule_id: ScheduleId,
    pub old_assignment: SideAssignment,
    /// `None` when the old assignment named no existing trip.
    pub old_trip: Option<TripId>,
    pub new_trip: TripId,
    pub new_assignment: SideAssignment,
}

/// A complete reassignment plan for one stop transfer.
///
/// Built before any mutation. Either every move in it is applied or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub registration_id: RegistrationId,
    pub stop_id: StopId,
    pub stop_name: String,
    pub source_route_id: RouteId,
    pub source_route_name: String,
    pub destination_route_id: RouteId,
    pub destination_route_name: String,
    /// Ordered by ticket id, pickup before drop.
    pub moves: Vec<SideMove>,
}

impl TransferPlan {
    /// Number of distinct tickets with at least one moving side.
    #[must_use]
    pub fn moved_ticket_count(&self) -> usize {
        self.ticket_ids().len()
    }

    #[must_use]
    pub fn ticket_ids(&self) -> BTreeSet<TicketId> {
        self.moves.iter().map(|m| m.ticket_id).collect()
    }

    /// Net seat change per trip: minus one per side leaving, plus one per
    /// side arriving.
    #[must_use]
    pub fn trip_deltas(&self) -> BTreeMap<TripId, i64> {
        let mut deltas: BTreeMap<TripId, i64> = BTreeMap::new();
        for m in &self.moves {
            if let Some(old) = m.old_trip {
                *deltas.entry(old).or_insert(0) -= 1;
            }
            *deltas.entry(m.new_trip).or_insert(0) += 1;
        }
        deltas.retain(|_, delta| *delta != 0);
        deltas
    }

    /// Every trip whose counter the plan changes, in id order.
    ///
    /// This is the lock order for the executing transaction.
    #[must_use]
    pub fn touched_trips(&self) -> Vec<TripId> {
        let mut ids: BTreeSet<TripId> = BTreeSet::new();
        for m in &self.moves {
            if let Some(old) = m.old_trip {
                ids.insert(old);
            }
            ids.insert(m.new_trip);
        }
        ids.into_iter().collect()
    }

    /// Every bus assignment whose trips the plan changes, in id order.
    #[must_use]
    pub fn touched_bus_assignments(&self) -> Vec<BusAssignmentId> {
        let mut ids: BTreeSet<BusAssignmentId> = BTreeSet::new();
        for m in &self.moves {
            if m.old_trip.is_some() {
                ids.insert(m.old_assignment.bus_assignment_id);
            }
            ids.insert(m.new_assignment.bus_assignment_id);
        }
        ids.into_iter().collect()
    }

    /// Re-checks the plan against freshly read state and returns the
    /// ledger with every move applied.
    ///
    /// This is the authoritative capacity check. It must run against state
    /// read under the executing transaction's locks.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A move leaves its stop or schedule, or lands off the destination
    ///   route (`MalformedPlan`)
    /// - The stop has left the source route
    /// - The set of ticket sides at the stop, or their assignments, changed
    /// - An old or new trip no longer matches what was planned
    /// - The committed counts no longer leave room for the moves
    pub fn revalidate(&self, fresh: &TransferContext) -> Result<CapacityLedger, CoreError> {
        if fresh.stop.stop_id() != self.stop_id {
            return Err(CoreError::PlanOutdated(format!(
                "expected stop {}, found {}",
                self.stop_id,
                fresh.stop.stop_id()
            )));
        }
        if fresh.stop.route_id() != self.source_route_id {
            return Err(CoreError::PlanOutdated(format!(
                "stop {} is now on route {}",
                self.stop_id,
                fresh.stop.route_id()
            )));
        }

        let planned: BTreeMap<(TicketId, TicketSide), &SideAssignment> = self
            .moves
            .iter()
            .map(|m| ((m.ticket_id, m.side), &m.old_assignment))
            .collect();
        let stop_id: StopId = self.stop_id;
        let current: BTreeMap<(TicketId, TicketSide), &SideAssignment> = fresh
            .tickets
            .iter()
            .flat_map(|t| {
                t.sides()
                    .filter(move |(_, a)| a.stop_id == stop_id)
                    .map(move |(side, a)| ((t.ticket_id(), side), a))
            })
            .collect();
        if planned != current {
            return Err(CoreError::PlanOutdated(format!(
                "tickets at stop {} changed since planning",
                self.stop_id
            )));
        }

        let by_key: HashMap<TripKey, &Trip> = fresh.trips.iter().map(|t| (t.key(), t)).collect();
        let by_id: HashMap<TripId, &Trip> = fresh.trips.iter().map(|t| (t.trip_id(), t)).collect();

        for m in &self.moves {
            self.check_move_shape(m)?;
            let old_now: Option<TripId> = by_key
                .get(&m.old_assignment.trip_key())
                .map(|t| t.trip_id());
            if old_now != m.old_trip {
                return Err(CoreError::PlanOutdated(format!(
                    "trip for the {} of ticket {} changed",
                    m.side, m.ticket_code
                )));
            }
            let still_valid: bool = by_id
                .get(&m.new_trip)
                .is_some_and(|t| t.key() == m.new_assignment.trip_key());
            if !still_valid {
                return Err(CoreError::PlanOutdated(format!(
                    "destination trip {} no longer exists",
                    m.new_trip
                )));
            }
        }

        let mut ledger: CapacityLedger =
            CapacityLedger::from_trips(&fresh.trips, &fresh.bus_assignments)?;
        for old in self.moves.iter().filter_map(|m| m.old_trip) {
            ledger.release(old)?;
        }
        for m in &self.moves {
            ledger.reserve(m.new_trip)?;
        }
        Ok(ledger)
    }

    /// A move only changes the route and bus of its side.
    fn check_move_shape(&self, m: &SideMove) -> Result<(), CoreError> {
        let new: &SideAssignment = &m.new_assignment;
        let reason: Option<String> = if new.route_id != self.destination_route_id {
            Some(format!(
                "{} of ticket {} lands on route {}, not {}",
                m.side, m.ticket_code, new.route_id, self.destination_route_id
            ))
        } else if new.schedule_id != m.old_assignment.schedule_id
            || m.schedule_id != m.old_assignment.schedule_id
        {
            Some(format!(
                "{} of ticket {} changes schedule {} to {}",
                m.side, m.ticket_code, m.old_assignment.schedule_id, new.schedule_id
            ))
        } else if new.stop_id != self.stop_id {
            Some(format!(
                "{} of ticket {} is not at stop {}",
                m.side, m.ticket_code, self.stop_id
            ))
        } else {
            None
        };
        reason.map_or(Ok(()), |r| Err(CoreError::MalformedPlan(r)))
    }

    /// Builds the audit event recording this transfer.
    #[must_use]
    pub fn audit_event(&self, actor: Actor, cause: Cause) -> AuditEvent {
        let before: StateSnapshot = StateSnapshot::new(format!(
            "stop_id={},route_id={}",
            self.stop_id, self.source_route_id
        ));
        let after: StateSnapshot = StateSnapshot::new(format!(
            "stop_id={},route_id={},moved_tickets={}",
            self.stop_id,
            self.destination_route_id,
            self.moved_ticket_count()
        ));
        let action: Action = Action::new(
            String::from("TransferStop"),
            Some(format!(
                "Moved stop '{}' from route '{}' to route '{}' ({} tickets)",
                self.stop_name,
                self.source_route_name,
                self.destination_route_name,
                self.moved_ticket_count()
            )),
        );

        AuditEvent::new(self.registration_id, actor, cause, action, before, after)
    }
}
