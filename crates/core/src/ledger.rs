// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working view of trip seat counters.
//!
//! A ledger starts from the committed `booking_count` of every trip it
//! tracks and keeps a projected count alongside it. Planning reserves and
//! releases seats against the projection so that several tickets in one
//! batch see each other's effects before anything is written.

use std::collections::BTreeMap;

use fleetdesk_domain::{BusAssignment, BusAssignmentId, Trip, TripId};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TripSlot {
    bus_assignment_id: BusAssignmentId,
    capacity: u32,
    committed: u32,
    projected: u32,
}

/// Per-trip committed and projected seat counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityLedger {
    slots: BTreeMap<TripId, TripSlot>,
}

impl CapacityLedger {
    /// Builds a ledger tracking every given trip.
    ///
    /// # Errors
    ///
    /// Returns an error if a trip's bus assignment is not among
    /// `bus_assignments`.
    pub fn from_trips(trips: &[Trip], bus_assignments: &[BusAssignment]) -> Result<Self, CoreError> {
        let capacities: BTreeMap<BusAssignmentId, u32> = bus_assignments
            .iter()
            .map(|b| (b.bus_assignment_id(), b.capacity()))
            .collect();

        let mut ledger: Self = Self::default();
        for trip in trips {
            let capacity: u32 = *capacities
                .get(&trip.bus_assignment_id())
                .ok_or_else(|| CoreError::UnknownBusAssignment(trip.bus_assignment_id()))?;
            ledger.track(trip, capacity);
        }
        Ok(ledger)
    }

    /// Starts tracking a trip. Tracking a trip twice resets it.
    pub fn track(&mut self, trip: &Trip, capacity: u32) {
        self.slots.insert(
            trip.trip_id(),
            TripSlot {
                bus_assignment_id: trip.bus_assignment_id(),
                capacity,
                committed: trip.booking_count(),
                projected: trip.booking_count(),
            },
        );
    }

    #[must_use]
    pub fn is_tracked(&self, trip_id: TripId) -> bool {
        self.slots.contains_key(&trip_id)
    }

    #[must_use]
    pub fn committed_count(&self, trip_id: TripId) -> Option<u32> {
        self.slots.get(&trip_id).map(|s| s.committed)
    }

    /// The count after every reservation and release so far.
    #[must_use]
    pub fn projected_count(&self, trip_id: TripId) -> Option<u32> {
        self.slots.get(&trip_id).map(|s| s.projected)
    }

    #[must_use]
    pub fn capacity(&self, trip_id: TripId) -> Option<u32> {
        self.slots.get(&trip_id).map(|s| s.capacity)
    }

    #[must_use]
    pub fn bus_assignment(&self, trip_id: TripId) -> Option<BusAssignmentId> {
        self.slots.get(&trip_id).map(|s| s.bus_assignment_id)
    }

    /// Whether one more seat fits on the trip under the projection.
    #[must_use]
    pub fn has_room(&self, trip_id: TripId) -> bool {
        self.slots
            .get(&trip_id)
            .is_some_and(|s| s.projected < s.capacity)
    }

    /// Takes one seat on a trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip is not tracked, or if the seat would
    /// push the projection past the bus's capacity.
    pub fn reserve(&mut self, trip_id: TripId) -> Result<u32, CoreError> {
        let slot: &mut TripSlot = self
            .slots
            .get_mut(&trip_id)
            .ok_or(CoreError::UnknownTrip(trip_id))?;

        let required: u32 = slot.projected.saturating_add(1);
        if required > slot.capacity {
            return Err(CoreError::ConcurrentCapacityViolation {
                trip_id,
                capacity: slot.capacity,
                required,
            });
        }
        slot.projected = required;
        Ok(required)
    }

    /// Gives back one seat on a trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the trip is not tracked or its projection is
    /// already zero.
    pub fn release(&mut self, trip_id: TripId) -> Result<u32, CoreError> {
        let slot: &mut TripSlot = self
            .slots
            .get_mut(&trip_id)
            .ok_or(CoreError::UnknownTrip(trip_id))?;

        slot.projected = slot
            .projected
            .checked_sub(1)
            .ok_or(CoreError::CounterUnderflow(trip_id))?;
        Ok(slot.projected)
    }

    /// Net change per trip, omitting trips whose projection is unchanged.
    #[must_use]
    pub fn deltas(&self) -> BTreeMap<TripId, i64> {
        self.slots
            .iter()
            .filter(|(_, s)| s.projected != s.committed)
            .map(|(id, s)| (*id, i64::from(s.projected) - i64::from(s.committed)))
            .collect()
    }

    /// Projected counts of every trip whose projection differs from its
    /// committed count, in trip id order.
    #[must_use]
    pub fn changed_counts(&self) -> Vec<(TripId, u32)> {
        self.slots
            .iter()
            .filter(|(_, s)| s.projected != s.committed)
            .map(|(id, s)| (*id, s.projected))
            .collect()
    }
}
