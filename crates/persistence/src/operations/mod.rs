// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine operations over a `LedgerStore`.
//!
//! These functions own the transaction boundaries. They read state, hand
//! it to the pure engine in `fleetdesk`, and write back what it decides.
//!
//! - `seed`: creation of the entities the engine reads
//! - `transfer`: stop transfer preview and execution
//! - `booking`: counter upkeep for ticket creation and removal
//! - `maintenance`: ledger verification and reconciliation

pub mod booking;
pub mod maintenance;
pub mod seed;
pub mod transfer;

use std::collections::BTreeSet;

use fleetdesk::CoreError;
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, DomainError, Trip, check_trip_capacity,
    derive_min_required_capacity,
};
use tracing::debug;

use crate::error::OperationError;
use crate::store::LedgerStore;

/// Collects ids into lock order.
pub fn lock_order<T: Ord + Copy>(ids: impl IntoIterator<Item = T>) -> Vec<T> {
    ids.into_iter().collect::<BTreeSet<T>>().into_iter().collect()
}

/// Re-derives `min_required_capacity` for each bus assignment from all of
/// its trips, and checks every trip still fits on its bus.
///
/// Runs at the end of every transaction that changes a trip counter, with
/// the bus assignments already locked.
///
/// # Errors
///
/// Returns `ConcurrentCapacityViolation` if a trip is over capacity, or a
/// storage error.
pub fn refresh_bus_assignments<C: LedgerStore>(
    conn: &mut C,
    ids: &[BusAssignmentId],
) -> Result<(), OperationError> {
    for id in ids {
        let bus: BusAssignment = conn.get_bus_assignment(*id)?;
        let trips: Vec<Trip> = conn.list_trips_for_bus_assignment(*id)?;

        for trip in &trips {
            match check_trip_capacity(trip, &bus) {
                Ok(()) => {}
                Err(DomainError::CapacityExceeded {
                    trip_id,
                    booking_count,
                    capacity,
                }) => {
                    return Err(CoreError::ConcurrentCapacityViolation {
                        trip_id,
                        capacity,
                        required: booking_count,
                    }
                    .into());
                }
                Err(err) => return Err(err.into()),
            }
        }

        let derived: u32 = derive_min_required_capacity(&trips);
        if derived != bus.min_required_capacity() {
            conn.set_min_required_capacity(*id, derived)?;
            debug!(
                bus_assignment_id = %id,
                previous = bus.min_required_capacity(),
                derived,
                "Refreshed minimum required capacity"
            );
        }
    }
    Ok(())
}
