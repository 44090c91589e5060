// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger verification and reconciliation.
//!
//! Counters are derived data: a trip's `booking_count` is the number of
//! ticket sides on it, and a bus assignment's `min_required_capacity` is
//! the largest count among its trips. These operations compare the stored
//! values with a recount, and optionally write the recount back.

use fleetdesk::{InvariantViolation, LedgerSnapshot, Recount, recount, verify_ledger as verify};
use fleetdesk_domain::{BusAssignmentId, RegistrationId, TripId};
use tracing::{info, warn};

use crate::error::OperationError;
use crate::store::LedgerStore;

/// What a reconciliation changed and what it could not fix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Trips whose booking count was rewritten, in id order.
    pub corrected_trips: Vec<TripId>,
    /// Bus assignments whose minimum capacity was rewritten, in id order.
    pub corrected_bus_assignments: Vec<BusAssignmentId>,
    /// Violations still present after the rewrite, such as ticket sides
    /// with no trip or trips over capacity.
    pub remaining: Vec<InvariantViolation>,
}

impl ReconcileReport {
    /// Number of rows rewritten.
    #[must_use]
    pub const fn corrected_rows(&self) -> usize {
        self.corrected_trips.len() + self.corrected_bus_assignments.len()
    }
}

fn load_snapshot<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
) -> Result<LedgerSnapshot, OperationError> {
    conn.get_registration(registration_id)?;
    Ok(LedgerSnapshot {
        tickets: conn.list_tickets(registration_id)?,
        trips: conn.list_trips(registration_id)?,
        bus_assignments: conn.list_bus_assignments(registration_id)?,
    })
}

/// Reports every counter invariant a registration currently breaks.
///
/// # Errors
///
/// Returns an error if the registration does not exist or a read fails.
pub fn verify_ledger<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
) -> Result<Vec<InvariantViolation>, OperationError> {
    let violations: Vec<InvariantViolation> = conn.transaction::<_, OperationError, _>(|c| {
        let snapshot: LedgerSnapshot = load_snapshot(c, registration_id)?;
        Ok(verify(&snapshot))
    })?;
    if !violations.is_empty() {
        warn!(
            registration_id = %registration_id,
            violations = violations.len(),
            "Ledger verification found violations"
        );
    }
    Ok(violations)
}

/// Recounts every trip of a registration from its tickets and rewrites
/// any counter that drifted.
///
/// Every bus assignment of the registration is locked first, which stops
/// all counter writers for the duration.
///
/// # Errors
///
/// Returns an error if the registration does not exist or a read or write
/// fails; nothing is rewritten in that case.
pub fn reconcile_ledger<C: LedgerStore>(
    conn: &mut C,
    registration_id: RegistrationId,
) -> Result<ReconcileReport, OperationError> {
    let report: ReconcileReport = conn.write_transaction::<_, OperationError, _>(|c| {
        c.lock_registration_bus_assignments(registration_id)?;

        let snapshot: LedgerSnapshot = load_snapshot(c, registration_id)?;
        let counted: Recount = recount(&snapshot);
        let mut report: ReconcileReport = ReconcileReport::default();

        for trip in &snapshot.trips {
            let actual: u32 = counted
                .trip_counts
                .get(&trip.trip_id())
                .copied()
                .unwrap_or(0);
            if actual != trip.booking_count() {
                c.set_trip_booking_count(trip.trip_id(), actual)?;
                report.corrected_trips.push(trip.trip_id());
            }
        }
        for bus in &snapshot.bus_assignments {
            let expected: u32 = counted
                .min_required_capacities
                .get(&bus.bus_assignment_id())
                .copied()
                .unwrap_or(0);
            if expected != bus.min_required_capacity() {
                c.set_min_required_capacity(bus.bus_assignment_id(), expected)?;
                report.corrected_bus_assignments.push(bus.bus_assignment_id());
            }
        }

        report.remaining = verify(&load_snapshot(c, registration_id)?);
        Ok(report)
    })?;

    info!(
        registration_id = %registration_id,
        corrected_rows = report.corrected_rows(),
        remaining = report.remaining.len(),
        "Reconciled ledger"
    );
    Ok(report)
}
