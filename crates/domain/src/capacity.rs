// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{BusAssignment, Trip};

/// Derives a bus assignment's minimum required capacity from its trips.
///
/// This is the largest `booking_count` across the trips, or 0 when the
/// assignment carries no trips.
#[must_use]
pub fn derive_min_required_capacity<'a, I>(trips: I) -> u32
where
    I: IntoIterator<Item = &'a Trip>,
{
    trips
        .into_iter()
        .map(Trip::booking_count)
        .max()
        .unwrap_or(0)
}

/// Checks that a trip fits on its bus assignment.
///
/// # Errors
///
/// Returns an error if:
/// - The trip does not belong to the given bus assignment
/// - The trip's booking count exceeds the assignment's capacity
pub fn check_trip_capacity(trip: &Trip, assignment: &BusAssignment) -> Result<(), DomainError> {
    if trip.bus_assignment_id() != assignment.bus_assignment_id() {
        return Err(DomainError::TripAssignmentMismatch {
            trip_id: trip.trip_id(),
            expected: trip.bus_assignment_id(),
            actual: assignment.bus_assignment_id(),
        });
    }

    if trip.booking_count() > assignment.capacity() {
        return Err(DomainError::CapacityExceeded {
            trip_id: trip.trip_id(),
            booking_count: trip.booking_count(),
            capacity: assignment.capacity(),
        });
    }

    Ok(())
}

/// Converts a stored counter into the domain's counter type.
///
/// # Errors
///
/// Returns an error if the value is negative or does not fit in a `u32`.
pub fn counter_from_stored(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::CounterOutOfRange(value))
}
