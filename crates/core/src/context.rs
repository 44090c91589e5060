// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{
    BusAssignment, RegistrationId, Route, RouteId, Stop, StopId, Ticket, Trip,
};

use crate::error::CoreError;

/// A request to move a stop onto another route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// The registration every touched entity must belong to.
    pub registration_id: RegistrationId,
    pub stop_id: StopId,
    pub destination_route_id: RouteId,
}

impl TransferRequest {
    #[must_use]
    pub const fn new(
        registration_id: RegistrationId,
        stop_id: StopId,
        destination_route_id: RouteId,
    ) -> Self {
        Self {
            registration_id,
            stop_id,
            destination_route_id,
        }
    }
}

/// Everything the planner reads for one transfer.
///
/// `tickets` holds every ticket with at least one side at the stop.
/// `trips` holds every trip on the destination route plus the trips the
/// moving sides currently occupy, and `bus_assignments` covers all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferContext {
    pub registration_id: RegistrationId,
    pub stop: Stop,
    pub source_route: Route,
    pub destination_route: Route,
    pub tickets: Vec<Ticket>,
    pub trips: Vec<Trip>,
    pub bus_assignments: Vec<BusAssignment>,
}

/// Rejects a transfer whose destination is the stop's current route.
///
/// This runs before anything else is loaded.
///
/// # Errors
///
/// Returns `CoreError::SameRoute` when the routes are equal.
pub fn ensure_distinct_route(stop: &Stop, destination_route_id: RouteId) -> Result<(), CoreError> {
    if stop.route_id() == destination_route_id {
        return Err(CoreError::SameRoute {
            stop_id: stop.stop_id(),
            route_id: destination_route_id,
        });
    }
    Ok(())
}

/// Checks that an entity belongs to the request's registration.
///
/// # Errors
///
/// Returns `CoreError::RegistrationMismatch` otherwise.
pub const fn ensure_registration(
    entity: &'static str,
    id: i64,
    expected: RegistrationId,
    actual: RegistrationId,
) -> Result<(), CoreError> {
    if expected.value() != actual.value() {
        return Err(CoreError::RegistrationMismatch {
            entity,
            id,
            expected,
            actual,
        });
    }
    Ok(())
}

impl TransferContext {
    /// Checks the stop, both routes, and every ticket against the
    /// context's registration.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch found.
    pub fn ensure_scoped(&self) -> Result<(), CoreError> {
        let expected: RegistrationId = self.registration_id;
        ensure_registration(
            "Stop",
            self.stop.stop_id().value(),
            expected,
            self.stop.registration_id(),
        )?;
        ensure_registration(
            "Route",
            self.source_route.route_id().value(),
            expected,
            self.source_route.registration_id(),
        )?;
        ensure_registration(
            "Route",
            self.destination_route.route_id().value(),
            expected,
            self.destination_route.registration_id(),
        )?;
        for ticket in &self.tickets {
            ensure_registration(
                "Ticket",
                ticket.ticket_id().value(),
                expected,
                ticket.registration_id(),
            )?;
        }
        Ok(())
    }
}
