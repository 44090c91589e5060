// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch from parsed arguments to the persistence adapter.

use std::collections::HashMap;
use std::path::Path;

use fleetdesk::{InvariantViolation, NewTicket, TransferPlan};
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, RegistrationId, RouteId, ScheduleId, TicketId, Trip, TripKey,
};
use fleetdesk_persistence::{OperationError, Persistence, PersistenceError};
use tracing::{debug, info};

use crate::args::{BookTicketArgs, Command, CreateCommand};
use crate::output::{
    AuditEventResponse, AuditResponse, ReconcileResponse, Report, TransferPreviewResponse,
    TransferResponse, TripOccupancyResponse, TripsResponse, VerifyResponse,
};

/// Opens the configured backend. Without a file or URL the database lives
/// in memory and is gone when the process exits.
pub fn open_persistence(
    database: Option<&Path>,
    mysql_url: Option<&str>,
) -> Result<Persistence, PersistenceError> {
    match (database, mysql_url) {
        (_, Some(url)) => {
            info!("Using MySQL/MariaDB database");
            Persistence::new_with_mysql(url)
        }
        (Some(path), None) => {
            info!("Using file-based database at: {}", path.display());
            Persistence::new_with_file(path)
        }
        (None, None) => {
            info!("Using in-memory database");
            Persistence::new_in_memory()
        }
    }
}

/// Runs one command against an open database.
///
/// # Errors
///
/// Returns the operation's error unchanged so the caller can report its
/// failure category.
pub fn run(persistence: &mut Persistence, command: Command) -> Result<Report, OperationError> {
    debug!(?command, "Running command");
    match command {
        Command::Create(create) => run_create(persistence, create),
        Command::BookTicket(args) => book_ticket(persistence, args),
        Command::RemoveTicket(args) => Ok(Report::Ticket(persistence.remove_ticket(
            RegistrationId::new(args.registration),
            TicketId::new(args.ticket),
            args.actor.actor(),
            args.actor.cause(),
        )?)),
        Command::PreviewTransfer(args) => {
            let plan: TransferPlan = persistence.plan_transfer(args.request())?;
            Ok(Report::Preview(TransferPreviewResponse::from(&plan)))
        }
        Command::TransferStop(args) => {
            let outcome = persistence.transfer_stop(
                args.transfer.request(),
                args.actor.actor(),
                args.actor.cause(),
            )?;
            Ok(Report::Transfer(TransferResponse::from(outcome)))
        }
        Command::Verify(args) => {
            let violations: Vec<InvariantViolation> =
                persistence.verify_ledger(args.registration_id())?;
            Ok(Report::Verify(VerifyResponse {
                registration_id: args.registration_id(),
                consistent: violations.is_empty(),
                violations: violations.iter().map(ToString::to_string).collect(),
            }))
        }
        Command::Reconcile(args) => {
            let report = persistence.reconcile_ledger(args.registration_id())?;
            Ok(Report::Reconcile(ReconcileResponse::new(
                args.registration_id(),
                &report,
            )))
        }
        Command::Trips(args) => trip_occupancy(persistence, args.registration_id()),
        Command::Audit(args) => {
            let events = persistence.list_audit_events(args.registration_id())?;
            Ok(Report::Audit(AuditResponse {
                registration_id: args.registration_id(),
                events: events.into_iter().map(AuditEventResponse::from).collect(),
            }))
        }
    }
}

fn run_create(
    persistence: &mut Persistence,
    command: CreateCommand,
) -> Result<Report, OperationError> {
    let report: Report = match command {
        CreateCommand::Registration { name } => {
            Report::Registration(persistence.create_registration(&name)?)
        }
        CreateCommand::Route { registration, name } => {
            Report::Route(persistence.create_route(RegistrationId::new(registration), &name)?)
        }
        CreateCommand::Stop {
            registration,
            route,
            name,
        } => Report::Stop(persistence.create_stop(
            RegistrationId::new(registration),
            RouteId::new(route),
            &name,
        )?),
        CreateCommand::Schedule {
            registration,
            role,
            start,
            end,
            name,
        } => Report::Schedule(persistence.create_schedule(
            RegistrationId::new(registration),
            &name,
            role,
            start,
            end,
        )?),
        CreateCommand::Bus {
            registration,
            capacity,
            label,
        } => Report::BusAssignment(persistence.create_bus_assignment(
            RegistrationId::new(registration),
            &label,
            capacity,
        )?),
        CreateCommand::Trip {
            registration,
            bus,
            route,
            schedule,
        } => Report::Trip(persistence.create_trip(
            RegistrationId::new(registration),
            TripKey {
                bus_assignment_id: BusAssignmentId::new(bus),
                route_id: RouteId::new(route),
                schedule_id: ScheduleId::new(schedule),
            },
        )?),
    };
    Ok(report)
}

fn book_ticket(
    persistence: &mut Persistence,
    args: BookTicketArgs,
) -> Result<Report, OperationError> {
    let ticket: NewTicket = NewTicket {
        registration_id: RegistrationId::new(args.registration),
        code: args.code,
        pickup: args.pickup,
        drop: args.drop,
    };
    Ok(Report::Ticket(persistence.book_ticket(&ticket)?))
}

fn trip_occupancy(
    persistence: &mut Persistence,
    registration_id: RegistrationId,
) -> Result<Report, OperationError> {
    let capacities: HashMap<BusAssignmentId, u32> = persistence
        .list_bus_assignments(registration_id)?
        .iter()
        .map(|b: &BusAssignment| (b.bus_assignment_id(), b.capacity()))
        .collect();
    let trips: Vec<Trip> = persistence.list_trips(registration_id)?;

    let occupancy: Vec<TripOccupancyResponse> = trips
        .iter()
        .map(|t| {
            let capacity: u32 = capacities.get(&t.bus_assignment_id()).copied().unwrap_or(0);
            TripOccupancyResponse::new(t, capacity)
        })
        .collect();

    Ok(Report::Trips(TripsResponse {
        registration_id,
        trips: occupancy,
    }))
}
