// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversions to domain values.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::macros::format_description;

use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::{
    BusAssignment, BusAssignmentId, Registration, RegistrationId, Route, RouteId, Schedule,
    ScheduleId, ScheduleRole, SideAssignment, Stop, StopId, Ticket, TicketId, Trip, TripId,
    counter_from_stored, parse_time_of_day,
};

use crate::diesel_schema::{
    audit_events, bus_assignments, registrations, routes, schedules, stops, tickets, trips,
};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Converts a counter to its stored column type.
///
/// # Errors
///
/// Returns an error if the value does not fit in the column.
pub fn counter_to_stored(value: u32) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::SerializationError(format!("Counter {value} does not fit in a column"))
    })
}

fn counter_from_column(value: i32) -> Result<u32, PersistenceError> {
    Ok(counter_from_stored(i64::from(value))?)
}

/// Formats a schedule time as stored (`HH:MM`).
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_time_of_day(value: time::Time) -> Result<String, PersistenceError> {
    value
        .format(format_description!("[hour]:[minute]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = registrations)]
pub struct RegistrationRow {
    pub registration_id: i64,
    pub name: String,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self::new(RegistrationId::new(row.registration_id), row.name)
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = routes)]
pub struct RouteRow {
    pub route_id: i64,
    pub registration_id: i64,
    pub name: String,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Self::new(
            RouteId::new(row.route_id),
            RegistrationId::new(row.registration_id),
            row.name,
        )
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = stops)]
pub struct StopRow {
    pub stop_id: i64,
    pub registration_id: i64,
    pub route_id: i64,
    pub name: String,
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Self::new(
            StopId::new(row.stop_id),
            RegistrationId::new(row.registration_id),
            RouteId::new(row.route_id),
            row.name,
        )
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schedules)]
pub struct ScheduleRow {
    pub schedule_id: i64,
    pub registration_id: i64,
    pub name: String,
    pub role: String,
    pub start_time: String,
    pub end_time: String,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = PersistenceError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let role: ScheduleRole = row.role.parse()?;
        Ok(Self::new(
            ScheduleId::new(row.schedule_id),
            RegistrationId::new(row.registration_id),
            row.name,
            role,
            parse_time_of_day(&row.start_time)?,
            parse_time_of_day(&row.end_time)?,
        ))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bus_assignments)]
pub struct BusAssignmentRow {
    pub bus_assignment_id: i64,
    pub registration_id: i64,
    pub label: String,
    pub capacity: i32,
    pub min_required_capacity: i32,
}

impl TryFrom<BusAssignmentRow> for BusAssignment {
    type Error = PersistenceError;

    fn try_from(row: BusAssignmentRow) -> Result<Self, Self::Error> {
        Ok(Self::new(
            BusAssignmentId::new(row.bus_assignment_id),
            RegistrationId::new(row.registration_id),
            row.label,
            counter_from_column(row.capacity)?,
            counter_from_column(row.min_required_capacity)?,
        ))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = trips)]
pub struct TripRow {
    pub trip_id: i64,
    pub registration_id: i64,
    pub bus_assignment_id: i64,
    pub route_id: i64,
    pub schedule_id: i64,
    pub booking_count: i32,
}

impl TryFrom<TripRow> for Trip {
    type Error = PersistenceError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        Ok(Self::new(
            TripId::new(row.trip_id),
            RegistrationId::new(row.registration_id),
            BusAssignmentId::new(row.bus_assignment_id),
            RouteId::new(row.route_id),
            ScheduleId::new(row.schedule_id),
            counter_from_column(row.booking_count)?,
        ))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub registration_id: i64,
    pub code: String,
    pub pickup_route_id: Option<i64>,
    pub pickup_stop_id: Option<i64>,
    pub pickup_schedule_id: Option<i64>,
    pub pickup_bus_assignment_id: Option<i64>,
    pub drop_route_id: Option<i64>,
    pub drop_stop_id: Option<i64>,
    pub drop_schedule_id: Option<i64>,
    pub drop_bus_assignment_id: Option<i64>,
}

/// Rebuilds one side from its four nullable columns.
///
/// All four are set or all four are null; anything else is a corrupt row.
fn side_from_columns(
    ticket_id: i64,
    route_id: Option<i64>,
    stop_id: Option<i64>,
    schedule_id: Option<i64>,
    bus_assignment_id: Option<i64>,
) -> Result<Option<SideAssignment>, PersistenceError> {
    match (route_id, stop_id, schedule_id, bus_assignment_id) {
        (Some(route), Some(stop), Some(schedule), Some(bus)) => Ok(Some(SideAssignment {
            route_id: RouteId::new(route),
            stop_id: StopId::new(stop),
            schedule_id: ScheduleId::new(schedule),
            bus_assignment_id: BusAssignmentId::new(bus),
        })),
        (None, None, None, None) => Ok(None),
        _ => Err(PersistenceError::ReconstructionError(format!(
            "Ticket {ticket_id} has a partially assigned side"
        ))),
    }
}

impl TryFrom<TicketRow> for Ticket {
    type Error = PersistenceError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let pickup: Option<SideAssignment> = side_from_columns(
            row.ticket_id,
            row.pickup_route_id,
            row.pickup_stop_id,
            row.pickup_schedule_id,
            row.pickup_bus_assignment_id,
        )?;
        let drop: Option<SideAssignment> = side_from_columns(
            row.ticket_id,
            row.drop_route_id,
            row.drop_stop_id,
            row.drop_schedule_id,
            row.drop_bus_assignment_id,
        )?;
        Ok(Self::new(
            TicketId::new(row.ticket_id),
            RegistrationId::new(row.registration_id),
            row.code,
            pickup,
            drop,
        ))
    }
}

/// A stored audit event. Each JSON column holds one of the `*Data`
/// structs above.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub registration_id: i64,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    #[allow(dead_code)]
    pub created_at: Option<String>,
}

impl AuditEventRow {
    /// Decodes the JSON columns back into an event.
    ///
    /// # Errors
    ///
    /// Returns an error if a column does not hold the expected JSON.
    pub fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let actor: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause: CauseData = serde_json::from_str(&self.cause_json)?;
        let action: ActionData = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent::new(
            RegistrationId::new(self.registration_id),
            Actor::new(actor.id, actor.actor_type),
            Cause::new(cause.id, cause.description),
            Action::new(action.name, action.details),
            StateSnapshot::new(before.data),
            StateSnapshot::new(after.data),
        )
        .with_event_id(self.event_id))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow {
    pub registration_id: i64,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}

impl NewAuditEventRow {
    /// Encodes an event's parts as JSON columns.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn from_event(event: &AuditEvent) -> Result<Self, PersistenceError> {
        let actor = ActorData {
            id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
        };
        let cause = CauseData {
            id: event.cause.id.clone(),
            description: event.cause.description.clone(),
        };
        let action = ActionData {
            name: event.action.name.clone(),
            details: event.action.details.clone(),
        };

        Ok(Self {
            registration_id: event.registration_id.value(),
            actor_json: serde_json::to_string(&actor)?,
            cause_json: serde_json::to_string(&cause)?,
            action_json: serde_json::to_string(&action)?,
            before_snapshot_json: serde_json::to_string(&StateSnapshotData {
                data: event.before.data.clone(),
            })?,
            after_snapshot_json: serde_json::to_string(&StateSnapshotData {
                data: event.after.data.clone(),
            })?,
        })
    }
}
