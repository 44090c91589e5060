// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetdesk_audit::AuditEvent;
use fleetdesk_domain::RegistrationId;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Loads one audit event.
///
/// # Errors
///
/// Returns `EventNotFound` for an unknown id, or an error if the stored
/// JSON cannot be decoded.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn)
        .optional()?
        .ok_or(PersistenceError::EventNotFound(event_id))?
        .into_event()
}
}

backend_fn! {
/// Retrieves every audit event of a registration in commit order.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn list_audit_events(
    conn: &mut _,
    registration_id: RegistrationId,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    tracing::debug!(registration_id = %registration_id, "Retrieving audit events");

    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::registration_id.eq(registration_id.value()))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_event).collect()
}
}
