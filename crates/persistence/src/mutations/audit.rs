// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetdesk_audit::AuditEvent;

use crate::backend::PersistenceBackend;
use crate::data_models::NewAuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Stores an audit event and returns the id the database assigned.
///
/// Callers run this after their own transaction has committed, so a
/// failure here never undoes the change being audited.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(conn: &mut _, event: &AuditEvent) -> Result<i64, PersistenceError> {
    let row: NewAuditEventRow = NewAuditEventRow::from_event(event)?;
    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    tracing::debug!(
        event_id,
        registration_id = row.registration_id,
        action = %event.action.name,
        "Recorded audit event"
    );
    Ok(event_id)
}
}
