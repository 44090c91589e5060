// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use fleetdesk_domain::RegistrationId;

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// The actor is recorded for the audit trail only. Authorization happens
/// upstream of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Dispatcher login, service name, or `cli`.
    pub id: String,
    /// `operator` for people, `system` for scheduled jobs.
    pub actor_type: String,
}

impl Actor {
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Why the change was made: a request or ticket reference and a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    pub id: String,
    /// Free text, e.g. "Road closure on Elm Street".
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The action that was performed (e.g., "`TransferStop`").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    /// Optional free-form details, such as route names and ticket counts.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact textual snapshot of the state an action touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event representing a committed state transition.
///
/// Captures who acted (actor), why (cause), what was done (action), and the
/// state before and after. `event_id` is `None` until the event has been
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The database-assigned identifier, once persisted.
    pub event_id: Option<i64>,
    /// The registration the transition happened in.
    pub registration_id: RegistrationId,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new, not yet persisted `AuditEvent`.
    #[must_use]
    pub const fn new(
        registration_id: RegistrationId,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            registration_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns a copy of this event carrying its persisted identifier.
    #[must_use]
    pub fn with_event_id(self, event_id: i64) -> Self {
        Self {
            event_id: Some(event_id),
            ..self
        }
    }
}
