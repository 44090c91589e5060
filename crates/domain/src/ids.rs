// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical numeric identifiers.
//!
//! Every persisted entity is addressed by the integer key the database
//! assigned to it. Each entity gets its own newtype so a stop id can never
//! be passed where a route id is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a database-assigned identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Identifies a registration (booking period).
    RegistrationId
}

entity_id! {
    /// Identifies a route.
    RouteId
}

entity_id! {
    /// Identifies a stop.
    StopId
}

entity_id! {
    /// Identifies a schedule.
    ScheduleId
}

entity_id! {
    /// Identifies a bus bound to a registration.
    BusAssignmentId
}

entity_id! {
    /// Identifies a trip.
    TripId
}

entity_id! {
    /// Identifies a ticket.
    TicketId
}
