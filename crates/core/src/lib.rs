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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Stop transfer and booking-count engine.
//!
//! Everything in this crate is pure: it reads state handed to it by the
//! storage layer and returns plans, counter adjustments, or reports. The
//! storage layer is responsible for reading under the right locks and for
//! applying the results atomically.

mod context;
mod error;
mod ledger;
mod observer;
mod plan;
mod planner;
mod resolver;
mod verify;

#[cfg(test)]
mod tests;

pub use context::{TransferContext, TransferRequest, ensure_distinct_route, ensure_registration};
pub use error::{CoreError, FailureCategory};
pub use ledger::CapacityLedger;
pub use observer::{
    BookingSide, CounterAdjustment, NewTicket, plan_booking, removal_audit_event,
    removal_decrements,
};
pub use plan::{SideMove, TransferPlan};
pub use planner::plan_transfer;
pub use resolver::resolve;
pub use verify::{InvariantViolation, LedgerSnapshot, Recount, recount, verify_ledger};
