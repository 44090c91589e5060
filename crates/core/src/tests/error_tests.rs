// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CoreError, FailureCategory};
use fleetdesk_domain::{
    DomainError, RegistrationId, RouteId, ScheduleId, StopId, TicketSide, TripId,
};

#[test]
fn test_failure_categories() {
    let cases: Vec<(CoreError, FailureCategory)> = vec![
        (
            CoreError::StopNotFound(StopId::new(1)),
            FailureCategory::InvalidRequest,
        ),
        (
            CoreError::DomainViolation(DomainError::EmptyTicket),
            FailureCategory::InvalidRequest,
        ),
        (
            CoreError::RegistrationMismatch {
                entity: "Stop",
                id: 1,
                expected: RegistrationId::new(1),
                actual: RegistrationId::new(2),
            },
            FailureCategory::InvalidRequest,
        ),
        (
            CoreError::PlanOutdated(String::from("stop moved")),
            FailureCategory::ConcurrentCapacityViolation,
        ),
        (
            CoreError::CounterUnderflow(TripId::new(1)),
            FailureCategory::PersistenceFailure,
        ),
    ];

    for (err, category) in cases {
        assert_eq!(err.failure_category(), category, "{err}");
    }
}

#[test]
fn test_core_error_display_names_the_offender() {
    let err: CoreError = CoreError::NoCapacityAvailable {
        ticket_code: String::from("T-0003"),
        side: TicketSide::Pickup,
        schedule_id: ScheduleId::new(1),
        route_id: RouteId::new(2),
    };
    assert_eq!(
        format!("{err}"),
        "No seats left on route 2 for schedule 1 (pickup of ticket T-0003)"
    );

    let err: CoreError = CoreError::SameRoute {
        stop_id: StopId::new(10),
        route_id: RouteId::new(1),
    };
    assert_eq!(format!("{err}"), "Stop 10 is already on route 1");
    assert_eq!(FailureCategory::NoMatchingTrip.as_str(), "NoMatchingTrip");
}
