// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk::FailureCategory;
use fleetdesk_persistence::Persistence;
use serde_json::Value;

use crate::commands::{open_persistence, run};
use crate::output::{ErrorResponse, Report};
use crate::tests::parse;

fn exec(persistence: &mut Persistence, argv: &[&str]) -> Report {
    run(persistence, parse(argv)).expect("Command should succeed")
}

fn new_id(report: &Report) -> String {
    let id: i64 = match report {
        Report::Registration(r) => r.registration_id().value(),
        Report::Route(r) => r.route_id().value(),
        Report::Stop(s) => s.stop_id().value(),
        Report::Schedule(s) => s.schedule_id().value(),
        Report::BusAssignment(b) => b.bus_assignment_id().value(),
        Report::Trip(t) => t.trip_id().value(),
        Report::Ticket(t) => t.ticket_id().value(),
        other => panic!("Report carries no new id: {other:?}"),
    };
    id.to_string()
}

/// Ids created through the command line, as strings ready for argv.
struct CliFleet {
    registration: String,
    route_a: String,
    route_b: String,
    stop_s: String,
    morning: String,
    bus_a: String,
    bus_b: String,
}

impl CliFleet {
    fn morning_side(&self, route: &str, stop: &str, bus: &str) -> String {
        format!("{route}:{stop}:{}:{bus}", self.morning)
    }
}

fn create_cli_fleet(p: &mut Persistence, capacity_b: &str) -> CliFleet {
    let registration = new_id(&exec(p, &["create", "registration", "Northside School"]));
    let r: &str = &registration;
    let route_a = new_id(&exec(p, &["create", "route", "-r", r, "Route A"]));
    let route_b = new_id(&exec(p, &["create", "route", "-r", r, "Route B"]));
    let stop_s = new_id(&exec(
        p,
        &["create", "stop", "-r", r, "--route", &route_a, "Elm Street"],
    ));
    let morning = new_id(&exec(
        p,
        &[
            "create", "schedule", "-r", r, "--role", "pickup", "--start", "07:00", "--end",
            "08:30", "Morning",
        ],
    ));
    let bus_a = new_id(&exec(
        p,
        &["create", "bus", "-r", r, "--capacity", "10", "Bus 12"],
    ));
    let bus_b = new_id(&exec(
        p,
        &["create", "bus", "-r", r, "--capacity", capacity_b, "Bus 31"],
    ));
    for (bus, route) in [(&bus_a, &route_a), (&bus_b, &route_b)] {
        exec(
            p,
            &[
                "create", "trip", "-r", r, "--bus", bus, "--route", route, "--schedule", &morning,
            ],
        );
    }

    CliFleet {
        registration,
        route_a,
        route_b,
        stop_s,
        morning,
        bus_a,
        bus_b,
    }
}

fn book_at_s(p: &mut Persistence, fleet: &CliFleet, code: &str) {
    let side: String = fleet.morning_side(&fleet.route_a, &fleet.stop_s, &fleet.bus_a);
    exec(
        p,
        &["book", "-r", &fleet.registration, "--code", code, "--pickup", &side],
    );
}

fn to_json(report: &Report) -> Value {
    serde_json::to_value(report).expect("Report should serialize")
}

#[test]
fn test_open_persistence_defaults_to_memory() {
    let mut persistence: Persistence =
        open_persistence(None, None).expect("In-memory database should open");
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_transfer_moves_tickets_and_reports_counts() {
    let mut p: Persistence = open_persistence(None, None).expect("Should open");
    let fleet: CliFleet = create_cli_fleet(&mut p, "10");
    book_at_s(&mut p, &fleet, "S-001");
    book_at_s(&mut p, &fleet, "S-002");

    let report: Report = exec(
        &mut p,
        &[
            "transfer",
            "-r",
            &fleet.registration,
            "--stop",
            &fleet.stop_s,
            "--to-route",
            &fleet.route_b,
            "--reason",
            "Road closure",
        ],
    );

    let json: Value = to_json(&report);
    assert_eq!(json["moved_ticket_count"], 2);
    assert_eq!(json["source_route_stop_count"], 0);
    assert_eq!(json["destination_route_stop_count"], 1);
    assert!(json["audit_event_id"].is_i64());

    let trips: Value = to_json(&exec(&mut p, &["trips", "-r", &fleet.registration]));
    let on_b: Vec<&Value> = trips["trips"]
        .as_array()
        .expect("trips should be an array")
        .iter()
        .filter(|t| t["bus_assignment_id"].to_string() == fleet.bus_b)
        .collect();
    assert_eq!(on_b.len(), 1);
    assert_eq!(on_b[0]["booking_count"], 2);
    assert_eq!(on_b[0]["available_seats"], 8);

    let audit: Value = to_json(&exec(&mut p, &["audit", "-r", &fleet.registration]));
    assert_eq!(audit["events"][0]["action"], "TransferStop");
    assert_eq!(audit["events"][0]["cause_description"], "Road closure");
}

#[test]
fn test_preview_lists_moves_without_writing() {
    let mut p: Persistence = open_persistence(None, None).expect("Should open");
    let fleet: CliFleet = create_cli_fleet(&mut p, "10");
    book_at_s(&mut p, &fleet, "S-001");

    let preview: Value = to_json(&exec(
        &mut p,
        &[
            "preview",
            "-r",
            &fleet.registration,
            "--stop",
            &fleet.stop_s,
            "--to-route",
            &fleet.route_b,
        ],
    ));

    assert_eq!(preview["stop_name"], "Elm Street");
    assert_eq!(preview["destination_route_name"], "Route B");
    assert_eq!(preview["moves"][0]["ticket_code"], "S-001");
    assert_eq!(preview["moves"][0]["new_bus_assignment_id"].to_string(), fleet.bus_b);

    let audit: Value = to_json(&exec(&mut p, &["audit", "-r", &fleet.registration]));
    assert_eq!(audit["events"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_full_destination_reports_no_capacity() {
    let mut p: Persistence = open_persistence(None, None).expect("Should open");
    let fleet: CliFleet = create_cli_fleet(&mut p, "1");
    book_at_s(&mut p, &fleet, "S-001");
    book_at_s(&mut p, &fleet, "S-002");

    let err = run(
        &mut p,
        parse(&[
            "transfer",
            "-r",
            &fleet.registration,
            "--stop",
            &fleet.stop_s,
            "--to-route",
            &fleet.route_b,
        ]),
    )
    .unwrap_err();

    assert_eq!(err.failure_category(), FailureCategory::NoCapacityAvailable);
    let response = ErrorResponse::from(&err);
    assert_eq!(response.category, "NoCapacityAvailable");
    assert!(!response.error.is_empty());
}

#[test]
fn test_remove_then_verify_is_consistent() {
    let mut p: Persistence = open_persistence(None, None).expect("Should open");
    let fleet: CliFleet = create_cli_fleet(&mut p, "10");
    let side: String = fleet.morning_side(&fleet.route_a, &fleet.stop_s, &fleet.bus_a);
    let ticket = new_id(&exec(
        &mut p,
        &["book", "-r", &fleet.registration, "--code", "S-001", "--pickup", &side],
    ));

    exec(
        &mut p,
        &["rm", "-r", &fleet.registration, "--ticket", &ticket],
    );

    let verify: Value = to_json(&exec(&mut p, &["verify", "-r", &fleet.registration]));
    assert_eq!(verify["consistent"], true);
    assert_eq!(verify["violations"].as_array().map(Vec::len), Some(0));

    let reconcile: Value = to_json(&exec(&mut p, &["reconcile", "-r", &fleet.registration]));
    assert_eq!(reconcile["corrected_rows"], 0);
}
