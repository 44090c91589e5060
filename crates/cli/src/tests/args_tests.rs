// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;
use fleetdesk_domain::{BusAssignmentId, RouteId, ScheduleId, ScheduleRole, StopId};
use time::macros::time;
use tracing::level_filters::LevelFilter;

use crate::args::{Args, Command, CreateCommand, parse_side};
use crate::tests::parse;

#[test]
fn test_parse_side_reads_all_four_ids() {
    let side = parse_side("1:2:3:4").expect("Side should parse");

    assert_eq!(side.route_id, RouteId::new(1));
    assert_eq!(side.stop_id, StopId::new(2));
    assert_eq!(side.schedule_id, ScheduleId::new(3));
    assert_eq!(side.bus_assignment_id, BusAssignmentId::new(4));
}

#[test]
fn test_parse_side_rejects_wrong_arity() {
    let err: String = parse_side("1:2:3").unwrap_err();
    assert!(err.contains("route:stop:schedule:bus"));
}

#[test]
fn test_parse_side_rejects_non_numeric_id() {
    let err: String = parse_side("1:two:3:4").unwrap_err();
    assert!(err.contains("'two'"));
}

#[test]
fn test_create_schedule_parses_role_and_window() {
    let command: Command = parse(&[
        "create", "schedule", "-r", "1", "--role", "drop", "--start", "15:00", "--end", "16:30",
        "Evening",
    ]);

    let Command::Create(CreateCommand::Schedule {
        registration,
        role,
        start,
        end,
        name,
    }) = command
    else {
        panic!("Expected a create schedule command, got {command:?}");
    };
    assert_eq!(registration, 1);
    assert_eq!(role, ScheduleRole::Drop);
    assert_eq!(start, time!(15:00));
    assert_eq!(end, time!(16:30));
    assert_eq!(name, "Evening");
}

#[test]
fn test_unknown_schedule_role_is_rejected() {
    let result = Args::try_parse_from([
        "fleetdesk", "create", "schedule", "-r", "1", "--role", "midday", "--start", "12:00",
        "--end", "13:00", "Lunch",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_transfer_alias_and_actor_defaults() {
    let command: Command = parse(&["transfer", "-r", "7", "--stop", "3", "--to-route", "9"]);

    let Command::TransferStop(args) = command else {
        panic!("Expected a transfer command, got {command:?}");
    };
    let request = args.transfer.request();
    assert_eq!(request.stop_id, StopId::new(3));
    assert_eq!(request.destination_route_id, RouteId::new(9));
    assert_eq!(args.actor.actor().id, "cli");
    assert_eq!(args.actor.actor().actor_type, "operator");
}

#[test]
fn test_book_accepts_a_single_side() {
    let command: Command = parse(&["book", "-r", "1", "--code", "T-1", "--drop", "2:5:8:11"]);

    let Command::BookTicket(args) = command else {
        panic!("Expected a book command, got {command:?}");
    };
    assert!(args.pickup.is_none());
    assert_eq!(args.drop.map(|d| d.stop_id), Some(StopId::new(5)));
}

#[test]
fn test_database_and_mysql_url_conflict() {
    let result = Args::try_parse_from([
        "fleetdesk",
        "--database",
        "fleet.db",
        "--mysql-url",
        "mysql://localhost/fleet",
        "verify",
        "-r",
        "1",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_verbosity_defaults_to_info() {
    let args = Args::try_parse_from(["fleetdesk", "trips", "-r", "1"]).expect("Should parse");
    assert_eq!(args.log_level(), LevelFilter::INFO);

    let quiet = Args::try_parse_from(["fleetdesk", "-q", "trips", "-r", "1"]).expect("Should parse");
    assert_eq!(quiet.log_level(), LevelFilter::WARN);
}
