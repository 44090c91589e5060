// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod args_tests;
mod command_tests;

use clap::Parser;

use crate::args::{Args, Command};

/// Parses a command line the way `main` does, minus the binary name.
pub fn parse(argv: &[&str]) -> Command {
    let mut full: Vec<&str> = vec!["fleetdesk"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full)
        .expect("Command line should parse")
        .command
}
