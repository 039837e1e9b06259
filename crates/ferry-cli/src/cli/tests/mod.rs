//! CLI parse tests and end-to-end command tests against a temp store.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse_command(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

mod workflows;
