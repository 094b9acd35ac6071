//! Command-line interface for the `kwfit` keyword classifier.

use std::process::ExitCode;

use clap::Parser;
use kwfit::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands, logging,
};

/// Parses arguments, loads configuration and dispatches.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // init must work even when an existing config is broken
    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}
