//! Command implementations and dispatch.

pub mod classify;
pub mod config;
pub mod dict;
pub mod init;
pub mod priority;
mod shared;
pub mod status;
pub mod tag;
pub mod tags;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Status => status::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Classify(cmd) => classify::run(ctx, &cmd),
        Commands::Tag(cmd) => tag::run(ctx, &cmd),
        Commands::Tags(cmd) => tags::run(ctx, &cmd),
        Commands::Dict(cmd) => dict::run(ctx, &cmd.action),
        Commands::Priority(cmd) => priority::run(ctx, &cmd),
    }
}
