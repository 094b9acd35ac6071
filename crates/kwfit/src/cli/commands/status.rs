//! Implementation of `kwfit status`.

use std::process::ExitCode;

use kwfit_config::{ConfigWarning, discover_config_files};

use super::shared::GitignoreEntry;
use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files, the data directory, clients and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("kwfit init")
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    println!("{}", subheader("Data directory:"));
    if store.root().exists() {
        println!("   {}", store.root().display());
    } else {
        println!(
            "   {} {}",
            store.root().display(),
            dim("(not created yet)")
        );
    }
    if let Some(entry) = GitignoreEntry::beside(store.root())
        && matches!(entry.is_listed(), Ok(false))
    {
        println!(
            "   {}",
            dim(&format!("not ignored by git; add {} to .gitignore", entry.pattern))
        );
    }
    println!();

    let config = &ctx.config;
    println!("{}", subheader("Clients:"));
    let stored = match store.clients() {
        Ok(stored) => stored,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if config.clients.is_empty() && stored.is_empty() {
        println!("   {}", dim("(none defined)"));
    }
    for client in &config.clients {
        let scope = if client.is_global { "global" } else { "local" };
        let mut filters = Vec::new();
        if let Some(location) = &client.location {
            filters.push(format!("location={location}"));
        }
        if !client.domains.is_empty() {
            filters.push(format!("domains={}", client.domains.join(",")));
        }
        let filters = if filters.is_empty() {
            String::new()
        } else {
            format!(" {}", dim(&filters.join(" ")))
        };
        let missing = match store.has_dictionary(&client.name) {
            Ok(true) => String::new(),
            Ok(false) => format!(" {}", warning("[no dictionary]")),
            Err(e) => format!(" {}", warning(&format!("[{e}]"))),
        };
        println!(
            "   {} {}{filters}{missing}",
            client.name,
            dim(&format!("({scope})"))
        );
    }
    for name in stored.iter().filter(|name| config.client(name).is_none()) {
        println!("   {name} {}", dim("(data only)"));
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    for w in warnings {
        match w {
            ConfigWarning::NoClientsDefined => {
                println!("{}", dim("Hint: add [client.NAME] sections to .kwfit.toml"));
            }
            ConfigWarning::PriorityWeightsNotNormalized { .. } => {
                println!(
                    "{}",
                    dim("Hint: traffic, intent, page_type and relevance weights should sum to 1")
                );
            }
            _ => {}
        }
    }
}
