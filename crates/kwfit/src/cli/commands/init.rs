//! Implementation of `kwfit init`.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use kwfit_config::{CONFIG_FILENAME, Settings, global_config_path, global_template, local_template};

use super::shared::GitignoreEntry;
use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{Highlighter, dim, indent_content, subheader, success},
};

/// The file `init` writes.
struct InitTarget {
    /// Config file path.
    path: PathBuf,
    /// True for `~/.kwfit.toml`.
    global: bool,
}

impl InitTarget {
    /// Picks the config file for `cwd`. Running from the home directory always targets the
    /// global file. Returns `None` when a global file is wanted but there is no home.
    fn resolve(cwd: &Path, global: bool) -> Option<Self> {
        let global_path = global_config_path();
        let in_home = global_path.as_deref().and_then(Path::parent) == Some(cwd);
        if global || in_home {
            return global_path.map(|path| Self { path, global: true });
        }
        Some(Self {
            path: cwd.join(CONFIG_FILENAME),
            global: false,
        })
    }

    /// Commented-out template for this target.
    fn template(&self) -> String {
        if self.global {
            global_template()
        } else {
            local_template()
        }
    }
}

/// Writes a commented `.kwfit.toml` and keeps the data directory out of git.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let Some(target) = InitTarget::resolve(&ctx.cwd, cmd.global) else {
        eprintln!("error: could not determine home directory");
        return ExitCode::FAILURE;
    };

    if target.path.exists() && !cmd.force {
        eprintln!(
            "error: {} already exists (use --force to overwrite)",
            target.path.display()
        );
        return ExitCode::FAILURE;
    }

    let template = target.template();
    if let Err(e) = fs::write(&target.path, &template) {
        eprintln!("error: failed to write {}: {e}", target.path.display());
        return ExitCode::FAILURE;
    }
    println!("{} {}", success("Created"), target.path.display());
    println!();
    println!("{}", subheader("Template (uncomment what you need):"));
    println!(
        "{}",
        indent_content(&Highlighter::new().highlight_toml(&template))
    );

    if target.global {
        return ExitCode::SUCCESS;
    }

    // A fresh local config stores data in the default directory beside it
    let data_dir = ctx.cwd.join(Settings::default().data_dir);
    if let Some(entry) = GitignoreEntry::beside(&data_dir) {
        match entry.ensure_listed() {
            Ok(true) => println!("{}", dim(&format!("Added {} to .gitignore", entry.pattern))),
            Ok(false) => {}
            Err(e) => eprintln!("warning: could not update .gitignore: {e}"),
        }
    }

    ExitCode::SUCCESS
}
