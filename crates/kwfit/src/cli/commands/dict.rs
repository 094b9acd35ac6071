//! Implementation of `kwfit dict`.

use std::{fs, path::Path, process::ExitCode};

use kwfit_dictionary::{
    BulkAddSummary, DictionaryWarning, MatchingDictionary, TokenBucket, TokenEntry, TokenSource,
    normalize,
};

use super::shared::{self, format_lines};
use crate::cli::{
    args::{
        DictAction, DictAddCommand, DictCheckCommand, DictLinesCommand, DictRemoveCommand,
        DictShowCommand,
    },
    context::CommandContext,
    output::{dim, header, print_json, subheader, success, warning},
};

/// Runs a dictionary operation.
pub fn run(ctx: &CommandContext, action: &DictAction) -> ExitCode {
    match action {
        DictAction::Show(cmd) => show(ctx, cmd),
        DictAction::Add(cmd) => add(ctx, cmd),
        DictAction::Remove(cmd) => remove(ctx, cmd),
        DictAction::Lines(cmd) => lines(ctx, cmd),
        DictAction::Check(cmd) => check(ctx, cmd),
    }
}

/// Shows a client's tokens by bucket.
fn show(ctx: &CommandContext, cmd: &DictShowCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let dictionary = match shared::require_dictionary(&store, &cmd.client) {
        Ok(dictionary) => dictionary,
        Err(code) => return code,
    };

    if cmd.json {
        return print_json(&dictionary);
    }

    println!(
        "{} {}",
        header(&cmd.client),
        dim(&format!(
            "(version {}, {} tokens)",
            dictionary.version,
            dictionary.token_count()
        ))
    );

    let buckets: Vec<TokenBucket> = match cmd.bucket {
        Some(bucket) => vec![bucket],
        None => TokenBucket::ALL.to_vec(),
    };
    for bucket in buckets {
        let entries = dictionary.bucket(bucket);
        println!();
        println!("{}", subheader(&format!("{bucket} ({}):", entries.len())));
        if entries.is_empty() {
            println!("   {}", dim("(none)"));
        }
        for entry in entries {
            println!("   {}", describe_entry(&dictionary, bucket, entry));
        }
    }

    ExitCode::SUCCESS
}

/// One display line for a dictionary entry.
fn describe_entry(
    dictionary: &MatchingDictionary,
    bucket: TokenBucket,
    entry: &TokenEntry,
) -> String {
    let mut line = entry.token.clone();
    if entry.is_hard_negative {
        line.push(' ');
        line.push_str(&warning("[hard]"));
    }
    if bucket == TokenBucket::Positive {
        let lines = dictionary.product_lines(&entry.token);
        if !lines.is_empty() {
            line.push_str(&format!(" -> {}", format_lines(lines)));
        }
    }
    line.push(' ');
    line.push_str(&dim(&format!(
        "({}, {})",
        entry.source.as_str().to_lowercase(),
        entry.scope.as_str().to_lowercase()
    )));
    line
}

/// Adds tokens to a bucket, creating the dictionary if needed.
fn add(ctx: &CommandContext, cmd: &DictAddCommand) -> ExitCode {
    if cmd.hard && cmd.bucket != TokenBucket::Negative {
        eprintln!("error: --hard only applies to the negative bucket");
        return ExitCode::FAILURE;
    }
    if !cmd.lines.is_empty() && cmd.bucket != TokenBucket::Positive {
        eprintln!("error: --line only applies to the positive bucket");
        return ExitCode::FAILURE;
    }

    let mut tokens = cmd.tokens.clone();
    if let Some(path) = &cmd.file {
        match read_token_file(path) {
            Ok(from_file) => tokens.extend(from_file),
            Err(code) => return code,
        }
    }

    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let mut dictionary = match shared::load_dictionary(&store, &cmd.client) {
        Ok(loaded) => loaded.unwrap_or_default(),
        Err(code) => return code,
    };

    let summary = if cmd.hard {
        add_hard_negatives(&mut dictionary, &tokens)
    } else {
        dictionary.bulk_add(cmd.bucket, &tokens, TokenSource::Client)
    };

    if !cmd.lines.is_empty() {
        for token in &tokens {
            if normalize(token).is_empty() {
                continue;
            }
            if let Err(e) = dictionary.set_product_lines(token, &cmd.lines) {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Err(code) = shared::save_dictionary(&store, &cmd.client, &dictionary) {
        return code;
    }

    println!(
        "{} to {} {}",
        success(&format!("Added {}", summary.added)),
        cmd.bucket,
        dim(&format!("({} already present)", summary.duplicates))
    );
    for raw in &summary.rejected {
        println!(
            "   {}",
            warning(&format!("rejected '{raw}': empty after normalization"))
        );
    }
    print_warnings(&dictionary.validate());

    ExitCode::SUCCESS
}

/// Adds hard-negative entries, upgrading existing soft negatives.
fn add_hard_negatives(dictionary: &mut MatchingDictionary, tokens: &[String]) -> BulkAddSummary {
    let mut summary = BulkAddSummary::default();
    for raw in tokens {
        let entry = TokenEntry::new(raw).hard_negative();
        match dictionary.add_token(TokenBucket::Negative, entry) {
            Ok(true) => summary.added += 1,
            Ok(false) => summary.duplicates += 1,
            Err(_) => summary.rejected.push(raw.clone()),
        }
    }
    summary
}

/// Reads tokens from a file, one per line. Blank lines and `#` comments are skipped.
fn read_token_file(path: &Path) -> Result<Vec<String>, ExitCode> {
    let contents = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        ExitCode::FAILURE
    })?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Removes tokens from a bucket.
fn remove(ctx: &CommandContext, cmd: &DictRemoveCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let mut dictionary = match shared::require_dictionary(&store, &cmd.client) {
        Ok(dictionary) => dictionary,
        Err(code) => return code,
    };

    let mut removed = 0;
    for token in &cmd.tokens {
        if dictionary.remove_token(cmd.bucket, token) {
            removed += 1;
        } else {
            println!(
                "   {}",
                warning(&format!("'{token}' is not in {}", cmd.bucket))
            );
        }
    }

    if removed > 0
        && let Err(code) = shared::save_dictionary(&store, &cmd.client, &dictionary)
    {
        return code;
    }

    println!("Removed {removed} from {}", cmd.bucket);
    ExitCode::SUCCESS
}

/// Sets or clears the product lines of a positive token.
fn lines(ctx: &CommandContext, cmd: &DictLinesCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let mut dictionary = match shared::require_dictionary(&store, &cmd.client) {
        Ok(dictionary) => dictionary,
        Err(code) => return code,
    };

    if let Err(e) = dictionary.set_product_lines(&cmd.token, &cmd.lines) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(code) = shared::save_dictionary(&store, &cmd.client, &dictionary) {
        return code;
    }

    let token = normalize(&cmd.token);
    let mapped = dictionary.product_lines(&token);
    if mapped.is_empty() {
        println!("Cleared product lines for '{token}'");
    } else {
        println!("'{token}' -> {}", format_lines(mapped));
    }
    print_warnings(&dictionary.validate());

    ExitCode::SUCCESS
}

/// Checks a dictionary for conflicts. Exits with failure when there are warnings.
fn check(ctx: &CommandContext, cmd: &DictCheckCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let dictionary = match shared::require_dictionary(&store, &cmd.client) {
        Ok(dictionary) => dictionary,
        Err(code) => return code,
    };

    // Compiling catches tokens the matcher cannot handle
    if let Err(code) = shared::classifier(ctx, &store, &cmd.client) {
        return code;
    }

    let warnings = dictionary.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }
    print_warnings(&warnings);
    ExitCode::FAILURE
}

/// Prints dictionary warnings, if any.
fn print_warnings(warnings: &[DictionaryWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in warnings {
        println!("   {}", warning(&w.to_string()));
    }
}
