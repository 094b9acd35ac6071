//! Implementation of `kwfit classify`.

use std::process::ExitCode;

use comfy_table::Cell;
use kwfit_classify::{Classification, Signals};
use serde::Serialize;

use super::shared;
use crate::cli::{
    args::ClassifyCommand,
    context::CommandContext,
    output::{dim, format_score, header, new_table, print_json, status_tone, toned_cell},
};

/// JSON output for one classified keyword.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonClassification<'a> {
    /// Keyword as given on the command line.
    keyword: &'a str,
    /// The verdict.
    #[serde(flatten)]
    result: &'a Classification,
}

/// Classifies ad-hoc keywords against a client's dictionary. Nothing is stored.
pub fn run(ctx: &CommandContext, cmd: &ClassifyCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let classifier = match shared::classifier(ctx, &store, &cmd.client) {
        Ok(classifier) => classifier,
        Err(code) => return code,
    };

    let mut results = Vec::with_capacity(cmd.keywords.len());
    let mut failed = false;
    for keyword in &cmd.keywords {
        match classifier.classify(keyword) {
            Ok(result) => results.push((keyword.as_str(), result)),
            Err(e) => {
                eprintln!("error: '{keyword}': {e}");
                failed = true;
            }
        }
    }

    let code = if cmd.json {
        let json: Vec<_> = results
            .iter()
            .map(|(keyword, result)| JsonClassification { keyword, result })
            .collect();
        print_json(&json)
    } else {
        print_results(&results, cmd.signals);
        ExitCode::SUCCESS
    };

    if failed { ExitCode::FAILURE } else { code }
}

/// Renders verdicts as a table, optionally followed by their signals.
fn print_results(results: &[(&str, Classification)], show_signals: bool) {
    let mut table = new_table(["Keyword", "Status", "Product line", "Score", "Rationale"]);
    for (keyword, result) in results {
        table.add_row(vec![
            Cell::new(keyword),
            toned_cell(result.fit_status.as_str(), status_tone(result.fit_status)),
            Cell::new(result.product_line.as_str()),
            Cell::new(format_score(result.score)),
            Cell::new(&result.rationale),
        ]);
    }
    println!("{table}");

    if show_signals {
        for (keyword, result) in results {
            println!();
            println!("{}", header(keyword));
            print_signals(&result.signals);
        }
    }
}

/// Prints the per-bucket matches behind a verdict.
fn print_signals(signals: &Signals) {
    if let Some(token) = &signals.hard_negative {
        println!("   hard negative: {token}");
    }
    let rows = [
        ("brand", &signals.brand),
        ("positive", &signals.positive),
        ("ambiguous", &signals.ambiguous),
        ("anchors", &signals.anchors),
        ("negative", &signals.negative),
        ("ignored", &signals.ignored),
    ];
    for (label, tokens) in rows {
        if tokens.is_empty() {
            println!("   {label}: {}", dim("-"));
        } else {
            println!("   {label}: {}", tokens.join(", "));
        }
    }
}
