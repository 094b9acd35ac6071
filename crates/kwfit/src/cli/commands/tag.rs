//! Implementation of `kwfit tag`.

use std::process::ExitCode;

use kwfit_classify::FitStatus;
use kwfit_tagger::{KeywordFilter, TagRunReport, Tagger};

use crate::cli::{
    args::TagCommand,
    context::CommandContext,
    output::{dim, print_json, status_label, subheader, success, warning},
};

/// Tags a client's stored keywords and merges the verdicts into its tags.
pub fn run(ctx: &CommandContext, cmd: &TagCommand) -> ExitCode {
    let filter = match build_filter(ctx, cmd) {
        Ok(filter) => filter,
        Err(code) => return code,
    };
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };

    let tagger =
        Tagger::new(&store, &ctx.config).parallel(ctx.config.settings.parallel || cmd.parallel);
    let report = match tagger.tag_all(&cmd.client, &filter) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&report);
    }
    print_report(&cmd.client, &report);
    ExitCode::SUCCESS
}

/// Combines command-line filters with the client's configured defaults.
///
/// A flag replaces the matching default rather than narrowing it.
fn build_filter(ctx: &CommandContext, cmd: &TagCommand) -> Result<KeywordFilter, ExitCode> {
    if cmd.all {
        return Ok(KeywordFilter::all());
    }

    let client = ctx.client(&cmd.client);
    let location = cmd
        .location
        .as_deref()
        .or_else(|| client.and_then(|c| c.location.as_deref()));
    let domains: &[String] = if cmd.domains.is_empty() {
        client.map(|c| c.domains.as_slice()).unwrap_or_default()
    } else {
        &cmd.domains
    };

    KeywordFilter::new(location, domains).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}

/// Prints a human-readable run summary.
fn print_report(client: &str, report: &TagRunReport) {
    println!(
        "{} {}",
        subheader(&format!("Tagged {client}")),
        dim(&format!("(run {})", report.model_run_id))
    );

    if report.unique_keywords == 0 {
        println!("   {}", dim("No keywords matched; tags were not changed."));
        return;
    }

    println!(
        "   {} keywords, {} unique, {} classified",
        report.total_keywords,
        report.unique_keywords,
        report.classified()
    );
    println!(
        "   {} inserted, {} updated",
        success(&report.inserted.to_string()),
        report.updated
    );
    println!();

    println!("{}", subheader("Fit status:"));
    for status in FitStatus::ALL {
        let count = report.status_counts.get(&status).copied().unwrap_or(0);
        if count > 0 {
            println!("   {:<12} {count}", status_label(status));
        }
    }

    if !report.sample_rationale.is_empty() {
        println!();
        println!("{}", subheader("Sample rationale:"));
        for sample in &report.sample_rationale {
            println!(
                "   {} {} {}",
                sample.keyword,
                status_label(sample.fit_status),
                dim(&sample.rationale)
            );
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!(
            "{}",
            subheader(&format!("Skipped ({}):", report.failures.len()))
        );
        for failure in &report.failures {
            println!(
                "   {}",
                warning(&format!("{}: {}", failure.keyword, failure.error))
            );
        }
    }
}
