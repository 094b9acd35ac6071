//! Implementation of `kwfit priority`.

use std::{collections::HashMap, process::ExitCode};

use comfy_table::Cell;
use kwfit_priority::{DomainPageRecord, PriorityBatch, PriorityScorer};

use crate::cli::{
    args::PriorityCommand,
    context::CommandContext,
    output::{
        dim, format_score, new_table, print_json, subheader, tier_label, tier_tone, toned_cell,
    },
};

/// Scores and tiers a client's pages, optionally writing the results back.
pub fn run(ctx: &CommandContext, cmd: &PriorityCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let mut pages = match store.load_pages(&cmd.client) {
        Ok(pages) => pages,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if pages.is_empty() {
        if cmd.json {
            return print_json(&serde_json::json!({ "pages": {} }));
        }
        println!("{}", dim("No pages found."));
        return ExitCode::SUCCESS;
    }

    let scorer = PriorityScorer::new(ctx.config.priority.clone());
    let strategy = cmd.strategy.unwrap_or(ctx.config.priority.tier_strategy);
    let batch = match scorer.score_batch_with(&pages, strategy) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.write {
        let updated = batch.apply(&mut pages);
        if let Err(e) = store.save_pages(&cmd.client, &pages) {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        if !cmd.json {
            println!("Updated {updated} page records");
            println!();
        }
    }

    if cmd.json {
        return print_json(&batch);
    }

    print_batch(&batch, &pages, cmd.limit);
    ExitCode::SUCCESS
}

/// Prints the ranked pages and the tier distribution.
fn print_batch(batch: &PriorityBatch, pages: &[DomainPageRecord], limit: Option<usize>) {
    let urls: HashMap<&str, &str> = pages
        .iter()
        .filter_map(|p| p.url.as_deref().map(|url| (p.id.as_str(), url)))
        .collect();

    let mut table = new_table([
        "Rank",
        "Page",
        "Score",
        "Tier",
        "Traffic",
        "Intent",
        "Type",
        "Relevance",
    ]);
    for (id, result) in batch.ranked().into_iter().take(limit.unwrap_or(usize::MAX)) {
        let b = &result.breakdown;
        table.add_row(vec![
            Cell::new(result.rank),
            Cell::new(urls.get(id).copied().unwrap_or(id)),
            Cell::new(format_score(result.score)),
            toned_cell(result.tier.as_str(), tier_tone(result.tier)),
            Cell::new(format_score(b.traffic)),
            Cell::new(format_score(b.intent)),
            Cell::new(format_score(b.page_type)),
            Cell::new(b.business_relevance.as_str()),
        ]);
    }
    println!("{table}");

    println!();
    println!(
        "{} {}",
        subheader("Tiers"),
        dim(&format!("({})", batch.strategy))
    );
    for (tier, count) in batch.tier_counts() {
        println!("   {:<28} {count}", tier_label(tier));
    }
}
