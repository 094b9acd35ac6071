//! Implementation of `kwfit tags`.

use std::{collections::BTreeMap, process::ExitCode};

use comfy_table::Cell;
use kwfit_tagger::{KeywordTag, TagStore};

use crate::cli::{
    args::TagsCommand,
    context::CommandContext,
    output::{dim, format_score, new_table, print_json, status_label, status_tone, toned_cell},
};

/// Placeholder for fields a tag does not carry yet.
const UNSET: &str = "-";

/// Lists a client's stored tags in keyword order.
///
/// Entries that only hold other tools' fields are listed with empty kwfit columns.
pub fn run(ctx: &CommandContext, cmd: &TagsCommand) -> ExitCode {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let tags = match store.load_tags(&cmd.client) {
        Ok(tags) => tags,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let selected: Vec<(&str, &KeywordTag)> = tags
        .iter()
        .filter(|(_, tag)| cmd.status.is_none_or(|s| tag.fit_status == Some(s)))
        .take(cmd.limit.unwrap_or(usize::MAX))
        .collect();

    if cmd.json {
        let json: BTreeMap<&str, &KeywordTag> = selected.into_iter().collect();
        return print_json(&json);
    }

    if selected.is_empty() {
        println!("{}", dim("No tags found."));
        return ExitCode::SUCCESS;
    }

    let mut table = new_table([
        "Keyword",
        "Status",
        "Product line",
        "Score",
        "Rationale",
        "Updated",
    ]);
    for (keyword, tag) in &selected {
        let status = match tag.fit_status {
            Some(status) => toned_cell(status.as_str(), status_tone(status)),
            None => Cell::new(UNSET),
        };
        table.add_row(vec![
            Cell::new(keyword),
            status,
            Cell::new(tag.product_line.map_or(UNSET, |line| line.as_str())),
            Cell::new(tag.score.map_or_else(|| UNSET.to_string(), format_score)),
            Cell::new(tag.rationale.as_deref().unwrap_or(UNSET)),
            Cell::new(tag.updated_at.map_or_else(
                || UNSET.to_string(),
                |at| at.format("%Y-%m-%d %H:%M").to_string(),
            )),
        ]);
    }
    println!("{table}");

    let summary: Vec<String> = tags
        .status_counts()
        .into_iter()
        .map(|(status, count)| format!("{} {count}", status_label(status)))
        .collect();
    println!(
        "{} {}",
        dim(&format!("{} of {} tags:", selected.len(), tags.len())),
        summary.join("  ")
    );

    ExitCode::SUCCESS
}
