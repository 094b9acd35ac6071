//! Shared rendering helpers for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Color, Row, Table, presets::UTF8_FULL_CONDENSED};
use kwfit_classify::FitStatus;
pub use kwfit_highlight::{
    Highlighter, Tone, dim, header, indent_content, paint, subheader, success, warning,
};
use kwfit_priority::PriorityTier;
use serde::Serialize;

/// Display tone of a fit status.
pub fn status_tone(status: FitStatus) -> Tone {
    match status {
        FitStatus::CoreMatch | FitStatus::BrandKw => Tone::Good,
        FitStatus::Review => Tone::Caution,
        FitStatus::NoMatch => Tone::Bad,
        FitStatus::Blank => Tone::Muted,
    }
}

/// Display tone of a priority tier.
pub fn tier_tone(tier: PriorityTier) -> Tone {
    match tier {
        PriorityTier::Immediate | PriorityTier::High => Tone::Good,
        PriorityTier::Medium => Tone::Caution,
        PriorityTier::Monitor => Tone::Muted,
        PriorityTier::Ignore => Tone::Bad,
    }
}

/// A fit status painted for terminal output.
pub fn status_label(status: FitStatus) -> String {
    paint(status.as_str(), status_tone(status))
}

/// A priority tier painted for terminal output.
pub fn tier_label(tier: PriorityTier) -> String {
    paint(tier.as_str(), tier_tone(tier))
}

/// A table cell colored by tone.
///
/// Table cells carry their color separately from the text so column widths stay correct.
pub fn toned_cell(text: &str, tone: Tone) -> Cell {
    let color = match tone {
        Tone::Good => Color::Green,
        Tone::Caution => Color::Yellow,
        Tone::Bad => Color::Red,
        Tone::Muted => Color::DarkGrey,
    };
    Cell::new(text).fg(color)
}

/// An empty table in the house style.
pub fn new_table<R: Into<Row>>(header: R) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header);
    table
}

/// Formats a score with two decimals.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}
