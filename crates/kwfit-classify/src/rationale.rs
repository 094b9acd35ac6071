//! Rationale traces.
//!
//! A rationale lists every rule that fired, in evaluation order, so a reviewer can see why
//! a keyword received its status:
//!
//! `HardNeg:toy`, or `Brand:acme; Pos:twister; Amb:spindle[anchor:yarn]; Neg:rug; PL:TWISTING`

use kwfit_dictionary::ProductLine;

use crate::{FitStatus, Signals};

/// Rationale for a keyword that normalized to nothing.
pub(crate) const BLANK: &str = "Blank";

/// Rationale for a keyword on which no rule fired.
const NO_SIGNALS: &str = "NoSignals";

/// Renders the rationale for a decided keyword.
///
/// Ignore tokens never appear. The product line segment is present exactly when the status
/// receives a product line.
pub fn render_rationale(signals: &Signals, status: FitStatus, product_line: ProductLine) -> String {
    if status == FitStatus::Blank {
        return BLANK.to_string();
    }
    if let Some(token) = &signals.hard_negative {
        return format!("HardNeg:{token}");
    }

    let mut segments = Vec::new();
    if !signals.brand.is_empty() {
        segments.push(format!("Brand:{}", signals.brand.join(",")));
    }
    if !signals.positive.is_empty() {
        segments.push(format!("Pos:{}", signals.positive.join(",")));
    }
    if !signals.ambiguous.is_empty() {
        let anchor = if signals.is_anchored() {
            format!("anchor:{}", signals.anchors.join(","))
        } else {
            String::from("no-anchor")
        };
        segments.push(format!("Amb:{}[{anchor}]", signals.ambiguous.join(",")));
    }
    if !signals.negative.is_empty() {
        segments.push(format!("Neg:{}", signals.negative.join(",")));
    }
    if status.is_match() {
        segments.push(format!("PL:{product_line}"));
    }

    if segments.is_empty() {
        NO_SIGNALS.to_string()
    } else {
        segments.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn full_trace_order() {
        let signals = Signals {
            brand: strings(&["acme"]),
            positive: strings(&["twister", "yarn"]),
            ambiguous: strings(&["spindle"]),
            anchors: strings(&["yarn", "mill"]),
            negative: strings(&["rug"]),
            ignored: strings(&["best"]),
            score: 7.5,
            ..Signals::default()
        };
        assert_eq!(
            render_rationale(&signals, FitStatus::BrandKw, ProductLine::Twisting),
            "Brand:acme; Pos:twister,yarn; Amb:spindle[anchor:yarn,mill]; Neg:rug; PL:TWISTING"
        );
    }

    #[test]
    fn unanchored_ambiguous_is_marked() {
        let signals = Signals {
            ambiguous: strings(&["spindle", "bobbin"]),
            ..Signals::default()
        };
        assert_eq!(
            render_rationale(&signals, FitStatus::Review, ProductLine::None),
            "Amb:spindle,bobbin[no-anchor]"
        );
    }

    #[test]
    fn hard_negative_stands_alone() {
        let signals = Signals {
            hard_negative: Some("toy".into()),
            ..Signals::default()
        };
        assert_eq!(
            render_rationale(&signals, FitStatus::NoMatch, ProductLine::None),
            "HardNeg:toy"
        );
    }

    #[test]
    fn empty_traces() {
        let ignored = Signals {
            ignored: strings(&["best"]),
            ..Signals::default()
        };
        assert_eq!(
            render_rationale(&ignored, FitStatus::NoMatch, ProductLine::None),
            "NoSignals"
        );
        assert_eq!(
            render_rationale(&Signals::default(), FitStatus::Blank, ProductLine::None),
            "Blank"
        );
    }

    #[test]
    fn core_match_without_mapping_reports_none() {
        let signals = Signals {
            positive: strings(&["machine"]),
            score: 1.0,
            ..Signals::default()
        };
        assert_eq!(
            render_rationale(&signals, FitStatus::CoreMatch, ProductLine::None),
            "Pos:machine; PL:NONE"
        );
    }
}
