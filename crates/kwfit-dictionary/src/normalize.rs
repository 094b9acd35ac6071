//! Keyword and token normalization.

/// Normalizes a keyword or token for matching.
///
/// Lowercases, drops apostrophes, turns every other non-alphanumeric run into a single
/// space and trims. `"Heat-Setting  Machines!"` becomes `"heat setting machines"`, and
/// `"Men's"` becomes `"mens"`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut gap = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push(' ');
            }
            gap = false;
            out.extend(ch.to_lowercase());
        } else if !matches!(ch, '\'' | '\u{2019}') {
            gap = true;
        }
    }

    out
}
