//! Keyword fit classification.
//!
//! Classification runs in three stages over a normalized keyword:
//!
//! 1. **Matching**: each dictionary token is tested against the keyword. Short tokens match
//!    on word boundaries, longer tokens as substrings ([`TokenMatcher`]).
//! 2. **Scoring**: matches are collected per bucket and summed with the configured weights
//!    into [`Signals`]. A matching hard negative short-circuits everything else.
//! 3. **Deciding**: the score and match composition are mapped to a [`FitStatus`] through a
//!    fixed decision table, a product line is assigned for matched keywords, and a
//!    rationale trace is rendered.
//!
//! [`Classifier`] bundles a compiled dictionary with its scoring policy and is cheap to
//! share across threads.

#![warn(missing_docs)]

mod classifier;
mod compiled;
mod decide;
mod error;
mod matcher;
mod rationale;
mod score;

pub use classifier::{Classification, Classifier};
pub use compiled::CompiledDictionary;
pub use decide::{FitStatus, assign_product_line, decide};
pub use error::ClassifyError;
pub use matcher::{TokenMatcher, is_match};
pub use rationale::render_rationale;
pub use score::{Signals, score};
