//! kwfit: keyword fit classification for SEO work.
//!
//! kwfit decides whether search keywords fit a client's business. Each client owns a
//! token dictionary (brand, positive, negative, ambiguous, anchor and ignore buckets) and
//! every keyword is classified deterministically against it: a fit status, a product line
//! and a rationale string that traces the rules that fired. Batch runs tag a client's
//! whole keyword set and merge the verdicts into stored tags. A separate priority scorer
//! ranks a client's pages and sorts them into five tiers.

#![warn(missing_docs)]

pub mod cli;
