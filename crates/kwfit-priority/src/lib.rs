//! Page priority scoring.
//!
//! Every crawled page gets a composite score from four components:
//!
//! - **traffic**: estimated traffic value normalized against the batch maximum
//! - **intent**: a fixed score per [`PageIntent`]
//! - **page type**: a fixed score per [`PageType`]
//! - **business relevance**: a [`BusinessRelevance`] level inferred from intent, page type
//!   and the SEO-relevance flag
//!
//! Pages are then tiered. Batch scoring ranks pages against each other so that the tier
//! distribution is fixed regardless of absolute scores; single pages, which have no batch
//! to rank against, fall back to fixed score thresholds. The two are separate
//! [`TierStrategy`](kwfit_config::TierStrategy) values and never stand in for each other.

#![warn(missing_docs)]

mod error;
mod page;
mod scorer;
mod tables;
mod tier;

pub use error::PriorityError;
pub use page::{DomainPageRecord, PageIntent, PageType};
pub use scorer::{PagePriority, PriorityBatch, PriorityScorer, ScoreBreakdown, normalize_etv};
pub use tables::{BusinessRelevance, infer_relevance};
pub use tier::{PriorityTier, percentile_tiers, threshold_tier};
