//! Nine-type vocabulary and assessment content.
//!
//! This crate holds everything the assessment engine treats as fixed data:
//!
//! - **Types**: [`TypeNumber`], [`Center`], [`InstinctType`] and the score
//!   vectors [`TypeScores`] and [`InstinctScores`]
//! - **Content pools**: scenarios, forced-choice pairs, instinct paragraph
//!   sets and health items, each with its per-answer scoring helper
//! - **Fingerprints**: SHA-256 over the serialized pools
//!
//! # Example
//!
//! ```
//! use typology::{score_ranking, ContentPools, RankingAnswer, DEFAULT_RANK_WEIGHTS};
//!
//! let pools = ContentPools::standard();
//! let scenario = &pools.scenarios[0];
//!
//! let mut answer = RankingAnswer::new();
//! answer.insert(scenario.responses[0].id.clone(), 1);
//!
//! let contribution = score_ranking(scenario, &answer, &DEFAULT_RANK_WEIGHTS);
//! assert!(contribution.total() > 0.0);
//! ```

pub mod fingerprint;
pub mod pools;
pub mod types;

// Re-export main types
pub use fingerprint::{compute_hash, fingerprint_pools};
pub use pools::*;
pub use types::*;
