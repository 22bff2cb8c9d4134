//! Automated signal scoring
//!
//! Turns a [`DomainSignalSnapshot`](crate::signals::DomainSignalSnapshot)
//! into an advisory 0-100 score for each of the 14 ISO domains.

mod domains;
mod rules;
mod scorer;

pub use domains::IsoDomain;
pub use rules::{Adjustment, Condition, DomainRule, ScoringRules};
pub use scorer::{DomainScores, SignalScorer};
