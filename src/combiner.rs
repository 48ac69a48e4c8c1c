//! Provides the three-class combiner and its decision rule.

// The pure output-combination rule.
pub(crate) mod decision_rule;
// The combiner over two binary sub-learners.
pub(crate) mod multiclass;


pub use decision_rule::{Prediction, combine};
pub use multiclass::{MultiClassCombiner, TestOutcome};
