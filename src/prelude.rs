//! Exports the combiner, its collaborator traits, and the common types.
//!
pub use crate::combiner::{
    // The combiner itself
    MultiClassCombiner,
    TestOutcome,

    // The pure decision rule
    Prediction,
    combine,
};


pub use crate::learner::SubLearner;


pub use crate::checkpoint::{
    CheckpointManager,
    LearnerId,
};


pub use crate::sample::{
    Sample,
    SampleReader,
};


pub use crate::stats::VecStats;


pub use crate::error::{
    CombinerError,
    Result,
};
