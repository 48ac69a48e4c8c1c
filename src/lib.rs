#![warn(missing_docs)]

//!
//! A crate that composes two binary boosting learners
//! into a pseudo three-class classifier.
//!
//! The actual boosting learners are external:
//! anything implementing [`SubLearner`] can be plugged in.
//! What this crate provides is the bookkeeping around them:
//!
//! - [`combine`], the fixed rule that fuses the two rounded
//!     binary outputs into a class in `{0, 1, 2}`,
//!     falling back to a configured confusion target when the
//!     outputs disagree in a way no real class explains.
//!
//! - [`MultiClassCombiner`], which trains the two sub-learners
//!     sequentially, computes combined predictions,
//!     and produces per-sample cost vectors
//!     (class errors, a 3x3 confusion block, a conflict flag,
//!     and the forwarded sub-learner costs)
//!     aggregated by [`VecStats`].
//!
//! - [`CheckpointManager`], which saves and restores the two
//!     independently staged sub-learner checkpoints under the
//!     `<learner>_stage=<N>.<ext>` filename convention,
//!     resuming from the latest stage found in the directory.

pub mod error;
pub mod sample;
pub mod learner;
pub mod checkpoint;
pub mod combiner;
pub mod stats;

pub mod prelude;


pub use error::{CombinerError, Result};

pub use sample::{Sample, SampleReader};

pub use learner::SubLearner;

pub use checkpoint::{
    CheckpointManager,
    LearnerId,
    encode_checkpoint_name,
    decode_checkpoint_name,
    latest_stage,
};

pub use combiner::{
    MultiClassCombiner,
    TestOutcome,
    Prediction,
    combine,
};

pub use stats::VecStats;
