//! Error types for the combiner and its checkpoint machinery.

use std::path::PathBuf;

use thiserror::Error;

use crate::checkpoint::LearnerId;


/// Errors surfaced by the combiner, its checkpoint manager,
/// and the sample readers.
///
/// None of these are recovered or retried internally;
/// every failure is propagated to the immediate caller.
#[derive(Debug, Error)]
pub enum CombinerError {
    /// A sub-learner failed while training or testing.
    #[error("{learner} failed during training/testing: {source}")]
    DelegateTraining {
        /// Which sub-learner failed.
        learner: LearnerId,
        /// The delegate's own error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The resolved checkpoint file does not exist.
    #[error("no checkpoint for {learner} at {path}")]
    CheckpointNotFound {
        /// The sub-learner whose checkpoint is missing.
        learner: LearnerId,
        /// The path that was probed.
        path: PathBuf,
    },

    /// The two loaded sub-learners report different stages
    /// and neither stopped early.
    #[error(
        "loaded checkpoints disagree on stage: \
         learner1 at stage {stage1}, learner2 at stage {stage2}"
    )]
    StageMismatch {
        /// Stage reported by the first sub-learner.
        stage1: usize,
        /// Stage reported by the second sub-learner.
        stage2: usize,
    },

    /// A sub-learner output rounds to something outside `{0, 1}`.
    #[error("sub-learner output {output} rounds to {rounded}, outside {{0, 1}}")]
    InvalidOutputRange {
        /// The raw output value.
        output: f64,
        /// The rounded value that fell out of range.
        rounded: f64,
    },

    /// A cost vector does not match the collector's field count.
    #[error("cost vector length mismatch: expected {expected}, got {got}")]
    CostLengthMismatch {
        /// Number of registered cost fields.
        expected: usize,
        /// Length of the offending vector.
        got: usize,
    },

    /// A dataset target is not one of the class indices `{0, 1, 2}`.
    #[error("target {target} at row {row} is not a class index in {{0, 1, 2}}")]
    InvalidTarget {
        /// Row of the offending sample.
        row: usize,
        /// The raw target value.
        target: f64,
    },

    /// A file or directory operation failed.
    #[error("i/o failed at {path}: {source}")]
    Io {
        /// The path involved in the failed operation.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A sample source could not be parsed.
    #[error("invalid sample data: {message}")]
    Data {
        /// What went wrong.
        message: String,
    },
}


/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, CombinerError>;
