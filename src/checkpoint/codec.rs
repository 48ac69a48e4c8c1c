//! Encodes and decodes checkpoint filenames.
//!
//! A checkpoint pair consists of two files named
//! `learner1_stage=<N>.<ext>` and `learner2_stage=<N>.<ext>`.
//! The codec is pure string manipulation;
//! directory listings are injected by the caller
//! so that stage resolution is testable without a filesystem.

use std::fmt;

use serde::{Serialize, Deserialize};


const STAGE_MARKER: &str = "_stage=";


/// Identifies one of the two sub-learners of a combiner.
/// [`LearnerId::First`] distinguishes class 0 vs. classes {1, 2},
/// [`LearnerId::Second`] distinguishes classes {0, 1} vs. class 2.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerId {
    /// The first sub-learner (`learner1` in checkpoint filenames).
    First,
    /// The second sub-learner (`learner2` in checkpoint filenames).
    Second,
}


impl LearnerId {
    /// The filename prefix for this sub-learner.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::First => "learner1",
            Self::Second => "learner2",
        }
    }
}


impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}


/// Builds the checkpoint filename for `learner` at `stage`,
/// e.g. `encode_checkpoint_name(LearnerId::First, 7, "json")`
/// returns `"learner1_stage=7.json"`.
pub fn encode_checkpoint_name(
    learner: LearnerId,
    stage: usize,
    extension: &str,
) -> String
{
    format!("{}{STAGE_MARKER}{stage}.{extension}", learner.prefix())
}


/// Parses a checkpoint filename back into `(learner, stage)`.
/// Returns `None` for anything that does not match the
/// `<prefix>_stage=<N>.<ext>` pattern exactly.
pub fn decode_checkpoint_name(
    name: &str,
    extension: &str,
) -> Option<(LearnerId, usize)>
{
    let stem = name.strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))?;

    let (prefix, stage) = stem.split_once(STAGE_MARKER)?;

    let learner = match prefix {
        "learner1" => LearnerId::First,
        "learner2" => LearnerId::Second,
        _ => return None,
    };

    let stage = stage.parse::<usize>().ok()?;
    Some((learner, stage))
}


/// Scans filenames for checkpoints of `learner`
/// and returns the maximum stage found, if any.
/// This is the "latest checkpoint" resolution policy.
pub fn latest_stage<I, S>(
    names: I,
    learner: LearnerId,
    extension: &str,
) -> Option<usize>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>,
{
    names.into_iter()
        .filter_map(|name| decode_checkpoint_name(name.as_ref(), extension))
        .filter_map(|(id, stage)| (id == learner).then_some(stage))
        .max()
}
