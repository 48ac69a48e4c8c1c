//! Saves and restores checkpoint pairs for a combiner.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CombinerError, Result};
use crate::learner::SubLearner;
use super::codec::{LearnerId, encode_checkpoint_name, latest_stage};


const DEFAULT_EXTENSION: &str = "json";


/// Manages the checkpoint directory of a combiner.
///
/// A checkpoint pair is valid only if both files exist.
/// When no explicit stage is given at load time,
/// the stage for each sub-learner is resolved independently
/// as the maximum stage encoded in the directory's filenames.
///
/// The directory scan is not protected against concurrent writers:
/// two processes checkpointing into the same directory can race
/// the "latest stage" resolution. Known limitation.
///
/// # Example
/// ```no_run
/// use triboost::CheckpointManager;
///
/// let manager = CheckpointManager::new("./checkpoints")
///     .extension("psave");
/// ```
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
    extension: String,
}


impl CheckpointManager {
    /// Creates a manager rooted at `dir`.
    /// The default filename extension is `json`;
    /// override it with [`CheckpointManager::extension`]
    /// to match the delegate learners' own serialization format.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }


    /// Sets the filename extension used for checkpoint files.
    pub fn extension<S: AsRef<str>>(mut self, extension: S) -> Self {
        self.extension = extension.as_ref().to_string();
        self
    }


    /// The checkpoint directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }


    /// The full path of the checkpoint file
    /// for `learner` at `stage`.
    pub fn checkpoint_path(&self, learner: LearnerId, stage: usize)
        -> PathBuf
    {
        let name = encode_checkpoint_name(learner, stage, &self.extension);
        self.dir.join(name)
    }


    /// Lists the filenames currently present in the directory.
    fn listing(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|source| CombinerError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CombinerError::Io {
                path: self.dir.clone(),
                source,
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }


    /// Resolves the latest checkpointed stage for `learner`,
    /// or `None` if the directory holds no matching file.
    pub fn latest_stage(&self, learner: LearnerId) -> Result<Option<usize>> {
        let names = self.listing()?;
        Ok(latest_stage(names, learner, &self.extension))
    }


    /// Writes the checkpoint pair for `stage`.
    /// Creates the directory if absent.
    /// Both writes must succeed;
    /// a failure on either file fails the whole operation,
    /// since a partial pair corrupts later stage resolution.
    pub fn save<L>(&self, learner1: &L, learner2: &L, stage: usize)
        -> Result<(PathBuf, PathBuf)>
        where L: SubLearner,
    {
        fs::create_dir_all(&self.dir)
            .map_err(|source| CombinerError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path1 = self.checkpoint_path(LearnerId::First, stage);
        let path2 = self.checkpoint_path(LearnerId::Second, stage);

        learner1.save(&path1)?;
        learner2.save(&path2)?;

        info!(
            stage,
            dir = %self.dir.display(),
            "wrote checkpoint pair",
        );
        Ok((path1, path2))
    }


    /// Resolves the stage for `learner`,
    /// preferring the explicit `stage` when given.
    fn resolve_stage(&self, learner: LearnerId, stage: Option<usize>)
        -> Result<usize>
    {
        match stage {
            Some(stage) => Ok(stage),
            None => {
                self.latest_stage(learner)?
                    .ok_or_else(|| CombinerError::CheckpointNotFound {
                        learner,
                        path: self.dir.clone(),
                    })
            },
        }
    }


    /// Loads the checkpoint pair,
    /// auto-detecting each sub-learner's stage when not given.
    /// Returns the two restored learners
    /// together with the stages they were resolved at.
    ///
    /// Fails with [`CombinerError::CheckpointNotFound`]
    /// if either resolved file does not exist.
    pub fn load_pair<L>(
        &self,
        stage1: Option<usize>,
        stage2: Option<usize>,
    ) -> Result<(L, L, usize, usize)>
        where L: SubLearner,
    {
        let stage1 = self.resolve_stage(LearnerId::First, stage1)?;
        let stage2 = self.resolve_stage(LearnerId::Second, stage2)?;

        let path1 = self.checkpoint_path(LearnerId::First, stage1);
        let path2 = self.checkpoint_path(LearnerId::Second, stage2);

        for (learner, path) in [
            (LearnerId::First, &path1),
            (LearnerId::Second, &path2),
        ]
        {
            if !path.exists() {
                return Err(CombinerError::CheckpointNotFound {
                    learner,
                    path: path.clone(),
                });
            }
        }

        debug!(
            stage1, stage2,
            dir = %self.dir.display(),
            "loading checkpoint pair",
        );
        let learner1 = L::load(&path1)?;
        let learner2 = L::load(&path2)?;

        Ok((learner1, learner2, stage1, stage2))
    }
}
