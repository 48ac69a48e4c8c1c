//! A scripted sub-learner used across the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use triboost::prelude::*;
use triboost::error::CombinerError;


/// A stand-in for a binary boosting learner.
/// Outputs are scripted per row;
/// training just advances the stage counter.
/// Persists itself as JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptedLearner {
    pub outputs: Vec<f64>,
    pub stage: usize,
    pub nstages: usize,
    pub stopped_early: bool,
}


impl ScriptedLearner {
    pub fn new(outputs: Vec<f64>) -> Self {
        Self {
            outputs,
            stage: 0,
            nstages: 0,
            stopped_early: false,
        }
    }


    pub fn at_stage(mut self, stage: usize) -> Self {
        self.stage = stage;
        self
    }


    pub fn early_stopped(mut self) -> Self {
        self.stopped_early = true;
        self
    }
}


impl SubLearner for ScriptedLearner {
    fn train(&mut self, nstages: usize) -> Result<()> {
        self.nstages = nstages;
        self.stage = nstages;
        Ok(())
    }


    fn compute_output(&self, _sample: &Sample, row: usize) -> Result<f64> {
        Ok(self.outputs[row])
    }


    fn test_costs(
        &self,
        _sample: &Sample,
        _row: usize,
        output: f64,
        target: f64,
    ) -> Result<Vec<f64>>
    {
        let error = if output.round() == target { 0.0 } else { 1.0 };
        Ok(vec![error])
    }


    fn test_cost_names(&self) -> Vec<String> {
        vec![String::from("binary_class_error")]
    }


    fn stage(&self) -> usize {
        self.stage
    }


    fn num_stages(&self) -> usize {
        self.nstages
    }


    fn stopped_early(&self) -> bool {
        self.stopped_early
    }


    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| CombinerError::Data { message: e.to_string() })?;
        fs::write(path, json)
            .map_err(|source| CombinerError::Io {
                path: path.to_path_buf(),
                source,
            })
    }


    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|source| CombinerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&json)
            .map_err(|e| CombinerError::Data { message: e.to_string() })
    }
}


/// A sub-learner whose every operation fails,
/// the way a real boosting learner surfaces an internal error.
pub struct BrokenLearner {
    pub learner: LearnerId,
}


impl BrokenLearner {
    pub fn new(learner: LearnerId) -> Self {
        Self { learner }
    }


    fn failure(&self) -> CombinerError {
        CombinerError::DelegateTraining {
            learner: self.learner,
            source: "weak learner produced no hypothesis".into(),
        }
    }
}


impl SubLearner for BrokenLearner {
    fn train(&mut self, _nstages: usize) -> Result<()> {
        Err(self.failure())
    }


    fn compute_output(&self, _sample: &Sample, _row: usize) -> Result<f64> {
        Err(self.failure())
    }


    fn test_costs(
        &self,
        _sample: &Sample,
        _row: usize,
        _output: f64,
        _target: f64,
    ) -> Result<Vec<f64>>
    {
        Err(self.failure())
    }


    fn test_cost_names(&self) -> Vec<String> {
        vec![String::from("binary_class_error")]
    }


    fn stage(&self) -> usize {
        0
    }


    fn num_stages(&self) -> usize {
        0
    }


    fn stopped_early(&self) -> bool {
        false
    }


    fn save(&self, _path: &Path) -> Result<()> {
        Err(self.failure())
    }


    fn load(_path: &Path) -> Result<Self> {
        Err(CombinerError::DelegateTraining {
            learner: LearnerId::First,
            source: "weak learner produced no hypothesis".into(),
        })
    }
}


/// A three-class sample with one feature column.
/// Targets must take values in `{0, 1, 2}`.
pub fn three_class_sample(targets: &[f64]) -> Sample {
    let feature = (0..targets.len())
        .map(|i| i as f64)
        .collect::<Vec<_>>();

    Sample::from_columns(
        vec![(String::from("x"), feature)],
        targets.to_vec(),
    )
    .unwrap()
}
