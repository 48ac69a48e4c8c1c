//! Provides the `SubLearner` trait.

use std::path::Path;

use crate::error::Result;
use crate::sample::Sample;
use crate::stats::VecStats;


/// The interface a binary sub-learner exposes to the combiner.
///
/// Implementors wrap an actual boosting learner;
/// this crate never looks inside.
/// A learner consumes a training set it owns or references internally
/// and produces, per input row, a scalar output in `[0.0, 1.0]`
/// that rounds to a binary label.
///
/// You need to implement everything except
/// [`SubLearner::compute_output_at_stage`] and [`SubLearner::test`],
/// which have sensible defaults.
pub trait SubLearner {
    /// Runs the learner for `nstages` boosting rounds.
    /// Implementations should surface their own failures as
    /// [`CombinerError::DelegateTraining`](crate::error::CombinerError::DelegateTraining);
    /// the combiner propagates them unchanged, never retried.
    fn train(&mut self, nstages: usize) -> Result<()>;


    /// Computes the scalar output for the `row`-th sample.
    /// The returned value is expected to lie in `[0.0, 1.0]`.
    fn compute_output(&self, sample: &Sample, row: usize) -> Result<f64>;


    /// Computes the scalar output using only
    /// the first `stage` boosting rounds.
    /// The default ignores `stage` and uses the full learner.
    fn compute_output_at_stage(
        &self,
        sample: &Sample,
        row: usize,
        _stage: usize,
    ) -> Result<f64>
    {
        self.compute_output(sample, row)
    }


    /// The learner's own test costs for one sample of
    /// its binary sub-problem.
    /// `output` is the value returned by
    /// [`SubLearner::compute_output`] for this row and
    /// `target` is the binary target in `{0.0, 1.0}`.
    /// The returned vector must have length
    /// `self.test_cost_names().len()` and keep its field order.
    fn test_costs(
        &self,
        sample: &Sample,
        row: usize,
        output: f64,
        target: f64,
    ) -> Result<Vec<f64>>;


    /// Ordered labels of the cost fields
    /// returned by [`SubLearner::test_costs`].
    fn test_cost_names(&self) -> Vec<String>;


    /// The number of boosting rounds completed so far.
    fn stage(&self) -> usize;


    /// The number of boosting rounds requested.
    fn num_stages(&self) -> usize;


    /// Whether training stopped before `num_stages` rounds
    /// because a weak learner reached zero training error.
    fn stopped_early(&self) -> bool;


    /// Persists the learner to `path`
    /// in its own serialization format.
    fn save(&self, path: &Path) -> Result<()>;


    /// Restores a learner from `path`.
    fn load(path: &Path) -> Result<Self>
        where Self: Sized;


    /// Tests the learner on a binary-labeled sample,
    /// updating `stats` with the cost vector of every row.
    /// Returns the per-row outputs and cost vectors.
    fn test(&self, sample: &Sample, stats: &mut VecStats)
        -> Result<(Vec<f64>, Vec<Vec<f64>>)>
    {
        let (n_sample, _) = sample.shape();
        let mut outputs = Vec::with_capacity(n_sample);
        let mut costs = Vec::with_capacity(n_sample);

        for row in 0..n_sample {
            let output = self.compute_output(sample, row)?;
            let target = sample.target()[row];
            let cost = self.test_costs(sample, row, output, target)?;

            stats.update(&cost)?;
            outputs.push(output);
            costs.push(cost);
        }
        Ok((outputs, costs))
    }
}
