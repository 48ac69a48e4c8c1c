//! Provides [`MultiClassCombiner`],
//! a pseudo three-class classifier
//! built from two binary boosting learners.

use std::time::{Duration, Instant};

use colored::Colorize;
use tracing::{debug, info};

use crate::checkpoint::CheckpointManager;
use crate::error::{CombinerError, Result};
use crate::learner::SubLearner;
use crate::sample::Sample;
use crate::stats::VecStats;

use super::decision_rule::{Prediction, combine};


/// Number of real classes.
const N_CLASS: usize = 3;

/// Cost fields preceding the forwarded sub-learner costs:
/// 3 class errors, the flattened 3x3 confusion block,
/// train time, the conflict flag, and the predicted-class one-hot.
const N_BASE_COST: usize = 3 + N_CLASS * N_CLASS + 2 + N_CLASS;


/// Everything `MultiClassCombiner::test` produces:
/// the aggregated statistics,
/// the per-sample predictions,
/// and the per-sample cost vectors.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    /// Running mean/variance per cost field over all samples.
    pub stats: VecStats,
    /// One combined prediction per sample.
    pub outputs: Vec<Prediction>,
    /// One cost vector per sample,
    /// each of length `test_cost_names().len()`.
    pub costs: Vec<Vec<f64>>,
}


/// A three-class classifier composed of two binary sub-learners.
///
/// The first sub-learner separates class 0 from classes {1, 2};
/// the second separates classes {0, 1} from class 2.
/// Their rounded outputs are fused through the fixed table of
/// [`combine`]:
/// when the two votes are inconsistent with every real class,
/// the configured `confusion_target` (default 0) is predicted.
///
/// Training and testing are synchronous and single-threaded;
/// each combiner owns its two sub-learners exclusively.
///
/// # Example
/// ```no_run
/// use triboost::prelude::*;
///
/// # fn run<L: SubLearner>(learner1: L, learner2: L, sample: &Sample)
/// #     -> triboost::Result<()> {
/// let mut combiner = MultiClassCombiner::init(learner1, learner2)
///     .confusion_target(0)
///     .report_progress(true);
///
/// combiner.train(100)?;
/// let outcome = combiner.test(sample)?;
/// println!("class error: {:?}", outcome.stats.mean_of("class_error"));
/// # Ok(())
/// # }
/// ```
pub struct MultiClassCombiner<L> {
    learner1: L,
    learner2: L,

    // The class predicted on the (0, 1) conflict row of the table.
    confusion_target: usize,

    report_progress: bool,
    verbosity: u8,

    // Boosting rounds completed / requested.
    stage: usize,
    nstages: usize,

    // Accumulated wall-clock time.
    train_time: Duration,
    test_time: Duration,
}


impl<L> MultiClassCombiner<L> {
    /// Initialize the combiner over the two sub-learners.
    /// This method sets the parameters to their defaults:
    /// `confusion_target = 0`, no progress reporting, verbosity 0.
    pub fn init(learner1: L, learner2: L) -> Self {
        Self {
            learner1,
            learner2,
            confusion_target: 0,
            report_progress: false,
            verbosity: 0,
            stage: 0,
            nstages: 0,
            train_time: Duration::ZERO,
            test_time: Duration::ZERO,
        }
    }


    /// Set the class predicted when the sub-learners conflict.
    pub fn confusion_target(mut self, confusion_target: usize) -> Self {
        self.confusion_target = confusion_target;
        self
    }


    /// Set the flag for terminal progress reporting.
    /// Default is `false.`
    pub fn report_progress(mut self, flag: bool) -> Self {
        self.report_progress = flag;
        self
    }


    /// Set the verbosity level passed along to log events.
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }


    /// The configured verbosity level.
    pub fn verbosity_level(&self) -> u8 {
        self.verbosity
    }


    /// The first sub-learner.
    pub fn learner1(&self) -> &L {
        &self.learner1
    }


    /// The second sub-learner.
    pub fn learner2(&self) -> &L {
        &self.learner2
    }


    /// Boosting rounds completed so far,
    /// the maximum over the two sub-learners.
    pub fn stage(&self) -> usize {
        self.stage
    }


    /// Boosting rounds requested by the last `train` call.
    pub fn num_stages(&self) -> usize {
        self.nstages
    }


    /// Accumulated training and testing wall-clock time.
    pub fn timing(&self) -> (Duration, Duration) {
        (self.train_time, self.test_time)
    }
}


impl<L> MultiClassCombiner<L>
    where L: SubLearner,
{
    /// Trains the first sub-learner, then the second,
    /// each for `nstages` boosting rounds.
    /// Wall-clock time is accumulated into the combiner's
    /// `train_time` and reported as the `train_time` cost field.
    /// Afterwards `self.stage()` is the maximum of
    /// the two sub-learners' stages.
    /// A failure of either sub-learner is propagated unchanged.
    pub fn train(&mut self, nstages: usize) -> Result<()> {
        self.nstages = nstages;

        let now = Instant::now();
        info!(nstages, verbosity = self.verbosity, "training sub-learners");

        self.learner1.train(nstages)?;
        self.learner2.train(nstages)?;

        self.stage = self.learner1.stage().max(self.learner2.stage());
        self.train_time += now.elapsed();

        if self.report_progress {
            println!(
                "{} {} {}",
                "[train]".bold().green(),
                format!("[stage {:>4}]", self.stage).bold(),
                format!("[{:>8.2}s]", self.train_time.as_secs_f64()),
            );
        }
        debug!(
            stage = self.stage,
            elapsed = self.train_time.as_secs_f64(),
            verbosity = self.verbosity,
            "training finished",
        );
        Ok(())
    }


    /// Computes the combined prediction for the `row`-th sample.
    pub fn compute_output(&self, sample: &Sample, row: usize)
        -> Result<Prediction>
    {
        let output1 = self.learner1.compute_output(sample, row)?;
        let output2 = self.learner2.compute_output(sample, row)?;
        combine(output1, output2, self.confusion_target)
    }


    /// Computes the combined prediction for the `row`-th sample,
    /// using only the first `stage` boosting rounds
    /// of each sub-learner.
    pub fn compute_output_at_stage(
        &self,
        sample: &Sample,
        row: usize,
        stage: usize,
    ) -> Result<Prediction>
    {
        let output1 = self.learner1
            .compute_output_at_stage(sample, row, stage)?;
        let output2 = self.learner2
            .compute_output_at_stage(sample, row, stage)?;
        combine(output1, output2, self.confusion_target)
    }


    /// Ordered labels of the cost fields produced by
    /// [`MultiClassCombiner::test`].
    pub fn test_cost_names(&self) -> Vec<String> {
        let mut names = vec![
            "class_error".to_string(),
            "linear_class_error".to_string(),
            "square_class_error".to_string(),
        ];
        for i in 0..N_CLASS {
            for j in 0..N_CLASS {
                names.push(format!("conf_matrix_{i}_{j}"));
            }
        }
        names.push("train_time".to_string());
        names.push("conflict".to_string());
        for k in 0..N_CLASS {
            names.push(format!("class{k}"));
        }

        for c in self.learner1.test_cost_names() {
            names.push(format!("sublearner1.{c}"));
        }
        for c in self.learner2.test_cost_names() {
            names.push(format!("sublearner2.{c}"));
        }
        names
    }


    /// The length of every cost vector,
    /// `self.test_cost_names().len()`.
    pub fn output_size(&self) -> usize {
        self.test_cost_names().len()
    }


    /// The combiner's own cost fields for one prediction,
    /// without the forwarded sub-learner costs.
    fn base_costs(&self, prediction: &Prediction, target: usize)
        -> Vec<f64>
    {
        let p = prediction.class;
        let diff = p as f64 - target as f64;

        let mut costs = Vec::with_capacity(N_BASE_COST);
        costs.push(if p != target { 1.0 } else { 0.0 });
        costs.push(diff.abs());
        costs.push(diff * diff);

        // Flattened confusion contribution at (predicted, target).
        // A confusion target outside the real classes has no cell;
        // its rows leave the block all-zero.
        let block = costs.len();
        costs.resize(block + N_CLASS * N_CLASS, 0.0);
        if p < N_CLASS {
            costs[block + p * N_CLASS + target] = 1.0;
        }

        costs.push(self.train_time.as_secs_f64());
        costs.push(if prediction.conflict { 1.0 } else { 0.0 });

        let one_hot = costs.len();
        costs.resize(one_hot + N_CLASS, 0.0);
        if p < N_CLASS {
            costs[one_hot + p] = 1.0;
        }
        costs
    }


    /// Tests the combiner on `sample`.
    ///
    /// For each row this computes the combined prediction,
    /// builds the cost vector
    /// (class errors, confusion block, train time, conflict flag,
    /// predicted-class one-hot,
    /// then both sub-learners' own costs
    /// against their recoded binary targets),
    /// and folds it into a running [`VecStats`] collector.
    ///
    /// The binary target of the first sub-learner is 0
    /// only when the true class is 0;
    /// the second sub-learner's is 1 only when the true class is 2.
    ///
    /// Targets outside `{0, 1, 2}` fail with
    /// [`CombinerError::InvalidTarget`].
    pub fn test(&mut self, sample: &Sample) -> Result<TestOutcome> {
        let now = Instant::now();

        let names = self.test_cost_names();
        let n_cost = names.len();
        let mut stats = VecStats::new(names);

        let (n_sample, _) = sample.shape();
        let mut outputs = Vec::with_capacity(n_sample);
        let mut costs = Vec::with_capacity(n_sample);

        for row in 0..n_sample {
            let raw_target = sample.target()[row];
            if !(raw_target == 0.0 || raw_target == 1.0 || raw_target == 2.0)
            {
                return Err(CombinerError::InvalidTarget {
                    row,
                    target: raw_target,
                });
            }
            let target = raw_target as usize;

            let prediction = self.compute_output(sample, row)?;
            let mut cost = self.base_costs(&prediction, target);

            // Recode the 3-class target
            // for the two binary sub-problems.
            let target1 = if target == 0 { 0.0 } else { 1.0 };
            let target2 = if target == 2 { 1.0 } else { 0.0 };

            cost.extend(self.learner1.test_costs(
                sample, row, prediction.output1, target1,
            )?);
            cost.extend(self.learner2.test_costs(
                sample, row, prediction.output2, target2,
            )?);

            if cost.len() != n_cost {
                return Err(CombinerError::CostLengthMismatch {
                    expected: n_cost,
                    got: cost.len(),
                });
            }

            stats.update(&cost)?;
            outputs.push(prediction);
            costs.push(cost);
        }

        self.test_time += now.elapsed();
        if self.report_progress {
            println!(
                "{} {} {}",
                "[test]".bold().yellow(),
                format!("[{n_sample:>6} samples]").bold(),
                format!("[{:>8.2}s]", self.test_time.as_secs_f64()),
            );
        }
        debug!(
            n_sample,
            elapsed = self.test_time.as_secs_f64(),
            verbosity = self.verbosity,
            "testing finished",
        );

        Ok(TestOutcome { stats, outputs, costs })
    }


    /// Writes a checkpoint pair for the current stage
    /// through `manager`.
    pub fn save(&self, manager: &CheckpointManager) -> Result<()> {
        manager.save(&self.learner1, &self.learner2, self.stage)?;
        Ok(())
    }


    /// Replaces the two sub-learners with a checkpointed pair.
    ///
    /// When a stage is `None` it is resolved independently
    /// per sub-learner as the latest stage found in the directory.
    /// Unless one of the loaded learners stopped early
    /// on a zero-error weak learner,
    /// the two resolved stages must agree;
    /// a disagreement fails with [`CombinerError::StageMismatch`].
    /// After a successful load,
    /// the combiner's `stage` and `nstages`
    /// mirror the first sub-learner's values.
    pub fn load_old_learner(
        &mut self,
        manager: &CheckpointManager,
        stage1: Option<usize>,
        stage2: Option<usize>,
    ) -> Result<()>
    {
        let (learner1, learner2, stage1, stage2) =
            manager.load_pair::<L>(stage1, stage2)?;

        if !learner1.stopped_early()
            && !learner2.stopped_early()
            && learner1.stage() != learner2.stage()
        {
            return Err(CombinerError::StageMismatch {
                stage1: learner1.stage(),
                stage2: learner2.stage(),
            });
        }

        info!(stage1, stage2, "restored sub-learners from checkpoints");

        self.stage = learner1.stage();
        self.nstages = learner1.num_stages();
        self.learner1 = learner1;
        self.learner2 = learner2;
        Ok(())
    }
}
