use triboost::prelude::*;

mod common;
use common::{BrokenLearner, ScriptedLearner, three_class_sample};


const N_CLASS: usize = 3;

// class errors (3) + confusion block (9) + train_time + conflict
// + predicted-class one-hot (3).
const N_BASE_COST: usize = 17;


fn conf_index(predicted: usize, target: usize) -> usize {
    3 + predicted * N_CLASS + target
}


/// Tests for `MultiClassCombiner::test` and its cost vector.
#[cfg(test)]
pub mod test_costs_tests {
    use super::*;

    #[test]
    fn cost_names_and_vector_lengths_agree() {
        // One sample per class; sub-learner outputs agree
        // with the targets everywhere.
        let sample = three_class_sample(&[0.0, 1.0, 2.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0, 1.0, 1.0]),
            ScriptedLearner::new(vec![0.0, 0.0, 1.0]),
        );

        let names = combiner.test_cost_names();
        assert_eq!(names.len(), N_BASE_COST + 2);
        assert_eq!(names[0], "class_error");
        assert_eq!(names[3], "conf_matrix_0_0");
        assert_eq!(names[11], "conf_matrix_2_2");
        assert_eq!(names[12], "train_time");
        assert_eq!(names[13], "conflict");
        assert_eq!(names[14], "class0");
        assert_eq!(names[17], "sublearner1.binary_class_error");
        assert_eq!(names[18], "sublearner2.binary_class_error");
        assert_eq!(combiner.output_size(), names.len());

        let outcome = combiner.test(&sample).unwrap();
        for cost in &outcome.costs {
            assert_eq!(cost.len(), names.len());
        }
        assert_eq!(outcome.stats.count(), 3);
        assert_eq!(outcome.stats.field_names(), &names[..]);
    }


    #[test]
    fn perfect_predictions_have_zero_error() {
        let sample = three_class_sample(&[0.0, 1.0, 2.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.1, 0.9, 0.8]),
            ScriptedLearner::new(vec![0.2, 0.3, 0.7]),
        );

        let outcome = combiner.test(&sample).unwrap();
        let classes = outcome.outputs.iter()
            .map(|p| p.class)
            .collect::<Vec<_>>();
        assert_eq!(classes, vec![0, 1, 2]);

        assert_eq!(outcome.stats.mean_of("class_error"), Some(0.0));
        assert_eq!(outcome.stats.mean_of("conflict"), Some(0.0));
    }


    #[test]
    fn confusion_block_is_one_hot_at_predicted_target() {
        // Target 2 but both learners vote "class 0 side":
        // predicted class is 0.
        let sample = three_class_sample(&[2.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0]),
            ScriptedLearner::new(vec![0.0]),
        );

        let outcome = combiner.test(&sample).unwrap();
        let cost = &outcome.costs[0];

        // class_error, |0 - 2|, (0 - 2)^2.
        assert_eq!(cost[0], 1.0);
        assert_eq!(cost[1], 2.0);
        assert_eq!(cost[2], 4.0);

        for p in 0..N_CLASS {
            for t in 0..N_CLASS {
                let expected =
                    if (p, t) == (0, 2) { 1.0 } else { 0.0 };
                assert_eq!(cost[conf_index(p, t)], expected);
            }
        }

        // Predicted-class one-hot.
        assert_eq!(&cost[14..17], &[1.0, 0.0, 0.0]);
    }


    #[test]
    fn conflict_flag_follows_the_confusion_branch() {
        // Row 0 takes the conflict branch (a=0, b=1),
        // row 1 does not.
        let sample = three_class_sample(&[0.0, 1.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.2, 0.9]),
            ScriptedLearner::new(vec![0.8, 0.1]),
        );

        let outcome = combiner.test(&sample).unwrap();
        assert!(outcome.outputs[0].conflict);
        assert!(!outcome.outputs[1].conflict);
        assert_eq!(outcome.costs[0][13], 1.0);
        assert_eq!(outcome.costs[1][13], 0.0);
        assert_eq!(outcome.stats.mean_of("conflict"), Some(0.5));
    }


    #[test]
    fn conflict_falls_back_to_the_confusion_target() {
        let sample = three_class_sample(&[1.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0]),
            ScriptedLearner::new(vec![1.0]),
        )
        .confusion_target(2);

        let outcome = combiner.test(&sample).unwrap();
        assert_eq!(outcome.outputs[0].class, 2);
        assert_eq!(outcome.costs[0][conf_index(2, 1)], 1.0);
    }


    #[test]
    fn out_of_range_confusion_target_leaves_the_block_empty() {
        let sample = three_class_sample(&[1.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0]),
            ScriptedLearner::new(vec![1.0]),
        )
        .confusion_target(5);

        let outcome = combiner.test(&sample).unwrap();
        assert_eq!(outcome.outputs[0].class, 5);

        let cost = &outcome.costs[0];
        assert!(cost[3..12].iter().all(|&c| c == 0.0));
        assert!(cost[14..17].iter().all(|&c| c == 0.0));
    }


    #[test]
    fn sub_learner_targets_are_recoded() {
        // True classes: 0, 1, 2.
        // learner1's binary targets are 0, 1, 1;
        // learner2's are 0, 0, 1.
        // Scripted outputs are right for learner1 on rows 0 and 2,
        // and right for learner2 everywhere.
        let sample = three_class_sample(&[0.0, 1.0, 2.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0, 0.0, 1.0]),
            ScriptedLearner::new(vec![0.0, 0.0, 1.0]),
        );

        let outcome = combiner.test(&sample).unwrap();
        let sub1 = outcome.costs.iter()
            .map(|c| c[17])
            .collect::<Vec<_>>();
        let sub2 = outcome.costs.iter()
            .map(|c| c[18])
            .collect::<Vec<_>>();

        assert_eq!(sub1, vec![0.0, 1.0, 0.0]);
        assert_eq!(sub2, vec![0.0, 0.0, 0.0]);
    }


    #[test]
    fn invalid_targets_are_rejected() {
        let sample = three_class_sample(&[3.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0]),
            ScriptedLearner::new(vec![0.0]),
        );

        let result = combiner.test(&sample);
        assert!(matches!(
            result,
            Err(CombinerError::InvalidTarget { row: 0, .. }),
        ));
    }


    #[test]
    fn out_of_range_sub_learner_outputs_fail_the_test() {
        let sample = three_class_sample(&[0.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![1.8]),
            ScriptedLearner::new(vec![0.0]),
        );

        let result = combiner.test(&sample);
        assert!(matches!(
            result,
            Err(CombinerError::InvalidOutputRange { .. }),
        ));
    }
}


/// Tests for the delegate-level test driver.
#[cfg(test)]
pub mod sub_learner_tests {
    use super::*;

    #[test]
    fn default_test_driver_aggregates_binary_costs() {
        // Binary targets; the learner is wrong on the last row.
        let sample = Sample::from_columns(
            vec![(String::from("x"), vec![0.0, 1.0, 2.0])],
            vec![0.0, 1.0, 1.0],
        )
        .unwrap();
        let learner = ScriptedLearner::new(vec![0.1, 0.8, 0.2]);

        let mut stats = VecStats::new(learner.test_cost_names());
        let (outputs, costs) = learner.test(&sample, &mut stats).unwrap();

        assert_eq!(outputs, vec![0.1, 0.8, 0.2]);
        assert_eq!(costs, vec![vec![0.0], vec![0.0], vec![1.0]]);
        let third = 1.0 / 3.0;
        let mean = stats.mean_of("binary_class_error").unwrap();
        assert!((mean - third).abs() < 1e-12);
    }
}


/// Tests that sub-learner failures surface unchanged.
#[cfg(test)]
pub mod failing_delegate_tests {
    use super::*;

    #[test]
    fn train_propagates_the_first_failure() {
        let mut combiner = MultiClassCombiner::init(
            BrokenLearner::new(LearnerId::First),
            BrokenLearner::new(LearnerId::Second),
        );

        let result = combiner.train(10);
        assert!(matches!(
            result,
            Err(CombinerError::DelegateTraining {
                learner: LearnerId::First,
                ..
            }),
        ));

        // The failed call left the combiner where it started.
        assert_eq!(combiner.stage(), 0);
    }


    #[test]
    fn test_propagates_delegate_failures() {
        let sample = three_class_sample(&[0.0]);
        let mut combiner = MultiClassCombiner::init(
            BrokenLearner::new(LearnerId::First),
            BrokenLearner::new(LearnerId::Second),
        );

        let result = combiner.test(&sample);
        assert!(matches!(
            result,
            Err(CombinerError::DelegateTraining {
                learner: LearnerId::First,
                ..
            }),
        ));
    }
}


/// Tests for the training bookkeeping.
#[cfg(test)]
pub mod train_tests {
    use super::*;

    #[test]
    fn train_advances_stage_to_the_maximum() {
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![]),
            ScriptedLearner::new(vec![]),
        );

        combiner.train(10).unwrap();
        assert_eq!(combiner.stage(), 10);
        assert_eq!(combiner.num_stages(), 10);
        assert_eq!(combiner.learner1().stage, 10);
        assert_eq!(combiner.learner2().stage, 10);

        let (train_time, _) = combiner.timing();
        assert!(train_time.as_secs_f64() >= 0.0);
    }


    #[test]
    fn train_time_is_reported_in_every_cost_vector() {
        let sample = three_class_sample(&[0.0]);
        let mut combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![0.0]),
            ScriptedLearner::new(vec![0.0]),
        );
        combiner.train(1).unwrap();

        let (train_time, _) = combiner.timing();
        let outcome = combiner.test(&sample).unwrap();
        assert_eq!(outcome.costs[0][12], train_time.as_secs_f64());
    }


    #[test]
    fn builder_keeps_its_configuration() {
        let combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![]),
            ScriptedLearner::new(vec![]),
        )
        .verbosity(2);

        assert_eq!(combiner.verbosity_level(), 2);
        assert_eq!(combiner.stage(), 0);
        assert_eq!(combiner.num_stages(), 0);
    }


    #[test]
    fn compute_output_at_stage_defaults_to_the_full_learner() {
        let sample = three_class_sample(&[1.0]);
        let combiner = MultiClassCombiner::init(
            ScriptedLearner::new(vec![1.0]),
            ScriptedLearner::new(vec![0.0]),
        );

        let full = combiner.compute_output(&sample, 0).unwrap();
        let staged = combiner
            .compute_output_at_stage(&sample, 0, 1)
            .unwrap();
        assert_eq!(full, staged);
    }
}
