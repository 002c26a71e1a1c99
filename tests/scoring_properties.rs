//! Property tests for the scoring consistency laws.

use dagr_rs::{AnomalyScorer, DagrConfig};
use proptest::prelude::*;

fn default_scorer() -> AnomalyScorer {
    AnomalyScorer::new(&DagrConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn chi_square_is_the_sum_of_z_squared(
        counts in prop::collection::vec(0.0f64..5000.0, 366)
    ) {
        let report = default_scorer().score_days(&counts).unwrap();
        let sum: f64 = report.z_squared().iter().sum();
        prop_assert_eq!(report.chi_square, sum);
    }

    #[test]
    fn z_squared_is_the_exact_square_of_z(
        counts in prop::collection::vec(0.0f64..5000.0, 366)
    ) {
        let report = default_scorer().score_days(&counts).unwrap();
        for day in &report.days {
            prop_assert_eq!(day.z_squared, day.z_score * day.z_score);
            prop_assert!(day.z_squared >= 0.0);
        }
    }

    #[test]
    fn scoring_is_deterministic(
        counts in prop::collection::vec(0.0f64..5000.0, 366)
    ) {
        let scorer = default_scorer();
        let first = scorer.score_days(&counts).unwrap();
        let second = scorer.score_days(&counts).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn wrong_length_is_rejected(len in 0usize..366) {
        let counts = vec![0.0; len];
        prop_assert!(default_scorer().score_days(&counts).is_err());
    }

    #[test]
    fn significance_flags_follow_the_threshold(
        counts in prop::collection::vec(0.0f64..5000.0, 366)
    ) {
        let report = default_scorer().score_days(&counts).unwrap();
        for day in &report.days {
            prop_assert_eq!(day.significant, day.z_squared > report.critical_value);
        }
    }
}
