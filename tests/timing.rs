use looporder::{Aggregation, aggregate, measure};
use proptest::prelude::*;

#[test]
fn test_median_odd() {
    assert_eq!(aggregate(&[5.0, 1.0, 3.0], Aggregation::Median), 3.0);
    assert_eq!(aggregate(&[0.7], Aggregation::Median), 0.7);
}

#[test]
fn test_median_even_takes_upper_middle() {
    assert_eq!(aggregate(&[4.0, 1.0, 3.0, 2.0], Aggregation::Median), 3.0);
    assert_eq!(aggregate(&[2.0, 1.0], Aggregation::Median), 2.0);
}

#[test]
fn test_median_ignores_outlier() {
    let samples = [0.010, 0.011, 0.012, 0.900, 0.010];
    assert_eq!(aggregate(&samples, Aggregation::Median), 0.011);
    assert!(aggregate(&samples, Aggregation::Mean) > 0.1);
}

#[test]
fn test_mean() {
    assert_eq!(aggregate(&[1.0, 2.0, 3.0, 6.0], Aggregation::Mean), 3.0);
    assert_eq!(aggregate(&[0.1, 0.1, 0.1], Aggregation::Mean), 0.1);
}

#[test]
#[should_panic(expected = "at least one sample")]
fn test_empty_samples_panic() {
    aggregate(&[], Aggregation::Median);
}

#[test]
fn test_measure_runs_exactly_repeats_times() {
    for repeats in [1, 2, 5] {
        let mut calls = 0;
        let t = measure(repeats, Aggregation::Median, || calls += 1);
        assert_eq!(calls, repeats);
        assert!(t >= 0.0);
    }
}

#[test]
fn test_measure_sees_sleep() {
    let t = measure(3, Aggregation::Mean, || {
        std::thread::sleep(std::time::Duration::from_millis(2))
    });
    assert!(t >= 0.002, "measured {t}s for a 2ms sleep");
}

#[test]
fn test_aggregation_parsing() {
    assert_eq!("MEDIAN".parse::<Aggregation>().unwrap(), Aggregation::Median);
    assert_eq!("mean".parse::<Aggregation>().unwrap(), Aggregation::Mean);
    assert!("mode".parse::<Aggregation>().is_err());
    assert_eq!(Aggregation::default(), Aggregation::Median);
}

proptest! {
    #[test]
    fn prop_median_is_a_sample(samples in prop::collection::vec(0.0f64..10.0, 1..40)) {
        let m = aggregate(&samples, Aggregation::Median);
        prop_assert!(samples.contains(&m));

        let below = samples.iter().filter(|&&x| x < m).count();
        let above = samples.iter().filter(|&&x| x > m).count();
        prop_assert!(below <= samples.len() / 2);
        prop_assert!(above <= samples.len() / 2);
    }

    #[test]
    fn prop_mean_within_range(samples in prop::collection::vec(0.0f64..10.0, 1..40)) {
        let m = aggregate(&samples, Aggregation::Mean);
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(min <= m && m <= max);
    }
}
