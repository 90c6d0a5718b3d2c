use looporder::{
    Aggregation, BenchError, FillPolicy, LoopOrder, Repeats, SweepConfig, TimingSample,
    best_order, gflops, run_sweep,
};

fn small_config(sizes: Vec<usize>) -> SweepConfig {
    SweepConfig {
        sizes,
        repeats: Repeats::Uniform(1),
        ..SweepConfig::default()
    }
}

fn sample(order: LoopOrder, seconds: f64) -> TimingSample {
    TimingSample { order, size: 64, seconds }
}

// ============================================================
// Configuration validation
// ============================================================

#[test]
fn test_defaults_are_valid() {
    let config = SweepConfig::default();
    assert_eq!(config.sizes, [128, 256, 384, 512, 640]);
    assert_eq!(config.repeats, Repeats::Uniform(3));
    assert_eq!(config.aggregation, Aggregation::Median);
    assert_eq!(config.fill, FillPolicy::Formula);
    assert_eq!(config.orders, LoopOrder::ALL);
    config.validate().unwrap();
}

#[test]
fn test_zero_size_rejected() {
    let err = run_sweep(&small_config(vec![4, 0, 8])).unwrap_err();
    assert!(matches!(err, BenchError::InvalidSize { index: 1, size: 0 }));
}

#[test]
fn test_empty_sizes_rejected() {
    assert!(matches!(
        small_config(vec![]).validate(),
        Err(BenchError::EmptySizes)
    ));
}

#[test]
fn test_repeats_length_mismatch_rejected() {
    let config = SweepConfig {
        repeats: Repeats::PerSize(vec![1, 2]),
        ..small_config(vec![2, 4, 8])
    };
    let err = run_sweep(&config).unwrap_err();
    assert!(matches!(err, BenchError::RepeatsMismatch { sizes: 3, repeats: 2 }));
    assert_eq!(err.to_string(), "2 repeat counts given for 3 sizes");
}

#[test]
fn test_zero_repeats_rejected() {
    let uniform = SweepConfig {
        repeats: Repeats::Uniform(0),
        ..small_config(vec![2])
    };
    assert!(matches!(uniform.validate(), Err(BenchError::ZeroRepeats { .. })));

    let per_size = SweepConfig {
        repeats: Repeats::PerSize(vec![1, 0]),
        ..small_config(vec![2, 4])
    };
    assert!(matches!(
        per_size.validate(),
        Err(BenchError::ZeroRepeats { index: 1 })
    ));
}

#[test]
fn test_no_orders_rejected() {
    let config = SweepConfig {
        orders: vec![],
        ..small_config(vec![2])
    };
    assert!(matches!(config.validate(), Err(BenchError::NoOrders)));
}

#[test]
fn test_overflowing_size_rejected_before_timing() {
    let config = small_config(vec![2, usize::MAX]);
    assert!(matches!(
        run_sweep(&config),
        Err(BenchError::SizeOverflow { .. })
    ));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_allocation_failure_mid_sweep_aborts_without_results() {
    // 2^31 squared elements passes the overflow check but can't be reserved.
    let config = small_config(vec![2, 1 << 31]);
    config.validate().unwrap();

    let err = run_sweep(&config).unwrap_err();
    assert!(matches!(err, BenchError::Allocation { n, .. } if n == 1 << 31));
}

#[test]
fn test_repeats_from_list() {
    assert_eq!(Repeats::from(vec![5]), Repeats::Uniform(5));
    assert_eq!(Repeats::from(vec![1, 2, 3]), Repeats::PerSize(vec![1, 2, 3]));
    assert_eq!(Repeats::PerSize(vec![1, 2, 3]).for_size(2), 3);
    assert_eq!(Repeats::Uniform(4).for_size(10), 4);
}

// ============================================================
// Sweep output
// ============================================================

#[test]
fn test_emission_order_is_size_major() {
    let config = SweepConfig {
        repeats: Repeats::PerSize(vec![1, 2, 3]),
        ..small_config(vec![3, 6, 9])
    };
    let result = run_sweep(&config).unwrap();

    assert_eq!(result.samples.len(), 3 * 6);
    for (i, s) in result.samples.iter().enumerate() {
        assert_eq!(s.size, config.sizes[i / 6]);
        assert_eq!(s.order, LoopOrder::ALL[i % 6]);
        assert!(s.seconds >= 0.0);
    }

    let best_sizes: Vec<_> = result.best.iter().map(|b| b.size).collect();
    assert_eq!(best_sizes, [3, 6, 9]);
}

#[test]
fn test_single_order_end_to_end() {
    let config = SweepConfig {
        orders: vec![LoopOrder::Jki],
        aggregation: Aggregation::Mean,
        ..small_config(vec![2, 4, 8])
    };
    let result = run_sweep(&config).unwrap();

    let sizes: Vec<_> = result.samples.iter().map(|s| s.size).collect();
    assert_eq!(sizes, [2, 4, 8]);
    assert!(result.samples.iter().all(|s| s.order == LoopOrder::Jki));
    assert!(result.best.iter().all(|b| b.order == LoopOrder::Jki));
}

#[test]
fn test_random_fill_sweep_runs() {
    let config = SweepConfig {
        fill: FillPolicy::Uniform { seed: None },
        orders: vec![LoopOrder::Ijk, LoopOrder::Kij],
        ..small_config(vec![5, 7])
    };
    let result = run_sweep(&config).unwrap();
    assert_eq!(result.samples.len(), 4);
}

#[test]
fn test_throughput_is_derived_from_time() {
    let result = run_sweep(&small_config(vec![4, 8])).unwrap();
    for s in &result.samples {
        let n = s.size as f64;
        assert_eq!(s.gflops(), 2.0 * n * n * n / s.seconds / 1e9);
    }

    assert_eq!(gflops(1000, 2.0), 1.0);
    assert_eq!(gflops(100, 0.5), 0.004);
    let s = TimingSample { order: LoopOrder::Ikj, size: 10, seconds: 0.25 };
    assert_eq!(s.millis(), 250.0);
}

// ============================================================
// Best-order selection
// ============================================================

#[test]
fn test_best_order_picks_minimum() {
    let samples = [
        sample(LoopOrder::Ijk, 0.5),
        sample(LoopOrder::Ikj, 0.3),
        sample(LoopOrder::Kij, 0.4),
    ];
    assert_eq!(best_order(&samples).unwrap().order, LoopOrder::Ikj);
}

#[test]
fn test_best_order_tie_goes_to_lower_enumerated() {
    let samples = [
        sample(LoopOrder::Kij, 0.2),
        sample(LoopOrder::Ijk, 0.5),
        sample(LoopOrder::Ikj, 0.2),
    ];
    assert_eq!(best_order(&samples).unwrap().order, LoopOrder::Ikj);

    let in_order = [sample(LoopOrder::Kji, 0.1), sample(LoopOrder::Jik, 0.1)];
    assert_eq!(best_order(&in_order).unwrap().order, LoopOrder::Kji);
}

#[test]
fn test_best_order_empty() {
    assert!(best_order(&[]).is_none());
}
