//! Integration tests for class balancing.

use std::collections::BTreeSet;

use mvpa_core::{balance, balance_with_rng, BalanceMethod, Dataset, MvpaError, RowOrigin};
use ndarray::{Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn dataset(labels: &[usize]) -> Dataset {
    let n = labels.len();
    let x = Array2::from_shape_fn((n, 3), |(i, j)| i as f64 + j as f64 / 10.0);
    Dataset::new(x, Array1::from_vec(labels.to_vec())).unwrap()
}

fn six_ones_four_twos() -> Dataset {
    dataset(&[1, 1, 1, 1, 1, 1, 2, 2, 2, 2])
}

// ---------------------------------------------------------------------------
// Undersample
// ---------------------------------------------------------------------------

#[test]
fn undersample_keeps_minority_and_order() {
    let ds = six_ones_four_twos();
    let out = balance(&ds, BalanceMethod::Undersample, true).unwrap();

    assert_eq!(out.dataset.nrows(), 8);
    assert_eq!(out.dataset.labels.iter().filter(|&&c| c == 1).count(), 4);
    assert_eq!(out.dataset.labels.iter().filter(|&&c| c == 2).count(), 4);

    assert_eq!(out.labelidx.len(), 8);
    assert!(out.labelidx.iter().all(|o| !o.is_duplicate()));
    let idx = out.original_indices();
    assert!(idx.windows(2).all(|w| w[0] < w[1]));
    assert!((6..10).all(|i| idx.contains(&i)));
    assert_eq!(idx.iter().filter(|&&i| i < 6).count(), 4);
}

#[test]
fn undersample_never_repeats_an_index() {
    let ds = dataset(&[2, 2, 1, 2, 2, 2, 1, 2, 1, 2, 2]);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = balance_with_rng(&ds, BalanceMethod::Undersample, true, None, &mut rng).unwrap();
        let idx = out.source_indices();
        let unique: BTreeSet<usize> = idx.iter().copied().collect();
        assert_eq!(idx.len(), 6);
        assert_eq!(unique.len(), 6);
        assert!(idx.iter().all(|&i| i < ds.nrows()));
        // every class-1 row survives
        assert!([2, 6, 8].iter().all(|i| unique.contains(i)));
    }
}

// ---------------------------------------------------------------------------
// Oversample
// ---------------------------------------------------------------------------

#[test]
fn oversample_equalizes_and_keeps_every_row() {
    let ds = six_ones_four_twos();
    let out = balance(&ds, BalanceMethod::Oversample, true).unwrap();

    assert_eq!(out.dataset.nrows(), 12);
    assert_eq!(out.class_counts().get(&1), Some(&6));
    assert_eq!(out.class_counts().get(&2), Some(&6));

    let originals = out.original_indices();
    assert_eq!(originals, (0..10).collect::<Vec<_>>());
    assert_eq!(out.dataset.x.slice(ndarray::s![..10, ..]), ds.x);
}

#[test]
fn oversample_duplicates_carry_identical_features() {
    let ds = dataset(&[1, 2, 2, 2, 2, 2]);
    let out = balance(&ds, BalanceMethod::Oversample, true).unwrap();

    assert_eq!(out.dataset.nrows(), 10);
    for (row, origin) in out.labelidx.iter().enumerate().skip(6) {
        assert_eq!(*origin, RowOrigin::Duplicate(0));
        assert_eq!(out.dataset.x.row(row), ds.x.row(0));
        assert_eq!(out.dataset.labels[row], 1);
    }
}

#[test]
fn oversample_without_replacement_shortfall_errors() {
    let ds = dataset(&[1, 1, 2, 2, 2, 2, 2]);
    let err = balance(&ds, BalanceMethod::Oversample, false).unwrap_err();
    assert_eq!(
        err,
        MvpaError::InsufficientSamples {
            class: 1,
            available: 2,
            required: 3
        }
    );
}

#[test]
fn oversample_without_replacement_at_double_size() {
    let ds = dataset(&[1, 1, 2, 2, 2, 2]);
    let out = balance(&ds, BalanceMethod::Oversample, false).unwrap();
    let dups: BTreeSet<usize> = out
        .labelidx
        .iter()
        .filter(|o| o.is_duplicate())
        .map(|o| o.source())
        .collect();
    assert_eq!(dups, BTreeSet::from([0, 1]));
}

#[test]
fn balanced_input_is_returned_unchanged() {
    let ds = dataset(&[2, 1, 1, 2]);
    for method in [BalanceMethod::Oversample, BalanceMethod::Undersample, BalanceMethod::TargetCount(2)] {
        let out = balance(&ds, method, false).unwrap();
        assert_eq!(out.dataset, ds);
        assert_eq!(out.original_indices(), vec![0, 1, 2, 3]);
    }
}

#[test]
fn single_class_input_under_each_method() {
    let ds = dataset(&[1, 1, 1]);

    let err = balance(&ds, BalanceMethod::Oversample, true).unwrap_err();
    assert_eq!(err, MvpaError::EmptyClass(2));

    let err = balance(&ds, BalanceMethod::TargetCount(2), true).unwrap_err();
    assert_eq!(err, MvpaError::EmptyClass(2));

    let out = balance(&ds, BalanceMethod::Undersample, true).unwrap();
    assert_eq!(out.dataset.nrows(), 0);
    assert!(out.labelidx.is_empty());
}

#[test]
fn row_indices_start_at_zero() {
    let ds = dataset(&[1, 2]);
    let out = balance(&ds, BalanceMethod::Oversample, true).unwrap();
    assert_eq!(out.labelidx, vec![RowOrigin::Original(0), RowOrigin::Original(1)]);
}

// ---------------------------------------------------------------------------
// Target count
// ---------------------------------------------------------------------------

#[test]
fn target_count_hits_exact_counts() {
    let ds = six_ones_four_twos();
    for num in [0usize, 3, 4, 5, 6, 9] {
        let out = balance(&ds, BalanceMethod::TargetCount(num), true).unwrap();
        assert_eq!(out.dataset.nrows(), 2 * num);
        assert_eq!(out.labelidx.len(), 2 * num);
        let counts = out.class_counts();
        assert_eq!(counts.get(&1).copied().unwrap_or(0), num);
        assert_eq!(counts.get(&2).copied().unwrap_or(0), num);
    }
}

#[test]
fn target_count_undersamples_first_class_before_oversampling_second() {
    let ds = six_ones_four_twos();
    let mut rng = StdRng::seed_from_u64(3);
    let out = balance_with_rng(&ds, BalanceMethod::TargetCount(5), true, None, &mut rng).unwrap();

    let head: Vec<usize> = out.labelidx[..9].iter().map(|o| o.source()).collect();
    assert!(out.labelidx[..9].iter().all(|o| !o.is_duplicate()));
    assert!(head.windows(2).all(|w| w[0] < w[1]));
    assert!((6..10).all(|i| head.contains(&i)));
    assert!(out.labelidx[9].is_duplicate());
    assert!(out.labelidx[9].source() >= 6);
}

// ---------------------------------------------------------------------------
// Auxiliary tensor
// ---------------------------------------------------------------------------

#[test]
fn time_axis_is_row_selected_with_features() {
    let labels = [1usize, 1, 1, 2];
    let x = Array2::from_shape_fn((4, 2), |(i, j)| (i * 2 + j) as f64);
    let aux = Array3::from_shape_fn((4, 2, 5), |(i, j, t)| (i * 1000 + j * 10 + t) as f64);
    let ds = Dataset::with_aux(x, Array1::from_vec(labels.to_vec()), aux.clone().into_dyn()).unwrap();

    let out = balance(&ds, BalanceMethod::Undersample, true).unwrap();
    let out_aux = out.dataset.aux.as_ref().unwrap();
    assert_eq!(out_aux.shape(), &[2, 2, 5]);
    for (row, src) in out.source_indices().into_iter().enumerate() {
        assert_eq!(
            out_aux.index_axis(ndarray::Axis(0), row),
            aux.index_axis(ndarray::Axis(0), src).into_dyn()
        );
    }
}
