//! Class balancing by random over- and under-sampling.
//!
//! Rows are only ever duplicated or removed, never synthesized. The balancer
//! works on a list of row origins rather than on the matrices themselves, so
//! every edit is applied to `x`, labels, the auxiliary tensor and the origin
//! map in lockstep when the result is materialized at the end. A failure
//! part-way through therefore never produces a partial result.
use std::collections::{BTreeMap, BTreeSet};

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};

use crate::config::{BalanceConfig, BalanceMethod};
use crate::data_handling::{class_counts, Dataset, RowOrigin};
use crate::error::{MvpaError, Result};

/// Classes always balanced over when no explicit list is given, even if the
/// labels lack one of them.
pub const DEFAULT_CLASSES: [usize; 2] = [1, 2];

/// Output of a balancing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced {
    /// Resampled dataset
    pub dataset: Dataset,
    /// One entry per output row, naming the input row it derives from
    pub labelidx: Vec<RowOrigin>,
}

impl Balanced {
    pub fn class_counts(&self) -> BTreeMap<usize, usize> {
        self.dataset.class_counts()
    }

    /// Input row index for every output row, duplicates included. Use this to
    /// slice structures that are parallel to the input rows.
    pub fn source_indices(&self) -> Vec<usize> {
        self.labelidx.iter().map(RowOrigin::source).collect()
    }

    /// Input row indices of the rows that survived, in output order.
    /// Appended duplicates are skipped.
    pub fn original_indices(&self) -> Vec<usize> {
        self.labelidx
            .iter()
            .filter_map(|origin| match origin {
                RowOrigin::Original(i) => Some(*i),
                RowOrigin::Duplicate(_) => None,
            })
            .collect()
    }
}

/// Balance `dataset` using the thread-local random generator.
///
/// # Arguments
///
/// * `dataset` - The labeled samples to resample. Not modified.
/// * `method` - Oversample, undersample or resample every class to a target count.
/// * `replace` - Draw oversampled rows with replacement.
///
/// # Returns
///
/// The resampled dataset and the origin of each of its rows.
pub fn balance(dataset: &Dataset, method: BalanceMethod, replace: bool) -> Result<Balanced> {
    let mut rng = thread_rng();
    balance_with_rng(dataset, method, replace, None, &mut rng)
}

/// Balance `dataset` as described by `config`.
///
/// A configured seed drives a dedicated `StdRng`; otherwise the thread-local
/// generator is used.
pub fn balance_with_config(dataset: &Dataset, config: &BalanceConfig) -> Result<Balanced> {
    let classes = config.classes.as_deref();
    match config.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            balance_with_rng(dataset, config.method, config.replace, classes, &mut rng)
        }
        None => {
            let mut rng = thread_rng();
            balance_with_rng(dataset, config.method, config.replace, classes, &mut rng)
        }
    }
}

/// Balance `dataset` drawing from the supplied generator.
///
/// # Arguments
///
/// * `dataset` - The labeled samples to resample. Not modified.
/// * `method` - The balancing strategy.
/// * `replace` - Draw oversampled rows with replacement.
/// * `classes` - Classes to balance over. `None` uses classes 1 and 2 plus
///   every other class present in the labels. Rows of classes outside the
///   list are left untouched. A class without rows that must gain rows
///   fails with `EmptyClass`.
/// * `rng` - Source of randomness.
///
/// Classes are processed in ascending id order, each edit applied to the state
/// left by the previous one. Surviving input rows keep their relative order;
/// duplicates are appended at the end.
pub fn balance_with_rng<R: Rng>(
    dataset: &Dataset,
    method: BalanceMethod,
    replace: bool,
    classes: Option<&[usize]>,
    rng: &mut R,
) -> Result<Balanced> {
    let counts = class_counts(&dataset.labels);
    let classes: BTreeSet<usize> = match classes {
        Some(list) => list.iter().copied().collect(),
        None => DEFAULT_CLASSES.iter().chain(counts.keys()).copied().collect(),
    };
    let count_of = |class: &usize| counts.get(class).copied().unwrap_or(0);

    let target = match method {
        BalanceMethod::Oversample => {
            if let Some(minority) = classes.iter().min_by_key(|c| count_of(*c)) {
                log::debug!(
                    "Oversampling: minority class {} with {} samples",
                    minority,
                    count_of(minority)
                );
            }
            classes.iter().map(count_of).max().unwrap_or(0)
        }
        BalanceMethod::Undersample => classes.iter().map(count_of).min().unwrap_or(0),
        BalanceMethod::TargetCount(num) => num,
    };

    let mut rows: Vec<RowOrigin> = (0..dataset.nrows()).map(RowOrigin::Original).collect();

    for &class in &classes {
        let count = count_of(&class);
        if count > target {
            undersample_class(&mut rows, &dataset.labels, class, count - target, rng);
        } else if count < target {
            oversample_class(&mut rows, &dataset.labels, class, target - count, replace, rng)?;
        } else {
            log::trace!("Class {} already has {} samples", class, target);
        }
    }

    let sources: Vec<usize> = rows.iter().map(RowOrigin::source).collect();
    let balanced = Balanced {
        dataset: dataset.select_rows(&sources),
        labelidx: rows,
    };

    log::debug!(
        "Balanced {} samples into {} ({}), class counts {:?}",
        dataset.nrows(),
        balanced.dataset.nrows(),
        method,
        balanced.class_counts()
    );

    Ok(balanced)
}

/// Positions in `rows` whose label is `class`.
fn positions_of(rows: &[RowOrigin], labels: &Array1<usize>, class: usize) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter_map(|(pos, origin)| (labels[origin.source()] == class).then_some(pos))
        .collect()
}

fn undersample_class<R: Rng>(
    rows: &mut Vec<RowOrigin>,
    labels: &Array1<usize>,
    class: usize,
    n_remove: usize,
    rng: &mut R,
) {
    let positions = positions_of(rows, labels, class);
    let mut remove = vec![false; rows.len()];
    for &pos in positions.choose_multiple(rng, n_remove) {
        remove[pos] = true;
    }

    log::debug!("Removing {} of {} samples from class {}", n_remove, positions.len(), class);

    *rows = rows
        .iter()
        .zip(&remove)
        .filter(|(_, &removed)| !removed)
        .map(|(origin, _)| *origin)
        .collect();
}

fn oversample_class<R: Rng>(
    rows: &mut Vec<RowOrigin>,
    labels: &Array1<usize>,
    class: usize,
    n_add: usize,
    replace: bool,
    rng: &mut R,
) -> Result<()> {
    let positions = positions_of(rows, labels, class);
    if positions.is_empty() {
        return Err(MvpaError::EmptyClass(class));
    }

    let drawn: Vec<usize> = if replace {
        (0..n_add)
            .map(|_| positions[rng.gen_range(0..positions.len())])
            .collect()
    } else {
        if n_add > positions.len() {
            return Err(MvpaError::InsufficientSamples {
                class,
                available: positions.len(),
                required: n_add,
            });
        }
        positions.choose_multiple(rng, n_add).copied().collect()
    };

    log::debug!(
        "Adding {} duplicates to class {} ({} samples, replace = {})",
        n_add,
        class,
        positions.len(),
        replace
    );
    log::trace!("Duplicated positions: {:?}", drawn);

    let duplicates: Vec<RowOrigin> = drawn
        .into_iter()
        .map(|pos| RowOrigin::Duplicate(rows[pos].source()))
        .collect();
    rows.extend(duplicates);
    Ok(())
}
