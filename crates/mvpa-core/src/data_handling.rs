//! Data structures and helpers for labeled sample matrices.
//!
//! This module defines `Dataset`, a feature matrix with row-aligned class
//! labels and an optional auxiliary tensor (for example a per-sample time
//! axis), plus helpers for class bookkeeping and row selection used by the
//! balancer.
use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayD, Axis};

use crate::error::{MvpaError, Result};

/// Provenance of an output row after resampling.
///
/// Row indices are 0-based: the first input row is `Original(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrigin {
    /// The row is original input row `i`.
    Original(usize),
    /// The row is an appended copy of original input row `i`.
    Duplicate(usize),
}

impl RowOrigin {
    /// Index of the input row this row was taken from.
    pub fn source(&self) -> usize {
        match *self {
            RowOrigin::Original(i) | RowOrigin::Duplicate(i) => i,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, RowOrigin::Duplicate(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Samples x features
    pub x: Array2<f64>,
    /// Class id per sample
    pub labels: Array1<usize>,
    /// Optional tensor whose leading axis is aligned with the rows of `x`
    pub aux: Option<ArrayD<f64>>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, labels: Array1<usize>) -> Result<Self> {
        if labels.len() != x.nrows() {
            return Err(MvpaError::DimensionMismatch {
                context: "label vector length",
                expected: x.nrows(),
                actual: labels.len(),
            });
        }
        Ok(Dataset { x, labels, aux: None })
    }

    /// Attach an auxiliary tensor (e.g. samples x features x time) that is
    /// row-selected together with `x`.
    pub fn with_aux(x: Array2<f64>, labels: Array1<usize>, aux: ArrayD<f64>) -> Result<Self> {
        let mut dataset = Dataset::new(x, labels)?;
        let leading = aux.shape().first().copied().unwrap_or(0);
        if aux.ndim() == 0 || leading != dataset.x.nrows() {
            return Err(MvpaError::DimensionMismatch {
                context: "auxiliary tensor leading axis",
                expected: dataset.x.nrows(),
                actual: leading,
            });
        }
        dataset.aux = Some(aux);
        Ok(dataset)
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn class_counts(&self) -> BTreeMap<usize, usize> {
        class_counts(&self.labels)
    }

    pub fn class_indices(&self) -> BTreeMap<usize, Vec<usize>> {
        class_indices(&self.labels)
    }

    /// Build a new dataset from the given rows, in the given order.
    /// Indices may repeat.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
            aux: self.aux.as_ref().map(|aux| aux.select(Axis(0), indices)),
        }
    }

    pub fn log_class_summary(&self) {
        log::info!("----- Class Summary -----");
        for (class, count) in self.class_counts() {
            log::info!("Class {}: {} samples", class, count);
        }
        log::info!("{} samples x {} features", self.x.nrows(), self.x.ncols());
        log::info!("-------------------------");
    }
}

/// Count samples per class, ordered by ascending class id.
pub fn class_counts(labels: &Array1<usize>) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for &label in labels.iter() {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Row indices per class, ordered by ascending class id. Within a class the
/// indices are ascending.
pub fn class_indices(labels: &Array1<usize>) -> BTreeMap<usize, Vec<usize>> {
    let mut indices: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        indices.entry(label).or_default().push(i);
    }
    indices
}
