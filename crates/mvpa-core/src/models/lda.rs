//! Inference for a trained multiclass linear discriminant model.
//!
//! Samples are projected into discriminant space with the fitted projection
//! `w` and assigned to the class whose centroid is nearest in squared
//! Euclidean distance.

use ndarray::{Array1, Array2, Array3, ArrayBase, Axis, Data, Ix2};
use serde::{Deserialize, Serialize};

use crate::error::{MvpaError, Result};
use crate::models::classifier_trait::Classifier;

/// Fitted parameters of a multiclass LDA, produced by an external trainer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LdaModel {
    /// Projection, shape (n_features, n_discriminants)
    pub w: Array2<f64>,
    /// Class centroids in discriminant space, shape (nclasses, n_discriminants)
    pub centroid: Array2<f64>,
    pub nclasses: usize,
}

impl LdaModel {
    pub fn new(w: Array2<f64>, centroid: Array2<f64>, nclasses: usize) -> Result<Self> {
        let model = LdaModel {
            w,
            centroid,
            nclasses,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.nclasses == 0 {
            return Err(MvpaError::DimensionMismatch {
                context: "number of classes",
                expected: 1,
                actual: 0,
            });
        }
        if self.centroid.nrows() != self.nclasses {
            return Err(MvpaError::DimensionMismatch {
                context: "centroid rows vs nclasses",
                expected: self.nclasses,
                actual: self.centroid.nrows(),
            });
        }
        if self.centroid.ncols() != self.w.ncols() {
            return Err(MvpaError::DimensionMismatch {
                context: "centroid columns vs projection columns",
                expected: self.w.ncols(),
                actual: self.centroid.ncols(),
            });
        }
        Ok(())
    }

    /// Project samples (rows of `x`) into discriminant space.
    pub fn project<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.validate()?;
        if x.ncols() != self.w.nrows() {
            return Err(MvpaError::DimensionMismatch {
                context: "sample features vs projection rows",
                expected: self.w.nrows(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(&self.w))
    }

    /// Squared Euclidean distance of every projected sample to every class
    /// centroid, shape (n_samples, nclasses).
    pub fn decision_values<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let projected = self.project(x)?;
        let mut dist = Array2::<f64>::zeros((projected.nrows(), self.nclasses));
        for (i, sample) in projected.outer_iter().enumerate() {
            for (c, centroid) in self.centroid.outer_iter().enumerate() {
                dist[(i, c)] = sample
                    .iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>();
            }
        }
        Ok(dist)
    }

    /// Assign each row of `x` to its nearest centroid. Class ids are 1-based;
    /// on equal distances the lowest class id wins.
    pub fn predict<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array1<usize>>
    where
        S: Data<Elem = f64>,
    {
        self.predict_with_distances(x).map(|(labels, _)| labels)
    }

    pub fn predict_with_distances<S>(
        &self,
        x: &ArrayBase<S, Ix2>,
    ) -> Result<(Array1<usize>, Array2<f64>)>
    where
        S: Data<Elem = f64>,
    {
        let dist = self.decision_values(x)?;
        let labels = dist.outer_iter().map(|row| nearest_class(row.iter())).collect();
        Ok((labels, dist))
    }

    /// Classify a (n_samples, n_features, n_times) tensor one time point at a
    /// time. Returns labels of shape (n_samples, n_times).
    pub fn predict_timeseries(&self, x: &Array3<f64>) -> Result<Array2<usize>> {
        let (n_samples, _, n_times) = x.dim();
        let mut labels = Array2::<usize>::zeros((n_samples, n_times));
        for (t, slice) in x.axis_iter(Axis(2)).enumerate() {
            let predicted = self.predict(&slice)?;
            labels.column_mut(t).assign(&predicted);
        }
        log::trace!("Classified {} samples at {} time points", n_samples, n_times);
        Ok(labels)
    }
}

/// 1-based index of the smallest distance, first occurrence on ties.
fn nearest_class<'a>(distances: impl Iterator<Item = &'a f64>) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, &d) in distances.enumerate() {
        if d < best_dist {
            best = c;
            best_dist = d;
        }
    }
    best + 1
}

impl Classifier for LdaModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        LdaModel::predict(self, x)
    }

    fn decision_values(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        LdaModel::decision_values(self, x)
    }

    fn nclasses(&self) -> usize {
        self.nclasses
    }

    fn name(&self) -> &str {
        "multiclass_lda"
    }
}
