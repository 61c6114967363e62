use ndarray::{Array1, Array2};

use crate::error::Result;

/// Inference contract for trained classifiers. Training happens elsewhere;
/// implementations only consume fitted parameters, so a cross-validation
/// driver can hold any of them as a `Box<dyn Classifier>`.
pub trait Classifier {
    /// Predict one class id in `1..=nclasses` per row of `x` (samples x features).
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Per-class decision values, shape (n_samples, nclasses). Lower is closer
    /// for distance-based models.
    fn decision_values(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Number of classes the model can predict.
    fn nclasses(&self) -> usize;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
