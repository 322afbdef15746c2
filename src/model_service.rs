use crate::error::PredictionError;
use ndarray::ArrayView4;
use std::sync::Arc;

/// A loaded model: one forward pass per call, no state between calls.
pub trait Classifier: Send + Sync + 'static {
    /// Returns the per-class probabilities for a `(1, 224, 224, 3)` input.
    fn predict(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictionError>;
}

/// Produces a [`Classifier`] from the model artifact. Blocking.
pub trait ModelLoader: Send + Sync + 'static {
    fn load(&self) -> Result<Arc<dyn Classifier>, PredictionError>;
}
