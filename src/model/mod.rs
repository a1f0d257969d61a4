//! Opaque predictor interface and the forest implementation.
//!
//! The HTTP layer only ever sees [`Predictor`]; the concrete artifact shape
//! lives in [`forest`] and can change without touching the handlers.

pub mod forest;

pub use forest::RandomForest;

use crate::error::PredictError;

/// Narrow inference interface: one numeric row in, one scalar out.
pub trait Predictor {
    /// Run inference on a single feature row.
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError>;

    /// Number of input features the model was trained on.
    fn n_features(&self) -> usize;
}
