//! Nonconformity Measures
//!
//! A nonconformity measure scores how unusual an object is relative to a
//! reference set of objects: the higher the score, the more unusual. The
//! conformal predictor consumes any implementation of
//! [`NonconformityMeasure`] through this narrow interface, so new measures
//! can be plugged in without touching the p-value engine.
//!
//! # Submodules
//!
//! * `knn`: k-Nearest Neighbours distance-sum measure.
//! * `kde`: negated Kernel Density Estimation measure.

pub mod kde;
pub mod knn;

pub use kde::{Kernel, KDE};
pub use knn::KNN;

use crate::errors::ConformalError;

/// Scores how unusual an object is relative to a reference set.
///
/// Implementations must be pure functions of their inputs beyond
/// construction-time hyperparameters; the exchangeability argument behind
/// the coverage guarantee relies on it. `Send + Sync` is required so the
/// predictor can score the augmented set over multiple threads.
pub trait NonconformityMeasure: Send + Sync {
    /// Compute the nonconformity score of `z` with respect to `reference`.
    ///
    /// `reference` must not contain `z` itself; it may be empty or hold a
    /// single object. Every row of `reference` must have the same length
    /// as `z`.
    ///
    /// * `z` - the example on which to calculate the measure.
    /// * `reference` - reference examples, one per slice, excluding `z`.
    fn compute(&self, z: &[f64], reference: &[&[f64]]) -> Result<f64, ConformalError>;
}
