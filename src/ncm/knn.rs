//! k-Nearest Neighbours nonconformity measure.
use crate::errors::ConformalError;
use crate::ncm::NonconformityMeasure;
use crate::utils::{check_dimensions, euclidean_distance};
use log::warn;
use serde::{Deserialize, Serialize};

/// k-Nearest Neighbours (kNN) nonconformity measure.
///
/// Scores an object by the sum of the Euclidean distances to its `k`
/// nearest neighbours in the reference set: objects far from their
/// neighbours get large scores. When the reference set holds fewer than
/// `k` objects, all available distances are summed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KNN {
    /// Number of neighbours.
    pub k: usize,
}

impl KNN {
    /// Create a new kNN measure.
    ///
    /// * `k` - Number of neighbours, must be greater than 0.
    pub fn new(k: usize) -> Result<Self, ConformalError> {
        if k == 0 {
            return Err(ConformalError::InvalidParameter(
                "k".to_string(),
                "an integer greater than 0".to_string(),
                k.to_string(),
            ));
        }
        Ok(KNN { k })
    }
}

impl NonconformityMeasure for KNN {
    fn compute(&self, z: &[f64], reference: &[&[f64]]) -> Result<f64, ConformalError> {
        check_dimensions(z, reference)?;
        let mut dist: Vec<f64> = reference.iter().map(|row| euclidean_distance(z, row)).collect();
        dist.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if dist.len() < self.k {
            warn!(
                "reference set holds {} objects, summing all distances instead of {}",
                dist.len(),
                self.k
            );
        }
        Ok(dist.iter().take(self.k).sum())
    }
}
