//! Conformal Prediction
//!
//! Implementation of conformal predictors [1]: any nonconformity measure is
//! turned into a set-valued predictor whose prediction sets contain the true
//! label with probability at least `1 - e`, for any exchangeable data
//! distribution and any significance level `e`.
//!
//! Ref:
//! [1] Shafer, Glenn, and Vladimir Vovk. "A tutorial on conformal prediction."
//! The Journal of Machine Learning Research 9 (2008): 371-421.
use crate::data::Matrix;
use crate::errors::ConformalError;
use crate::ncm::NonconformityMeasure;
use hashbrown::HashSet;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::hash::Hash;
use std::path::Path;

fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Conformal predictor object.
///
/// Wraps a nonconformity measure and a smoothing flag. Smooth p-values break
/// score ties with fresh randomness and are exactly uniform under the
/// exchangeability hypothesis; deterministic p-values need no randomness and
/// are conservative (they never under-cover).
#[derive(Serialize, Deserialize)]
pub struct ConformalPredictor<M> {
    /// The nonconformity measure scoring objects against reference sets.
    pub ncm: M,
    /// Use smooth CP (`true`) or deterministic CP.
    pub smooth: bool,
    seed: Option<u64>,
    #[serde(skip, default = "entropy_rng")]
    rng: StdRng,
}

impl<M> ConformalPredictor<M>
where
    M: NonconformityMeasure,
{
    /// Create a conformal predictor around a nonconformity measure.
    ///
    /// The randomness consumed by smooth p-values is drawn from an
    /// entropy-seeded generator; use [`ConformalPredictor::with_seed`] for
    /// reproducible smoothing.
    ///
    /// * `ncm` - nonconformity measure.
    /// * `smooth` - use smooth CP (`true`) or deterministic CP.
    pub fn new(ncm: M, smooth: bool) -> Self {
        ConformalPredictor {
            ncm,
            smooth,
            seed: None,
            rng: entropy_rng(),
        }
    }

    /// Create a conformal predictor with a seeded random source, so that
    /// smooth p-values replay deterministically.
    ///
    /// * `ncm` - nonconformity measure.
    /// * `smooth` - use smooth CP (`true`) or deterministic CP.
    /// * `seed` - Integer value used to seed the tie-breaking randomness.
    pub fn with_seed(ncm: M, smooth: bool, seed: u64) -> Self {
        ConformalPredictor {
            ncm,
            smooth,
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Return the p-value for a new object `z` given reference objects.
    ///
    /// The larger the p-value, the more confident we are that `z` comes from
    /// the same distribution as the reference set. Every member of the
    /// augmented set (the reference rows plus `z`) is scored against all the
    /// others, which makes one p-value cost `N + 1` measure invocations.
    ///
    /// * `z` - new example.
    /// * `data` - matrix of reference examples, one per row; must be nonempty.
    /// * `parallel` - score the augmented set over multiple threads.
    pub fn calculate_pvalue(&mut self, z: &[f64], data: &Matrix<f64>, parallel: bool) -> Result<f64, ConformalError> {
        if data.rows == 0 {
            return Err(ConformalError::EmptyReferenceSet);
        }
        if data.cols != z.len() {
            return Err(ConformalError::DimensionMismatch(data.cols, z.len()));
        }
        let reference: Vec<&[f64]> = data.row_iter().collect();
        self.pvalue_of_rows(z, &reference, parallel)
    }

    fn pvalue_of_rows(&mut self, z: &[f64], reference: &[&[f64]], parallel: bool) -> Result<f64, ConformalError> {
        // Augmented set: the reference rows plus z in the last position.
        let mut augmented = reference.to_vec();
        augmented.push(z);
        let n = augmented.len();

        // Leave-one-out score of every augmented member against all the others.
        let ncm = &self.ncm;
        let augmented = &augmented;
        let score = |i: usize| -> Result<f64, ConformalError> {
            let mut others = Vec::with_capacity(n - 1);
            others.extend_from_slice(&augmented[..i]);
            others.extend_from_slice(&augmented[i + 1..]);
            ncm.compute(augmented[i], &others)
        };
        let alphas = if parallel {
            (0..n).into_par_iter().map(score).collect::<Result<Vec<f64>, _>>()?
        } else {
            (0..n).map(score).collect::<Result<Vec<f64>, _>>()?
        };

        let a_z = alphas[n - 1];
        let greater = alphas.iter().filter(|a| **a > a_z).count();
        let ties = alphas.iter().filter(|a| **a == a_z).count();
        let pvalue = if self.smooth {
            let t: f64 = self.rng.gen();
            (greater as f64 + t * ties as f64) / n as f64
        } else {
            (greater + ties) as f64 / n as f64
        };
        debug!("p-value {} over an augmented set of {} examples", pvalue, n);
        Ok(pvalue)
    }

    /// Predict whether `z` comes from the same distribution as the reference
    /// examples, with respect to a significance level `e`.
    ///
    /// Returns `true` if the p-value is greater than the significance level,
    /// `false` otherwise.
    ///
    /// * `z` - new example.
    /// * `data` - matrix of reference examples, one per row.
    /// * `e` - significance level in [0, 1].
    /// * `parallel` - score the augmented set over multiple threads.
    pub fn predict_unlabelled(
        &mut self,
        z: &[f64],
        data: &Matrix<f64>,
        e: f64,
        parallel: bool,
    ) -> Result<bool, ConformalError> {
        Ok(self.calculate_pvalue(z, data, parallel)? > e)
    }

    /// Return a prediction set for the new object `z` that contains its true
    /// label with probability at least `1 - e`.
    ///
    /// Each distinct label restricts the reference set to the rows carrying
    /// it; `z` is included for every label whose restricted reference set
    /// does not reject it. The returned labels are sorted ascending. A label
    /// whose restricted reference set is empty is skipped, since no p-value
    /// can be computed for it.
    ///
    /// * `z` - new example.
    /// * `data` - matrix of reference examples, one per row.
    /// * `y` - labels, one per reference row.
    /// * `e` - significance level in [0, 1].
    /// * `parallel` - score the augmented sets over multiple threads.
    pub fn predict_labelled<L>(
        &mut self,
        z: &[f64],
        data: &Matrix<f64>,
        y: &[L],
        e: f64,
        parallel: bool,
    ) -> Result<Vec<L>, ConformalError>
    where
        L: Clone + Ord + Hash,
    {
        if data.rows != y.len() {
            return Err(ConformalError::LengthMismatch(data.rows, y.len()));
        }
        if data.cols != z.len() {
            return Err(ConformalError::DimensionMismatch(data.cols, z.len()));
        }
        let mut labels: Vec<&L> = y.iter().collect::<HashSet<&L>>().into_iter().collect();
        labels.sort();

        let mut pred = Vec::new();
        for label in labels {
            let subset: Vec<&[f64]> = data
                .row_iter()
                .zip(y)
                .filter(|(_, yi)| *yi == label)
                .map(|(row, _)| row)
                .collect();
            if subset.is_empty() {
                continue;
            }
            if self.pvalue_of_rows(z, &subset, parallel)? > e {
                pred.push(label.clone());
            }
        }
        Ok(pred)
    }
}

/// IO
pub trait PredictorIO: Serialize + DeserializeOwned + Sized {
    /// Save a predictor as a json object to a file.
    ///
    /// * `path` - Path to save predictor.
    fn save_predictor<P: AsRef<Path>>(&self, path: P) -> Result<(), ConformalError> {
        fs::write(path, self.json_dump()?).map_err(|e| ConformalError::UnableToWrite(e.to_string()))
    }

    /// Dump a predictor as a json object
    fn json_dump(&self) -> Result<String, ConformalError> {
        serde_json::to_string(self).map_err(|e| ConformalError::UnableToWrite(e.to_string()))
    }

    /// Load a predictor from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, ConformalError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| ConformalError::UnableToRead(e.to_string()))
    }

    /// Load a predictor from a path to a json predictor object.
    ///
    /// * `path` - Path to load predictor from.
    fn load_predictor<P: AsRef<Path>>(path: P) -> Result<Self, ConformalError> {
        let json_str = fs::read_to_string(path).map_err(|e| ConformalError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl<M> PredictorIO for ConformalPredictor<M>
where
    M: Serialize + DeserializeOwned,
{
    fn from_json(json_str: &str) -> Result<Self, ConformalError> {
        let mut predictor =
            serde_json::from_str::<Self>(json_str).map_err(|e| ConformalError::UnableToRead(e.to_string()))?;
        // The random source is runtime state; rebuild it from the persisted
        // seed so a loaded predictor replays like a freshly seeded one.
        if let Some(seed) = predictor.seed {
            predictor.rng = StdRng::seed_from_u64(seed);
        }
        Ok(predictor)
    }
}
