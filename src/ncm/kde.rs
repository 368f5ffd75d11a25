//! Kernel Density Estimation nonconformity measure.
use crate::errors::ConformalError;
use crate::ncm::NonconformityMeasure;
use crate::utils::{check_dimensions, items_to_strings, validate_positive_float_parameter};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Kernel functions available to the KDE nonconformity measure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Kernel {
    /// Standard multivariate-independent Gaussian kernel,
    /// `exp(-0.5 * u.u) / sqrt(2 * pi)`.
    Gaussian,
    /// A caller supplied kernel, evaluated over a vector and returning a
    /// scalar. Not serializable.
    #[serde(skip)]
    Custom(fn(&[f64]) -> f64),
}

impl Kernel {
    /// Evaluate the kernel at `u`.
    pub fn evaluate(&self, u: &[f64]) -> f64 {
        match self {
            Kernel::Gaussian => {
                let uu: f64 = u.iter().map(|v| v * v).sum();
                (-0.5 * uu).exp() / (2.0 * PI).sqrt()
            }
            Kernel::Custom(kernel) => kernel(u),
        }
    }
}

impl FromStr for Kernel {
    type Err = ConformalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gaussian" => Ok(Kernel::Gaussian),
            _ => Err(ConformalError::ParseString(
                s.to_string(),
                "Kernel".to_string(),
                items_to_strings(vec!["gaussian"]),
            )),
        }
    }
}

/// Kernel Density Estimation (KDE) nonconformity measure.
///
/// Scores an object by the negated kernel density estimate at its location,
/// so that objects in low density regions get large scores. The density is
/// estimated over the reference set plus the object itself, i.e. over
/// `N = |reference| + 1` points; the self term is part of the estimate and
/// must stay there for score compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KDE {
    /// Bandwidth of the estimator.
    pub h: f64,
    /// Kernel function.
    pub kernel: Kernel,
}

impl KDE {
    /// Create a new KDE measure.
    ///
    /// * `h` - Bandwidth, must be finite and greater than 0.
    /// * `kernel` - Kernel function. Parse a [`Kernel`] from a string with
    ///   `"gaussian".parse()`, or pass [`Kernel::Custom`] directly.
    pub fn new(h: f64, kernel: Kernel) -> Result<Self, ConformalError> {
        validate_positive_float_parameter(h, "h")?;
        Ok(KDE { h, kernel })
    }
}

impl NonconformityMeasure for KDE {
    fn compute(&self, z: &[f64], reference: &[&[f64]]) -> Result<f64, ConformalError> {
        check_dimensions(z, reference)?;
        let n = reference.len() + 1;
        let d = z.len() as i32;
        let mut u = vec![0.0; z.len()];
        let mut sum = 0.0;
        for zi in reference {
            for (uj, (a, b)) in u.iter_mut().zip(z.iter().zip(zi.iter())) {
                *uj = (a - b) / self.h;
            }
            sum += self.kernel.evaluate(&u);
        }
        // Self term: (z - z) / h is the zero vector.
        u.fill(0.0);
        sum += self.kernel.evaluate(&u);
        Ok(-sum / (n as f64 * self.h.powi(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_kernel_from_str() {
        assert!(matches!("gaussian".parse::<Kernel>(), Ok(Kernel::Gaussian)));
        assert!(matches!(
            "epanechnikov".parse::<Kernel>(),
            Err(ConformalError::ParseString(..))
        ));
    }

    #[test]
    fn test_gaussian_kernel_at_zero() {
        let kernel = Kernel::Gaussian;
        assert!((kernel.evaluate(&[0.0, 0.0]) - 1.0 / (2.0 * PI).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_kde_invalid_bandwidth() {
        assert!(KDE::new(0.0, Kernel::Gaussian).is_err());
        assert!(KDE::new(-1.0, Kernel::Gaussian).is_err());
        assert!(KDE::new(f64::NAN, Kernel::Gaussian).is_err());
        assert!(KDE::new(0.1, Kernel::Gaussian).is_ok());
    }

    #[test]
    fn test_kde_fixture_score() {
        let x = fixtures::probe();
        let data = fixtures::reference();
        let rows: Vec<&[f64]> = data.row_iter().collect();
        let kde = KDE::new(fixtures::KDE_H, Kernel::Gaussian).unwrap();
        let score = kde.compute(&x, &rows).unwrap();
        assert!((score - fixtures::KDE_SCORE).abs() / fixtures::KDE_SCORE.abs() < 1e-12);
    }

    #[test]
    fn test_kde_self_inclusion() {
        // With an empty reference set the estimate is the self term alone:
        // -kernel(0) / h^d over N = 1 point.
        let h = 0.5;
        let z = [1.0, 2.0, 3.0];
        let kde = KDE::new(h, Kernel::Gaussian).unwrap();
        let expected = -(1.0 / (2.0 * PI).sqrt()) / h.powi(3);
        let score = kde.compute(&z, &[]).unwrap();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kde_averages_over_reference_plus_one() {
        // A reference point far enough away contributes nothing to the
        // density, but still counts in the 1/N normalization.
        let h = 1.0;
        let z = [0.0];
        let far = [1e6];
        let reference: Vec<&[f64]> = vec![&far];
        let kde = KDE::new(h, Kernel::Gaussian).unwrap();
        let expected = -(1.0 / (2.0 * PI).sqrt()) / 2.0;
        let score = kde.compute(&z, &reference).unwrap();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kde_custom_kernel() {
        fn flat(_u: &[f64]) -> f64 {
            1.0
        }
        let kde = KDE::new(2.0, Kernel::Custom(flat)).unwrap();
        // Two points, flat kernel: -(1 + 1) / (2 * 2^1).
        let one = [1.0];
        let reference: Vec<&[f64]> = vec![&one];
        let score = kde.compute(&[0.0], &reference).unwrap();
        assert!((score - (-0.5)).abs() < 1e-15);
    }

    #[test]
    fn test_kde_dimension_mismatch() {
        let w = [1.0, 2.0];
        let reference: Vec<&[f64]> = vec![&w];
        let kde = KDE::new(1.0, Kernel::Gaussian).unwrap();
        assert!(matches!(
            kde.compute(&[1.0], &reference),
            Err(ConformalError::DimensionMismatch(2, 1))
        ));
    }
}
