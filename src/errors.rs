//! Errors
//!
//! Custom error types used throughout the `conformal` crate.
use thiserror::Error;

/// Errors that can occur in conformal prediction.
#[derive(Debug, Error)]
pub enum ConformalError {
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// A test object's dimensionality disagrees with the reference set.
    #[error("Dimension mismatch, reference objects have {0} features but {1} were provided.")]
    DimensionMismatch(usize, usize),
    /// The number of labels disagrees with the number of reference objects.
    #[error("Length mismatch, {0} reference objects but {1} labels were provided.")]
    LengthMismatch(usize, usize),
    /// A p-value was requested against an empty reference set.
    #[error("A p-value cannot be computed against an empty reference set.")]
    EmptyReferenceSet,
    /// Unable to write predictor to file.
    #[error("Unable to write predictor to file: {0}")]
    UnableToWrite(String),
    /// Unable to read predictor from file.
    #[error("Unable to read predictor from a file {0}")]
    UnableToRead(String),
}
