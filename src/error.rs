//! Error returned by NNI operations.

use crate::model::DomainError;
use crate::nni::{SamplingError, StructuralError};
use crate::parser::ParsingError;
use thiserror::Error;

/// Any failure of [NniEngine](crate::nni::NniEngine).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NniError {
    /// Working copy could not be parsed
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    /// Metric precondition violated
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// No focal vertex could be selected
    #[error(transparent)]
    Sampling(#[from] SamplingError),
    /// Focal vertex cannot be rearranged around
    #[error(transparent)]
    Structural(#[from] StructuralError),
}
