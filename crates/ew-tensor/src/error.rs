use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("cannot broadcast shapes {a:?} and {b:?}")]
    BroadcastError { a: Vec<usize>, b: Vec<usize> },
    #[error("kernel {kernel} does not support dtype {dtype}")]
    UnsupportedKernel { kernel: String, dtype: DType },
    #[error("unsupported dtype: {0}")]
    UnsupportedDType(String),
    #[error("invalid version string: {0}")]
    InvalidVersion(String),
    #[error("integer division by zero in {0}")]
    DivisionByZero(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TensorError>;
