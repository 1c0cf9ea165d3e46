use ew_promote::PromotionError;
use ew_tensor::{BackendVersion, DType, Shape, TensorError};
use thiserror::Error;

use crate::registry::OpId;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("promotion error: {0}")]
    Promotion(#[from] PromotionError),
    #[error("{op} does not support dtype {dtype} on backend version {version}")]
    UnsupportedDtype {
        op: OpId,
        dtype: DType,
        version: BackendVersion,
    },
    #[error("{op} computes {computed}, which cannot be written to an output of dtype {target}")]
    OutputDtypeMismatch {
        op: OpId,
        computed: DType,
        target: DType,
    },
    #[error("{op} computes shape {computed}, but the output has shape {target}")]
    OutputShapeMismatch {
        op: OpId,
        computed: Shape,
        target: Shape,
    },
    #[error("{op} takes {expected} operand(s), got {got}")]
    Arity {
        op: OpId,
        expected: usize,
        got: usize,
    },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
