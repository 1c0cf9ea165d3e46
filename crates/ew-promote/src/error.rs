use ew_tensor::DType;
use thiserror::Error;

use crate::resolver::PromotionMode;

/// No common computation dtype exists for a pair of operands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromotionError {
    #[error("no common dtype for {lhs} and {rhs} under {mode} promotion")]
    Incompatible {
        lhs: DType,
        rhs: DType,
        mode: PromotionMode,
    },
    #[error("complex dtype {dtype} cannot take part in array-API promotion")]
    ComplexOperand { dtype: DType },
}

pub type Result<T> = std::result::Result<T, PromotionError>;
