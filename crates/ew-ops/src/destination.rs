use ew_tensor::{DType, DTypeKind, Shape, Tensor};

use crate::error::{DispatchError, Result};
use crate::registry::OpId;

/// A caller-owned tensor that receives a result in place.
///
/// The destination is only written by `commit`, which cannot fail. Every
/// check runs first, so on error the tensor keeps its previous contents.
#[derive(Debug)]
pub struct Destination<'a> {
    target: &'a mut Tensor,
}

/// Rank of a dtype kind for output casts. Signed and unsigned integers share
/// a rank.
fn rank(kind: DTypeKind) -> u8 {
    match kind {
        DTypeKind::Bool => 0,
        DTypeKind::SignedInt | DTypeKind::UnsignedInt => 1,
        DTypeKind::Float => 2,
        DTypeKind::Complex => 3,
    }
}

/// True when a result of dtype `computed` may be cast into a `target` buffer:
/// the cast may narrow within a kind but never drops to a lower kind.
pub fn can_receive(computed: DType, target: DType) -> bool {
    rank(target.kind()) >= rank(computed.kind())
}

impl<'a> Destination<'a> {
    pub fn new(target: &'a mut Tensor) -> Self {
        Destination { target }
    }

    pub fn dtype(&self) -> DType {
        self.target.dtype()
    }

    pub fn shape(&self) -> &Shape {
        self.target.shape()
    }

    /// Verifies the destination can hold a result of `dtype` and `shape`.
    pub fn check(&self, op: OpId, dtype: DType, shape: &Shape) -> Result<()> {
        if !can_receive(dtype, self.dtype()) {
            return Err(DispatchError::OutputDtypeMismatch {
                op,
                computed: dtype,
                target: self.dtype(),
            });
        }
        if shape != self.shape() {
            return Err(DispatchError::OutputShapeMismatch {
                op,
                computed: shape.clone(),
                target: self.shape().clone(),
            });
        }
        Ok(())
    }

    /// Stores `result`, already cast to the destination dtype, and returns a
    /// copy of what was stored.
    pub fn commit(self, result: Tensor) -> Tensor {
        debug_assert_eq!(result.dtype(), self.target.dtype());
        *self.target = result.clone();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_receive() {
        assert!(can_receive(DType::I64, DType::I8));
        assert!(can_receive(DType::I32, DType::F32));
        assert!(can_receive(DType::Bool, DType::U8));
        assert!(can_receive(DType::F64, DType::F16));
        assert!(!can_receive(DType::F32, DType::I32));
        assert!(!can_receive(DType::C64, DType::F64));
        assert!(!can_receive(DType::I8, DType::Bool));
    }

    #[test]
    fn test_check_rejects_dtype() {
        let mut buf = Tensor::zeros(Shape::new(vec![2]), DType::I32);
        let dest = Destination::new(&mut buf);
        let err = dest.check(OpId::Divide, DType::F32, &Shape::new(vec![2])).unwrap_err();
        assert!(matches!(err, DispatchError::OutputDtypeMismatch { .. }));
    }

    #[test]
    fn test_check_rejects_shape() {
        let mut buf = Tensor::zeros(Shape::new(vec![2]), DType::F32);
        let dest = Destination::new(&mut buf);
        let err = dest.check(OpId::Add, DType::F32, &Shape::new(vec![3])).unwrap_err();
        assert!(matches!(err, DispatchError::OutputShapeMismatch { .. }));
    }

    #[test]
    fn test_commit_stores() {
        let mut buf = Tensor::zeros(Shape::new(vec![2]), DType::F64);
        let stored = Destination::new(&mut buf).commit(Tensor::from_vec(vec![1.0f64, -2.0]));
        assert_eq!(stored.dtype(), DType::F64);
        assert_eq!(buf.as_slice::<f64>().unwrap(), &[1.0, -2.0]);
    }
}
