pub mod binary;
pub mod unary;

use log::trace;

use crate::backend::{BackendVersion, ComputeBackend};
use crate::dtype::{DType, DTypeKind};
use crate::error::{Result, TensorError};
use crate::kernel::{BinaryKernel, UnaryKernel};
use crate::scalar::Scalar;
use crate::shape::Shape;
use crate::storage::CpuStorage;
use crate::tensor::Tensor;

/// Pure-Rust CPU compute backend.
///
/// Implements all kernels with straightforward loops optimized for
/// correctness rather than peak performance. Intended as a reference
/// implementation and fallback.
#[derive(Debug, Clone)]
pub struct CpuBackend {
    version: BackendVersion,
}

impl CpuBackend {
    /// Version reported when none is configured.
    pub const DEFAULT_VERSION: BackendVersion = BackendVersion::new(2, 0, 1);

    pub fn new() -> Self {
        CpuBackend {
            version: Self::DEFAULT_VERSION,
        }
    }

    /// A backend that reports `version`, so dtype restrictions for that
    /// version apply.
    pub fn with_version(version: BackendVersion) -> Self {
        CpuBackend { version }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn version(&self) -> BackendVersion {
        self.version
    }

    fn unary(&self, kernel: UnaryKernel, x: &Tensor) -> Result<Tensor> {
        trace!("cpu unary {} on {} {}", kernel, x.dtype(), x.shape());
        unary::apply(kernel, x)
    }

    fn binary(&self, kernel: BinaryKernel, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        trace!(
            "cpu binary {} on {} {} x {}",
            kernel,
            a.dtype(),
            a.shape(),
            b.shape()
        );
        binary::apply(kernel, a, b)
    }

    fn cast(&self, x: &Tensor, dtype: DType) -> Result<Tensor> {
        if x.dtype() != dtype {
            trace!("cpu cast {} -> {}", x.dtype(), dtype);
        }
        Ok(x.cast(dtype))
    }

    fn full(&self, value: Scalar, dtype: DType, shape: &Shape) -> Result<Tensor> {
        Tensor::from_storage(CpuStorage::full(dtype, value, shape.numel()), shape.clone())
    }

    fn select(&self, mask: &Tensor, on_true: &Tensor, on_false: &Tensor) -> Result<Tensor> {
        if mask.dtype() != DType::Bool {
            return Err(TensorError::DTypeMismatch {
                expected: DType::Bool,
                got: mask.dtype(),
            });
        }
        let shape = Shape::broadcast_all(&[mask.shape(), on_true.shape(), on_false.shape()])?;
        let mask = mask.broadcast_to(&shape)?;
        let on_true = on_true.broadcast_to(&shape)?;
        let on_false = on_false.broadcast_to(&shape)?;
        let out = CpuStorage::select(
            &mask.to_bool_vec(),
            on_true.storage(),
            on_false.storage(),
        )?;
        Tensor::from_storage(out, shape)
    }

    fn clamp(&self, x: &Tensor, min: Scalar, max: Scalar) -> Result<Tensor> {
        let dtype = x.dtype();
        let storage = x.storage();
        let out = match dtype.kind() {
            DTypeKind::Bool | DTypeKind::SignedInt => {
                let (lo, hi) = (min.as_i64(), max.as_i64());
                let v: Vec<i64> = storage.to_i64_vec().iter().map(|&e| e.clamp(lo, hi)).collect();
                CpuStorage::from_i64s(dtype, &v)
            }
            DTypeKind::UnsignedInt => {
                let lo = min.as_i64().max(0) as u64;
                let hi = max.as_i64().max(0) as u64;
                let v: Vec<u64> = storage.to_u64_vec().iter().map(|&e| e.clamp(lo, hi)).collect();
                CpuStorage::from_u64s(dtype, &v)
            }
            DTypeKind::Float => {
                let (lo, hi) = (min.as_f64(), max.as_f64());
                let v: Vec<f64> = storage.to_f64_vec().iter().map(|&e| e.clamp(lo, hi)).collect();
                CpuStorage::from_f64s(dtype, &v)
            }
            DTypeKind::Complex => {
                return Err(TensorError::UnsupportedKernel {
                    kernel: "clamp".to_string(),
                    dtype,
                })
            }
        };
        Tensor::from_storage(out, x.shape().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> CpuBackend {
        CpuBackend::new()
    }

    #[test]
    fn test_name_and_version() {
        let b = backend();
        assert_eq!(b.name(), "cpu");
        assert_eq!(b.version(), BackendVersion::new(2, 0, 1));
        let newer = CpuBackend::with_version(BackendVersion::new(2, 2, 0));
        assert_eq!(newer.version().minor, 2);
    }

    #[test]
    fn test_add() {
        let b = backend();
        let x = Tensor::from_vec(vec![1.0f32, 2.0]);
        let y = Tensor::from_vec(vec![3.0f32, 4.0]);
        let r = b.binary(BinaryKernel::Add, &x, &y).unwrap();
        assert_eq!(r.as_slice::<f32>().unwrap(), &[4.0, 6.0]);
    }

    #[test]
    fn test_add_length_mismatch() {
        let b = backend();
        let x = Tensor::from_vec(vec![1.0f32]);
        let y = Tensor::from_vec(vec![1.0f32, 2.0]);
        // A length-1 axis broadcasts, a length-3 one does not.
        assert!(b.binary(BinaryKernel::Add, &x, &y).is_ok());
        let z = Tensor::from_vec(vec![1.0f32, 2.0, 3.0]);
        assert!(b.binary(BinaryKernel::Add, &y, &z).is_err());
    }

    #[test]
    fn test_full() {
        let b = backend();
        let t = b.full(Scalar::Int(3), DType::I16, &Shape::new(vec![2])).unwrap();
        assert_eq!(t.as_slice::<i16>().unwrap(), &[3, 3]);
    }

    #[test]
    fn test_select_broadcasts() {
        let b = backend();
        let mask = Tensor::from_vec(vec![true, false, true]);
        let on_true = Tensor::from_vec(vec![1i32, 2, 3]);
        let on_false = Tensor::new(vec![0i32], Shape::scalar());
        let r = b.select(&mask, &on_true, &on_false).unwrap();
        assert_eq!(r.as_slice::<i32>().unwrap(), &[1, 0, 3]);
    }

    #[test]
    fn test_select_requires_bool_mask() {
        let b = backend();
        let mask = Tensor::from_vec(vec![1u8]);
        let x = Tensor::from_vec(vec![1i32]);
        assert!(b.select(&mask, &x, &x).is_err());
    }

    #[test]
    fn test_clamp() {
        let b = backend();
        let x = Tensor::from_vec(vec![-3i8, 5, 100]);
        let r = b.clamp(&x, Scalar::Int(0), Scalar::Int(7)).unwrap();
        assert_eq!(r.as_slice::<i8>().unwrap(), &[0, 5, 7]);

        let u = Tensor::from_vec(vec![0u32, 40]);
        let r = b.clamp(&u, Scalar::Int(0), Scalar::Int(31)).unwrap();
        assert_eq!(r.as_slice::<u32>().unwrap(), &[0, 31]);
    }

    #[test]
    fn test_cast() {
        let b = backend();
        let x = Tensor::from_vec(vec![1i32, 0]);
        let r = b.cast(&x, DType::Bool).unwrap();
        assert_eq!(r.as_slice::<bool>().unwrap(), &[true, false]);
    }
}
