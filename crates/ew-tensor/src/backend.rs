use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::kernel::{BinaryKernel, UnaryKernel};
use crate::scalar::Scalar;
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Version of a native engine, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackendVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl BackendVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        BackendVersion {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for BackendVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for BackendVersion {
    type Err = TensorError;

    /// Parses `"major[.minor[.patch]]"`. Missing components default to zero and
    /// a local build suffix such as `"+cpu"` is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let core = s.trim().split('+').next().unwrap_or_default();
        let mut parts = [0u32; 3];
        let mut count = 0;
        for (i, piece) in core.split('.').enumerate() {
            if i >= 3 {
                return Err(TensorError::InvalidVersion(s.to_string()));
            }
            parts[i] = piece
                .parse()
                .map_err(|_| TensorError::InvalidVersion(s.to_string()))?;
            count += 1;
        }
        if count == 0 {
            return Err(TensorError::InvalidVersion(s.to_string()));
        }
        Ok(BackendVersion::new(parts[0], parts[1], parts[2]))
    }
}

/// Trait for pluggable native tensor engines.
///
/// A backend executes already-typed elementwise kernels. Callers are expected
/// to hand it operands that share one dtype (for binary kernels) and to
/// reject dtypes they know the backend cannot handle; a backend still returns
/// `TensorError::UnsupportedKernel` rather than producing garbage.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// Version of the engine, used to look up dtype restrictions.
    fn version(&self) -> BackendVersion;

    /// Applies a unary kernel. Predicate kernels return `Bool`; every other
    /// kernel keeps the input dtype, except `Abs` on complex input which
    /// returns the real component dtype.
    fn unary(&self, kernel: UnaryKernel, x: &Tensor) -> Result<Tensor>;

    /// Applies a binary kernel to two tensors of the same dtype, broadcasting
    /// their shapes. Predicate kernels return `Bool`.
    fn binary(&self, kernel: BinaryKernel, a: &Tensor, b: &Tensor) -> Result<Tensor>;

    /// Converts `x` to `dtype`.
    fn cast(&self, x: &Tensor, dtype: DType) -> Result<Tensor>;

    /// Materializes `value` as a tensor of `dtype` and `shape`.
    fn full(&self, value: Scalar, dtype: DType, shape: &Shape) -> Result<Tensor>;

    /// Elementwise `mask ? on_true : on_false`. `mask` must be `Bool`; the two
    /// branches must share a dtype. All three are broadcast together.
    fn select(&self, mask: &Tensor, on_true: &Tensor, on_false: &Tensor) -> Result<Tensor>;

    /// Clamps every element into `[min, max]`, converted to the tensor's dtype.
    fn clamp(&self, x: &Tensor, min: Scalar, max: Scalar) -> Result<Tensor>;
}
