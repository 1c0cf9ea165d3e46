use half::{bf16, f16};
use num_complex::{Complex32, Complex64};

use crate::dtype::{DType, DTypeKind};
use crate::element::Element;
use crate::error::{Result, TensorError};
use crate::scalar::Scalar;

/// CPU-side tensor storage, one variant per dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F16(Vec<f16>),
    BF16(Vec<bf16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<Complex32>),
    C128(Vec<Complex64>),
}

/// Runs `$body` with `$v` bound to the inner vector, whatever the variant.
macro_rules! with_storage {
    ($storage:expr, $v:ident => $body:expr) => {
        match $storage {
            CpuStorage::Bool($v) => $body,
            CpuStorage::I8($v) => $body,
            CpuStorage::I16($v) => $body,
            CpuStorage::I32($v) => $body,
            CpuStorage::I64($v) => $body,
            CpuStorage::U8($v) => $body,
            CpuStorage::U16($v) => $body,
            CpuStorage::U32($v) => $body,
            CpuStorage::U64($v) => $body,
            CpuStorage::F16($v) => $body,
            CpuStorage::BF16($v) => $body,
            CpuStorage::F32($v) => $body,
            CpuStorage::F64($v) => $body,
            CpuStorage::C64($v) => $body,
            CpuStorage::C128($v) => $body,
        }
    };
}

/// Like `with_storage!`, but rewraps the result in the same variant.
macro_rules! map_storage {
    ($storage:expr, $v:ident => $body:expr) => {
        match $storage {
            CpuStorage::Bool($v) => CpuStorage::Bool($body),
            CpuStorage::I8($v) => CpuStorage::I8($body),
            CpuStorage::I16($v) => CpuStorage::I16($body),
            CpuStorage::I32($v) => CpuStorage::I32($body),
            CpuStorage::I64($v) => CpuStorage::I64($body),
            CpuStorage::U8($v) => CpuStorage::U8($body),
            CpuStorage::U16($v) => CpuStorage::U16($body),
            CpuStorage::U32($v) => CpuStorage::U32($body),
            CpuStorage::U64($v) => CpuStorage::U64($body),
            CpuStorage::F16($v) => CpuStorage::F16($body),
            CpuStorage::BF16($v) => CpuStorage::BF16($body),
            CpuStorage::F32($v) => CpuStorage::F32($body),
            CpuStorage::F64($v) => CpuStorage::F64($body),
            CpuStorage::C64($v) => CpuStorage::C64($body),
            CpuStorage::C128($v) => CpuStorage::C128($body),
        }
    };
}

/// Calls a function generic over [`Element`] with the element type of `$dtype`.
macro_rules! dispatch_dtype {
    ($dtype:expr, $func:ident ( $($arg:expr),* )) => {
        match $dtype {
            DType::Bool => $func::<bool>($($arg),*),
            DType::I8 => $func::<i8>($($arg),*),
            DType::I16 => $func::<i16>($($arg),*),
            DType::I32 => $func::<i32>($($arg),*),
            DType::I64 => $func::<i64>($($arg),*),
            DType::U8 => $func::<u8>($($arg),*),
            DType::U16 => $func::<u16>($($arg),*),
            DType::U32 => $func::<u32>($($arg),*),
            DType::U64 => $func::<u64>($($arg),*),
            DType::F16 => $func::<f16>($($arg),*),
            DType::BF16 => $func::<bf16>($($arg),*),
            DType::F32 => $func::<f32>($($arg),*),
            DType::F64 => $func::<f64>($($arg),*),
            DType::C64 => $func::<Complex32>($($arg),*),
            DType::C128 => $func::<Complex64>($($arg),*),
        }
    };
}

fn collect_bools<T: Element>(data: &[bool]) -> CpuStorage {
    T::wrap(data.iter().map(|&v| T::from_bool(v)).collect())
}

fn collect_i64s<T: Element>(data: &[i64]) -> CpuStorage {
    T::wrap(data.iter().map(|&v| T::from_i64(v)).collect())
}

fn collect_u64s<T: Element>(data: &[u64]) -> CpuStorage {
    T::wrap(data.iter().map(|&v| T::from_u64(v)).collect())
}

fn collect_f64s<T: Element>(data: &[f64]) -> CpuStorage {
    T::wrap(data.iter().map(|&v| T::from_f64(v)).collect())
}

fn collect_complexes<T: Element>(data: &[Complex64]) -> CpuStorage {
    T::wrap(data.iter().map(|&v| T::from_complex(v)).collect())
}

impl CpuStorage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        with_storage!(self, v => v.len())
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            CpuStorage::Bool(_) => DType::Bool,
            CpuStorage::I8(_) => DType::I8,
            CpuStorage::I16(_) => DType::I16,
            CpuStorage::I32(_) => DType::I32,
            CpuStorage::I64(_) => DType::I64,
            CpuStorage::U8(_) => DType::U8,
            CpuStorage::U16(_) => DType::U16,
            CpuStorage::U32(_) => DType::U32,
            CpuStorage::U64(_) => DType::U64,
            CpuStorage::F16(_) => DType::F16,
            CpuStorage::BF16(_) => DType::BF16,
            CpuStorage::F32(_) => DType::F32,
            CpuStorage::F64(_) => DType::F64,
            CpuStorage::C64(_) => DType::C64,
            CpuStorage::C128(_) => DType::C128,
        }
    }

    /// Borrows the data as a slice of `T`.
    ///
    /// # Errors
    /// Returns an error if `T` is not the element type of this storage.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::slice(self).ok_or(TensorError::DTypeMismatch {
            expected: T::DTYPE,
            got: self.dtype(),
        })
    }

    /// Create zero-filled storage for the given dtype and element count.
    pub fn zeros(dtype: DType, n: usize) -> Self {
        Self::from_i64s(dtype, &vec![0; n])
    }

    /// Create storage of `n` copies of `value` converted to `dtype`.
    pub fn full(dtype: DType, value: Scalar, n: usize) -> Self {
        match dtype.kind() {
            DTypeKind::Bool => CpuStorage::Bool(vec![value.as_bool(); n]),
            DTypeKind::SignedInt | DTypeKind::UnsignedInt => {
                Self::from_i64s(dtype, &vec![value.as_i64(); n])
            }
            DTypeKind::Float => Self::from_f64s(dtype, &vec![value.as_f64(); n]),
            DTypeKind::Complex => Self::from_complexes(dtype, &vec![value.as_complex(); n]),
        }
    }

    pub fn from_bools(dtype: DType, data: &[bool]) -> Self {
        dispatch_dtype!(dtype, collect_bools(data))
    }

    pub fn from_i64s(dtype: DType, data: &[i64]) -> Self {
        dispatch_dtype!(dtype, collect_i64s(data))
    }

    pub fn from_u64s(dtype: DType, data: &[u64]) -> Self {
        dispatch_dtype!(dtype, collect_u64s(data))
    }

    pub fn from_f64s(dtype: DType, data: &[f64]) -> Self {
        dispatch_dtype!(dtype, collect_f64s(data))
    }

    pub fn from_complexes(dtype: DType, data: &[Complex64]) -> Self {
        dispatch_dtype!(dtype, collect_complexes(data))
    }

    /// Lifts every element into the boolean lane (`x != 0`).
    pub fn to_bool_vec(&self) -> Vec<bool> {
        with_storage!(self, v => v.iter().map(|x| Element::to_bool(*x)).collect())
    }

    /// Lifts every element into the signed 64-bit lane.
    pub fn to_i64_vec(&self) -> Vec<i64> {
        with_storage!(self, v => v.iter().map(|x| Element::to_i64(*x)).collect())
    }

    /// Lifts every element into the unsigned 64-bit lane.
    pub fn to_u64_vec(&self) -> Vec<u64> {
        with_storage!(self, v => v.iter().map(|x| Element::to_u64(*x)).collect())
    }

    /// Lifts every element into the `f64` lane. Complex values keep their real part.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_storage!(self, v => v.iter().map(|x| Element::to_f64(*x)).collect())
    }

    pub fn to_complex_vec(&self) -> Vec<Complex64> {
        with_storage!(self, v => v.iter().map(|x| Element::to_complex(*x)).collect())
    }

    /// Converts the storage to `dtype`, routing through the lane of the
    /// target kind.
    pub fn cast(&self, dtype: DType) -> Self {
        if self.dtype() == dtype {
            return self.clone();
        }
        match dtype.kind() {
            DTypeKind::Bool => CpuStorage::Bool(self.to_bool_vec()),
            DTypeKind::SignedInt => Self::from_i64s(dtype, &self.to_i64_vec()),
            DTypeKind::UnsignedInt => match self.dtype().kind() {
                // Signed sources go through i64 so negatives wrap instead of saturating.
                DTypeKind::SignedInt => Self::from_i64s(dtype, &self.to_i64_vec()),
                _ => Self::from_u64s(dtype, &self.to_u64_vec()),
            },
            DTypeKind::Float => Self::from_f64s(dtype, &self.to_f64_vec()),
            DTypeKind::Complex => Self::from_complexes(dtype, &self.to_complex_vec()),
        }
    }

    /// Picks `on_true[i]` where `mask[i]` holds and `on_false[i]` elsewhere.
    ///
    /// # Errors
    /// Returns an error if the two branches differ in dtype.
    pub fn select(mask: &[bool], on_true: &CpuStorage, on_false: &CpuStorage) -> Result<Self> {
        macro_rules! pick {
            ($($variant:ident),+) => {
                match (on_true, on_false) {
                    $(
                        (CpuStorage::$variant(t), CpuStorage::$variant(f)) => CpuStorage::$variant(
                            mask.iter()
                                .zip(t.iter().zip(f.iter()))
                                .map(|(&m, (&x, &y))| if m { x } else { y })
                                .collect(),
                        ),
                    )+
                    _ => {
                        return Err(TensorError::DTypeMismatch {
                            expected: on_true.dtype(),
                            got: on_false.dtype(),
                        })
                    }
                }
            };
        }
        Ok(pick!(Bool, I8, I16, I32, I64, U8, U16, U32, U64, F16, BF16, F32, F64, C64, C128))
    }

    /// Builds new storage by picking elements at `indices`.
    pub fn gather(&self, indices: &[usize]) -> Self {
        map_storage!(self, v => indices.iter().map(|&i| v[i]).collect())
    }
}
