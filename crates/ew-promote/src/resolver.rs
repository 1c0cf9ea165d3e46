use std::fmt;

use ew_tensor::{DType, DTypeKind, Scalar};
use log::trace;

use crate::error::Result;
use crate::lattice;

/// Which promotion table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionMode {
    /// The full lattice, including mixed-kind promotion.
    Standard,
    /// The strict subset used by bitwise and shift ops: no int/float mixing,
    /// no bool/int mixing, no complex.
    ArrayApi,
}

impl fmt::Display for PromotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionMode::Standard => write!(f, "standard"),
            PromotionMode::ArrayApi => write!(f, "array-api"),
        }
    }
}

/// What the resolver knows about one operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeDesc {
    Array(DType),
    /// A weakly typed literal. Its value matters: an integer literal that
    /// does not fit the accompanying array's dtype is widened.
    Scalar(Scalar),
}

impl From<DType> for TypeDesc {
    fn from(dtype: DType) -> Self {
        TypeDesc::Array(dtype)
    }
}

impl From<Scalar> for TypeDesc {
    fn from(value: Scalar) -> Self {
        TypeDesc::Scalar(value)
    }
}

/// Computes common computation dtypes.
///
/// A `Promoter` only carries the default dtypes literals receive; it holds no
/// other state and is cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promoter {
    default_int: DType,
    default_float: DType,
}

impl Promoter {
    pub fn new() -> Self {
        Promoter {
            default_int: DType::I64,
            default_float: DType::F32,
        }
    }

    /// A promoter with custom literal defaults. `default_int` should be a
    /// signed integer dtype and `default_float` a float dtype.
    pub fn with_defaults(default_int: DType, default_float: DType) -> Self {
        Promoter {
            default_int,
            default_float,
        }
    }

    pub fn default_int(&self) -> DType {
        self.default_int
    }

    pub fn default_float(&self) -> DType {
        self.default_float
    }

    /// Complex dtype whose components match the default float.
    pub fn default_complex(&self) -> DType {
        if self.default_float.bits() <= 32 {
            DType::C64
        } else {
            DType::C128
        }
    }

    /// The dtype a literal takes when nothing else constrains it.
    pub fn scalar_dtype(&self, value: &Scalar) -> DType {
        match value {
            Scalar::Bool(_) => DType::Bool,
            Scalar::Int(_) => self.default_int,
            Scalar::Float(_) => self.default_float,
            Scalar::Complex(_) => self.default_complex(),
        }
    }

    /// The dtype a literal takes next to an array of `array` dtype.
    fn weak_scalar_dtype(&self, value: &Scalar, array: DType) -> DType {
        match (value, array.kind()) {
            (Scalar::Complex(_), kind) if kind != DTypeKind::Complex => DType::C128,
            (Scalar::Float(_), DTypeKind::Bool | DTypeKind::SignedInt | DTypeKind::UnsignedInt) => {
                DType::F64
            }
            (Scalar::Bool(_), _) => array,
            (_, DTypeKind::Bool) => self.scalar_dtype(value),
            (Scalar::Int(v), _) => match array.integer_bounds() {
                Some((lo, hi)) if !(lo..=hi).contains(&(*v as i128)) => self.default_int,
                _ => array,
            },
            _ => array,
        }
    }

    /// Resolves the computation dtype for one or two operands.
    ///
    /// A single operand keeps its own dtype. For two operands each side is
    /// first given a dtype (a literal next to an array defers to the array
    /// unless its value needs more), then the pair is promoted under `mode`.
    pub fn resolve(&self, a: TypeDesc, b: Option<TypeDesc>, mode: PromotionMode) -> Result<DType> {
        let Some(b) = b else {
            return Ok(match a {
                TypeDesc::Array(dtype) => dtype,
                TypeDesc::Scalar(value) => self.scalar_dtype(&value),
            });
        };
        let (lhs, rhs) = match (a, b) {
            (TypeDesc::Array(x), TypeDesc::Array(y)) => (x, y),
            (TypeDesc::Array(x), TypeDesc::Scalar(s)) => (x, self.weak_scalar_dtype(&s, x)),
            (TypeDesc::Scalar(s), TypeDesc::Array(y)) => (self.weak_scalar_dtype(&s, y), y),
            (TypeDesc::Scalar(s), TypeDesc::Scalar(t)) => {
                (self.scalar_dtype(&s), self.scalar_dtype(&t))
            }
        };
        let dtype = lattice::promote_dtypes(lhs, rhs, mode)?;
        trace!("promote {} x {} ({}) -> {}", lhs, rhs, mode, dtype);
        Ok(dtype)
    }

    pub fn promote_dtypes(&self, a: DType, b: DType, mode: PromotionMode) -> Result<DType> {
        lattice::promote_dtypes(a, b, mode)
    }

    pub fn can_cast(&self, from: DType, to: DType) -> bool {
        lattice::can_cast(from, to)
    }
}

impl Default for Promoter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromotionError;
    use ew_tensor::Complex64;

    fn promoter() -> Promoter {
        let _ = env_logger::builder().is_test(true).try_init();
        Promoter::new()
    }

    fn arr(dtype: DType) -> TypeDesc {
        TypeDesc::Array(dtype)
    }

    fn lit(value: impl Into<Scalar>) -> TypeDesc {
        TypeDesc::Scalar(value.into())
    }

    #[test]
    fn test_unary_keeps_dtype() {
        let p = promoter();
        for dtype in DType::ALL {
            assert_eq!(p.resolve(arr(dtype), None, PromotionMode::Standard).unwrap(), dtype);
            assert_eq!(p.resolve(arr(dtype), None, PromotionMode::ArrayApi).unwrap(), dtype);
        }
        assert_eq!(p.resolve(lit(3), None, PromotionMode::Standard).unwrap(), DType::I64);
        assert_eq!(p.resolve(lit(0.5), None, PromotionMode::Standard).unwrap(), DType::F32);
    }

    #[test]
    fn test_scalar_defaults() {
        let p = promoter();
        assert_eq!(p.scalar_dtype(&Scalar::Bool(true)), DType::Bool);
        assert_eq!(p.scalar_dtype(&Scalar::Int(1)), DType::I64);
        assert_eq!(p.scalar_dtype(&Scalar::Float(1.0)), DType::F32);
        assert_eq!(p.scalar_dtype(&Scalar::Complex(Complex64::new(0.0, 1.0))), DType::C64);

        let wide = Promoter::with_defaults(DType::I32, DType::F64);
        assert_eq!(wide.scalar_dtype(&Scalar::Int(1)), DType::I32);
        assert_eq!(wide.default_complex(), DType::C128);
    }

    #[test]
    fn test_two_scalars() {
        let p = promoter();
        let r = p.resolve(lit(2), Some(lit(3.0)), PromotionMode::Standard).unwrap();
        assert_eq!(r, DType::F32);
        let r = p.resolve(lit(true), Some(lit(0)), PromotionMode::Standard).unwrap();
        assert_eq!(r, DType::I64);
    }

    #[test]
    fn test_array_dtype_wins_over_literal() {
        let p = promoter();
        let standard = PromotionMode::Standard;
        assert_eq!(p.resolve(arr(DType::I8), Some(lit(3)), standard).unwrap(), DType::I8);
        assert_eq!(p.resolve(lit(3), Some(arr(DType::U16)), standard).unwrap(), DType::U16);
        assert_eq!(p.resolve(arr(DType::F16), Some(lit(0.1)), standard).unwrap(), DType::F16);
        assert_eq!(p.resolve(arr(DType::I32), Some(lit(true)), standard).unwrap(), DType::I32);
        assert_eq!(p.resolve(arr(DType::C64), Some(lit(2.0)), standard).unwrap(), DType::C64);
    }

    #[test]
    fn test_literal_needing_more_wins() {
        let p = promoter();
        let standard = PromotionMode::Standard;
        // A float literal keeps its full precision against an integer array.
        assert_eq!(p.resolve(arr(DType::I32), Some(lit(0.5)), standard).unwrap(), DType::F64);
        assert_eq!(p.resolve(arr(DType::Bool), Some(lit(0.5)), standard).unwrap(), DType::F64);
        let c = Scalar::Complex(Complex64::new(1.0, 1.0));
        assert_eq!(p.resolve(arr(DType::F32), Some(lit(c)), standard).unwrap(), DType::C128);
        assert_eq!(p.resolve(arr(DType::Bool), Some(lit(2)), standard).unwrap(), DType::I64);
        // 300 does not fit in u8, -1 does not fit in u32.
        assert_eq!(p.resolve(arr(DType::U8), Some(lit(300)), standard).unwrap(), DType::I64);
        assert_eq!(p.resolve(lit(-1), Some(arr(DType::U32)), standard).unwrap(), DType::I64);
        assert_eq!(p.resolve(arr(DType::U64), Some(lit(-1)), standard).unwrap(), DType::F64);
    }

    #[test]
    fn test_scalar_side_symmetry() {
        let p = promoter();
        let literals = [
            Scalar::Bool(false),
            Scalar::Int(7),
            Scalar::Int(-40000),
            Scalar::Float(1.5),
            Scalar::Complex(Complex64::new(0.0, 2.0)),
        ];
        for dtype in DType::ALL {
            for value in literals {
                for mode in [PromotionMode::Standard, PromotionMode::ArrayApi] {
                    let left = p.resolve(arr(dtype), Some(lit(value)), mode).ok();
                    let right = p.resolve(lit(value), Some(arr(dtype)), mode).ok();
                    assert_eq!(left, right, "{dtype} {value} {mode}");
                }
            }
        }
    }

    #[test]
    fn test_resolved_dtype_is_fixed_point() {
        let p = promoter();
        for a in DType::ALL {
            for b in DType::ALL {
                let r = p.resolve(arr(a), Some(arr(b)), PromotionMode::Standard).unwrap();
                let again = p.resolve(arr(r), Some(arr(r)), PromotionMode::Standard).unwrap();
                assert_eq!(again, r);
            }
        }
    }

    #[test]
    fn test_array_api_failures() {
        let p = promoter();
        let api = PromotionMode::ArrayApi;
        assert_eq!(
            p.resolve(arr(DType::I32), Some(arr(DType::F32)), api),
            Err(PromotionError::Incompatible {
                lhs: DType::I32,
                rhs: DType::F32,
                mode: api,
            })
        );
        assert!(matches!(
            p.resolve(arr(DType::C64), Some(arr(DType::I8)), api),
            Err(PromotionError::ComplexOperand { dtype: DType::C64 })
        ));
        assert!(p.resolve(arr(DType::I8), Some(lit(0.5)), api).is_err());
        assert!(p.resolve(arr(DType::Bool), Some(lit(1)), api).is_err());
        assert_eq!(p.resolve(arr(DType::U8), Some(lit(3)), api).unwrap(), DType::U8);
    }

    #[test]
    fn test_error_messages() {
        let err = PromotionError::Incompatible {
            lhs: DType::U64,
            rhs: DType::I8,
            mode: PromotionMode::ArrayApi,
        };
        assert_eq!(
            err.to_string(),
            "no common dtype for uint64 and int8 under array-api promotion"
        );
    }
}
