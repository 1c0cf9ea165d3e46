//! The dtype promotion lattice: bool < integer < float < complex.
//!
//! Both functions are symmetric. Arguments are ordered internally so that
//! `(a, b)` and `(b, a)` always take the same path.

use ew_tensor::{DType, DTypeKind};

use crate::error::{PromotionError, Result};
use crate::resolver::PromotionMode;

/// Smallest signed integer dtype with at least `bits` bits, if any.
fn signed_with_bits(bits: u32) -> Option<DType> {
    [DType::I8, DType::I16, DType::I32, DType::I64]
        .into_iter()
        .find(|d| d.bits() >= bits)
}

fn wider(a: DType, b: DType) -> DType {
    if a.bits() >= b.bits() {
        a
    } else {
        b
    }
}

/// Mixed signed/unsigned pair. `None` when no signed integer holds both,
/// which only happens for `u64`.
fn mixed_integers(signed: DType, unsigned: DType) -> Option<DType> {
    signed_with_bits(signed.bits().max(unsigned.bits() * 2))
}

fn floats(a: DType, b: DType) -> DType {
    match (a, b) {
        (DType::F16, DType::BF16) | (DType::BF16, DType::F16) => DType::F32,
        _ => wider(a, b),
    }
}

/// Complex dtype able to hold `complex` and the real dtype `other`.
fn complex_holding(complex: DType, other: DType) -> DType {
    let component = match other.kind() {
        DTypeKind::Float => floats(complex.real_component(), other),
        DTypeKind::Complex => wider(complex.real_component(), other.real_component()),
        _ => complex.real_component(),
    };
    if component.bits() > 32 {
        DType::C128
    } else {
        DType::C64
    }
}

/// Promotes two dtypes under the full lattice. Never fails.
pub(crate) fn promote_standard(a: DType, b: DType) -> DType {
    if a == b {
        return a;
    }
    let (a, b) = if a.kind() <= b.kind() { (a, b) } else { (b, a) };
    match (a.kind(), b.kind()) {
        (DTypeKind::Bool, _) => b,
        (DTypeKind::SignedInt, DTypeKind::SignedInt)
        | (DTypeKind::UnsignedInt, DTypeKind::UnsignedInt) => wider(a, b),
        (DTypeKind::SignedInt, DTypeKind::UnsignedInt) => {
            mixed_integers(a, b).unwrap_or(DType::F64)
        }
        (DTypeKind::SignedInt | DTypeKind::UnsignedInt, DTypeKind::Float) => b,
        (DTypeKind::Float, DTypeKind::Float) => floats(a, b),
        (_, DTypeKind::Complex) => complex_holding(b, a),
        // Kinds are ordered, so the first operand never outranks the second.
        _ => b,
    }
}

/// Promotes two dtypes under the array-API subset used by bitwise ops.
pub(crate) fn promote_array_api(a: DType, b: DType) -> Result<DType> {
    for dtype in [a, b] {
        if dtype.is_complex() {
            return Err(PromotionError::ComplexOperand { dtype });
        }
    }
    if a == b {
        return Ok(a);
    }
    let incompatible = PromotionError::Incompatible {
        lhs: a,
        rhs: b,
        mode: PromotionMode::ArrayApi,
    };
    let (lo, hi) = if a.kind() <= b.kind() { (a, b) } else { (b, a) };
    match (lo.kind(), hi.kind()) {
        (DTypeKind::SignedInt, DTypeKind::SignedInt)
        | (DTypeKind::UnsignedInt, DTypeKind::UnsignedInt) => Ok(wider(lo, hi)),
        (DTypeKind::SignedInt, DTypeKind::UnsignedInt) => {
            mixed_integers(lo, hi).ok_or(incompatible)
        }
        (DTypeKind::Float, DTypeKind::Float) => Ok(floats(lo, hi)),
        _ => Err(incompatible),
    }
}

/// Promotes two dtypes under `mode`.
pub fn promote_dtypes(a: DType, b: DType, mode: PromotionMode) -> Result<DType> {
    match mode {
        PromotionMode::Standard => Ok(promote_standard(a, b)),
        PromotionMode::ArrayApi => promote_array_api(a, b),
    }
}

/// True when every value of `from` is representable in `to`, i.e. promoting
/// the two yields `to`.
pub fn can_cast(from: DType, to: DType) -> bool {
    promote_standard(from, to) == to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_widening() {
        assert_eq!(promote_standard(DType::I32, DType::I64), DType::I64);
        assert_eq!(promote_standard(DType::U8, DType::U32), DType::U32);
        assert_eq!(promote_standard(DType::F32, DType::F64), DType::F64);
        assert_eq!(promote_standard(DType::C64, DType::C128), DType::C128);
    }

    #[test]
    fn test_mixed_sign_integers() {
        assert_eq!(promote_standard(DType::U8, DType::I8), DType::I16);
        assert_eq!(promote_standard(DType::U16, DType::I8), DType::I32);
        assert_eq!(promote_standard(DType::U8, DType::I32), DType::I32);
        assert_eq!(promote_standard(DType::U32, DType::I32), DType::I64);
        assert_eq!(promote_standard(DType::U64, DType::I8), DType::F64);
    }

    #[test]
    fn test_bool_yields_other() {
        for dtype in DType::ALL {
            assert_eq!(promote_standard(DType::Bool, dtype), dtype);
        }
    }

    #[test]
    fn test_cross_kind() {
        assert_eq!(promote_standard(DType::I64, DType::F16), DType::F16);
        assert_eq!(promote_standard(DType::F16, DType::BF16), DType::F32);
        assert_eq!(promote_standard(DType::F64, DType::C64), DType::C128);
        assert_eq!(promote_standard(DType::F32, DType::C64), DType::C64);
        assert_eq!(promote_standard(DType::I64, DType::C64), DType::C64);
        assert_eq!(promote_standard(DType::BF16, DType::C64), DType::C64);
    }

    #[test]
    fn test_array_api_subset() {
        assert_eq!(promote_array_api(DType::I8, DType::I32).unwrap(), DType::I32);
        assert_eq!(promote_array_api(DType::U8, DType::I8).unwrap(), DType::I16);
        assert_eq!(promote_array_api(DType::Bool, DType::Bool).unwrap(), DType::Bool);
        assert!(promote_array_api(DType::Bool, DType::I32).is_err());
        assert!(promote_array_api(DType::I32, DType::F32).is_err());
        assert!(promote_array_api(DType::U64, DType::I64).is_err());
        assert_eq!(
            promote_array_api(DType::C64, DType::C64),
            Err(PromotionError::ComplexOperand { dtype: DType::C64 })
        );
    }

    #[test]
    fn test_symmetry_all_pairs() {
        for a in DType::ALL {
            for b in DType::ALL {
                assert_eq!(promote_standard(a, b), promote_standard(b, a), "{a} {b}");
                assert_eq!(
                    promote_array_api(a, b).ok(),
                    promote_array_api(b, a).ok(),
                    "{a} {b}"
                );
            }
        }
    }

    #[test]
    fn test_idempotence_all_pairs() {
        for a in DType::ALL {
            for b in DType::ALL {
                let r = promote_standard(a, b);
                assert_eq!(promote_standard(r, r), r);
                // Promoting the result with either input changes nothing.
                assert_eq!(promote_standard(r, a), r);
                assert_eq!(promote_standard(r, b), r);
            }
        }
    }

    #[test]
    fn test_can_cast() {
        assert!(can_cast(DType::I8, DType::I64));
        assert!(can_cast(DType::Bool, DType::U8));
        assert!(can_cast(DType::F32, DType::C64));
        assert!(!can_cast(DType::F64, DType::F32));
        assert!(!can_cast(DType::F32, DType::I64));
        assert!(!can_cast(DType::I32, DType::U32));
    }
}
