//! Static table of dtypes each operation refuses, scoped by backend version.

use ew_tensor::{BackendVersion, DType, DTypeKind};

use crate::error::{DispatchError, Result};
use crate::registry::OpId;

/// Matches a set of dtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DTypeFilter {
    Kind(DTypeKind),
    Exact(DType),
}

impl DTypeFilter {
    pub fn matches(&self, dtype: DType) -> bool {
        match *self {
            DTypeFilter::Kind(kind) => dtype.kind() == kind,
            DTypeFilter::Exact(d) => dtype == d,
        }
    }
}

/// Dtypes excluded for a group of operations.
#[derive(Debug, Clone, Copy)]
pub struct Restriction {
    pub ops: &'static [OpId],
    /// Newest backend version the restriction applies to. `None` means
    /// every version.
    pub up_to: Option<BackendVersion>,
    pub excluded: &'static [DTypeFilter],
}

impl Restriction {
    pub fn applies(&self, op: OpId, version: BackendVersion) -> bool {
        self.ops.contains(&op) && self.up_to.map_or(true, |last| version <= last)
    }
}

const COMPLEX: DTypeFilter = DTypeFilter::Kind(DTypeKind::Complex);
const FLOAT: DTypeFilter = DTypeFilter::Kind(DTypeKind::Float);
const BOOL: DTypeFilter = DTypeFilter::Kind(DTypeKind::Bool);
const UP_TO_2_0_1: Option<BackendVersion> = Some(BackendVersion::new(2, 0, 1));

const BITWISE: &[OpId] = &[
    OpId::BitwiseAnd,
    OpId::BitwiseOr,
    OpId::BitwiseXor,
    OpId::BitwiseInvert,
    OpId::BitwiseLeftShift,
    OpId::BitwiseRightShift,
];

pub static RESTRICTIONS: &[Restriction] = &[
    Restriction {
        ops: BITWISE,
        up_to: UP_TO_2_0_1,
        excluded: &[COMPLEX],
    },
    Restriction {
        ops: &[
            OpId::Ceil,
            OpId::Floor,
            OpId::Round,
            OpId::Trunc,
            OpId::Sign,
            OpId::Sqrt,
            OpId::Exp,
            OpId::Expm1,
            OpId::Log,
            OpId::Log2,
            OpId::Log10,
            OpId::Log1p,
            OpId::Sin,
            OpId::Cos,
            OpId::Tan,
            OpId::Asin,
            OpId::Acos,
            OpId::Atan,
            OpId::Sinh,
            OpId::Cosh,
            OpId::Tanh,
            OpId::Asinh,
            OpId::Acosh,
            OpId::Atanh,
            OpId::Erf,
            OpId::Less,
            OpId::LessEqual,
            OpId::Greater,
            OpId::GreaterEqual,
            OpId::LogicalXor,
            OpId::FloorDivide,
            OpId::TruncDivide,
            OpId::Remainder,
            OpId::Minimum,
            OpId::Maximum,
            OpId::LogAddExp,
            OpId::Lcm,
            OpId::Reciprocal,
        ],
        up_to: UP_TO_2_0_1,
        excluded: &[COMPLEX],
    },
    Restriction {
        ops: &[OpId::Atan2],
        up_to: UP_TO_2_0_1,
        excluded: &[
            COMPLEX,
            DTypeFilter::Exact(DType::F16),
            DTypeFilter::Exact(DType::BF16),
        ],
    },
    Restriction {
        ops: &[OpId::Fmod],
        up_to: UP_TO_2_0_1,
        excluded: &[DTypeFilter::Exact(DType::BF16), COMPLEX],
    },
    // Integer-domain ops have no float kernels on any version.
    Restriction {
        ops: BITWISE,
        up_to: None,
        excluded: &[FLOAT],
    },
    Restriction {
        ops: &[OpId::Lcm],
        up_to: None,
        excluded: &[FLOAT, BOOL, COMPLEX],
    },
    // No bool kernels for these.
    Restriction {
        ops: &[
            OpId::Negative,
            OpId::Subtract,
            OpId::Remainder,
            OpId::Fmod,
            OpId::Pow,
            OpId::BitwiseLeftShift,
            OpId::BitwiseRightShift,
        ],
        up_to: None,
        excluded: &[BOOL],
    },
];

/// True when `op` accepts `dtype` on `version`.
pub fn is_supported(op: OpId, dtype: DType, version: BackendVersion) -> bool {
    !RESTRICTIONS
        .iter()
        .filter(|r| r.applies(op, version))
        .any(|r| r.excluded.iter().any(|f| f.matches(dtype)))
}

/// Fails with `UnsupportedDtype` when `op` refuses `dtype` on `version`.
pub fn check(op: OpId, dtype: DType, version: BackendVersion) -> Result<()> {
    if is_supported(op, dtype, version) {
        Ok(())
    } else {
        Err(DispatchError::UnsupportedDtype { op, dtype, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V2_0_1: BackendVersion = BackendVersion::new(2, 0, 1);
    const V2_1_0: BackendVersion = BackendVersion::new(2, 1, 0);

    #[test]
    fn test_complex_restricted_up_to_2_0_1() {
        assert!(!is_supported(OpId::Asin, DType::C64, V2_0_1));
        assert!(!is_supported(OpId::Asin, DType::C128, BackendVersion::new(1, 13, 0)));
        assert!(is_supported(OpId::Asin, DType::C64, V2_1_0));
        assert!(is_supported(OpId::Asin, DType::F32, V2_0_1));
    }

    #[test]
    fn test_exact_filters() {
        assert!(!is_supported(OpId::Atan2, DType::BF16, V2_0_1));
        assert!(!is_supported(OpId::Atan2, DType::F16, V2_0_1));
        assert!(is_supported(OpId::Atan2, DType::F32, V2_0_1));
        assert!(!is_supported(OpId::Fmod, DType::BF16, V2_0_1));
        assert!(is_supported(OpId::Fmod, DType::F16, V2_0_1));
    }

    #[test]
    fn test_unrestricted_ops() {
        for dtype in DType::ALL {
            assert!(is_supported(OpId::Add, dtype, V2_0_1));
            assert!(is_supported(OpId::Equal, dtype, V2_0_1));
        }
    }

    #[test]
    fn test_all_version_restrictions() {
        assert!(!is_supported(OpId::BitwiseAnd, DType::F32, V2_1_0));
        assert!(!is_supported(OpId::Lcm, DType::Bool, V2_1_0));
        assert!(is_supported(OpId::BitwiseAnd, DType::Bool, V2_1_0));
        assert!(is_supported(OpId::Lcm, DType::U8, V2_1_0));
    }

    #[test]
    fn test_bool_excluded_without_bool_kernel() {
        for op in [OpId::BitwiseLeftShift, OpId::BitwiseRightShift, OpId::Negative, OpId::Pow] {
            assert!(!is_supported(op, DType::Bool, V2_1_0), "{op}");
        }
        assert!(is_supported(OpId::BitwiseAnd, DType::Bool, V2_1_0));
        assert!(is_supported(OpId::Add, DType::Bool, V2_1_0));
        assert!(is_supported(OpId::Sign, DType::U8, V2_1_0));
    }

    #[test]
    fn test_check_error() {
        let err = check(OpId::Sin, DType::C64, V2_0_1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sin does not support dtype complex64 on backend version 2.0.1"
        );
    }
}
