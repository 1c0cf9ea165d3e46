use std::fmt;
use std::str::FromStr;

use crate::error::TensorError;

/// Logical data types a tensor can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    /// IEEE 754 half precision (`half::f16`).
    F16,
    /// Brain floating point (`half::bf16`).
    BF16,
    F32,
    F64,
    /// Complex number with `f32` real and imaginary parts.
    C64,
    /// Complex number with `f64` real and imaginary parts.
    C128,
}

/// Coarse classification used by promotion and by dtype restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DTypeKind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    Complex,
}

impl DType {
    /// Every dtype, in declaration order.
    pub const ALL: [DType; 15] = [
        DType::Bool,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::F16,
        DType::BF16,
        DType::F32,
        DType::F64,
        DType::C64,
        DType::C128,
    ];

    pub fn kind(&self) -> DTypeKind {
        match self {
            DType::Bool => DTypeKind::Bool,
            DType::I8 | DType::I16 | DType::I32 | DType::I64 => DTypeKind::SignedInt,
            DType::U8 | DType::U16 | DType::U32 | DType::U64 => DTypeKind::UnsignedInt,
            DType::F16 | DType::BF16 | DType::F32 | DType::F64 => DTypeKind::Float,
            DType::C64 | DType::C128 => DTypeKind::Complex,
        }
    }

    /// Size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::Bool | DType::I8 | DType::U8 => 1,
            DType::I16 | DType::U16 | DType::F16 | DType::BF16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 | DType::C64 => 8,
            DType::C128 => 16,
        }
    }

    /// Number of value bits. Booleans count as a single bit.
    pub fn bits(&self) -> u32 {
        match self {
            DType::Bool => 1,
            other => other.size_in_bytes() as u32 * 8,
        }
    }

    pub fn is_bool(&self) -> bool {
        self.kind() == DTypeKind::Bool
    }

    /// True for signed and unsigned integers (not bool).
    pub fn is_integer(&self) -> bool {
        matches!(self.kind(), DTypeKind::SignedInt | DTypeKind::UnsignedInt)
    }

    pub fn is_signed_integer(&self) -> bool {
        self.kind() == DTypeKind::SignedInt
    }

    pub fn is_unsigned_integer(&self) -> bool {
        self.kind() == DTypeKind::UnsignedInt
    }

    pub fn is_float(&self) -> bool {
        self.kind() == DTypeKind::Float
    }

    pub fn is_complex(&self) -> bool {
        self.kind() == DTypeKind::Complex
    }

    /// The dtype of one component: `C64 -> F32`, `C128 -> F64`, anything else maps to itself.
    pub fn real_component(&self) -> DType {
        match self {
            DType::C64 => DType::F32,
            DType::C128 => DType::F64,
            other => *other,
        }
    }

    /// Inclusive value range of an integer dtype, as `i128` so both signed and
    /// unsigned 64-bit bounds fit. `None` for non-integer dtypes.
    pub fn integer_bounds(&self) -> Option<(i128, i128)> {
        match self {
            DType::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            DType::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            DType::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            DType::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            DType::U8 => Some((0, u8::MAX as i128)),
            DType::U16 => Some((0, u16::MAX as i128)),
            DType::U32 => Some((0, u32::MAX as i128)),
            DType::U64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Canonical name, e.g. `"int32"` or `"bfloat16"`.
    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::F16 => "float16",
            DType::BF16 => "bfloat16",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::C64 => "complex64",
            DType::C128 => "complex128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DType {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dtype = match s.trim().to_ascii_lowercase().as_str() {
            "bool" => DType::Bool,
            "int8" | "i8" => DType::I8,
            "int16" | "i16" => DType::I16,
            "int32" | "i32" => DType::I32,
            "int64" | "i64" => DType::I64,
            "uint8" | "u8" => DType::U8,
            "uint16" | "u16" => DType::U16,
            "uint32" | "u32" => DType::U32,
            "uint64" | "u64" => DType::U64,
            "float16" | "f16" | "half" => DType::F16,
            "bfloat16" | "bf16" => DType::BF16,
            "float32" | "f32" => DType::F32,
            "float64" | "f64" => DType::F64,
            "complex64" | "c64" => DType::C64,
            "complex128" | "c128" => DType::C128,
            _ => return Err(TensorError::UnsupportedDType(s.to_string())),
        };
        Ok(dtype)
    }
}

impl fmt::Display for DTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DTypeKind::Bool => write!(f, "bool"),
            DTypeKind::SignedInt => write!(f, "int"),
            DTypeKind::UnsignedInt => write!(f, "uint"),
            DTypeKind::Float => write!(f, "float"),
            DTypeKind::Complex => write!(f, "complex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_bytes() {
        assert_eq!(DType::Bool.size_in_bytes(), 1);
        assert_eq!(DType::BF16.size_in_bytes(), 2);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::C64.size_in_bytes(), 8);
        assert_eq!(DType::C128.size_in_bytes(), 16);
    }

    #[test]
    fn test_bits() {
        assert_eq!(DType::Bool.bits(), 1);
        assert_eq!(DType::I8.bits(), 8);
        assert_eq!(DType::U64.bits(), 64);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(DType::U16.kind(), DTypeKind::UnsignedInt);
        assert!(DType::I64.is_integer());
        assert!(!DType::Bool.is_integer());
        assert!(DType::BF16.is_float());
        assert!(DType::C128.is_complex());
        assert_eq!(DType::C64.real_component(), DType::F32);
        assert_eq!(DType::I8.real_component(), DType::I8);
    }

    #[test]
    fn test_name_roundtrip() {
        for dtype in DType::ALL {
            assert_eq!(dtype.name().parse::<DType>().unwrap(), dtype);
        }
        assert_eq!("f32".parse::<DType>().unwrap(), DType::F32);
        assert_eq!(" Int64 ".parse::<DType>().unwrap(), DType::I64);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("float8".parse::<DType>().is_err());
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(DType::U8.integer_bounds(), Some((0, 255)));
        assert_eq!(DType::I16.integer_bounds(), Some((-32768, 32767)));
        assert!(DType::F32.integer_bounds().is_none());
    }
}
