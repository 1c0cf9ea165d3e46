use std::fmt;

use half::{bf16, f16};
use num_complex::{Complex32, Complex64};

use crate::dtype::DTypeKind;

/// A raw language scalar that has not been given a dtype yet.
///
/// Scalars are "weak": during promotion an accompanying array's dtype takes
/// precedence unless the literal's value would not survive the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex64),
}

impl Scalar {
    /// The kind of literal this is. Integers always report `SignedInt`.
    pub fn kind(&self) -> DTypeKind {
        match self {
            Scalar::Bool(_) => DTypeKind::Bool,
            Scalar::Int(_) => DTypeKind::SignedInt,
            Scalar::Float(_) => DTypeKind::Float,
            Scalar::Complex(_) => DTypeKind::Complex,
        }
    }

    pub fn as_bool(&self) -> bool {
        match *self {
            Scalar::Bool(b) => b,
            Scalar::Int(i) => i != 0,
            Scalar::Float(x) => x != 0.0,
            Scalar::Complex(c) => c.re != 0.0 || c.im != 0.0,
        }
    }

    /// Integer value; floats truncate toward zero, complex keeps the real part.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Scalar::Bool(b) => b as i64,
            Scalar::Int(i) => i,
            Scalar::Float(x) => x as i64,
            Scalar::Complex(c) => c.re as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::Bool(b) => b as u8 as f64,
            Scalar::Int(i) => i as f64,
            Scalar::Float(x) => x,
            Scalar::Complex(c) => c.re,
        }
    }

    pub fn as_complex(&self) -> Complex64 {
        match *self {
            Scalar::Complex(c) => c,
            other => Complex64::new(other.as_f64(), 0.0),
        }
    }

    /// True when the scalar is exactly one (used to skip `alpha` scaling).
    pub fn is_one(&self) -> bool {
        match *self {
            Scalar::Bool(b) => b,
            Scalar::Int(i) => i == 1,
            Scalar::Float(x) => x == 1.0,
            Scalar::Complex(c) => c.re == 1.0 && c.im == 0.0,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Complex(c) => write!(f, "{}", c),
        }
    }
}

macro_rules! scalar_from {
    ($variant:ident, $conv:ty => $($t:ty),+) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant(v as $conv)
                }
            }
        )+
    };
}

scalar_from!(Int, i64 => i8, i16, i32, i64, u8, u16, u32);
scalar_from!(Float, f64 => f32, f64);

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<f16> for Scalar {
    fn from(v: f16) -> Self {
        Scalar::Float(v.to_f64())
    }
}

impl From<bf16> for Scalar {
    fn from(v: bf16) -> Self {
        Scalar::Float(v.to_f64())
    }
}

impl From<Complex64> for Scalar {
    fn from(v: Complex64) -> Self {
        Scalar::Complex(v)
    }
}

impl From<Complex32> for Scalar {
    fn from(v: Complex32) -> Self {
        Scalar::Complex(Complex64::new(v.re as f64, v.im as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_native() {
        assert_eq!(Scalar::from(3i32), Scalar::Int(3));
        assert_eq!(Scalar::from(255u8), Scalar::Int(255));
        assert_eq!(Scalar::from(2.5f32), Scalar::Float(2.5));
        assert_eq!(Scalar::from(true), Scalar::Bool(true));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Scalar::Float(-2.7).as_i64(), -2);
        assert!(!Scalar::Int(0).as_bool());
        assert_eq!(Scalar::Bool(true).as_f64(), 1.0);
        assert_eq!(Scalar::Int(2).as_complex(), Complex64::new(2.0, 0.0));
    }

    #[test]
    fn test_is_one() {
        assert!(Scalar::Int(1).is_one());
        assert!(Scalar::Float(1.0).is_one());
        assert!(!Scalar::Float(2.0).is_one());
    }

    #[test]
    fn test_kind() {
        assert_eq!(Scalar::Int(-1).kind(), DTypeKind::SignedInt);
        assert_eq!(Scalar::Complex(Complex64::new(0.0, 1.0)).kind(), DTypeKind::Complex);
    }
}
