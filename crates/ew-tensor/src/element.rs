use half::{bf16, f16};
use num_complex::{Complex32, Complex64};

use crate::dtype::DType;
use crate::storage::CpuStorage;

/// A native element type that can back a [`CpuStorage`] variant.
///
/// Kernels never operate on every element type directly. They lift storage
/// into one of five wide lanes (`bool`, `i64`, `u64`, `f64`, `Complex64`),
/// compute there and narrow back; these conversions are the only place where
/// per-type behaviour lives. Narrowing follows `as` semantics: integers wrap,
/// floats truncate toward zero and saturate.
pub trait Element: Copy + Send + Sync + 'static {
    const DTYPE: DType;

    fn to_bool(self) -> bool;
    fn to_i64(self) -> i64;
    fn to_u64(self) -> u64;
    fn to_f64(self) -> f64;
    fn to_complex(self) -> Complex64;

    fn from_bool(v: bool) -> Self;
    fn from_i64(v: i64) -> Self;
    fn from_u64(v: u64) -> Self;
    fn from_f64(v: f64) -> Self;
    fn from_complex(v: Complex64) -> Self;

    /// Wraps a vector of this element type into its storage variant.
    fn wrap(data: Vec<Self>) -> CpuStorage;

    /// Borrows the storage as a slice of this element type, if the variant matches.
    fn slice(storage: &CpuStorage) -> Option<&[Self]>;
}

macro_rules! impl_int_element {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn to_bool(self) -> bool { self != 0 }
                fn to_i64(self) -> i64 { self as i64 }
                fn to_u64(self) -> u64 { self as u64 }
                fn to_f64(self) -> f64 { self as f64 }
                fn to_complex(self) -> Complex64 { Complex64::new(self as f64, 0.0) }

                fn from_bool(v: bool) -> Self { v as $t }
                fn from_i64(v: i64) -> Self { v as $t }
                fn from_u64(v: u64) -> Self { v as $t }
                fn from_f64(v: f64) -> Self { v as $t }
                fn from_complex(v: Complex64) -> Self { v.re as $t }

                fn wrap(data: Vec<Self>) -> CpuStorage { CpuStorage::$variant(data) }

                fn slice(storage: &CpuStorage) -> Option<&[Self]> {
                    match storage {
                        CpuStorage::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_int_element!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

macro_rules! impl_float_element {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn to_bool(self) -> bool { self != 0.0 }
                fn to_i64(self) -> i64 { self as i64 }
                fn to_u64(self) -> u64 { self as u64 }
                fn to_f64(self) -> f64 { self as f64 }
                fn to_complex(self) -> Complex64 { Complex64::new(self as f64, 0.0) }

                fn from_bool(v: bool) -> Self { v as u8 as $t }
                fn from_i64(v: i64) -> Self { v as $t }
                fn from_u64(v: u64) -> Self { v as $t }
                fn from_f64(v: f64) -> Self { v as $t }
                fn from_complex(v: Complex64) -> Self { v.re as $t }

                fn wrap(data: Vec<Self>) -> CpuStorage { CpuStorage::$variant(data) }

                fn slice(storage: &CpuStorage) -> Option<&[Self]> {
                    match storage {
                        CpuStorage::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_float_element!(f32 => F32, f64 => F64);

macro_rules! impl_half_element {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn to_bool(self) -> bool { self.to_f64() != 0.0 }
                fn to_i64(self) -> i64 { self.to_f64() as i64 }
                fn to_u64(self) -> u64 { self.to_f64() as u64 }
                fn to_f64(self) -> f64 { <$t>::to_f64(self) }
                fn to_complex(self) -> Complex64 { Complex64::new(<$t>::to_f64(self), 0.0) }

                fn from_bool(v: bool) -> Self { <$t>::from_f64(v as u8 as f64) }
                fn from_i64(v: i64) -> Self { <$t>::from_f64(v as f64) }
                fn from_u64(v: u64) -> Self { <$t>::from_f64(v as f64) }
                fn from_f64(v: f64) -> Self { <$t>::from_f64(v) }
                fn from_complex(v: Complex64) -> Self { <$t>::from_f64(v.re) }

                fn wrap(data: Vec<Self>) -> CpuStorage { CpuStorage::$variant(data) }

                fn slice(storage: &CpuStorage) -> Option<&[Self]> {
                    match storage {
                        CpuStorage::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_half_element!(f16 => F16, bf16 => BF16);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn to_bool(self) -> bool {
        self
    }
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn to_u64(self) -> u64 {
        self as u64
    }
    fn to_f64(self) -> f64 {
        self as u8 as f64
    }
    fn to_complex(self) -> Complex64 {
        Complex64::new(self as u8 as f64, 0.0)
    }

    fn from_bool(v: bool) -> Self {
        v
    }
    fn from_i64(v: i64) -> Self {
        v != 0
    }
    fn from_u64(v: u64) -> Self {
        v != 0
    }
    fn from_f64(v: f64) -> Self {
        v != 0.0
    }
    fn from_complex(v: Complex64) -> Self {
        v.re != 0.0 || v.im != 0.0
    }

    fn wrap(data: Vec<Self>) -> CpuStorage {
        CpuStorage::Bool(data)
    }

    fn slice(storage: &CpuStorage) -> Option<&[Self]> {
        match storage {
            CpuStorage::Bool(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl Element for Complex32 {
    const DTYPE: DType = DType::C64;

    fn to_bool(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
    fn to_i64(self) -> i64 {
        self.re as i64
    }
    fn to_u64(self) -> u64 {
        self.re as u64
    }
    fn to_f64(self) -> f64 {
        self.re as f64
    }
    fn to_complex(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }

    fn from_bool(v: bool) -> Self {
        Complex32::new(v as u8 as f32, 0.0)
    }
    fn from_i64(v: i64) -> Self {
        Complex32::new(v as f32, 0.0)
    }
    fn from_u64(v: u64) -> Self {
        Complex32::new(v as f32, 0.0)
    }
    fn from_f64(v: f64) -> Self {
        Complex32::new(v as f32, 0.0)
    }
    fn from_complex(v: Complex64) -> Self {
        Complex32::new(v.re as f32, v.im as f32)
    }

    fn wrap(data: Vec<Self>) -> CpuStorage {
        CpuStorage::C64(data)
    }

    fn slice(storage: &CpuStorage) -> Option<&[Self]> {
        match storage {
            CpuStorage::C64(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::C128;

    fn to_bool(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
    fn to_i64(self) -> i64 {
        self.re as i64
    }
    fn to_u64(self) -> u64 {
        self.re as u64
    }
    fn to_f64(self) -> f64 {
        self.re
    }
    fn to_complex(self) -> Complex64 {
        self
    }

    fn from_bool(v: bool) -> Self {
        Complex64::new(v as u8 as f64, 0.0)
    }
    fn from_i64(v: i64) -> Self {
        Complex64::new(v as f64, 0.0)
    }
    fn from_u64(v: u64) -> Self {
        Complex64::new(v as f64, 0.0)
    }
    fn from_f64(v: f64) -> Self {
        Complex64::new(v, 0.0)
    }
    fn from_complex(v: Complex64) -> Self {
        v
    }

    fn wrap(data: Vec<Self>) -> CpuStorage {
        CpuStorage::C128(data)
    }

    fn slice(storage: &CpuStorage) -> Option<&[Self]> {
        match storage {
            CpuStorage::C128(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}
