// Binary kernels for the CPU backend.
//
// Operands are broadcast to a common shape first, then lifted into the lane
// of their (shared) dtype kind.

use num_complex::Complex64;

use crate::dtype::{DType, DTypeKind};
use crate::error::{Result, TensorError};
use crate::kernel::BinaryKernel;
use crate::shape::Shape;
use crate::storage::CpuStorage;
use crate::tensor::Tensor;

pub(crate) fn apply(kernel: BinaryKernel, a: &Tensor, b: &Tensor) -> Result<Tensor> {
    if a.dtype() != b.dtype() {
        return Err(TensorError::DTypeMismatch {
            expected: a.dtype(),
            got: b.dtype(),
        });
    }
    let dtype = a.dtype();
    let shape = Shape::broadcast_shape(a.shape(), b.shape())?;
    let a = a.broadcast_to(&shape)?;
    let b = b.broadcast_to(&shape)?;
    let (sa, sb) = (a.storage(), b.storage());

    let out = if matches!(
        kernel,
        BinaryKernel::LogicalAnd | BinaryKernel::LogicalOr | BinaryKernel::LogicalXor
    ) {
        Some(CpuStorage::Bool(logical(kernel, &sa.to_bool_vec(), &sb.to_bool_vec())))
    } else if kernel.is_predicate() {
        compare_storage(kernel, sa, sb).map(CpuStorage::Bool)
    } else {
        match dtype.kind() {
            DTypeKind::Bool => {
                bool_lane(kernel, &sa.to_bool_vec(), &sb.to_bool_vec()).map(CpuStorage::Bool)
            }
            DTypeKind::SignedInt => signed_lane(kernel, &sa.to_i64_vec(), &sb.to_i64_vec())?
                .map(|v| CpuStorage::from_i64s(dtype, &v)),
            DTypeKind::UnsignedInt => unsigned_lane(kernel, &sa.to_u64_vec(), &sb.to_u64_vec())?
                .map(|v| CpuStorage::from_u64s(dtype, &v)),
            DTypeKind::Float => float_lane(kernel, &sa.to_f64_vec(), &sb.to_f64_vec())
                .map(|v| CpuStorage::from_f64s(dtype, &v)),
            DTypeKind::Complex => {
                complex_lane(kernel, &sa.to_complex_vec(), &sb.to_complex_vec())
                    .map(|v| CpuStorage::from_complexes(dtype, &v))
            }
        }
    };

    let out = out.ok_or_else(|| unsupported(kernel, dtype))?;
    Tensor::from_storage(out, shape)
}

fn unsupported(kernel: BinaryKernel, dtype: DType) -> TensorError {
    TensorError::UnsupportedKernel {
        kernel: kernel.name().to_string(),
        dtype,
    }
}

fn zip_map<T: Copy, U>(a: &[T], b: &[T], f: impl Fn(T, T) -> U) -> Vec<U> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

fn logical(kernel: BinaryKernel, a: &[bool], b: &[bool]) -> Vec<bool> {
    match kernel {
        BinaryKernel::LogicalAnd => zip_map(a, b, |x, y| x && y),
        BinaryKernel::LogicalOr => zip_map(a, b, |x, y| x || y),
        _ => zip_map(a, b, |x, y| x != y),
    }
}

fn compare<T: PartialOrd + Copy>(kernel: BinaryKernel, a: &[T], b: &[T]) -> Option<Vec<bool>> {
    let f: fn(&T, &T) -> bool = match kernel {
        BinaryKernel::Eq => |x, y| x == y,
        BinaryKernel::Ne => |x, y| x != y,
        BinaryKernel::Lt => |x, y| x < y,
        BinaryKernel::Le => |x, y| x <= y,
        BinaryKernel::Gt => |x, y| x > y,
        BinaryKernel::Ge => |x, y| x >= y,
        _ => return None,
    };
    Some(a.iter().zip(b).map(|(x, y)| f(x, y)).collect())
}

fn compare_storage(kernel: BinaryKernel, a: &CpuStorage, b: &CpuStorage) -> Option<Vec<bool>> {
    match a.dtype().kind() {
        DTypeKind::Bool => compare(kernel, &a.to_bool_vec(), &b.to_bool_vec()),
        DTypeKind::SignedInt => compare(kernel, &a.to_i64_vec(), &b.to_i64_vec()),
        DTypeKind::UnsignedInt => compare(kernel, &a.to_u64_vec(), &b.to_u64_vec()),
        DTypeKind::Float => compare(kernel, &a.to_f64_vec(), &b.to_f64_vec()),
        // Complex numbers only have equality.
        DTypeKind::Complex => {
            let (x, y) = (a.to_complex_vec(), b.to_complex_vec());
            match kernel {
                BinaryKernel::Eq => Some(zip_map(&x, &y, |p, q| p == q)),
                BinaryKernel::Ne => Some(zip_map(&x, &y, |p, q| p != q)),
                _ => None,
            }
        }
    }
}

fn bool_lane(kernel: BinaryKernel, a: &[bool], b: &[bool]) -> Option<Vec<bool>> {
    let f: fn(bool, bool) -> bool = match kernel {
        BinaryKernel::Add | BinaryKernel::Maximum | BinaryKernel::BitOr => |x, y| x || y,
        BinaryKernel::Mul | BinaryKernel::Minimum | BinaryKernel::BitAnd => |x, y| x && y,
        BinaryKernel::BitXor => |x, y| x != y,
        _ => return None,
    };
    Some(zip_map(a, b, f))
}

/// Integer kernels that can fail on a zero divisor.
fn checked<T: Copy>(
    kernel: BinaryKernel,
    a: &[T],
    b: &[T],
    f: impl Fn(T, T) -> Option<T>,
) -> Result<Vec<T>> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f(x, y).ok_or_else(|| TensorError::DivisionByZero(kernel.name().to_string())))
        .collect()
}

fn signed_lane(kernel: BinaryKernel, a: &[i64], b: &[i64]) -> Result<Option<Vec<i64>>> {
    let out = match kernel {
        BinaryKernel::Add => zip_map(a, b, i64::wrapping_add),
        BinaryKernel::Sub => zip_map(a, b, i64::wrapping_sub),
        BinaryKernel::Mul => zip_map(a, b, i64::wrapping_mul),
        BinaryKernel::TruncDiv => {
            checked(kernel, a, b, |x, y| (y != 0).then(|| x.wrapping_div(y)))?
        }
        BinaryKernel::Remainder => checked(kernel, a, b, |x, y| {
            (y != 0).then(|| {
                let r = x.wrapping_rem(y);
                if r != 0 && ((r < 0) != (y < 0)) {
                    r + y
                } else {
                    r
                }
            })
        })?,
        BinaryKernel::Fmod => checked(kernel, a, b, |x, y| (y != 0).then(|| x.wrapping_rem(y)))?,
        BinaryKernel::Pow => {
            if b.iter().any(|&e| e < 0) {
                return Err(TensorError::Other(
                    "integers to negative integer powers are not allowed".to_string(),
                ));
            }
            zip_map(a, b, |x, e| wrapping_pow_i64(x, e as u64))
        }
        BinaryKernel::Minimum => zip_map(a, b, i64::min),
        BinaryKernel::Maximum => zip_map(a, b, i64::max),
        BinaryKernel::Lcm => zip_map(a, b, lcm_i64),
        BinaryKernel::BitAnd => zip_map(a, b, |x, y| x & y),
        BinaryKernel::BitOr => zip_map(a, b, |x, y| x | y),
        BinaryKernel::BitXor => zip_map(a, b, |x, y| x ^ y),
        BinaryKernel::Shl => zip_map(a, b, |x, s| x.wrapping_shl(s as u32)),
        BinaryKernel::Shr => zip_map(a, b, |x, s| x.wrapping_shr(s as u32)),
        _ => return Ok(None),
    };
    Ok(Some(out))
}

fn unsigned_lane(kernel: BinaryKernel, a: &[u64], b: &[u64]) -> Result<Option<Vec<u64>>> {
    let out = match kernel {
        BinaryKernel::Add => zip_map(a, b, u64::wrapping_add),
        BinaryKernel::Sub => zip_map(a, b, u64::wrapping_sub),
        BinaryKernel::Mul => zip_map(a, b, u64::wrapping_mul),
        BinaryKernel::TruncDiv => checked(kernel, a, b, u64::checked_div)?,
        BinaryKernel::Remainder | BinaryKernel::Fmod => checked(kernel, a, b, u64::checked_rem)?,
        BinaryKernel::Pow => zip_map(a, b, wrapping_pow_u64),
        BinaryKernel::Minimum => zip_map(a, b, u64::min),
        BinaryKernel::Maximum => zip_map(a, b, u64::max),
        BinaryKernel::Lcm => zip_map(a, b, lcm_u64),
        BinaryKernel::BitAnd => zip_map(a, b, |x, y| x & y),
        BinaryKernel::BitOr => zip_map(a, b, |x, y| x | y),
        BinaryKernel::BitXor => zip_map(a, b, |x, y| x ^ y),
        BinaryKernel::Shl => zip_map(a, b, |x, s| x.wrapping_shl(s as u32)),
        BinaryKernel::Shr => zip_map(a, b, |x, s| x.wrapping_shr(s as u32)),
        _ => return Ok(None),
    };
    Ok(Some(out))
}

fn float_lane(kernel: BinaryKernel, a: &[f64], b: &[f64]) -> Option<Vec<f64>> {
    let f: fn(f64, f64) -> f64 = match kernel {
        BinaryKernel::Add => |x, y| x + y,
        BinaryKernel::Sub => |x, y| x - y,
        BinaryKernel::Mul => |x, y| x * y,
        BinaryKernel::Div => |x, y| x / y,
        BinaryKernel::TruncDiv => |x, y| (x / y).trunc(),
        BinaryKernel::Remainder => |x, y| {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        },
        BinaryKernel::Fmod => |x, y| x % y,
        BinaryKernel::Pow => f64::powf,
        BinaryKernel::Atan2 => f64::atan2,
        BinaryKernel::Minimum => |x, y| if x.is_nan() || y.is_nan() { f64::NAN } else { x.min(y) },
        BinaryKernel::Maximum => |x, y| if x.is_nan() || y.is_nan() { f64::NAN } else { x.max(y) },
        BinaryKernel::LogAddExp => logaddexp,
        _ => return None,
    };
    Some(zip_map(a, b, f))
}

fn complex_lane(kernel: BinaryKernel, a: &[Complex64], b: &[Complex64]) -> Option<Vec<Complex64>> {
    let f: fn(Complex64, Complex64) -> Complex64 = match kernel {
        BinaryKernel::Add => |x, y| x + y,
        BinaryKernel::Sub => |x, y| x - y,
        BinaryKernel::Mul => |x, y| x * y,
        BinaryKernel::Div => |x, y| x / y,
        BinaryKernel::Pow => |x, y| x.powc(y),
        _ => return None,
    };
    Some(zip_map(a, b, f))
}

fn logaddexp(x: f64, y: f64) -> f64 {
    if x == y {
        // Covers equal infinities, where the difference below would be NaN.
        return x + std::f64::consts::LN_2;
    }
    let m = x.max(y);
    m + (-(x - y).abs()).exp().ln_1p()
}

fn wrapping_pow_u64(mut base: u64, mut exp: u64) -> u64 {
    let mut acc: u64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

fn wrapping_pow_i64(base: i64, exp: u64) -> i64 {
    wrapping_pow_u64(base as u64, exp) as i64
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm_u64(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd_u64(a, b)).wrapping_mul(b)
}

fn lcm_i64(a: i64, b: i64) -> i64 {
    lcm_u64(a.unsigned_abs(), b.unsigned_abs()) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_broadcast_scalar() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0, 3.0]);
        let s = Tensor::new(vec![10.0f32], Shape::scalar());
        let r = apply(BinaryKernel::Add, &a, &s).unwrap();
        assert_eq!(r.as_slice::<f32>().unwrap(), &[11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_dtype_mismatch() {
        let a = Tensor::from_vec(vec![1.0f32]);
        let b = Tensor::from_vec(vec![1.0f64]);
        assert!(matches!(
            apply(BinaryKernel::Add, &a, &b),
            Err(TensorError::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_int_overflow_wraps() {
        let a = Tensor::from_vec(vec![120i8]);
        let b = Tensor::from_vec(vec![10i8]);
        let r = apply(BinaryKernel::Add, &a, &b).unwrap();
        assert_eq!(r.as_slice::<i8>().unwrap(), &[-126]);
    }

    #[test]
    fn test_remainder_follows_divisor_sign() {
        let a = Tensor::from_vec(vec![-7i32, 7]);
        let b = Tensor::from_vec(vec![2i32, -2]);
        let r = apply(BinaryKernel::Remainder, &a, &b).unwrap();
        assert_eq!(r.as_slice::<i32>().unwrap(), &[1, -1]);
        let f = apply(BinaryKernel::Fmod, &a, &b).unwrap();
        assert_eq!(f.as_slice::<i32>().unwrap(), &[-1, 1]);
    }

    #[test]
    fn test_float_remainder() {
        let a = Tensor::from_vec(vec![-7.5f64]);
        let b = Tensor::from_vec(vec![2.0f64]);
        let r = apply(BinaryKernel::Remainder, &a, &b).unwrap();
        assert_relative_eq!(r.to_f64_vec()[0], 0.5);
    }

    #[test]
    fn test_int_division_by_zero() {
        let a = Tensor::from_vec(vec![1i64]);
        let b = Tensor::from_vec(vec![0i64]);
        assert!(matches!(
            apply(BinaryKernel::Remainder, &a, &b),
            Err(TensorError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_int_true_division_unsupported() {
        let a = Tensor::from_vec(vec![1i64]);
        assert!(matches!(
            apply(BinaryKernel::Div, &a, &a),
            Err(TensorError::UnsupportedKernel { .. })
        ));
    }

    #[test]
    fn test_compare() {
        let a = Tensor::from_vec(vec![1u8, 5]);
        let b = Tensor::from_vec(vec![3u8, 5]);
        let r = apply(BinaryKernel::Le, &a, &b).unwrap();
        assert_eq!(r.dtype(), DType::Bool);
        assert_eq!(r.as_slice::<bool>().unwrap(), &[true, true]);
    }

    #[test]
    fn test_shift_right_is_arithmetic() {
        let a = Tensor::from_vec(vec![-16i8]);
        let s = Tensor::from_vec(vec![2i8]);
        let r = apply(BinaryKernel::Shr, &a, &s).unwrap();
        assert_eq!(r.as_slice::<i8>().unwrap(), &[-4]);
    }

    #[test]
    fn test_lcm() {
        let a = Tensor::from_vec(vec![4i32, -6, 0]);
        let b = Tensor::from_vec(vec![6i32, 4, 5]);
        let r = apply(BinaryKernel::Lcm, &a, &b).unwrap();
        assert_eq!(r.as_slice::<i32>().unwrap(), &[12, 12, 0]);
    }

    #[test]
    fn test_pow_int() {
        let a = Tensor::from_vec(vec![3i64, 2]);
        let b = Tensor::from_vec(vec![4i64, 10]);
        let r = apply(BinaryKernel::Pow, &a, &b).unwrap();
        assert_eq!(r.as_slice::<i64>().unwrap(), &[81, 1024]);
        let neg = Tensor::from_vec(vec![-1i64, -1]);
        assert!(apply(BinaryKernel::Pow, &a, &neg).is_err());
    }

    #[test]
    fn test_logaddexp() {
        let a = Tensor::from_vec(vec![0.0f64, f64::NEG_INFINITY]);
        let b = Tensor::from_vec(vec![0.0f64, f64::NEG_INFINITY]);
        let r = apply(BinaryKernel::LogAddExp, &a, &b).unwrap().to_f64_vec();
        assert_relative_eq!(r[0], std::f64::consts::LN_2);
        assert_eq!(r[1], f64::NEG_INFINITY);
    }

    #[test]
    fn test_minimum_propagates_nan() {
        let a = Tensor::from_vec(vec![f64::NAN, 1.0]);
        let b = Tensor::from_vec(vec![0.0f64, 2.0]);
        let r = apply(BinaryKernel::Minimum, &a, &b).unwrap().to_f64_vec();
        assert!(r[0].is_nan());
        assert_eq!(r[1], 1.0);
    }

    #[test]
    fn test_logical_on_numbers() {
        let a = Tensor::from_vec(vec![1.0f32, 0.0]);
        let b = Tensor::from_vec(vec![0.0f32, 0.0]);
        let r = apply(BinaryKernel::LogicalXor, &a, &b).unwrap();
        assert_eq!(r.as_slice::<bool>().unwrap(), &[true, false]);
    }
}
