// Unary kernels for the CPU backend.
//
// Each kernel runs in the lane of the input kind: bool, i64, u64, f64 or
// Complex64. Results are narrowed back to the input dtype, so integer
// overflow wraps the way native two's-complement arithmetic does.

use num_complex::Complex64;

use crate::dtype::{DType, DTypeKind};
use crate::error::{Result, TensorError};
use crate::kernel::UnaryKernel;
use crate::storage::CpuStorage;
use crate::tensor::Tensor;

pub(crate) fn apply(kernel: UnaryKernel, x: &Tensor) -> Result<Tensor> {
    let dtype = x.dtype();
    let storage = x.storage();

    let out = if kernel.is_predicate() {
        predicate(kernel, storage).map(CpuStorage::Bool)
    } else {
        match dtype.kind() {
            DTypeKind::Bool => bool_lane(kernel, &storage.to_bool_vec()).map(CpuStorage::Bool),
            DTypeKind::SignedInt => signed_lane(kernel, &storage.to_i64_vec())
                .map(|v| CpuStorage::from_i64s(dtype, &v)),
            DTypeKind::UnsignedInt => unsigned_lane(kernel, &storage.to_u64_vec())
                .map(|v| CpuStorage::from_u64s(dtype, &v)),
            DTypeKind::Float => float_lane(kernel, &storage.to_f64_vec())
                .map(|v| CpuStorage::from_f64s(dtype, &v)),
            DTypeKind::Complex if kernel == UnaryKernel::Abs => {
                let norms: Vec<f64> = storage.to_complex_vec().iter().map(|z| z.norm()).collect();
                Some(CpuStorage::from_f64s(dtype.real_component(), &norms))
            }
            DTypeKind::Complex => complex_lane(kernel, &storage.to_complex_vec())
                .map(|v| CpuStorage::from_complexes(dtype, &v)),
        }
    };

    let out = out.ok_or_else(|| unsupported(kernel, dtype))?;
    Tensor::from_storage(out, x.shape().clone())
}

fn unsupported(kernel: UnaryKernel, dtype: DType) -> TensorError {
    TensorError::UnsupportedKernel {
        kernel: kernel.name().to_string(),
        dtype,
    }
}

fn predicate(kernel: UnaryKernel, storage: &CpuStorage) -> Option<Vec<bool>> {
    let kind = storage.dtype().kind();
    if kernel == UnaryKernel::LogicalNot {
        return Some(storage.to_bool_vec().iter().map(|b| !b).collect());
    }
    match kind {
        DTypeKind::Float => {
            let f: fn(f64) -> bool = match kernel {
                UnaryKernel::IsNan => f64::is_nan,
                UnaryKernel::IsInf => f64::is_infinite,
                UnaryKernel::IsPosInf => |x| x == f64::INFINITY,
                UnaryKernel::IsNegInf => |x| x == f64::NEG_INFINITY,
                UnaryKernel::IsFinite => f64::is_finite,
                UnaryKernel::IsReal => |_| true,
                _ => return None,
            };
            Some(storage.to_f64_vec().into_iter().map(f).collect())
        }
        DTypeKind::Complex => {
            let f: fn(Complex64) -> bool = match kernel {
                UnaryKernel::IsNan => |z| z.re.is_nan() || z.im.is_nan(),
                UnaryKernel::IsInf => |z| z.re.is_infinite() || z.im.is_infinite(),
                UnaryKernel::IsFinite => |z| z.re.is_finite() && z.im.is_finite(),
                UnaryKernel::IsReal => |z| z.im == 0.0,
                _ => return None,
            };
            Some(storage.to_complex_vec().into_iter().map(f).collect())
        }
        // Integers and booleans are always finite and real.
        _ => {
            let value = match kernel {
                UnaryKernel::IsNan
                | UnaryKernel::IsInf
                | UnaryKernel::IsPosInf
                | UnaryKernel::IsNegInf => false,
                UnaryKernel::IsFinite | UnaryKernel::IsReal => true,
                _ => return None,
            };
            Some(vec![value; storage.len()])
        }
    }
}

fn bool_lane(kernel: UnaryKernel, x: &[bool]) -> Option<Vec<bool>> {
    let f: fn(bool) -> bool = match kernel {
        UnaryKernel::Abs | UnaryKernel::Positive | UnaryKernel::Square | UnaryKernel::Sign => {
            |b| b
        }
        UnaryKernel::BitwiseNot => |b| !b,
        _ => return None,
    };
    Some(x.iter().map(|&b| f(b)).collect())
}

fn signed_lane(kernel: UnaryKernel, x: &[i64]) -> Option<Vec<i64>> {
    let f: fn(i64) -> i64 = match kernel {
        UnaryKernel::Abs => i64::wrapping_abs,
        UnaryKernel::Neg => i64::wrapping_neg,
        UnaryKernel::Square => |v| v.wrapping_mul(v),
        UnaryKernel::Sign => i64::signum,
        UnaryKernel::BitwiseNot => |v| !v,
        UnaryKernel::Positive
        | UnaryKernel::Ceil
        | UnaryKernel::Floor
        | UnaryKernel::Round { .. }
        | UnaryKernel::Trunc => |v| v,
        _ => return None,
    };
    Some(x.iter().map(|&v| f(v)).collect())
}

fn unsigned_lane(kernel: UnaryKernel, x: &[u64]) -> Option<Vec<u64>> {
    let f: fn(u64) -> u64 = match kernel {
        UnaryKernel::Neg => u64::wrapping_neg,
        UnaryKernel::Square => |v| v.wrapping_mul(v),
        UnaryKernel::Sign => |v| v.min(1),
        UnaryKernel::BitwiseNot => |v| !v,
        UnaryKernel::Abs
        | UnaryKernel::Positive
        | UnaryKernel::Ceil
        | UnaryKernel::Floor
        | UnaryKernel::Round { .. }
        | UnaryKernel::Trunc => |v| v,
        _ => return None,
    };
    Some(x.iter().map(|&v| f(v)).collect())
}

fn float_lane(kernel: UnaryKernel, x: &[f64]) -> Option<Vec<f64>> {
    if let UnaryKernel::Round { decimals } = kernel {
        return Some(x.iter().map(|&v| round_half_even(v, decimals)).collect());
    }
    let f: fn(f64) -> f64 = match kernel {
        UnaryKernel::Abs => f64::abs,
        UnaryKernel::Neg => |v| -v,
        UnaryKernel::Positive => |v| v,
        UnaryKernel::Square => |v| v * v,
        UnaryKernel::Reciprocal => f64::recip,
        UnaryKernel::Sign => sign,
        UnaryKernel::Ceil => f64::ceil,
        UnaryKernel::Floor => f64::floor,
        UnaryKernel::Trunc => f64::trunc,
        UnaryKernel::Sqrt => f64::sqrt,
        UnaryKernel::Exp => f64::exp,
        UnaryKernel::Expm1 => f64::exp_m1,
        UnaryKernel::Log => f64::ln,
        UnaryKernel::Log2 => f64::log2,
        UnaryKernel::Log10 => f64::log10,
        UnaryKernel::Log1p => f64::ln_1p,
        UnaryKernel::Sin => f64::sin,
        UnaryKernel::Cos => f64::cos,
        UnaryKernel::Tan => f64::tan,
        UnaryKernel::Asin => f64::asin,
        UnaryKernel::Acos => f64::acos,
        UnaryKernel::Atan => f64::atan,
        UnaryKernel::Sinh => f64::sinh,
        UnaryKernel::Cosh => f64::cosh,
        UnaryKernel::Tanh => f64::tanh,
        UnaryKernel::Asinh => f64::asinh,
        UnaryKernel::Acosh => f64::acosh,
        UnaryKernel::Atanh => f64::atanh,
        UnaryKernel::Erf => libm::erf,
        UnaryKernel::Deg2Rad => f64::to_radians,
        UnaryKernel::Rad2Deg => f64::to_degrees,
        _ => return None,
    };
    Some(x.iter().map(|&v| f(v)).collect())
}

fn complex_lane(kernel: UnaryKernel, x: &[Complex64]) -> Option<Vec<Complex64>> {
    let f: fn(Complex64) -> Complex64 = match kernel {
        UnaryKernel::Neg => |z| -z,
        UnaryKernel::Positive => |z| z,
        UnaryKernel::Square => |z| z * z,
        UnaryKernel::Reciprocal => |z| z.inv(),
        UnaryKernel::Sign => |z| {
            let n = z.norm();
            if n == 0.0 {
                z
            } else {
                z / n
            }
        },
        UnaryKernel::Sqrt => |z| z.sqrt(),
        UnaryKernel::Exp => |z| z.exp(),
        UnaryKernel::Expm1 => |z| z.exp() - Complex64::new(1.0, 0.0),
        UnaryKernel::Log => |z| z.ln(),
        UnaryKernel::Log2 => |z| z.log(2.0),
        UnaryKernel::Log10 => |z| z.log(10.0),
        UnaryKernel::Log1p => |z| (z + Complex64::new(1.0, 0.0)).ln(),
        UnaryKernel::Sin => |z| z.sin(),
        UnaryKernel::Cos => |z| z.cos(),
        UnaryKernel::Tan => |z| z.tan(),
        UnaryKernel::Asin => |z| z.asin(),
        UnaryKernel::Acos => |z| z.acos(),
        UnaryKernel::Atan => |z| z.atan(),
        UnaryKernel::Sinh => |z| z.sinh(),
        UnaryKernel::Cosh => |z| z.cosh(),
        UnaryKernel::Tanh => |z| z.tanh(),
        UnaryKernel::Asinh => |z| z.asinh(),
        UnaryKernel::Acosh => |z| z.acosh(),
        UnaryKernel::Atanh => |z| z.atanh(),
        _ => return None,
    };
    Some(x.iter().map(|&z| f(z)).collect())
}

/// Sign of `v`, keeping NaN and signed zero.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        v
    }
}

/// Rounds half to even at the given number of decimal places.
pub(crate) fn round_half_even(v: f64, decimals: i32) -> f64 {
    if decimals == 0 {
        return v.round_ties_even();
    }
    let scale = 10f64.powi(decimals);
    (v * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_float_kernels() {
        let x = Tensor::from_vec(vec![0.25f32, 4.0]);
        let r = apply(UnaryKernel::Sqrt, &x).unwrap();
        assert_eq!(r.dtype(), DType::F32);
        assert_eq!(r.as_slice::<f32>().unwrap(), &[0.5, 2.0]);
    }

    #[test]
    fn test_erf() {
        let x = Tensor::from_vec(vec![0.0f64, 1.0]);
        let r = apply(UnaryKernel::Erf, &x).unwrap().to_f64_vec();
        assert_relative_eq!(r[0], 0.0);
        assert_relative_eq!(r[1], 0.842_700_792_949_714_9, epsilon = 1e-12);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(-0.5, 0), -0.0);
        assert_relative_eq!(round_half_even(1.2345, 2), 1.23);
    }

    #[test]
    fn test_signed_abs_wraps() {
        let x = Tensor::from_vec(vec![i8::MIN, -3]);
        let r = apply(UnaryKernel::Abs, &x).unwrap();
        assert_eq!(r.as_slice::<i8>().unwrap(), &[i8::MIN, 3]);
    }

    #[test]
    fn test_unsigned_neg_wraps() {
        let x = Tensor::from_vec(vec![5u8]);
        let r = apply(UnaryKernel::Neg, &x).unwrap();
        assert_eq!(r.as_slice::<u8>().unwrap(), &[251]);
    }

    #[test]
    fn test_bitwise_not() {
        let x = Tensor::from_vec(vec![0i16, -1]);
        let r = apply(UnaryKernel::BitwiseNot, &x).unwrap();
        assert_eq!(r.as_slice::<i16>().unwrap(), &[-1, 0]);
        let b = Tensor::from_vec(vec![true, false]);
        let r = apply(UnaryKernel::BitwiseNot, &b).unwrap();
        assert_eq!(r.as_slice::<bool>().unwrap(), &[false, true]);
    }

    #[test]
    fn test_complex_abs_is_real() {
        let x = Tensor::from_vec(vec![Complex64::new(3.0, 4.0)]);
        let r = apply(UnaryKernel::Abs, &x).unwrap();
        assert_eq!(r.dtype(), DType::F64);
        assert_eq!(r.to_f64_vec(), vec![5.0]);
    }

    #[test]
    fn test_predicates() {
        let x = Tensor::from_vec(vec![f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 1.0]);
        let nan = apply(UnaryKernel::IsNan, &x).unwrap();
        assert_eq!(nan.as_slice::<bool>().unwrap(), &[true, false, false, false]);
        let pos = apply(UnaryKernel::IsPosInf, &x).unwrap();
        assert_eq!(pos.as_slice::<bool>().unwrap(), &[false, true, false, false]);
        let fin = apply(UnaryKernel::IsFinite, &x).unwrap();
        assert_eq!(fin.as_slice::<bool>().unwrap(), &[false, false, false, true]);

        let ints = Tensor::from_vec(vec![1i32, 2]);
        let fin = apply(UnaryKernel::IsFinite, &ints).unwrap();
        assert_eq!(fin.as_slice::<bool>().unwrap(), &[true, true]);
    }

    #[test]
    fn test_isreal_complex() {
        let x = Tensor::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 2.0)]);
        let r = apply(UnaryKernel::IsReal, &x).unwrap();
        assert_eq!(r.as_slice::<bool>().unwrap(), &[true, false]);
    }

    #[test]
    fn test_unsupported() {
        let x = Tensor::from_vec(vec![1i32]);
        assert!(matches!(
            apply(UnaryKernel::Sin, &x),
            Err(TensorError::UnsupportedKernel { .. })
        ));
        let c = Tensor::from_vec(vec![Complex64::new(1.0, 0.0)]);
        assert!(apply(UnaryKernel::Erf, &c).is_err());
    }
}
