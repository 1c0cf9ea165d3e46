use std::borrow::Cow;

use ew_promote::{PromotionMode, Promoter, TypeDesc};
use ew_tensor::{
    BackendVersion, BinaryKernel, ComputeBackend, CpuBackend, DType, Scalar, Shape, Tensor,
    UnaryKernel,
};
use log::{debug, trace};

use crate::capability;
use crate::config::DispatchConfig;
use crate::destination::Destination;
use crate::error::{DispatchError, Result};
use crate::operand::Operand;
use crate::options::{Mask, OpOptions};
use crate::registry::{Kernel, OpDescriptor, OpId, Policy, Promotion, ResultDtype};

/// Dtypes and shape an operation will run with, fixed before any kernel call.
#[derive(Debug, Clone, PartialEq)]
struct Plan {
    /// Common dtype from the resolver.
    promoted: DType,
    /// Dtype operands are cast to before the kernel.
    compute: DType,
    /// Dtype of the value returned when no destination is given.
    result: DType,
    shape: Shape,
}

/// Runs registered elementwise operations on a `ComputeBackend`.
///
/// Every operation goes through the same steps: arity check, dtype
/// resolution, capability check, destination check, operand casts, the
/// operation's policy around the native kernel, and finally the commit into
/// the destination. All validation happens before the first kernel call.
#[derive(Debug)]
pub struct Dispatcher {
    backend: Box<dyn ComputeBackend>,
    promoter: Promoter,
    config: DispatchConfig,
}

impl Dispatcher {
    /// A dispatcher over the CPU backend with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self::with_backend(Box::new(CpuBackend::new()), config)
    }

    pub fn with_backend(backend: Box<dyn ComputeBackend>, config: DispatchConfig) -> Self {
        Dispatcher {
            backend,
            promoter: Promoter::with_defaults(config.default_int, config.default_float),
            config,
        }
    }

    pub fn backend(&self) -> &dyn ComputeBackend {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn promoter(&self) -> &Promoter {
        &self.promoter
    }

    /// The version dtype restrictions are checked against.
    pub fn version(&self) -> BackendVersion {
        self.config
            .backend_version
            .unwrap_or_else(|| self.backend.version())
    }

    /// Applies `op` to `operands`.
    ///
    /// When `out` is given the result is also cast to its dtype and stored in
    /// it; the returned tensor is then a copy of what was stored. On error
    /// `out` is left untouched.
    pub fn apply(
        &self,
        op: OpId,
        operands: &[Operand<'_>],
        options: &OpOptions,
        out: Option<&mut Tensor>,
    ) -> Result<Tensor> {
        let desc = op.descriptor();
        if operands.len() != desc.arity() {
            return Err(DispatchError::Arity {
                op,
                expected: desc.arity(),
                got: operands.len(),
            });
        }

        let plan = self.plan(op, &desc, operands, options)?;
        let destination = out.map(Destination::new);
        if let Some(dest) = &destination {
            dest.check(op, plan.result, &plan.shape)?;
        }
        debug!(
            "{}: promoted {}, computing in {} -> {} {} ({:?})",
            op, plan.promoted, plan.compute, plan.result, plan.shape, desc.policy
        );

        let result = self.execute(op, &desc, &plan, operands, options)?;
        let result = self.cast_owned(result, plan.result)?;
        match destination {
            Some(dest) => {
                let result = self.cast_owned(result, dest.dtype())?;
                Ok(dest.commit(result))
            }
            None => Ok(result),
        }
    }

    fn plan(
        &self,
        op: OpId,
        desc: &OpDescriptor,
        operands: &[Operand<'_>],
        options: &OpOptions,
    ) -> Result<Plan> {
        let mode = match desc.promotion {
            Promotion::ArrayApi => PromotionMode::ArrayApi,
            Promotion::None | Promotion::Standard => PromotionMode::Standard,
        };
        let second = operands.get(1).map(Operand::type_desc);
        let mut promoted = self.promoter.resolve(operands[0].type_desc(), second, mode)?;
        if desc.policy == Policy::Scaled {
            if let Some(alpha) = options.alpha.filter(|a| !a.is_one()) {
                promoted = self.promoter.resolve(
                    TypeDesc::Array(promoted),
                    Some(TypeDesc::Scalar(alpha)),
                    PromotionMode::Standard,
                )?;
            }
        }

        let version = self.version();
        for tensor in operands.iter().filter_map(Operand::as_tensor) {
            capability::check(op, tensor.dtype(), version)?;
        }
        capability::check(op, promoted, version)?;

        let compute = match desc.policy {
            Policy::BooleanCoercion => DType::Bool,
            Policy::FloatDomain | Policy::FloatDivision => self.float_of(promoted),
            _ => promoted,
        };
        if compute != promoted {
            capability::check(op, compute, version)?;
        }

        let mut shapes: Vec<Shape> = operands.iter().map(Operand::shape).collect();
        if desc.policy == Policy::MaskedUnary {
            if let Mask::Tensor(mask) = &options.mask {
                if mask.dtype() != DType::Bool {
                    return Err(DispatchError::InvalidOption(format!(
                        "{} mask must be bool, got {}",
                        op,
                        mask.dtype()
                    )));
                }
                shapes.push(mask.shape().clone());
            }
        }
        let shape = Shape::broadcast_all(&shapes.iter().collect::<Vec<_>>())?;

        let result = match desc.output {
            ResultDtype::Same => compute,
            ResultDtype::Bool => DType::Bool,
            ResultDtype::Float => self.float_of(compute),
            // A partial mask keeps some original complex values.
            ResultDtype::Real if !options.mask.is_all_true() => compute,
            ResultDtype::Real => compute.real_component(),
        };

        Ok(Plan {
            promoted,
            compute,
            result,
            shape,
        })
    }

    /// Integer and bool dtypes map to the default float.
    fn float_of(&self, dtype: DType) -> DType {
        if dtype.is_bool() || dtype.is_integer() {
            self.config.default_float
        } else {
            dtype
        }
    }

    /// Float dtype integer operands are divided in. Wide enough to hold any
    /// 32-bit integer exactly.
    fn quotient_dtype(dtype: DType) -> DType {
        if dtype.is_float() || dtype.is_complex() {
            dtype
        } else {
            DType::F64
        }
    }

    fn execute(
        &self,
        op: OpId,
        desc: &OpDescriptor,
        plan: &Plan,
        operands: &[Operand<'_>],
        options: &OpOptions,
    ) -> Result<Tensor> {
        let compute = plan.compute;
        match desc.policy {
            Policy::Plain
            | Policy::BooleanCoercion
            | Policy::FloatDomain
            | Policy::FloatDivision => {
                let inputs = self.prepare_all(operands, compute)?;
                self.call(op, desc.kernel, &inputs)
            }
            Policy::IntegerIdentity => {
                let x = self.prepare(&operands[0], compute)?;
                if compute.is_integer() || compute.is_bool() {
                    trace!("{}: identity on {}", op, compute);
                    return Ok(x.into_owned());
                }
                let kernel = match desc.kernel {
                    Kernel::Unary(UnaryKernel::Round { .. }) => Kernel::Unary(UnaryKernel::Round {
                        decimals: options.decimals,
                    }),
                    other => other,
                };
                self.call(op, kernel, &[x])
            }
            Policy::MaskedUnary => self.masked_abs(&operands[0], plan, &options.mask),
            Policy::InfinitySign => {
                let kernel = match (options.detect_positive, options.detect_negative) {
                    (true, true) => UnaryKernel::IsInf,
                    (true, false) => UnaryKernel::IsPosInf,
                    (false, true) => UnaryKernel::IsNegInf,
                    (false, false) => {
                        return Ok(self.backend.full(Scalar::Bool(false), DType::Bool, &plan.shape)?)
                    }
                };
                let x = self.prepare(&operands[0], compute)?;
                Ok(self.backend.unary(kernel, &x)?)
            }
            Policy::FloorDivision => {
                let (x1, x2) = self.prepare_pair(operands, Self::quotient_dtype(compute))?;
                let quotient = self.backend.binary(BinaryKernel::Div, &x1, &x2)?;
                Ok(self.backend.unary(UnaryKernel::Floor, &quotient)?)
            }
            Policy::Remainder if options.modulus => {
                let inputs = self.prepare_all(operands, compute)?;
                self.call(op, desc.kernel, &inputs)
            }
            Policy::Remainder => self.fractional_remainder(operands, compute),
            Policy::ShiftClamp => {
                let (x1, x2) = self.prepare_pair(operands, compute)?;
                let max_shift = compute.bits().saturating_sub(1) as i64;
                let x2 = self.backend.clamp(&x2, Scalar::Int(0), Scalar::Int(max_shift))?;
                self.call(op, desc.kernel, &[x1, Cow::Owned(x2)])
            }
            Policy::Scaled => {
                let (x1, mut x2) = self.prepare_pair(operands, compute)?;
                if let Some(alpha) = options.alpha.filter(|a| !a.is_one()) {
                    let alpha = self.backend.full(alpha, compute, &Shape::scalar())?;
                    x2 = Cow::Owned(self.backend.binary(BinaryKernel::Mul, &x2, &alpha)?);
                }
                self.call(op, desc.kernel, &[x1, x2])
            }
            Policy::NanAwareExtremum => {
                let (x1, x2) = self.prepare_pair(operands, compute)?;
                if !options.use_where {
                    return self.call(op, desc.kernel, &[x1, x2]);
                }
                // Comparisons with NaN are false, so a NaN in x1 yields x2.
                let keep_first = if op == OpId::Minimum {
                    BinaryKernel::Le
                } else {
                    BinaryKernel::Ge
                };
                let mask = self.backend.binary(keep_first, &x1, &x2)?;
                Ok(self.backend.select(&mask, &x1, &x2)?)
            }
            Policy::Absolute => {
                let inputs = self.prepare_all(operands, compute)?;
                let value = self.call(op, desc.kernel, &inputs)?;
                Ok(self.backend.unary(UnaryKernel::Abs, &value)?)
            }
        }
    }

    /// `where(mask, abs(x), x)`, with bool input returned unchanged.
    fn masked_abs(&self, operand: &Operand<'_>, plan: &Plan, mask: &Mask) -> Result<Tensor> {
        let x = self.prepare(operand, plan.compute)?;
        if plan.compute.is_bool() {
            return Ok(x.into_owned());
        }
        match mask {
            Mask::All(true) => Ok(self.backend.unary(UnaryKernel::Abs, &x)?),
            Mask::All(false) => Ok(x.into_owned()),
            Mask::Tensor(mask) => {
                let abs = self.backend.unary(UnaryKernel::Abs, &x)?;
                let abs = self.cast_owned(abs, plan.result)?;
                Ok(self.backend.select(mask, &abs, &x)?)
            }
        }
    }

    /// `round((q - q0) * x2)` with `q = x1 / x2` and `q0` the quotient rounded
    /// toward zero.
    fn fractional_remainder(&self, operands: &[Operand<'_>], compute: DType) -> Result<Tensor> {
        let work = Self::quotient_dtype(compute);
        let (x1, x2) = self.prepare_pair(operands, work)?;
        let b = &self.backend;
        let quotient = b.binary(BinaryKernel::Div, &x1, &x2)?;
        let zero = b.full(Scalar::Int(0), work, &Shape::scalar())?;
        let non_negative = b.binary(BinaryKernel::Ge, &quotient, &zero)?;
        let whole = b.select(
            &non_negative,
            &b.unary(UnaryKernel::Floor, &quotient)?,
            &b.unary(UnaryKernel::Ceil, &quotient)?,
        )?;
        let fraction = b.binary(BinaryKernel::Sub, &quotient, &whole)?;
        let scaled = b.binary(BinaryKernel::Mul, &fraction, &x2)?;
        Ok(b.unary(UnaryKernel::Round { decimals: 0 }, &scaled)?)
    }

    fn call(&self, op: OpId, kernel: Kernel, inputs: &[Cow<'_, Tensor>]) -> Result<Tensor> {
        let out = match (kernel, inputs) {
            (Kernel::Unary(k), [x]) => self.backend.unary(k, x)?,
            (Kernel::Binary(k), [a, b]) => self.backend.binary(k, a, b)?,
            _ => {
                return Err(DispatchError::Arity {
                    op,
                    expected: kernel.arity(),
                    got: inputs.len(),
                })
            }
        };
        Ok(out)
    }

    /// Materializes a literal or casts a tensor to `dtype`, borrowing when no
    /// conversion is needed.
    fn prepare<'a>(&self, operand: &Operand<'a>, dtype: DType) -> Result<Cow<'a, Tensor>> {
        Ok(match *operand {
            Operand::Tensor(t) if t.dtype() == dtype => Cow::Borrowed(t),
            Operand::Tensor(t) => Cow::Owned(self.backend.cast(t, dtype)?),
            Operand::Scalar(s) => Cow::Owned(self.backend.full(s, dtype, &Shape::scalar())?),
        })
    }

    fn prepare_all<'a>(
        &self,
        operands: &[Operand<'a>],
        dtype: DType,
    ) -> Result<Vec<Cow<'a, Tensor>>> {
        operands.iter().map(|o| self.prepare(o, dtype)).collect()
    }

    fn prepare_pair<'a>(
        &self,
        operands: &[Operand<'a>],
        dtype: DType,
    ) -> Result<(Cow<'a, Tensor>, Cow<'a, Tensor>)> {
        Ok((
            self.prepare(&operands[0], dtype)?,
            self.prepare(&operands[1], dtype)?,
        ))
    }

    fn cast_owned(&self, x: Tensor, dtype: DType) -> Result<Tensor> {
        if x.dtype() == dtype {
            Ok(x)
        } else {
            Ok(self.backend.cast(&x, dtype)?)
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! unary_methods {
    ($($name:ident => $op:ident),+ $(,)?) => {
        impl Dispatcher {
            $(
                #[doc = concat!("`", stringify!($name), "` with default options.")]
                pub fn $name<'a>(&self, x: impl Into<Operand<'a>>) -> Result<Tensor> {
                    self.apply(OpId::$op, &[x.into()], &OpOptions::default(), None)
                }
            )+
        }
    };
}

macro_rules! binary_methods {
    ($($name:ident => $op:ident),+ $(,)?) => {
        impl Dispatcher {
            $(
                #[doc = concat!("`", stringify!($name), "` with default options.")]
                pub fn $name<'a>(
                    &self,
                    x1: impl Into<Operand<'a>>,
                    x2: impl Into<Operand<'a>>,
                ) -> Result<Tensor> {
                    self.apply(OpId::$op, &[x1.into(), x2.into()], &OpOptions::default(), None)
                }
            )+
        }
    };
}

unary_methods! {
    abs => Abs,
    negative => Negative,
    positive => Positive,
    square => Square,
    reciprocal => Reciprocal,
    sign => Sign,
    ceil => Ceil,
    floor => Floor,
    round => Round,
    trunc => Trunc,
    sqrt => Sqrt,
    exp => Exp,
    log => Log,
    log2 => Log2,
    log10 => Log10,
    log1p => Log1p,
    expm1 => Expm1,
    sin => Sin,
    cos => Cos,
    tan => Tan,
    asin => Asin,
    acos => Acos,
    atan => Atan,
    sinh => Sinh,
    cosh => Cosh,
    tanh => Tanh,
    asinh => Asinh,
    acosh => Acosh,
    atanh => Atanh,
    erf => Erf,
    logical_not => LogicalNot,
    bitwise_invert => BitwiseInvert,
    isnan => IsNan,
    isinf => IsInf,
    isfinite => IsFinite,
    isreal => IsReal,
    deg2rad => Deg2Rad,
    rad2deg => Rad2Deg,
}

binary_methods! {
    add => Add,
    subtract => Subtract,
    multiply => Multiply,
    divide => Divide,
    floor_divide => FloorDivide,
    trunc_divide => TruncDivide,
    remainder => Remainder,
    fmod => Fmod,
    pow => Pow,
    atan2 => Atan2,
    equal => Equal,
    not_equal => NotEqual,
    less => Less,
    less_equal => LessEqual,
    greater => Greater,
    greater_equal => GreaterEqual,
    logical_and => LogicalAnd,
    logical_or => LogicalOr,
    logical_xor => LogicalXor,
    bitwise_and => BitwiseAnd,
    bitwise_or => BitwiseOr,
    bitwise_xor => BitwiseXor,
    bitwise_left_shift => BitwiseLeftShift,
    bitwise_right_shift => BitwiseRightShift,
    minimum => Minimum,
    maximum => Maximum,
    logaddexp => LogAddExp,
    lcm => Lcm,
}
