//! The fixed set of elementwise operations and how each one is dispatched.
//!
//! Every operation is described by an `OpDescriptor`: the native kernel it
//! ends in, how its operands are promoted, which special-case policy wraps
//! the kernel, and what dtype the result has. The dispatcher reads nothing
//! else, so adding an operation is a one-line change here.

use std::fmt;
use std::str::FromStr;

use ew_tensor::{BinaryKernel, UnaryKernel};

use crate::error::DispatchError;

/// The native primitive an operation ends in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Unary(UnaryKernel),
    Binary(BinaryKernel),
}

impl Kernel {
    pub fn arity(&self) -> usize {
        match self {
            Kernel::Unary(_) => 1,
            Kernel::Binary(_) => 2,
        }
    }
}

/// How the computation dtype is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// Unary ops: the operand keeps its dtype.
    None,
    Standard,
    /// The strict array-API table (bitwise and shift ops).
    ArrayApi,
}

/// Dtype-conditional behavior wrapped around the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Cast to the computation dtype and call the kernel.
    Plain,
    /// Rounding ops: integer and bool input is returned as is.
    IntegerIdentity,
    /// Logical ops: operands are cast to `Bool`.
    BooleanCoercion,
    /// `divide`, `trunc_divide`: integer operands are divided as floats.
    FloatDivision,
    /// `floor_divide`: floor of the true quotient, cast back.
    FloorDivision,
    /// `remainder`: floor modulus, or the fractional-difference formula.
    Remainder,
    /// `abs`: bool is the identity, otherwise a masked select.
    MaskedUnary,
    /// Shifts: the shift amount is clamped to `[0, bits - 1]`.
    ShiftClamp,
    /// Transcendental ops: integer operands are cast to the default float.
    FloatDomain,
    /// `add`, `subtract`: the second operand is scaled by `alpha`.
    Scaled,
    /// `minimum`, `maximum`: compare-and-select unless `use_where` is off.
    NanAwareExtremum,
    /// `isinf`: picks the infinity sign to detect.
    InfinitySign,
    /// `lcm`: the result is made non-negative.
    Absolute,
}

/// The result dtype relative to the computation dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultDtype {
    Same,
    Bool,
    /// Integer and bool computation dtypes become the default float.
    Float,
    /// Complex input yields its component dtype.
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDescriptor {
    pub kernel: Kernel,
    pub promotion: Promotion,
    pub policy: Policy,
    pub output: ResultDtype,
}

impl OpDescriptor {
    pub fn arity(&self) -> usize {
        self.kernel.arity()
    }
}

const fn unary(kernel: UnaryKernel, policy: Policy, output: ResultDtype) -> OpDescriptor {
    OpDescriptor {
        kernel: Kernel::Unary(kernel),
        promotion: Promotion::None,
        policy,
        output,
    }
}

const fn binary(
    kernel: BinaryKernel,
    promotion: Promotion,
    policy: Policy,
    output: ResultDtype,
) -> OpDescriptor {
    OpDescriptor {
        kernel: Kernel::Binary(kernel),
        promotion,
        policy,
        output,
    }
}

const fn transcendental(kernel: UnaryKernel) -> OpDescriptor {
    unary(kernel, Policy::FloatDomain, ResultDtype::Float)
}

const fn arithmetic(kernel: BinaryKernel) -> OpDescriptor {
    binary(kernel, Promotion::Standard, Policy::Plain, ResultDtype::Same)
}

const fn comparison(kernel: BinaryKernel) -> OpDescriptor {
    binary(kernel, Promotion::Standard, Policy::Plain, ResultDtype::Bool)
}

const fn logical(kernel: BinaryKernel) -> OpDescriptor {
    binary(kernel, Promotion::Standard, Policy::BooleanCoercion, ResultDtype::Bool)
}

const fn bitwise(kernel: BinaryKernel) -> OpDescriptor {
    binary(kernel, Promotion::ArrayApi, Policy::Plain, ResultDtype::Same)
}

const fn shift(kernel: BinaryKernel) -> OpDescriptor {
    binary(kernel, Promotion::ArrayApi, Policy::ShiftClamp, ResultDtype::Same)
}

const fn rounding(kernel: UnaryKernel) -> OpDescriptor {
    unary(kernel, Policy::IntegerIdentity, ResultDtype::Same)
}

macro_rules! registry {
    ($($variant:ident => $name:literal: $desc:expr,)+) => {
        /// Identifier of one registered elementwise operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum OpId {
            $($variant,)+
        }

        impl OpId {
            /// Every registered operation, in registry order.
            pub const ALL: &'static [OpId] = &[$(OpId::$variant,)+];

            /// The registry name, e.g. `"floor_divide"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(OpId::$variant => $name,)+
                }
            }

            pub fn descriptor(&self) -> OpDescriptor {
                match self {
                    $(OpId::$variant => $desc,)+
                }
            }
        }

        impl FromStr for OpId {
            type Err = DispatchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(OpId::$variant),)+
                    other => Err(DispatchError::InvalidOption(format!(
                        "unknown operation '{}'",
                        other
                    ))),
                }
            }
        }
    };
}

use BinaryKernel as B;
use UnaryKernel as U;

registry! {
    Add => "add": binary(B::Add, Promotion::Standard, Policy::Scaled, ResultDtype::Same),
    Subtract => "subtract": binary(B::Sub, Promotion::Standard, Policy::Scaled, ResultDtype::Same),
    Multiply => "multiply": arithmetic(B::Mul),
    Divide => "divide": binary(B::Div, Promotion::Standard, Policy::FloatDivision, ResultDtype::Float),
    FloorDivide => "floor_divide": binary(B::Div, Promotion::Standard, Policy::FloorDivision, ResultDtype::Same),
    TruncDivide => "trunc_divide": binary(B::TruncDiv, Promotion::Standard, Policy::FloatDivision, ResultDtype::Float),
    Remainder => "remainder": binary(B::Remainder, Promotion::Standard, Policy::Remainder, ResultDtype::Same),
    Fmod => "fmod": arithmetic(B::Fmod),
    Pow => "pow": arithmetic(B::Pow),
    Abs => "abs": unary(U::Abs, Policy::MaskedUnary, ResultDtype::Real),
    Negative => "negative": unary(U::Neg, Policy::Plain, ResultDtype::Same),
    Positive => "positive": unary(U::Positive, Policy::Plain, ResultDtype::Same),
    Square => "square": unary(U::Square, Policy::Plain, ResultDtype::Same),
    Reciprocal => "reciprocal": transcendental(U::Reciprocal),
    Sign => "sign": unary(U::Sign, Policy::Plain, ResultDtype::Same),
    Ceil => "ceil": rounding(U::Ceil),
    Floor => "floor": rounding(U::Floor),
    Round => "round": rounding(U::Round { decimals: 0 }),
    Trunc => "trunc": rounding(U::Trunc),
    Sqrt => "sqrt": transcendental(U::Sqrt),
    Exp => "exp": transcendental(U::Exp),
    Log => "log": transcendental(U::Log),
    Log2 => "log2": transcendental(U::Log2),
    Log10 => "log10": transcendental(U::Log10),
    Log1p => "log1p": transcendental(U::Log1p),
    Expm1 => "expm1": transcendental(U::Expm1),
    Sin => "sin": transcendental(U::Sin),
    Cos => "cos": transcendental(U::Cos),
    Tan => "tan": transcendental(U::Tan),
    Asin => "asin": transcendental(U::Asin),
    Acos => "acos": transcendental(U::Acos),
    Atan => "atan": transcendental(U::Atan),
    Atan2 => "atan2": binary(B::Atan2, Promotion::Standard, Policy::FloatDomain, ResultDtype::Float),
    Sinh => "sinh": transcendental(U::Sinh),
    Cosh => "cosh": transcendental(U::Cosh),
    Tanh => "tanh": transcendental(U::Tanh),
    Asinh => "asinh": transcendental(U::Asinh),
    Acosh => "acosh": transcendental(U::Acosh),
    Atanh => "atanh": transcendental(U::Atanh),
    Erf => "erf": transcendental(U::Erf),
    Equal => "equal": comparison(B::Eq),
    NotEqual => "not_equal": comparison(B::Ne),
    Less => "less": comparison(B::Lt),
    LessEqual => "less_equal": comparison(B::Le),
    Greater => "greater": comparison(B::Gt),
    GreaterEqual => "greater_equal": comparison(B::Ge),
    LogicalAnd => "logical_and": logical(B::LogicalAnd),
    LogicalOr => "logical_or": logical(B::LogicalOr),
    LogicalXor => "logical_xor": logical(B::LogicalXor),
    LogicalNot => "logical_not": unary(U::LogicalNot, Policy::BooleanCoercion, ResultDtype::Bool),
    BitwiseAnd => "bitwise_and": bitwise(B::BitAnd),
    BitwiseOr => "bitwise_or": bitwise(B::BitOr),
    BitwiseXor => "bitwise_xor": bitwise(B::BitXor),
    BitwiseInvert => "bitwise_invert": unary(U::BitwiseNot, Policy::Plain, ResultDtype::Same),
    BitwiseLeftShift => "bitwise_left_shift": shift(B::Shl),
    BitwiseRightShift => "bitwise_right_shift": shift(B::Shr),
    IsNan => "isnan": unary(U::IsNan, Policy::Plain, ResultDtype::Bool),
    IsInf => "isinf": unary(U::IsInf, Policy::InfinitySign, ResultDtype::Bool),
    IsFinite => "isfinite": unary(U::IsFinite, Policy::Plain, ResultDtype::Bool),
    IsReal => "isreal": unary(U::IsReal, Policy::Plain, ResultDtype::Bool),
    Minimum => "minimum": binary(B::Minimum, Promotion::Standard, Policy::NanAwareExtremum, ResultDtype::Same),
    Maximum => "maximum": binary(B::Maximum, Promotion::Standard, Policy::NanAwareExtremum, ResultDtype::Same),
    LogAddExp => "logaddexp": binary(B::LogAddExp, Promotion::Standard, Policy::FloatDomain, ResultDtype::Float),
    Lcm => "lcm": binary(B::Lcm, Promotion::Standard, Policy::Absolute, ResultDtype::Same),
    Deg2Rad => "deg2rad": transcendental(U::Deg2Rad),
    Rad2Deg => "rad2deg": transcendental(U::Rad2Deg),
}

impl OpId {
    pub fn arity(&self) -> usize {
        self.descriptor().arity()
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
