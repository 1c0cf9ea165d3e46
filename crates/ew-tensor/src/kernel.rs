use std::fmt;

/// Elementwise kernels taking one tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryKernel {
    Abs,
    Neg,
    Positive,
    Square,
    Reciprocal,
    Sign,
    Ceil,
    Floor,
    /// Round half to even at `decimals` decimal places.
    Round { decimals: i32 },
    Trunc,
    Sqrt,
    Exp,
    Expm1,
    Log,
    Log2,
    Log10,
    Log1p,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Erf,
    Deg2Rad,
    Rad2Deg,
    IsNan,
    IsInf,
    IsPosInf,
    IsNegInf,
    IsFinite,
    IsReal,
    LogicalNot,
    BitwiseNot,
}

/// Elementwise kernels taking two tensors of the same dtype, broadcast together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKernel {
    Add,
    Sub,
    Mul,
    /// True division.
    Div,
    /// Division rounded toward zero.
    TruncDiv,
    /// Remainder with the sign of the divisor.
    Remainder,
    /// Remainder with the sign of the dividend.
    Fmod,
    Pow,
    Atan2,
    Minimum,
    Maximum,
    LogAddExp,
    Lcm,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl UnaryKernel {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryKernel::Abs => "abs",
            UnaryKernel::Neg => "neg",
            UnaryKernel::Positive => "positive",
            UnaryKernel::Square => "square",
            UnaryKernel::Reciprocal => "reciprocal",
            UnaryKernel::Sign => "sign",
            UnaryKernel::Ceil => "ceil",
            UnaryKernel::Floor => "floor",
            UnaryKernel::Round { .. } => "round",
            UnaryKernel::Trunc => "trunc",
            UnaryKernel::Sqrt => "sqrt",
            UnaryKernel::Exp => "exp",
            UnaryKernel::Expm1 => "expm1",
            UnaryKernel::Log => "log",
            UnaryKernel::Log2 => "log2",
            UnaryKernel::Log10 => "log10",
            UnaryKernel::Log1p => "log1p",
            UnaryKernel::Sin => "sin",
            UnaryKernel::Cos => "cos",
            UnaryKernel::Tan => "tan",
            UnaryKernel::Asin => "asin",
            UnaryKernel::Acos => "acos",
            UnaryKernel::Atan => "atan",
            UnaryKernel::Sinh => "sinh",
            UnaryKernel::Cosh => "cosh",
            UnaryKernel::Tanh => "tanh",
            UnaryKernel::Asinh => "asinh",
            UnaryKernel::Acosh => "acosh",
            UnaryKernel::Atanh => "atanh",
            UnaryKernel::Erf => "erf",
            UnaryKernel::Deg2Rad => "deg2rad",
            UnaryKernel::Rad2Deg => "rad2deg",
            UnaryKernel::IsNan => "isnan",
            UnaryKernel::IsInf => "isinf",
            UnaryKernel::IsPosInf => "isposinf",
            UnaryKernel::IsNegInf => "isneginf",
            UnaryKernel::IsFinite => "isfinite",
            UnaryKernel::IsReal => "isreal",
            UnaryKernel::LogicalNot => "logical_not",
            UnaryKernel::BitwiseNot => "bitwise_not",
        }
    }

    /// Kernels whose output is always boolean.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            UnaryKernel::IsNan
                | UnaryKernel::IsInf
                | UnaryKernel::IsPosInf
                | UnaryKernel::IsNegInf
                | UnaryKernel::IsFinite
                | UnaryKernel::IsReal
                | UnaryKernel::LogicalNot
        )
    }
}

impl BinaryKernel {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryKernel::Add => "add",
            BinaryKernel::Sub => "sub",
            BinaryKernel::Mul => "mul",
            BinaryKernel::Div => "div",
            BinaryKernel::TruncDiv => "trunc_div",
            BinaryKernel::Remainder => "remainder",
            BinaryKernel::Fmod => "fmod",
            BinaryKernel::Pow => "pow",
            BinaryKernel::Atan2 => "atan2",
            BinaryKernel::Minimum => "minimum",
            BinaryKernel::Maximum => "maximum",
            BinaryKernel::LogAddExp => "logaddexp",
            BinaryKernel::Lcm => "lcm",
            BinaryKernel::Eq => "eq",
            BinaryKernel::Ne => "ne",
            BinaryKernel::Lt => "lt",
            BinaryKernel::Le => "le",
            BinaryKernel::Gt => "gt",
            BinaryKernel::Ge => "ge",
            BinaryKernel::LogicalAnd => "logical_and",
            BinaryKernel::LogicalOr => "logical_or",
            BinaryKernel::LogicalXor => "logical_xor",
            BinaryKernel::BitAnd => "bitwise_and",
            BinaryKernel::BitOr => "bitwise_or",
            BinaryKernel::BitXor => "bitwise_xor",
            BinaryKernel::Shl => "bitwise_left_shift",
            BinaryKernel::Shr => "bitwise_right_shift",
        }
    }

    /// Kernels whose output is always boolean.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            BinaryKernel::Eq
                | BinaryKernel::Ne
                | BinaryKernel::Lt
                | BinaryKernel::Le
                | BinaryKernel::Gt
                | BinaryKernel::Ge
                | BinaryKernel::LogicalAnd
                | BinaryKernel::LogicalOr
                | BinaryKernel::LogicalXor
        )
    }
}

impl fmt::Display for UnaryKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for BinaryKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
