use ew_promote::TypeDesc;
use ew_tensor::{Complex32, Complex64, Scalar, Shape, Tensor};

/// One input to an operation: a typed tensor or a raw literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Tensor(&'a Tensor),
    Scalar(Scalar),
}

impl<'a> Operand<'a> {
    pub fn type_desc(&self) -> TypeDesc {
        match self {
            Operand::Tensor(t) => TypeDesc::Array(t.dtype()),
            Operand::Scalar(s) => TypeDesc::Scalar(*s),
        }
    }

    /// Shape the operand broadcasts as. Literals are rank 0.
    pub fn shape(&self) -> Shape {
        match self {
            Operand::Tensor(t) => t.shape().clone(),
            Operand::Scalar(_) => Shape::scalar(),
        }
    }

    pub fn as_tensor(&self) -> Option<&'a Tensor> {
        match *self {
            Operand::Tensor(t) => Some(t),
            Operand::Scalar(_) => None,
        }
    }
}

impl<'a> From<&'a Tensor> for Operand<'a> {
    fn from(t: &'a Tensor) -> Self {
        Operand::Tensor(t)
    }
}

impl From<Scalar> for Operand<'_> {
    fn from(s: Scalar) -> Self {
        Operand::Scalar(s)
    }
}

macro_rules! operand_from_native {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Operand<'_> {
                fn from(v: $t) -> Self {
                    Operand::Scalar(Scalar::from(v))
                }
            }
        )+
    };
}

operand_from_native!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, Complex32, Complex64);
