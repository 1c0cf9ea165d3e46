use ew_tensor::{Scalar, Tensor};

/// Per-element selector for masked unary ops.
#[derive(Debug, Clone, PartialEq)]
pub enum Mask {
    /// The same choice for every element.
    All(bool),
    /// A `Bool` tensor broadcast against the input.
    Tensor(Tensor),
}

impl Mask {
    /// True when the mask selects the computed value everywhere.
    pub fn is_all_true(&self) -> bool {
        matches!(self, Mask::All(true))
    }
}

/// Optional knobs a handful of operations accept. Every other operation
/// ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct OpOptions {
    /// Multiplier applied to the second operand of `add` and `subtract`.
    pub alpha: Option<Scalar>,
    /// `remainder`: floor-modulus semantics when true, otherwise the
    /// fractional-difference formula.
    pub modulus: bool,
    /// `round`: number of decimal places.
    pub decimals: i32,
    /// `abs`: where to take the absolute value; elsewhere the input is kept.
    pub mask: Mask,
    /// `minimum`/`maximum`: compute via compare and select.
    pub use_where: bool,
    /// `isinf`: report positive infinities.
    pub detect_positive: bool,
    /// `isinf`: report negative infinities.
    pub detect_negative: bool,
}

impl Default for OpOptions {
    fn default() -> Self {
        OpOptions {
            alpha: None,
            modulus: true,
            decimals: 0,
            mask: Mask::All(true),
            use_where: true,
            detect_positive: true,
            detect_negative: true,
        }
    }
}

impl OpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(mut self, alpha: impl Into<Scalar>) -> Self {
        self.alpha = Some(alpha.into());
        self
    }

    pub fn modulus(mut self, modulus: bool) -> Self {
        self.modulus = modulus;
        self
    }

    pub fn decimals(mut self, decimals: i32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = mask;
        self
    }

    pub fn use_where(mut self, use_where: bool) -> Self {
        self.use_where = use_where;
        self
    }

    pub fn detect(mut self, positive: bool, negative: bool) -> Self {
        self.detect_positive = positive;
        self.detect_negative = negative;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = OpOptions::default();
        assert!(o.alpha.is_none());
        assert!(o.modulus);
        assert_eq!(o.decimals, 0);
        assert!(o.mask.is_all_true());
        assert!(o.use_where && o.detect_positive && o.detect_negative);
    }

    #[test]
    fn test_builders() {
        let o = OpOptions::new()
            .alpha(2)
            .modulus(false)
            .decimals(3)
            .mask(Mask::All(false))
            .detect(false, true);
        assert_eq!(o.alpha, Some(Scalar::Int(2)));
        assert!(!o.modulus);
        assert_eq!(o.decimals, 3);
        assert!(!o.mask.is_all_true());
        assert!(!o.detect_positive && o.detect_negative);
    }
}
