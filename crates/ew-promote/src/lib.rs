//! `ew-promote` - Type promotion for elementwise-runtime.
//!
//! Given one or two operand descriptions (a typed array or a weakly typed
//! literal), `Promoter::resolve` computes the single dtype both operands are
//! cast to before a kernel runs.

pub mod error;
pub mod lattice;
pub mod resolver;

pub use error::{PromotionError, Result};
pub use lattice::{can_cast, promote_dtypes};
pub use resolver::{PromotionMode, Promoter, TypeDesc};
