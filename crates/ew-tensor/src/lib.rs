//! `ew-tensor` - Typed tensors and the native elementwise engine.
//!
//! This crate provides:
//! - The closed `DType` set (bool, signed/unsigned ints, floats, complex)
//! - `Scalar` literals and the `Element` trait mapping Rust types to dtypes
//! - A `Tensor` type backed by `CpuStorage`, with casting and broadcasting
//! - The `ComputeBackend` trait and a reference `CpuBackend`
//! - Kernel identifiers for every unary and binary elementwise primitive

pub mod backend;
pub mod cpu;
pub mod dtype;
pub mod element;
pub mod error;
pub mod kernel;
pub mod scalar;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use backend::{BackendVersion, ComputeBackend};
pub use cpu::CpuBackend;
pub use dtype::{DType, DTypeKind};
pub use element::Element;
pub use error::{Result, TensorError};
pub use kernel::{BinaryKernel, UnaryKernel};
pub use scalar::Scalar;
pub use shape::Shape;
pub use storage::CpuStorage;
pub use tensor::Tensor;

pub use num_complex::{Complex32, Complex64};
