//! `ew-ops` - Elementwise operation dispatch for elementwise-runtime.
//!
//! This crate provides:
//! - A registry of elementwise operations (`OpId`) and their descriptors
//! - A static capability table of dtypes each operation refuses per backend version
//! - The `Dispatcher`, which promotes operands, applies per-operation policies,
//!   invokes a `ComputeBackend` kernel and reconciles the result with an
//!   optional destination tensor
//! - `DispatchConfig` for default dtypes and the backend version

pub mod capability;
pub mod config;
pub mod destination;
pub mod dispatcher;
pub mod error;
pub mod operand;
pub mod options;
pub mod registry;

pub use capability::DTypeFilter;
pub use config::DispatchConfig;
pub use destination::Destination;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use operand::Operand;
pub use options::{Mask, OpOptions};
pub use registry::{OpDescriptor, OpId, Policy, ResultDtype};
