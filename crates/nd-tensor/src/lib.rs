//! `nd-tensor` - N-dimensional strided tensors over shared buffers.
//!
//! This crate provides:
//! - A `Tensor` type addressing a reference-counted buffer through a shape,
//!   per-axis strides and an offset
//! - Coordinate <-> buffer index translation (`at` / `itol`)
//! - Zero-copy slicing with fixed indices, ranges and steps
//! - Deferred transposes that can later be materialized or undone
//! - Repeat along an axis and copying between tensors
//! - Element type definitions (f16, f32, f64 and integers)

pub mod copy;
pub mod dtype;
pub mod error;
pub mod index;
pub mod layout;
pub mod repeat;
pub mod shape;
pub mod slice;
pub mod storage;
pub mod tensor;
pub mod transpose;

// Re-export primary types at the crate root for convenience.
pub use dtype::{DType, Element};
pub use error::{Result, TensorError};
pub use index::Coords;
pub use layout::Layout;
pub use repeat::Axis;
pub use shape::{Shape, ShapeKind};
pub use slice::SliceSpec;
pub use storage::Storage;
pub use tensor::Tensor;
