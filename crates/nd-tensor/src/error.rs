use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("index {index} out of bounds for axis {axis} with size {size}")]
    IndexOutOfBounds {
        axis: usize,
        index: isize,
        size: usize,
    },
    #[error("linear index {index} out of bounds for {size} addressable elements")]
    LinearIndexOutOfBounds { index: usize, size: usize },
    #[error("linear index {index} is not addressed by this view")]
    NotAddressed { index: usize },
    #[error("invalid slice {start}:{end}:{step} for axis {axis} with size {size}")]
    InvalidSlice {
        axis: usize,
        start: isize,
        end: isize,
        step: isize,
        size: usize,
    },
    #[error("got {got} per-axis entries for tensor with {ndim} dimensions")]
    DimMismatch { got: usize, ndim: usize },
    #[error("invalid axis {axis} for tensor with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },
    #[error("cannot broadcast {got} repeat counts over an axis of size {size}")]
    BroadcastError { size: usize, got: usize },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

pub type Result<T> = std::result::Result<T, TensorError>;
