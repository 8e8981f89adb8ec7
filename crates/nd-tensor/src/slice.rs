use tracing::trace;

use crate::dtype::Element;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Per-axis slice descriptor. `None` in a slice list keeps the whole axis.
///
/// Fields are signed so that negative positions reach validation and are
/// rejected instead of being silently reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceSpec {
    /// Fixed position; the axis is dropped from the result.
    Index(isize),
    /// Half-open `start..end` taking every `step`-th element.
    Range { start: isize, end: isize, step: isize },
}

impl SliceSpec {
    pub fn index(i: isize) -> Self {
        SliceSpec::Index(i)
    }

    pub fn range(start: isize, end: isize) -> Self {
        SliceSpec::Range {
            start,
            end,
            step: 1,
        }
    }

    pub fn range_step(start: isize, end: isize, step: isize) -> Self {
        SliceSpec::Range { start, end, step }
    }
}

impl<T: Element> Tensor<T> {
    /// A view of part of this tensor sharing its buffer.
    ///
    /// Descriptors apply to leading axes in order; missing trailing
    /// descriptors keep their axes whole. A fixed index drops its axis,
    /// except axis 0 of a row vector, which keeps the `(1, n)` shape.
    /// Slicing a tensor with a pending transpose slices its logical view.
    pub fn slice(&self, slices: &[Option<SliceSpec>]) -> Result<Tensor<T>> {
        let ndim = self.ndim();
        if slices.len() > ndim {
            return Err(TensorError::DimMismatch {
                got: slices.len(),
                ndim,
            });
        }

        let keep_leading = self.is_row_vec();
        let mut offset = self.offset();
        let mut dims = Vec::with_capacity(ndim);
        let mut strides = Vec::with_capacity(ndim);

        for (axis, (&size, &stride)) in self.shape().dims().iter().zip(self.strides()).enumerate() {
            match slices.get(axis).copied().flatten() {
                None => {
                    dims.push(size);
                    strides.push(stride);
                }
                Some(SliceSpec::Index(i)) => {
                    let i = checked_position(axis, i, size)?;
                    offset += i * stride;
                    if keep_leading && axis == 0 {
                        dims.push(1);
                        strides.push(stride);
                    }
                }
                Some(SliceSpec::Range { start, end, step }) => {
                    let first = checked_position(axis, start, size)?;
                    if end < 0 || end as usize > size {
                        return Err(TensorError::IndexOutOfBounds {
                            axis,
                            index: end,
                            size,
                        });
                    }
                    if step < 1 || start >= end {
                        return Err(TensorError::InvalidSlice {
                            axis,
                            start,
                            end,
                            step,
                            size,
                        });
                    }
                    let (width, step) = ((end - start) as usize, step as usize);
                    offset += first * stride;
                    dims.push(width.div_ceil(step));
                    // a step past the end leaves one element, whose stride is never used
                    strides.push(stride * step.min(width));
                }
            }
        }

        let shape = Shape::new(dims);
        trace!(from = %self.shape(), to = %shape, offset, "slice");
        Ok(Tensor::from_parts(
            self.storage().clone(),
            offset,
            shape,
            strides,
        ))
    }
}

fn checked_position(axis: usize, index: isize, size: usize) -> Result<usize> {
    if index < 0 || index as usize >= size {
        return Err(TensorError::IndexOutOfBounds { axis, index, size });
    }
    Ok(index as usize)
}
