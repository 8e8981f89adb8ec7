//! Coordinate <-> linear index translation.

use crate::dtype::Element;
use crate::error::{Result, TensorError};
use crate::layout::{self, permute, Layout};
use crate::tensor::Tensor;

/// Number of buffer elements spanned by a strided window, from its first
/// addressed element to its last one inclusive.
pub fn span(shape: &[usize], strides: &[usize]) -> usize {
    if shape.iter().any(|&d| d == 0) {
        return 0;
    }
    1 + shape
        .iter()
        .zip(strides)
        .map(|(&d, &s)| (d - 1) * s)
        .sum::<usize>()
}

/// Linear offset of `coord` under `strides`, relative to the window start.
///
/// # Panics
/// Panics if `coord.len()` differs from the rank.
pub fn ravel(coord: &[usize], shape: &[usize], strides: &[usize]) -> Result<usize> {
    assert_eq!(
        coord.len(),
        shape.len(),
        "expected {} coordinates, got {}",
        shape.len(),
        coord.len()
    );
    let mut index = 0;
    for (axis, ((&c, &d), &s)) in coord.iter().zip(shape).zip(strides).enumerate() {
        if c >= d {
            return Err(TensorError::IndexOutOfBounds {
                axis,
                index: c as isize,
                size: d,
            });
        }
        index += c * s;
    }
    Ok(index)
}

/// Inverse of [`ravel`]: recovers the coordinate of a window-relative index.
///
/// Axes are peeled off from the largest stride to the smallest, which
/// decodes row-major layouts as well as strided and permuted windows.
pub fn unravel(index: usize, shape: &[usize], strides: &[usize]) -> Result<Vec<usize>> {
    let size = span(shape, strides);
    if index >= size {
        return Err(TensorError::LinearIndexOutOfBounds { index, size });
    }

    let mut order: Vec<usize> = (0..shape.len())
        .filter(|&axis| shape[axis] > 1 && strides[axis] > 0)
        .collect();
    order.sort_by(|&a, &b| strides[b].cmp(&strides[a]));

    let mut coord = vec![0; shape.len()];
    let mut rem = index;
    for axis in order {
        let c = rem / strides[axis];
        if c >= shape[axis] {
            return Err(TensorError::NotAddressed { index });
        }
        coord[axis] = c;
        rem -= c * strides[axis];
    }
    if rem != 0 {
        return Err(TensorError::NotAddressed { index });
    }
    Ok(coord)
}

/// Where the element at physical position `index` of a `(shape, strides)`
/// layout lands once the layout is permuted by `perm` and written out with
/// `new_strides`.
pub fn transpose_index(
    index: usize,
    shape: &[usize],
    strides: &[usize],
    perm: &[usize],
    new_strides: &[usize],
) -> Result<usize> {
    layout::validate(perm, shape.len())?;
    if new_strides.len() != shape.len() {
        return Err(TensorError::DimMismatch {
            got: new_strides.len(),
            ndim: shape.len(),
        });
    }
    let old = unravel(index, shape, strides)?;
    Ok(perm
        .iter()
        .zip(new_strides)
        .map(|(&axis, &s)| old[axis] * s)
        .sum())
}

/// Row-major iterator over every coordinate of a shape.
#[derive(Debug, Clone)]
pub struct Coords {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Coords {
    pub fn new(shape: &[usize]) -> Self {
        let next = if shape.iter().any(|&d| d == 0) {
            None
        } else {
            Some(vec![0; shape.len()])
        };
        Coords {
            shape: shape.to_vec(),
            next,
        }
    }
}

impl Iterator for Coords {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut succ = current.clone();
        for axis in (0..self.shape.len()).rev() {
            succ[axis] += 1;
            if succ[axis] < self.shape[axis] {
                self.next = Some(succ);
                return Some(current);
            }
            succ[axis] = 0;
        }
        // wrapped around every axis: `current` was the last coordinate
        Some(current)
    }
}

impl<T: Element> Tensor<T> {
    /// Absolute buffer index of `coord`.
    ///
    /// With a pending transpose the coordinate is first routed through the
    /// permutation into the prior (physical) layout.
    ///
    /// # Panics
    /// Panics if `coord.len() != self.ndim()`.
    pub fn at(&self, coord: &[usize]) -> Result<usize> {
        assert_eq!(
            coord.len(),
            self.ndim(),
            "expected {} coordinates for shape {}, got {}",
            self.ndim(),
            self.shape(),
            coord.len()
        );
        let relative = match self.layout() {
            Layout::Identity => ravel(coord, self.shape().dims(), self.strides())?,
            Layout::Deferred {
                prior_shape,
                prior_strides,
                permutation,
            } => {
                for (axis, (&c, &d)) in coord.iter().zip(self.shape().dims()).enumerate() {
                    if c >= d {
                        return Err(TensorError::IndexOutOfBounds {
                            axis,
                            index: c as isize,
                            size: d,
                        });
                    }
                }
                let mut physical = vec![0; coord.len()];
                for (&c, &axis) in coord.iter().zip(permutation) {
                    physical[axis] = c;
                }
                ravel(&physical, prior_shape.dims(), prior_strides)?
            }
        };
        Ok(self.offset() + relative)
    }

    /// Inverse of [`Tensor::at`]: the logical coordinate of an absolute
    /// buffer index.
    pub fn itol(&self, index: usize) -> Result<Vec<usize>> {
        let size = span(self.shape().dims(), self.strides());
        let relative = index
            .checked_sub(self.offset())
            .ok_or(TensorError::LinearIndexOutOfBounds { index, size })?;
        let (shape, strides) = self.physical_layout();
        let physical = unravel(relative, shape.dims(), strides).map_err(|e| match e {
            TensorError::LinearIndexOutOfBounds { .. } => {
                TensorError::LinearIndexOutOfBounds { index, size }
            }
            _ => TensorError::NotAddressed { index },
        })?;
        Ok(match self.layout().permutation() {
            Some(perm) => permute(&physical, perm),
            None => physical,
        })
    }

    /// Destination of physical element `index` when this tensor's physical
    /// layout is permuted by `perm` and laid out with `strides`.
    pub fn transpose_index(
        &self,
        index: usize,
        perm: &[usize],
        strides: &[usize],
    ) -> Result<usize> {
        let (shape, phys_strides) = self.physical_layout();
        transpose_index(index, shape.dims(), phys_strides, perm, strides)
    }
}
