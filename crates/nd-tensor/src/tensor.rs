use std::cell::Ref;

use crate::dtype::{DType, Element};
use crate::error::Result;
use crate::index::{span, Coords};
use crate::layout::Layout;
use crate::shape::{Shape, ShapeKind};
use crate::storage::Storage;

/// An N-dimensional strided view over a shared backing buffer.
///
/// A tensor addresses `storage` starting at `offset`, stepping `strides[i]`
/// elements per unit along axis `i`. Slices and [`Tensor::view`] share the
/// buffer of their source; operations that allocate (materializing a
/// transpose, repeat, [`Clone`]) get a buffer of their own.
#[derive(Debug)]
pub struct Tensor<T: Element> {
    pub(crate) storage: Storage<T>,
    pub(crate) offset: usize,
    pub(crate) shape: Shape,
    pub(crate) strides: Vec<usize>,
    pub(crate) layout: Layout,
}

impl<T: Element> Tensor<T> {
    /// Create a new tensor from data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new(data: Vec<T>, shape: Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        let strides = shape.strides();
        Tensor {
            storage: Storage::from_vec(data),
            offset: 0,
            shape,
            strides,
            layout: Layout::Identity,
        }
    }

    /// Create a zero-filled tensor with the given shape.
    pub fn zeros(shape: Shape) -> Self {
        let n = shape.numel();
        Self::new(vec![T::default(); n], shape)
    }

    /// A rank-0 tensor holding one value.
    pub fn scalar(value: T) -> Self {
        Self::new(vec![value], Shape::scalar())
    }

    /// A 1-D tensor over `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        let shape = Shape::new(vec![data.len()]);
        Self::new(data, shape)
    }

    /// A tensor addressing an existing buffer. Views are built this way.
    pub(crate) fn from_parts(
        storage: Storage<T>,
        offset: usize,
        shape: Shape,
        strides: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(shape.ndim(), strides.len());
        debug_assert!({
            let reach = span(shape.dims(), &strides);
            reach == 0 || offset + reach <= storage.len()
        });
        Tensor {
            storage,
            offset,
            shape,
            strides,
            layout: Layout::Identity,
        }
    }

    /// Returns a reference to the tensor's logical shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Per-axis strides of the logical view.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of logical elements.
    pub fn len(&self) -> usize {
        self.shape.numel()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Where logical index 0 sits in the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the underlying storage handle.
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_scalar()
    }

    pub fn is_vector(&self) -> bool {
        self.shape.is_vector()
    }

    pub fn is_col_vec(&self) -> bool {
        self.shape.is_col_vec()
    }

    pub fn is_row_vec(&self) -> bool {
        self.shape.is_row_vec()
    }

    /// True while a deferred transpose is pending.
    pub fn is_transposed(&self) -> bool {
        self.layout.is_deferred()
    }

    /// The pending permutation, if any.
    pub fn permutation(&self) -> Option<&[usize]> {
        self.layout.permutation()
    }

    /// Shape before the pending transpose, if any.
    pub fn prior_shape(&self) -> Option<&Shape> {
        match &self.layout {
            Layout::Identity => None,
            Layout::Deferred { prior_shape, .. } => Some(prior_shape),
        }
    }

    /// Strides before the pending transpose, if any.
    pub fn prior_strides(&self) -> Option<&[usize]> {
        match &self.layout {
            Layout::Identity => None,
            Layout::Deferred { prior_strides, .. } => Some(prior_strides),
        }
    }

    /// The layout the buffer is physically addressed by: the prior layout
    /// while a transpose is pending, the logical one otherwise.
    pub(crate) fn physical_layout(&self) -> (&Shape, &[usize]) {
        match &self.layout {
            Layout::Identity => (&self.shape, &self.strides),
            Layout::Deferred {
                prior_shape,
                prior_strides,
                ..
            } => (prior_shape, prior_strides),
        }
    }

    /// True if the logical elements occupy one row-major block of the buffer.
    pub fn is_contiguous(&self) -> bool {
        !self.is_transposed() && self.shape.is_contiguous(&self.strides)
    }

    /// True if both tensors address the same backing buffer.
    pub fn shares_storage(&self, other: &Tensor<T>) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    /// True if both tensors address exactly the same elements the same way.
    pub(crate) fn same_window(&self, other: &Tensor<T>) -> bool {
        self.shares_storage(other)
            && self.offset == other.offset
            && self.shape == other.shape
            && self.strides == other.strides
    }

    /// Another tensor over the same buffer with the same layout.
    pub fn view(&self) -> Tensor<T> {
        Tensor {
            storage: self.storage.clone(),
            offset: self.offset,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            layout: self.layout.clone(),
        }
    }

    /// The part of the buffer this tensor can reach: from `offset` to its
    /// last addressed element.
    pub fn data(&self) -> Ref<'_, [T]> {
        let end = self.offset + span(self.shape.dims(), &self.strides);
        Ref::map(self.storage.read(), |d| &d[self.offset..end])
    }

    /// Value at `coord`.
    ///
    /// # Panics
    /// Panics if `coord.len() != self.ndim()`.
    pub fn get(&self, coord: &[usize]) -> Result<T> {
        let idx = self.at(coord)?;
        Ok(self.storage.read()[idx])
    }

    /// Overwrite the value at `coord`. Writes go to the shared buffer, so
    /// every tensor addressing that element observes the change.
    ///
    /// # Panics
    /// Panics if `coord.len() != self.ndim()`.
    pub fn set(&mut self, coord: &[usize], value: T) -> Result<()> {
        let idx = self.at(coord)?;
        self.storage.write()[idx] = value;
        Ok(())
    }

    /// The logical elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        if self.is_contiguous() {
            return self.data()[..self.len()].to_vec();
        }
        let data = self.storage.read();
        let (_, strides) = self.physical_layout();
        let perm = self.layout.permutation();
        let mut out = Vec::with_capacity(self.len());
        for coord in Coords::new(self.shape.dims()) {
            let mut idx = self.offset;
            match perm {
                Some(perm) => {
                    for (&c, &axis) in coord.iter().zip(perm) {
                        idx += c * strides[axis];
                    }
                }
                None => {
                    for (&c, &s) in coord.iter().zip(strides) {
                        idx += c * s;
                    }
                }
            }
            out.push(data[idx]);
        }
        out
    }
}

impl<T: Element> Clone for Tensor<T> {
    /// A deep copy: same layout, independent buffer.
    fn clone(&self) -> Self {
        Tensor {
            storage: self.storage.deep_copy(),
            offset: self.offset,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            layout: self.layout.clone(),
        }
    }
}
