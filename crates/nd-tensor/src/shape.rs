use std::fmt;

/// A tensor shape, wrapping a vector of dimension sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Vec<usize>,
}

/// Structural flavor of a shape. Vectors come in three storage flavors and
/// several operations treat them differently from general tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Rank 0.
    Scalar,
    /// Rank 1, `(n)`.
    Vanilla1D,
    /// `(n, 1)` with `n > 1`.
    ColumnVector,
    /// `(1, n)` with `n > 1`.
    RowVector,
    /// Anything else, including `(1, 1)`.
    General,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// The rank-0 shape.
    pub fn scalar() -> Self {
        Shape { dims: Vec::new() }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (product of all dimension sizes).
    ///
    /// The empty product is 1, so a scalar shape holds one element.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the size of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i >= ndim()`.
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Computes row-major contiguous strides for this shape.
    ///
    /// For a shape [d0, d1, d2], the strides are [d1*d2, d2, 1].
    pub fn strides(&self) -> Vec<usize> {
        if self.dims.is_empty() {
            return vec![];
        }
        let mut strides = vec![0usize; self.dims.len()];
        strides[self.dims.len() - 1] = 1;
        for i in (0..self.dims.len() - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Checks if the given strides address this shape as one contiguous
    /// row-major block. Size-1 axes never move, so their strides are ignored.
    pub fn is_contiguous(&self, strides: &[usize]) -> bool {
        if strides.len() != self.dims.len() {
            return false;
        }
        let expected = self.strides();
        self.dims
            .iter()
            .zip(strides.iter().zip(expected.iter()))
            .all(|(&d, (s, e))| d <= 1 || s == e)
    }

    /// Classifies the shape into one of the [`ShapeKind`] flavors.
    pub fn kind(&self) -> ShapeKind {
        match self.dims.as_slice() {
            [] => ShapeKind::Scalar,
            [_] => ShapeKind::Vanilla1D,
            [n, 1] if *n > 1 => ShapeKind::ColumnVector,
            [1, n] if *n > 1 => ShapeKind::RowVector,
            _ => ShapeKind::General,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.kind() == ShapeKind::Scalar
    }

    /// True for all three vector flavors.
    pub fn is_vector(&self) -> bool {
        matches!(
            self.kind(),
            ShapeKind::Vanilla1D | ShapeKind::ColumnVector | ShapeKind::RowVector
        )
    }

    pub fn is_col_vec(&self) -> bool {
        self.kind() == ShapeKind::ColumnVector
    }

    pub fn is_row_vec(&self) -> bool {
        self.kind() == ShapeKind::RowVector
    }

    /// Reorders the dimensions so that axis `i` of the result is axis
    /// `perm[i]` of `self`. The permutation must already be validated.
    pub(crate) fn permuted(&self, perm: &[usize]) -> Shape {
        Shape::new(perm.iter().map(|&p| self.dims[p]).collect())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, ")")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::from_slice(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims.to_vec())
    }
}
