use tracing::debug;

use crate::dtype::Element;
use crate::error::{Result, TensorError};
use crate::shape::{Shape, ShapeKind};
use crate::tensor::Tensor;

/// Target of a repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Flatten first, then repeat along the single remaining axis.
    All,
    /// A concrete axis.
    Index(usize),
}

impl From<usize> for Axis {
    fn from(axis: usize) -> Self {
        Axis::Index(axis)
    }
}

impl<T: Element> Tensor<T> {
    /// Repeats each element along `axis`: position `i` along the axis is
    /// replicated `counts[i]` times, contiguously, with every other axis held
    /// fixed. A single count applies to every position.
    ///
    /// Scalars and vanilla vectors accept axes 0 and 1: axis 1 treats them as
    /// a column, so a scalar becomes `(1, k)` and `(n)` becomes `(n, k)`.
    /// The result always owns a new buffer.
    pub fn repeat(&self, axis: Axis, counts: &[usize]) -> Result<Tensor<T>> {
        let (work, axis) = working_shape(self.shape(), axis)?;

        let size = work[axis];
        let counts = if counts.len() == 1 {
            vec![counts[0]; size]
        } else if counts.len() == size {
            counts.to_vec()
        } else {
            return Err(TensorError::BroadcastError {
                size,
                got: counts.len(),
            });
        };

        let outer: usize = work[..axis].iter().product();
        let inner: usize = work[axis + 1..].iter().product();
        let mut out_dims = work.clone();
        out_dims[axis] = counts.iter().sum();
        let out_shape = Shape::new(out_dims);

        let src = self.to_vec();
        let mut data = Vec::with_capacity(out_shape.numel());
        for o in 0..outer {
            for (j, &count) in counts.iter().enumerate() {
                let start = (o * size + j) * inner;
                let block = &src[start..start + inner];
                for _ in 0..count {
                    data.extend_from_slice(block);
                }
            }
        }

        debug!(from = %self.shape(), to = %out_shape, axis, "repeat");
        Ok(Tensor::new(data, out_shape))
    }
}

/// The shape the source data is read as, and the axis to repeat within it.
fn working_shape(shape: &Shape, axis: Axis) -> Result<(Vec<usize>, usize)> {
    let ndim = shape.ndim();
    let axis = match axis {
        Axis::All => return Ok((vec![shape.numel()], 0)),
        Axis::Index(axis) => axis,
    };
    let invalid = TensorError::InvalidAxis { axis, ndim };

    match (shape.kind(), axis) {
        (ShapeKind::Scalar, 0) => Ok((vec![1], 0)),
        (ShapeKind::Scalar, 1) => Ok((vec![1, 1], 1)),
        (ShapeKind::Vanilla1D, 0) => Ok((shape.dims().to_vec(), 0)),
        (ShapeKind::Vanilla1D, 1) => Ok((vec![shape.dim(0), 1], 1)),
        (ShapeKind::Scalar | ShapeKind::Vanilla1D, _) => Err(invalid),
        (ShapeKind::ColumnVector | ShapeKind::RowVector | ShapeKind::General, _) => {
            if axis < ndim {
                Ok((shape.dims().to_vec(), axis))
            } else {
                Err(invalid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn repeated(t: &Tensor<i32>, axis: Axis, counts: &[usize]) -> (Vec<i32>, Vec<usize>) {
        let r = t.repeat(axis, counts).unwrap();
        assert!(!r.shares_storage(t));
        let data = r.data().to_vec();
        (data, r.shape().dims().to_vec())
    }

    #[test]
    fn test_repeat_scalar() {
        let t = Tensor::scalar(3);
        assert_eq!(repeated(&t, Axis::Index(0), &[3]), (vec![3, 3, 3], vec![3]));
        assert_eq!(repeated(&t, Axis::Index(1), &[3]), (vec![3, 3, 3], vec![1, 3]));
        assert_eq!(repeated(&t, Axis::Index(0), &[5]), (vec![3; 5], vec![5]));
    }

    #[test]
    fn test_repeat_vectors() {
        let backing = vec![1, 2];
        let expected = vec![1, 1, 1, 2, 2, 2];

        let col = Tensor::new(backing.clone(), Shape::from([2, 1]));
        let row = Tensor::new(backing.clone(), Shape::from([1, 2]));
        let vanilla = Tensor::from_vec(backing);

        // axis 1
        assert_eq!(repeated(&col, Axis::Index(1), &[3]), (expected.clone(), vec![2, 3]));
        assert_eq!(repeated(&vanilla, Axis::Index(1), &[3]), (expected.clone(), vec![2, 3]));
        assert_eq!(repeated(&row, Axis::Index(1), &[3]), (expected.clone(), vec![1, 6]));

        // axis 0
        assert_eq!(repeated(&vanilla, Axis::Index(0), &[3]), (expected.clone(), vec![6]));
        assert_eq!(repeated(&col, Axis::Index(0), &[3]), (expected.clone(), vec![6, 1]));
        assert_eq!(repeated(&row, Axis::Index(0), &[3]), (vec![1, 2, 1, 2, 1, 2], vec![3, 2]));

        // all axes flatten
        for t in [&col, &row, &vanilla] {
            assert_eq!(repeated(t, Axis::All, &[3]), (expected.clone(), vec![6]));
        }
    }

    #[test]
    fn test_repeat_matrix() {
        let t = Tensor::new(vec![1, 2, 3, 4], Shape::from([2, 2]));

        assert_eq!(repeated(&t, Axis::All, &[1, 2, 1, 1]), (vec![1, 2, 2, 3, 4], vec![5]));
        assert_eq!(repeated(&t, Axis::from(1usize), &[2, 1]).1, vec![2, 3]);
        assert_eq!(repeated(&t, Axis::Index(1), &[2, 1]), (vec![1, 1, 2, 3, 3, 4], vec![2, 3]));
        assert_eq!(repeated(&t, Axis::Index(1), &[1, 2]), (vec![1, 2, 2, 3, 4, 4], vec![2, 3]));
        assert_eq!(repeated(&t, Axis::Index(0), &[1, 2]), (vec![1, 2, 3, 4, 3, 4], vec![3, 2]));
        assert_eq!(repeated(&t, Axis::Index(0), &[2, 1]), (vec![1, 2, 1, 2, 3, 4], vec![3, 2]));
    }

    #[test]
    fn test_repeat_3d() {
        let t = Tensor::new((1..=12).collect(), Shape::from([2, 3, 2]));

        assert_eq!(
            repeated(&t, Axis::Index(1), &[1, 2, 1]),
            (
                vec![1, 2, 3, 4, 3, 4, 5, 6, 7, 8, 9, 10, 9, 10, 11, 12],
                vec![2, 4, 2]
            )
        );

        let doubled: Vec<i32> = (1..=12).flat_map(|v| [v, v]).collect();
        assert_eq!(repeated(&t, Axis::All, &[2]), (doubled.clone(), vec![24]));
        assert_eq!(repeated(&t, Axis::Index(2), &[2]), (doubled, vec![2, 3, 4]));
    }

    #[test]
    fn test_repeat_zero_count_drops() {
        let t = Tensor::new(vec![1, 2, 3, 4], Shape::from([2, 2]));
        assert_eq!(repeated(&t, Axis::Index(1), &[0, 1]), (vec![2, 4], vec![2, 1]));
    }

    #[test]
    fn test_repeat_reads_logical_order() {
        let mut t = Tensor::new(vec![1, 2, 3, 4], Shape::from([2, 2]));
        t.t(&[]).unwrap();
        // logical [[1, 3], [2, 4]]
        assert_eq!(repeated(&t, Axis::Index(1), &[2, 1]), (vec![1, 1, 3, 2, 2, 4], vec![2, 3]));
    }

    #[test]
    fn test_repeat_float() {
        let t = Tensor::from_vec(vec![0.5f32, 1.5]);
        let r = t.repeat(Axis::Index(0), &[2]).unwrap();
        let data = r.to_vec();
        assert_relative_eq!(data[1], 0.5);
        assert_relative_eq!(data[3], 1.5);
    }

    #[test]
    fn test_repeat_broadcast_error() {
        let t = Tensor::new((1..=12).collect::<Vec<i32>>(), Shape::from([2, 3, 2]));
        assert_eq!(
            t.repeat(Axis::Index(0), &[1, 2, 1]).unwrap_err(),
            TensorError::BroadcastError { size: 2, got: 3 }
        );
        assert!(matches!(
            t.repeat(Axis::Index(1), &[]),
            Err(TensorError::BroadcastError { size: 3, got: 0 })
        ));
    }

    #[test]
    fn test_repeat_invalid_axis() {
        let col = Tensor::new(vec![1, 2], Shape::from([2, 1]));
        assert_eq!(
            col.repeat(Axis::Index(2), &[3]).unwrap_err(),
            TensorError::InvalidAxis { axis: 2, ndim: 2 }
        );

        let m = Tensor::new(vec![1, 2, 3, 4, 5, 6], Shape::from([2, 3]));
        assert!(matches!(m.repeat(Axis::Index(3), &[3]), Err(TensorError::InvalidAxis { .. })));

        assert!(Tensor::scalar(1).repeat(Axis::Index(2), &[3]).is_err());
        assert!(Tensor::from_vec(vec![1, 2]).repeat(Axis::Index(2), &[3]).is_err());
    }
}
