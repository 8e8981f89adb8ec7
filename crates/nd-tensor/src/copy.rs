use tracing::debug;

use crate::dtype::Element;
use crate::error::{Result, TensorError};
use crate::index::Coords;
use crate::tensor::Tensor;

impl<T: Element> Tensor<T> {
    /// Copies this tensor's logical elements into `dest`, in row-major order.
    ///
    /// Shapes only need to agree in element count when `dest` is contiguous;
    /// the values are then written flat into its window. A strided or
    /// transposed `dest` is filled coordinate by coordinate and must have the
    /// same shape as `self`. Copying a tensor onto a view of the very same
    /// window does nothing.
    ///
    /// Writes land in `dest`'s buffer, so they are visible through every
    /// tensor sharing it. Later changes to `self` are not.
    pub fn copy_to(&self, dest: &mut Tensor<T>) -> Result<()> {
        if self.same_window(dest) && self.layout() == dest.layout() {
            return Ok(());
        }
        if self.len() != dest.len() {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape().dims().to_vec(),
                got: dest.shape().dims().to_vec(),
            });
        }

        // gather first: `dest` may alias `self`
        let src = self.to_vec();

        if dest.is_contiguous() {
            let start = dest.offset();
            dest.storage().write()[start..start + src.len()].copy_from_slice(&src);
            debug!(from = %self.shape(), to = %dest.shape(), "copy (contiguous)");
            return Ok(());
        }

        if self.shape() != dest.shape() {
            return Err(TensorError::NotImplemented(format!(
                "copy of {} into strided destination of shape {}",
                self.shape(),
                dest.shape()
            )));
        }

        let targets = Coords::new(dest.shape().dims())
            .map(|coord| dest.at(&coord))
            .collect::<Result<Vec<_>>>()?;
        let mut buf = dest.storage().write();
        for (idx, v) in targets.into_iter().zip(src) {
            buf[idx] = v;
        }
        debug!(shape = %dest.shape(), "copy (strided)");
        Ok(())
    }
}
