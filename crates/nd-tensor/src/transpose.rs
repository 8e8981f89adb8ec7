use std::mem;

use tracing::{debug, trace};

use crate::dtype::Element;
use crate::error::Result;
use crate::index::Coords;
use crate::layout::{self, Layout};
use crate::storage::Storage;
use crate::tensor::Tensor;

impl<T: Element> Tensor<T> {
    /// Deferred transpose: permutes the logical view without touching data.
    ///
    /// Axis `i` of the result is axis `perm[i]` of the current view. An empty
    /// `perm` means the full reversal. The identity permutation is a no-op.
    ///
    /// When a transpose is already pending the two are composed. If they
    /// cancel, the tensor drops back to its untransposed layout; otherwise
    /// the pending one is materialized and `perm` becomes the new pending
    /// transpose.
    pub fn t(&mut self, perm: &[usize]) -> Result<()> {
        let perm = if perm.is_empty() {
            layout::reversed(self.ndim())
        } else {
            layout::validate(perm, self.ndim())?;
            perm.to_vec()
        };
        if layout::is_identity(&perm) {
            return Ok(());
        }

        if let Some(pending) = self.permutation() {
            if layout::is_identity(&layout::compose(pending, &perm)) {
                trace!(perm = ?perm, "transpose cancels pending transpose");
                self.ut();
                return Ok(());
            }
            self.transpose();
        }

        let shape = self.shape().permuted(&perm);
        let strides = layout::permute(self.strides(), &perm);
        let prior_shape = mem::replace(&mut self.shape, shape);
        let prior_strides = mem::replace(&mut self.strides, strides);
        trace!(from = %prior_shape, to = %self.shape, perm = ?perm, "deferred transpose");
        self.layout = Layout::Deferred {
            prior_shape,
            prior_strides,
            permutation: perm,
        };
        Ok(())
    }

    /// Materializes a pending transpose into a freshly allocated buffer laid
    /// out row-major for the logical shape. Other tensors sharing the old
    /// buffer keep seeing the old data. No-op without a pending transpose.
    pub fn transpose(&mut self) {
        let perm = match &self.layout {
            Layout::Identity => return,
            Layout::Deferred { permutation, .. } => permutation.clone(),
        };
        let new_strides = self.shape.strides();
        let n = self.len();

        let data = {
            let (prior_shape, prior_strides) = self.physical_layout();
            let src = self.storage.read();
            let whole_buffer = self.offset == 0 && src.len() == n;
            if whole_buffer && prior_shape.is_contiguous(prior_strides) {
                let mut dst = vec![T::default(); n];
                for (i, &v) in src.iter().enumerate() {
                    // in range by construction: the buffer is exactly the prior layout
                    if let Ok(j) = self.transpose_index(i, &perm, &new_strides) {
                        dst[j] = v;
                    }
                }
                dst
            } else {
                Coords::new(self.shape.dims())
                    .map(|coord| {
                        let idx = self.offset
                            + coord
                                .iter()
                                .zip(&self.strides)
                                .map(|(c, s)| c * s)
                                .sum::<usize>();
                        src[idx]
                    })
                    .collect()
            }
        };

        debug!(shape = %self.shape, perm = ?perm, len = n, "materialized transpose");
        self.storage = Storage::from_vec(data);
        self.offset = 0;
        self.strides = new_strides;
        self.layout = Layout::Identity;
    }

    /// Drops any pending transpose, restoring the layout it was taken from.
    pub fn ut(&mut self) {
        if let Layout::Deferred {
            prior_shape,
            prior_strides,
            ..
        } = mem::take(&mut self.layout)
        {
            trace!(from = %self.shape, to = %prior_shape, "undo transpose");
            self.shape = prior_shape;
            self.strides = prior_strides;
        }
    }
}
