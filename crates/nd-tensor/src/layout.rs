//! Transpose bookkeeping and permutation algebra.
//!
//! A tensor is either in its physical layout ([`Layout::Identity`]) or carries
//! a pending permutation ([`Layout::Deferred`]) together with the physical
//! layout it was taken from. The tensor's own shape and strides always show
//! the permuted, logical view; the prior layout is what `ut()` restores and
//! what index translation decodes against.

use crate::error::{Result, TensorError};
use crate::shape::Shape;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    /// No pending transpose.
    #[default]
    Identity,
    /// A transpose recorded without moving data.
    Deferred {
        prior_shape: Shape,
        prior_strides: Vec<usize>,
        /// Axis `i` of the logical view is axis `permutation[i]` of the prior layout.
        permutation: Vec<usize>,
    },
}

impl Layout {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Layout::Deferred { .. })
    }

    pub fn permutation(&self) -> Option<&[usize]> {
        match self {
            Layout::Identity => None,
            Layout::Deferred { permutation, .. } => Some(permutation),
        }
    }
}

/// The full reversal `(n-1, ..., 1, 0)`.
pub fn reversed(ndim: usize) -> Vec<usize> {
    (0..ndim).rev().collect()
}

pub fn is_identity(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}

/// Checks that `perm` is a permutation of `0..ndim`.
pub fn validate(perm: &[usize], ndim: usize) -> Result<()> {
    if let Some(&axis) = perm.iter().find(|&&p| p >= ndim) {
        return Err(TensorError::InvalidAxis { axis, ndim });
    }
    let mut seen = vec![false; ndim];
    for &p in perm {
        if seen[p] {
            return Err(TensorError::InvalidPermutation {
                perm: perm.to_vec(),
                ndim,
            });
        }
        seen[p] = true;
    }
    if perm.len() != ndim {
        return Err(TensorError::InvalidPermutation {
            perm: perm.to_vec(),
            ndim,
        });
    }
    Ok(())
}

/// Applies `perm` to a per-axis sequence: `out[i] = values[perm[i]]`.
pub fn permute<V: Copy>(values: &[V], perm: &[usize]) -> Vec<V> {
    perm.iter().map(|&p| values[p]).collect()
}

/// Composes two permutations: applying `first` and then `second` to a
/// sequence equals applying the result once.
pub fn compose(first: &[usize], second: &[usize]) -> Vec<usize> {
    second.iter().map(|&s| first[s]).collect()
}

/// The permutation that undoes `perm`.
pub fn inverse(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}
