use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::dtype::{DType, Element};

/// Reference-counted backing buffer.
///
/// Cloning a `Storage` yields another handle to the same buffer; this is how
/// views alias their source. Use [`Storage::deep_copy`] for an independent
/// buffer. Handles are neither `Send` nor `Sync`: an aliasing group must stay
/// on one thread.
#[derive(Debug)]
pub struct Storage<T: Element> {
    data: Rc<RefCell<Vec<T>>>,
}

impl<T: Element> Storage<T> {
    /// Wrap an owned vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        Storage {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Zero-filled storage of `n` elements.
    pub fn zeros(n: usize) -> Self {
        Self::from_vec(vec![T::default(); n])
    }

    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Borrow the whole buffer.
    ///
    /// # Panics
    /// Panics if the buffer is currently borrowed mutably.
    pub fn read(&self) -> Ref<'_, [T]> {
        Ref::map(self.data.borrow(), |v| v.as_slice())
    }

    /// Borrow the whole buffer mutably.
    ///
    /// # Panics
    /// Panics if the buffer is currently borrowed.
    pub fn write(&self) -> RefMut<'_, [T]> {
        RefMut::map(self.data.borrow_mut(), |v| v.as_mut_slice())
    }

    /// A new, unaliased buffer with the same contents.
    pub fn deep_copy(&self) -> Self {
        Self::from_vec(self.data.borrow().clone())
    }

    /// True if both handles point at the same buffer.
    pub fn ptr_eq(&self, other: &Storage<T>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl<T: Element> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Storage {
            data: Rc::clone(&self.data),
        }
    }
}
