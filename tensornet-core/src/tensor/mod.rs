// src/tensor/mod.rs

use crate::error::TensorNetError;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

pub mod create; // Make the create module public
mod debug;
pub mod utils; // Declare public utils

// Re-export creation functions to make them public
pub use create::{from_vec, full, ones, zeros, zeros_like};

/// A multi-dimensional array with row-major strides and shared storage.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** cloning (or assigning) a `Tensor` aliases the
///     same underlying storage instead of deep-copying it, so handles can be
///     passed between layers cheaply. Mutations through one handle are
///     visible through every alias. Use [`Tensor::copy_to`] when independent
///     storage is required.
/// 2.  **Interior Mutability:** element data can be written through a shared
///     handle, which is how layers fill caller-allocated output tensors.
///
/// Storage is released when the last handle referencing it is dropped.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a tensor with a zero-initialized buffer sized to `shape`.
    ///
    /// # Errors
    /// Returns `TensorNetError::InvalidShape` if any extent is negative;
    /// nothing is allocated in that case.
    pub fn new(shape: &[i64]) -> Result<Self, TensorNetError> {
        let tensor_data = TensorData::new(shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Allocates storage for a default-constructed tensor.
    ///
    /// # Errors
    /// - `TensorNetError::AlreadyAllocated` if this tensor already owns a
    ///   buffer (re-allocation would silently orphan aliased storage).
    /// - `TensorNetError::InvalidShape` if any extent is negative.
    pub fn allocate(&self, shape: &[i64]) -> Result<(), TensorNetError> {
        self.write_data().allocate(shape)
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Returns the number of elements, 0 if unallocated.
    pub fn total(&self) -> usize {
        self.read_data().numel()
    }

    /// True when the tensor holds no elements (default-constructed or a
    /// zero-extent shape).
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn is_allocated(&self) -> bool {
        self.read_data().is_allocated()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// True when both handles reference the same storage object.
    pub fn ptr_eq(a: &Tensor, b: &Tensor) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// The guard exposes the element buffer via `as_slice`. The lock is
    /// released when the guard goes out of scope. Panics if the RwLock is
    /// poisoned.
    pub fn read_data(&self) -> std::sync::RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    pub fn write_data(&self) -> std::sync::RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Returns a copy of the element data as a `Vec<f32>`.
    ///
    /// # Errors
    /// `TensorNetError::UnallocatedTensor` if no buffer is allocated.
    pub fn get_data(&self) -> Result<Vec<f32>, TensorNetError> {
        Ok(self.read_data().as_slice("get_data")?.to_vec())
    }

    /// Element-wise deep copy of this tensor's storage into `dst`'s existing
    /// storage.
    ///
    /// `dst` must already be allocated with the same shape and strides; a
    /// copy never re-layouts and never allocates. Copying a tensor into
    /// itself is a no-op success only while both are the same unallocated
    /// handle — on an allocated tensor it fails instead of risking
    /// self-aliased corruption.
    ///
    /// # Errors
    /// - `TensorNetError::SelfCopy` for an allocated self-copy.
    /// - `TensorNetError::UnallocatedTensor` if `dst` (or the source) has no
    ///   buffer.
    /// - `TensorNetError::CopyLayoutMismatch` if shapes or strides differ.
    pub fn copy_to(&self, dst: &Tensor) -> Result<(), TensorNetError> {
        if Tensor::ptr_eq(self, dst) {
            if self.is_allocated() {
                return Err(TensorNetError::SelfCopy);
            }
            return Ok(());
        }

        let src_guard = self.read_data();
        let mut dst_guard = dst.write_data();

        if !dst_guard.is_allocated() {
            return Err(TensorNetError::UnallocatedTensor {
                operation: "copy_to (destination)".to_string(),
            });
        }
        let src_slice = src_guard.as_slice("copy_to (source)")?;
        if src_guard.shape != dst_guard.shape || src_guard.strides != dst_guard.strides {
            return Err(TensorNetError::CopyLayoutMismatch {
                src_shape: src_guard.shape.clone(),
                src_strides: src_guard.strides.clone(),
                dst_shape: dst_guard.shape.clone(),
                dst_strides: dst_guard.strides.clone(),
            });
        }

        dst_guard.as_mut_slice("copy_to")?.copy_from_slice(src_slice);
        Ok(())
    }
}

/// A default-constructed tensor has an empty shape, empty strides and no
/// buffer; `total()` reports 0 rather than failing.
impl Default for Tensor {
    fn default() -> Self {
        Tensor {
            data: Arc::new(RwLock::new(TensorData::unallocated())),
        }
    }
}

/// Cloning aliases storage (shared-ownership semantics), it does not deep
/// copy. Use [`Tensor::copy_to`] for an element-wise copy.
impl Clone for Tensor {
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}
