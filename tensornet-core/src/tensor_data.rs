use crate::buffer::Buffer;
use crate::error::TensorNetError;
use crate::tensor::utils::{calculate_strides, validate_extents};

/// Internal storage and metadata for a Tensor.
///
/// Holds the data buffer, shape and strides. It is wrapped in
/// `Arc<RwLock<TensorData>>` by the `Tensor` struct so that handle
/// assignment aliases the storage instead of deep-copying it.
#[derive(Debug)]
pub struct TensorData {
    /// The underlying contiguous buffer. `None` until `allocate` runs.
    pub(crate) buffer: Option<Buffer>,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
    /// The strides for each dimension, row-major: the last dimension has
    /// stride 1 and each preceding stride is the product of the extents to
    /// its right.
    pub(crate) strides: Vec<usize>,
}

impl TensorData {
    /// Creates unallocated tensor data: empty shape, empty strides, no buffer.
    pub fn unallocated() -> Self {
        TensorData {
            buffer: None,
            shape: Vec::new(),
            strides: Vec::new(),
        }
    }

    /// Creates tensor data with a zero-initialized buffer sized to `shape`.
    ///
    /// # Errors
    /// Returns `TensorNetError::InvalidShape` if any extent is negative.
    /// An empty shape produces unallocated data (total 0, no buffer).
    pub fn new(shape: &[i64]) -> Result<Self, TensorNetError> {
        let mut data = TensorData::unallocated();
        data.allocate(shape)?;
        Ok(data)
    }

    /// Creates tensor data that takes ownership of `data_vec` as its buffer.
    ///
    /// # Errors
    /// Returns `TensorNetError::TensorCreationError` if the length of
    /// `data_vec` does not match the total number of elements of `shape`.
    pub fn from_vec(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, TensorNetError> {
        let data_len = data_vec.len();
        // An empty shape denotes total 0, not the empty product.
        if shape.is_empty() {
            if data_len != 0 {
                return Err(TensorNetError::TensorCreationError { data_len, shape });
            }
            return Ok(TensorData::unallocated());
        }
        let numel: usize = shape.iter().product();
        if data_len != numel {
            return Err(TensorNetError::TensorCreationError { data_len, shape });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            buffer: Some(Buffer::from_vec(data_vec)),
            shape,
            strides,
        })
    }

    /// Allocates the buffer for `shape`.
    ///
    /// # Errors
    /// - `TensorNetError::InvalidShape` if any extent is negative (nothing
    ///   is allocated in that case).
    /// - `TensorNetError::AlreadyAllocated` if a buffer already exists;
    ///   re-allocation is forbidden to keep allocation a one-shot, checked
    ///   state transition.
    pub fn allocate(&mut self, shape: &[i64]) -> Result<(), TensorNetError> {
        let extents = validate_extents(shape)?;
        if self.buffer.is_some() {
            return Err(TensorNetError::AlreadyAllocated {
                shape: self.shape.clone(),
            });
        }
        // An empty shape stays unallocated: total is 0 by contract.
        if extents.is_empty() {
            return Ok(());
        }
        let total: usize = extents.iter().product();
        self.strides = calculate_strides(&extents);
        self.shape = extents;
        self.buffer = Some(Buffer::zeroed(total));
        Ok(())
    }

    /// Number of elements: the product of the shape extents, or 0 when no
    /// buffer has been allocated.
    pub fn numel(&self) -> usize {
        if self.buffer.is_none() {
            return 0;
        }
        self.shape.iter().product()
    }

    pub fn is_allocated(&self) -> bool {
        self.buffer.is_some()
    }

    /// Immutable view of the element buffer.
    ///
    /// # Errors
    /// `TensorNetError::UnallocatedTensor` if no buffer has been allocated;
    /// `operation` names the caller for the error message.
    pub fn as_slice(&self, operation: &str) -> Result<&[f32], TensorNetError> {
        self.buffer
            .as_ref()
            .map(Buffer::as_slice)
            .ok_or_else(|| TensorNetError::UnallocatedTensor {
                operation: operation.to_string(),
            })
    }

    /// Mutable view of the element buffer.
    pub fn as_mut_slice(&mut self, operation: &str) -> Result<&mut [f32], TensorNetError> {
        self.buffer
            .as_mut()
            .map(Buffer::as_mut_slice)
            .ok_or_else(|| TensorNetError::UnallocatedTensor {
                operation: operation.to_string(),
            })
    }
}
