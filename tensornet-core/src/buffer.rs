use std::fmt;

/// Contiguous f32 storage backing a tensor.
///
/// A `Buffer` is created exactly once per tensor allocation and lives inside
/// `TensorData`; handles sharing the same `TensorData` share this buffer.
/// Dropping the last handle releases the buffer (no manual free step).
pub struct Buffer(Vec<f32>);

impl Buffer {
    /// Creates a zero-initialized buffer of `len` elements.
    pub fn zeroed(len: usize) -> Self {
        Buffer(vec![0.0; len])
    }

    /// Wraps an existing data vector.
    pub fn from_vec(data: Vec<f32>) -> Self {
        Buffer(data)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }
}

// Large buffers make derived Debug output unusable; print only the length.
impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer(len={})", self.0.len())
    }
}
