use thiserror::Error;

/// Custom error type for the TensorNet framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum TensorNetError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Dimension mismatch: expected rank {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid shape {shape:?}: extents must be non-negative")]
    InvalidShape { shape: Vec<i64> },

    #[error("Tensor already allocated with shape {shape:?}, cannot allocate twice")]
    AlreadyAllocated { shape: Vec<usize> },

    #[error("Operation {operation} requires an allocated tensor")]
    UnallocatedTensor { operation: String },

    #[error("Cannot copy between layouts: source shape {src_shape:?} strides {src_strides:?}, destination shape {dst_shape:?} strides {dst_strides:?}")]
    CopyLayoutMismatch {
        src_shape: Vec<usize>,
        src_strides: Vec<usize>,
        dst_shape: Vec<usize>,
        dst_strides: Vec<usize>,
    },

    #[error("Tensor cannot copy into itself")]
    SelfCopy,

    #[error("Operation {operation} requires tensors with distinct storage")]
    AliasedTensors { operation: String },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Invalid layer configuration: {message}")]
    ConfigError { message: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}
