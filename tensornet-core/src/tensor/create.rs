// src/tensor/create.rs

use crate::error::TensorNetError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Total element count for a shape; an empty shape denotes total 0.
fn numel_of(shape: &[usize]) -> usize {
    if shape.is_empty() {
        return 0;
    }
    shape.iter().product()
}

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, TensorNetError> {
    let data_vec: Vec<f32> = vec![0.0; numel_of(shape)];
    from_vec(data_vec, shape.to_vec())
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, TensorNetError> {
    let data_vec: Vec<f32> = vec![1.0; numel_of(shape)];
    from_vec(data_vec, shape.to_vec())
}

/// Creates a new tensor filled with a specific value with the specified shape.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, TensorNetError> {
    let data_vec: Vec<f32> = vec![value; numel_of(shape)];
    from_vec(data_vec, shape.to_vec())
}

/// Creates a new tensor from a data vector in flattened, row-major order.
///
/// # Errors
/// Returns `TensorNetError::TensorCreationError` if the data length does not
/// match the total number of elements of `shape`.
pub fn from_vec(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Tensor, TensorNetError> {
    let tensor_data = TensorData::from_vec(data_vec, shape)?;
    Ok(Tensor {
        data: Arc::new(RwLock::new(tensor_data)),
    })
}

/// Creates a new zero-filled tensor with the same shape as the input tensor.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, TensorNetError> {
    zeros(&tensor.shape())
}
