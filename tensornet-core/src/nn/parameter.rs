use crate::error::TensorNetError;
use crate::tensor::{zeros_like, Tensor};
use std::fmt;

/// A learnable tensor owned by a layer, paired with the gradient tensor
/// that `update_gradients` fills and the external optimizer consumes.
///
/// Both tensors live for the whole layer lifetime; the optimizer mutates
/// the value in place through the shared-storage handle between training
/// steps.
pub struct Parameter {
    name: String,
    value: Tensor,
    grad: Tensor,
}

impl Parameter {
    /// Wraps an allocated value tensor, creating a zero gradient tensor of
    /// the same shape.
    pub fn new(name: &str, value: Tensor) -> Result<Self, TensorNetError> {
        let grad = zeros_like(&value)?;
        Ok(Parameter {
            name: name.to_string(),
            value,
            grad,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    pub fn grad(&self) -> &Tensor {
        &self.grad
    }

    pub fn shape(&self) -> Vec<usize> {
        self.value.shape()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({}, shape={:?})", self.name, self.value.shape())
    }
}
