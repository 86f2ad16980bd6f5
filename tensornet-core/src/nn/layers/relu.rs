use crate::error::TensorNetError;
use crate::kernels;
use crate::nn::layer::{check_no_alias, check_shape, Layer};
use crate::tensor::Tensor;

/// Elementwise rectified-linear activation: `out = max(0, in)`.
///
/// No learnable parameters and no cached state; the backward derivative
/// only needs the forward `outputs` tensor the caller passes back in.
#[derive(Debug, Default)]
pub struct ReLU;

impl ReLU {
    pub fn new() -> Self {
        ReLU
    }

    /// Inputs of any non-empty shape are accepted; the output must match.
    fn validate(
        operation: &str,
        inputs: &Tensor,
        outputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        if !inputs.is_allocated() {
            return Err(TensorNetError::UnallocatedTensor {
                operation: operation.to_string(),
            });
        }
        check_shape(operation, outputs, &inputs.shape())
    }
}

impl Layer for ReLU {
    fn forward(&mut self, inputs: &Tensor, outputs: &Tensor) -> Result<(), TensorNetError> {
        const OP: &str = "ReLU::forward";
        check_no_alias(OP, &[inputs, outputs])?;
        ReLU::validate(OP, inputs, outputs)?;

        let input_guard = inputs.read_data();
        let mut output_guard = outputs.write_data();
        kernels::relu_forward(input_guard.as_slice(OP)?, output_guard.as_mut_slice(OP)?);
        Ok(())
    }

    fn backward(
        &mut self,
        inputs: &Tensor,
        outputs: &Tensor,
        grad_outputs: &Tensor,
        grad_inputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        const OP: &str = "ReLU::backward";
        check_no_alias(OP, &[inputs, outputs, grad_outputs, grad_inputs])?;
        ReLU::validate(OP, inputs, outputs)?;
        check_shape(OP, grad_outputs, &inputs.shape())?;
        check_shape(OP, grad_inputs, &inputs.shape())?;

        let output_guard = outputs.read_data();
        let dx_guard = grad_outputs.read_data();
        let mut grad_guard = grad_inputs.write_data();
        kernels::relu_backward(
            dx_guard.as_slice(OP)?,
            output_guard.as_slice(OP)?,
            grad_guard.as_mut_slice(OP)?,
        );
        Ok(())
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, TensorNetError> {
        if input_shape.is_empty() {
            return Err(TensorNetError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(input_shape.to_vec())
    }
}
