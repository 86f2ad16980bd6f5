use crate::error::TensorNetError;
use crate::kernels;
use crate::nn::layer::{check_no_alias, check_rank2, check_shape, Layer};
use crate::tensor::Tensor;

/// Row-wise softmax over the last axis of a `[batch, features]` input.
///
/// Parameter-free; the backward Jacobian-vector product reads the forward
/// `outputs` tensor the caller passes back in.
#[derive(Debug, Default)]
pub struct Softmax;

impl Softmax {
    pub fn new() -> Self {
        Softmax
    }
}

impl Layer for Softmax {
    fn forward(&mut self, inputs: &Tensor, outputs: &Tensor) -> Result<(), TensorNetError> {
        const OP: &str = "Softmax::forward";
        check_no_alias(OP, &[inputs, outputs])?;
        let (batch, features) = check_rank2(inputs)?;
        check_shape(OP, outputs, &[batch, features])?;

        let input_guard = inputs.read_data();
        let mut output_guard = outputs.write_data();
        kernels::softmax_forward(
            input_guard.as_slice(OP)?,
            output_guard.as_mut_slice(OP)?,
            batch,
            features,
        );
        Ok(())
    }

    fn backward(
        &mut self,
        inputs: &Tensor,
        outputs: &Tensor,
        grad_outputs: &Tensor,
        grad_inputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        const OP: &str = "Softmax::backward";
        check_no_alias(OP, &[inputs, outputs, grad_outputs, grad_inputs])?;
        let (batch, features) = check_rank2(inputs)?;
        check_shape(OP, outputs, &[batch, features])?;
        check_shape(OP, grad_outputs, &[batch, features])?;
        check_shape(OP, grad_inputs, &[batch, features])?;

        let dx_guard = grad_outputs.read_data();
        let output_guard = outputs.read_data();
        let mut grad_guard = grad_inputs.write_data();
        kernels::softmax_backward(
            dx_guard.as_slice(OP)?,
            output_guard.as_slice(OP)?,
            grad_guard.as_mut_slice(OP)?,
            batch,
            features,
        );
        Ok(())
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, TensorNetError> {
        if input_shape.len() != 2 {
            return Err(TensorNetError::DimensionMismatch {
                expected: 2,
                actual: input_shape.len(),
            });
        }
        Ok(input_shape.to_vec())
    }
}
