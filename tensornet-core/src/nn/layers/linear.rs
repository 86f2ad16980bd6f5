use crate::error::TensorNetError;
use crate::kernels;
use crate::nn::init;
use crate::nn::layer::{check_no_alias, check_rank2, check_shape, Layer};
use crate::nn::parameter::Parameter;
use crate::tensor::{zeros, Tensor};

/// Applies a linear transformation to the incoming data: `y = x W^t + b`.
///
/// The weight is stored output-major, shape `[out_features, in_features]`,
/// and is Xavier-uniform initialized; the optional bias starts at zero.
#[derive(Debug)]
pub struct Linear {
    in_features: usize,
    out_features: usize,
    weight: Parameter,
    bias: Option<Parameter>,
}

impl Linear {
    /// Creates a new Linear layer.
    ///
    /// # Arguments
    ///
    /// * `in_features` - Size of each input sample.
    /// * `out_features` - Size of each output sample.
    /// * `bias` - If `true`, the layer will learn an additive bias.
    pub fn new(in_features: usize, out_features: usize, bias: bool) -> Result<Self, TensorNetError> {
        if in_features == 0 || out_features == 0 {
            return Err(TensorNetError::ConfigError {
                message: format!(
                    "Linear requires non-zero feature counts, got {}x{}",
                    in_features, out_features
                ),
            });
        }

        let weight_tensor = zeros(&[out_features, in_features])?;
        init::xavier_uniform_(&weight_tensor, in_features, out_features)?;
        let weight = Parameter::new("weight", weight_tensor)?;

        let bias = if bias {
            Some(Parameter::new("bias", zeros(&[out_features])?)?)
        } else {
            None
        };

        Ok(Linear {
            in_features,
            out_features,
            weight,
            bias,
        })
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Validates a `[batch, in_features]` input and returns the batch size.
    fn batch_of(&self, operation: &str, inputs: &Tensor) -> Result<usize, TensorNetError> {
        let (batch, features) = check_rank2(inputs)?;
        if features != self.in_features {
            return Err(TensorNetError::ShapeMismatch {
                expected: vec![batch, self.in_features],
                actual: inputs.shape(),
                operation: operation.to_string(),
            });
        }
        Ok(batch)
    }
}

impl Layer for Linear {
    fn forward(&mut self, inputs: &Tensor, outputs: &Tensor) -> Result<(), TensorNetError> {
        const OP: &str = "Linear::forward";
        check_no_alias(OP, &[inputs, outputs])?;
        let batch = self.batch_of(OP, inputs)?;
        check_shape(OP, outputs, &[batch, self.out_features])?;

        let input_guard = inputs.read_data();
        let mut output_guard = outputs.write_data();
        let x = input_guard.as_slice(OP)?;
        let out = output_guard.as_mut_slice(OP)?;

        {
            let weight_guard = self.weight.value().read_data();
            kernels::linear_forward(
                x,
                weight_guard.as_slice(OP)?,
                out,
                batch,
                self.in_features,
                self.out_features,
            );
        }
        if let Some(bias) = &self.bias {
            let bias_guard = bias.value().read_data();
            kernels::linear_add_bias(bias_guard.as_slice(OP)?, out, batch, self.out_features);
        }
        Ok(())
    }

    fn backward(
        &mut self,
        inputs: &Tensor,
        outputs: &Tensor,
        grad_outputs: &Tensor,
        grad_inputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        const OP: &str = "Linear::backward";
        check_no_alias(OP, &[inputs, outputs, grad_outputs, grad_inputs])?;
        let batch = self.batch_of(OP, inputs)?;
        check_shape(OP, outputs, &[batch, self.out_features])?;
        check_shape(OP, grad_outputs, &[batch, self.out_features])?;
        check_shape(OP, grad_inputs, &[batch, self.in_features])?;

        // grad_input[b, i] = sum_o dx[b, o] * w[o, i] == dx @ w
        let dx_guard = grad_outputs.read_data();
        let weight_guard = self.weight.value().read_data();
        let mut grad_guard = grad_inputs.write_data();
        kernels::multiply(
            dx_guard.as_slice(OP)?,
            weight_guard.as_slice(OP)?,
            grad_guard.as_mut_slice(OP)?,
            batch,
            self.out_features,
            self.in_features,
        );
        Ok(())
    }

    fn update_gradients(
        &mut self,
        inputs: &Tensor,
        grad_outputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        const OP: &str = "Linear::update_gradients";
        check_no_alias(OP, &[inputs, grad_outputs])?;
        let batch = self.batch_of(OP, inputs)?;
        check_shape(OP, grad_outputs, &[batch, self.out_features])?;

        let input_guard = inputs.read_data();
        let dx_guard = grad_outputs.read_data();
        let x = input_guard.as_slice(OP)?;
        let dx = dx_guard.as_slice(OP)?;

        // dw[o, i] = sum_b dx[b, o] * x[b, i] == dx^t @ x, overwriting the
        // previous gradient.
        let dx_t = kernels::transpose(dx, batch, self.out_features);
        {
            let mut dw_guard = self.weight.grad().write_data();
            kernels::multiply(
                &dx_t,
                x,
                dw_guard.as_mut_slice(OP)?,
                self.out_features,
                batch,
                self.in_features,
            );
        }
        if let Some(bias) = &self.bias {
            let mut db_guard = bias.grad().write_data();
            kernels::linear_bias_backward(dx, db_guard.as_mut_slice(OP)?, batch, self.out_features);
        }
        Ok(())
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = vec![&self.weight];
        if let Some(bias) = &self.bias {
            params.push(bias);
        }
        params
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, TensorNetError> {
        if input_shape.len() != 2 {
            return Err(TensorNetError::DimensionMismatch {
                expected: 2,
                actual: input_shape.len(),
            });
        }
        if input_shape[1] != self.in_features {
            return Err(TensorNetError::ShapeMismatch {
                expected: vec![input_shape[0], self.in_features],
                actual: input_shape.to_vec(),
                operation: "Linear::output_shape".to_string(),
            });
        }
        Ok(vec![input_shape[0], self.out_features])
    }
}

// --- Tests ---
#[cfg(test)]
#[path = "linear_test.rs"]
mod tests; // Link to the test file
