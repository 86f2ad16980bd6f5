use crate::error::TensorNetError;
use crate::kernels;
use crate::nn::layer::{check_no_alias, check_rank2, check_shape, Layer};
use crate::nn::parameter::Parameter;
use crate::tensor::{ones, zeros, Tensor};

/// Batch normalization over a `[batch, features]` input.
///
/// Learnable scale `gamma` (ones-initialized) and shift `beta`
/// (zeros-initialized); non-learnable running mean/variance maintained by
/// exponential moving average during training for use at evaluation time.
///
/// Each `forward` call overwrites the cached `input_centered` / `std`
/// tensors; the immediately following `backward` / `update_gradients`
/// consume them and validate that the batch shape still matches the cache,
/// so calling out of order fails instead of producing silent wrong
/// gradients.
#[derive(Debug)]
pub struct BatchNorm1d {
    features: usize,
    eps: f32,
    momentum: f32,
    training: bool,
    gamma: Parameter,
    beta: Parameter,
    running_mean: Tensor,
    running_var: Tensor,
    input_centered: Tensor,
    std: Tensor,
}

impl BatchNorm1d {
    /// Creates a new BatchNorm1d layer for `features`-wide inputs.
    ///
    /// `eps` is the variance-stabilizing constant added before the square
    /// root; `momentum` weights the batch statistic in the running-average
    /// update and must lie in `[0, 1]`.
    pub fn new(features: usize, eps: f32, momentum: f32) -> Result<Self, TensorNetError> {
        if features == 0 {
            return Err(TensorNetError::ConfigError {
                message: "BatchNorm1d requires a non-zero feature count".to_string(),
            });
        }
        if eps <= 0.0 {
            return Err(TensorNetError::ConfigError {
                message: format!("BatchNorm1d eps must be positive, got {}", eps),
            });
        }
        if !(0.0..=1.0).contains(&momentum) {
            return Err(TensorNetError::ConfigError {
                message: format!("BatchNorm1d momentum must be in [0, 1], got {}", momentum),
            });
        }

        Ok(BatchNorm1d {
            features,
            eps,
            momentum,
            training: true,
            gamma: Parameter::new("gamma", ones(&[features])?)?,
            beta: Parameter::new("beta", zeros(&[features])?)?,
            running_mean: zeros(&[features])?,
            running_var: ones(&[features])?,
            input_centered: Tensor::default(),
            std: zeros(&[features])?,
        })
    }

    pub fn features(&self) -> usize {
        self.features
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Running statistics maintained across training-mode forward calls.
    pub fn running_mean(&self) -> &Tensor {
        &self.running_mean
    }

    pub fn running_var(&self) -> &Tensor {
        &self.running_var
    }

    /// Validates a `[batch, features]` input and returns the batch size.
    fn batch_of(&self, operation: &str, inputs: &Tensor) -> Result<usize, TensorNetError> {
        let (batch, features) = check_rank2(inputs)?;
        if features != self.features {
            return Err(TensorNetError::ShapeMismatch {
                expected: vec![batch, self.features],
                actual: inputs.shape(),
                operation: operation.to_string(),
            });
        }
        Ok(batch)
    }

    /// The cache written by `forward` must cover the same batch shape
    /// before `backward` / `update_gradients` may consume it.
    fn check_cache(&self, operation: &str, batch: usize) -> Result<(), TensorNetError> {
        check_shape(operation, &self.input_centered, &[batch, self.features])
    }
}

impl Layer for BatchNorm1d {
    fn forward(&mut self, inputs: &Tensor, outputs: &Tensor) -> Result<(), TensorNetError> {
        const OP: &str = "BatchNorm1d::forward";
        check_no_alias(OP, &[inputs, outputs])?;
        let batch = self.batch_of(OP, inputs)?;
        check_shape(OP, outputs, &[batch, self.features])?;

        // The cache follows the batch shape; a new batch size replaces it.
        if self.input_centered.shape() != [batch, self.features] {
            self.input_centered = zeros(&[batch, self.features])?;
        }

        let input_guard = inputs.read_data();
        let gamma_guard = self.gamma.value().read_data();
        let beta_guard = self.beta.value().read_data();
        let mut centered_guard = self.input_centered.write_data();
        let mut std_guard = self.std.write_data();
        let mut mean_guard = self.running_mean.write_data();
        let mut var_guard = self.running_var.write_data();
        let mut output_guard = outputs.write_data();

        kernels::batchnorm_forward(
            input_guard.as_slice(OP)?,
            gamma_guard.as_slice(OP)?,
            beta_guard.as_slice(OP)?,
            centered_guard.as_mut_slice(OP)?,
            std_guard.as_mut_slice(OP)?,
            mean_guard.as_mut_slice(OP)?,
            var_guard.as_mut_slice(OP)?,
            output_guard.as_mut_slice(OP)?,
            batch,
            self.features,
            self.eps,
            self.momentum,
            self.training,
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
        const OP: &str = "BatchNorm1d::backward";
        check_no_alias(OP, &[inputs, outputs, grad_outputs, grad_inputs])?;
        let batch = self.batch_of(OP, inputs)?;
        check_shape(OP, outputs, &[batch, self.features])?;
        check_shape(OP, grad_outputs, &[batch, self.features])?;
        check_shape(OP, grad_inputs, &[batch, self.features])?;
        self.check_cache(OP, batch)?;

        let centered_guard = self.input_centered.read_data();
        let std_guard = self.std.read_data();
        let dx_guard = grad_outputs.read_data();
        let gamma_guard = self.gamma.value().read_data();
        let mut grad_guard = grad_inputs.write_data();

        kernels::batchnorm_backward(
            centered_guard.as_slice(OP)?,
            std_guard.as_slice(OP)?,
            dx_guard.as_slice(OP)?,
            gamma_guard.as_slice(OP)?,
            grad_guard.as_mut_slice(OP)?,
            batch,
            self.features,
        );
        Ok(())
    }

    fn update_gradients(
        &mut self,
        inputs: &Tensor,
        grad_outputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        const OP: &str = "BatchNorm1d::update_gradients";
        check_no_alias(OP, &[inputs, grad_outputs])?;
        let batch = self.batch_of(OP, inputs)?;
        check_shape(OP, grad_outputs, &[batch, self.features])?;
        self.check_cache(OP, batch)?;

        let centered_guard = self.input_centered.read_data();
        let std_guard = self.std.read_data();
        let dx_guard = grad_outputs.read_data();
        let mut gamma_grad_guard = self.gamma.grad().write_data();
        let mut beta_grad_guard = self.beta.grad().write_data();

        kernels::batchnorm_param_gradients(
            centered_guard.as_slice(OP)?,
            std_guard.as_slice(OP)?,
            dx_guard.as_slice(OP)?,
            gamma_grad_guard.as_mut_slice(OP)?,
            beta_grad_guard.as_mut_slice(OP)?,
            batch,
            self.features,
        );
        Ok(())
    }

    fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.gamma, &self.beta]
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, TensorNetError> {
        if input_shape.len() != 2 {
            return Err(TensorNetError::DimensionMismatch {
                expected: 2,
                actual: input_shape.len(),
            });
        }
        if input_shape[1] != self.features {
            return Err(TensorNetError::ShapeMismatch {
                expected: vec![input_shape[0], self.features],
                actual: input_shape.to_vec(),
                operation: "BatchNorm1d::output_shape".to_string(),
            });
        }
        Ok(input_shape.to_vec())
    }

    fn set_training(&mut self, training: bool) {
        if self.training != training {
            log::debug!(
                "BatchNorm1d({}) switching to {} mode",
                self.features,
                if training { "training" } else { "evaluation" }
            );
        }
        self.training = training;
    }
}

// --- Tests ---
#[cfg(test)]
#[path = "batchnorm_test.rs"]
mod tests; // Link to the test file
