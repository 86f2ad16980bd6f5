use crate::error::TensorNetError;
use crate::tensor::Tensor;
use rand::distributions::{Distribution, Uniform};
use rand_distr::Normal;

/// Fills the input `Tensor` with the scalar value 0. Operates in-place.
pub fn zeros_(tensor: &Tensor) -> Result<(), TensorNetError> {
    fill_(tensor, 0.0)
}

/// Fills the input `Tensor` with the scalar value 1. Operates in-place.
pub fn ones_(tensor: &Tensor) -> Result<(), TensorNetError> {
    fill_(tensor, 1.0)
}

/// Fills the input `Tensor` with a scalar value, in place.
///
/// # Errors
/// Returns `TensorNetError::UnallocatedTensor` if the tensor has no buffer.
pub fn fill_(tensor: &Tensor, value: f32) -> Result<(), TensorNetError> {
    let mut guard = tensor.write_data();
    guard.as_mut_slice("fill_")?.fill(value);
    Ok(())
}

/// Fills the tensor with samples from the uniform distribution on
/// `[low, high)`.
pub fn uniform_(tensor: &Tensor, low: f32, high: f32) -> Result<(), TensorNetError> {
    if low >= high {
        return Err(TensorNetError::ConfigError {
            message: format!("uniform_ requires low < high, got [{}, {})", low, high),
        });
    }
    let between = Uniform::new(low, high);
    let mut rng = rand::thread_rng();
    let mut guard = tensor.write_data();
    for value in guard.as_mut_slice("uniform_")?.iter_mut() {
        *value = between.sample(&mut rng);
    }
    Ok(())
}

/// Fills the tensor with samples from a normal distribution.
pub fn normal_(tensor: &Tensor, mean: f32, std: f32) -> Result<(), TensorNetError> {
    let dist = Normal::new(mean, std).map_err(|err| TensorNetError::ConfigError {
        message: format!("normal_ with mean {} std {}: {}", mean, std, err),
    })?;
    let mut rng = rand::thread_rng();
    let mut guard = tensor.write_data();
    for value in guard.as_mut_slice("normal_")?.iter_mut() {
        *value = dist.sample(&mut rng);
    }
    Ok(())
}

/// Xavier/Glorot uniform initialization: samples from
/// `U(-b, b)` with `b = sqrt(6 / (fan_in + fan_out))`.
pub fn xavier_uniform_(tensor: &Tensor, fan_in: usize, fan_out: usize) -> Result<(), TensorNetError> {
    if fan_in + fan_out == 0 {
        return Err(TensorNetError::ConfigError {
            message: "xavier_uniform_ requires a non-zero fan".to_string(),
        });
    }
    let bound = (6.0 / (fan_in + fan_out) as f32).sqrt();
    uniform_(tensor, -bound, bound)
}

// --- Tests ---
#[cfg(test)]
#[path = "init_test.rs"]
mod tests; // Link to the test file
