use num_traits::Float;
use std::ops::AddAssign;

/// Batch-normalization forward over `[batch, features]` input.
///
/// In training mode: per-feature batch mean and variance are computed across
/// the batch axis, `centered = input - mean` and `std = sqrt(var + eps)` are
/// written to the caller's cache buffers, and the running statistics are
/// updated by exponential moving average
/// (`running = (1 - momentum) * running + momentum * batch_stat`).
///
/// In evaluation mode the stored running statistics normalize the batch and
/// are left untouched.
///
/// Finally `output = gamma * centered / std + beta`. The `eps` term keeps
/// the division defined when a feature has zero variance.
#[allow(clippy::too_many_arguments)]
pub fn batchnorm_forward<T>(
    input: &[T],
    gamma: &[T],
    beta: &[T],
    centered: &mut [T],
    std: &mut [T],
    running_mean: &mut [T],
    running_var: &mut [T],
    output: &mut [T],
    batch: usize,
    features: usize,
    eps: T,
    momentum: T,
    training: bool,
) where
    T: Float + AddAssign,
{
    debug_assert_eq!(input.len(), batch * features);
    debug_assert_eq!(centered.len(), batch * features);
    debug_assert_eq!(std.len(), features);
    debug_assert!(batch > 0);

    let n = T::from(batch).unwrap();

    if training {
        for f in 0..features {
            let mut mean = T::zero();
            for b in 0..batch {
                mean += input[b * features + f];
            }
            mean = mean / n;

            let mut var = T::zero();
            for b in 0..batch {
                let c = input[b * features + f] - mean;
                centered[b * features + f] = c;
                var += c * c;
            }
            var = var / n;
            std[f] = (var + eps).sqrt();

            running_mean[f] = (T::one() - momentum) * running_mean[f] + momentum * mean;
            running_var[f] = (T::one() - momentum) * running_var[f] + momentum * var;
        }
    } else {
        for f in 0..features {
            std[f] = (running_var[f] + eps).sqrt();
            for b in 0..batch {
                centered[b * features + f] = input[b * features + f] - running_mean[f];
            }
        }
    }

    for f in 0..features {
        for b in 0..batch {
            let idx = b * features + f;
            output[idx] = gamma[f] * centered[idx] / std[f] + beta[f];
        }
    }
}

/// Batch-normalization input gradient through the mean/variance reductions.
///
/// With `xhat = centered / std` and `dy = dx * gamma`:
/// `grad_input = (dy - mean_b(dy) - xhat * mean_b(dy * xhat)) / std`,
/// the standard chain rule for the normalization over the batch axis.
pub fn batchnorm_backward<T>(
    centered: &[T],
    std: &[T],
    dx: &[T],
    gamma: &[T],
    grad_input: &mut [T],
    batch: usize,
    features: usize,
) where
    T: Float + AddAssign,
{
    debug_assert_eq!(centered.len(), batch * features);
    debug_assert_eq!(dx.len(), batch * features);
    debug_assert_eq!(grad_input.len(), batch * features);
    debug_assert!(batch > 0);

    let n = T::from(batch).unwrap();

    for f in 0..features {
        let mut sum_dy = T::zero();
        let mut sum_dy_xhat = T::zero();
        for b in 0..batch {
            let idx = b * features + f;
            let dy = dx[idx] * gamma[f];
            sum_dy += dy;
            sum_dy_xhat += dy * centered[idx] / std[f];
        }
        for b in 0..batch {
            let idx = b * features + f;
            let dy = dx[idx] * gamma[f];
            let xhat = centered[idx] / std[f];
            grad_input[idx] = (dy - (sum_dy + xhat * sum_dy_xhat) / n) / std[f];
        }
    }
}

/// Parameter gradients: `grad_gamma[f] = sum_b dx[b, f] * xhat[b, f]` and
/// `grad_beta[f] = sum_b dx[b, f]`. Both buffers are overwritten, never
/// accumulated across calls.
pub fn batchnorm_param_gradients<T>(
    centered: &[T],
    std: &[T],
    dx: &[T],
    grad_gamma: &mut [T],
    grad_beta: &mut [T],
    batch: usize,
    features: usize,
) where
    T: Float + AddAssign,
{
    debug_assert_eq!(grad_gamma.len(), features);
    debug_assert_eq!(grad_beta.len(), features);

    for f in 0..features {
        let mut gg = T::zero();
        let mut gb = T::zero();
        for b in 0..batch {
            let idx = b * features + f;
            gg += dx[idx] * centered[idx] / std[f];
            gb += dx[idx];
        }
        grad_gamma[f] = gg;
        grad_beta[f] = gb;
    }
}
