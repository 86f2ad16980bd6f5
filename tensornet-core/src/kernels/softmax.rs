use num_traits::Float;
use std::ops::AddAssign;

/// Row-wise softmax over the last axis, numerically stable: the row maximum
/// is subtracted before exponentiating so all-large and all-equal rows stay
/// finite.
///
/// `x, out: [batch, features]`.
pub fn softmax_forward<T>(x: &[T], out: &mut [T], batch: usize, features: usize)
where
    T: Float + AddAssign,
{
    debug_assert_eq!(x.len(), batch * features);
    debug_assert_eq!(out.len(), batch * features);
    if features == 0 {
        return;
    }

    for b in 0..batch {
        let row = &x[b * features..(b + 1) * features];
        let out_row = &mut out[b * features..(b + 1) * features];

        let max = row.iter().fold(T::neg_infinity(), |m, &v| m.max(v));
        let mut sum = T::zero();
        for (o, &v) in out_row.iter_mut().zip(row.iter()) {
            let e = (v - max).exp();
            *o = e;
            sum += e;
        }
        for o in out_row.iter_mut() {
            *o = *o / sum;
        }
    }
}

/// Softmax backward: the Jacobian-vector product of the softmax Jacobian,
/// per row: `grad_input[j] = output[j] * (dx[j] - sum_k dx[k] * output[k])`.
pub fn softmax_backward<T>(dx: &[T], output: &[T], grad_input: &mut [T], batch: usize, features: usize)
where
    T: Float + AddAssign,
{
    debug_assert_eq!(dx.len(), batch * features);
    debug_assert_eq!(output.len(), batch * features);
    debug_assert_eq!(grad_input.len(), batch * features);

    for b in 0..batch {
        let dx_row = &dx[b * features..(b + 1) * features];
        let out_row = &output[b * features..(b + 1) * features];
        let grad_row = &mut grad_input[b * features..(b + 1) * features];

        let mut dot = T::zero();
        for k in 0..features {
            dot += dx_row[k] * out_row[k];
        }
        for j in 0..features {
            grad_row[j] = out_row[j] * (dx_row[j] - dot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_forward_row() {
        let x = [1.0_f32, 2.0, 3.0];
        let mut out = [0.0_f32; 3];
        softmax_forward(&x, &mut out, 1, 3);

        let sum: f32 = out.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        // The largest input keeps the largest probability.
        assert!(out[2] > out[1] && out[1] > out[0]);
        assert_relative_eq!(out[2], 0.66524096, epsilon = 1e-5);
    }

    #[test]
    fn test_softmax_forward_all_zero_row() {
        let x = [0.0_f32; 4];
        let mut out = [0.0_f32; 4];
        softmax_forward(&x, &mut out, 1, 4);
        for &v in &out {
            assert!(v.is_finite());
            assert_relative_eq!(v, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_softmax_forward_large_inputs_stay_finite() {
        let x = [1000.0_f32, 1000.0, 999.0];
        let mut out = [0.0_f32; 3];
        softmax_forward(&x, &mut out, 1, 3);
        assert!(out.iter().all(|v| v.is_finite()));
        assert_relative_eq!(out.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_backward_analytic() {
        // For s = softmax(x), J[j][k] = s[j] * (delta_jk - s[k]).
        // The kernel must reproduce J^t @ dx.
        let x = [0.5_f32, -0.5, 1.5];
        let mut s = [0.0_f32; 3];
        softmax_forward(&x, &mut s, 1, 3);

        let dx = [1.0_f32, 0.0, 0.0];
        let mut grad = [0.0_f32; 3];
        softmax_backward(&dx, &s, &mut grad, 1, 3);

        for j in 0..3 {
            let delta = if j == 0 { 1.0 } else { 0.0 };
            let expected = s[j] * (delta - s[0]);
            assert_relative_eq!(grad[j], expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_softmax_backward_multiple_rows() {
        let x = [1.0_f32, 2.0, 2.0, 1.0];
        let mut s = [0.0_f32; 4];
        softmax_forward(&x, &mut s, 2, 2);

        let dx = [0.3_f32, -0.7, 0.1, 0.9];
        let mut grad = [0.0_f32; 4];
        softmax_backward(&dx, &s, &mut grad, 2, 2);

        for b in 0..2 {
            let dot: f32 = (0..2).map(|k| dx[b * 2 + k] * s[b * 2 + k]).sum();
            for j in 0..2 {
                assert_relative_eq!(grad[b * 2 + j], s[b * 2 + j] * (dx[b * 2 + j] - dot), epsilon = 1e-6);
            }
        }
    }
}
