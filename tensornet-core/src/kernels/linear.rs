use crate::kernels::linalg::{multiply, transpose};
use num_traits::Float;
use std::ops::AddAssign;

/// Fully-connected forward: `out[b, o] = sum_i x[b, i] * w[o, i]`.
///
/// `x: [batch, in_f]`, weight `w: [out_f, in_f]` (output-major),
/// `out: [batch, out_f]`. Computed as `x @ w^t`.
pub fn linear_forward<T>(x: &[T], w: &[T], out: &mut [T], batch: usize, in_f: usize, out_f: usize)
where
    T: Float + AddAssign,
{
    let w_t = transpose(w, out_f, in_f);
    multiply(x, &w_t, out, batch, in_f, out_f);
}

/// Adds the bias row to every batch row: `out[b, o] += bias[o]`.
pub fn linear_add_bias<T>(bias: &[T], out: &mut [T], batch: usize, out_f: usize)
where
    T: Float + AddAssign,
{
    debug_assert_eq!(bias.len(), out_f);
    debug_assert_eq!(out.len(), batch * out_f);

    for b in 0..batch {
        for o in 0..out_f {
            out[b * out_f + o] += bias[o];
        }
    }
}

/// Fully-connected backward.
///
/// Given upstream gradient `dx: [batch, out_f]`, input `x: [batch, in_f]`
/// and weight `w: [out_f, in_f]`, computes
/// `dw[o, i] = sum_b dx[b, o] * x[b, i]` (as `dx^t @ x`) and
/// `grad_input[b, i] = sum_o dx[b, o] * w[o, i]` (as `dx @ w`).
pub fn linear_backward<T>(
    x: &[T],
    w: &[T],
    dx: &[T],
    dw: &mut [T],
    grad_input: &mut [T],
    batch: usize,
    in_f: usize,
    out_f: usize,
) where
    T: Float + AddAssign,
{
    let dx_t = transpose(dx, batch, out_f);
    multiply(&dx_t, x, dw, out_f, batch, in_f);
    multiply(dx, w, grad_input, batch, out_f, in_f);
}

/// Bias backward: `db[o] = sum_b dx[b, o]`.
pub fn linear_bias_backward<T>(dx: &[T], db: &mut [T], batch: usize, out_f: usize)
where
    T: Float + AddAssign,
{
    debug_assert_eq!(dx.len(), batch * out_f);
    debug_assert_eq!(db.len(), out_f);

    for o in 0..out_f {
        db[o] = T::zero();
    }
    for b in 0..batch {
        for o in 0..out_f {
            db[o] += dx[b * out_f + o];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // batch 2, in_features 3, out_features 2 throughout.
    const X: [f32; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    const W: [f32; 6] = [1.0, 0.5, -1.0, 2.0, 1.0, 0.0];

    #[test]
    fn test_linear_forward() {
        let mut out = [0.0_f32; 4];
        linear_forward(&X, &W, &mut out, 2, 3, 2);
        // out[0,0] = 1*1 + 2*0.5 + 3*(-1) = -1
        // out[0,1] = 1*2 + 2*1 + 3*0 = 4
        // out[1,0] = 4*1 + 5*0.5 + 6*(-1) = 0.5
        // out[1,1] = 4*2 + 5*1 + 6*0 = 13
        assert_relative_eq!(out[0], -1.0);
        assert_relative_eq!(out[1], 4.0);
        assert_relative_eq!(out[2], 0.5);
        assert_relative_eq!(out[3], 13.0);
    }

    #[test]
    fn test_linear_add_bias() {
        let bias = [0.1_f32, -0.2];
        let mut out = [0.0_f32, 0.0, 1.0, 1.0];
        linear_add_bias(&bias, &mut out, 2, 2);
        assert_relative_eq!(out[0], 0.1);
        assert_relative_eq!(out[1], -0.2);
        assert_relative_eq!(out[2], 1.1);
        assert_relative_eq!(out[3], 0.8);
    }

    #[test]
    fn test_linear_backward() {
        let dx = [1.0_f32, 0.0, 0.0, 1.0];
        let mut dw = [0.0_f32; 6];
        let mut grad_input = [0.0_f32; 6];
        linear_backward(&X, &W, &dx, &mut dw, &mut grad_input, 2, 3, 2);

        // dw[o, i] = sum_b dx[b, o] * x[b, i]
        assert_eq!(dw, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        // grad_input[b, i] = sum_o dx[b, o] * w[o, i]
        assert_eq!(grad_input, [1.0, 0.5, -1.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_linear_bias_backward() {
        let dx = [1.0_f32, 2.0, 3.0, 4.0];
        let mut db = [9.0_f32, 9.0]; // Stale values must be overwritten.
        linear_bias_backward(&dx, &mut db, 2, 2);
        assert_eq!(db, [4.0, 6.0]);
    }
}
