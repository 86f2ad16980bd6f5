use crate::tensor::Tensor;

/// Checks if a tensor matches an expected shape and data within tolerance.
/// Panics with the offending index on mismatch.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = actual
        .get_data()
        .expect("Failed to get tensor data in check_tensor_near");

    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (*a - *e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Central-difference numerical gradient of a scalar function of a flat
/// parameter vector, used to cross-check analytic backward passes.
pub fn finite_difference_gradient<F>(mut f: F, x: &[f32], step: f32) -> Vec<f32>
where
    F: FnMut(&[f32]) -> f32,
{
    let mut grad = vec![0.0; x.len()];
    let mut probe = x.to_vec();
    for i in 0..x.len() {
        probe[i] = x[i] + step;
        let plus = f(&probe);
        probe[i] = x[i] - step;
        let minus = f(&probe);
        probe[i] = x[i];
        grad[i] = (plus - minus) / (2.0 * step);
    }
    grad
}
