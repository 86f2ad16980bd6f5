use crate::error::TensorNetError;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data
/// array to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Validates signed shape extents and converts them to `usize`.
///
/// # Errors
/// Returns `TensorNetError::InvalidShape` if any extent is negative.
pub fn validate_extents(shape: &[i64]) -> Result<Vec<usize>, TensorNetError> {
    if shape.iter().any(|&dim| dim < 0) {
        return Err(TensorNetError::InvalidShape {
            shape: shape.to_vec(),
        });
    }
    Ok(shape.iter().map(|&dim| dim as usize).collect())
}
