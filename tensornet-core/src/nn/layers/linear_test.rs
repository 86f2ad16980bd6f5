use super::*;
use crate::utils::testing::check_tensor_near;

fn fixed_linear() -> Linear {
    // weight [[1, 0, -1], [0.5, 1, 2]], bias [0.1, -0.1]
    let linear = Linear::new(3, 2, true).unwrap();
    linear
        .weight
        .value()
        .write_data()
        .as_mut_slice("test")
        .unwrap()
        .copy_from_slice(&[1.0, 0.0, -1.0, 0.5, 1.0, 2.0]);
    linear
        .bias
        .as_ref()
        .unwrap()
        .value()
        .write_data()
        .as_mut_slice("test")
        .unwrap()
        .copy_from_slice(&[0.1, -0.1]);
    linear
}

#[test]
fn test_linear_creation() {
    let linear = Linear::new(10, 5, true).unwrap();
    assert_eq!(linear.weight.shape(), vec![5, 10]);
    assert_eq!(linear.weight.grad().shape(), vec![5, 10]);
    assert!(linear.bias.is_some());
    assert_eq!(linear.bias.as_ref().unwrap().shape(), vec![5]);
    assert_eq!(linear.in_features(), 10);
    assert_eq!(linear.out_features(), 5);
    assert_eq!(linear.parameters().len(), 2);

    let no_bias = Linear::new(20, 30, false).unwrap();
    assert!(no_bias.bias.is_none());
    assert_eq!(no_bias.parameters().len(), 1);
}

#[test]
fn test_linear_rejects_zero_features() {
    assert!(matches!(
        Linear::new(0, 5, true),
        Err(TensorNetError::ConfigError { .. })
    ));
}

#[test]
fn test_linear_forward_with_bias() {
    let mut linear = fixed_linear();
    let input = crate::tensor::from_vec(vec![2.0, 3.0, 4.0], vec![1, 3]).unwrap();
    let output = zeros(&[1, 2]).unwrap();

    linear.forward(&input, &output).unwrap();

    // [2*1 + 3*0 + 4*(-1), 2*0.5 + 3*1 + 4*2] + [0.1, -0.1]
    check_tensor_near(&output, &[1, 2], &[-1.9, 11.9], 1e-6);
}

#[test]
fn test_linear_forward_batch() {
    let mut linear = fixed_linear();
    let input =
        crate::tensor::from_vec(vec![2.0, 3.0, 4.0, 1.0, 1.0, 1.0], vec![2, 3]).unwrap();
    let output = zeros(&[2, 2]).unwrap();

    linear.forward(&input, &output).unwrap();
    check_tensor_near(&output, &[2, 2], &[-1.9, 11.9, 0.1, 3.4], 1e-6);
}

#[test]
fn test_linear_backward_grad_input() {
    let mut linear = fixed_linear();
    let input = crate::tensor::from_vec(vec![2.0, 3.0, 4.0], vec![1, 3]).unwrap();
    let output = zeros(&[1, 2]).unwrap();
    linear.forward(&input, &output).unwrap();

    let grad_outputs = crate::tensor::from_vec(vec![1.0, 2.0], vec![1, 2]).unwrap();
    let grad_inputs = zeros(&[1, 3]).unwrap();
    linear
        .backward(&input, &output, &grad_outputs, &grad_inputs)
        .unwrap();

    // grad_input[i] = sum_o dx[o] * w[o, i]
    check_tensor_near(&grad_inputs, &[1, 3], &[2.0, 2.0, 3.0], 1e-6);
}

#[test]
fn test_linear_update_gradients_overwrites() {
    let mut linear = fixed_linear();
    let input = crate::tensor::from_vec(vec![2.0, 3.0, 4.0], vec![1, 3]).unwrap();
    let grad_outputs = crate::tensor::from_vec(vec![1.0, 2.0], vec![1, 2]).unwrap();

    linear.update_gradients(&input, &grad_outputs).unwrap();
    check_tensor_near(
        linear.weight.grad(),
        &[2, 3],
        &[2.0, 3.0, 4.0, 4.0, 6.0, 8.0],
        1e-6,
    );
    check_tensor_near(linear.bias.as_ref().unwrap().grad(), &[2], &[1.0, 2.0], 1e-6);

    // A second call replaces the gradients instead of accumulating them.
    linear.update_gradients(&input, &grad_outputs).unwrap();
    check_tensor_near(
        linear.weight.grad(),
        &[2, 3],
        &[2.0, 3.0, 4.0, 4.0, 6.0, 8.0],
        1e-6,
    );
}

#[test]
fn test_linear_shape_validation() {
    let mut linear = fixed_linear();

    // Wrong feature count.
    let bad_input = zeros(&[1, 4]).unwrap();
    let output = zeros(&[1, 2]).unwrap();
    assert!(matches!(
        linear.forward(&bad_input, &output),
        Err(TensorNetError::ShapeMismatch { .. })
    ));

    // Wrong rank.
    let flat_input = zeros(&[3]).unwrap();
    assert!(matches!(
        linear.forward(&flat_input, &output),
        Err(TensorNetError::DimensionMismatch { .. })
    ));

    // Wrong output shape.
    let input = zeros(&[1, 3]).unwrap();
    let bad_output = zeros(&[2, 2]).unwrap();
    assert!(matches!(
        linear.forward(&input, &bad_output),
        Err(TensorNetError::ShapeMismatch { .. })
    ));

    // Aliased input/output.
    let alias = input.clone();
    assert!(matches!(
        linear.forward(&input, &alias),
        Err(TensorNetError::AliasedTensors { .. })
    ));
}

#[test]
fn test_linear_output_shape() {
    let linear = Linear::new(3, 2, false).unwrap();
    assert_eq!(linear.output_shape(&[7, 3]).unwrap(), vec![7, 2]);
    assert!(linear.output_shape(&[7, 4]).is_err());
    assert!(linear.output_shape(&[3]).is_err());
}
