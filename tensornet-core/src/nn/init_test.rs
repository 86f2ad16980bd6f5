use super::*;
use crate::tensor::zeros;

#[test]
fn test_fill_variants() {
    let t = zeros(&[2, 3]).unwrap();
    ones_(&t).unwrap();
    assert_eq!(t.get_data().unwrap(), vec![1.0; 6]);
    fill_(&t, -2.5).unwrap();
    assert_eq!(t.get_data().unwrap(), vec![-2.5; 6]);
    zeros_(&t).unwrap();
    assert_eq!(t.get_data().unwrap(), vec![0.0; 6]);
}

#[test]
fn test_fill_unallocated_fails() {
    let t = Tensor::default();
    assert!(matches!(
        zeros_(&t),
        Err(TensorNetError::UnallocatedTensor { .. })
    ));
}

#[test]
fn test_uniform_range() {
    let t = zeros(&[100]).unwrap();
    uniform_(&t, -0.5, 0.5).unwrap();
    let data = t.get_data().unwrap();
    assert!(data.iter().all(|&v| (-0.5..0.5).contains(&v)));
    // A hundred samples from U(-0.5, 0.5) are never all identical.
    assert!(data.iter().any(|&v| v != data[0]));
}

#[test]
fn test_uniform_rejects_empty_range() {
    let t = zeros(&[4]).unwrap();
    assert!(matches!(
        uniform_(&t, 1.0, 1.0),
        Err(TensorNetError::ConfigError { .. })
    ));
}

#[test]
fn test_xavier_bound() {
    let t = zeros(&[8, 4]).unwrap();
    xavier_uniform_(&t, 4, 8).unwrap();
    let bound = (6.0_f32 / 12.0).sqrt();
    assert!(t.get_data().unwrap().iter().all(|&v| v.abs() <= bound));
}

#[test]
fn test_normal_rejects_negative_std() {
    let t = zeros(&[4]).unwrap();
    assert!(matches!(
        normal_(&t, 0.0, -1.0),
        Err(TensorNetError::ConfigError { .. })
    ));
}
