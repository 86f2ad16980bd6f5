use tensornet_core::tensor::{from_vec, Tensor};

/// Helper to create a simple tensor for testing purposes.
#[allow(dead_code)]
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    from_vec(data, shape).expect("Failed to create test tensor")
}
