use crate::error::TensorNetError;
use crate::nn::layer::{build_layer, Layer, LayerKind};
use crate::nn::parameter::Parameter;
use crate::tensor::{zeros, Tensor};

/// An ordered collection of owned, interchangeable layer handles.
///
/// The container allocates the activation tensors between layers (sized via
/// each layer's `output_shape`, replaced when the batch shape changes) and
/// keeps them across the forward pass so the backward pass can feed each
/// layer its original inputs and outputs.
#[derive(Debug, Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
    /// Model input plus one activation per layer from the latest forward.
    activations: Vec<Tensor>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential {
            layers: Vec::new(),
            activations: Vec::new(),
        }
    }

    /// Builds a model from layer-kind tags through the layer factory.
    pub fn from_kinds(kinds: &[LayerKind]) -> Result<Self, TensorNetError> {
        let mut model = Sequential::new();
        for kind in kinds {
            model.add_layer(build_layer(kind)?);
        }
        Ok(model)
    }

    pub fn add_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
        // Stale activations no longer describe the model.
        self.activations.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All learnable parameters, in layer order.
    pub fn parameters(&self) -> Vec<&Parameter> {
        self.layers
            .iter()
            .flat_map(|layer| layer.parameters())
            .collect()
    }

    /// Switches every layer between training and evaluation behavior.
    pub fn set_training(&mut self, training: bool) {
        for layer in self.layers.iter_mut() {
            layer.set_training(training);
        }
    }

    /// Runs the forward pass, returning a handle to the final activation.
    ///
    /// Intermediate activations are retained for the next [`backward`] call.
    ///
    /// [`backward`]: Sequential::backward
    pub fn forward(&mut self, input: &Tensor) -> Result<Tensor, TensorNetError> {
        self.activations.clear();
        self.activations.push(input.clone());

        let mut current = input.clone();
        for layer in self.layers.iter_mut() {
            let out_shape = layer.output_shape(&current.shape())?;
            let output = zeros(&out_shape)?;
            layer.forward(&current, &output)?;
            self.activations.push(output.clone());
            current = output;
        }
        Ok(current)
    }

    /// Runs `update_gradients` and `backward` through the layers in reverse,
    /// consuming the activations of the latest forward call, and returns the
    /// gradient with respect to the model input.
    pub fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, TensorNetError> {
        if self.activations.len() != self.layers.len() + 1 {
            return Err(TensorNetError::UnallocatedTensor {
                operation: "Sequential::backward (run forward first)".to_string(),
            });
        }

        let mut grad = grad_output.clone();
        for (index, layer) in self.layers.iter_mut().enumerate().rev() {
            let inputs = &self.activations[index];
            let outputs = &self.activations[index + 1];
            let grad_input = zeros(&inputs.shape())?;
            layer.update_gradients(inputs, &grad)?;
            layer.backward(inputs, outputs, &grad, &grad_input)?;
            grad = grad_input;
        }
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::from_vec;
    use approx::assert_relative_eq;

    fn mlp() -> Sequential {
        Sequential::from_kinds(&[
            LayerKind::Linear {
                in_features: 3,
                out_features: 4,
                bias: true,
            },
            LayerKind::ReLU,
            LayerKind::Linear {
                in_features: 4,
                out_features: 2,
                bias: true,
            },
            LayerKind::Softmax,
        ])
        .unwrap()
    }

    #[test]
    fn test_sequential_forward_shapes() {
        let mut model = mlp();
        assert_eq!(model.len(), 4);
        let input = from_vec(vec![0.5, -1.0, 2.0, 1.0, 1.0, 1.0], vec![2, 3]).unwrap();

        let output = model.forward(&input).unwrap();
        assert_eq!(output.shape(), vec![2, 2]);

        // Softmax output rows sum to one.
        let data = output.get_data().unwrap();
        for row in data.chunks(2) {
            assert_relative_eq!(row.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sequential_backward_returns_input_gradient() {
        let mut model = mlp();
        let input = from_vec(vec![0.5, -1.0, 2.0, 1.0, 1.0, 1.0], vec![2, 3]).unwrap();
        let _ = model.forward(&input).unwrap();

        let grad_output = from_vec(vec![1.0, 0.0, 0.0, 1.0], vec![2, 2]).unwrap();
        let grad_input = model.backward(&grad_output).unwrap();
        assert_eq!(grad_input.shape(), vec![2, 3]);
        assert!(grad_input.get_data().unwrap().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_sequential_backward_requires_forward() {
        let mut model = mlp();
        let grad_output = zeros(&[2, 2]).unwrap();
        assert!(matches!(
            model.backward(&grad_output),
            Err(TensorNetError::UnallocatedTensor { .. })
        ));
    }

    #[test]
    fn test_sequential_parameters_in_layer_order() {
        let model = mlp();
        let params = model.parameters();
        assert_eq!(params.len(), 4);
        assert_eq!(params[0].shape(), vec![4, 3]); // first weight
        assert_eq!(params[1].shape(), vec![4]); // first bias
        assert_eq!(params[2].shape(), vec![2, 4]); // second weight
        assert_eq!(params[3].shape(), vec![2]); // second bias
    }

    #[test]
    fn test_sequential_set_training_fans_out() {
        let mut model = Sequential::from_kinds(&[LayerKind::BatchNorm1d {
            features: 3,
            eps: 1e-5,
            momentum: 0.1,
        }])
        .unwrap();
        model.set_training(false);

        let input = from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let _ = model.forward(&input).unwrap();

        // Evaluation mode: running statistics keep their initial values.
        let params = model.parameters();
        assert_eq!(params.len(), 2);
    }
}
