use crate::error::TensorNetError;
use crate::nn::layers::{BatchNorm1d, Linear, ReLU, Softmax};
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;

/// The polymorphic computation-unit contract shared by all layers.
///
/// Outputs and gradient tensors are caller-allocated and written in place
/// through the shared-storage handle. Every operation validates shapes
/// before touching data and fails with a descriptive error rather than
/// reading out of bounds.
pub trait Layer: std::fmt::Debug {
    /// Forward evaluation from `inputs` into `outputs`. May cache
    /// intermediates consumed by the next `backward` call.
    fn forward(&mut self, inputs: &Tensor, outputs: &Tensor) -> Result<(), TensorNetError>;

    /// Computes the gradient of the layer input from the upstream gradient
    /// `grad_outputs`, writing into `grad_inputs`. Must be called with the
    /// same batch shape as the immediately preceding `forward`; layers with
    /// cached intermediates validate that and fail loudly on a mismatch.
    fn backward(
        &mut self,
        inputs: &Tensor,
        outputs: &Tensor,
        grad_outputs: &Tensor,
        grad_inputs: &Tensor,
    ) -> Result<(), TensorNetError>;

    /// Computes the gradients of the learnable parameters.
    ///
    /// The parameter-gradient buffers are overwritten on every call
    /// (last-call-wins); accumulation across micro-batches is the caller's
    /// policy. The default is a no-op for layers without parameters.
    fn update_gradients(
        &mut self,
        _inputs: &Tensor,
        _grad_outputs: &Tensor,
    ) -> Result<(), TensorNetError> {
        Ok(())
    }

    /// Learnable parameters with their paired gradient tensors.
    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    /// The output shape this layer produces for `input_shape`, after
    /// validating it against the layer configuration.
    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, TensorNetError>;

    /// Switches between training and evaluation behavior; layers without
    /// mode-dependent behavior ignore it.
    fn set_training(&mut self, _training: bool) {}
}

/// Tag identifying a layer variant together with its configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Linear {
        in_features: usize,
        out_features: usize,
        bias: bool,
    },
    BatchNorm1d {
        features: usize,
        eps: f32,
        momentum: f32,
    },
    ReLU,
    Softmax,
}

/// Builds an owned layer handle from its kind tag.
pub fn build_layer(kind: &LayerKind) -> Result<Box<dyn Layer>, TensorNetError> {
    let layer: Box<dyn Layer> = match kind {
        LayerKind::Linear {
            in_features,
            out_features,
            bias,
        } => Box::new(Linear::new(*in_features, *out_features, *bias)?),
        LayerKind::BatchNorm1d {
            features,
            eps,
            momentum,
        } => Box::new(BatchNorm1d::new(*features, *eps, *momentum)?),
        LayerKind::ReLU => Box::new(ReLU::new()),
        LayerKind::Softmax => Box::new(Softmax::new()),
    };
    log::debug!("built layer {:?}", kind);
    Ok(layer)
}

/// Rejects calls whose tensors share storage. Aliased arguments would both
/// corrupt results and deadlock on the storage lock, so they are refused at
/// the operation boundary.
pub(crate) fn check_no_alias(operation: &str, tensors: &[&Tensor]) -> Result<(), TensorNetError> {
    for i in 0..tensors.len() {
        for j in i + 1..tensors.len() {
            if Tensor::ptr_eq(tensors[i], tensors[j]) {
                return Err(TensorNetError::AliasedTensors {
                    operation: operation.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Validates an exact shape match.
pub(crate) fn check_shape(
    operation: &str,
    tensor: &Tensor,
    expected: &[usize],
) -> Result<(), TensorNetError> {
    let actual = tensor.shape();
    if actual != expected {
        return Err(TensorNetError::ShapeMismatch {
            expected: expected.to_vec(),
            actual,
            operation: operation.to_string(),
        });
    }
    Ok(())
}

/// Validates a `[batch, features]` tensor and returns its extents.
pub(crate) fn check_rank2(tensor: &Tensor) -> Result<(usize, usize), TensorNetError> {
    let shape = tensor.shape();
    if shape.len() != 2 {
        return Err(TensorNetError::DimensionMismatch {
            expected: 2,
            actual: shape.len(),
        });
    }
    Ok((shape[0], shape[1]))
}
