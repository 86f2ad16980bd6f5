//! Runs one forward/backward step of a small MLP built through the layer
//! factory, printing the softmax output and the produced parameter
//! gradients. An external optimizer would consume those gradients to update
//! the parameter tensors in place.

use tensornet_core::model::Sequential;
use tensornet_core::nn::LayerKind;
use tensornet_core::tensor::{from_vec, zeros};
use tensornet_core::TensorNetError;

fn main() -> Result<(), TensorNetError> {
    let mut model = Sequential::from_kinds(&[
        LayerKind::Linear {
            in_features: 4,
            out_features: 8,
            bias: true,
        },
        LayerKind::BatchNorm1d {
            features: 8,
            eps: 1e-5,
            momentum: 0.1,
        },
        LayerKind::ReLU,
        LayerKind::Linear {
            in_features: 8,
            out_features: 3,
            bias: true,
        },
        LayerKind::Softmax,
    ])?;

    // A fixed batch of two 4-feature samples.
    let input = from_vec(
        vec![0.5, -1.2, 0.8, 0.1, 1.5, 0.3, -0.7, 2.0],
        vec![2, 4],
    )?;

    let output = model.forward(&input)?;
    println!("output = {}", output);

    // Pretend the loss gradient selects class 0 for the first sample and
    // class 2 for the second.
    let grad_output = {
        let grad = zeros(&[2, 3])?;
        grad.write_data().as_mut_slice("example")?
            .copy_from_slice(&[-1.0, 0.0, 0.0, 0.0, 0.0, -1.0]);
        grad
    };
    let grad_input = model.backward(&grad_output)?;
    println!("grad wrt input = {}", grad_input);

    for param in model.parameters() {
        println!("{:?} grad = {}", param, param.grad());
    }
    Ok(())
}
