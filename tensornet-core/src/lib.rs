//! TensorNet core: the numerical computation engine of a minimal
//! neural-network framework.
//!
//! The crate provides a strided, row-major [`Tensor`] with shared storage
//! ([`tensor`]), pure numeric primitives over raw buffers ([`kernels`]),
//! layer computation units with a `forward` / `backward` /
//! `update_gradients` contract ([`nn`]) and a sequential container of owned
//! layer handles ([`model`]).

pub mod buffer;
pub mod kernels;
pub mod model;
pub mod nn;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

// Re-export the Tensor type so it is accessible directly via
// `tensornet_core::Tensor`.
pub use tensor::Tensor;
// Re-export traits required by public kernel signatures
pub use num_traits;

pub mod error;
pub use error::TensorNetError;
