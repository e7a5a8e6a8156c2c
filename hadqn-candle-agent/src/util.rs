//! Utilities.
use anyhow::Result;
use candle_core::{Device, Tensor};
use hadqn_core::Obs;
mod named_tensors;
pub use named_tensors::NamedTensors;

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: usize);
}

/// Converts a single observation into a tensor with a batch dimension of size 1.
pub fn obs_to_tensor(obs: &Obs, device: &Device) -> Result<Tensor> {
    let shape = obs.shape().to_vec();
    let v = obs.iter().copied().collect::<Vec<f32>>();
    Ok(Tensor::from_vec(v, shape, device)?.unsqueeze(0)?)
}

/// Stacks observations into a tensor of shape `[batch, obs_shape...]`.
///
/// All observations must have the same shape.
pub fn batch_to_tensor(obs: &[Obs], device: &Device) -> Result<Tensor> {
    let xs = obs
        .iter()
        .map(|o| obs_to_tensor(o, device))
        .collect::<Result<Vec<_>>>()?;
    Ok(Tensor::cat(&xs, 0)?)
}

/// Converts action indices into a `u32` tensor of shape `[batch]`.
pub fn actions_to_tensor(actions: &[usize], device: &Device) -> Result<Tensor> {
    let v = actions.iter().map(|&a| a as u32).collect::<Vec<_>>();
    Ok(Tensor::from_vec(v, actions.len(), device)?)
}

/// Converts a vector of scalars into a `f32` tensor of shape `[batch]`.
pub fn scalars_to_tensor(xs: &[f32], device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(xs, xs.len(), device)?)
}
