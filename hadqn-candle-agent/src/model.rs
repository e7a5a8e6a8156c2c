//! Interface of neural networks used in the agent.
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::VarBuilder;

/// Neural network model not owning its [`VarMap`] internally.
///
/// The parameters are registered in the [`VarMap`] behind the given
/// [`VarBuilder`], so that a model can be built twice on different maps,
/// e.g., for the moving and the target networks.
///
/// [`VarMap`]: candle_nn::VarMap
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Builds [`SubModel`] with [`VarBuilder`] and [`SubModel::Config`].
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Forward computation for a batch of inputs.
    fn forward(&self, xs: &Tensor) -> Result<Tensor>;
}
