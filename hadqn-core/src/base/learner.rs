//! Interface of the loss and update engine.
use super::{Obs, TransitionBatch};
use anyhow::Result;

/// A pair of moving and target action-value functions with an optimizer.
///
/// Implementors exclusively own both networks. [`QLearner::improve`] is the
/// only operation changing the moving network and [`QLearner::update_target`]
/// the only one changing the target network.
pub trait QLearner {
    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Returns the action with the maximal action value of the moving network.
    fn greedy_action(&self, obs: &Obs) -> Result<usize>;

    /// Performs exactly one optimization step with the given batch and
    /// returns the loss.
    fn improve(&mut self, batch: TransitionBatch) -> Result<f32>;

    /// Overwrites the parameters of the target network with those of the
    /// moving network.
    fn update_target(&mut self) -> Result<()>;
}
