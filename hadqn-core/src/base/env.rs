//! Environment.
use super::{Obs, Step};
use anyhow::Result;

/// Represents an environment with a discrete action space.
///
/// Every step of the environment also reports what a human demonstrator
/// would have done in the same state, see [`StepInfo`](super::StepInfo).
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Obs>;

    /// Performes an environment step with action index `a`.
    fn step(&mut self, a: usize) -> Result<Step>;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Shape of observations.
    fn obs_shape(&self) -> Vec<usize>;
}
