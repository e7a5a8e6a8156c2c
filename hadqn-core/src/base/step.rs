//! Environment step.
use super::Obs;

/// Demonstration and event information attached to a [`Step`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    /// Action the human demonstrator takes in the state before the step.
    pub human_action: usize,

    /// Reward attributed to the human trajectory for the same step.
    pub human_reward: f32,

    /// Flag denoting if a catastrophe happened in this step.
    pub is_catastrophe: bool,
}

/// Represents an observation, reward and termination flag `(o_t+1, r_t, done_t)`
/// emitted by an environment, with demonstration information.
#[derive(Clone, Debug)]
pub struct Step {
    /// Observation after the step.
    pub obs: Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode has ended.
    pub is_done: bool,

    /// Demonstration and event information.
    pub info: StepInfo,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(obs: Obs, reward: f32, is_done: bool, info: StepInfo) -> Self {
        Self {
            obs,
            reward,
            is_done,
            info,
        }
    }
}
