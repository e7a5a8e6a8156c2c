//! Core functionalities.
mod env;
mod learner;
mod replay_buffer;
mod step;
mod transition;
pub use env::Env;
pub use learner::QLearner;
pub use replay_buffer::ReplayBufferBase;
pub use step::{Step, StepInfo};
pub use transition::{Transition, TransitionBatch};

/// Observation of an environment.
///
/// Observations are dense `f32` arrays of arbitrary rank, e.g., a feature
/// vector or a stack of preprocessed Atari frames `[n_stack, 84, 84]`.
pub type Obs = ndarray::ArrayD<f32>;
