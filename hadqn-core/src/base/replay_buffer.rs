//! Replay buffer interface.
use super::{Transition, TransitionBatch};
use anyhow::Result;

/// Interface of bounded buffers storing [`Transition`]s and generating
/// batches for training.
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// Builds a new replay buffer from the given configuration.
    ///
    /// Fails if the configuration is inconsistent.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Pushes a transition into the buffer.
    fn push(&mut self, tr: Transition) -> Result<()>;

    /// Returns the current number of transitions in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer has no transitions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of transitions the buffer must exceed before batches
    /// are used for training.
    fn minimum(&self) -> usize;

    /// Returns `true` if the buffer holds more transitions than [`Self::minimum`].
    fn is_warm(&self) -> bool {
        self.len() > self.minimum()
    }

    /// Samples a batch of `size` transitions.
    fn batch(&mut self, size: usize) -> Result<TransitionBatch>;
}
