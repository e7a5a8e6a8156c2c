//! A bounded replay buffer with multi-step return folding.
mod base;
mod config;
mod n_step;
pub use base::SimpleReplayBuffer;
pub use config::SimpleReplayBufferConfig;
pub use n_step::NStepWindow;
