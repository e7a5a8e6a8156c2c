#![warn(missing_docs)]
//! Core of a DQN agent guided by human demonstrations.
//!
//! This crate is independent of any deep learning backend. It defines the
//! interfaces of the collaborators of the learning loop ([`Env`],
//! [`ReplayBufferBase`], [`QLearner`], [`record::Recorder`]) and implements
//! the backend-agnostic parts of it:
//!
//! * [`Transition`], the unit of experience,
//! * [`replay_buffer::SimpleReplayBuffer`], a bounded replay store with
//!   multi-step return folding,
//! * [`policy::EpsilonGreedy`], the policy controller,
//! * [`Agent`], the training orchestrator owning counters and statistics,
//! * [`Trainer`], the single-threaded driver loop.
pub mod error;
pub mod policy;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{Env, Obs, QLearner, ReplayBufferBase, Step, StepInfo, Transition, TransitionBatch};

mod agent;
pub use agent::{Agent, AgentConfig, TrainingStats};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};
