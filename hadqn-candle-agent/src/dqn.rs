//! DQN agent learning from human demonstrations.
mod base;
mod config;
mod model;
pub use base::{HumanDqn, LossTerms};
pub use config::{HumanDqnConfig, TargetKind};
pub use model::QModel;
