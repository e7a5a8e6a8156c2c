//! Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use crate::error::HadqnError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimpleReplayBufferConfig {
    /// The maximum number of stored transitions.
    pub capacity: usize,

    /// The number of transitions the buffer must exceed before training starts.
    pub minimum: usize,

    /// The number of environment steps folded into a stored transition.
    pub multi_step: usize,

    /// Discount factor used for folding rewards.
    pub gamma: f32,

    /// Random seed for sampling.
    pub seed: u64,
}

impl Default for SimpleReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            minimum: 1000,
            multi_step: 1,
            gamma: 0.99,
            seed: 42,
        }
    }
}

impl SimpleReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the warm-up threshold.
    pub fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = minimum;
        self
    }

    /// Sets the number of steps of multi-step returns.
    pub fn multi_step(mut self, multi_step: usize) -> Self {
        self.multi_step = multi_step;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the consistency of the configuration.
    pub fn validate(&self) -> Result<(), HadqnError> {
        if self.capacity == 0 {
            return Err(HadqnError::InvalidConfig(
                "buffer capacity must be positive".to_string(),
            ));
        }
        if self.minimum > self.capacity {
            return Err(HadqnError::InvalidConfig(format!(
                "buffer minimum {} exceeds buffer capacity {}",
                self.minimum, self.capacity
            )));
        }
        if self.multi_step == 0 {
            return Err(HadqnError::InvalidConfig(
                "multi_step must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(HadqnError::InvalidConfig(format!(
                "gamma {} is not in [0, 1]",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Constructs [`SimpleReplayBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimpleReplayBufferConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
