//! Configuration of [`Agent`](super::Agent).
use crate::{error::HadqnError, policy::EpsilonSchedule};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Agent`](super::Agent).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AgentConfig {
    /// Initial exploration rate.
    pub eps_start: f64,

    /// Final exploration rate.
    pub eps_end: f64,

    /// The number of environment steps for epsilon to decrease by one.
    pub eps_decay: f64,

    /// Interval of target network synchronization in environment steps.
    pub n_iter_update_nn: usize,

    /// Random seed of the exploration policy.
    #[serde(default)]
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_end: 0.02,
            eps_decay: 1e5,
            n_iter_update_nn: 1000,
            seed: 42,
        }
    }
}

impl AgentConfig {
    /// Sets the initial exploration rate.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Sets the final exploration rate.
    pub fn eps_end(mut self, v: f64) -> Self {
        self.eps_end = v;
        self
    }

    /// Sets the decay of the exploration rate.
    pub fn eps_decay(mut self, v: f64) -> Self {
        self.eps_decay = v;
        self
    }

    /// Sets the interval of target network synchronization.
    pub fn n_iter_update_nn(mut self, v: usize) -> Self {
        self.n_iter_update_nn = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Returns the epsilon schedule, failing on inconsistent values.
    pub fn schedule(&self) -> Result<EpsilonSchedule, HadqnError> {
        EpsilonSchedule::new(self.eps_start, self.eps_end, self.eps_decay)
    }

    /// Checks the consistency of the configuration.
    pub fn validate(&self) -> Result<(), HadqnError> {
        self.schedule()?;
        if self.n_iter_update_nn == 0 {
            return Err(HadqnError::InvalidConfig(
                "n_iter_update_nn must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`AgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`AgentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of agent into {}", path_.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_agent_config() -> Result<()> {
        let config = AgentConfig::default()
            .eps_start(0.9)
            .eps_end(0.1)
            .eps_decay(500.0)
            .n_iter_update_nn(250);

        let dir = TempDir::new("agent_config")?;
        let path = dir.path().join("agent.yaml");
        config.save(&path)?;
        let config_ = AgentConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_zero_sync_interval() {
        let config = AgentConfig::default().n_iter_update_nn(0);
        assert!(matches!(
            config.validate(),
            Err(HadqnError::InvalidConfig(_))
        ));
    }
}
