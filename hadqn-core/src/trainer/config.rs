//! Configuration of [`Trainer`](super::Trainer).
use crate::error::HadqnError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of games to be played.
    pub max_games: usize,

    /// The number of transitions in a batch.
    pub batch_size: usize,

    /// Interval of reporting statistics in games.
    pub print_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_games: 500,
            batch_size: 32,
            print_interval: 1,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of games.
    pub fn max_games(mut self, v: usize) -> Self {
        self.max_games = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the interval of reporting statistics in games.
    pub fn print_interval(mut self, v: usize) -> Self {
        self.print_interval = v;
        self
    }

    /// Checks the consistency of the configuration.
    pub fn validate(&self) -> Result<(), HadqnError> {
        if self.batch_size == 0 {
            return Err(HadqnError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if self.print_interval == 0 {
            return Err(HadqnError::InvalidConfig(
                "print_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .max_games(50)
            .batch_size(64)
            .print_interval(5);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
