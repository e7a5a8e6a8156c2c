//! Configuration of the human-augmented DQN agent.
use crate::{opt::OptimizerConfig, util::OutDim, Device};
use anyhow::Result;
use hadqn_core::error::HadqnError;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// How the value of the next state is bootstrapped.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum TargetKind {
    /// Maximum of the target network over actions.
    #[default]
    Vanilla,

    /// Target network evaluated at the argmax action of the moving network.
    Double,
}

fn default_imitation_weight() -> f64 {
    1.0
}

/// Constructs [`HumanDqn`](super::HumanDqn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HumanDqnConfig<C> {
    pub(super) model_config: Option<C>,
    #[serde(default)]
    pub(super) opt_config: OptimizerConfig,
    pub(super) gamma: f64,
    pub(super) multi_step: usize,
    #[serde(default)]
    pub(super) target: TargetKind,
    #[serde(default = "default_imitation_weight")]
    pub(super) imitation_weight: f64,
    #[serde(default)]
    pub device: Option<Device>,
}

impl<C> Default for HumanDqnConfig<C> {
    fn default() -> Self {
        Self {
            model_config: None,
            opt_config: OptimizerConfig::default(),
            gamma: 0.99,
            multi_step: 1,
            target: TargetKind::default(),
            imitation_weight: default_imitation_weight(),
            device: None,
        }
    }
}

impl<C> HumanDqnConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim,
{
    /// Sets the configuration of the action-value network.
    pub fn model_config(mut self, v: C) -> Self {
        self.model_config = Some(v);
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the learning rate of the optimizer.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.opt_config = self.opt_config.learning_rate(v);
        self
    }

    /// Discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Number of environment steps aggregated in a stored reward.
    pub fn multi_step(mut self, v: usize) -> Self {
        self.multi_step = v;
        self
    }

    /// Selects the bootstrap target.
    pub fn target(mut self, v: TargetKind) -> Self {
        self.target = v;
        self
    }

    /// Double DQN
    pub fn double_dqn(self, v: bool) -> Self {
        self.target(match v {
            true => TargetKind::Double,
            false => TargetKind::Vanilla,
        })
    }

    /// Coefficient of the imitation term of the loss.
    pub fn imitation_weight(mut self, v: f64) -> Self {
        self.imitation_weight = v;
        self
    }

    /// Device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = Some(v);
        self
    }

    /// The number of actions, taken from the output dimension of the model.
    pub fn n_actions(&self) -> Option<usize> {
        self.model_config.as_ref().map(|c| c.get_out_dim())
    }

    /// Checks the ranges of the hyperparameters.
    pub fn validate(&self) -> Result<(), HadqnError> {
        if self.model_config.is_none() {
            return Err(HadqnError::InvalidConfig(
                "model_config is not set".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(HadqnError::InvalidConfig(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if self.multi_step == 0 {
            return Err(HadqnError::InvalidConfig(
                "multi_step must be positive".to_string(),
            ));
        }
        if !self.imitation_weight.is_finite() {
            return Err(HadqnError::InvalidConfig(format!(
                "imitation_weight must be finite, got {}",
                self.imitation_weight
            )));
        }
        Ok(())
    }

    /// Loads [`HumanDqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of HumanDqn from {}", path_.display());
        Ok(b)
    }

    /// Saves [`HumanDqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of HumanDqn into {}", path_.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mlp::MlpConfig,
        qnet::{QNetConfig, TorsoConfig},
    };
    use tempdir::TempDir;

    fn config() -> HumanDqnConfig<QNetConfig> {
        let torso = TorsoConfig::Mlp(MlpConfig::new(4, vec![32], 32, true));
        HumanDqnConfig::default()
            .model_config(QNetConfig::new(torso, 3).dueling(true))
            .double_dqn(true)
            .gamma(0.9)
            .multi_step(2)
            .learning_rate(2.5e-4)
    }

    #[test]
    fn test_serde_human_dqn_config() -> Result<()> {
        let config = config();
        assert_eq!(config.n_actions(), Some(3));
        assert_eq!(config.target, TargetKind::Double);

        let dir = TempDir::new("human_dqn_config")?;
        let path = dir.path().join("human_dqn_config.yaml");
        config.save(&path)?;
        let config_ = HumanDqnConfig::<QNetConfig>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());
        assert!(config().gamma(1.5).validate().is_err());
        assert!(config().multi_step(0).validate().is_err());
        assert!(HumanDqnConfig::<QNetConfig>::default().validate().is_err());
    }
}
