//! Flat hyperparameters of a training run.
use anyhow::Result;
use hadqn_candle_agent::{
    dqn::HumanDqnConfig,
    mlp::MlpConfig,
    opt::OptimizerConfig,
    qnet::{QNetConfig, TorsoConfig},
};
use hadqn_core::{replay_buffer::SimpleReplayBufferConfig, AgentConfig, TrainerConfig};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// All knobs of a training run in a single YAML document.
///
/// Missing keys take their default values.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct Hyperparameters {
    pub eps_start: f64,
    pub eps_end: f64,
    pub eps_decay: f64,
    pub n_iter_update_nn: usize,
    pub learning_rate: f64,
    pub gamma: f64,
    pub multi_step: usize,
    pub double_dqn: bool,
    pub dueling: bool,
    pub buffer_size: usize,
    pub buffer_minimum: usize,
    pub batch_size: usize,
    pub max_games: usize,
    pub print_interval: usize,
    pub seed: u64,
    /// Hidden layers of the MLP torso.
    pub hidden_units: Vec<usize>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_end: 0.02,
            eps_decay: 10000.0,
            n_iter_update_nn: 1000,
            learning_rate: 1e-4,
            gamma: 0.99,
            multi_step: 1,
            double_dqn: true,
            dueling: false,
            buffer_size: 10000,
            buffer_minimum: 1000,
            batch_size: 32,
            max_games: 500,
            print_interval: 1,
            seed: 42,
            hidden_units: vec![64, 64],
        }
    }
}

impl Hyperparameters {
    /// Loads [`Hyperparameters`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load hyperparameters from {}", path_.display());
        Ok(b)
    }

    /// Saves [`Hyperparameters`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save hyperparameters into {}", path_.display());
        Ok(())
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .eps_start(self.eps_start)
            .eps_end(self.eps_end)
            .eps_decay(self.eps_decay)
            .n_iter_update_nn(self.n_iter_update_nn)
            .seed(self.seed)
    }

    pub fn buffer_config(&self) -> SimpleReplayBufferConfig {
        SimpleReplayBufferConfig::default()
            .capacity(self.buffer_size)
            .minimum(self.buffer_minimum)
            .multi_step(self.multi_step)
            .gamma(self.gamma as f32)
            .seed(self.seed)
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig::default()
            .max_games(self.max_games)
            .batch_size(self.batch_size)
            .print_interval(self.print_interval)
    }

    /// Configuration of the learner for vector observations of dimension `obs_dim`.
    pub fn dqn_config(&self, obs_dim: usize, n_actions: usize) -> HumanDqnConfig<QNetConfig> {
        let feature_dim = self.hidden_units.last().copied().unwrap_or(obs_dim);
        let torso = match self.hidden_units.split_last() {
            Some((_, hidden)) => MlpConfig::new(obs_dim, hidden.to_vec(), feature_dim, true),
            None => MlpConfig::new(obs_dim, vec![], obs_dim, false),
        };
        let model_config =
            QNetConfig::new(TorsoConfig::Mlp(torso), n_actions).dueling(self.dueling);

        HumanDqnConfig::default()
            .model_config(model_config)
            .opt_config(OptimizerConfig::default())
            .learning_rate(self.learning_rate)
            .gamma(self.gamma)
            .multi_step(self.multi_step)
            .double_dqn(self.double_dqn)
    }
}
