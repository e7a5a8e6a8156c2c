//! Action-value networks.
use crate::{
    cnn::{Cnn, CnnConfig},
    mlp::{Mlp, MlpConfig},
    model::SubModel,
    util::OutDim,
};
use anyhow::Result;
use candle_core::{Tensor, D};
use candle_nn::{linear, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

/// Configuration of the feature extractor of [`QNet`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum TorsoConfig {
    /// MLP for vector observations.
    Mlp(MlpConfig),

    /// CNN for stacked frames.
    Cnn(CnnConfig),
}

impl OutDim for TorsoConfig {
    fn get_out_dim(&self) -> usize {
        match self {
            Self::Mlp(c) => c.get_out_dim(),
            Self::Cnn(c) => c.get_out_dim(),
        }
    }

    fn set_out_dim(&mut self, v: usize) {
        match self {
            Self::Mlp(c) => c.set_out_dim(v),
            Self::Cnn(c) => c.set_out_dim(v),
        }
    }
}

/// Configuration of [`QNet`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QNetConfig {
    pub torso: TorsoConfig,
    pub n_actions: usize,
    #[serde(default)]
    pub dueling: bool,
}

impl QNetConfig {
    /// Constructs a configuration with a single-stream head.
    pub fn new(torso: TorsoConfig, n_actions: usize) -> Self {
        Self {
            torso,
            n_actions,
            dueling: false,
        }
    }

    /// Selects the dueling head.
    pub fn dueling(mut self, v: bool) -> Self {
        self.dueling = v;
        self
    }
}

impl OutDim for QNetConfig {
    fn get_out_dim(&self) -> usize {
        self.n_actions
    }

    fn set_out_dim(&mut self, v: usize) {
        self.n_actions = v;
    }
}

enum Torso {
    Mlp(Mlp),
    Cnn(Cnn),
}

impl Torso {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            Self::Mlp(m) => m.forward(xs),
            Self::Cnn(m) => m.forward(xs),
        }
    }
}

/// Output layers mapping features to action values.
pub enum Head {
    /// A linear layer.
    Single(Linear),

    /// Value and advantage streams, `Q = V + A - mean(A)`.
    Dueling {
        /// Layer computing the state value.
        value: Linear,

        /// Layer computing the action advantages.
        advantage: Linear,
    },
}

impl Head {
    /// Action values of shape `[batch, n_actions]`.
    pub fn forward(&self, features: &Tensor) -> Result<Tensor> {
        match self {
            Self::Single(l) => Ok(l.forward(features)?),
            Self::Dueling { value, advantage } => {
                let v = value.forward(features)?;
                let a = advantage.forward(features)?;
                let a = a.broadcast_sub(&a.mean_keepdim(D::Minus1)?)?;
                Ok(a.broadcast_add(&v)?)
            }
        }
    }
}

/// Action-value function: a torso followed by a head.
///
/// Parameters are named `torso.*` and either `head.*` or `value.*` and
/// `advantage.*` for the dueling head.
pub struct QNet {
    torso: Torso,
    head: Head,
    n_actions: usize,
}

impl QNet {
    /// Features extracted from a batch of observations.
    pub fn features(&self, xs: &Tensor) -> Result<Tensor> {
        self.torso.forward(xs)
    }

    /// The head of the network.
    pub fn head(&self) -> &Head {
        &self.head
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }
}

impl SubModel for QNet {
    type Config = QNetConfig;

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let feature_dim = config.torso.get_out_dim();
        let torso = match config.torso {
            TorsoConfig::Mlp(c) => Torso::Mlp(Mlp::build(vb.pp("torso"), c)?),
            TorsoConfig::Cnn(c) => Torso::Cnn(Cnn::build(vb.pp("torso"), c)?),
        };
        let head = match config.dueling {
            false => Head::Single(linear(feature_dim, config.n_actions, vb.pp("head"))?),
            true => Head::Dueling {
                value: linear(feature_dim, 1, vb.pp("value"))?,
                advantage: linear(feature_dim, config.n_actions, vb.pp("advantage"))?,
            },
        };

        Ok(Self {
            torso,
            head,
            n_actions: config.n_actions,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.head.forward(&self.features(xs)?)
    }
}
