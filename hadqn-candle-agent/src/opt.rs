//! Optimizers.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::{
    adam::{Adam, ParamsAdam},
    rmsprop::{ParamsRMSprop, RMSprop},
};
use serde::{Deserialize, Serialize};

/// Configuration of optimizer for training the moving network.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// RMSprop optimizer.
    RmsProp {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_alpha")]
        alpha: f64,
        #[serde(default = "default_rmsprop_eps")]
        eps: f64,
    },

    /// AdamW optimizer.
    AdamW {
        lr: f64,
        #[serde(default = "default_beta1")]
        beta1: f64,
        #[serde(default = "default_beta2")]
        beta2: f64,
        #[serde(default = "default_eps")]
        eps: f64,
        #[serde(default = "default_weight_decay")]
        weight_decay: f64,
    },

    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

fn default_alpha() -> f64 {
    ParamsRMSprop::default().alpha
}

fn default_rmsprop_eps() -> f64 {
    ParamsRMSprop::default().eps
}

fn default_beta1() -> f64 {
    ParamsAdamW::default().beta1
}

fn default_beta2() -> f64 {
    ParamsAdamW::default().beta2
}

fn default_eps() -> f64 {
    ParamsAdamW::default().eps
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// Constructs an optimizer over the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::RmsProp { lr, alpha, eps } => {
                let params = ParamsRMSprop {
                    lr: *lr,
                    alpha: *alpha,
                    eps: *eps,
                    ..ParamsRMSprop::default()
                };
                let opt = RMSprop::new(vars, params)?;
                Ok(Optimizer::RmsProp(opt))
            }
            OptimizerConfig::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    beta1: *beta1,
                    beta2: *beta2,
                    eps: *eps,
                    weight_decay: *weight_decay,
                };
                let opt = AdamW::new(vars, params)?;
                Ok(Optimizer::AdamW(opt))
            }
            OptimizerConfig::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                let opt = Adam::new(vars, params)?;
                Ok(Optimizer::Adam(opt))
            }
        }
    }

    /// Override learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::RmsProp { alpha, eps, .. } => Self::RmsProp { lr, alpha, eps },
            Self::AdamW {
                beta1,
                beta2,
                eps,
                weight_decay,
                ..
            } => Self::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            },
            Self::Adam { .. } => Self::Adam { lr },
        }
    }

    /// Learning rate of the optimizer.
    pub fn lr(&self) -> f64 {
        match self {
            Self::RmsProp { lr, .. } | Self::AdamW { lr, .. } | Self::Adam { lr } => *lr,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::RmsProp {
            lr: 1e-4,
            alpha: default_alpha(),
            eps: default_rmsprop_eps(),
        }
    }
}

/// Optimizers.
pub enum Optimizer {
    /// RMSprop optimizer.
    RmsProp(RMSprop),

    /// AdamW optimizer.
    AdamW(AdamW),

    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Computes gradients of `loss` and applies one update.
    ///
    /// Gradients are computed from scratch at every call, nothing accumulates
    /// between calls.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::RmsProp(opt) => Ok(opt.backward_step(loss)?),
            Self::AdamW(opt) => Ok(opt.backward_step(loss)?),
            Self::Adam(opt) => Ok(opt.backward_step(loss)?),
        }
    }
}
