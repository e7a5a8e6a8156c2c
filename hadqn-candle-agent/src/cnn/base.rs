use super::CnnConfig;
use crate::model::SubModel;
use anyhow::Result;
use candle_core::{DType::F32, Device, Tensor};
use candle_nn::{
    conv::Conv2dConfig,
    conv2d_no_bias, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};

#[allow(clippy::upper_case_acronyms)]
/// Convolutional neural network, which has the same architecture of the DQN paper.
///
/// The input is a batch of stacked 84x84 frames, `[batch, n_stack, 84, 84]`.
/// The output is a feature vector of dimension `out_dim` after ReLU.
pub struct Cnn {
    device: Device,
    seq: Sequential,
}

impl Cnn {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    fn create_net(vb: &VarBuilder, config: &CnnConfig) -> Result<Sequential> {
        let scale = config.pixel_scale;
        let seq = seq()
            .add_fn(move |xs| xs.to_dtype(F32)? * scale)
            .add(conv2d_no_bias(
                config.n_stack,
                32,
                8,
                Self::stride(4),
                vb.pp("c1"),
            )?)
            .add_fn(|xs| xs.relu())
            .add(conv2d_no_bias(32, 64, 4, Self::stride(2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d_no_bias(64, 64, 3, Self::stride(1), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu()?.flatten_from(1))
            .add(linear(3136, config.out_dim, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu());

        Ok(seq)
    }
}

impl SubModel for Cnn {
    type Config = CnnConfig;

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        Ok(self.seq.forward(&xs.to_device(&self.device)?)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vb.device().clone();
        let seq = Self::create_net(&vb, &config)?;

        Ok(Self { device, seq })
    }
}
