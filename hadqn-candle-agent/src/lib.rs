//! Human-augmented DQN implemented with [candle](https://crates.io/crates/candle-core).
//!
//! The crate provides the neural networks approximating action values
//! ([`qnet::QNet`] with [`mlp::Mlp`] or [`cnn::Cnn`] torsos), the optimizers
//! ([`opt`]) and the loss and update engine ([`dqn::HumanDqn`]), which
//! implements [`hadqn_core::QLearner`].
pub mod cnn;
pub mod dqn;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod qnet;
pub mod util;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Default)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
