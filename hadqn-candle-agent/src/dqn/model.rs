use crate::{model::SubModel, util::NamedTensors};
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::trace;

/// A network together with the [`VarMap`] holding its parameters.
///
/// [`HumanDqn`](super::HumanDqn) owns two of them, the moving and the
/// target network, built from the same configuration.
pub struct QModel<Q>
where
    Q: SubModel,
{
    varmap: VarMap,
    q: Q,
}

impl<Q> QModel<Q>
where
    Q: SubModel,
{
    /// Constructs [`QModel`] with freshly initialized parameters.
    pub fn build(config: Q::Config, device: Device) -> Result<Self> {
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, config)?
        };

        Ok(Self { varmap, q })
    }

    /// Outputs the action values given a batch of observations.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.q.forward(xs)
    }

    /// Overwrites the parameters with those of `src`.
    pub fn copy_params_from(&self, src: &Self) -> Result<()> {
        let snapshot = NamedTensors::copy_from(&src.varmap)?;
        snapshot.copy_to(&self.varmap)?;
        trace!("Copied {} parameter tensors", snapshot.len());
        Ok(())
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }
}
