use anyhow::{anyhow, Result};
use candle_core::Tensor;
use candle_nn::VarMap;
use std::collections::BTreeMap;

/// Snapshot of model parameters, keyed by parameter name.
///
/// Tensors are deep copies, so the snapshot does not change when the
/// source model is trained afterwards.
#[derive(Clone, Debug)]
pub struct NamedTensors {
    pub named_tensors: BTreeMap<String, Tensor>,
}

impl NamedTensors {
    /// Copy parameters of [`VarMap`].
    pub fn copy_from(vm: &VarMap) -> Result<Self> {
        let data = vm
            .data()
            .lock()
            .map_err(|_| anyhow!("VarMap lock is poisoned"))?;
        let named_tensors = data
            .iter()
            .map(|(k, v)| Ok((k.clone(), v.as_tensor().copy()?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self { named_tensors })
    }

    /// Overwrites parameters of [`VarMap`] in place.
    ///
    /// Every variable of `vm` must have a tensor of the same name and shape
    /// in the snapshot.
    pub fn copy_to(&self, vm: &VarMap) -> Result<()> {
        let data = vm
            .data()
            .lock()
            .map_err(|_| anyhow!("VarMap lock is poisoned"))?;

        for (name, var) in data.iter() {
            let src = self
                .named_tensors
                .get(name)
                .ok_or_else(|| anyhow!("Parameter {} is not in the snapshot", name))?;
            var.set(src)?;
        }

        Ok(())
    }

    /// Number of parameter tensors.
    pub fn len(&self) -> usize {
        self.named_tensors.len()
    }

    /// Returns `true` if the snapshot has no tensors.
    pub fn is_empty(&self) -> bool {
        self.named_tensors.is_empty()
    }
}
