//! DQN agent learning from human demonstrations, implemented with candle.
use super::{config::HumanDqnConfig, model::QModel, TargetKind};
use crate::{
    model::SubModel,
    opt::Optimizer,
    util::{actions_to_tensor, batch_to_tensor, obs_to_tensor, scalars_to_tensor, OutDim},
};
use anyhow::Result;
use candle_core::{Device, Tensor, D};
use candle_nn::{loss, ops::log_softmax};
use hadqn_core::{Obs, QLearner, TransitionBatch};
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};

/// Terms of the loss of a batch.
pub struct LossTerms {
    /// `mse + imitation_weight * imitation`, differentiable w.r.t. the moving network.
    pub total: Tensor,

    /// Mean squared error between the values of the taken actions and the bootstrap targets.
    pub mse: Tensor,

    /// Mean log-probability of the human action in the two-way softmax
    /// over the values of the human and the taken actions.
    pub imitation: Tensor,
}

/// Loss and update engine of DQN guided by human demonstrations.
///
/// Owns the moving network, its optimizer and the target network. The
/// bootstrap target of a transition is computed from the human reward,
///
/// ```text
/// q_target = human_reward + gamma^multi_step * V_target(next_state),
/// ```
///
/// where `V_target` is given by [`TargetKind`]. Neither `reward` nor `done`
/// of the transition enters the target. The loss adds the log-softmax
/// probability of the human action against the taken action to the mean
/// squared error.
pub struct HumanDqn<Q>
where
    Q: SubModel,
{
    qnet: QModel<Q>,
    qnet_tgt: QModel<Q>,
    opt: Optimizer,
    target: TargetKind,
    discount: f64,
    imitation_weight: f64,
    n_actions: usize,
    n_opts: usize,
    device: Device,
}

impl<Q> HumanDqn<Q>
where
    Q: SubModel,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + Clone,
{
    /// Constructs the engine.
    ///
    /// The moving and the target networks are built from the same
    /// configuration and start from identical parameters.
    pub fn build(config: HumanDqnConfig<Q::Config>) -> Result<Self> {
        config.validate()?;
        let device: Device = config.device.unwrap_or_default().try_into()?;
        let n_actions = config.n_actions().unwrap_or_default();
        let model_config = config
            .model_config
            .ok_or_else(|| anyhow::anyhow!("model_config is not set"))?;

        let qnet = QModel::<Q>::build(model_config.clone(), device.clone())?;
        let qnet_tgt = QModel::<Q>::build(model_config, device.clone())?;
        qnet_tgt.copy_params_from(&qnet)?;
        let opt = config.opt_config.build(qnet.varmap().all_vars())?;

        info!(
            "Build HumanDqn: target = {:?}, gamma = {}, multi_step = {}, imitation_weight = {}",
            config.target, config.gamma, config.multi_step, config.imitation_weight
        );

        Ok(Self {
            qnet,
            qnet_tgt,
            opt,
            target: config.target,
            discount: config.gamma.powi(config.multi_step as i32),
            imitation_weight: config.imitation_weight,
            n_actions,
            n_opts: 0,
            device,
        })
    }

    /// Action values of the moving network for a batch of observations.
    pub fn q_values(&self, xs: &Tensor) -> Result<Tensor> {
        self.qnet.forward(xs)
    }

    /// Action values of the target network for a batch of observations.
    pub fn target_q_values(&self, xs: &Tensor) -> Result<Tensor> {
        self.qnet_tgt.forward(xs)
    }

    /// Bootstrap value of a batch of next observations, shape `[batch]`.
    ///
    /// The returned tensor is detached from the computation graph.
    pub fn bootstrap_value(&self, next_obs: &Tensor) -> Result<Tensor> {
        let v = match self.target {
            TargetKind::Vanilla => self.qnet_tgt.forward(next_obs)?.max(D::Minus1)?,
            TargetKind::Double => {
                let a = self
                    .qnet
                    .forward(next_obs)?
                    .detach()
                    .argmax_keepdim(D::Minus1)?;
                self.qnet_tgt
                    .forward(next_obs)?
                    .gather(&a, D::Minus1)?
                    .squeeze(D::Minus1)?
            }
        };
        Ok(v.detach())
    }

    /// Computes the loss of a batch without updating parameters.
    pub fn calc_loss(&self, batch: &TransitionBatch) -> Result<LossTerms> {
        let states = batch_to_tensor(&batch.states, &self.device)?;
        let next_states = batch_to_tensor(&batch.next_states, &self.device)?;
        let actions = actions_to_tensor(&batch.actions, &self.device)?.unsqueeze(1)?;
        let human_actions = actions_to_tensor(&batch.human_actions, &self.device)?.unsqueeze(1)?;
        let human_rewards = scalars_to_tensor(&batch.human_rewards, &self.device)?;

        // Both actions are evaluated on the same forward pass
        let q = self.qnet.forward(&states)?;
        let q_robot = q.gather(&actions, 1)?.squeeze(1)?;
        let q_human = q.gather(&human_actions, 1)?.squeeze(1)?;

        let q_target = {
            let v = self.bootstrap_value(&next_states)?;
            (human_rewards + (v * self.discount)?)?.detach()
        };
        let mse = loss::mse(&q_robot, &q_target)?;

        let imitation = {
            let logits = Tensor::stack(&[&q_human, &q_robot], 1)?;
            log_softmax(&logits, 1)?.narrow(1, 0, 1)?.mean_all()?
        };

        let total = (&mse + (&imitation * self.imitation_weight)?)?;

        Ok(LossTerms {
            total,
            mse,
            imitation,
        })
    }

    /// Number of optimization steps performed so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Parameters of the moving network.
    pub fn varmap(&self) -> &candle_nn::VarMap {
        self.qnet.varmap()
    }

    /// Parameters of the target network.
    pub fn target_varmap(&self) -> &candle_nn::VarMap {
        self.qnet_tgt.varmap()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl<Q> QLearner for HumanDqn<Q>
where
    Q: SubModel,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + Clone,
{
    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn greedy_action(&self, obs: &Obs) -> Result<usize> {
        let xs = obs_to_tensor(obs, &self.device)?;
        let a = self
            .qnet
            .forward(&xs)?
            .squeeze(0)?
            .argmax(D::Minus1)?
            .to_scalar::<u32>()?;
        Ok(a as usize)
    }

    fn improve(&mut self, batch: TransitionBatch) -> Result<f32> {
        let terms = self.calc_loss(&batch)?;
        self.opt.backward_step(&terms.total)?;
        self.n_opts += 1;

        let loss = terms.total.to_scalar::<f32>()?;
        trace!(
            "opt {}: loss = {}, mse = {}, imitation = {}",
            self.n_opts,
            loss,
            terms.mse.to_scalar::<f32>()?,
            terms.imitation.to_scalar::<f32>()?
        );
        Ok(loss)
    }

    fn update_target(&mut self) -> Result<()> {
        self.qnet_tgt.copy_params_from(&self.qnet)
    }
}
