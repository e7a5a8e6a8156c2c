//! DQN guided by human demonstrations.
//!
//! The workspace consists of the following crates:
//!
//! * [hadqn-core](../hadqn_core/index.html) provides the interfaces of the
//!   environment, the replay buffer and the learner, together with the
//!   backend-independent parts of the training loop: the replay buffer with
//!   multi-step returns, epsilon-greedy action selection, the training
//!   orchestrator [`Agent`] and the driver loop [`Trainer`].
//! * [hadqn-candle-agent](../hadqn_candle_agent/index.html) implements the
//!   action-value networks and the loss combining Q-learning toward the human
//!   reward with an imitation term, based on
//!   [candle](https://crates.io/crates/candle-core).
//! * [hadqn-tensorboard](../hadqn_tensorboard/index.html) has
//!   `TensorboardRecorder` to write the training statistics, based on
//!   [tensorboard-rs](https://crates.io/crates/tensorboard-rs).
//! * This crate wires them up into the `hadqn` binary, trained on the toy
//!   [`corridor::Corridor`] environment.
pub mod corridor;
pub mod hyperparameters;
use anyhow::Result;
use corridor::{Corridor, CorridorConfig};
use hadqn_candle_agent::{dqn::HumanDqn, qnet::QNet};
use hadqn_core::{replay_buffer::SimpleReplayBuffer, Agent, Env, ReplayBufferBase, Trainer};
use hadqn_tensorboard::TensorboardRecorder;
use hyperparameters::Hyperparameters;
use log::info;
use std::path::Path;

/// The agent trained by the binary.
pub type HumanAgent = Agent<HumanDqn<QNet>, SimpleReplayBuffer>;

/// Builds the agent for an environment with vector observations.
pub fn create_agent<E: Env>(hp: &Hyperparameters, env: &E) -> Result<HumanAgent> {
    let obs_dim = env.obs_shape().iter().product();
    let dqn = HumanDqn::<QNet>::build(hp.dqn_config(obs_dim, env.n_actions()))?;
    let buffer = SimpleReplayBuffer::build(&hp.buffer_config())?;
    Agent::build(&hp.agent_config(), dqn, buffer)
}

/// Trains an agent on [`Corridor`].
///
/// If `logdir` is given, the statistics are also written to TensorBoard.
pub fn train(
    hp: &Hyperparameters,
    env_config: &CorridorConfig,
    logdir: Option<&Path>,
) -> Result<HumanAgent> {
    let mut env = Corridor::build(env_config, hp.seed as i64)?;
    let mut agent = create_agent(hp, &env)?;
    if let Some(logdir) = logdir {
        info!("Write TensorBoard logs into {}", logdir.display());
        agent = agent.with_recorder(Box::new(TensorboardRecorder::new(logdir)));
    }

    let trainer = Trainer::build(hp.trainer_config())?;
    trainer.train(&mut env, &mut agent)?;
    Ok(agent)
}

/// Mean reward of the greedy policy over `n_games` games.
pub fn evaluate<E: Env>(agent: &HumanAgent, env: &mut E, n_games: usize) -> Result<f32> {
    let mut total = 0.0;
    for _ in 0..n_games {
        let mut obs = env.reset()?;
        loop {
            let step = env.step(agent.select_greedy_action(&obs)?)?;
            total += step.reward;
            if step.is_done {
                break;
            }
            obs = step.obs;
        }
    }
    Ok(total / n_games.max(1) as f32)
}
