//! Train [`Agent`].
mod config;
use crate::{Agent, Env, QLearner, ReplayBufferBase};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// 0. Given an environment implementing [`Env`] and an [`Agent`].
/// 1. Reset [`Env`].
/// 2. Select an action with [`Agent::select_eps_greedy_action`] and apply it to [`Env`].
/// 3. Store the transition, together with the demonstration of the step,
///    with [`Agent::add_to_buffer`].
/// 4. Call [`Agent::sample_and_improve`]. The agent skips the optimization step
///    while the replay buffer is warming up.
/// 5. If the step was a catastrophe, count it with [`Agent::record_catastrophe`].
/// 6. If the game ended:
///     1. Every `print_interval` games, report statistics with [`Agent::print_info`].
///     2. Close the game with [`Agent::reset_parameters`] and reset [`Env`].
///     3. If `max_games` games have been played, finish the training loop.
/// 7. Back to step 2.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|action|B[Env]
///     B -->|Step|A
///     A -->|Transition|C[ReplayBufferBase]
///     C -->|TransitionBatch|D[QLearner]
///     D -->|loss|A
/// ```
///
/// Errors of any collaborator abort the training run.
pub struct Trainer {
    max_games: usize,
    batch_size: usize,
    print_interval: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_games: config.max_games,
            batch_size: config.batch_size,
            print_interval: config.print_interval,
        })
    }

    /// Performs an environment step followed by an optimization step.
    ///
    /// Returns the observation for the next step and whether the game ended.
    pub fn train_step<E, L, R>(
        &self,
        env: &mut E,
        agent: &mut Agent<L, R>,
        obs: crate::Obs,
    ) -> Result<(crate::Obs, bool)>
    where
        E: Env,
        L: QLearner,
        R: ReplayBufferBase,
    {
        let action = agent.select_eps_greedy_action(&obs)?;
        let step = env.step(action)?;
        let next_obs = step.obs.clone();
        agent.add_to_buffer(
            obs,
            action,
            step.obs,
            step.reward,
            step.is_done,
            step.info.human_action,
            step.info.human_reward,
        )?;
        agent.sample_and_improve(self.batch_size)?;

        if step.info.is_catastrophe {
            agent.record_catastrophe();
        }

        Ok((next_obs, step.is_done))
    }

    /// Train the agent until `max_games` games are played.
    pub fn train<E, L, R>(&self, env: &mut E, agent: &mut Agent<L, R>) -> Result<()>
    where
        E: Env,
        L: QLearner,
        R: ReplayBufferBase,
    {
        info!("Start training for {} games", self.max_games);
        let mut obs = env.reset()?;

        while agent.stats().num_games() < self.max_games {
            let (next_obs, is_done) = self.train_step(env, agent, obs)?;

            obs = if is_done {
                if (agent.stats().num_games() + 1) % self.print_interval == 0 {
                    agent.print_info();
                }
                agent.reset_parameters();
                env.reset()?
            } else {
                next_obs
            };
        }

        info!(
            "Finished training: {} games, {} steps",
            agent.stats().num_games(),
            agent.stats().num_iterations()
        );
        Ok(())
    }
}
