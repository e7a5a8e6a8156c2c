//! Training orchestrator.
mod config;
mod stats;
use crate::{
    error::HadqnError,
    policy::{EpsilonGreedy, EpsilonSchedule},
    record::{Record, RecordValue, Recorder},
    Obs, QLearner, ReplayBufferBase, Transition,
};
use anyhow::Result;
pub use config::AgentConfig;
use log::{debug, info, trace};
pub use stats::{TrainingStats, REWARD_WINDOW};

/// Owns the learner, the replay buffer and the bookkeeping of a training run.
///
/// The agent is the single writer of the step counter, the exploration rate
/// and the statistics. An external driver loop, e.g., [`Trainer`](crate::Trainer),
/// calls the methods in the following order at every environment step:
///
/// 1. [`Agent::select_eps_greedy_action`]
/// 2. [`Agent::add_to_buffer`]
/// 3. [`Agent::sample_and_improve`]
/// 4. [`Agent::reset_parameters`] at the end of a game.
pub struct Agent<L, R>
where
    L: QLearner,
    R: ReplayBufferBase,
{
    learner: L,
    buffer: R,
    schedule: EpsilonSchedule,
    policy: EpsilonGreedy,
    n_iter_update_nn: usize,
    stats: TrainingStats,
    recorder: Option<Box<dyn Recorder>>,
}

impl<L, R> Agent<L, R>
where
    L: QLearner,
    R: ReplayBufferBase,
{
    /// Constructs an agent, failing on inconsistent configuration.
    pub fn build(config: &AgentConfig, learner: L, buffer: R) -> Result<Self> {
        config.validate()?;
        let schedule = config.schedule()?;

        Ok(Self {
            learner,
            buffer,
            policy: EpsilonGreedy::new(schedule.eps_start(), config.seed),
            schedule,
            n_iter_update_nn: config.n_iter_update_nn,
            stats: TrainingStats::default(),
            recorder: None,
        })
    }

    /// Attaches a telemetry sink receiving the records of [`Agent::print_info`].
    pub fn with_recorder(mut self, recorder: Box<dyn Recorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// The action with the maximal action value under the moving network.
    pub fn select_greedy_action(&self, obs: &Obs) -> Result<usize> {
        self.policy.select_greedy_action(&self.learner, obs)
    }

    /// Epsilon-greedy action under the current exploration rate.
    pub fn select_eps_greedy_action(&mut self, obs: &Obs) -> Result<usize> {
        self.policy.select_eps_greedy_action(&self.learner, obs)
    }

    /// Stores a transition and advances the step counter.
    ///
    /// Epsilon is recomputed from the new step count and `human_reward` is
    /// accumulated into the reward of the current game.
    #[allow(clippy::too_many_arguments)]
    pub fn add_to_buffer(
        &mut self,
        state: Obs,
        action: usize,
        next_state: Obs,
        reward: f32,
        done: bool,
        human_action: usize,
        human_reward: f32,
    ) -> Result<()> {
        let n_actions = self.learner.n_actions();
        for a in [action, human_action] {
            if a >= n_actions {
                return Err(HadqnError::ActionOutOfRange {
                    action: a,
                    n_actions,
                }
                .into());
            }
        }

        let tr = Transition::new(
            state,
            action,
            next_state,
            reward,
            done,
            human_action,
            human_reward,
        );
        self.buffer.push(tr)?;
        self.stats.num_iterations += 1;
        self.policy
            .set_epsilon(self.schedule.epsilon(self.stats.num_iterations));
        self.stats.total_reward += human_reward;
        trace!(
            "step {}: action = {}, human_action = {}, human_reward = {}",
            self.stats.num_iterations,
            action,
            human_action,
            human_reward
        );

        Ok(())
    }

    /// Performs an optimization step once the buffer is warm, and
    /// synchronizes the target network every `n_iter_update_nn` steps.
    ///
    /// The synchronization is checked against the cumulative step counter
    /// regardless of the warm-up state.
    pub fn sample_and_improve(&mut self, batch_size: usize) -> Result<()> {
        if self.buffer.is_warm() {
            let batch = self.buffer.batch(batch_size)?;
            let loss = self.learner.improve(batch)?;
            self.stats.total_loss.push(loss);
        }

        if self.stats.num_iterations % self.n_iter_update_nn == 0 {
            self.learner.update_target()?;
            debug!(
                "Synchronized target network at step {}",
                self.stats.num_iterations
            );
        }

        Ok(())
    }

    /// Closes the current game.
    pub fn reset_parameters(&mut self) {
        self.stats.reset_game();
    }

    /// Counts a catastrophe in the current game.
    pub fn record_catastrophe(&mut self) {
        self.stats.num_catastrophe += 1;
    }

    /// Reports the statistics of the training run.
    ///
    /// The record is written to the attached recorder, if any, and returned.
    /// `mean_reward` and `loss` are omitted while undefined.
    pub fn print_info(&mut self) -> Record {
        let fps = self.stats.take_fps();
        let epsilon = self.policy.epsilon() as f32;
        let mean_reward = self.stats.mean_reward();
        let mean_loss = self.stats.mean_loss();

        info!(
            "{} {} rew:{} mean_rew:{} fps:{:.0}, eps:{:.2}, loss:{} catastrophes:{}",
            self.stats.num_iterations,
            self.stats.num_games,
            self.stats.total_reward,
            mean_reward.map_or("-".to_string(), |v| format!("{:.2}", v)),
            fps,
            epsilon,
            mean_loss.map_or("-".to_string(), |v| format!("{:.4}", v)),
            self.stats.num_catastrophe,
        );

        let mut record = Record::from_slice(&[
            (
                "num_iterations",
                RecordValue::Scalar(self.stats.num_iterations as f32),
            ),
            ("num_games", RecordValue::Scalar(self.stats.num_games as f32)),
            ("reward", RecordValue::Scalar(self.stats.total_reward)),
            ("fps", RecordValue::Scalar(fps)),
            ("epsilon", RecordValue::Scalar(epsilon)),
            (
                "num_catastrophe",
                RecordValue::Scalar(self.stats.num_catastrophe as f32),
            ),
        ]);
        if let Some(v) = mean_reward {
            record.insert("mean_reward", RecordValue::Scalar(v));
        }
        if let Some(v) = mean_loss {
            record.insert("loss", RecordValue::Scalar(v));
        }

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.write(record.clone());
        }

        record
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.policy.epsilon()
    }

    /// Statistics of the training run.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// The number of discrete actions.
    pub fn n_actions(&self) -> usize {
        self.learner.n_actions()
    }

    /// The learner.
    pub fn learner(&self) -> &L {
        &self.learner
    }

    /// The replay buffer.
    pub fn buffer(&self) -> &R {
        &self.buffer
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        record::BufferedRecorder,
        replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
        TransitionBatch,
    };
    use ndarray::{ArrayD, IxDyn};

    /// Learner counting the calls of its methods.
    #[derive(Default)]
    struct CountingLearner {
        n_improve: usize,
        n_sync: usize,
        batch_sizes: Vec<usize>,
    }

    impl QLearner for CountingLearner {
        fn n_actions(&self) -> usize {
            3
        }

        fn greedy_action(&self, _obs: &Obs) -> Result<usize> {
            Ok(2)
        }

        fn improve(&mut self, batch: TransitionBatch) -> Result<f32> {
            self.n_improve += 1;
            self.batch_sizes.push(batch.len());
            Ok(0.5 * self.n_improve as f32)
        }

        fn update_target(&mut self) -> Result<()> {
            self.n_sync += 1;
            Ok(())
        }
    }

    type TestAgent = Agent<CountingLearner, SimpleReplayBuffer>;

    fn agent(config: AgentConfig, minimum: usize) -> Result<TestAgent> {
        let buffer_config = SimpleReplayBufferConfig::default()
            .capacity(100)
            .minimum(minimum);
        let buffer = SimpleReplayBuffer::build(&buffer_config)?;
        Agent::build(&config, CountingLearner::default(), buffer)
    }

    fn obs(v: f32) -> Obs {
        ArrayD::from_elem(IxDyn(&[2]), v)
    }

    fn add(agent: &mut TestAgent, human_reward: f32) -> Result<()> {
        agent.add_to_buffer(obs(0.0), 1, obs(1.0), 0.0, false, 0, human_reward)
    }

    #[test]
    fn test_build_rejects_zero_decay() -> Result<()> {
        assert!(agent(AgentConfig::default().eps_decay(0.0), 0).is_err());
        Ok(())
    }

    #[test]
    fn test_action_out_of_range() -> Result<()> {
        let mut agent = agent(AgentConfig::default(), 0)?;
        let err = agent
            .add_to_buffer(obs(0.0), 3, obs(1.0), 0.0, false, 0, 0.0)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HadqnError>(),
            Some(HadqnError::ActionOutOfRange {
                action: 3,
                n_actions: 3
            })
        ));
        assert!(agent
            .add_to_buffer(obs(0.0), 0, obs(1.0), 0.0, false, 5, 0.0)
            .is_err());
        assert_eq!(agent.stats().num_iterations(), 0);
        Ok(())
    }

    #[test]
    fn test_warm_up_gate() -> Result<()> {
        // Training starts once the buffer holds more than 4 transitions
        let config = AgentConfig::default().n_iter_update_nn(1000);
        let mut agent = agent(config, 4)?;
        for _ in 0..4 {
            add(&mut agent, 0.0)?;
        }
        agent.sample_and_improve(4)?;
        assert!(agent.stats().total_loss().is_empty());
        assert_eq!(agent.learner().n_improve, 0);

        add(&mut agent, 0.0)?;
        agent.sample_and_improve(4)?;
        assert_eq!(agent.stats().total_loss(), &[0.5]);
        assert_eq!(agent.learner().batch_sizes, vec![4]);

        agent.sample_and_improve(4)?;
        assert_eq!(agent.learner().n_improve, 2);
        Ok(())
    }

    #[test]
    fn test_epsilon_reaches_and_stays_at_end() -> Result<()> {
        let config = AgentConfig::default()
            .eps_start(1.0)
            .eps_end(0.1)
            .eps_decay(10.0);
        let mut agent = agent(config, 0)?;
        assert_eq!(agent.epsilon(), 1.0);
        for _ in 0..9 {
            add(&mut agent, 0.0)?;
        }
        assert_eq!(agent.epsilon(), 0.1);
        add(&mut agent, 0.0)?;
        assert_eq!(agent.epsilon(), 0.1);
        Ok(())
    }

    #[test]
    fn test_sync_cadence_ignores_warm_up() -> Result<()> {
        let config = AgentConfig::default().n_iter_update_nn(3);
        let mut agent = agent(config, 50)?;
        let mut synced_at = vec![];
        for k in 1..=10 {
            let before = agent.learner().n_sync;
            add(&mut agent, 0.0)?;
            agent.sample_and_improve(8)?;
            if agent.learner().n_sync > before {
                synced_at.push(k);
            }
        }
        assert_eq!(synced_at, vec![3, 6, 9]);
        assert_eq!(agent.learner().n_improve, 0);
        Ok(())
    }

    #[test]
    fn test_reset_parameters() -> Result<()> {
        let mut agent = agent(AgentConfig::default(), 0)?;
        add(&mut agent, 1.5)?;
        add(&mut agent, 2.0)?;
        agent.sample_and_improve(2)?;
        agent.record_catastrophe();
        assert_eq!(agent.stats().total_reward(), 3.5);
        assert_eq!(agent.stats().num_catastrophe(), 1);

        agent.reset_parameters();
        assert_eq!(agent.stats().num_games(), 1);
        assert_eq!(agent.stats().rewards(), &[3.5]);
        assert_eq!(agent.stats().total_reward(), 0.0);
        assert!(agent.stats().total_loss().is_empty());
        assert_eq!(agent.stats().num_catastrophe(), 0);
        assert_eq!(agent.stats().num_iterations(), 2);
        Ok(())
    }

    #[test]
    fn test_print_info_writes_to_recorder() -> Result<()> {
        let recorder = BufferedRecorder::new();
        let mut agent = agent(AgentConfig::default(), 0)?.with_recorder(Box::new(recorder.clone()));

        let record = agent.print_info();
        assert!(record.get("loss").is_none());
        assert!(record.get("mean_reward").is_none());

        add(&mut agent, 1.0)?;
        agent.sample_and_improve(1)?;
        agent.reset_parameters();
        let record = agent.print_info();
        assert_eq!(record.get_scalar("num_games")?, 1.0);
        assert_eq!(record.get_scalar("mean_reward")?, 1.0);
        assert_eq!(record.get_scalar("num_iterations")?, 1.0);
        assert_eq!(recorder.len(), 2);
        Ok(())
    }
}
