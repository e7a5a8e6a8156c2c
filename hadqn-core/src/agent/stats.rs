//! Statistics of a training run.
use std::time::Instant;

/// Number of the latest games averaged in the reported mean reward.
pub const REWARD_WINDOW: usize = 40;

/// Counters and per-game accumulators of a training run.
///
/// Cumulative counters and the reward history live for the whole run,
/// per-game values are cleared at every episode boundary.
#[derive(Debug, Clone)]
pub struct TrainingStats {
    pub(super) num_iterations: usize,
    pub(super) num_games: usize,
    pub(super) total_reward: f32,
    pub(super) rewards: Vec<f32>,
    pub(super) total_loss: Vec<f32>,
    pub(super) num_catastrophe: usize,
    pub(super) ts_frame: usize,
    pub(super) ts: Instant,
}

impl Default for TrainingStats {
    fn default() -> Self {
        Self {
            num_iterations: 0,
            num_games: 0,
            total_reward: 0.0,
            rewards: vec![],
            total_loss: vec![],
            num_catastrophe: 0,
            ts_frame: 0,
            ts: Instant::now(),
        }
    }
}

fn mean(xs: &[f32]) -> Option<f32> {
    match xs.len() {
        0 => None,
        n => Some(xs.iter().sum::<f32>() / n as f32),
    }
}

impl TrainingStats {
    /// Cumulative number of environment steps.
    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Number of completed games.
    pub fn num_games(&self) -> usize {
        self.num_games
    }

    /// Cumulative human reward of the current game.
    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    /// Cumulative rewards of the completed games.
    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    /// Losses of the optimization steps in the current game.
    pub fn total_loss(&self) -> &[f32] {
        &self.total_loss
    }

    /// Number of catastrophes in the current game.
    pub fn num_catastrophe(&self) -> usize {
        self.num_catastrophe
    }

    /// Mean reward of the latest [`REWARD_WINDOW`] games.
    pub fn mean_reward(&self) -> Option<f32> {
        let start = self.rewards.len().saturating_sub(REWARD_WINDOW);
        mean(&self.rewards[start..])
    }

    /// Mean loss of the current game.
    pub fn mean_loss(&self) -> Option<f32> {
        mean(&self.total_loss)
    }

    /// Environment steps per second since the last call, then resets the cursor.
    pub(super) fn take_fps(&mut self) -> f32 {
        let now = Instant::now();
        let secs = now.duration_since(self.ts).as_secs_f32();
        let frames = (self.num_iterations - self.ts_frame) as f32;
        self.ts_frame = self.num_iterations;
        self.ts = now;
        if secs > 0.0 {
            frames / secs
        } else {
            0.0
        }
    }

    /// Closes the current game.
    pub(super) fn reset_game(&mut self) {
        self.rewards.push(self.total_reward);
        self.total_reward = 0.0;
        self.num_games += 1;
        self.total_loss.clear();
        self.num_catastrophe = 0;
    }
}
