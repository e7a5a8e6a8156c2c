//! A one-dimensional corridor with a demonstrator walking to the goal.
use anyhow::Result;
use hadqn_core::{error::HadqnError, Env, Obs, Step, StepInfo};
use ndarray::{ArrayD, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const LEFT: usize = 0;
const RIGHT: usize = 2;

/// Configuration of [`Corridor`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CorridorConfig {
    /// Number of cells.
    pub len: usize,

    /// Maximum number of steps in a game.
    pub max_steps: usize,

    /// Reward of a step not ending the game, negated.
    pub step_cost: f32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            len: 9,
            max_steps: 50,
            step_cost: 0.01,
        }
    }
}

/// Cells `0..len`, the goal at the right end.
///
/// Actions are left, stay and right. Reaching the goal gives `+1`,
/// stepping off the left end gives `-1` and is a catastrophe. Both end the game.
/// The demonstrator always walks right and `human_reward` is the reward its
/// action earns from the current cell. Observations are one-hot vectors of
/// the cell.
pub struct Corridor {
    len: usize,
    max_steps: usize,
    step_cost: f32,
    pos: usize,
    t: usize,
    rng: StdRng,
}

impl Corridor {
    fn obs(&self) -> Obs {
        let mut obs: Obs = ArrayD::zeros(IxDyn(&[self.len]));
        let ix: &[usize] = &[self.pos];
        obs[ix] = 1.0;
        obs
    }

    /// The next cell, or `None` when stepping off the left end.
    fn next_pos(&self, a: usize) -> Option<usize> {
        (self.pos + a).checked_sub(1)
    }

    fn reward(&self, next_pos: Option<usize>) -> (f32, bool) {
        match next_pos {
            None => (-1.0, true),
            Some(p) if p == self.len - 1 => (1.0, true),
            Some(_) => (-self.step_cost, false),
        }
    }
}

impl Env for Corridor {
    type Config = CorridorConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.len < 3 || config.max_steps == 0 {
            return Err(HadqnError::InvalidConfig(format!(
                "corridor needs len >= 3 and max_steps > 0, got {:?}",
                config
            ))
            .into());
        }

        Ok(Self {
            len: config.len,
            max_steps: config.max_steps,
            step_cost: config.step_cost,
            pos: config.len / 2,
            t: 0,
            rng: StdRng::seed_from_u64(seed as u64),
        })
    }

    /// Starts a game in a random cell other than the goal.
    fn reset(&mut self) -> Result<Obs> {
        self.pos = self.rng.gen_range(0..self.len - 1);
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, a: usize) -> Result<Step> {
        if a > RIGHT {
            return Err(HadqnError::ActionOutOfRange {
                action: a,
                n_actions: self.n_actions(),
            }
            .into());
        }

        let (human_reward, _) = self.reward(self.next_pos(RIGHT));
        let next_pos = self.next_pos(a);
        let (reward, is_done) = self.reward(next_pos);
        self.pos = next_pos.unwrap_or(0);
        self.t += 1;

        let info = StepInfo {
            human_action: RIGHT,
            human_reward,
            is_catastrophe: next_pos.is_none(),
        };
        let is_done = is_done || self.t >= self.max_steps;

        Ok(Step::new(self.obs(), reward, is_done, info))
    }

    fn n_actions(&self) -> usize {
        3
    }

    fn obs_shape(&self) -> Vec<usize> {
        vec![self.len]
    }
}
