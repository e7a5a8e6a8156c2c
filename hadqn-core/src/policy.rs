//! Epsilon-greedy action selection.
use crate::{error::HadqnError, Obs, QLearner};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Linear decay of the exploration rate over environment steps.
///
/// `epsilon(k) = clamp(eps_start - k / eps_decay, eps_end, eps_start)`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub struct EpsilonSchedule {
    eps_start: f64,
    eps_end: f64,
    eps_decay: f64,
}

impl EpsilonSchedule {
    /// Constructs a schedule, checking `0 <= eps_end <= eps_start <= 1`
    /// and `eps_decay > 0`.
    pub fn new(eps_start: f64, eps_end: f64, eps_decay: f64) -> Result<Self, HadqnError> {
        if !(eps_decay > 0.0) {
            return Err(HadqnError::InvalidConfig(format!(
                "eps_decay must be positive, got {}",
                eps_decay
            )));
        }
        if !(0.0..=1.0).contains(&eps_start) || !(0.0..=1.0).contains(&eps_end) {
            return Err(HadqnError::InvalidConfig(format!(
                "epsilons must be in [0, 1], got eps_start = {}, eps_end = {}",
                eps_start, eps_end
            )));
        }
        if eps_end > eps_start {
            return Err(HadqnError::InvalidConfig(format!(
                "eps_end {} is larger than eps_start {}",
                eps_end, eps_start
            )));
        }

        Ok(Self {
            eps_start,
            eps_end,
            eps_decay,
        })
    }

    /// Exploration rate after `num_iterations` environment steps.
    pub fn epsilon(&self, num_iterations: usize) -> f64 {
        (self.eps_start - num_iterations as f64 / self.eps_decay)
            .max(self.eps_end)
            .min(self.eps_start)
    }

    /// Initial exploration rate.
    pub fn eps_start(&self) -> f64 {
        self.eps_start
    }

    /// Final exploration rate.
    pub fn eps_end(&self) -> f64 {
        self.eps_end
    }
}

/// Policy controller turning action values into actions.
///
/// This is the only source of exploration in the training loop.
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: SmallRng,
}

impl EpsilonGreedy {
    /// Constructs the controller with an initial exploration rate.
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self {
            epsilon,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sets the exploration rate.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// The action with the maximal action value under the moving network.
    pub fn select_greedy_action<L: QLearner>(&self, learner: &L, obs: &Obs) -> Result<usize> {
        learner.greedy_action(obs)
    }

    /// Takes a uniformly random action with probability epsilon, otherwise
    /// the greedy action.
    pub fn select_eps_greedy_action<L: QLearner>(
        &mut self,
        learner: &L,
        obs: &Obs,
    ) -> Result<usize> {
        let u: f64 = self.rng.gen();
        if u < self.epsilon {
            Ok(self.rng.gen_range(0..learner.n_actions()))
        } else {
            self.select_greedy_action(learner, obs)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TransitionBatch;
    use ndarray::{ArrayD, IxDyn};

    /// Learner whose greedy action is fixed.
    struct FixedLearner {
        n_actions: usize,
        best: usize,
    }

    impl QLearner for FixedLearner {
        fn n_actions(&self) -> usize {
            self.n_actions
        }

        fn greedy_action(&self, _obs: &Obs) -> Result<usize> {
            Ok(self.best)
        }

        fn improve(&mut self, _batch: TransitionBatch) -> Result<f32> {
            Ok(0.0)
        }

        fn update_target(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn obs() -> Obs {
        ArrayD::zeros(IxDyn(&[4]))
    }

    #[test]
    fn test_epsilon_closed_form() -> Result<()> {
        let schedule = EpsilonSchedule::new(1.0, 0.02, 100.0)?;
        assert_eq!(schedule.epsilon(0), 1.0);
        assert!((schedule.epsilon(50) - 0.5).abs() < 1e-12);
        assert_eq!(schedule.epsilon(98), 0.02);
        assert_eq!(schedule.epsilon(10_000), 0.02);
        Ok(())
    }

    #[test]
    fn test_epsilon_is_non_increasing() -> Result<()> {
        let schedule = EpsilonSchedule::new(0.9, 0.05, 37.0)?;
        let mut prev = schedule.epsilon(0);
        for k in 1..200 {
            let eps = schedule.epsilon(k);
            assert!(eps <= prev);
            assert!(eps >= 0.05 && eps <= 0.9);
            prev = eps;
        }
        Ok(())
    }

    #[test]
    fn test_invalid_schedules() {
        assert!(EpsilonSchedule::new(1.0, 0.1, 0.0).is_err());
        assert!(EpsilonSchedule::new(1.0, 0.1, -3.0).is_err());
        assert!(EpsilonSchedule::new(0.1, 0.5, 10.0).is_err());
        assert!(EpsilonSchedule::new(1.5, 0.5, 10.0).is_err());
    }

    #[test]
    fn test_zero_epsilon_is_greedy() -> Result<()> {
        let learner = FixedLearner {
            n_actions: 6,
            best: 4,
        };
        let mut policy = EpsilonGreedy::new(0.0, 0);
        for _ in 0..1000 {
            assert_eq!(policy.select_eps_greedy_action(&learner, &obs())?, 4);
        }
        assert_eq!(policy.select_greedy_action(&learner, &obs())?, 4);
        Ok(())
    }

    #[test]
    fn test_unit_epsilon_is_uniform() -> Result<()> {
        let n_actions = 4;
        let n_trials = 40_000;
        let learner = FixedLearner { n_actions, best: 0 };
        let mut policy = EpsilonGreedy::new(1.0, 7);
        let mut counts = vec![0usize; n_actions];
        for _ in 0..n_trials {
            counts[policy.select_eps_greedy_action(&learner, &obs())?] += 1;
        }
        for c in counts {
            let freq = c as f64 / n_trials as f64;
            assert!((freq - 0.25).abs() < 0.02, "frequency {} is far from 1/4", freq);
        }
        Ok(())
    }
}
