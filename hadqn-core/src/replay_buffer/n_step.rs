//! Folding of consecutive transitions into multi-step transitions.
use crate::Transition;
use std::collections::VecDeque;

/// A sliding window over the latest transitions of an episode.
///
/// When the window holds `n` transitions, its oldest transition is emitted
/// with the discounted sums `sum_{k<n} gamma^k r_k` of both `reward` and
/// `human_reward`, and with `next_state` and `done` of the newest one. A
/// transition with `done == true` flushes the whole window, each pending
/// transition emitted with its truncated return.
pub struct NStepWindow {
    n: usize,
    gamma: f32,
    pending: VecDeque<Transition>,
}

impl NStepWindow {
    /// Constructs a window folding `n` steps.
    pub fn new(n: usize, gamma: f32) -> Self {
        Self {
            n,
            gamma,
            pending: VecDeque::with_capacity(n),
        }
    }

    /// The number of transitions not emitted yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Pushes a transition and returns the transitions completed by it.
    pub fn push(&mut self, tr: Transition) -> Vec<Transition> {
        if self.n == 1 {
            return vec![tr];
        }

        let done = tr.done();
        self.pending.push_back(tr);

        let mut out = vec![];
        if done {
            while !self.pending.is_empty() {
                out.push(self.fold_front());
                self.pending.pop_front();
            }
        } else if self.pending.len() == self.n {
            out.push(self.fold_front());
            self.pending.pop_front();
        }
        out
    }

    fn fold_front(&self) -> Transition {
        let mut discount = 1f32;
        let mut reward = 0f32;
        let mut human_reward = 0f32;
        for tr in self.pending.iter() {
            reward += discount * tr.reward();
            human_reward += discount * tr.human_reward();
            discount *= self.gamma;
        }

        // Both are non-empty when this method is called
        let first = &self.pending[0];
        let last = &self.pending[self.pending.len() - 1];
        first.fold(last.next_state().clone(), reward, last.done(), human_reward)
    }
}
