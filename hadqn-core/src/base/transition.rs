//! Transition record and batches of them.
use super::Obs;

/// A single environment step stored in a replay buffer.
///
/// Fields are only readable after construction; a transition never changes
/// once it is pushed into a buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    state: Obs,
    action: usize,
    next_state: Obs,
    reward: f32,
    done: bool,
    human_action: usize,
    human_reward: f32,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(
        state: Obs,
        action: usize,
        next_state: Obs,
        reward: f32,
        done: bool,
        human_action: usize,
        human_reward: f32,
    ) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
            done,
            human_action,
            human_reward,
        }
    }

    /// `o_t`.
    pub fn state(&self) -> &Obs {
        &self.state
    }

    /// `a_t`, taken by the agent.
    pub fn action(&self) -> usize {
        self.action
    }

    /// `o_t+1`.
    pub fn next_state(&self) -> &Obs {
        &self.next_state
    }

    /// `r_t`.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// Terminal flag.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Action of the human demonstrator in `o_t`.
    pub fn human_action(&self) -> usize {
        self.human_action
    }

    /// Reward attributed to the human trajectory.
    pub fn human_reward(&self) -> f32 {
        self.human_reward
    }

    /// Returns a copy with the return and the end of a multi-step window.
    pub(crate) fn fold(
        &self,
        next_state: Obs,
        reward: f32,
        done: bool,
        human_reward: f32,
    ) -> Self {
        Self {
            state: self.state.clone(),
            action: self.action,
            next_state,
            reward,
            done,
            human_action: self.human_action,
            human_reward,
        }
    }
}

/// A batch of transitions split into seven parallel arrays.
#[derive(Clone, Debug, Default)]
pub struct TransitionBatch {
    /// `o_t`.
    pub states: Vec<Obs>,

    /// `a_t`.
    pub actions: Vec<usize>,

    /// `o_t+1`.
    pub next_states: Vec<Obs>,

    /// `r_t`.
    pub rewards: Vec<f32>,

    /// Terminal flags.
    pub dones: Vec<bool>,

    /// Actions of the human demonstrator.
    pub human_actions: Vec<usize>,

    /// Rewards attributed to the human trajectory.
    pub human_rewards: Vec<f32>,
}

impl TransitionBatch {
    /// Constructs an empty batch with the given capacity.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            dones: Vec::with_capacity(n),
            human_actions: Vec::with_capacity(n),
            human_rewards: Vec::with_capacity(n),
        }
    }

    /// Appends a transition to the batch.
    pub fn push(&mut self, tr: &Transition) {
        self.states.push(tr.state.clone());
        self.actions.push(tr.action);
        self.next_states.push(tr.next_state.clone());
        self.rewards.push(tr.reward);
        self.dones.push(tr.done);
        self.human_actions.push(tr.human_action);
        self.human_rewards.push(tr.human_reward);
    }

    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch has no transitions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Unpack the data `(o_t, a_t, o_t+1, r_t, done_t, a^H_t, r^H_t)`.
    #[allow(clippy::type_complexity)]
    pub fn unpack(
        self,
    ) -> (
        Vec<Obs>,
        Vec<usize>,
        Vec<Obs>,
        Vec<f32>,
        Vec<bool>,
        Vec<usize>,
        Vec<f32>,
    ) {
        (
            self.states,
            self.actions,
            self.next_states,
            self.rewards,
            self.dones,
            self.human_actions,
            self.human_rewards,
        )
    }
}

impl FromIterator<Transition> for TransitionBatch {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        let mut batch = TransitionBatch::default();
        for tr in iter {
            batch.push(&tr);
        }
        batch
    }
}
