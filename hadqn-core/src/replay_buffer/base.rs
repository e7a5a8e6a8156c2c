//! Simple replay buffer.
use super::{NStepWindow, SimpleReplayBufferConfig};
use crate::{error::HadqnError, ReplayBufferBase, Transition, TransitionBatch};
use anyhow::Result;
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A ring buffer of [`Transition`]s with uniform sampling.
///
/// Transitions pass through an [`NStepWindow`] before being stored, so with
/// `multi_step > 1` the buffer lags behind the pushed transitions by up to
/// `multi_step - 1` entries until an episode ends. When the buffer is full,
/// the oldest transition is overwritten.
pub struct SimpleReplayBuffer {
    capacity: usize,
    minimum: usize,
    i: usize,
    buf: Vec<Transition>,
    window: NStepWindow,
    rng: StdRng,
}

impl SimpleReplayBuffer {
    fn store(&mut self, tr: Transition) {
        if self.buf.len() < self.capacity {
            self.buf.push(tr);
        } else {
            self.buf[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
    }

    /// The maximum number of stored transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an iterator over the stored transitions in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.buf.iter()
    }
}

impl ReplayBufferBase for SimpleReplayBuffer {
    type Config = SimpleReplayBufferConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            capacity: config.capacity,
            minimum: config.minimum,
            i: 0,
            buf: Vec::with_capacity(config.capacity),
            window: NStepWindow::new(config.multi_step, config.gamma),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn push(&mut self, tr: Transition) -> Result<()> {
        for tr in self.window.push(tr) {
            self.store(tr);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn minimum(&self) -> usize {
        self.minimum
    }

    fn batch(&mut self, size: usize) -> Result<TransitionBatch> {
        if self.buf.is_empty() {
            return Err(HadqnError::EmptyReplayBuffer.into());
        }

        let n = self.buf.len();
        let mut batch = TransitionBatch::with_capacity(size);
        for _ in 0..size {
            let ix = self.rng.gen_range(0..n);
            batch.push(&self.buf[ix]);
        }
        trace!("Sampled {} transitions from {}", size, n);

        Ok(batch)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn tr(i: usize, done: bool) -> Transition {
        let obs = |v: f32| ArrayD::from_elem(IxDyn(&[2]), v);
        Transition::new(obs(i as f32), i % 3, obs(i as f32 + 1.0), 1.0, done, 0, 1.0)
    }

    fn config(capacity: usize, minimum: usize) -> SimpleReplayBufferConfig {
        SimpleReplayBufferConfig::default()
            .capacity(capacity)
            .minimum(minimum)
    }

    #[test]
    fn test_build_rejects_inconsistent_config() {
        assert!(SimpleReplayBuffer::build(&config(4, 5)).is_err());
    }

    #[test]
    fn test_capacity_evicts_oldest() -> Result<()> {
        let mut buffer = SimpleReplayBuffer::build(&config(3, 0))?;
        for i in 0..5 {
            buffer.push(tr(i, false))?;
        }
        assert_eq!(buffer.len(), 3);

        let mut states = buffer
            .iter()
            .map(|tr| tr.state().iter().copied().next().unwrap() as usize)
            .collect::<Vec<_>>();
        states.sort();
        assert_eq!(states, vec![2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_is_warm_is_strict() -> Result<()> {
        let mut buffer = SimpleReplayBuffer::build(&config(10, 2))?;
        buffer.push(tr(0, false))?;
        buffer.push(tr(1, false))?;
        assert!(!buffer.is_warm());
        buffer.push(tr(2, false))?;
        assert!(buffer.is_warm());
        Ok(())
    }

    #[test]
    fn test_batch_has_requested_size() -> Result<()> {
        let mut buffer = SimpleReplayBuffer::build(&config(10, 0))?;
        for i in 0..4 {
            buffer.push(tr(i, i == 3))?;
        }
        let batch = buffer.batch(7)?;
        assert_eq!(batch.len(), 7);
        assert_eq!(batch.states.len(), 7);
        assert_eq!(batch.human_rewards.len(), 7);
        Ok(())
    }

    #[test]
    fn test_empty_batch_is_error() -> Result<()> {
        let mut buffer = SimpleReplayBuffer::build(&config(10, 0))?;
        assert!(buffer.batch(1).is_err());
        Ok(())
    }

    #[test]
    fn test_multi_step_lags_until_done() -> Result<()> {
        let config = config(10, 0).multi_step(3).gamma(1.0);
        let mut buffer = SimpleReplayBuffer::build(&config)?;
        buffer.push(tr(0, false))?;
        buffer.push(tr(1, false))?;
        assert_eq!(buffer.len(), 0);
        buffer.push(tr(2, false))?;
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.iter().next().unwrap().reward(), 3.0);
        buffer.push(tr(3, true))?;
        assert_eq!(buffer.len(), 4);
        Ok(())
    }
}
