//! Bounded experience buffer shared by a learner and its self-play mirror.

use std::sync::Arc;

use game_core::{Action, MatchState, Side};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::AgentError;

/// One observed step: acting from `state` with `action` led to `new_state`.
#[derive(Debug, Clone)]
pub struct Transition {
    pub side: Side,
    pub state: Arc<MatchState>,
    pub action: Action,
    pub new_state: Arc<MatchState>,
    pub reward: f32,
}

impl Transition {
    pub fn new(
        side: Side,
        state: Arc<MatchState>,
        action: Action,
        new_state: Arc<MatchState>,
        reward: f32,
    ) -> Self {
        Self {
            side,
            state,
            action,
            new_state,
            reward,
        }
    }
}

/// Ring buffer of transitions. Once full, each push overwrites the oldest slot.
#[derive(Debug)]
pub struct ReplayMemory {
    slots: Vec<Transition>,
    capacity: usize,
    position: usize,
}

impl ReplayMemory {
    pub const DEFAULT_CAPACITY: usize = 2000;

    pub fn new(capacity: usize) -> Result<Self, AgentError> {
        if capacity == 0 {
            return Err(AgentError::config("memory_capacity", "must be at least 1"));
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            position: 0,
        })
    }

    pub fn push(&mut self, transition: Transition) {
        if self.slots.len() < self.capacity {
            self.slots.push(transition);
        } else {
            self.slots[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.slots.iter()
    }

    /// Draw `n` distinct stored transitions uniformly at random.
    ///
    /// Callers clamp `n` to [`len`](Self::len); asking for more is an error.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Transition>, AgentError> {
        if n > self.slots.len() {
            return Err(AgentError::SampleOutOfRange {
                requested: n,
                stored: self.slots.len(),
            });
        }
        Ok(self.slots.choose_multiple(rng, n).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Config, MatchEngine};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transition(reward: f32) -> Transition {
        let state = Arc::new(MatchEngine::new(Config::new(), 1).unwrap().snapshot());
        Transition::new(Side::Left, state.clone(), Action::Stay, state, reward)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ReplayMemory::new(0),
            Err(AgentError::InvalidConfig {
                field: "memory_capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_push_until_full_then_overwrite_oldest() {
        let mut memory = ReplayMemory::new(3).unwrap();
        for i in 0..3 {
            memory.push(transition(i as f32));
        }
        assert_eq!(memory.len(), 3);

        memory.push(transition(10.0));
        assert_eq!(memory.len(), 3, "Size stays at capacity");
        let rewards: Vec<f32> = memory.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![10.0, 1.0, 2.0], "Oldest slot overwritten");

        memory.push(transition(11.0));
        let rewards: Vec<f32> = memory.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![10.0, 11.0, 2.0]);
    }

    #[test]
    fn test_sample_before_full_uses_stored_only() {
        let mut memory = ReplayMemory::new(100).unwrap();
        memory.push(transition(1.0));
        memory.push(transition(2.0));
        let mut rng = StdRng::seed_from_u64(4);

        let sample = memory.sample(2, &mut rng).unwrap();
        let mut rewards: Vec<f32> = sample.iter().map(|t| t.reward).collect();
        rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(rewards, vec![1.0, 2.0], "Sampled without replacement");
    }

    #[test]
    fn test_sample_more_than_stored_fails() {
        let mut memory = ReplayMemory::new(10).unwrap();
        memory.push(transition(0.0));
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            memory.sample(2, &mut rng).unwrap_err(),
            AgentError::SampleOutOfRange {
                requested: 2,
                stored: 1
            }
        );
        assert!(memory.sample(0, &mut rng).unwrap().is_empty());
    }
}
