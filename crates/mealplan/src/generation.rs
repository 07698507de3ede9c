use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

/// Ticket taken before a mutation is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    generation: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Latest issued generation per mutation key, e.g. `servings:{entry id}`.
///
/// A response is applied only when its ticket is still the latest one for
/// its key; responses to superseded mutations are discarded.
#[derive(Clone, Default)]
pub struct Generations {
    counter: Arc<AtomicU64>,
    latest: Arc<Mutex<HashMap<String, u64>>>,
}

impl Generations {
    fn latest(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn issue(&self, key: impl Into<String>) -> Ticket {
        let key = key.into();
        let generation = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest().insert(key.clone(), generation);

        Ticket { key, generation }
    }

    /// Returns whether `ticket` was still current, and forgets the key if so.
    pub fn settle(&self, ticket: &Ticket) -> bool {
        let mut latest = self.latest();
        if latest.get(&ticket.key) != Some(&ticket.generation) {
            return false;
        }

        latest.remove(&ticket.key);
        true
    }

    pub fn pending(&self) -> usize {
        self.latest().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_ticket_supersedes_earlier() {
        let generations = Generations::default();
        let first = generations.issue("e1");
        let second = generations.issue("e1");

        assert!(generations.settle(&second));
        assert!(!generations.settle(&first));
        assert_eq!(generations.pending(), 0);
    }

    #[test]
    fn keys_are_independent() {
        let generations = Generations::default();
        let a = generations.issue("e1");
        let b = generations.issue("e2");

        assert!(generations.settle(&b));
        assert!(generations.settle(&a));
    }

    #[test]
    fn ticket_settles_once() {
        let generations = Generations::default();
        let ticket = generations.issue("e1");

        assert!(generations.settle(&ticket));
        assert!(!generations.settle(&ticket));
    }
}
