use hashbrown::HashSet;

use crate::bn_interface::{NodeId, ThreadCount};

/// An undirected thread, stored with the smaller button first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Thread {
    pub a: NodeId,
    pub b: NodeId,
}

impl Thread {
    pub fn new(x: NodeId, y: NodeId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Every thread tied so far, duplicates included.
///
/// Grows monotonically. Tying the same pair twice counts twice.
#[derive(Debug, Clone, Default)]
pub struct ThreadLedger {
    threads: Vec<Thread>,
    distinct: HashSet<Thread>,
}

impl ThreadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a thread; returns true when this pair was tied for the first time
    pub fn tie(&mut self, x: NodeId, y: NodeId) -> bool {
        let thread = Thread::new(x, y);
        self.threads.push(thread);
        self.distinct.insert(thread)
    }

    pub fn count(&self) -> ThreadCount {
        self.threads.len() as ThreadCount
    }

    pub fn distinct_count(&self) -> usize {
        self.distinct.len()
    }

    /// Threads that re-tie an already tied pair
    pub fn redundant_count(&self) -> ThreadCount {
        self.count() - self.distinct.len() as ThreadCount
    }

    pub fn contains(&self, x: NodeId, y: NodeId) -> bool {
        self.distinct.contains(&Thread::new(x, y))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Thread> {
        self.threads.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_is_undirected() {
        assert_eq!(Thread::new(4, 1), Thread::new(1, 4));
        assert_eq!(Thread::new(4, 1).a, 1);
    }

    #[test]
    fn test_duplicates_counted_separately() {
        let mut ledger = ThreadLedger::new();
        assert!(ledger.tie(0, 1));
        assert!(!ledger.tie(1, 0));
        assert!(ledger.tie(2, 3));

        assert_eq!(ledger.count(), 3);
        assert_eq!(ledger.distinct_count(), 2);
        assert_eq!(ledger.redundant_count(), 1);
        assert!(ledger.contains(3, 2));
        assert!(!ledger.contains(0, 2));
        assert_eq!(ledger.iter().count(), 3);
    }
}
