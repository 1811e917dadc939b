use std::collections::HashSet;

/// Global dedup over board hashes. The set is flushed once it outgrows its
/// capacity: bounded memory at the cost of re-exploring a few states during
/// heavy fan-out. Collisions only cost duplicate work, never correctness.
pub(crate) struct VisitedSet {
    hashes: HashSet<u64>,
    capacity: usize,
}

impl VisitedSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            hashes: HashSet::new(),
            capacity: capacity.max(1_024),
        }
    }

    /// Returns `false` when the hash was already recorded.
    pub(crate) fn insert(&mut self, hash: u64) -> bool {
        if self.hashes.len() >= self.capacity {
            self.hashes.clear();
        }
        self.hashes.insert(hash)
    }

    pub(crate) fn len(&self) -> usize {
        self.hashes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::VisitedSet;

    #[test]
    fn repeated_hashes_are_rejected() {
        let mut visited = VisitedSet::new(4_096);
        assert!(visited.insert(7));
        assert!(!visited.insert(7));
        assert!(visited.insert(8));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn the_set_flushes_at_capacity() {
        let mut visited = VisitedSet::new(0);
        for hash in 0..1_024 {
            assert!(visited.insert(hash));
        }
        assert_eq!(visited.len(), 1_024);
        // The next insert trips the flush, so an old hash is accepted again.
        assert!(visited.insert(0));
        assert_eq!(visited.len(), 1);
    }
}
