//! Incremental cluster tracking for the button network.
//!
//! `ClusterForest` is a disjoint-set (union-find) over the buttons with path
//! compression and union by size. It keeps the size of the largest cluster
//! up to date on every union, so reading it after a step costs nothing.

use hashbrown::HashMap;

use crate::bn_interface::NodeId;

/// Outcome of tying two buttons together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// Two distinct clusters became one
    Joined { root: NodeId, size: usize },

    /// Both buttons were already in the same cluster
    AlreadyConnected,
}

#[derive(Debug, Clone)]
pub struct ClusterForest {
    parent: Vec<NodeId>,
    // only meaningful at roots
    size: Vec<usize>,
    clusters: usize,
    largest: usize,
}

impl ClusterForest {
    /// Every button starts as its own singleton cluster
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            clusters: n,
            largest: if n > 0 { 1 } else { 0 },
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the cluster containing `node`.
    ///
    /// Compresses the walked path so later lookups go straight to the root.
    pub fn find(&mut self, node: NodeId) -> NodeId {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = node;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Root lookup without path compression, for shared borrows
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    /// Merge the clusters of `a` and `b`; the smaller tree hangs under the larger
    pub fn union(&mut self, a: NodeId, b: NodeId) -> Merge {
        let mut root_a = self.find(a);
        let mut root_b = self.find(b);
        if root_a == root_b {
            return Merge::AlreadyConnected;
        }

        if self.size[root_a] < self.size[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }

        self.parent[root_b] = root_a;
        self.size[root_a] += self.size[root_b];
        self.clusters -= 1;

        let size = self.size[root_a];
        if size > self.largest {
            self.largest = size;
        }

        Merge::Joined { root: root_a, size }
    }

    pub fn connected(&self, a: NodeId, b: NodeId) -> bool {
        self.root_of(a) == self.root_of(b)
    }

    /// Size of the cluster containing `node`
    pub fn size_of(&self, node: NodeId) -> usize {
        self.size[self.root_of(node)]
    }

    /// Size of the largest cluster
    pub fn largest(&self) -> usize {
        self.largest
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters
    }

    /// Census of all clusters, keyed by root
    pub fn sizes(&self) -> HashMap<NodeId, usize> {
        let mut census = HashMap::with_capacity(self.clusters);
        for node in 0..self.parent.len() {
            if self.parent[node] == node {
                census.insert(node, self.size[node]);
            }
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_forest_is_all_singletons() {
        let forest = ClusterForest::new(5);
        assert_eq!(forest.len(), 5);
        assert_eq!(forest.cluster_count(), 5);
        assert_eq!(forest.largest(), 1);
        for node in 0..5 {
            assert_eq!(forest.size_of(node), 1);
            assert_eq!(forest.root_of(node), node);
        }
    }

    #[test]
    fn test_union_joins_and_tracks_largest() {
        let mut forest = ClusterForest::new(6);

        assert!(matches!(forest.union(0, 1), Merge::Joined { size: 2, .. }));
        assert!(matches!(forest.union(2, 3), Merge::Joined { size: 2, .. }));
        assert_eq!(forest.largest(), 2);

        assert!(matches!(forest.union(1, 3), Merge::Joined { size: 4, .. }));
        assert_eq!(forest.largest(), 4);
        assert_eq!(forest.cluster_count(), 3);
        assert!(forest.connected(0, 2));
        assert!(!forest.connected(0, 5));
    }

    #[test]
    fn test_redundant_union_is_noop() {
        let mut forest = ClusterForest::new(3);
        forest.union(0, 1);
        forest.union(1, 2);

        assert_eq!(forest.union(0, 2), Merge::AlreadyConnected);
        assert_eq!(forest.union(2, 2), Merge::AlreadyConnected);
        assert_eq!(forest.cluster_count(), 1);
        assert_eq!(forest.largest(), 3);
    }

    #[test]
    fn test_smaller_cluster_hangs_under_larger() {
        let mut forest = ClusterForest::new(4);
        forest.union(0, 1);
        forest.union(0, 2);
        let big_root = forest.find(0);

        match forest.union(3, 0) {
            Merge::Joined { root, size } => {
                assert_eq!(root, big_root);
                assert_eq!(size, 4);
            }
            Merge::AlreadyConnected => panic!("expected a join"),
        }
    }

    #[test]
    fn test_find_compresses_path() {
        let mut forest = ClusterForest::new(4);
        // build a chain by hand: 3 -> 2 -> 1 -> 0
        forest.parent = vec![0, 0, 1, 2];
        forest.size = vec![4, 1, 1, 1];

        assert_eq!(forest.find(3), 0);
        assert_eq!(forest.parent[3], 0);
        assert_eq!(forest.parent[2], 0);
    }

    #[test]
    fn test_sizes_census() {
        let mut forest = ClusterForest::new(5);
        forest.union(0, 4);
        forest.union(1, 2);
        let census = forest.sizes();

        assert_eq!(census.len(), 3);
        assert_eq!(census.values().sum::<usize>(), 5);
        assert_eq!(census.get(&forest.root_of(4)), Some(&2));
    }

    proptest! {
        #[test]
        fn prop_running_max_matches_census(
            n in 2usize..60,
            pairs in proptest::collection::vec((0usize..60, 0usize..60), 0..120)
        ) {
            let mut forest = ClusterForest::new(n);
            for (a, b) in pairs {
                forest.union(a % n, b % n);

                let census = forest.sizes();
                prop_assert_eq!(census.values().sum::<usize>(), n);
                prop_assert_eq!(census.len(), forest.cluster_count());
                prop_assert_eq!(census.values().copied().max().unwrap_or(0), forest.largest());
            }
        }
    }
}
