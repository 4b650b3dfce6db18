use std::sync::Arc;

use hashbrown::HashMap;
use log::{debug, trace};

use super::dijkstra::ShortestPathTree;
use crate::NodeId;

/// Hit/miss counters of a [`ShortestPathCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    tree: Arc<ShortestPathTree>,
    last_used: u64,
}

/// Fixed-capacity LRU cache of shortest path trees keyed by source node.
///
/// Eviction scans for the oldest entry; capacities are sized to visit sets,
/// which are small.
#[derive(Debug, Clone)]
pub struct ShortestPathCache {
    capacity: usize,
    entries: HashMap<NodeId, CacheEntry>,
    clock: u64,
    stats: CacheStats,
}

impl ShortestPathCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Check whether `source` is cached without affecting access order.
    pub fn contains(&self, source: NodeId) -> bool {
        self.entries.contains_key(&source)
    }

    /// Returns the cached tree for `source`, marking it most recently used.
    pub fn get(&mut self, source: NodeId) -> Option<Arc<ShortestPathTree>> {
        self.clock += 1;
        let clock = self.clock;
        match self.entries.get_mut(&source) {
            Some(entry) => {
                entry.last_used = clock;
                self.stats.hits += 1;
                trace!("Shortest path cache hit for source {source}");
                Some(Arc::clone(&entry.tree))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Inserts a tree, evicting the least recently used one when full.
    pub fn put(&mut self, tree: Arc<ShortestPathTree>) {
        if self.capacity == 0 {
            return;
        }

        self.clock += 1;
        let source = tree.source();
        if !self.entries.contains_key(&source) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            source,
            CacheEntry {
                tree,
                last_used: self.clock,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(&source, _)| source);

        if let Some(source) = oldest {
            self.entries.remove(&source);
            self.stats.evictions += 1;
            debug!("Evicted shortest path tree of source {source}");
        }
    }
}
