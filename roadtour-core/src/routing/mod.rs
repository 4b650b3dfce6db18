//! Single-source shortest path engine over the road graph.

mod cache;
pub mod dijkstra;
mod router;

pub use cache::{CacheStats, ShortestPathCache};
pub use dijkstra::{ShortestPathTree, shortest_path_tree};
pub use router::{DEFAULT_CACHE_CAPACITY, Route, Router};
