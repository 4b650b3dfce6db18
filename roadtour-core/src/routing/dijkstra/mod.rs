mod state;
mod tree;

pub use tree::{ShortestPathTree, shortest_path_tree};
