pub mod traits;
pub mod subgraph;
pub mod fringe;
pub mod khop;
pub mod random_walk;
pub mod shortest_path;

pub use traits::SubgraphSampler;
pub use subgraph::EnclosingSubgraph;
pub use fringe::{neighbors, Direction, FringeSampler};
pub use khop::KHopSampler;
pub use random_walk::{RandomWalkParams, RandomWalkSampler};
pub use shortest_path::{unweighted_distances, NodeRemoval};
