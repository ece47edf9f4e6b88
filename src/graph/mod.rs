pub mod adjacency;
pub mod link_graph;

pub use adjacency::CsrMatrix;
pub use link_graph::{EdgeList, GraphOptions, LinkGraph};
