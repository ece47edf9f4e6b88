use rand_pcg::Pcg64;
use crate::algorithms::EnclosingSubgraph;
use crate::graph::LinkGraph;
use crate::error::Result;

/// A strategy that extracts the enclosing subgraph around a candidate link.
///
/// Implementations must only read `graph`; all randomness comes from `rng`.
pub trait SubgraphSampler: Send + Sync {
    fn sample(
        &self,
        graph: &LinkGraph,
        src: usize,
        dst: usize,
        y: i64,
        rng: &mut Pcg64,
    ) -> Result<EnclosingSubgraph>;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "Enclosing subgraph sampler"
    }
}
