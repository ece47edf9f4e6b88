use crate::algorithms::{unweighted_distances, NodeRemoval};
use crate::graph::CsrMatrix;
use crate::error::{GraphError, Result};

type Distances = Vec<Option<u32>>;

/// Order the anchor pair so that `src < dst`
fn canonical_pair(adjacency: &CsrMatrix, src: usize, dst: usize) -> Result<(usize, usize)> {
    if src == dst {
        return Err(GraphError::InvalidLinkPair { src, dst });
    }
    let n = adjacency.shape().0;
    for node in [src, dst] {
        if node >= n {
            return Err(GraphError::node_not_found(node.to_string()));
        }
    }
    Ok(if src > dst { (dst, src) } else { (src, dst) })
}

/// Distances to `src` with `dst` deleted and to `dst` with `src` deleted.
/// The deleted anchor gets distance 0 in each vector.
fn masked_distances(adjacency: &CsrMatrix, src: usize, dst: usize) -> Result<(Distances, Distances)> {
    let n = adjacency.shape().0;
    let without_src = NodeRemoval::new(src, n)?;
    let without_dst = NodeRemoval::new(dst, n)?;

    let adj_wo_src = adjacency.submatrix(&without_src.kept_nodes())?;
    let adj_wo_dst = adjacency.submatrix(&without_dst.kept_nodes())?;

    let src_reduced = without_dst.to_reduced(src)
        .ok_or_else(|| GraphError::algorithm("Source removed from its own distance view"))?;
    let dst_reduced = without_src.to_reduced(dst)
        .ok_or_else(|| GraphError::algorithm("Destination removed from its own distance view"))?;

    let dist2src = without_dst.reinsert(unweighted_distances(&adj_wo_dst, &[src_reduced])?, Some(0));
    let dist2dst = without_src.reinsert(unweighted_distances(&adj_wo_src, &[dst_reduced])?, Some(0));

    Ok((dist2src, dist2dst))
}

/// `1 + min(ds, dt) + (d/2) * (d/2 + d%2 - 1)` with `d = ds + dt`
pub fn drnl_hash(dist2src: u32, dist2dst: u32) -> i64 {
    let d = dist2src as i64 + dist2dst as i64;
    let (half, rem) = (d / 2, d % 2);
    1 + dist2src.min(dist2dst) as i64 + half * (half + rem - 1)
}

/// Double-radius node labeling.
///
/// Anchors get label 1; nodes unreachable from either anchor get 0.
pub fn drnl_node_labeling(adjacency: &CsrMatrix, src: usize, dst: usize) -> Result<Vec<i64>> {
    let (src, dst) = canonical_pair(adjacency, src, dst)?;
    let (dist2src, dist2dst) = masked_distances(adjacency, src, dst)?;

    let mut z: Vec<i64> = dist2src
        .iter()
        .zip(&dist2dst)
        .map(|pair| match pair {
            (Some(ds), Some(dt)) => drnl_hash(*ds, *dt),
            _ => 0,
        })
        .collect();
    z[src] = 1;
    z[dst] = 1;

    Ok(z)
}

fn cap(distance: Option<u32>, max_dist: u32) -> i64 {
    match distance {
        Some(d) => d.min(max_dist) as i64,
        None => max_dist as i64 + 1,
    }
}

/// Distance encoding: `[d(src), d(dst)]` per node on the full subgraph,
/// capped at `max_dist`, unreachable as `max_dist + 1`
pub fn de_node_labeling(adjacency: &CsrMatrix, src: usize, dst: usize, max_dist: u32) -> Result<Vec<[i64; 2]>> {
    let (src, dst) = canonical_pair(adjacency, src, dst)?;
    let to_src = unweighted_distances(adjacency, &[src])?;
    let to_dst = unweighted_distances(adjacency, &[dst])?;

    Ok(to_src
        .into_iter()
        .zip(to_dst)
        .map(|(ds, dt)| [cap(ds, max_dist), cap(dt, max_dist)])
        .collect())
}

/// Distance encoding plus: as [`de_node_labeling`] but each distance is
/// measured with the opposite anchor deleted
pub fn de_plus_node_labeling(adjacency: &CsrMatrix, src: usize, dst: usize, max_dist: u32) -> Result<Vec<[i64; 2]>> {
    let (src, dst) = canonical_pair(adjacency, src, dst)?;
    let (dist2src, dist2dst) = masked_distances(adjacency, src, dst)?;

    Ok(dist2src
        .into_iter()
        .zip(dist2dst)
        .map(|(ds, dt)| [cap(ds, max_dist), cap(dt, max_dist)])
        .collect())
}
