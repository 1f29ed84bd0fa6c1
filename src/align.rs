//! Index alignment between a molecule's graph and its scaffold's.
//!
//! Atoms matched to the scaffold are renumbered into the scaffold's own
//! index space; the rest are appended after, in ascending original
//! order. Remapping rewrites keys and neighbor indices but keeps the
//! maps' insertion order, so entries still iterate in the original
//! atom-index order.

use crate::graph::{EdgeMap, GraphError, NodeMap};
use crate::mol::Mol;
use crate::substruct::first_match;

/// Renumbers `full`'s maps onto `scaffold`'s index space.
///
/// Fails with [`GraphError::NoSubstructureMatch`] when the scaffold does
/// not occur in `full`. The first match decides the correspondence; the
/// matcher's determinism makes a self-alignment the identity.
pub fn align_indices(
    full: &Mol,
    scaffold: &Mol,
    edge_map: EdgeMap,
    node_map: NodeMap,
) -> Result<(EdgeMap, NodeMap), GraphError> {
    let matched = first_match(full, scaffold).ok_or(GraphError::NoSubstructureMatch)?;

    // index_map[old] = new. Matched atoms take the scaffold's numbering,
    // the rest fill up from len(matched) in ascending old order.
    let n = full.atom_count();
    let mut index_map = vec![usize::MAX; n];
    for (scaffold_idx, &full_idx) in matched.iter().enumerate() {
        index_map[full_idx] = scaffold_idx;
    }
    let mut next = matched.len();
    for slot in index_map.iter_mut() {
        if *slot == usize::MAX {
            *slot = next;
            next += 1;
        }
    }
    debug_assert_eq!(next, n);

    Ok(remap(edge_map, node_map, &index_map))
}

/// Applies `index_map` to both maps, preserving their iteration order.
fn remap(edge_map: EdgeMap, node_map: NodeMap, index_map: &[usize]) -> (EdgeMap, NodeMap) {
    let mut new_node_map = NodeMap::with_capacity(node_map.len());
    for (i, features) in node_map {
        new_node_map.insert(index_map[i], features);
    }

    let mut new_edge_map = EdgeMap::with_capacity(edge_map.len());
    for (i, pairs) in edge_map {
        let remapped = pairs
            .into_iter()
            .map(|(features, j)| (features, index_map[j]))
            .collect();
        new_edge_map.insert(index_map[i], remapped);
    }

    (new_edge_map, new_node_map)
}
