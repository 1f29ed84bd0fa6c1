//! Reductions over a node map, consumed by the downstream model.

use crate::features::N_ATOM_FEATURES;
use crate::graph::NodeMap;

/// Row-stacks the node vectors in iteration order. With `except_last`,
/// the final entry in iteration order is omitted.
pub fn concat_node_vectors(node_map: &NodeMap, except_last: bool) -> Vec<Vec<f32>> {
    let take = if except_last {
        node_map.len().saturating_sub(1)
    } else {
        node_map.len()
    };
    node_map.values().take(take).cloned().collect()
}

/// Element-wise mean of the node vectors. An empty map yields a zero
/// vector of the core atom-feature length so the result always has a
/// defined shape.
pub fn average_node_vector(node_map: &NodeMap) -> Vec<f32> {
    let mut values = node_map.values();
    let Some(first) = values.next() else {
        return vec![0.0; N_ATOM_FEATURES];
    };

    let mut sum = first.clone();
    for v in values {
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
    }
    let n = node_map.len() as f32;
    for s in sum.iter_mut() {
        *s /= n;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph_from_smiles;

    #[test]
    fn concat_keeps_iteration_order() {
        let (_, h) = build_graph_from_smiles("CCO", false, false).unwrap();
        let matrix = concat_node_vectors(&h, false);
        assert_eq!(matrix.len(), 3);
        for (row, v) in matrix.iter().zip(h.values()) {
            assert_eq!(row, v);
        }
    }

    #[test]
    fn concat_except_last_drops_final_row() {
        let (_, h) = build_graph_from_smiles("CCO", false, false).unwrap();
        let matrix = concat_node_vectors(&h, true);
        assert_eq!(matrix.len(), 2);
        assert_eq!(&matrix[1], &h[&1]);
    }

    #[test]
    fn concat_empty_map() {
        let h = NodeMap::new();
        assert!(concat_node_vectors(&h, false).is_empty());
        assert!(concat_node_vectors(&h, true).is_empty());
    }

    #[test]
    fn average_of_two_vectors() {
        let mut h = NodeMap::new();
        h.insert(0, vec![1.0, 0.0, 0.0]);
        h.insert(1, vec![3.0, 0.0, 0.0]);
        assert_eq!(average_node_vector(&h), vec![2.0, 0.0, 0.0]);
    }

    #[test]
    fn average_of_empty_map_has_reference_shape() {
        let h = NodeMap::new();
        assert_eq!(average_node_vector(&h), vec![0.0; N_ATOM_FEATURES]);
    }

    #[test]
    fn average_over_built_graph() {
        // CCO: two carbon one-hots and one oxygen one-hot.
        let (_, h) = build_graph_from_smiles("CCO", false, false).unwrap();
        let avg = average_node_vector(&h);
        assert!((avg[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((avg[2] - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(avg[1], 0.0);
    }
}
