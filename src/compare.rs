//! Structural equality for node and edge maps.
//!
//! Node maps compare per key with exact element-wise numbers. Edge maps
//! compare each key's neighbor list after sorting by neighbor index, so
//! two maps that record the same bonds in different per-key order still
//! compare equal.

use crate::graph::{EdgeMap, NodeMap};

pub fn node_maps_equal(h1: &NodeMap, h2: &NodeMap) -> bool {
    if h1.len() != h2.len() {
        return false;
    }
    for (i, features) in h1 {
        match h2.get(i) {
            Some(other) => {
                if features != other {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

pub fn edge_maps_equal(g1: &EdgeMap, g2: &EdgeMap) -> bool {
    if g1.len() != g2.len() {
        return false;
    }
    for (i, pairs1) in g1 {
        let Some(pairs2) = g2.get(i) else {
            return false;
        };
        if pairs1.len() != pairs2.len() {
            return false;
        }
        let mut sorted1: Vec<_> = pairs1.iter().collect();
        let mut sorted2: Vec<_> = pairs2.iter().collect();
        sorted1.sort_by_key(|(_, j)| *j);
        sorted2.sort_by_key(|(_, j)| *j);
        for ((features1, j1), (features2, j2)) in sorted1.into_iter().zip(sorted2) {
            if j1 != j2 || features1 != features2 {
                return false;
            }
        }
    }
    true
}
