//! Graph construction: a molecule becomes a pair of ordered maps, the
//! representation a message-passing model consumes.
//!
//! The node map takes each atom index to its feature vector; the edge
//! map takes each bonded atom index to a list of (bond vector, neighbor
//! index) pairs, with every undirected bond recorded once from each
//! endpoint. Both maps iterate in insertion order, which the aligner
//! and the aggregation utilities rely on.

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;

use crate::align::align_indices;
use crate::features::{atom_features, bond_features};
use crate::mol::Mol;
use crate::smiles::{parse_smiles, SmilesError};
use crate::stereo::{find_stereocenters, CipLabel};

/// Atom index → feature vector, in atom-index order.
pub type NodeMap = IndexMap<usize, Vec<f32>>;

/// Atom index → [(bond feature vector, neighbor index)], keyed only for
/// atoms with at least one bond.
pub type EdgeMap = IndexMap<usize, Vec<(Vec<f32>, usize)>>;

/// A failure that invalidates a whole graph build. No partial maps are
/// ever returned; batch callers skip the offending structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An atom's element symbol has no feature-vocabulary slot.
    UnsupportedAtom { symbol: String },
    /// The scaffold does not occur as a substructure of the molecule.
    NoSubstructureMatch,
    /// The input string is not valid SMILES.
    Parse(SmilesError),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedAtom { symbol } => {
                write!(f, "atom symbol '{}' has no feature encoding", symbol)
            }
            Self::NoSubstructureMatch => write!(f, "scaffold is not a substructure"),
            Self::Parse(e) => write!(f, "SMILES parse failure: {}", e),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SmilesError> for GraphError {
    fn from(e: SmilesError) -> Self {
        Self::Parse(e)
    }
}

/// Builds the (edge map, node map) pair for a parsed molecule.
///
/// With `extra_atom_features`, each node vector carries degree, formal
/// charge, and a none/R/S one-hot; stereocenters are perceived on this
/// molecule before the atom walk. An unsupported atom fails the whole
/// build.
pub fn build_graph(
    mol: &Mol,
    extra_atom_features: bool,
    extra_bond_features: bool,
) -> Result<(EdgeMap, NodeMap), GraphError> {
    let n = mol.atom_count();
    let stereocenters = if extra_atom_features {
        find_stereocenters(mol)
    } else {
        Vec::new()
    };

    let mut edge_map = EdgeMap::new();
    let mut node_map = NodeMap::new();

    for i in 0..n {
        let node = NodeIndex::new(i);
        let mut features =
            atom_features(mol, node, extra_atom_features).ok_or_else(|| {
                GraphError::UnsupportedAtom {
                    symbol: mol.atom(node).symbol().to_string(),
                }
            })?;
        if extra_atom_features {
            let tag = stereocenters
                .iter()
                .find(|&&(idx, _)| idx == i)
                .map(|&(_, label)| label);
            features.extend(match tag {
                None => [1.0, 0.0, 0.0],
                Some(CipLabel::R) => [0.0, 1.0, 0.0],
                Some(CipLabel::S) => [0.0, 0.0, 1.0],
            });
        }
        node_map.insert(i, features);

        // Ordered-pair scan records each undirected bond from both
        // endpoints. O(N^2) lookups, fine at molecule sizes.
        for j in 0..n {
            if i == j {
                continue;
            }
            if let Some(edge) = mol.bond_between(node, NodeIndex::new(j)) {
                let bond_vector = bond_features(mol, edge, extra_bond_features);
                edge_map.entry(i).or_default().push((bond_vector, j));
            }
        }
    }

    Ok((edge_map, node_map))
}

/// Parses a SMILES string and builds its graph.
pub fn build_graph_from_smiles(
    smiles: &str,
    extra_atom_features: bool,
    extra_bond_features: bool,
) -> Result<(EdgeMap, NodeMap), GraphError> {
    let mol = parse_smiles(smiles)?;
    build_graph(&mol, extra_atom_features, extra_bond_features)
}

/// Builds graphs for a molecule and its scaffold, renumbering the
/// molecule's maps onto the scaffold's index space.
///
/// Returns (molecule edge map, molecule node map, scaffold edge map,
/// scaffold node map), the first two renumbered so scaffold-matched
/// atoms share the scaffold's indices. Any parse, featurization, or
/// alignment failure fails the whole call.
pub fn build_graph_pair(
    full_smiles: &str,
    scaffold_smiles: &str,
    extra_atom_features: bool,
    extra_bond_features: bool,
) -> Result<(EdgeMap, NodeMap, EdgeMap, NodeMap), GraphError> {
    let full = parse_smiles(full_smiles)?;
    let scaffold = parse_smiles(scaffold_smiles)?;

    let (g1, h1) = build_graph(&full, extra_atom_features, extra_bond_features)?;
    let (g2, h2) = build_graph(&scaffold, extra_atom_features, extra_bond_features)?;

    let (g1, h1) = align_indices(&full, &scaffold, g1, h1)?;
    Ok((g1, h1, g2, h2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        N_ATOM_FEATURES, N_BOND_FEATURES, N_EXTRA_ATOM_FEATURES, N_EXTRA_BOND_FEATURES,
    };

    #[test]
    fn ethanol_maps() {
        let (g, h) = build_graph_from_smiles("CCO", false, false).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(g.len(), 3);
        assert_eq!(g[&0].len(), 1);
        assert_eq!(g[&1].len(), 2);
        assert_eq!(g[&2].len(), 1);
        assert_eq!(g[&0][0].1, 1);
        for v in h.values() {
            assert_eq!(v.len(), N_ATOM_FEATURES);
        }
        for pairs in g.values() {
            for (v, _) in pairs {
                assert_eq!(v.len(), N_BOND_FEATURES);
            }
        }
    }

    #[test]
    fn isolated_atom_has_no_edge_key() {
        let (g, h) = build_graph_from_smiles("C", false, false).unwrap();
        assert_eq!(h.len(), 1);
        assert!(g.is_empty());
    }

    #[test]
    fn node_map_keys_are_atom_order() {
        let (_, h) = build_graph_from_smiles("CC(=O)O", false, false).unwrap();
        let keys: Vec<usize> = h.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);
    }

    #[test]
    fn neighbor_indices_are_node_keys() {
        let (g, h) = build_graph_from_smiles("c1ccc2ccccc2c1", false, false).unwrap();
        for pairs in g.values() {
            for (_, j) in pairs {
                assert!(h.contains_key(j));
            }
        }
    }

    #[test]
    fn unsupported_atom_fails_whole_build() {
        let err = build_graph_from_smiles("C[Fe]C", false, false).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnsupportedAtom {
                symbol: "Fe".to_string()
            }
        );
    }

    #[test]
    fn malformed_smiles_fails_as_parse() {
        let err = build_graph_from_smiles("C1CC", false, false).unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }

    #[test]
    fn extra_features_extend_vectors() {
        let (g, h) = build_graph_from_smiles("N[C@@H](C)C(=O)O", true, true).unwrap();
        for v in h.values() {
            assert_eq!(v.len(), N_ATOM_FEATURES + N_EXTRA_ATOM_FEATURES);
        }
        for pairs in g.values() {
            for (v, _) in pairs {
                assert_eq!(v.len(), N_BOND_FEATURES + N_EXTRA_BOND_FEATURES);
            }
        }
        // Atom 1 is the S center of L-alanine.
        assert_eq!(&h[&1][N_ATOM_FEATURES + 2..], [0.0, 0.0, 1.0]);
        // Atom 0 is not a stereocenter.
        assert_eq!(&h[&0][N_ATOM_FEATURES + 2..], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn pair_aligns_full_onto_scaffold() {
        let (g1, h1, g2, h2) =
            build_graph_pair("CCO", "CO", false, false).unwrap();
        assert_eq!(h1.len(), 3);
        assert_eq!(h2.len(), 2);
        assert_eq!(g2.len(), 2);
        // Scaffold-matched atoms occupy indices 0..2; the extra carbon
        // is appended at 2.
        let mut keys: Vec<usize> = h1.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![0, 1, 2]);
        assert!(g1.values().flatten().all(|(_, j)| *j < 3));
    }

    #[test]
    fn pair_without_match_fails() {
        let err = build_graph_pair("CCO", "N", false, false).unwrap_err();
        assert_eq!(err, GraphError::NoSubstructureMatch);
    }

    #[test]
    fn pair_with_unsupported_scaffold_fails() {
        assert!(build_graph_pair("CCO", "[Se]", false, false).is_err());
    }
}
