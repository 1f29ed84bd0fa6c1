//! Molecular-graph featurization for neural message-passing models.
//!
//! A SMILES string parses into a [`Mol`], which [`build_graph`] turns
//! into an ordered node map (atom index → feature vector) and edge map
//! (atom index → bond feature vectors with neighbor indices). For a
//! molecule/scaffold pair, [`build_graph_pair`] additionally renumbers
//! the molecule's maps so scaffold-matched atoms share the scaffold's
//! indices. Stereo perception, substructure matching, and stereoisomer
//! enumeration are provided in-crate.

pub mod align;
pub mod atom;
pub mod bond;
pub mod compare;
pub mod element;
pub mod enumerate;
pub mod features;
pub mod graph;
pub mod mol;
pub mod reduce;
pub mod smiles;
pub mod stereo;
pub mod substruct;

pub use align::align_indices;
pub use atom::{Atom, Chirality};
pub use bond::{Bond, BondOrder, BondStereo};
pub use compare::{edge_maps_equal, node_maps_equal};
pub use element::Element;
pub use enumerate::enumerate_stereoisomers;
pub use features::{
    atom_features, bond_features, N_ATOM_FEATURES, N_BOND_FEATURES, N_EXTRA_ATOM_FEATURES,
    N_EXTRA_BOND_FEATURES,
};
pub use graph::{
    build_graph, build_graph_from_smiles, build_graph_pair, EdgeMap, GraphError, NodeMap,
};
pub use mol::Mol;
pub use reduce::{average_node_vector, concat_node_vectors};
pub use smiles::{parse_smiles, to_smiles, SmilesError};
pub use stereo::{bond_stereo_kind, find_stereocenters, CipLabel, StereoKind};
pub use substruct::{all_matches, first_match, has_match};
