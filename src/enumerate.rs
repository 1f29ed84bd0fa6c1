//! Stereoisomer enumeration.
//!
//! Every stereogenic site is re-enumerated whether or not the input
//! already assigns it: tetrahedral atoms with four distinguishable
//! substituents and acyclic double bonds whose flanking substituents
//! can be told apart each contribute a factor of two. Variants are
//! emitted through the isomeric writer and returned as unique strings
//! in sorted order.

use std::collections::BTreeSet;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Chirality;
use crate::bond::BondStereo;
use crate::mol::Mol;
use crate::smiles::{parse_smiles, to_smiles, SmilesError};
use crate::stereo::{double_bond_stereo_candidates, tetrahedral_stereo_candidates};

/// All stereoisomer SMILES of the input, unique and sorted.
pub fn enumerate_stereoisomers(smiles: &str) -> Result<Vec<String>, SmilesError> {
    let mol = parse_smiles(smiles)?;

    let tetra = tetrahedral_stereo_candidates(&mol);
    let double = double_bond_stereo_candidates(&mol);
    let sites = tetra.len() + double.len();

    let mut unique = BTreeSet::new();
    for assignment in 0..(1u64 << sites) {
        let variant = assign(&mol, &tetra, &double, assignment);
        unique.insert(to_smiles(&variant));
    }
    Ok(unique.into_iter().collect())
}

fn assign(mol: &Mol, tetra: &[NodeIndex], double: &[EdgeIndex], assignment: u64) -> Mol {
    let mut variant = mol.clone();
    for (bit, &node) in tetra.iter().enumerate() {
        variant.atom_mut(node).chirality = if assignment >> bit & 1 == 0 {
            Chirality::Ccw
        } else {
            Chirality::Cw
        };
    }
    for (bit, &edge) in double.iter().enumerate() {
        let (a, b) = variant
            .bond_endpoints(edge)
            .expect("candidate edge exists");
        let ref_a = flank_reference(&variant, a, b);
        let ref_b = flank_reference(&variant, b, a);
        let (Some(ref_a), Some(ref_b)) = (ref_a, ref_b) else {
            continue;
        };
        variant.bond_mut(edge).stereo = if assignment >> (tetra.len() + bit) & 1 == 0 {
            BondStereo::Cis(ref_a, ref_b)
        } else {
            BondStereo::Trans(ref_a, ref_b)
        };
    }
    variant
}

/// Lowest-index substituent of `db_atom` other than the double-bond
/// partner, used as the geometry reference.
fn flank_reference(mol: &Mol, db_atom: NodeIndex, partner: NodeIndex) -> Option<NodeIndex> {
    mol.neighbors(db_atom)
        .filter(|&n| n != partner)
        .min_by_key(|n| n.index())
}
