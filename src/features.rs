//! Fixed-length feature vectors for atoms and bonds, the numeric layer a
//! message-passing model consumes.
//!
//! Atom vectors start with a one-hot over [`ATOM_SYMBOLS`]; a symbol
//! outside that vocabulary has no encoding and the caller treats the
//! whole molecule as unsupported. Bond vectors are four bond-order slots
//! plus a constant zero kept as the no-bond sentinel slot. Extra
//! descriptors extend either vector without changing the core layout.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::stereo::{bond_stereo_kind, StereoKind};

/// Element symbols with a one-hot slot. Deuterium gets its own slot
/// distinct from plain hydrogen, which is unsupported.
pub const ATOM_SYMBOLS: [&str; 9] = ["C", "N", "O", "S", "F", "P", "Cl", "Br", "D"];

/// Length of the core atom vector.
pub const N_ATOM_FEATURES: usize = ATOM_SYMBOLS.len();
/// Length of the core bond vector.
pub const N_BOND_FEATURES: usize = 5;
/// Extra atom entries: degree, formal charge, and the none/R/S one-hot
/// the graph builder appends.
pub const N_EXTRA_ATOM_FEATURES: usize = 5;
/// Extra bond entries: the six-way stereo one-hot.
pub const N_EXTRA_BOND_FEATURES: usize = 6;

/// One-hot over `allowed`, or `None` when the value has no slot.
pub fn one_of_k<T: PartialEq>(value: T, allowed: &[T]) -> Option<Vec<f32>> {
    if !allowed.contains(&value) {
        return None;
    }
    Some(
        allowed
            .iter()
            .map(|a| if *a == value { 1.0 } else { 0.0 })
            .collect(),
    )
}

/// One-hot over `allowed`, mapping any unknown value to the last slot.
/// The atom encoder deliberately does not use this: an unknown element
/// is a failure there, not a bucket.
pub fn one_of_k_or_last<T: PartialEq>(value: T, allowed: &[T]) -> Vec<f32> {
    let last = allowed.len().saturating_sub(1);
    let known = allowed.contains(&value);
    allowed
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let hit = if known { *a == value } else { i == last };
            if hit {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Core atom vector, with degree and formal charge appended when
/// `include_extra` is set. `None` when the symbol is not in
/// [`ATOM_SYMBOLS`].
pub fn atom_features(mol: &Mol, node: NodeIndex, include_extra: bool) -> Option<Vec<f32>> {
    let atom = mol.atom(node);
    let mut features = one_of_k(atom.symbol(), &ATOM_SYMBOLS)?;
    if include_extra {
        features.push(mol.degree(node) as f32);
        features.push(f32::from(atom.formal_charge));
    }
    Some(features)
}

/// Bond-order one-hot plus the sentinel slot, with the stereo one-hot
/// appended when `include_extra` is set.
pub fn bond_features(mol: &Mol, edge: EdgeIndex, include_extra: bool) -> Vec<f32> {
    let order = mol.bond(edge).order;
    let mut features = Vec::with_capacity(if include_extra {
        N_BOND_FEATURES + N_EXTRA_BOND_FEATURES
    } else {
        N_BOND_FEATURES
    });

    for candidate in [
        BondOrder::Single,
        BondOrder::Double,
        BondOrder::Triple,
        BondOrder::Aromatic,
    ] {
        features.push(if order == candidate { 1.0 } else { 0.0 });
    }
    features.push(0.0);

    if include_extra {
        let kind = bond_stereo_kind(mol, edge);
        for candidate in [
            StereoKind::None,
            StereoKind::Any,
            StereoKind::Z,
            StereoKind::E,
            StereoKind::Cis,
            StereoKind::Trans,
        ] {
            features.push(if kind == candidate { 1.0 } else { 0.0 });
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn every_symbol_gets_its_own_slot() {
        let sources = [
            ("C", 0),
            ("N", 1),
            ("O", 2),
            ("S", 3),
            ("F", 4),
            ("P", 5),
            ("Cl", 6),
            ("Br", 7),
            ("[2H]", 8),
        ];
        for (smiles, slot) in sources {
            let mol = parse_smiles(smiles).unwrap();
            let v = atom_features(&mol, n(0), false).unwrap();
            assert_eq!(v.len(), N_ATOM_FEATURES);
            for (i, x) in v.iter().enumerate() {
                let expected = if i == slot { 1.0 } else { 0.0 };
                assert_eq!(*x, expected, "{smiles} slot {i}");
            }
        }
    }

    #[test]
    fn unsupported_symbols_have_no_encoding() {
        let iron = parse_smiles("[Fe]").unwrap();
        assert!(atom_features(&iron, n(0), false).is_none());

        // Plain hydrogen is outside the vocabulary; only deuterium encodes.
        let hydrogen = parse_smiles("[H]").unwrap();
        assert!(atom_features(&hydrogen, n(0), false).is_none());
    }

    #[test]
    fn extra_atom_entries_are_degree_and_charge() {
        let mol = parse_smiles("CC(=O)O").unwrap();
        let v = atom_features(&mol, n(1), true).unwrap();
        assert_eq!(v.len(), N_ATOM_FEATURES + 2);
        assert_eq!(v[N_ATOM_FEATURES], 3.0);
        assert_eq!(v[N_ATOM_FEATURES + 1], 0.0);

        let charged = parse_smiles("[NH4+]").unwrap();
        let v = atom_features(&charged, n(0), true).unwrap();
        assert_eq!(v[N_ATOM_FEATURES], 0.0);
        assert_eq!(v[N_ATOM_FEATURES + 1], 1.0);
    }

    #[test]
    fn bond_order_one_hot() {
        let cases = [
            ("CC", vec![1.0, 0.0, 0.0, 0.0, 0.0]),
            ("C=C", vec![0.0, 1.0, 0.0, 0.0, 0.0]),
            ("C#C", vec![0.0, 0.0, 1.0, 0.0, 0.0]),
            ("cc", vec![0.0, 0.0, 0.0, 1.0, 0.0]),
        ];
        for (smiles, expected) in cases {
            let mol = parse_smiles(smiles).unwrap();
            let edge = mol.bond_between(n(0), n(1)).unwrap();
            assert_eq!(bond_features(&mol, edge, false), expected, "{smiles}");
        }
    }

    #[test]
    fn bond_stereo_extras() {
        let mol = parse_smiles("F/C=C/F").unwrap();
        let edge = mol.bond_between(n(1), n(2)).unwrap();
        let v = bond_features(&mol, edge, true);
        assert_eq!(v.len(), N_BOND_FEATURES + N_EXTRA_BOND_FEATURES);
        // Double bond, E geometry.
        assert_eq!(v[1], 1.0);
        assert_eq!(&v[N_BOND_FEATURES..], [0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

        let plain = parse_smiles("CC").unwrap();
        let edge = plain.bond_between(n(0), n(1)).unwrap();
        let v = bond_features(&plain, edge, true);
        assert_eq!(&v[N_BOND_FEATURES..], [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn one_of_k_rejects_strangers() {
        assert_eq!(one_of_k(2, &[1, 2, 3]), Some(vec![0.0, 1.0, 0.0]));
        assert_eq!(one_of_k(7, &[1, 2, 3]), None);
    }

    #[test]
    fn one_of_k_or_last_buckets_strangers() {
        assert_eq!(one_of_k_or_last(2, &[1, 2, 3]), vec![0.0, 1.0, 0.0]);
        assert_eq!(one_of_k_or_last(7, &[1, 2, 3]), vec![0.0, 0.0, 1.0]);
    }
}
