//! Stereo perception on parsed molecules: R/S labels for tetrahedral
//! centers and E/Z classification for annotated double bonds.
//!
//! Substituents are ranked by a simplified CIP procedure: walk outward
//! sphere by sphere, listing atomic numbers in descending order within
//! each sphere, duplicating neighbors across multiple bonds and counting
//! implicit hydrogens. Spheres compare lexicographically. This resolves
//! everyday molecules; pathological symmetric cases rank as ties and the
//! affected site is left unassigned.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Chirality;
use crate::bond::{BondOrder, BondStereo};
use crate::mol::{permutation_parity, Mol};

/// CIP descriptor of a resolved tetrahedral stereocenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipLabel {
    R,
    S,
}

/// Geometry class of a double bond, mirroring the six states a bond
/// feature vector distinguishes. `Cis`/`Trans` are reported when CIP
/// ranks tie and only the parsed geometry is known; `Any` is reserved
/// for bonds whose geometry is explicitly unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StereoKind {
    #[default]
    None,
    Any,
    Z,
    E,
    Cis,
    Trans,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Substituent {
    Node(NodeIndex),
    ImplicitH,
}

/// All atoms carrying a resolvable chirality mark, in index order, with
/// their R/S label. Marked atoms whose substituents tie under the
/// simplified ranking are omitted.
pub fn find_stereocenters(mol: &Mol) -> Vec<(usize, CipLabel)> {
    let mut centers = Vec::new();
    for node in mol.atoms() {
        if mol.atom(node).chirality == Chirality::None {
            continue;
        }
        if let Some(label) = assign_label(mol, node) {
            centers.push((node.index(), label));
        }
    }
    centers
}

fn assign_label(mol: &Mol, node: NodeIndex) -> Option<CipLabel> {
    let atom = mol.atom(node);

    let mut subs: Vec<Substituent> = Vec::new();
    match atom.hydrogen_count {
        0 => {}
        1 => subs.push(Substituent::ImplicitH),
        _ => return None,
    }
    let mut neighbors: Vec<NodeIndex> = mol.neighbors(node).collect();
    neighbors.sort_by_key(|n| n.index());
    subs.extend(neighbors.into_iter().map(Substituent::Node));

    if subs.len() != 4 {
        return None;
    }

    let ranks: Vec<Vec<Vec<u8>>> = subs
        .iter()
        .map(|&s| substituent_rank(mol, node, s))
        .collect();
    for i in 0..4 {
        for j in i + 1..4 {
            if ranks[i] == ranks[j] {
                return None;
            }
        }
    }

    // subs is already the canonical order the parser normalized to
    // (implicit H first, then neighbors ascending). Reorder to
    // (lowest, highest, second, third): with the lowest-priority
    // substituent toward the viewer, counterclockwise means R.
    let mut by_rank: Vec<usize> = (0..4).collect();
    by_rank.sort_by(|&i, &j| ranks[j].cmp(&ranks[i]));
    let target = [
        subs[by_rank[3]],
        subs[by_rank[0]],
        subs[by_rank[1]],
        subs[by_rank[2]],
    ];

    let sense = if permutation_parity(&subs, &target) {
        atom.chirality
    } else {
        atom.chirality.flipped()
    };

    Some(match sense {
        Chirality::Ccw => CipLabel::R,
        Chirality::Cw => CipLabel::S,
        Chirality::None => return None,
    })
}

/// Classifies an annotated double bond as Z or E. When a flanking side
/// cannot rank its two substituents, the parsed geometry is returned as
/// `Cis` or `Trans` instead.
pub fn bond_stereo_kind(mol: &Mol, edge: EdgeIndex) -> StereoKind {
    let bond = mol.bond(edge);
    let (ref_left, ref_right, parsed_cis) = match bond.stereo {
        BondStereo::None => return StereoKind::None,
        BondStereo::Cis(l, r) => (l, r, true),
        BondStereo::Trans(l, r) => (l, r, false),
    };
    let Some((a, b)) = mol.bond_endpoints(edge) else {
        return StereoKind::None;
    };
    let (db_left, db_right) = if mol.bond_between(a, ref_left).is_some() {
        (a, b)
    } else {
        (b, a)
    };

    let parsed = if parsed_cis {
        StereoKind::Cis
    } else {
        StereoKind::Trans
    };

    let Some(left_high) = reference_outranks_side(mol, db_left, db_right, ref_left) else {
        return parsed;
    };
    let Some(right_high) = reference_outranks_side(mol, db_right, db_left, ref_right) else {
        return parsed;
    };

    let high_same_side = if left_high == right_high {
        parsed_cis
    } else {
        !parsed_cis
    };
    if high_same_side {
        StereoKind::Z
    } else {
        StereoKind::E
    }
}

/// Whether `reference` outranks the other substituent on `db_atom`'s side
/// of the double bond to `partner`. `None` when the side ties.
fn reference_outranks_side(
    mol: &Mol,
    db_atom: NodeIndex,
    partner: NodeIndex,
    reference: NodeIndex,
) -> Option<bool> {
    let ref_rank = substituent_rank(mol, db_atom, Substituent::Node(reference));

    let mut best_other: Option<Vec<Vec<u8>>> = None;
    for nb in mol.neighbors(db_atom) {
        if nb == partner || nb == reference {
            continue;
        }
        let rank = substituent_rank(mol, db_atom, Substituent::Node(nb));
        if best_other.as_ref().map_or(true, |b| rank > *b) {
            best_other = Some(rank);
        }
    }
    if best_other.is_none() && mol.atom(db_atom).hydrogen_count > 0 {
        best_other = Some(substituent_rank(mol, db_atom, Substituent::ImplicitH));
    }

    match best_other {
        None => Some(true),
        Some(other) if other == ref_rank => None,
        Some(other) => Some(ref_rank > other),
    }
}

/// Atoms that could carry tetrahedral stereo whether or not they are
/// marked: four mutually distinguishable substituents counting at most
/// one implicit hydrogen.
pub(crate) fn tetrahedral_stereo_candidates(mol: &Mol) -> Vec<NodeIndex> {
    let mut candidates = Vec::new();
    for node in mol.atoms() {
        let atom = mol.atom(node);
        if atom.hydrogen_count > 1 || atom.is_aromatic {
            continue;
        }

        let mut subs: Vec<Substituent> = Vec::new();
        if atom.hydrogen_count == 1 {
            subs.push(Substituent::ImplicitH);
        }
        subs.extend(mol.neighbors(node).map(Substituent::Node));
        if subs.len() != 4 {
            continue;
        }
        if mol
            .bonds_of(node)
            .any(|e| mol.bond(e).order != BondOrder::Single)
        {
            continue;
        }

        let ranks: Vec<Vec<Vec<u8>>> = subs
            .iter()
            .map(|&s| substituent_rank(mol, node, s))
            .collect();
        let distinct = (0..4).all(|i| (i + 1..4).all(|j| ranks[i] != ranks[j]));
        if distinct {
            candidates.push(node);
        }
    }
    candidates
}

/// Acyclic double bonds whose two sides can each tell their substituents
/// apart. Ring double bonds are excluded: their geometry is fixed by the
/// ring for small rings and out of scope for large ones.
pub(crate) fn double_bond_stereo_candidates(mol: &Mol) -> Vec<EdgeIndex> {
    let mut candidates = Vec::new();
    for edge in mol.bonds() {
        if mol.bond(edge).order != BondOrder::Double {
            continue;
        }
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        if edge_in_ring(mol, a, b) {
            continue;
        }
        if side_is_stereogenic(mol, a, b) && side_is_stereogenic(mol, b, a) {
            candidates.push(edge);
        }
    }
    candidates
}

fn side_is_stereogenic(mol: &Mol, db_atom: NodeIndex, partner: NodeIndex) -> bool {
    let mut ranks: Vec<Vec<Vec<u8>>> = Vec::new();
    for nb in mol.neighbors(db_atom) {
        if nb == partner {
            continue;
        }
        ranks.push(substituent_rank(mol, db_atom, Substituent::Node(nb)));
    }
    for _ in 0..mol.atom(db_atom).hydrogen_count {
        ranks.push(substituent_rank(mol, db_atom, Substituent::ImplicitH));
    }
    ranks.len() == 2 && ranks[0] != ranks[1]
}

/// True when removing the a–b bond leaves a and b connected.
fn edge_in_ring(mol: &Mol, a: NodeIndex, b: NodeIndex) -> bool {
    let mut seen = vec![false; mol.atom_count()];
    seen[a.index()] = true;
    let mut queue = vec![a];
    while let Some(node) = queue.pop() {
        for nb in mol.neighbors(node) {
            if node == a && nb == b {
                continue;
            }
            if nb == b {
                return true;
            }
            if !seen[nb.index()] {
                seen[nb.index()] = true;
                queue.push(nb);
            }
        }
    }
    false
}

/// Sphere-by-sphere atomic-number listing for one substituent branch,
/// rooted just past `center`. Multiple bonds duplicate the atom at the
/// far end in the next sphere; implicit hydrogens appear as 1s. Spheres
/// sort descending and the whole rank compares lexicographically.
fn substituent_rank(mol: &Mol, center: NodeIndex, sub: Substituent) -> Vec<Vec<u8>> {
    let first = match sub {
        Substituent::ImplicitH => return vec![vec![1]],
        Substituent::Node(n) => n,
    };

    let mut spheres: Vec<Vec<u8>> = vec![vec![mol.atom(first).atomic_num]];
    let mut frontier: Vec<(NodeIndex, NodeIndex, u8)> =
        vec![(first, center, bond_multiplicity(mol, center, first))];

    // Walks never immediately backtrack, so the longest informative
    // expansion is bounded by the atom count.
    for _ in 1..mol.atom_count().max(1) {
        let mut sphere: Vec<u8> = Vec::new();
        let mut next: Vec<(NodeIndex, NodeIndex, u8)> = Vec::new();

        for &(atom, from, via) in &frontier {
            for _ in 1..via {
                sphere.push(mol.atom(from).atomic_num);
            }
            for _ in 0..mol.atom(atom).hydrogen_count {
                sphere.push(1);
            }
            for nb in mol.neighbors(atom) {
                if nb == from {
                    continue;
                }
                let mult = bond_multiplicity(mol, atom, nb);
                for _ in 0..mult {
                    sphere.push(mol.atom(nb).atomic_num);
                }
                next.push((nb, atom, mult));
            }
        }

        if sphere.is_empty() {
            break;
        }
        sphere.sort_unstable_by(|x, y| y.cmp(x));
        spheres.push(sphere);
        frontier = next;
    }

    spheres
}

fn bond_multiplicity(mol: &Mol, a: NodeIndex, b: NodeIndex) -> u8 {
    match mol.bond_between(a, b).map(|e| mol.bond(e).order) {
        Some(BondOrder::Double) => 2,
        Some(BondOrder::Triple) => 3,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn alanine_enantiomers() {
        let l_ala = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(find_stereocenters(&l_ala), vec![(1, CipLabel::S)]);

        let d_ala = parse_smiles("N[C@H](C)C(=O)O").unwrap();
        assert_eq!(find_stereocenters(&d_ala), vec![(1, CipLabel::R)]);
    }

    #[test]
    fn bromochlorofluoromethane() {
        let mol = parse_smiles("F[C@H](Cl)Br").unwrap();
        assert_eq!(find_stereocenters(&mol), vec![(1, CipLabel::R)]);
    }

    #[test]
    fn glyceraldehyde() {
        let mol = parse_smiles("OC[C@@H](O)C=O").unwrap();
        assert_eq!(find_stereocenters(&mol), vec![(2, CipLabel::R)]);
    }

    #[test]
    fn unmarked_atoms_have_no_label() {
        let mol = parse_smiles("CC(F)Cl").unwrap();
        assert!(find_stereocenters(&mol).is_empty());
    }

    #[test]
    fn tied_substituents_are_skipped() {
        // Marked, but two methyl branches rank identically.
        let mol = parse_smiles("C[C@H](C)O").unwrap();
        assert!(find_stereocenters(&mol).is_empty());
    }

    #[test]
    fn two_centers_report_in_index_order() {
        let mol = parse_smiles("C[C@H](F)[C@H](Cl)Br").unwrap();
        let centers = find_stereocenters(&mol);
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0].0, 1);
        assert_eq!(centers[1].0, 3);
    }

    #[test]
    fn difluoroethene_kinds() {
        let trans = parse_smiles("F/C=C/F").unwrap();
        let e = trans.bond_between(n(1), n(2)).unwrap();
        assert_eq!(bond_stereo_kind(&trans, e), StereoKind::E);

        let cis = parse_smiles(r"F/C=C\F").unwrap();
        let e = cis.bond_between(n(1), n(2)).unwrap();
        assert_eq!(bond_stereo_kind(&cis, e), StereoKind::Z);
    }

    #[test]
    fn plain_double_bond_is_none() {
        let mol = parse_smiles("C=C").unwrap();
        let e = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(bond_stereo_kind(&mol, e), StereoKind::None);
    }

    #[test]
    fn low_priority_reference_flips_label() {
        // Marks put the fluorines trans, but bromine outranks fluorine on
        // the left, so the high-priority pair sits on the same side.
        let mol = parse_smiles("F/C(Br)=C/F").unwrap();
        let e = mol.bond_between(n(1), n(3)).unwrap();
        assert_eq!(bond_stereo_kind(&mol, e), StereoKind::Z);
    }

    #[test]
    fn tied_side_reports_parsed_geometry() {
        let mol = parse_smiles("F/C(F)=C/F").unwrap();
        let e = mol.bond_between(n(1), n(3)).unwrap();
        assert_eq!(bond_stereo_kind(&mol, e), StereoKind::Trans);
    }

    #[test]
    fn tetrahedral_candidates() {
        let mol = parse_smiles("CC(F)Cl").unwrap();
        assert_eq!(tetrahedral_stereo_candidates(&mol), vec![n(1)]);

        let none = parse_smiles("CCO").unwrap();
        assert!(tetrahedral_stereo_candidates(&none).is_empty());
    }

    #[test]
    fn double_bond_candidates() {
        let butene = parse_smiles("CC=CC").unwrap();
        assert_eq!(double_bond_stereo_candidates(&butene).len(), 1);

        let ethene = parse_smiles("C=C").unwrap();
        assert!(double_bond_stereo_candidates(&ethene).is_empty());

        let cyclohexene = parse_smiles("C1=CCCCC1").unwrap();
        assert!(double_bond_stereo_candidates(&cyclohexene).is_empty());
    }

    #[test]
    fn ring_bond_detection() {
        let mol = parse_smiles("C1CC1C").unwrap();
        assert!(edge_in_ring(&mol, n(0), n(1)));
        assert!(!edge_in_ring(&mol, n(2), n(3)));
    }
}
