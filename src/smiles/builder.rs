use petgraph::graph::NodeIndex;

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondOrder, BondStereo};
use crate::mol::{permutation_parity, Mol};
use crate::smiles::parse_tree::{ParseAtom, ParseTree};
use crate::smiles::tokenizer::{BondToken, ChiralityToken};

pub fn build_mol(tree: &ParseTree) -> Mol {
    let mut mol = Mol::new();
    let mut node_indices: Vec<NodeIndex> = Vec::with_capacity(tree.atoms.len());

    for parse_atom in &tree.atoms {
        let atom = Atom {
            atomic_num: parse_atom.element.atomic_num(),
            formal_charge: parse_atom.charge,
            isotope: parse_atom.isotope,
            hydrogen_count: 0,
            is_aromatic: parse_atom.is_aromatic,
            chirality: Chirality::None,
        };
        node_indices.push(mol.add_atom(atom));
    }

    let mut added_edges: Vec<Vec<usize>> = vec![Vec::new(); tree.atoms.len()];

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        for neighbor in &parse_atom.neighbors {
            let j = neighbor.atom_idx;
            if !added_edges[i].contains(&j) {
                let order = resolve_bond_order(
                    neighbor.bond,
                    parse_atom.is_aromatic,
                    tree.atoms[j].is_aromatic,
                );
                mol.add_bond(node_indices[i], node_indices[j], Bond::new(order));
                added_edges[i].push(j);
                added_edges[j].push(i);
            }
        }
    }

    resolve_chirality(&mut mol, tree, &node_indices);
    resolve_double_bond_stereo(&mut mol, tree, &node_indices);
    resolve_hydrogen_counts(&mut mol, tree, &node_indices);

    mol
}

fn resolve_bond_order(bond_tok: Option<BondToken>, from_aromatic: bool, to_aromatic: bool) -> BondOrder {
    match bond_tok {
        Some(BondToken::Single) => BondOrder::Single,
        Some(BondToken::Double) => BondOrder::Double,
        Some(BondToken::Triple) => BondOrder::Triple,
        Some(BondToken::Aromatic) => BondOrder::Aromatic,
        Some(BondToken::Up) | Some(BondToken::Down) => BondOrder::Single,
        None => {
            if from_aromatic && to_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            }
        }
    }
}

/// Translate `@`/`@@` (relative to the order neighbors appear in the text,
/// with a bracket hydrogen taking the slot right after the preceding atom)
/// into a parity relative to the canonical neighbor order: virtual hydrogen
/// first, then graph neighbors ascending by index.
fn resolve_chirality(mol: &mut Mol, tree: &ParseTree, indices: &[NodeIndex]) {
    let h_sentinel = NodeIndex::end();

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        if parse_atom.chirality == ChiralityToken::None {
            continue;
        }

        let has_bracket_h = parse_atom.is_bracket && parse_atom.hcount.unwrap_or(0) > 0;

        let has_preceding =
            !parse_atom.neighbors.is_empty() && parse_atom.neighbors[0].atom_idx < i;

        let explicit_smiles: Vec<NodeIndex> = parse_atom
            .neighbors
            .iter()
            .map(|n| indices[n.atom_idx])
            .collect();

        let smiles_order = if has_bracket_h {
            let mut with_h = Vec::with_capacity(explicit_smiles.len() + 1);
            if has_preceding {
                with_h.push(explicit_smiles[0]);
                with_h.push(h_sentinel);
                with_h.extend_from_slice(&explicit_smiles[1..]);
            } else {
                with_h.push(h_sentinel);
                with_h.extend_from_slice(&explicit_smiles);
            }
            with_h
        } else {
            explicit_smiles
        };

        let mut canonical: Vec<NodeIndex> = mol.neighbors(indices[i]).collect();
        canonical.sort_by_key(|n| n.index());
        if has_bracket_h {
            canonical.insert(0, h_sentinel);
        }

        let sense = match parse_atom.chirality {
            ChiralityToken::CounterClockwise => Chirality::Ccw,
            ChiralityToken::Clockwise => Chirality::Cw,
            ChiralityToken::None => unreachable!(),
        };

        mol.atom_mut(indices[i]).chirality = if permutation_parity(&smiles_order, &canonical) {
            sense
        } else {
            sense.flipped()
        };
    }
}

/// Marks in the parse tree are direction-correct (`Up` on entry (x → y)
/// means y is drawn above x), so two marks on the same side of a double
/// bond compare equal and mean cis.
fn resolve_double_bond_stereo(mol: &mut Mol, tree: &ParseTree, indices: &[NodeIndex]) {
    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        for neighbor in &parse_atom.neighbors {
            let j = neighbor.atom_idx;
            if i >= j {
                continue;
            }

            let edge_idx = match mol.bond_between(indices[i], indices[j]) {
                Some(e) => e,
                None => continue,
            };
            if mol.bond(edge_idx).order != BondOrder::Double {
                continue;
            }

            let left = directional_neighbor(tree, i, j);
            let right = directional_neighbor(tree, j, i);

            if let (Some((left_atom, left_mark)), Some((right_atom, right_mark))) = (left, right)
            {
                let stereo = if left_mark == right_mark {
                    BondStereo::Cis(indices[left_atom], indices[right_atom])
                } else {
                    BondStereo::Trans(indices[left_atom], indices[right_atom])
                };
                mol.bond_mut(edge_idx).stereo = stereo;
            }
        }
    }
}

fn directional_neighbor(
    tree: &ParseTree,
    db_atom: usize,
    other_db_atom: usize,
) -> Option<(usize, BondToken)> {
    for neighbor in &tree.atoms[db_atom].neighbors {
        if neighbor.atom_idx == other_db_atom {
            continue;
        }
        if let Some(mark @ (BondToken::Up | BondToken::Down)) = neighbor.bond {
            return Some((neighbor.atom_idx, mark));
        }
    }
    None
}

fn resolve_hydrogen_counts(mol: &mut Mol, tree: &ParseTree, indices: &[NodeIndex]) {
    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        let h_count = if parse_atom.is_bracket {
            parse_atom.hcount.unwrap_or(0)
        } else {
            compute_implicit_h(mol, indices[i], parse_atom)
        };
        mol.atom_mut(indices[i]).hydrogen_count = h_count;
    }
}

/// Fill the atom up to the smallest default valence that covers its bonds.
/// Aromatic atoms donate one bonding slot to the ring system, so one
/// hydrogen is dropped when any would be added.
fn compute_implicit_h(mol: &Mol, node: NodeIndex, parse_atom: &ParseAtom) -> u8 {
    let valences = parse_atom.element.default_valences();
    if valences.is_empty() {
        return 0;
    }

    let bond_order_sum = bond_order_sum(mol, node);

    let target = valences
        .iter()
        .find(|&&v| v >= bond_order_sum)
        .copied()
        .unwrap_or(0);

    if target < bond_order_sum {
        return 0;
    }

    let mut h = target - bond_order_sum;

    if parse_atom.is_aromatic && h > 0 {
        h -= 1;
    }

    h
}

fn bond_order_sum(mol: &Mol, node: NodeIndex) -> u8 {
    let mut sum: u8 = 0;
    for edge_idx in mol.bonds_of(node) {
        let order = match mol.bond(edge_idx).order {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 1,
        };
        sum = sum.saturating_add(order);
    }
    sum
}
