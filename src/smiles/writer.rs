use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::atom::{Atom, Chirality};
use crate::bond::{BondOrder, BondStereo};
use crate::element::Element;
use crate::mol::{permutation_parity, Mol};

/// Writes a SMILES string for the molecule, one fragment per connected
/// component. Output is deterministic: traversal starts at the lowest
/// node index and visits neighbors in ascending order, so a molecule
/// built by `parse_smiles` writes back in its original atom order.
pub fn to_smiles(mol: &Mol) -> String {
    let components = connected_components(mol);
    let mut parts = Vec::with_capacity(components.len());
    for component in &components {
        parts.push(write_fragment(mol, component));
    }
    parts.join(".")
}

fn connected_components(mol: &Mol) -> Vec<Vec<NodeIndex>> {
    let mut seen = vec![false; mol.atom_count()];
    let mut components = Vec::new();
    for start in mol.atoms() {
        if seen[start.index()] {
            continue;
        }
        let mut component = vec![start];
        seen[start.index()] = true;
        let mut head = 0;
        while head < component.len() {
            let node = component[head];
            head += 1;
            for nb in mol.neighbors(node) {
                if !seen[nb.index()] {
                    seen[nb.index()] = true;
                    component.push(nb);
                }
            }
        }
        component.sort_by_key(|n| n.index());
        components.push(component);
    }
    components
}

struct RingClosure {
    ring_id: usize,
    order: BondOrder,
    other: NodeIndex,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    fn as_char(self) -> char {
        match self {
            Direction::Up => '/',
            Direction::Down => '\\',
        }
    }
}

/// Assigns a direction to every single bond flanking a stereo double bond.
/// The map is keyed by orientation: `dirs[(x, y)] == Up` means y is drawn
/// above x, so the mark to emit between consecutive atoms x and y is just
/// `dirs[(x, y)]` regardless of tree position. Conjugated chains share
/// flanking bonds; an already-assigned side seeds the other.
fn compute_bond_directions(mol: &Mol) -> HashMap<(NodeIndex, NodeIndex), Direction> {
    let mut dirs: HashMap<(NodeIndex, NodeIndex), Direction> = HashMap::new();

    for edge in mol.bonds() {
        let bond = mol.bond(edge);
        let (ref_left, ref_right, is_trans) = match bond.stereo {
            BondStereo::Trans(l, r) => (l, r, true),
            BondStereo::Cis(l, r) => (l, r, false),
            BondStereo::None => continue,
        };

        let (a, b) = match mol.bond_endpoints(edge) {
            Some(ends) => ends,
            None => continue,
        };
        let (db_left, db_right) = if mol.bond_between(a, ref_left).is_some() {
            (a, b)
        } else {
            (b, a)
        };

        let (left_dir, right_dir) = match (
            dirs.get(&(db_left, ref_left)).copied(),
            dirs.get(&(db_right, ref_right)).copied(),
        ) {
            (Some(l), _) => (l, if is_trans { l.flip() } else { l }),
            (None, Some(r)) => (if is_trans { r.flip() } else { r }, r),
            (None, None) => {
                let l = Direction::Down;
                (l, if is_trans { l.flip() } else { l })
            }
        };

        dirs.insert((db_left, ref_left), left_dir);
        dirs.insert((ref_left, db_left), left_dir.flip());
        dirs.insert((db_right, ref_right), right_dir);
        dirs.insert((ref_right, db_right), right_dir.flip());
    }

    dirs
}

struct WriteState {
    parent: Vec<Option<NodeIndex>>,
    children: Vec<Vec<NodeIndex>>,
    ring_opens: Vec<Vec<RingClosure>>,
    ring_closes: Vec<Vec<RingClosure>>,
    bond_dirs: HashMap<(NodeIndex, NodeIndex), Direction>,
}

fn write_fragment(mol: &Mol, component: &[NodeIndex]) -> String {
    let n = mol.atom_count();
    let start = component[0];

    let mut visited = vec![false; n];
    let mut parent = vec![None::<NodeIndex>; n];
    let mut children: Vec<Vec<NodeIndex>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_opens: Vec<Vec<RingClosure>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_closes: Vec<Vec<RingClosure>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_edges: HashSet<(usize, usize)> = HashSet::new();
    let mut next_ring_id: usize = 1;

    let neighbor_lists: Vec<Vec<NodeIndex>> = (0..n)
        .map(|i| {
            let mut neighbors: Vec<NodeIndex> = mol.neighbors(NodeIndex::new(i)).collect();
            neighbors.sort_by_key(|nb| nb.index());
            neighbors
        })
        .collect();

    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();
    visited[start.index()] = true;
    stack.push((start, 0));

    while let Some(&mut (node, ref mut ni)) = stack.last_mut() {
        let neighbors = &neighbor_lists[node.index()];
        if *ni >= neighbors.len() {
            stack.pop();
            continue;
        }
        let neighbor = neighbors[*ni];
        *ni += 1;

        if !visited[neighbor.index()] {
            visited[neighbor.index()] = true;
            parent[neighbor.index()] = Some(node);
            children[node.index()].push(neighbor);
            stack.push((neighbor, 0));
        } else if parent[node.index()] != Some(neighbor) {
            let key = (
                node.index().min(neighbor.index()),
                node.index().max(neighbor.index()),
            );
            if ring_edges.insert(key) {
                let edge = match mol.bond_between(node, neighbor) {
                    Some(e) => e,
                    None => continue,
                };
                let order = mol.bond(edge).order;
                let ring_id = next_ring_id;
                next_ring_id += 1;
                // The earlier-visited atom opens the ring.
                ring_opens[neighbor.index()].push(RingClosure {
                    ring_id,
                    order,
                    other: node,
                });
                ring_closes[node.index()].push(RingClosure {
                    ring_id,
                    order,
                    other: neighbor,
                });
            }
        }
    }

    let state = WriteState {
        parent,
        children,
        ring_opens,
        ring_closes,
        bond_dirs: compute_bond_directions(mol),
    };

    let mut out = String::new();
    write_node(mol, start, &state, &mut out);
    out
}

/// Chirality to emit so that a reader, reconstructing the neighbor order
/// from the written text, recovers the stored canonical parity. The written
/// order is parent, bracket hydrogen, ring digits, then children.
fn chirality_for_writing(mol: &Mol, node: NodeIndex, state: &WriteState) -> Chirality {
    let atom = mol.atom(node);
    if atom.chirality == Chirality::None {
        return Chirality::None;
    }

    let h_sentinel = NodeIndex::end();

    let mut canonical: Vec<NodeIndex> = mol.neighbors(node).collect();
    canonical.sort_by_key(|n| n.index());

    let mut written: Vec<NodeIndex> = Vec::new();
    if let Some(p) = state.parent[node.index()] {
        written.push(p);
    }
    if atom.hydrogen_count > 0 {
        written.push(h_sentinel);
        canonical.insert(0, h_sentinel);
    }
    for rc in &state.ring_opens[node.index()] {
        written.push(rc.other);
    }
    for rc in &state.ring_closes[node.index()] {
        written.push(rc.other);
    }
    written.extend_from_slice(&state.children[node.index()]);

    if permutation_parity(&canonical, &written) {
        atom.chirality
    } else {
        atom.chirality.flipped()
    }
}

fn write_node(mol: &Mol, node: NodeIndex, state: &WriteState, out: &mut String) {
    let chirality = chirality_for_writing(mol, node, state);
    write_atom_symbol(mol, node, chirality, out);

    for rc in &state.ring_opens[node.index()] {
        write_bond_between(mol, rc.order, node, rc.other, &state.bond_dirs, out);
        write_ring_digit(rc.ring_id, out);
    }
    for rc in &state.ring_closes[node.index()] {
        write_bond_between(mol, rc.order, node, rc.other, &state.bond_dirs, out);
        write_ring_digit(rc.ring_id, out);
    }

    let kids = &state.children[node.index()];
    if kids.is_empty() {
        return;
    }

    let last = kids.len() - 1;
    for (i, &child) in kids.iter().enumerate() {
        let is_branch = i < last;
        if is_branch {
            out.push('(');
        }
        if let Some(edge) = mol.bond_between(node, child) {
            write_bond_between(mol, mol.bond(edge).order, node, child, &state.bond_dirs, out);
        }
        write_node(mol, child, state, out);
        if is_branch {
            out.push(')');
        }
    }
}

fn write_bond_between(
    mol: &Mol,
    order: BondOrder,
    from: NodeIndex,
    to: NodeIndex,
    bond_dirs: &HashMap<(NodeIndex, NodeIndex), Direction>,
    out: &mut String,
) {
    if let Some(&dir) = bond_dirs.get(&(from, to)) {
        out.push(dir.as_char());
        return;
    }
    match order {
        BondOrder::Single => {
            // A plain bond between two aromatic atoms would read back as
            // aromatic; biphenyl-style links need the explicit dash.
            if mol.atom(from).is_aromatic && mol.atom(to).is_aromatic {
                out.push('-');
            }
        }
        BondOrder::Double => out.push('='),
        BondOrder::Triple => out.push('#'),
        BondOrder::Aromatic => {}
    }
}

fn write_ring_digit(id: usize, out: &mut String) {
    assert!(id <= 99, "ring id {id} exceeds SMILES maximum of 99");
    if id <= 9 {
        out.push(char::from(b'0' + id as u8));
    } else {
        out.push('%');
        out.push(char::from(b'0' + (id / 10) as u8));
        out.push(char::from(b'0' + (id % 10) as u8));
    }
}

fn write_atom_symbol(mol: &Mol, node: NodeIndex, chirality: Chirality, out: &mut String) {
    let atom = mol.atom(node);
    let elem = Element::from_atomic_num(atom.atomic_num);

    if chirality == Chirality::None && can_write_bare(mol, node) {
        let symbol = elem.map(Element::symbol).unwrap_or("*");
        if atom.is_aromatic {
            for c in symbol.chars() {
                out.push(c.to_ascii_lowercase());
            }
        } else {
            out.push_str(symbol);
        }
    } else {
        write_bracket_atom(atom, elem, chirality, out);
    }
}

fn can_write_bare(mol: &Mol, node: NodeIndex) -> bool {
    let atom = mol.atom(node);

    let elem = match Element::from_atomic_num(atom.atomic_num) {
        Some(e) => e,
        None => return false,
    };

    if !elem.is_organic_subset() {
        return false;
    }
    if atom.isotope != 0 || atom.formal_charge != 0 {
        return false;
    }

    // A bare atom only keeps its hydrogen count if the reader would infer
    // the same number back.
    let expected_h =
        implicit_h_for_bare_atom(elem, atom.is_aromatic, reader_bond_order_sum(mol, node));
    atom.hydrogen_count == expected_h
}

/// Mirrors `compute_implicit_h` in the parser's builder.
fn implicit_h_for_bare_atom(elem: Element, is_aromatic: bool, bond_order_sum: u8) -> u8 {
    let valences = elem.default_valences();
    if valences.is_empty() {
        return 0;
    }
    let target = valences
        .iter()
        .find(|&&v| v >= bond_order_sum)
        .copied()
        .unwrap_or(0);
    if target < bond_order_sum {
        return 0;
    }
    let mut h = target - bond_order_sum;
    if is_aromatic && h > 0 {
        h -= 1;
    }
    h
}

fn reader_bond_order_sum(mol: &Mol, node: NodeIndex) -> u8 {
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

fn write_bracket_atom(atom: &Atom, elem: Option<Element>, chirality: Chirality, out: &mut String) {
    out.push('[');

    if atom.isotope != 0 {
        out.push_str(&atom.isotope.to_string());
    }

    match elem {
        Some(e) => {
            let symbol = e.symbol();
            if atom.is_aromatic {
                for c in symbol.chars() {
                    out.push(c.to_ascii_lowercase());
                }
            } else {
                out.push_str(symbol);
            }
        }
        None => out.push('*'),
    }

    match chirality {
        Chirality::Ccw => out.push('@'),
        Chirality::Cw => out.push_str("@@"),
        Chirality::None => {}
    }

    if atom.hydrogen_count > 0 {
        out.push('H');
        if atom.hydrogen_count > 1 {
            out.push_str(&atom.hydrogen_count.to_string());
        }
    }

    if atom.formal_charge > 0 {
        out.push('+');
        if atom.formal_charge > 1 {
            out.push_str(&atom.formal_charge.to_string());
        }
    } else if atom.formal_charge < 0 {
        out.push('-');
        if atom.formal_charge < -1 {
            out.push_str(&atom.formal_charge.abs().to_string());
        }
    }

    out.push(']');
}
