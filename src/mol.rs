use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::Bond;

/// A molecular graph: atoms as nodes, bonds as undirected edges.
///
/// Atom indices are contiguous from zero in insertion order, which for parsed
/// molecules is the order atoms appear in the SMILES text. Stereochemistry
/// lives on the weights: tetrahedral parity on [`Atom`], double-bond geometry
/// on [`Bond`].
pub struct Mol {
    graph: UnGraph<Atom, Bond>,
}

impl Mol {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn graph(&self) -> &UnGraph<Atom, Bond> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut Atom {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut Bond {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Number of explicit (graph) neighbors. Virtual hydrogens do not count.
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }
}

impl Clone for Mol {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
        }
    }
}

impl Default for Mol {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Mol {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        for idx in self.atoms() {
            if self.atom(idx) != other.atom(idx) {
                return false;
            }
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx) {
                return false;
            }
            if self.bond_endpoints(idx) != other.bond_endpoints(idx) {
                return false;
            }
        }
        true
    }
}

impl std::fmt::Debug for Mol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}

/// True when the permutation taking `from` to `to` is even (an even number
/// of transpositions). Both slices must hold the same distinct elements.
pub(crate) fn permutation_parity<T: Eq>(from: &[T], to: &[T]) -> bool {
    let n = from.len();
    if n != to.len() {
        return true;
    }
    let perm: Vec<usize> = from
        .iter()
        .map(|f| to.iter().position(|t| t == f).unwrap_or(0))
        .collect();
    let mut visited = vec![false; n];
    let mut swaps = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut cycle_len = 0;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        swaps += cycle_len - 1;
    }
    swaps.is_multiple_of(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondOrder;

    fn ethanol() -> Mol {
        let mut mol = Mol::new();
        let c1 = mol.add_atom(Atom { atomic_num: 6, hydrogen_count: 3, ..Atom::default() });
        let c2 = mol.add_atom(Atom { atomic_num: 6, hydrogen_count: 2, ..Atom::default() });
        let o = mol.add_atom(Atom { atomic_num: 8, hydrogen_count: 1, ..Atom::default() });
        mol.add_bond(c1, c2, Bond::new(BondOrder::Single));
        mol.add_bond(c2, o, Bond::new(BondOrder::Single));
        mol
    }

    #[test]
    fn counts_and_degree() {
        let mol = ethanol();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.degree(NodeIndex::new(0)), 1);
        assert_eq!(mol.degree(NodeIndex::new(1)), 2);
    }

    #[test]
    fn bond_between_endpoints() {
        let mol = ethanol();
        let e = mol.bond_between(NodeIndex::new(1), NodeIndex::new(2));
        assert!(e.is_some());
        assert!(mol.bond_between(NodeIndex::new(0), NodeIndex::new(2)).is_none());
    }

    #[test]
    fn equality_by_structure() {
        assert_eq!(ethanol(), ethanol());
        let mut other = ethanol();
        other.atom_mut(NodeIndex::new(2)).formal_charge = -1;
        assert_ne!(ethanol(), other);
    }

    #[test]
    fn parity_identity_is_even() {
        assert!(permutation_parity(&[1, 2, 3, 4], &[1, 2, 3, 4]));
    }

    #[test]
    fn parity_single_swap_is_odd() {
        assert!(!permutation_parity(&[1, 2, 3, 4], &[2, 1, 3, 4]));
    }

    #[test]
    fn parity_three_cycle_is_even() {
        assert!(permutation_parity(&[1, 2, 3], &[3, 1, 2]));
    }
}
