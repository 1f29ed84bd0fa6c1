//! Substructure matching by VF2-style backtracking.
//!
//! Matches are reported as target atom indices in query atom order.
//! Query atoms are tried in index order and target candidates in
//! ascending index, so the search is deterministic and matching a
//! molecule against itself yields the identity sequence first. The
//! index aligner depends on both properties.

use petgraph::graph::NodeIndex;

use crate::mol::Mol;

/// Target atom index for each query atom, in query atom order.
pub type Match = Vec<usize>;

pub fn has_match(target: &Mol, query: &Mol) -> bool {
    first_match(target, query).is_some()
}

/// First match of `query` within `target`, or `None`.
pub fn first_match(target: &Mol, query: &Mol) -> Option<Match> {
    Vf2::new(target, query).find_first()
}

/// Every distinct match of `query` within `target`.
pub fn all_matches(target: &Mol, query: &Mol) -> Vec<Match> {
    Vf2::new(target, query).find_all()
}

struct Vf2<'a> {
    target: &'a Mol,
    query: &'a Mol,
    query_map: Vec<Option<NodeIndex>>,
    target_used: Vec<bool>,
}

impl<'a> Vf2<'a> {
    fn new(target: &'a Mol, query: &'a Mol) -> Self {
        Self {
            target,
            query,
            query_map: vec![None; query.atom_count()],
            target_used: vec![false; target.atom_count()],
        }
    }

    fn find_first(&mut self) -> Option<Match> {
        let mut results = Vec::new();
        self.recurse(0, &mut results, true);
        results.into_iter().next()
    }

    fn find_all(&mut self) -> Vec<Match> {
        let mut results = Vec::new();
        self.recurse(0, &mut results, false);
        results
    }

    fn recurse(&mut self, depth: usize, results: &mut Vec<Match>, first_only: bool) {
        if depth == self.query_map.len() {
            let mapping = self
                .query_map
                .iter()
                .map(|m| m.unwrap().index())
                .collect();
            results.push(mapping);
            return;
        }

        if first_only && !results.is_empty() {
            return;
        }

        let query_node = NodeIndex::new(depth);

        for t_idx in 0..self.target_used.len() {
            if self.target_used[t_idx] {
                continue;
            }

            let target_node = NodeIndex::new(t_idx);

            if !self.is_feasible(query_node, target_node) {
                continue;
            }

            self.query_map[depth] = Some(target_node);
            self.target_used[t_idx] = true;

            self.recurse(depth + 1, results, first_only);

            if first_only && !results.is_empty() {
                return;
            }

            self.query_map[depth] = None;
            self.target_used[t_idx] = false;
        }
    }

    fn is_feasible(&self, query_node: NodeIndex, target_node: NodeIndex) -> bool {
        if !atoms_compatible(self.target, target_node, self.query, query_node) {
            return false;
        }

        for q_neighbor in self.query.neighbors(query_node) {
            if let Some(t_mapped) = self.query_map[q_neighbor.index()] {
                let Some(t_bond) = self.target.bond_between(target_node, t_mapped) else {
                    return false;
                };
                let q_bond = self
                    .query
                    .bond_between(query_node, q_neighbor)
                    .expect("bond must exist between neighbors");

                let both_query_aromatic = self.query.atom(query_node).is_aromatic
                    && self.query.atom(q_neighbor).is_aromatic;
                let both_target_aromatic = self.target.atom(target_node).is_aromatic
                    && self.target.atom(t_mapped).is_aromatic;
                if both_query_aromatic && both_target_aromatic {
                    continue;
                }
                if self.target.bond(t_bond).order != self.query.bond(q_bond).order {
                    return false;
                }
            }
        }

        true
    }
}

fn atoms_compatible(target: &Mol, t: NodeIndex, query: &Mol, q: NodeIndex) -> bool {
    let target_atom = target.atom(t);
    let query_atom = query.atom(q);
    if target_atom.atomic_num != query_atom.atomic_num {
        return false;
    }
    if query_atom.is_aromatic && !target_atom.is_aromatic {
        return false;
    }
    true
}
