use crate::element::Element;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, ChiralityToken, Token};

impl BondToken {
    /// Directional marks read in text order; the same bond seen from the
    /// other atom has the opposite sense. Non-directional bonds are
    /// unaffected.
    pub(crate) fn inverted(self) -> BondToken {
        match self {
            BondToken::Up => BondToken::Down,
            BondToken::Down => BondToken::Up,
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseAtom {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub chirality: ChiralityToken,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub is_bracket: bool,
    /// Neighbors in the order they appear in the text, with ring-closure
    /// partners at the position of their digit. A directional bond on the
    /// entry (x → y) always means "y is drawn above x" (`Up`) or below
    /// (`Down`); the reversed entry carries the inverted mark.
    pub neighbors: Vec<Neighbor>,
}

#[derive(Debug, Clone)]
pub struct Neighbor {
    pub bond: Option<BondToken>,
    pub atom_idx: usize,
}

#[derive(Debug, Clone)]
pub struct ParseTree {
    pub atoms: Vec<ParseAtom>,
}

pub fn build_parse_tree(tokens: &[Token]) -> Result<ParseTree, SmilesError> {
    let mut atoms: Vec<ParseAtom> = Vec::new();
    let mut stack: Vec<usize> = Vec::new(); // stack of current atom indices for branches
    let mut current: Option<usize> = None;
    let mut pending_bond: Option<BondToken> = None;
    let mut ring_opens: Vec<Option<(usize, Option<BondToken>, usize)>> = vec![None; 100];

    for token in tokens {
        match token {
            Token::Atom(atom_tok) => {
                let idx = atoms.len();
                atoms.push(parse_atom_from_token(atom_tok));

                if let Some(cur) = current {
                    let bond = pending_bond.take();
                    atoms[cur].neighbors.push(Neighbor {
                        bond,
                        atom_idx: idx,
                    });
                    atoms[idx].neighbors.push(Neighbor {
                        bond: bond.map(BondToken::inverted),
                        atom_idx: cur,
                    });
                } else {
                    pending_bond = None;
                }

                current = Some(idx);
            }
            Token::Bond(b) => {
                pending_bond = Some(*b);
            }
            Token::RingClosure { bond, digit, pos } => {
                let d = *digit as usize;
                let cur = current.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let mark = bond.or(pending_bond.take());

                if let Some((open_idx, open_mark, open_slot)) = ring_opens[d].take() {
                    // The opening mark reads open→close, the closing mark
                    // close→open; compare both in the open→close direction.
                    let forward = match (open_mark, mark.map(BondToken::inverted)) {
                        (None, None) => None,
                        (Some(b), None) | (None, Some(b)) => Some(b),
                        (Some(b1), Some(b2)) => {
                            if b1 == b2 {
                                Some(b1)
                            } else {
                                return Err(SmilesError::RingBondConflict { digit: *digit });
                            }
                        }
                    };

                    atoms[open_idx].neighbors[open_slot] = Neighbor {
                        bond: forward,
                        atom_idx: cur,
                    };
                    atoms[cur].neighbors.push(Neighbor {
                        bond: forward.map(BondToken::inverted),
                        atom_idx: open_idx,
                    });
                } else {
                    // Reserve the neighbor slot where the digit appears; the
                    // partner index is patched in when the ring closes.
                    ring_opens[d] = Some((cur, mark, atoms[cur].neighbors.len()));
                    atoms[cur].neighbors.push(Neighbor {
                        bond: mark,
                        atom_idx: usize::MAX,
                    });
                }
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                stack.push(cur);
            }
            Token::CloseParen(pos) => {
                current = Some(stack.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?);
                pending_bond = None;
            }
            Token::Dot(_) => {
                current = None;
                pending_bond = None;
            }
        }
    }

    if !stack.is_empty() {
        return Err(SmilesError::UnmatchedParen { pos: 0 });
    }

    for (digit, entry) in ring_opens.iter().enumerate() {
        if entry.is_some() {
            return Err(SmilesError::UnclosedRing {
                digit: digit as u16,
            });
        }
    }

    Ok(ParseTree { atoms })
}

fn parse_atom_from_token(tok: &AtomToken) -> ParseAtom {
    ParseAtom {
        element: tok.element,
        is_aromatic: tok.is_aromatic,
        isotope: tok.isotope,
        chirality: tok.chirality,
        hcount: tok.hcount,
        charge: tok.charge,
        is_bracket: tok.is_bracket,
        neighbors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::tokenizer::tokenize;

    #[test]
    fn ethane_tree() {
        let tokens = tokenize("CC").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        assert_eq!(tree.atoms.len(), 2);
        assert_eq!(tree.atoms[0].neighbors.len(), 1);
        assert_eq!(tree.atoms[0].neighbors[0].atom_idx, 1);
    }

    #[test]
    fn cyclohexane_tree() {
        let tokens = tokenize("C1CCCCC1").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        assert_eq!(tree.atoms.len(), 6);
        for atom in &tree.atoms {
            assert_eq!(atom.neighbors.len(), 2);
        }
    }

    #[test]
    fn branch_tree() {
        let tokens = tokenize("CC(C)C").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        assert_eq!(tree.atoms.len(), 4);
        assert_eq!(tree.atoms[1].neighbors.len(), 3);
    }

    #[test]
    fn directional_marks_are_per_direction() {
        let tokens = tokenize("F/C=C/F").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        // F0 sees C1 above it; C1 sees F0 below it.
        assert_eq!(tree.atoms[0].neighbors[0].bond, Some(BondToken::Up));
        assert_eq!(tree.atoms[1].neighbors[0].bond, Some(BondToken::Down));
        assert_eq!(tree.atoms[2].neighbors[1].bond, Some(BondToken::Up));
        assert_eq!(tree.atoms[3].neighbors[0].bond, Some(BondToken::Down));
    }

    #[test]
    fn ring_bond_conflict() {
        let tokens = tokenize("C=1CCCC#1").unwrap();
        assert!(matches!(
            build_parse_tree(&tokens),
            Err(SmilesError::RingBondConflict { digit: 1 })
        ));
    }

    #[test]
    fn ring_bond_agreement() {
        let tokens = tokenize("C=1CCCC=1").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        assert_eq!(tree.atoms[0].neighbors.len(), 2);
        assert_eq!(tree.atoms[0].neighbors[0].bond, Some(BondToken::Double));
    }

    #[test]
    fn ring_partner_sits_at_digit_position() {
        let tokens = tokenize("C1CCCCC1").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        // The digit on the first atom comes before its chain neighbor.
        assert_eq!(tree.atoms[0].neighbors[0].atom_idx, 5);
        assert_eq!(tree.atoms[0].neighbors[1].atom_idx, 1);
        assert_eq!(tree.atoms[5].neighbors[1].atom_idx, 0);
    }

    #[test]
    fn unclosed_ring_error() {
        let tokens = tokenize("C1CC").unwrap();
        assert!(matches!(
            build_parse_tree(&tokens),
            Err(SmilesError::UnclosedRing { digit: 1 })
        ));
    }

    #[test]
    fn unmatched_paren_error() {
        let tokens = tokenize("C(C").unwrap();
        assert!(build_parse_tree(&tokens).is_err());
        let tokens = tokenize("(C)C").unwrap();
        assert!(build_parse_tree(&tokens).is_err());
    }

    #[test]
    fn disconnected() {
        let tokens = tokenize("[Na+].[Cl-]").unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        assert_eq!(tree.atoms.len(), 2);
        assert_eq!(tree.atoms[0].neighbors.len(), 0);
        assert_eq!(tree.atoms[1].neighbors.len(), 0);
    }
}
