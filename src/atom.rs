use crate::element::Element;

/// Tetrahedral chirality parity of an atom.
///
/// Stored relative to the atom's canonical neighbor order: the virtual
/// hydrogen first (when the atom carries exactly one), then graph neighbors
/// in ascending index order. `Ccw` means that order runs counterclockwise
/// when viewed with the first neighbor toward the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    /// No chirality recorded.
    #[default]
    None,
    /// Clockwise (@@) arrangement.
    Cw,
    /// Counterclockwise (@) arrangement.
    Ccw,
}

impl Chirality {
    pub fn flipped(self) -> Chirality {
        match self {
            Chirality::None => Chirality::None,
            Chirality::Cw => Chirality::Ccw,
            Chirality::Ccw => Chirality::Cw,
        }
    }
}

/// Atom node weight for a molecular graph.
///
/// `Atom` stores intrinsic atomic properties — the things you would read off
/// a structural formula. Computed properties (degree, stereo descriptors,
/// feature vectors) live with the graph that owns the atom.
///
/// # Examples
///
/// ```
/// use molgraph::{Atom, Chirality};
///
/// let carbon = Atom {
///     atomic_num: 6,
///     formal_charge: 0,
///     isotope: 0,
///     hydrogen_count: 3,
///     is_aromatic: false,
///     chirality: Chirality::None,
/// };
/// assert_eq!(carbon.symbol(), "C");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …). Identifies the element.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units (e.g. −1 for a carboxylate oxygen).
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance (the common case).
    pub isotope: u16,
    /// Number of virtual (suppressed) hydrogens on this atom.
    ///
    /// These are not graph nodes — they are implied by the atom's valence.
    /// After SMILES parsing, this count is the single source of truth for
    /// how many Hs the atom carries.
    pub hydrogen_count: u8,
    /// Whether this atom is in an aromatic ring.
    pub is_aromatic: bool,
    /// Tetrahedral parity, normalized to the canonical neighbor order.
    pub chirality: Chirality,
}

impl Atom {
    pub fn from_element(element: Element) -> Atom {
        Atom {
            atomic_num: element.atomic_num(),
            ..Atom::default()
        }
    }

    /// Element symbol, with deuterium (hydrogen, mass number 2) reported as
    /// `"D"` so it lands on its own feature-vocabulary entry.
    pub fn symbol(&self) -> &'static str {
        if self.atomic_num == 1 && self.isotope == 2 {
            return "D";
        }
        match Element::from_atomic_num(self.atomic_num) {
            Some(e) => e.symbol(),
            None => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_plain_elements() {
        let c = Atom { atomic_num: 6, ..Atom::default() };
        let cl = Atom { atomic_num: 17, ..Atom::default() };
        assert_eq!(c.symbol(), "C");
        assert_eq!(cl.symbol(), "Cl");
    }

    #[test]
    fn symbol_deuterium() {
        let d = Atom { atomic_num: 1, isotope: 2, ..Atom::default() };
        let h = Atom { atomic_num: 1, ..Atom::default() };
        let tritium = Atom { atomic_num: 1, isotope: 3, ..Atom::default() };
        assert_eq!(d.symbol(), "D");
        assert_eq!(h.symbol(), "H");
        assert_eq!(tritium.symbol(), "H");
    }

    #[test]
    fn chirality_flip() {
        assert_eq!(Chirality::Cw.flipped(), Chirality::Ccw);
        assert_eq!(Chirality::Ccw.flipped(), Chirality::Cw);
        assert_eq!(Chirality::None.flipped(), Chirality::None);
    }
}
