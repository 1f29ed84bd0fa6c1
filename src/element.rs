/// Elements this crate's SMILES subset and feature pipeline encounter: the
/// organic subset plus the hetero elements, counterions, and metals common in
/// drug-like structures. Discriminants are atomic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    H = 1,
    Li = 3,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    As = 33,
    Se = 34,
    Br = 35,
    Ag = 47,
    Sn = 50,
    Te = 52,
    I = 53,
    Pt = 78,
    Au = 79,
    Hg = 80,
}

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        SYMBOL_TABLE
            .iter()
            .find(|(_, e)| e.atomic_num() == n)
            .map(|(_, e)| *e)
    }

    pub fn from_symbol(s: &str) -> Option<Element> {
        SYMBOL_TABLE.iter().find(|(sym, _)| *sym == s).map(|(_, e)| *e)
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::Li => "Li",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::As => "As",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::Ag => "Ag",
            Element::Sn => "Sn",
            Element::Te => "Te",
            Element::I => "I",
            Element::Pt => "Pt",
            Element::Au => "Au",
            Element::Hg => "Hg",
        }
    }

    /// Valences implicit-hydrogen counting may complete an atom to, lowest
    /// first. Empty for elements with no default (bracket atoms only).
    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br => &[1],
            Element::Si => &[4],
            Element::P | Element::As => &[3, 5],
            Element::S | Element::Se | Element::Te => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Elements writable without brackets in SMILES.
    pub fn is_organic_subset(self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }
}

// symbol, Element pairs for from_symbol lookup
const SYMBOL_TABLE: [(&str, Element); 32] = [
    ("H", Element::H), ("Li", Element::Li), ("B", Element::B), ("C", Element::C),
    ("N", Element::N), ("O", Element::O), ("F", Element::F), ("Na", Element::Na),
    ("Mg", Element::Mg), ("Al", Element::Al), ("Si", Element::Si), ("P", Element::P),
    ("S", Element::S), ("Cl", Element::Cl), ("K", Element::K), ("Ca", Element::Ca),
    ("Mn", Element::Mn), ("Fe", Element::Fe), ("Co", Element::Co), ("Ni", Element::Ni),
    ("Cu", Element::Cu), ("Zn", Element::Zn), ("As", Element::As), ("Se", Element::Se),
    ("Br", Element::Br), ("Ag", Element::Ag), ("Sn", Element::Sn), ("Te", Element::Te),
    ("I", Element::I), ("Pt", Element::Pt), ("Au", Element::Au), ("Hg", Element::Hg),
];
