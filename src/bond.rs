use petgraph::graph::NodeIndex;

/// Bond order category. Aromatic is first-class: bonds written lowercase or
/// implied between aromatic atoms keep this order in the graph, since the
/// feature encoding has its own aromatic slot and nothing downstream needs a
/// Kekulé assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

/// Double-bond geometry parsed from directional marks, carrying the two
/// reference neighbor atoms the marks were attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    /// Reference atoms on the same side of the double bond.
    Cis(NodeIndex, NodeIndex),
    /// Reference atoms on opposite sides.
    Trans(NodeIndex, NodeIndex),
}

/// Bond edge weight for a molecular graph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bond {
    pub order: BondOrder,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(order: BondOrder) -> Bond {
        Bond {
            order,
            stereo: BondStereo::None,
        }
    }
}
