//! Bond record.

/// Bond order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    /// Single bond.
    Single,
    /// Double bond.
    Double,
    /// Triple bond.
    Triple,
    /// Aromatic bond (delocalized).
    Aromatic,
}

impl BondOrder {
    /// Numeric order used in valence sums. Aromatic counts 1.5.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// V2000 bond block type code.
    pub fn ctab_code(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }

    /// Inverse of [`BondOrder::ctab_code`].
    pub fn from_ctab_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            4 => Some(BondOrder::Aromatic),
            _ => None,
        }
    }
}

/// Stereo adornment on a bond.
///
/// `Up`/`Down` are SMILES directional single bonds (`/`, `\`), read with
/// respect to [`Bond::atom1`]. `WedgeUp`/`WedgeDown` are connection-table
/// wedges with the narrow end at `atom1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondStereo {
    /// No adornment.
    None,
    /// `/` directional bond.
    Up,
    /// `\` directional bond.
    Down,
    /// Solid wedge.
    WedgeUp,
    /// Hashed wedge.
    WedgeDown,
}

impl BondStereo {
    /// Flip a directional bond when its stored endpoint order is reversed.
    /// Wedges are anchored to their narrow end and do not flip.
    pub fn reversed(self) -> Self {
        match self {
            BondStereo::Up => BondStereo::Down,
            BondStereo::Down => BondStereo::Up,
            other => other,
        }
    }
}

/// A bond between two atoms, by index into the owning molecule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    /// First endpoint.
    pub atom1: usize,
    /// Second endpoint.
    pub atom2: usize,
    /// Bond order.
    pub order: BondOrder,
    /// Part of an aromatic ring system.
    pub is_aromatic: bool,
    /// Stereo adornment.
    pub stereo: BondStereo,
}

impl Bond {
    /// A plain bond with no aromaticity or stereo.
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Bond {
            atom1,
            atom2,
            order,
            is_aromatic: order == BondOrder::Aromatic,
            stereo: BondStereo::None,
        }
    }

    /// The endpoint that is not `atom`.
    pub fn other(&self, atom: usize) -> usize {
        if self.atom1 == atom {
            self.atom2
        } else {
            self.atom1
        }
    }

    /// Whether `atom` is one of the endpoints.
    pub fn touches(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctab_codes_round_trip() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(BondOrder::from_ctab_code(order.ctab_code()), Some(order));
        }
        assert_eq!(BondOrder::from_ctab_code(9), None);
    }

    #[test]
    fn directional_reversal() {
        assert_eq!(BondStereo::Up.reversed(), BondStereo::Down);
        assert_eq!(BondStereo::WedgeUp.reversed(), BondStereo::WedgeUp);
        assert_eq!(BondStereo::None.reversed(), BondStereo::None);
    }

    #[test]
    fn endpoint_helpers() {
        let bond = Bond::new(2, 5, BondOrder::Double);
        assert_eq!(bond.other(2), 5);
        assert_eq!(bond.other(5), 2);
        assert!(bond.touches(5));
        assert!(!bond.touches(3));
    }
}
