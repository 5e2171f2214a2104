//! Atom record.

use crate::types::element;

/// Tetrahedral chirality tag on an atom.
///
/// Stored in normalized form: the reference neighbor order is ascending
/// atom index with the implicit hydrogen (when present) last. Parsers
/// convert the as-written tag into this frame; writers convert back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chirality {
    /// No tetrahedral tag.
    None,
    /// Anticlockwise (`@`) in the reference neighbor order.
    Counterclockwise,
    /// Clockwise (`@@`) in the reference neighbor order.
    Clockwise,
}

impl Chirality {
    /// The opposite handedness. `None` stays `None`.
    pub fn inverted(self) -> Self {
        match self {
            Chirality::None => Chirality::None,
            Chirality::Counterclockwise => Chirality::Clockwise,
            Chirality::Clockwise => Chirality::Counterclockwise,
        }
    }

    /// Whether a tag is present.
    pub fn is_set(self) -> bool {
        self != Chirality::None
    }
}

/// A single atom in the molecular graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Element, by atomic number.
    pub atomic_number: u8,
    /// Formal charge in electron units.
    pub formal_charge: i8,
    /// Isotope mass number, when written explicitly.
    pub isotope: Option<u16>,
    /// Member of an aromatic ring system.
    pub is_aromatic: bool,
    /// Hydrogens not represented as graph atoms.
    pub implicit_hydrogens: u8,
    /// Tetrahedral tag, normalized (see [`Chirality`]).
    pub chirality: Chirality,
}

impl Atom {
    /// A neutral atom of the given element with everything else unset.
    pub fn of_element(atomic_number: u8) -> Self {
        Atom {
            atomic_number,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            implicit_hydrogens: 0,
            chirality: Chirality::None,
        }
    }

    /// Element symbol for display.
    pub fn symbol(&self) -> &'static str {
        element::symbol(self.atomic_number)
    }

    /// Whether this atom is a hydrogen graph atom.
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }
}
