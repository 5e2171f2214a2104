//! Input format parsers.
//!
//! Two entry points: [`parse_smiles`] for line notation and
//! [`parse_molblock`] for V2000 connection tables. Both produce the same
//! [`Molecule`](crate::types::Molecule) graph; the molblock reader also
//! returns the coordinates it found. [`StructureInput`] wraps the two with
//! format auto-detection for callers that accept either encoding.

mod molblock;
mod smiles;

pub use molblock::{parse_molblock, write_molblock};
pub use smiles::parse_smiles;

pub(crate) use smiles::permutation_parity_to_sorted;

use crate::error::ChemError;
use crate::types::molecule::Molecule;

/// A structure encoding with its detected format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureInput {
    /// SMILES line notation.
    Smiles(String),
    /// V2000 connection-table molblock.
    Molblock(String),
}

impl StructureInput {
    /// Detect the encoding: multi-line text carrying a `V2000` counts line
    /// is a molblock, anything else is SMILES.
    pub fn detect(text: &str) -> StructureInput {
        let multi_line = text.trim().lines().count() > 1;
        if multi_line && text.contains("V2000") {
            StructureInput::Molblock(text.to_string())
        } else {
            StructureInput::Smiles(text.to_string())
        }
    }

    /// Parse into a molecule graph; molblock coordinates are discarded.
    pub fn parse(&self) -> Result<Molecule, ChemError> {
        match self {
            StructureInput::Smiles(text) => parse_smiles(text),
            StructureInput::Molblock(text) => parse_molblock(text).map(|(mol, _)| mol),
        }
    }

    /// The raw input text.
    pub fn as_str(&self) -> &str {
        match self {
            StructureInput::Smiles(text) | StructureInput::Molblock(text) => text,
        }
    }
}
