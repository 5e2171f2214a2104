//! Canonical ranking, emission, and normalization.
//!
//! One Morgan-style ranking drives everything here: the SMILES writer, the
//! layered identifier, the canonical molblock ordering, and the scaffold
//! output all read from it, so the pieces of a [`CanonicalForm`] agree with
//! each other by construction.

mod identifier;
mod ranking;
mod scaffold;
mod standardize;
mod writer;

pub use identifier::{identifier_key, layered_identifier};
pub use ranking::canonical_ranks;
pub use scaffold::murcko_scaffold;
pub use standardize::{
    standardize, standardize_with, StandardizationRules, StandardizationStep,
    STANDARDIZATION_RULES_VERSION,
};
pub use writer::write_canonical_smiles;

pub(crate) use ranking::refined_invariants;

use crate::coords::layout_2d;
use crate::error::ChemError;
use crate::parser::{parse_smiles, write_molblock};
use crate::types::canonical_form::CanonicalForm;
use crate::types::molecule::Molecule;

/// Derive the full canonical bundle for a molecule.
///
/// The canonical SMILES is written first and re-read, so the molblock,
/// identifier and scaffold all come from the canonically numbered graph;
/// two inputs naming the same structure yield byte-identical bundles.
/// Standardization is *not* applied here; callers chain it explicitly when
/// they want the normalized form.
pub fn canonicalize(mol: &Molecule) -> Result<CanonicalForm, ChemError> {
    let canonical_smiles = write_canonical_smiles(mol);
    let canonical_mol = parse_smiles(&canonical_smiles)?.with_name(mol.name.clone());

    let identifier = layered_identifier(&canonical_mol);
    let identifier_key = identifier_key(&identifier);
    let layout = layout_2d(&canonical_mol);
    let molblock = write_molblock(&canonical_mol, &layout);
    let scaffold_smiles = murcko_scaffold(&canonical_mol).map(|s| write_canonical_smiles(&s));

    Ok(CanonicalForm {
        canonical_smiles,
        molblock,
        identifier,
        identifier_key,
        scaffold_smiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_fields_agree() {
        let mol = parse_smiles("Cc1ccccc1").unwrap();
        let form = canonicalize(&mol).unwrap();
        assert_eq!(form.canonical_smiles, write_canonical_smiles(&mol));
        assert_eq!(form.identifier_key, identifier_key(&form.identifier));
        assert!(form.molblock.contains("V2000"));
        assert_eq!(
            form.scaffold_smiles.as_deref(),
            Some(write_canonical_smiles(&parse_smiles("c1ccccc1").unwrap()).as_str())
        );
    }

    #[test]
    fn bundle_is_input_order_invariant() {
        let a = canonicalize(&parse_smiles("CCO").unwrap()).unwrap();
        let b = canonicalize(&parse_smiles("OCC").unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn acyclic_bundle_has_no_scaffold() {
        let form = canonicalize(&parse_smiles("CCO").unwrap()).unwrap();
        assert_eq!(form.scaffold_smiles, None);
    }
}
