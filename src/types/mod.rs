//! Core types for the structure pipeline.

pub mod atom;
pub mod bond;
pub mod canonical_form;
pub mod conformer;
pub mod descriptors;
pub mod element;
pub mod formula;
pub mod molecule;
pub mod sugar;

pub use atom::{Atom, Chirality};
pub use bond::{Bond, BondOrder, BondStereo};
pub use canonical_form::CanonicalForm;
pub use conformer::{Conformer, Dimensionality};
pub use descriptors::DescriptorVector;
pub use formula::MolecularFormula;
pub use molecule::Molecule;
pub use sugar::{SugarClassification, SugarRemovalMode};
