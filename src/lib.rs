//! # structure-pipeline
//!
//! Deterministic molecular structure normalization, depiction, and
//! descriptor pipeline.
//!
//! The pipeline answers one question:
//!
//! > Given a textual structure encoding, what is its canonical form, and
//! > what can be derived from it?
//!
//! ## Core Contract
//!
//! 1. Parse permissive real-world notation (SMILES, V2000 molblocks)
//!    into one internal graph representation
//! 2. Normalize via explicit, *named* transformation steps; nothing
//!    changes molecular identity silently
//! 3. Derive every downstream artifact from the same canonical atom
//!    ranking: canonical SMILES, layered identifier and hashed key,
//!    Murcko scaffold, descriptor vector, 2D/3D coordinates, SVG
//!    depictions, sugar analyses, stereoisomer expansions
//!
//! ## Architecture
//!
//! ```text
//! Input Text → Parser → Standardization → Canonical Ranking
//!                                              ↓
//!          Descriptors / Coordinates / Depiction / Sugar / Stereo
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Identical input text yields byte-identical canonical output
//! - All tie-breaks are index-based, never pointer- or hash-ordered
//! - Seeded embedding: the same molecule and seed give the same conformer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod config;
pub mod coords;
pub mod depict;
pub mod descriptors;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod rings;
pub mod stereo;
pub mod sugar;
pub mod types;

pub mod canon;
pub mod parser;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use canon::{
    canonicalize, identifier_key, layered_identifier, murcko_scaffold, standardize,
    standardize_with, write_canonical_smiles, StandardizationRules,
    STANDARDIZATION_RULES_VERSION,
};
pub use canonical::{canonical_hash_hex, table_fingerprint};
pub use config::PipelineConfig;
pub use coords::{embed_3d, layout_2d, EmbedOptions};
pub use depict::{depict, DepictionOptions, Palette, SvgDocument, PALETTE_VERSION};
pub use descriptors::describe;
pub use error::ChemError;
pub use generate::{
    generate_structures, ExhaustiveGenerator, StructureGenerator, DEFAULT_HEAVY_ATOM_CEILING,
};
pub use parser::{parse_molblock, parse_smiles, write_molblock, StructureInput};
pub use pipeline::{RuleFingerprints, StandardisedStructure, StructurePipeline};
pub use rings::RingInfo;
pub use stereo::enumerate_stereoisomers;
pub use sugar::{classify_sugars, remove_sugars, SugarRules, SUGAR_RULES_VERSION};
pub use types::canonical_form::CanonicalForm;
pub use types::conformer::Conformer;
pub use types::descriptors::DescriptorVector;
pub use types::formula::MolecularFormula;
pub use types::molecule::Molecule;
pub use types::sugar::{SugarClassification, SugarRemovalMode};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, AppState, ServiceState};
