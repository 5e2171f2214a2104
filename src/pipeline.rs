//! The composition root.
//!
//! [`StructurePipeline`] holds the configuration and the versioned rule
//! tables, and exposes one method per service operation. Each method is
//! a synchronous composition of the core stages; the HTTP layer calls
//! them from blocking worker tasks. The pipeline is stateless across
//! calls: identical input text always yields byte-identical output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canon::{canonicalize, standardize_with, StandardizationRules};
use crate::config::PipelineConfig;
use crate::coords::{embed_3d, EmbedOptions};
use crate::depict::{depict, DepictionOptions, Palette, SvgDocument};
use crate::descriptors::describe;
use crate::error::ChemError;
use crate::parser::{parse_smiles, write_molblock, StructureInput};
use crate::stereo::enumerate_stereoisomers;
use crate::sugar::{classify_sugars_with, remove_sugars_with, SugarRules};
use crate::types::descriptors::DescriptorVector;
use crate::types::molecule::Molecule;
use crate::types::sugar::SugarRemovalMode;

/// Standardise output: the canonical bundle plus the rule-set version
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardisedStructure {
    /// Canonical V2000 connection table of the standardized molecule.
    pub standardised_mol: String,
    /// Canonical SMILES of the standardized molecule.
    pub canonical_smiles: String,
    /// Layered structure identifier.
    pub identifier: String,
    /// Fixed-length hashed key derived from the identifier.
    pub identifier_key: String,
    /// Murcko framework as canonical SMILES; absent for acyclic input.
    pub murcko_scaffold: Option<String>,
    /// Standardization rule-set version applied.
    pub rules_version: String,
}

/// Fingerprints of every versioned rule table the pipeline carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFingerprints {
    /// Standardization rule table.
    pub standardization: String,
    /// Sugar detection rule table.
    pub sugar_rules: String,
    /// Depiction color palette.
    pub palette: String,
}

/// Stateless facade over the pipeline stages.
#[derive(Debug, Clone)]
pub struct StructurePipeline {
    config: PipelineConfig,
    standardization: StandardizationRules,
    sugar_rules: SugarRules,
    palette: Palette,
}

impl Default for StructurePipeline {
    fn default() -> Self {
        StructurePipeline::new(PipelineConfig::default())
    }
}

impl StructurePipeline {
    /// Pipeline with the given configuration and default rule tables.
    pub fn new(config: PipelineConfig) -> Self {
        StructurePipeline {
            config,
            standardization: StandardizationRules::default(),
            sugar_rules: SugarRules::default(),
            palette: Palette::default(),
        }
    }

    /// The configuration this pipeline runs under.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fingerprints of the rule tables in effect.
    pub fn rule_fingerprints(&self) -> RuleFingerprints {
        RuleFingerprints {
            standardization: self.standardization.fingerprint(),
            sugar_rules: self.sugar_rules.fingerprint(),
            palette: self.palette.fingerprint(),
        }
    }

    /// One cheap end-to-end pass, for readiness probes.
    pub fn self_check(&self) -> Result<(), ChemError> {
        let mol = parse_smiles("CCO")?;
        canonicalize(&standardize_with(&mol, &self.standardization))?;
        Ok(())
    }

    /// Standardise a structure (SMILES or molblock, auto-detected) and derive
    /// the canonical bundle from the standardized graph.
    pub fn standardise(&self, text: &str) -> Result<StandardisedStructure, ChemError> {
        let mol = StructureInput::detect(text).parse()?;
        let standardized = standardize_with(&mol, &self.standardization);
        let form = canonicalize(&standardized)?;
        debug!(
            smiles = %form.canonical_smiles,
            rules = %self.standardization.version,
            "standardised structure"
        );
        Ok(StandardisedStructure {
            standardised_mol: form.molblock,
            canonical_smiles: form.canonical_smiles,
            identifier: form.identifier,
            identifier_key: form.identifier_key,
            murcko_scaffold: form.scaffold_smiles,
            rules_version: self.standardization.version.clone(),
        })
    }

    /// The 17-descriptor record for a SMILES input.
    pub fn descriptors(&self, smiles: &str) -> Result<DescriptorVector, ChemError> {
        let mol = parse_smiles(smiles)?;
        Ok(describe(&mol))
    }

    /// All stereoisomers reachable by assigning the unassigned centers,
    /// as sorted canonical SMILES.
    pub fn stereoisomers(&self, smiles: &str) -> Result<Vec<String>, ChemError> {
        let mol = parse_smiles(smiles)?;
        Ok(enumerate_stereoisomers(&mol, self.config.max_stereo_centers))
    }

    /// Render a depiction of a SMILES input.
    pub fn depict(&self, smiles: &str, options: &DepictionOptions) -> Result<SvgDocument, ChemError> {
        let mol = parse_smiles(smiles)?;
        depict(&mol, options)
    }

    /// Embed a 3D conformer and return it as a V2000 molblock with
    /// explicit hydrogens.
    pub fn conformer_molblock(&self, smiles: &str) -> Result<String, ChemError> {
        let mol = parse_smiles(smiles)?;
        let options = EmbedOptions {
            seed: self.config.embed_seed,
            max_minimize_steps: self.config.embed_max_steps,
            ..EmbedOptions::default()
        };
        match embed_3d(&mol, &options) {
            Some((expanded, conformer)) => Ok(write_molblock(&expanded, &conformer)),
            None => Err(ChemError::NonConvergence {
                steps: self.config.embed_max_steps,
                residual: f64::INFINITY,
            }),
        }
    }

    /// The sugar classification sentence for a SMILES input.
    pub fn sugar_info(&self, smiles: &str) -> Result<&'static str, ChemError> {
        let mol = parse_smiles(smiles)?;
        Ok(classify_sugars_with(&mol, &self.sugar_rules).message())
    }

    /// Remove the targeted sugar motifs and return the aglycone as
    /// canonical SMILES.
    ///
    /// A molecule that is consumed entirely is reported as
    /// [`ChemError::SugarRemovalEmptyResult`].
    pub fn remove_sugars(&self, smiles: &str, mode: SugarRemovalMode) -> Result<String, ChemError> {
        let mol = parse_smiles(smiles)?;
        match remove_sugars_with(&mol, mode, &self.sugar_rules)? {
            Some(aglycone) => Ok(crate::canon::write_canonical_smiles(&aglycone)),
            None => Err(ChemError::SugarRemovalEmptyResult),
        }
    }

    /// Parse and standardise a SMILES input, returning the molecule.
    pub fn standardized_molecule(&self, smiles: &str) -> Result<Molecule, ChemError> {
        let mol = parse_smiles(smiles)?;
        Ok(standardize_with(&mol, &self.standardization))
    }
}
