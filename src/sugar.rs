//! Sugar motif detection and removal.
//!
//! Two motif families are recognized, driven by a versioned rule table.
//! Ring sugars are 5- or 6-membered saturated oxygen heterocycles whose
//! carbons are dense in exocyclic oxygens; linear sugars are open-chain
//! runs of oxygenated carbons. [`remove_sugars`] deletes the matched
//! units, lets the attachment points heal with implicit hydrogens, keeps
//! the largest remaining fragment and re-canonicalizes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::canon::write_canonical_smiles;
use crate::canonical::table_fingerprint;
use crate::error::ChemError;
use crate::parser::parse_smiles;
use crate::rings::RingInfo;
use crate::types::molecule::Molecule;
use crate::types::sugar::{SugarClassification, SugarRemovalMode};

/// Rule-table version reported alongside desugared output.
pub const SUGAR_RULES_VERSION: &str = "sugar-rules/v1";

/// Versioned rule table driving detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SugarRules {
    /// Version tag carried into responses.
    pub version: String,
    /// Ring sizes eligible as circular sugar cores.
    pub ring_sizes: Vec<usize>,
    /// Minimum fraction of ring carbons bearing an exocyclic
    /// single-bonded oxygen.
    pub min_oxygenated_fraction: f64,
    /// Minimum number of connected oxygenated chain carbons for the
    /// linear motif.
    pub min_linear_run: usize,
}

impl Default for SugarRules {
    fn default() -> Self {
        SugarRules {
            version: SUGAR_RULES_VERSION.to_string(),
            ring_sizes: vec![5, 6],
            min_oxygenated_fraction: 0.5,
            min_linear_run: 3,
        }
    }
}

impl SugarRules {
    /// Deterministic `version:hash` fingerprint of the whole table.
    pub fn fingerprint(&self) -> String {
        table_fingerprint(&self.version, self)
    }
}

/// Classify which sugar motif families a molecule contains.
pub fn classify_sugars(mol: &Molecule) -> SugarClassification {
    classify_sugars_with(mol, &SugarRules::default())
}

/// Classification under an explicit rule table.
pub fn classify_sugars_with(mol: &Molecule, rules: &SugarRules) -> SugarClassification {
    let rings = RingInfo::perceive(mol);
    let circular = !circular_sugar_rings(mol, &rings, rules).is_empty();
    let linear = !linear_sugar_runs(mol, &rings, rules).is_empty();
    SugarClassification::from_flags(circular, linear)
}

/// Remove the motif families selected by `mode` under the default rules.
///
/// Returns `Ok(None)` when nothing remains, which callers surface as
/// [`ChemError::SugarRemovalEmptyResult`]. When no motif of the selected
/// families is present the input comes back unchanged, so removal is
/// idempotent.
pub fn remove_sugars(
    mol: &Molecule,
    mode: SugarRemovalMode,
) -> Result<Option<Molecule>, ChemError> {
    remove_sugars_with(mol, mode, &SugarRules::default())
}

/// Removal under an explicit rule table.
pub fn remove_sugars_with(
    mol: &Molecule,
    mode: SugarRemovalMode,
    rules: &SugarRules,
) -> Result<Option<Molecule>, ChemError> {
    let rings = RingInfo::perceive(mol);
    let mut doomed: BTreeSet<usize> = BTreeSet::new();

    if mode.targets_circular() {
        for ring in circular_sugar_rings(mol, &rings, rules) {
            collect_circular_unit(mol, &rings, &ring, &mut doomed);
        }
    }
    if mode.targets_linear() {
        for run in linear_sugar_runs(mol, &rings, rules) {
            collect_linear_unit(mol, &rings, &run, &mut doomed);
        }
    }

    if doomed.is_empty() {
        return Ok(Some(mol.clone()));
    }
    let keep: Vec<usize> = (0..mol.atoms().len())
        .filter(|idx| !doomed.contains(idx))
        .collect();
    if keep.is_empty() {
        return Ok(None);
    }

    let aglycone = mol.induced_subgraph(&keep).largest_fragment();
    if aglycone.atoms().is_empty() {
        return Ok(None);
    }
    let rebuilt =
        parse_smiles(&write_canonical_smiles(&aglycone))?.with_name(mol.name.clone());
    Ok(Some(rebuilt))
}

/// Ring paths matching the circular motif: eligible size, saturated,
/// exactly one ring oxygen, the rest carbon, and enough of those carbons
/// carrying an exocyclic single-bonded oxygen.
fn circular_sugar_rings(mol: &Molecule, rings: &RingInfo, rules: &SugarRules) -> Vec<Vec<usize>> {
    let mut found = Vec::new();
    for path in rings.rings() {
        if !rules.ring_sizes.contains(&path.len()) {
            continue;
        }
        if path.iter().any(|&a| mol.atom(a).is_aromatic) {
            continue;
        }
        let oxygens = path
            .iter()
            .filter(|&&a| mol.atom(a).atomic_number == 8)
            .count();
        let carbons = path
            .iter()
            .filter(|&&a| mol.atom(a).atomic_number == 6)
            .count();
        if oxygens != 1 || oxygens + carbons != path.len() {
            continue;
        }

        let in_ring: BTreeSet<usize> = path.iter().copied().collect();
        let oxygenated = path
            .iter()
            .filter(|&&a| {
                mol.atom(a).atomic_number == 6 && has_exocyclic_oxygen(mol, a, &in_ring)
            })
            .count();
        if (oxygenated as f64) / (carbons as f64) >= rules.min_oxygenated_fraction {
            found.push(path.clone());
        }
    }
    found
}

fn has_exocyclic_oxygen(mol: &Molecule, atom: usize, ring: &BTreeSet<usize>) -> bool {
    mol.neighbors(atom).iter().any(|&(nbr, bond_idx)| {
        !ring.contains(&nbr)
            && mol.atom(nbr).atomic_number == 8
            && mol.bond(bond_idx).order == crate::types::bond::BondOrder::Single
    })
}

/// Connected runs of acyclic oxygenated carbons of at least the
/// configured length.
fn linear_sugar_runs(mol: &Molecule, rings: &RingInfo, rules: &SugarRules) -> Vec<Vec<usize>> {
    let candidate: Vec<bool> = (0..mol.atoms().len())
        .map(|idx| {
            mol.atom(idx).atomic_number == 6
                && !rings.is_ring_atom(idx)
                && mol.neighbors(idx).iter().any(|&(nbr, _)| {
                    mol.atom(nbr).atomic_number == 8 && !rings.is_ring_atom(nbr)
                })
        })
        .collect();

    let mut seen = vec![false; mol.atoms().len()];
    let mut runs = Vec::new();
    for start in 0..mol.atoms().len() {
        if !candidate[start] || seen[start] {
            continue;
        }
        let mut run = Vec::new();
        let mut queue = vec![start];
        seen[start] = true;
        while let Some(atom) = queue.pop() {
            run.push(atom);
            for &(nbr, _) in mol.neighbors(atom) {
                if candidate[nbr] && !seen[nbr] {
                    seen[nbr] = true;
                    queue.push(nbr);
                }
            }
        }
        if run.len() >= rules.min_linear_run {
            run.sort_unstable();
            runs.push(run);
        }
    }
    runs
}

/// The full circular sugar unit: ring atoms, their exocyclic oxygens
/// (hydroxyls and the glycosidic bridge both leave with the ring), and
/// terminal oxymethyl substituents such as the C6 of a hexose.
fn collect_circular_unit(
    mol: &Molecule,
    rings: &RingInfo,
    ring: &[usize],
    doomed: &mut BTreeSet<usize>,
) {
    let in_ring: BTreeSet<usize> = ring.iter().copied().collect();
    for &atom in ring {
        doomed.insert(atom);
        for &(nbr, _) in mol.neighbors(atom) {
            if in_ring.contains(&nbr) || rings.is_ring_atom(nbr) {
                continue;
            }
            match mol.atom(nbr).atomic_number {
                8 => {
                    doomed.insert(nbr);
                }
                6 if is_terminal_oxymethyl(mol, nbr, atom) => {
                    doomed.insert(nbr);
                    for &(o, _) in mol.neighbors(nbr) {
                        if o != atom && mol.atom(o).atomic_number == 8 {
                            doomed.insert(o);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// A carbon whose only heavy neighbors besides `anchor` are terminal
/// oxygens, so CH2OH, CHO and deoxy CH3 groups all qualify.
fn is_terminal_oxymethyl(mol: &Molecule, carbon: usize, anchor: usize) -> bool {
    mol.neighbors(carbon).iter().all(|&(nbr, _)| {
        nbr == anchor || (mol.atom(nbr).atomic_number == 8 && mol.degree(nbr) == 1)
    })
}

fn collect_linear_unit(
    mol: &Molecule,
    rings: &RingInfo,
    run: &[usize],
    doomed: &mut BTreeSet<usize>,
) {
    for &atom in run {
        doomed.insert(atom);
        for &(nbr, _) in mol.neighbors(atom) {
            if mol.atom(nbr).atomic_number == 8 && !rings.is_ring_atom(nbr) {
                doomed.insert(nbr);
            }
        }
    }
}
