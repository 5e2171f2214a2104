//! Molecule standardization.
//!
//! The explicit normalization pass between parsing and canonical output:
//! salt stripping, fragment selection, charge neutralization, tautomer
//! selection and redundant-stereo cleanup. Every step is named and applies
//! in a fixed order from a versioned rule table, so a response can cite
//! exactly which rules produced it.

use serde::{Deserialize, Serialize};

use crate::canon::ranking::refined_invariants;
use crate::canonical::table_fingerprint;
use crate::types::atom::Chirality;
use crate::types::bond::{Bond, BondOrder, BondStereo};
use crate::types::molecule::Molecule;

/// Rule-table version reported alongside standardized output.
pub const STANDARDIZATION_RULES_VERSION: &str = "std-rules/v1";

/// A named standardization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardizationStep {
    /// Drop recognized counterion and solvent fragments.
    StripSalts,
    /// Keep only the largest connected component.
    KeepLargestFragment,
    /// Protonate or deprotonate common charged groups.
    NeutralizeCharges,
    /// Pick the scoring-preferred tautomer.
    CanonicalTautomer,
    /// Remove stereo marks that do not describe a real stereocenter.
    ClearRedundantStereo,
}

/// Versioned rule table driving [`standardize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizationRules {
    /// Version tag carried into responses.
    pub version: String,
    /// Steps in application order.
    pub steps: Vec<StandardizationStep>,
    /// Single-atom counterions recognized by salt stripping, as
    /// (atomic number, formal charge) pairs.
    pub counterions: Vec<(u8, i8)>,
    /// Fragments of at most this many atoms containing no carbon or
    /// silicon count as solvent.
    pub max_inorganic_fragment_atoms: usize,
    /// Proton-shift transforms tried by tautomer selection, as
    /// (donor element, minimum hydrogens, acceptor element) triples
    /// matched over donor-X single / X=acceptor double patterns.
    pub proton_shifts: Vec<(u8, u8, u8)>,
    /// Ceiling on tautomer improvement passes.
    pub max_tautomer_passes: usize,
}

impl Default for StandardizationRules {
    fn default() -> Self {
        StandardizationRules {
            version: STANDARDIZATION_RULES_VERSION.to_string(),
            steps: vec![
                StandardizationStep::StripSalts,
                StandardizationStep::KeepLargestFragment,
                StandardizationStep::NeutralizeCharges,
                StandardizationStep::CanonicalTautomer,
                StandardizationStep::ClearRedundantStereo,
            ],
            counterions: vec![
                (11, 1),  // Na+
                (19, 1),  // K+
                (3, 1),   // Li+
                (17, -1), // Cl-
                (35, -1), // Br-
                (53, -1), // I-
                (9, -1),  // F-
                (20, 2),  // Ca2+
                (12, 2),  // Mg2+
            ],
            max_inorganic_fragment_atoms: 3,
            proton_shifts: vec![
                // Enol -> ketone: O(H)-C=C becomes O=C-C(H).
                (8, 1, 6),
                // Imidic acid -> amide: O(H)-C=N becomes O=C-N(H).
                (8, 1, 7),
            ],
            max_tautomer_passes: 10,
        }
    }
}

impl StandardizationRules {
    /// Deterministic `version:hash` fingerprint of the whole table.
    pub fn fingerprint(&self) -> String {
        table_fingerprint(&self.version, self)
    }
}

/// Standardize under the default rule table.
pub fn standardize(mol: &Molecule) -> Molecule {
    standardize_with(mol, &StandardizationRules::default())
}

/// Run the configured steps in order.
pub fn standardize_with(mol: &Molecule, rules: &StandardizationRules) -> Molecule {
    let mut current = mol.clone();
    for step in &rules.steps {
        current = match step {
            StandardizationStep::StripSalts => strip_salts(&current, rules),
            StandardizationStep::KeepLargestFragment => current.largest_fragment(),
            StandardizationStep::NeutralizeCharges => neutralize(&current),
            StandardizationStep::CanonicalTautomer => canonical_tautomer(&current, rules),
            StandardizationStep::ClearRedundantStereo => clear_redundant_stereo(&current),
        };
    }
    current
}

/// Remove counterion and solvent fragments, keeping every component that
/// does not look like one. A molecule that is entirely salt falls back to
/// its largest fragment rather than vanishing.
fn strip_salts(mol: &Molecule, rules: &StandardizationRules) -> Molecule {
    let components = mol.components();
    if components.len() <= 1 {
        return mol.clone();
    }
    let kept: Vec<&Vec<usize>> = components
        .iter()
        .filter(|c| !is_salt_fragment(mol, c, rules))
        .collect();
    if kept.is_empty() {
        return mol.largest_fragment();
    }
    let mut keep_atoms: Vec<usize> = kept.iter().flat_map(|c| c.iter().copied()).collect();
    keep_atoms.sort_unstable();
    mol.induced_subgraph(&keep_atoms)
}

fn is_salt_fragment(mol: &Molecule, component: &[usize], rules: &StandardizationRules) -> bool {
    if component.len() == 1 {
        let atom = mol.atom(component[0]);
        return rules
            .counterions
            .iter()
            .any(|&(z, q)| atom.atomic_number == z && atom.formal_charge == q);
    }
    if component.len() <= rules.max_inorganic_fragment_atoms {
        let all_inorganic = component.iter().all(|&i| {
            let z = mol.atom(i).atomic_number;
            z != 6 && z != 14
        });
        if all_inorganic {
            return true;
        }
    }
    // Small carbon-free anions such as nitrate.
    if component.len() <= 4 {
        let has_negative = component.iter().any(|&i| mol.atom(i).formal_charge < 0);
        let no_carbon = component.iter().all(|&i| mol.atom(i).atomic_number != 6);
        if has_negative && no_carbon {
            return true;
        }
    }
    false
}

/// Protonation-state cleanup: N+ carrying a hydrogen loses it, anionic
/// oxygen and sulfur gain one. Heavy-atom count is untouched.
fn neutralize(mol: &Molecule) -> Molecule {
    let mut atoms = mol.atoms().to_vec();
    for atom in atoms.iter_mut() {
        if atom.atomic_number == 7 && atom.formal_charge > 0 && atom.implicit_hydrogens > 0 {
            atom.formal_charge -= 1;
            atom.implicit_hydrogens -= 1;
        }
        if (atom.atomic_number == 8 || atom.atomic_number == 16) && atom.formal_charge == -1 {
            atom.formal_charge = 0;
            atom.implicit_hydrogens += 1;
        }
    }
    Molecule::new(atoms, mol.bonds().to_vec()).with_name(mol.name.clone())
}

/// Greedy tautomer selection: try each configured proton shift, keep a
/// candidate only when it scores strictly better, stop after a full pass
/// without improvement or at the pass ceiling.
fn canonical_tautomer(mol: &Molecule, rules: &StandardizationRules) -> Molecule {
    let mut best = mol.clone();
    let mut best_score = tautomer_score(&best);
    for _ in 0..rules.max_tautomer_passes {
        let mut improved = false;
        for &(donor_z, min_h, acceptor_z) in &rules.proton_shifts {
            if let Some(candidate) = apply_proton_shift(&best, donor_z, min_h, acceptor_z) {
                let score = tautomer_score(&candidate);
                if score > best_score {
                    best = candidate;
                    best_score = score;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    best
}

/// First donor-X=acceptor match in index order, with the proton moved from
/// donor to acceptor and the two bond orders swapped. Aromatic atoms never
/// participate.
fn apply_proton_shift(
    mol: &Molecule,
    donor_z: u8,
    min_h: u8,
    acceptor_z: u8,
) -> Option<Molecule> {
    for donor in 0..mol.atom_count() {
        let d = mol.atom(donor);
        if d.atomic_number != donor_z || d.implicit_hydrogens < min_h || d.is_aromatic {
            continue;
        }
        for &(middle, donor_bond) in mol.neighbors(donor) {
            if mol.bond(donor_bond).order != BondOrder::Single || mol.atom(middle).is_aromatic {
                continue;
            }
            for &(acceptor, acceptor_bond) in mol.neighbors(middle) {
                if acceptor == donor {
                    continue;
                }
                let a = mol.atom(acceptor);
                if a.atomic_number != acceptor_z || a.is_aromatic {
                    continue;
                }
                if mol.bond(acceptor_bond).order != BondOrder::Double {
                    continue;
                }
                let mut atoms = mol.atoms().to_vec();
                let mut bonds = mol.bonds().to_vec();
                atoms[donor].implicit_hydrogens -= 1;
                atoms[acceptor].implicit_hydrogens += 1;
                bonds[donor_bond].order = BondOrder::Double;
                bonds[acceptor_bond].order = BondOrder::Single;
                return Some(Molecule::new(atoms, bonds).with_name(mol.name.clone()));
            }
        }
    }
    None
}

/// Prefers neutral, aromatic, carbonyl-bearing forms.
fn tautomer_score(mol: &Molecule) -> i64 {
    let charges: i64 = mol
        .atoms()
        .iter()
        .map(|a| a.formal_charge.unsigned_abs() as i64)
        .sum();
    let aromatic = mol.atoms().iter().filter(|a| a.is_aromatic).count() as i64;
    let carbonyls = mol
        .bonds()
        .iter()
        .filter(|b| {
            b.order == BondOrder::Double
                && (mol.atom(b.atom1).atomic_number == 8 || mol.atom(b.atom2).atomic_number == 8)
        })
        .count() as i64;
    aromatic * 5 + carbonyls * 3 - charges * 10
}

/// Drop tetrahedral tags whose substituents are not pairwise
/// distinguishable and directional marks with no supporting double bond.
/// Distinguishability comes from the refinement invariants, so equivalence
/// is judged over whole branches rather than immediate neighbors.
fn clear_redundant_stereo(mol: &Molecule) -> Molecule {
    let inv = refined_invariants(mol);
    let mut atoms = mol.atoms().to_vec();
    let mut bonds = mol.bonds().to_vec();
    for idx in 0..atoms.len() {
        if atoms[idx].chirality.is_set() && !is_true_stereocenter(mol, &inv, idx) {
            atoms[idx].chirality = Chirality::None;
        }
    }
    for bond in bonds.iter_mut() {
        if matches!(bond.stereo, BondStereo::Up | BondStereo::Down)
            && !supports_geometry(mol, &inv, bond)
        {
            bond.stereo = BondStereo::None;
        }
    }
    Molecule::new(atoms, bonds).with_name(mol.name.clone())
}

fn is_true_stereocenter(mol: &Molecule, inv: &[u64], idx: usize) -> bool {
    let atom = mol.atom(idx);
    if atom.implicit_hydrogens > 1 {
        return false;
    }
    if mol.degree(idx) + atom.implicit_hydrogens as usize != 4 {
        return false;
    }
    let mut classes: Vec<u64> = mol
        .neighbors(idx)
        .iter()
        .map(|&(nbr, _)| inv[nbr])
        .collect();
    classes.sort_unstable();
    classes.windows(2).all(|pair| pair[0] != pair[1])
}

/// A directional single bond is meaningful only next to a double bond with
/// distinguishable substituents on both ends.
fn supports_geometry(mol: &Molecule, inv: &[u64], dir_bond: &Bond) -> bool {
    for &end in &[dir_bond.atom1, dir_bond.atom2] {
        for &(across, bond_idx) in mol.neighbors(end) {
            if mol.bond(bond_idx).order != BondOrder::Double {
                continue;
            }
            if end_is_distinguishable(mol, inv, end, across)
                && end_is_distinguishable(mol, inv, across, end)
            {
                return true;
            }
        }
    }
    false
}

fn end_is_distinguishable(mol: &Molecule, inv: &[u64], end: usize, across: usize) -> bool {
    let substituents: Vec<u64> = mol
        .neighbors(end)
        .iter()
        .filter(|&&(nbr, _)| nbr != across)
        .map(|&(nbr, _)| inv[nbr])
        .collect();
    match substituents.len() {
        // Lone substituent pairs with the implicit hydrogen.
        1 => true,
        2 => substituents[0] != substituents[1],
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::writer::write_canonical_smiles;
    use crate::parser::parse_smiles;

    fn canon(smiles: &str) -> String {
        write_canonical_smiles(&parse_smiles(smiles).unwrap())
    }

    fn standardized(smiles: &str) -> String {
        write_canonical_smiles(&standardize(&parse_smiles(smiles).unwrap()))
    }

    #[test]
    fn strips_sodium_counterion() {
        let mol = standardize(&parse_smiles("[Na+].CC(=O)[O-]").unwrap());
        assert!(mol.atoms().iter().all(|a| a.atomic_number != 11));
        assert_eq!(mol.net_charge(), 0);
    }

    #[test]
    fn strips_solvent_water() {
        assert_eq!(standardized("O.CCO"), canon("CCO"));
    }

    #[test]
    fn keeps_largest_of_two_organics() {
        assert_eq!(standardized("CC.CCCC"), canon("CCCC"));
    }

    #[test]
    fn neutralizes_ammonium_and_alkoxide() {
        let ammonia = standardize(&parse_smiles("[NH4+]").unwrap());
        assert_eq!(ammonia.net_charge(), 0);
        assert_eq!(ammonia.atom(0).implicit_hydrogens, 3);
        assert_eq!(standardized("CC[O-]"), canon("CCO"));
    }

    #[test]
    fn zwitterion_comes_out_neutral() {
        let glycine = standardize(&parse_smiles("[NH3+]CC(=O)[O-]").unwrap());
        assert_eq!(glycine.net_charge(), 0);
        assert_eq!(glycine.heavy_atom_count(), 5);
    }

    #[test]
    fn enol_collapses_to_ketone() {
        assert_eq!(standardized("CC(O)=C"), canon("CC(=O)C"));
    }

    #[test]
    fn phenol_is_not_an_enol() {
        assert_eq!(standardized("Oc1ccccc1"), canon("Oc1ccccc1"));
    }

    #[test]
    fn false_stereocenter_loses_its_tag() {
        let out = standardized("C[C@H](C)O");
        assert!(!out.contains('@'), "got {}", out);
        assert_eq!(out, canon("CC(C)O"));
    }

    #[test]
    fn real_stereocenter_keeps_its_tag() {
        let out = standardized("C[C@H](N)O");
        assert!(out.contains('@'), "got {}", out);
    }

    #[test]
    fn standardization_is_idempotent() {
        for smiles in ["[Na+].CC(=O)[O-]", "[NH3+]CC(=O)[O-]", "CC(O)=C", "O.CCO"] {
            let once = standardize(&parse_smiles(smiles).unwrap());
            let twice = standardize(&once);
            assert_eq!(
                write_canonical_smiles(&once),
                write_canonical_smiles(&twice),
                "not idempotent for {}",
                smiles
            );
        }
    }

    #[test]
    fn rules_fingerprint_is_deterministic() {
        let a = StandardizationRules::default().fingerprint();
        let b = StandardizationRules::default().fingerprint();
        assert_eq!(a, b);
        assert!(a.starts_with(STANDARDIZATION_RULES_VERSION));
    }

    #[test]
    fn rules_fingerprint_tracks_changes() {
        let mut rules = StandardizationRules::default();
        rules.max_tautomer_passes = 3;
        assert_ne!(
            rules.fingerprint(),
            StandardizationRules::default().fingerprint()
        );
    }
}
