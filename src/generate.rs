//! Constitutional isomer generation.
//!
//! Expands a molecular formula into every distinct connected structure
//! that satisfies the lowest standard valence of each element, reported
//! as sorted canonical SMILES. The search grows molecules level by
//! level (one heavy atom per level, attached by a single bond), then
//! raises bond orders and closes rings one unit at a time, deduping
//! each layer through the canonical writer. Every connected multigraph
//! contains a spanning tree reachable this way, so the walk is
//! exhaustive within the valence model.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::canon::write_canonical_smiles;
use crate::error::ChemError;
use crate::types::atom::Atom;
use crate::types::bond::{Bond, BondOrder};
use crate::types::element;
use crate::types::formula::MolecularFormula;
use crate::types::molecule::Molecule;

/// Heavy-atom ceiling applied when the caller does not configure one.
pub const DEFAULT_HEAVY_ATOM_CEILING: usize = 10;

/// Source of constitutional isomers for a molecular formula.
///
/// The pipeline ships one in-process implementor; the trait leaves room
/// for delegating generation to an external service.
#[async_trait]
pub trait StructureGenerator: Send + Sync {
    /// Every distinct structure matching the formula, as sorted
    /// canonical SMILES.
    async fn generate(&self, formula: &str) -> Result<Vec<String>, ChemError>;
}

/// In-process exhaustive generator with a heavy-atom ceiling.
#[derive(Debug, Clone)]
pub struct ExhaustiveGenerator {
    heavy_atom_ceiling: usize,
}

impl ExhaustiveGenerator {
    /// Generator refusing formulas with more heavy atoms than the
    /// given ceiling.
    pub fn new(heavy_atom_ceiling: usize) -> Self {
        ExhaustiveGenerator { heavy_atom_ceiling }
    }
}

impl Default for ExhaustiveGenerator {
    fn default() -> Self {
        ExhaustiveGenerator::new(DEFAULT_HEAVY_ATOM_CEILING)
    }
}

#[async_trait]
impl StructureGenerator for ExhaustiveGenerator {
    async fn generate(&self, formula: &str) -> Result<Vec<String>, ChemError> {
        let parsed: MolecularFormula = formula.parse()?;
        generate_structures(&parsed, self.heavy_atom_ceiling)
    }
}

/// All constitutional isomers of `formula`, sorted and duplicate-free.
///
/// Formulas with no heavy atoms, or whose hydrogen count no valence
/// assignment can reach, produce an empty list.
pub fn generate_structures(
    formula: &MolecularFormula,
    heavy_atom_ceiling: usize,
) -> Result<Vec<String>, ChemError> {
    let heavy = formula.heavy_atoms();
    if heavy.len() > heavy_atom_ceiling {
        return Err(ChemError::UnsupportedOption(format!(
            "formula {formula} has {} heavy atoms, generation is capped at {heavy_atom_ceiling}",
            heavy.len()
        )));
    }
    if heavy.is_empty() {
        return Ok(Vec::new());
    }
    let mut capacity_total = 0usize;
    for &number in &heavy {
        match bond_capacity(number) {
            Some(cap) => capacity_total += cap as usize,
            None => {
                return Err(ChemError::UnsupportedOption(format!(
                    "no valence model for element {}, cannot generate structures",
                    element::symbol(number)
                )));
            }
        }
    }
    let hydrogens = formula.hydrogen_count() as usize;
    if capacity_total < hydrogens || (capacity_total - hydrogens) % 2 != 0 {
        return Ok(Vec::new());
    }
    // Fixed total bond order: every structure with this formula spends
    // exactly this many units across its bonds.
    let bond_units = (capacity_total - hydrogens) / 2;
    if bond_units + 1 < heavy.len() {
        return Ok(Vec::new());
    }

    let target = element_counts(&heavy);
    let mut frontier = seed_frontier(&target);
    for _ in 1..heavy.len() {
        frontier = grow_by_one_atom(&frontier, &target);
    }
    for _ in heavy.len() - 1..bond_units {
        frontier = add_one_bond_unit(&frontier);
    }
    Ok(frontier.into_keys().collect())
}

/// Maximum total bond order an atom of the element can carry, from its
/// lowest standard valence.
fn bond_capacity(number: u8) -> Option<u8> {
    element::default_valences(number).first().copied()
}

fn element_counts(heavy: &[u8]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for &number in heavy {
        *counts.entry(number).or_insert(0) += 1;
    }
    counts
}

/// Level-one frontier: one molecule per distinct element.
fn seed_frontier(target: &BTreeMap<u8, usize>) -> BTreeMap<String, Molecule> {
    let mut frontier = BTreeMap::new();
    for &number in target.keys() {
        let mol = finish(vec![Atom::of_element(number)], Vec::new());
        frontier.insert(write_canonical_smiles(&mol), mol);
    }
    frontier
}

/// Attach one more heavy atom to every molecule in the frontier, by a
/// single bond to each atom with spare capacity, trying each element
/// still owed by the formula.
fn grow_by_one_atom(
    frontier: &BTreeMap<String, Molecule>,
    target: &BTreeMap<u8, usize>,
) -> BTreeMap<String, Molecule> {
    let mut next = BTreeMap::new();
    for mol in frontier.values() {
        for number in remaining_elements(target, mol) {
            for anchor in 0..mol.atoms().len() {
                if spare_capacity(mol, anchor) < 1.0 {
                    continue;
                }
                let mut atoms = mol.atoms().to_vec();
                let mut bonds = mol.bonds().to_vec();
                atoms.push(Atom::of_element(number));
                bonds.push(Bond::new(anchor, atoms.len() - 1, BondOrder::Single));
                let grown = finish(atoms, bonds);
                next.entry(write_canonical_smiles(&grown)).or_insert(grown);
            }
        }
    }
    next
}

/// Spend one bond-order unit in every legal place: raise an existing
/// bond one order, or close a ring with a new single bond.
fn add_one_bond_unit(frontier: &BTreeMap<String, Molecule>) -> BTreeMap<String, Molecule> {
    let mut next = BTreeMap::new();
    for mol in frontier.values() {
        for a in 0..mol.atoms().len() {
            for b in a + 1..mol.atoms().len() {
                if spare_capacity(mol, a) < 1.0 || spare_capacity(mol, b) < 1.0 {
                    continue;
                }
                let mut bonds = mol.bonds().to_vec();
                match mol.bond_between(a, b) {
                    Some(idx) => match raised(bonds[idx].order) {
                        Some(order) => bonds[idx].order = order,
                        None => continue,
                    },
                    None => bonds.push(Bond::new(a, b, BondOrder::Single)),
                }
                let bumped = finish(mol.atoms().to_vec(), bonds);
                next.entry(write_canonical_smiles(&bumped)).or_insert(bumped);
            }
        }
    }
    next
}

fn raised(order: BondOrder) -> Option<BondOrder> {
    match order {
        BondOrder::Single => Some(BondOrder::Double),
        BondOrder::Double => Some(BondOrder::Triple),
        BondOrder::Triple | BondOrder::Aromatic => None,
    }
}

/// Distinct elements the formula still owes the molecule.
fn remaining_elements(target: &BTreeMap<u8, usize>, mol: &Molecule) -> Vec<u8> {
    let mut used: BTreeMap<u8, usize> = BTreeMap::new();
    for atom in mol.atoms() {
        *used.entry(atom.atomic_number).or_insert(0) += 1;
    }
    target
        .iter()
        .filter(|(number, &owed)| used.get(number).copied().unwrap_or(0) < owed)
        .map(|(&number, _)| number)
        .collect()
}

fn spare_capacity(mol: &Molecule, idx: usize) -> f64 {
    let cap = bond_capacity(mol.atom(idx).atomic_number).unwrap_or(0);
    let spent: f64 = mol
        .neighbors(idx)
        .iter()
        .map(|&(_, bond_idx)| mol.bond(bond_idx).order.as_f64())
        .sum();
    cap as f64 - spent
}

/// Build the molecule and fill leftover valence with implicit
/// hydrogens.
fn finish(mut atoms: Vec<Atom>, bonds: Vec<Bond>) -> Molecule {
    let mut spent = vec![0f64; atoms.len()];
    for bond in &bonds {
        spent[bond.atom1] += bond.order.as_f64();
        spent[bond.atom2] += bond.order.as_f64();
    }
    for (atom, used) in atoms.iter_mut().zip(&spent) {
        let cap = bond_capacity(atom.atomic_number).unwrap_or(0) as f64;
        atom.implicit_hydrogens = (cap - used).max(0.0) as u8;
    }
    Molecule::new(atoms, bonds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isomers(formula: &str) -> Vec<String> {
        let parsed: MolecularFormula = formula.parse().unwrap();
        generate_structures(&parsed, DEFAULT_HEAVY_ATOM_CEILING).unwrap()
    }

    #[test]
    fn methane_is_the_only_ch4_structure() {
        assert_eq!(isomers("CH4"), vec!["C"]);
    }

    #[test]
    fn butane_and_isobutane_are_the_c4h10_structures() {
        assert_eq!(isomers("C4H10"), vec!["CC(C)C", "CCCC"]);
    }

    #[test]
    fn ethanol_and_dimethyl_ether_share_a_formula() {
        assert_eq!(isomers("C2H6O"), vec!["CCO", "COC"]);
    }

    #[test]
    fn unsaturation_raises_bond_orders() {
        assert_eq!(isomers("C2H4"), vec!["C=C"]);
        assert_eq!(isomers("C2H2"), vec!["C#C"]);
        assert_eq!(isomers("CO2"), vec!["O=C=O"]);
    }

    #[test]
    fn water_has_no_isomers() {
        assert_eq!(isomers("H2O"), vec!["O"]);
    }

    #[test]
    fn rings_appear_once_hydrogen_demands_them() {
        // C3H6: propene and cyclopropane.
        let found = isomers("C3H6");
        assert_eq!(found.len(), 2);
        assert!(found.contains(&"C=CC".to_string()) || found.contains(&"CC=C".to_string()));
        assert!(found.iter().any(|s| s.contains('1')));
    }

    #[test]
    fn unreachable_hydrogen_counts_produce_nothing() {
        assert!(isomers("C4H11").is_empty());
        assert!(isomers("CH5").is_empty());
        assert!(isomers("C2H8").is_empty());
    }

    #[test]
    fn output_is_sorted_and_distinct() {
        let found = isomers("C5H12");
        assert_eq!(found.len(), 3);
        for pair in found.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn hexane_family_counts_five() {
        assert_eq!(isomers("C6H14").len(), 5);
    }

    #[test]
    fn ceiling_is_reported_in_the_error() {
        let parsed: MolecularFormula = "C11H24".parse().unwrap();
        let err = generate_structures(&parsed, 10).unwrap_err();
        assert!(matches!(err, ChemError::UnsupportedOption(_)));
        assert!(err.to_string().contains("11 heavy atoms"));
        assert!(err.to_string().contains("capped at 10"));
    }

    #[test]
    fn unmodeled_elements_are_refused() {
        let parsed: MolecularFormula = "FeC4".parse().unwrap();
        let err = generate_structures(&parsed, 10).unwrap_err();
        assert!(err.to_string().contains("Fe"));
    }

    #[test]
    fn malformed_formulas_fail_to_parse() {
        assert!("C4H10X".parse::<MolecularFormula>().is_err());
        assert!("".parse::<MolecularFormula>().is_err());
    }

    #[test]
    fn generation_is_deterministic() {
        let first = isomers("C4H8");
        for _ in 0..100 {
            assert_eq!(isomers("C4H8"), first);
        }
    }

    #[tokio::test]
    async fn generator_trait_parses_and_caps() {
        let generator = ExhaustiveGenerator::default();
        assert_eq!(
            generator.generate("C4H10").await.unwrap(),
            vec!["CC(C)C", "CCCC"]
        );
        let err = generator.generate("C12H26").await.unwrap_err();
        assert!(err.to_string().contains("capped at 10"));
        assert!(generator.generate("not a formula").await.is_err());
    }

    #[tokio::test]
    async fn small_ceiling_is_honored() {
        let generator = ExhaustiveGenerator::new(2);
        assert!(generator.generate("C2H6").await.is_ok());
        let err = generator.generate("C3H8").await.unwrap_err();
        assert!(err.to_string().contains("capped at 2"));
    }
}
