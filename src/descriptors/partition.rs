//! Octanol/water partition estimate.

use crate::rings::RingInfo;
use crate::types::bond::BondOrder;
use crate::types::molecule::Molecule;

/// Wildman-Crippen style atom-contribution logP with a condensed type
/// table. Implicit hydrogens contribute by the element they sit on.
pub fn partition_coefficient(mol: &Molecule) -> f64 {
    let rings = RingInfo::perceive(mol);
    let mut logp = 0.0;
    for idx in 0..mol.atom_count() {
        logp += atom_contribution(mol, &rings, idx);
        let h = mol.atom(idx).implicit_hydrogens as f64;
        if h > 0.0 {
            logp += if mol.atom(idx).atomic_number == 6 {
                h * 0.1230
            } else {
                h * -0.2677
            };
        }
    }
    logp
}

fn atom_contribution(mol: &Molecule, rings: &RingInfo, idx: usize) -> f64 {
    let atom = mol.atom(idx);
    let degree = mol.degree(idx);
    let has_double = mol
        .neighbors(idx)
        .iter()
        .any(|&(_, bi)| mol.bond(bi).order == BondOrder::Double);
    let has_hetero_neighbor = mol.neighbors(idx).iter().any(|&(nbr, _)| {
        let z = mol.atom(nbr).atomic_number;
        z != 6 && z != 1
    });

    match atom.atomic_number {
        6 => {
            if atom.is_aromatic {
                if has_hetero_neighbor {
                    -0.14
                } else {
                    0.296
                }
            } else if has_double {
                if has_hetero_neighbor {
                    -0.03
                } else {
                    0.08
                }
            } else if rings.is_ring_atom(idx) {
                0.1441
            } else {
                match degree {
                    1 | 2 => 0.1441,
                    3 => 0.0,
                    _ => -0.04,
                }
            }
        }
        7 => {
            if atom.is_aromatic {
                -0.3187
            } else if atom.formal_charge > 0 {
                -1.0190
            } else if has_double {
                -0.5262
            } else {
                -0.4458
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                -1.189
            } else if has_double {
                -0.3339
            } else if degree >= 2 {
                -0.2893
            } else {
                -0.3567
            }
        }
        9 => 0.4118,
        15 => 0.2836,
        16 => {
            if has_double {
                -0.1084
            } else if atom.formal_charge != 0 {
                -0.5188
            } else {
                0.6237
            }
        }
        17 => 0.6895,
        35 => 0.8813,
        53 => 1.050,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;

    #[test]
    fn alkanes_are_lipophilic() {
        let hexane = partition_coefficient(&parse_smiles("CCCCCC").unwrap());
        assert!(hexane > 2.0, "logp={}", hexane);
    }

    #[test]
    fn ethanol_is_hydrophilic() {
        let logp = partition_coefficient(&parse_smiles("CCO").unwrap());
        assert!(logp < 0.5, "logp={}", logp);
    }

    #[test]
    fn aspirin_in_plausible_window() {
        let logp = partition_coefficient(&parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap());
        assert!(logp > -1.0 && logp < 4.0, "logp={}", logp);
    }

    #[test]
    fn halogens_raise_the_estimate() {
        let benzene = partition_coefficient(&parse_smiles("c1ccccc1").unwrap());
        let chlorobenzene = partition_coefficient(&parse_smiles("Clc1ccccc1").unwrap());
        assert!(chlorobenzene > benzene);
    }
}
