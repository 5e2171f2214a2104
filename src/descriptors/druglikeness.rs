//! Weighted drug-likeness scoring.

use crate::rings::RingInfo;
use crate::types::bond::BondOrder;
use crate::types::molecule::Molecule;

/// Weights over the eight underlying properties, in the order
/// MW, logP, HBA, HBD, TPSA, rotatable bonds, aromatic rings, alerts.
const QED_WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

/// (center, sigma_left, sigma_right) of each asymmetric desirability.
const QED_SHAPES: [(f64, f64, f64); 8] = [
    (300.0, 120.0, 200.0), // MW
    (2.5, 2.5, 2.5),       // logP
    (4.0, 4.0, 6.0),       // HBA
    (1.0, 1.0, 4.0),       // HBD
    (60.0, 40.0, 80.0),    // TPSA
    (3.0, 3.0, 7.0),       // rotatable bonds
    (2.0, 2.0, 2.0),       // aromatic rings
    (0.0, 0.5, 0.5),       // alerts
];

/// Weighted geometric mean of the eight desirabilities, clamped to [0, 1].
pub fn qed_weighted(property_values: &[f64; 8]) -> f64 {
    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    for (pos, &value) in property_values.iter().enumerate() {
        let d = desirability(value, QED_SHAPES[pos]).max(1e-10);
        log_sum += QED_WEIGHTS[pos] * d.ln();
        weight_sum += QED_WEIGHTS[pos];
    }
    (log_sum / weight_sum).exp().clamp(0.0, 1.0)
}

fn desirability(x: f64, (center, sigma_left, sigma_right): (f64, f64, f64)) -> f64 {
    let sigma = if x <= center { sigma_left } else { sigma_right };
    let z = (x - center) / sigma;
    (-0.5 * z * z).exp()
}

/// Rule-of-five violation count over the classical four tests.
pub fn lipinski_violations(mw: f64, logp: f64, donors: u32, acceptors: u32) -> u32 {
    let mut violations = 0;
    if mw > 500.0 {
        violations += 1;
    }
    if logp > 5.0 {
        violations += 1;
    }
    if donors > 5 {
        violations += 1;
    }
    if acceptors > 10 {
        violations += 1;
    }
    violations
}

/// Count triggered structural alerts from a small named set of reactive
/// or assay-interfering motifs, each checked directly on the graph.
pub fn alert_count(mol: &Molecule) -> u32 {
    let checks: [fn(&Molecule) -> bool; 8] = [
        has_acyl_halide,
        has_small_hetero_ring,
        has_thiol,
        has_aldehyde,
        has_heterocumulene,
        has_adjacent_carbonyls,
        has_peroxide,
        has_hydrazine,
    ];
    checks.iter().filter(|check| check(mol)).count() as u32
}

/// C(=O)-Cl or C(=O)-Br.
fn has_acyl_halide(mol: &Molecule) -> bool {
    mol.bonds().iter().any(|bond| {
        if bond.order != BondOrder::Single {
            return false;
        }
        let (a, b) = (mol.atom(bond.atom1), mol.atom(bond.atom2));
        let carbon = if matches!(b.atomic_number, 17 | 35) {
            bond.atom1
        } else if matches!(a.atomic_number, 17 | 35) {
            bond.atom2
        } else {
            return false;
        };
        mol.atom(carbon).atomic_number == 6 && has_double_to(mol, carbon, 8)
    })
}

/// Epoxide or aziridine: a three-membered ring holding one O or N.
fn has_small_hetero_ring(mol: &Molecule) -> bool {
    let rings = RingInfo::perceive(mol);
    rings.rings().iter().any(|ring| {
        ring.len() == 3
            && ring
                .iter()
                .filter(|&&i| matches!(mol.atom(i).atomic_number, 7 | 8))
                .count()
                == 1
    })
}

fn has_thiol(mol: &Molecule) -> bool {
    mol.atoms()
        .iter()
        .any(|a| a.atomic_number == 16 && a.implicit_hydrogens > 0)
}

/// Carbonyl carbon still carrying a hydrogen.
fn has_aldehyde(mol: &Molecule) -> bool {
    (0..mol.atom_count()).any(|i| {
        let atom = mol.atom(i);
        atom.atomic_number == 6 && atom.implicit_hydrogens >= 1 && has_double_to(mol, i, 8)
    })
}

/// Isocyanate or isothiocyanate: N=C=O / N=C=S.
fn has_heterocumulene(mol: &Molecule) -> bool {
    (0..mol.atom_count()).any(|i| {
        mol.atom(i).atomic_number == 6
            && has_double_to(mol, i, 7)
            && (has_double_to(mol, i, 8) || has_double_to(mol, i, 16))
    })
}

/// 1,2-diketone.
fn has_adjacent_carbonyls(mol: &Molecule) -> bool {
    mol.bonds().iter().any(|bond| {
        bond.order == BondOrder::Single
            && mol.atom(bond.atom1).atomic_number == 6
            && mol.atom(bond.atom2).atomic_number == 6
            && has_double_to(mol, bond.atom1, 8)
            && has_double_to(mol, bond.atom2, 8)
    })
}

fn has_peroxide(mol: &Molecule) -> bool {
    mol.bonds().iter().any(|bond| {
        bond.order == BondOrder::Single
            && mol.atom(bond.atom1).atomic_number == 8
            && mol.atom(bond.atom2).atomic_number == 8
    })
}

fn has_hydrazine(mol: &Molecule) -> bool {
    mol.bonds().iter().any(|bond| {
        bond.order == BondOrder::Single
            && mol.atom(bond.atom1).atomic_number == 7
            && mol.atom(bond.atom2).atomic_number == 7
            && !mol.atom(bond.atom1).is_aromatic
            && !mol.atom(bond.atom2).is_aromatic
    })
}

fn has_double_to(mol: &Molecule, idx: usize, element: u8) -> bool {
    mol.neighbors(idx).iter().any(|&(nbr, bi)| {
        mol.bond(bi).order == BondOrder::Double && mol.atom(nbr).atomic_number == element
    })
}
