//! Physicochemical descriptor computation.
//!
//! [`describe`] derives the full [`DescriptorVector`] from a parsed
//! molecule in one pass. The individual estimators live in submodules:
//! polar surface area ([`surface`]), partition coefficient
//! ([`partition`]), and drug-likeness composites ([`druglikeness`]).

mod druglikeness;
mod partition;
mod surface;

pub use druglikeness::{alert_count, lipinski_violations, qed_weighted};
pub use partition::partition_coefficient;
pub use surface::topological_polar_surface_area;

use crate::rings::RingInfo;
use crate::types::bond::BondOrder;
use crate::types::descriptors::{round2, round3, DescriptorVector};
use crate::types::element;
use crate::types::molecule::Molecule;

/// Compute the full descriptor record for a molecule.
pub fn describe(mol: &Molecule) -> DescriptorVector {
    let rings = RingInfo::perceive(mol);

    let heavy_atom_count = mol.heavy_atom_count() as u32;
    let atom_count = heavy_atom_count + mol.total_hydrogen_count() as u32;

    let molecular_weight = round2(average_weight(mol));
    let exact_molecular_weight = round2(monoisotopic_weight(mol));
    let alogp = round2(partition_coefficient(mol));
    let tpsa = round2(topological_polar_surface_area(mol));

    let hydrogen_bond_donors = donor_group_count(mol);
    let hydrogen_bond_acceptors = acceptor_count(mol);
    let hydrogen_bond_acceptors_lipinski = mol
        .atoms()
        .iter()
        .filter(|a| matches!(a.atomic_number, 7 | 8))
        .count() as u32;
    let hydrogen_bond_donors_lipinski = donor_hydrogen_count(mol);

    let rotatable_bond_count = rotatable_bonds(mol, &rings);
    let aromatic_rings = rings.aromatic_ring_count(mol) as u32;
    let alerts = alert_count(mol);

    let violations = lipinski_violations(
        molecular_weight,
        alogp,
        hydrogen_bond_donors_lipinski,
        hydrogen_bond_acceptors_lipinski,
    );

    let qed = round2(qed_weighted(&[
        molecular_weight,
        alogp,
        f64::from(hydrogen_bond_acceptors_lipinski),
        f64::from(hydrogen_bond_donors),
        tpsa,
        f64::from(rotatable_bond_count),
        f64::from(aromatic_rings),
        f64::from(alerts),
    ]));

    DescriptorVector {
        atom_count,
        heavy_atom_count,
        molecular_weight,
        exact_molecular_weight,
        alogp,
        rotatable_bond_count,
        topological_polar_surface_area: tpsa,
        hydrogen_bond_acceptors,
        hydrogen_bond_donors,
        hydrogen_bond_acceptors_lipinski,
        hydrogen_bond_donors_lipinski,
        lipinski_violations: violations,
        aromatic_rings,
        qed_weighted: qed,
        formal_charge: mol.net_charge(),
        fraction_csp3: round3(fraction_csp3(mol)),
        ring_count: rings.ring_count() as u32,
    }
}

fn average_weight(mol: &Molecule) -> f64 {
    let mut mass = 0.0;
    for atom in mol.atoms() {
        mass += match atom.isotope {
            Some(nominal) => f64::from(nominal),
            None => element::average_mass(atom.atomic_number),
        };
        mass += f64::from(atom.implicit_hydrogens) * element::average_mass(1);
    }
    mass
}

fn monoisotopic_weight(mol: &Molecule) -> f64 {
    let mut mass = 0.0;
    for atom in mol.atoms() {
        mass += match atom.isotope {
            Some(nominal) => f64::from(nominal),
            None => element::monoisotopic_mass(atom.atomic_number),
        };
        mass += f64::from(atom.implicit_hydrogens) * element::monoisotopic_mass(1);
    }
    mass
}

/// N or O atoms bearing at least one hydrogen, counted as groups.
fn donor_group_count(mol: &Molecule) -> u32 {
    (0..mol.atom_count())
        .filter(|&i| {
            let atom = mol.atom(i);
            matches!(atom.atomic_number, 7 | 8) && attached_hydrogens(mol, i) > 0
        })
        .count() as u32
}

/// Total N-H and O-H hydrogens, the strict rule-of-five donor tally.
fn donor_hydrogen_count(mol: &Molecule) -> u32 {
    (0..mol.atom_count())
        .filter(|&i| matches!(mol.atom(i).atomic_number, 7 | 8))
        .map(|i| attached_hydrogens(mol, i))
        .sum()
}

fn attached_hydrogens(mol: &Molecule, idx: usize) -> u32 {
    let explicit = mol
        .neighbors(idx)
        .iter()
        .filter(|&&(nbr, _)| mol.atom(nbr).is_hydrogen())
        .count() as u32;
    explicit + u32::from(mol.atom(idx).implicit_hydrogens)
}

/// Permissive acceptor count: every N and O except amide nitrogens and
/// pyrrole-type aromatic N-H.
fn acceptor_count(mol: &Molecule) -> u32 {
    (0..mol.atom_count())
        .filter(|&i| {
            let atom = mol.atom(i);
            match atom.atomic_number {
                8 => true,
                7 => {
                    if atom.is_aromatic && atom.implicit_hydrogens > 0 {
                        return false;
                    }
                    !is_amide_nitrogen(mol, i)
                }
                _ => false,
            }
        })
        .count() as u32
}

fn is_amide_nitrogen(mol: &Molecule, idx: usize) -> bool {
    mol.neighbors(idx).iter().any(|&(nbr, bond_idx)| {
        mol.bond(bond_idx).order == BondOrder::Single
            && mol.atom(nbr).atomic_number == 6
            && has_carbonyl_oxygen(mol, nbr)
    })
}

fn has_carbonyl_oxygen(mol: &Molecule, carbon: usize) -> bool {
    mol.neighbors(carbon).iter().any(|&(nbr, bond_idx)| {
        mol.bond(bond_idx).order == BondOrder::Double && mol.atom(nbr).atomic_number == 8
    })
}

/// Single non-ring bonds with non-terminal ends, amide C-N excluded.
fn rotatable_bonds(mol: &Molecule, rings: &RingInfo) -> u32 {
    mol.bonds()
        .iter()
        .enumerate()
        .filter(|(idx, bond)| {
            bond.order == BondOrder::Single
                && !rings.is_ring_bond(*idx)
                && mol.degree(bond.atom1) > 1
                && mol.degree(bond.atom2) > 1
                && !is_amide_bond(mol, bond.atom1, bond.atom2)
        })
        .count() as u32
}

fn is_amide_bond(mol: &Molecule, a: usize, b: usize) -> bool {
    let carbon = match (mol.atom(a).atomic_number, mol.atom(b).atomic_number) {
        (6, 7) => a,
        (7, 6) => b,
        _ => return false,
    };
    has_carbonyl_oxygen(mol, carbon)
}

/// Fraction of carbons that are sp3: non-aromatic with only single bonds.
fn fraction_csp3(mol: &Molecule) -> f64 {
    let mut carbons = 0u32;
    let mut sp3 = 0u32;
    for idx in 0..mol.atom_count() {
        let atom = mol.atom(idx);
        if atom.atomic_number != 6 {
            continue;
        }
        carbons += 1;
        let saturated = !atom.is_aromatic
            && mol.neighbors(idx).iter().all(|&(_, bond_idx)| {
                matches!(mol.bond(bond_idx).order, BondOrder::Single)
            });
        if saturated {
            sp3 += 1;
        }
    }
    if carbons == 0 {
        return 0.0;
    }
    f64::from(sp3) / f64::from(carbons)
}
