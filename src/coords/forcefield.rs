//! UFF-style energy model and steepest-descent refinement.
//!
//! Four terms: harmonic bond stretch, harmonic angle bend, cosine torsion,
//! Lennard-Jones 12-6 van der Waals with 1-2/1-3 exclusions. Parameters
//! follow the Universal Force Field tables for the elements the parser
//! accepts; anything unrecognized falls back to sp3 carbon.

use std::collections::HashSet;
use std::f64::consts::PI;

use crate::rings::RingInfo;
use crate::types::bond::BondOrder;
use crate::types::conformer::Conformer;
use crate::types::molecule::Molecule;

/// Options for one refinement run.
#[derive(Debug, Clone)]
pub struct MinimizeOptions {
    /// Hard step ceiling.
    pub max_steps: usize,
    /// Gradient norm below which the run counts as converged.
    pub gradient_threshold: f64,
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        MinimizeOptions {
            max_steps: 200,
            gradient_threshold: 0.5,
        }
    }
}

/// Outcome of one refinement run.
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Best coordinates found.
    pub conformer: Conformer,
    /// Energy at the starting geometry.
    pub initial_energy: f64,
    /// Energy at the final geometry.
    pub final_energy: f64,
    /// Steps actually taken.
    pub n_steps: usize,
    /// Whether the gradient threshold was met inside the ceiling.
    pub converged: bool,
}

/// Atom class by element and hybridization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomClass {
    H,
    C3,
    C2,
    CR,
    C1,
    N3,
    N2,
    NR,
    N1,
    O3,
    O2,
    OR,
    S3,
    S2,
    P3,
    F,
    Cl,
    Br,
    I,
    Si3,
}

struct ClassParams {
    /// Bond radius contribution (A).
    r_cov: f64,
    /// Ideal angle at the atom (radians).
    theta0: f64,
    /// vdW minimum distance (A).
    x_vdw: f64,
    /// vdW well depth (kcal/mol).
    d_vdw: f64,
    /// Electronegativity for the stretch force constant.
    chi: f64,
}

#[rustfmt::skip]
fn class_params(class: AtomClass) -> ClassParams {
    match class {
        AtomClass::H   => ClassParams { r_cov: 0.354, theta0: PI,                   x_vdw: 2.886, d_vdw: 0.044, chi: 2.20 },
        AtomClass::C3  => ClassParams { r_cov: 0.757, theta0: 109.47 * PI / 180.0,  x_vdw: 3.851, d_vdw: 0.105, chi: 2.55 },
        AtomClass::C2  => ClassParams { r_cov: 0.732, theta0: 120.0 * PI / 180.0,   x_vdw: 3.851, d_vdw: 0.105, chi: 2.55 },
        AtomClass::CR  => ClassParams { r_cov: 0.729, theta0: 120.0 * PI / 180.0,   x_vdw: 3.851, d_vdw: 0.105, chi: 2.55 },
        AtomClass::C1  => ClassParams { r_cov: 0.706, theta0: PI,                   x_vdw: 3.851, d_vdw: 0.105, chi: 2.55 },
        AtomClass::N3  => ClassParams { r_cov: 0.700, theta0: 106.7 * PI / 180.0,   x_vdw: 3.660, d_vdw: 0.069, chi: 3.04 },
        AtomClass::N2  => ClassParams { r_cov: 0.685, theta0: 120.0 * PI / 180.0,   x_vdw: 3.660, d_vdw: 0.069, chi: 3.04 },
        AtomClass::NR  => ClassParams { r_cov: 0.683, theta0: 120.0 * PI / 180.0,   x_vdw: 3.660, d_vdw: 0.069, chi: 3.04 },
        AtomClass::N1  => ClassParams { r_cov: 0.656, theta0: PI,                   x_vdw: 3.660, d_vdw: 0.069, chi: 3.04 },
        AtomClass::O3  => ClassParams { r_cov: 0.658, theta0: 104.51 * PI / 180.0,  x_vdw: 3.500, d_vdw: 0.060, chi: 3.44 },
        AtomClass::O2  => ClassParams { r_cov: 0.634, theta0: 120.0 * PI / 180.0,   x_vdw: 3.500, d_vdw: 0.060, chi: 3.44 },
        AtomClass::OR  => ClassParams { r_cov: 0.639, theta0: 120.0 * PI / 180.0,   x_vdw: 3.500, d_vdw: 0.060, chi: 3.44 },
        AtomClass::S3  => ClassParams { r_cov: 1.016, theta0: 92.2 * PI / 180.0,    x_vdw: 4.035, d_vdw: 0.274, chi: 2.58 },
        AtomClass::S2  => ClassParams { r_cov: 0.992, theta0: 120.0 * PI / 180.0,   x_vdw: 4.035, d_vdw: 0.274, chi: 2.58 },
        AtomClass::P3  => ClassParams { r_cov: 1.018, theta0: 93.8 * PI / 180.0,    x_vdw: 4.147, d_vdw: 0.305, chi: 2.19 },
        AtomClass::F   => ClassParams { r_cov: 0.668, theta0: PI,                   x_vdw: 3.364, d_vdw: 0.050, chi: 3.98 },
        AtomClass::Cl  => ClassParams { r_cov: 1.033, theta0: PI,                   x_vdw: 3.947, d_vdw: 0.227, chi: 3.16 },
        AtomClass::Br  => ClassParams { r_cov: 1.176, theta0: PI,                   x_vdw: 4.189, d_vdw: 0.251, chi: 2.96 },
        AtomClass::I   => ClassParams { r_cov: 1.333, theta0: PI,                   x_vdw: 4.500, d_vdw: 0.339, chi: 2.66 },
        AtomClass::Si3 => ClassParams { r_cov: 1.116, theta0: 109.47 * PI / 180.0,  x_vdw: 4.295, d_vdw: 0.402, chi: 1.90 },
    }
}

fn assign_classes(mol: &Molecule) -> Vec<AtomClass> {
    (0..mol.atom_count())
        .map(|i| {
            let atom = mol.atom(i);
            let bos = mol.bond_order_sum(i) + f64::from(atom.implicit_hydrogens);
            match atom.atomic_number {
                1 => AtomClass::H,
                6 => {
                    if atom.is_aromatic {
                        AtomClass::CR
                    } else if bos > 3.5 && has_triple(mol, i) {
                        AtomClass::C1
                    } else if has_any_double(mol, i) {
                        AtomClass::C2
                    } else {
                        AtomClass::C3
                    }
                }
                7 => {
                    if atom.is_aromatic {
                        AtomClass::NR
                    } else if has_triple(mol, i) {
                        AtomClass::N1
                    } else if has_any_double(mol, i) {
                        AtomClass::N2
                    } else {
                        AtomClass::N3
                    }
                }
                8 => {
                    if atom.is_aromatic {
                        AtomClass::OR
                    } else if has_any_double(mol, i) {
                        AtomClass::O2
                    } else {
                        AtomClass::O3
                    }
                }
                16 => {
                    if has_any_double(mol, i) {
                        AtomClass::S2
                    } else {
                        AtomClass::S3
                    }
                }
                15 => AtomClass::P3,
                9 => AtomClass::F,
                17 => AtomClass::Cl,
                35 => AtomClass::Br,
                53 => AtomClass::I,
                14 => AtomClass::Si3,
                _ => AtomClass::C3,
            }
        })
        .collect()
}

fn has_triple(mol: &Molecule, idx: usize) -> bool {
    mol.neighbors(idx)
        .iter()
        .any(|&(_, bi)| mol.bond(bi).order == BondOrder::Triple)
}

fn has_any_double(mol: &Molecule, idx: usize) -> bool {
    mol.neighbors(idx)
        .iter()
        .any(|&(_, bi)| mol.bond(bi).order == BondOrder::Double)
}

fn is_planar_class(class: AtomClass) -> bool {
    matches!(
        class,
        AtomClass::C2
            | AtomClass::CR
            | AtomClass::N2
            | AtomClass::NR
            | AtomClass::O2
            | AtomClass::OR
    )
}

// ---------------------------------------------------------------------------
// Energy terms
// ---------------------------------------------------------------------------

fn bond_stretch(mol: &Molecule, conf: &Conformer, classes: &[AtomClass]) -> f64 {
    let mut energy = 0.0;
    for bond in mol.bonds() {
        let p1 = class_params(classes[bond.atom1]);
        let p2 = class_params(classes[bond.atom2]);
        let contraction = match bond.order {
            BondOrder::Single => 0.0,
            BondOrder::Aromatic => -0.0332,
            BondOrder::Double => -0.0668,
            BondOrder::Triple => -0.0997,
        };
        let r0 = p1.r_cov + p2.r_cov + contraction;
        let r = conf.distance(bond.atom1, bond.atom2);
        let k = (664.12 * p1.chi * p2.chi / (r0 * r0 * r0)).min(2000.0);
        energy += 0.5 * k * (r - r0) * (r - r0);
    }
    energy
}

fn angle_bend(mol: &Molecule, conf: &Conformer, classes: &[AtomClass]) -> f64 {
    let mut energy = 0.0;
    let k_theta = 50.0;
    for center in 0..mol.atom_count() {
        let neighbors = mol.neighbors(center);
        if neighbors.len() < 2 {
            continue;
        }
        let theta0 = class_params(classes[center]).theta0;
        for a in 0..neighbors.len() {
            for b in (a + 1)..neighbors.len() {
                let theta = conf.angle(neighbors[a].0, center, neighbors[b].0);
                let diff = theta - theta0;
                energy += 0.5 * k_theta * diff * diff;
            }
        }
    }
    energy
}

fn torsion_params(t1: AtomClass, t2: AtomClass, order: BondOrder) -> (f64, u32) {
    match order {
        BondOrder::Double => (45.0, 2),
        BondOrder::Triple => (0.0, 1),
        BondOrder::Aromatic => (3.0, 2),
        BondOrder::Single => match (is_planar_class(t1), is_planar_class(t2)) {
            (true, true) => (5.0, 2),
            (true, false) | (false, true) => (1.0, 6),
            (false, false) => (1.0, 3),
        },
    }
}

fn torsion(
    mol: &Molecule,
    conf: &Conformer,
    classes: &[AtomClass],
    ring_bonds: &[bool],
) -> f64 {
    let mut energy = 0.0;
    for (bond_idx, bond) in mol.bonds().iter().enumerate() {
        let (j, k) = (bond.atom1, bond.atom2);
        if mol.degree(j) < 2 || mol.degree(k) < 2 {
            continue;
        }
        let (v, n) = torsion_params(classes[j], classes[k], bond.order);
        if v.abs() < 1e-10 {
            continue;
        }
        // Ring torsions are softened so polygons can close.
        let v = if ring_bonds[bond_idx] { v * 0.5 } else { v };
        for &(i, _) in mol.neighbors(j) {
            if i == k {
                continue;
            }
            for &(l, _) in mol.neighbors(k) {
                if l == j || l == i {
                    continue;
                }
                let phi = conf.dihedral(i, j, k, l);
                energy += 0.5 * v * (1.0 - (f64::from(n) * phi).cos());
            }
        }
    }
    energy
}

fn van_der_waals(
    mol: &Molecule,
    conf: &Conformer,
    classes: &[AtomClass],
    excluded: &HashSet<(usize, usize)>,
) -> f64 {
    let mut energy = 0.0;
    let n = mol.atom_count();
    for i in 0..n {
        for j in (i + 1)..n {
            if excluded.contains(&(i, j)) {
                continue;
            }
            let r = conf.distance(i, j);
            if !(0.5..=10.0).contains(&r) {
                continue;
            }
            let p1 = class_params(classes[i]);
            let p2 = class_params(classes[j]);
            let x_ij = (p1.x_vdw * p2.x_vdw).sqrt();
            let d_ij = (p1.d_vdw * p2.d_vdw).sqrt();
            let ratio = x_ij / r;
            let r6 = ratio.powi(6);
            let r12 = r6 * r6;
            energy += d_ij * (r12 - 2.0 * r6);
        }
    }
    energy
}

/// 1-2 and 1-3 pairs, normalized as (low, high).
fn exclusion_pairs(mol: &Molecule) -> HashSet<(usize, usize)> {
    let mut excluded = HashSet::new();
    for bond in mol.bonds() {
        excluded.insert(ordered(bond.atom1, bond.atom2));
    }
    for center in 0..mol.atom_count() {
        let neighbors = mol.neighbors(center);
        for a in 0..neighbors.len() {
            for b in (a + 1)..neighbors.len() {
                excluded.insert(ordered(neighbors[a].0, neighbors[b].0));
            }
        }
    }
    excluded
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Total model energy of a geometry.
pub fn total_energy(mol: &Molecule, conf: &Conformer) -> f64 {
    let classes = assign_classes(mol);
    let rings = RingInfo::perceive(mol);
    let ring_bonds: Vec<bool> = (0..mol.bond_count())
        .map(|b| rings.is_ring_bond(b))
        .collect();
    let excluded = exclusion_pairs(mol);
    energy_of(mol, conf, &classes, &ring_bonds, &excluded)
}

fn energy_of(
    mol: &Molecule,
    conf: &Conformer,
    classes: &[AtomClass],
    ring_bonds: &[bool],
    excluded: &HashSet<(usize, usize)>,
) -> f64 {
    bond_stretch(mol, conf, classes)
        + angle_bend(mol, conf, classes)
        + torsion(mol, conf, classes, ring_bonds)
        + van_der_waals(mol, conf, classes, excluded)
}

// ---------------------------------------------------------------------------
// Minimization
// ---------------------------------------------------------------------------

/// Steepest-descent refinement with a central-difference gradient and a
/// short fixed line search. The step ceiling is a hard bound; a run that
/// stalls with no downhill trial step counts as converged, a run that
/// exhausts the ceiling does not.
pub fn minimize(mol: &Molecule, start: &Conformer, options: &MinimizeOptions) -> MinimizeResult {
    let classes = assign_classes(mol);
    let rings = RingInfo::perceive(mol);
    let ring_bonds: Vec<bool> = (0..mol.bond_count())
        .map(|b| rings.is_ring_bond(b))
        .collect();
    let excluded = exclusion_pairs(mol);
    let energy = |conf: &Conformer| energy_of(mol, conf, &classes, &ring_bonds, &excluded);

    let initial_energy = energy(start);
    let mut current = start.clone();
    let mut current_energy = initial_energy;
    let n = mol.atom_count();
    let dx = 1e-3;
    let mut converged = false;
    let mut steps_taken = 0;

    for _ in 0..options.max_steps {
        steps_taken += 1;

        let mut gradient = vec![[0.0_f64; 3]; n];
        let mut norm_sq = 0.0;
        for i in 0..n {
            for dim in 0..3 {
                let mut probe = current.clone();
                probe.positions_mut()[i][dim] += dx;
                let e_plus = energy(&probe);
                probe.positions_mut()[i][dim] -= 2.0 * dx;
                let e_minus = energy(&probe);
                let g = (e_plus - e_minus) / (2.0 * dx);
                gradient[i][dim] = g;
                norm_sq += g * g;
            }
        }
        if norm_sq.sqrt() < options.gradient_threshold {
            converged = true;
            break;
        }

        let mut best: Option<(f64, Conformer)> = None;
        for &alpha in &[0.02, 0.01, 0.005, 0.001] {
            let mut trial = current.clone();
            {
                let coords = trial.positions_mut();
                for i in 0..n {
                    for dim in 0..3 {
                        coords[i][dim] -= alpha * gradient[i][dim];
                    }
                }
            }
            let e = energy(&trial);
            if e < current_energy && best.as_ref().map_or(true, |(b, _)| e < *b) {
                best = Some((e, trial));
            }
        }
        match best {
            Some((e, conf)) => {
                current = conf;
                current_energy = e;
            }
            None => {
                // No trial step goes downhill: numerically settled.
                converged = true;
                break;
            }
        }
    }

    MinimizeResult {
        conformer: current,
        initial_energy,
        final_energy: current_energy,
        n_steps: steps_taken,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;

    #[test]
    fn class_assignment_follows_hybridization() {
        let mol = parse_smiles("CC=CC#N").unwrap();
        let classes = assign_classes(&mol);
        assert_eq!(classes[0], AtomClass::C3);
        assert_eq!(classes[1], AtomClass::C2);
        assert_eq!(classes[2], AtomClass::C2);
        assert_eq!(classes[3], AtomClass::C1);
        assert_eq!(classes[4], AtomClass::N1);
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert!(assign_classes(&benzene)
            .iter()
            .all(|&c| c == AtomClass::CR));
    }

    #[test]
    fn ideal_bond_has_negligible_stretch_energy() {
        let mol = parse_smiles("CC").unwrap();
        // Two sp3 carbons at exactly their ideal separation.
        let conf = Conformer::spatial(vec![[0.0, 0.0, 0.0], [1.514, 0.0, 0.0]]);
        let classes = assign_classes(&mol);
        assert!(bond_stretch(&mol, &conf, &classes) < 1e-6);
    }

    #[test]
    fn stretched_bond_costs_energy() {
        let mol = parse_smiles("CC").unwrap();
        let classes = assign_classes(&mol);
        let ideal = Conformer::spatial(vec![[0.0, 0.0, 0.0], [1.514, 0.0, 0.0]]);
        let stretched = Conformer::spatial(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert!(
            bond_stretch(&mol, &stretched, &classes)
                > bond_stretch(&mol, &ideal, &classes) + 1.0
        );
    }

    #[test]
    fn exclusions_cover_bonded_pairs() {
        let mol = parse_smiles("CCC").unwrap();
        let excluded = exclusion_pairs(&mol);
        assert!(excluded.contains(&(0, 1)));
        assert!(excluded.contains(&(1, 2)));
        // 1-3 across the middle atom.
        assert!(excluded.contains(&(0, 2)));
    }

    #[test]
    fn minimization_lowers_energy() {
        let mol = parse_smiles("CC").unwrap().with_explicit_hydrogens();
        // A deliberately squashed start.
        let mut coords = Vec::new();
        for i in 0..mol.atom_count() {
            let t = i as f64;
            coords.push([0.4 * t, 0.1 * (t * 1.3).sin(), 0.1 * (t * 0.7).cos()]);
        }
        let start = Conformer::spatial(coords);
        let result = minimize(&mol, &start, &MinimizeOptions::default());
        assert!(result.final_energy <= result.initial_energy);
        assert!(result.n_steps <= 200);
        for p in result.conformer.positions() {
            assert!(p[0].is_finite() && p[1].is_finite() && p[2].is_finite());
        }
    }

    #[test]
    fn step_ceiling_is_respected() {
        let mol = parse_smiles("CCO").unwrap().with_explicit_hydrogens();
        let mut coords = Vec::new();
        for i in 0..mol.atom_count() {
            coords.push([0.3 * i as f64, 0.0, 0.0]);
        }
        let result = minimize(
            &mol,
            &Conformer::spatial(coords),
            &MinimizeOptions {
                max_steps: 5,
                gradient_threshold: 1e-12,
            },
        );
        assert!(result.n_steps <= 5);
        assert!(result.final_energy <= result.initial_energy);
    }
}
