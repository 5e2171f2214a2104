//! Stereoisomer enumeration.
//!
//! Finds the stereo sites a structure leaves open, expands every
//! assignment of the first `k` of them, and reports the canonical SMILES
//! of each variant. Sites that already carry a tag or a directional bond
//! are left exactly as written.

use std::collections::BTreeSet;

use crate::canon::{refined_invariants, write_canonical_smiles};
use crate::rings::RingInfo;
use crate::types::atom::Chirality;
use crate::types::bond::{Bond, BondOrder, BondStereo};
use crate::types::molecule::Molecule;

/// Expansion ceiling applied when the caller does not configure one.
pub const DEFAULT_MAX_STEREO_CENTERS: usize = 10;

/// Rings below this size cannot hold a configurable double bond.
const MIN_STEREO_RING: usize = 8;

/// An expandable stereo site, in detection order.
#[derive(Debug, Clone, Copy)]
enum Site {
    /// Untagged tetrahedral atom.
    Tetrahedral(usize),
    /// Double bond with no directional marks around it.
    Geometric(usize),
}

/// Enumerate stereoisomers as sorted, deduplicated canonical SMILES.
///
/// At most `max_centers` unassigned sites expand, so the result holds
/// between 1 and 2^k members. A molecule with nothing to assign comes
/// back as exactly its own canonical SMILES.
pub fn enumerate_stereoisomers(mol: &Molecule, max_centers: usize) -> Vec<String> {
    let sites: Vec<Site> = unassigned_sites(mol)
        .into_iter()
        .take(max_centers)
        .collect();
    let k = sites.len();

    let mut seen = BTreeSet::new();
    for mask in 0u64..(1u64 << k) {
        let mut atoms = mol.atoms().to_vec();
        let mut bonds = mol.bonds().to_vec();
        for (position, site) in sites.iter().enumerate() {
            let flip = (mask >> position) & 1 == 1;
            match *site {
                Site::Tetrahedral(idx) => {
                    atoms[idx].chirality = if flip {
                        Chirality::Clockwise
                    } else {
                        Chirality::Counterclockwise
                    };
                }
                Site::Geometric(bond_idx) => {
                    assign_geometry(mol, &mut bonds, bond_idx, flip);
                }
            }
        }
        let variant = Molecule::new(atoms, bonds).with_name(mol.name.clone());
        seen.insert(write_canonical_smiles(&variant));
    }
    seen.into_iter().collect()
}

/// Expansion under the default ceiling.
pub fn enumerate(mol: &Molecule) -> Vec<String> {
    enumerate_stereoisomers(mol, DEFAULT_MAX_STEREO_CENTERS)
}

/// Detect every unassigned site: tetrahedral atoms first in index order,
/// then double bonds in bond index order.
fn unassigned_sites(mol: &Molecule) -> Vec<Site> {
    let classes = refined_invariants(mol);
    let rings = RingInfo::perceive(mol);
    let mut sites = Vec::new();

    for idx in 0..mol.atoms().len() {
        if is_unassigned_tetrahedral(mol, &classes, idx) {
            sites.push(Site::Tetrahedral(idx));
        }
    }
    for bond_idx in 0..mol.bonds().len() {
        if is_unassigned_geometric(mol, &classes, &rings, bond_idx) {
            sites.push(Site::Geometric(bond_idx));
        }
    }
    sites
}

/// A candidate tetrahedral center: untagged, saturated, four substituents
/// of pairwise distinct symmetry classes (one may be the implicit
/// hydrogen). Carbon and silicon qualify, plus quaternary nitrogen.
fn is_unassigned_tetrahedral(mol: &Molecule, classes: &[u64], idx: usize) -> bool {
    let atom = mol.atom(idx);
    if atom.chirality.is_set() || atom.is_aromatic {
        return false;
    }
    let eligible_element = matches!(atom.atomic_number, 6 | 14)
        || (atom.atomic_number == 7 && atom.formal_charge == 1 && mol.degree(idx) == 4);
    if !eligible_element {
        return false;
    }
    if mol.degree(idx) + atom.implicit_hydrogens as usize != 4 || atom.implicit_hydrogens > 1 {
        return false;
    }
    if mol
        .neighbors(idx)
        .iter()
        .any(|&(_, b)| mol.bond(b).order != BondOrder::Single)
    {
        return false;
    }
    let mut neighbor_classes: Vec<u64> = mol
        .neighbors(idx)
        .iter()
        .map(|&(nbr, _)| classes[nbr])
        .collect();
    neighbor_classes.sort_unstable();
    neighbor_classes.dedup();
    neighbor_classes.len() == mol.degree(idx)
}

/// A candidate geometric site: a plain double bond outside small rings
/// whose ends each carry distinguishable substituents and no directional
/// marks anywhere around them.
fn is_unassigned_geometric(
    mol: &Molecule,
    classes: &[u64],
    rings: &RingInfo,
    bond_idx: usize,
) -> bool {
    let bond = mol.bond(bond_idx);
    if bond.order != BondOrder::Double {
        return false;
    }
    if mol.atom(bond.atom1).is_aromatic || mol.atom(bond.atom2).is_aromatic {
        return false;
    }
    if let Some(size) = rings.smallest_ring_with_bond(bond_idx) {
        if size < MIN_STEREO_RING {
            return false;
        }
    }
    stereogenic_end(mol, classes, bond.atom1, bond.atom2)
        && stereogenic_end(mol, classes, bond.atom2, bond.atom1)
}

fn stereogenic_end(mol: &Molecule, classes: &[u64], end: usize, partner: usize) -> bool {
    let mut substituent_classes = Vec::new();
    for &(nbr, other_bond) in mol.neighbors(end) {
        if nbr == partner {
            continue;
        }
        let other = mol.bond(other_bond);
        // A second double bond makes a cumulene; anything but a plain
        // single substituent bond disqualifies the end.
        if other.order != BondOrder::Single {
            return false;
        }
        if other.stereo != BondStereo::None {
            return false;
        }
        substituent_classes.push(classes[nbr]);
    }
    match substituent_classes.len() {
        0 => false,
        1 => true,
        2 => substituent_classes[0] != substituent_classes[1],
        _ => false,
    }
}

/// Mark one double bond's geometry by writing directional flags on a
/// reference single bond at each end. Along the path `s -> a = b -> t`,
/// equal slash symbols give the trans arrangement.
///
/// When a neighboring site already fixed one reference (conjugated
/// systems share their middle single bond), that mark is reused as the
/// incoming side instead of being overwritten.
fn assign_geometry(mol: &Molecule, bonds: &mut [Bond], bond_idx: usize, cis: bool) {
    let double = bonds[bond_idx];
    let Some(left) = reference_bond(mol, bonds, double.atom1, bond_idx) else {
        return;
    };
    let Some(right) = reference_bond(mol, bonds, double.atom2, bond_idx) else {
        return;
    };

    let incoming = match oriented_toward(&bonds[left], double.atom1) {
        BondStereo::None => {
            set_oriented_toward(&mut bonds[left], double.atom1, BondStereo::Up);
            BondStereo::Up
        }
        existing => existing,
    };
    if oriented_toward(&bonds[right], double.atom2) != BondStereo::None {
        // Both references predate this site; its geometry is already
        // determined.
        return;
    }
    let outgoing = if cis { incoming.reversed() } else { incoming };
    set_oriented_away(&mut bonds[right], double.atom2, outgoing);
}

/// The single bond carrying this end's directional mark: an already
/// marked one when present, otherwise the lowest-index candidate.
fn reference_bond(
    mol: &Molecule,
    bonds: &[Bond],
    end: usize,
    double_idx: usize,
) -> Option<usize> {
    let mut candidates: Vec<usize> = mol
        .neighbors(end)
        .iter()
        .filter(|&&(_, b)| b != double_idx && bonds[b].order == BondOrder::Single)
        .map(|&(_, b)| b)
        .collect();
    candidates.sort_unstable();
    candidates
        .iter()
        .copied()
        .find(|&b| bonds[b].stereo != BondStereo::None)
        .or_else(|| candidates.first().copied())
}

/// Slash symbol seen when traversing this bond into `toward`.
fn oriented_toward(bond: &Bond, toward: usize) -> BondStereo {
    if bond.atom2 == toward {
        bond.stereo
    } else {
        bond.stereo.reversed()
    }
}

fn set_oriented_toward(bond: &mut Bond, toward: usize, symbol: BondStereo) {
    bond.stereo = if bond.atom2 == toward {
        symbol
    } else {
        symbol.reversed()
    };
}

/// Slash symbol seen when traversing this bond out of `away_from`.
fn set_oriented_away(bond: &mut Bond, away_from: usize, symbol: BondStereo) {
    bond.stereo = if bond.atom1 == away_from {
        symbol
    } else {
        symbol.reversed()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;

    fn expand(smiles: &str) -> Vec<String> {
        enumerate(&parse_smiles(smiles).unwrap())
    }

    fn canon(smiles: &str) -> String {
        write_canonical_smiles(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn butene_expands_to_cis_and_trans() {
        let isomers = expand("CC=CC");
        assert_eq!(isomers.len(), 2);
        for smiles in &isomers {
            assert!(
                smiles.contains('/') || smiles.contains('\\'),
                "no geometry in {smiles}"
            );
        }
    }

    #[test]
    fn single_center_expands_to_two_enantiomers() {
        let isomers = expand("CC(N)O");
        assert_eq!(isomers.len(), 2);
        for smiles in &isomers {
            assert!(smiles.contains('@'), "no tag in {smiles}");
        }
    }

    #[test]
    fn two_independent_centers_expand_to_four() {
        assert_eq!(expand("CC(O)C(Br)CC").len(), 4);
    }

    #[test]
    fn center_plus_double_bond_expand_together() {
        assert_eq!(expand("CC=CC(C)O").len(), 4);
    }

    #[test]
    fn assigned_sites_are_left_alone() {
        assert_eq!(expand("C/C=C/C"), vec![canon("C/C=C/C")]);
        assert_eq!(expand("C[C@H](N)O"), vec![canon("C[C@H](N)O")]);
    }

    #[test]
    fn molecules_without_sites_return_themselves() {
        for smiles in ["CCO", "c1ccccc1", "CC(C)C", "C=C"] {
            assert_eq!(expand(smiles), vec![canon(smiles)], "drift on {smiles}");
        }
    }

    #[test]
    fn small_ring_double_bonds_are_not_expanded() {
        assert_eq!(expand("C1CCC=CC1"), vec![canon("C1CCC=CC1")]);
    }

    #[test]
    fn symmetric_ends_are_not_geometric() {
        // 2-methyl-2-butene: one end carries two methyls.
        assert_eq!(expand("CC(C)=CC"), vec![canon("CC(C)=CC")]);
    }

    #[test]
    fn ceiling_caps_the_expansion() {
        // Four open centers, but only the first two expand.
        let capped = enumerate_stereoisomers(
            &parse_smiles("CC(O)C(Cl)C(Br)C(N)C").unwrap(),
            2,
        );
        assert_eq!(capped.len(), 4);
    }

    #[test]
    fn members_re_canonicalize_to_themselves() {
        for smiles in expand("CC=CC(C)O") {
            assert_eq!(canon(&smiles), smiles);
        }
    }

    #[test]
    fn output_is_sorted_and_distinct() {
        let isomers = expand("CC(O)C(Br)CC");
        for pair in isomers.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn conjugated_diene_keeps_both_geometries_consistent() {
        let isomers = expand("CC=CC=CC");
        // The shared middle bond is reused, not overwritten, so all four
        // combinations survive.
        assert_eq!(isomers.len(), 4);
        for smiles in &isomers {
            assert_eq!(canon(smiles), *smiles);
        }
    }

    #[test]
    fn enumeration_is_deterministic() {
        let first = expand("CC=CC(C)O");
        for _ in 0..100 {
            assert_eq!(expand("CC=CC(C)O"), first);
        }
    }
}
