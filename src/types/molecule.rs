//! Immutable molecular graph.

use std::collections::BTreeMap;

use crate::types::atom::{Atom, Chirality};
use crate::types::bond::{Bond, BondStereo};

/// An atom/bond graph with precomputed adjacency.
///
/// Immutable once constructed: every transformation (standardization, sugar
/// removal, hydrogen expansion) builds a new `Molecule`. Atom and bond
/// indices are stable for the lifetime of one instance and are the
/// vocabulary every other module speaks.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    /// Optional name carried from input (molblock title line).
    pub name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Build a molecule and its adjacency lists. Bond endpoints must be in
    /// range; adjacency preserves bond insertion order.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bond_idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bond_idx));
            adjacency[bond.atom2].push((bond.atom1, bond_idx));
        }
        Molecule {
            name: String::new(),
            atoms,
            bonds,
            adjacency,
        }
    }

    /// Same molecule with a name attached.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of atoms in the graph (explicit atoms only).
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds.
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Atoms slice.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Bonds slice.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// One atom by index.
    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    /// One bond by index.
    pub fn bond(&self, idx: usize) -> &Bond {
        &self.bonds[idx]
    }

    /// Neighbors of an atom as `(neighbor_index, bond_index)` pairs, in
    /// bond insertion order.
    pub fn neighbors(&self, idx: usize) -> &[(usize, usize)] {
        &self.adjacency[idx]
    }

    /// Number of explicit neighbors.
    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    /// Bond index between two atoms, if bonded.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, bond_idx)| *bond_idx)
    }

    /// Atoms heavier than hydrogen.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    /// Hydrogen total: explicit H atoms plus implicit counts.
    pub fn total_hydrogen_count(&self) -> usize {
        let explicit = self.atoms.iter().filter(|a| a.is_hydrogen()).count();
        let implicit: usize = self
            .atoms
            .iter()
            .map(|a| a.implicit_hydrogens as usize)
            .sum();
        explicit + implicit
    }

    /// Sum of bond orders at an atom (aromatic counts 1.5).
    pub fn bond_order_sum(&self, idx: usize) -> f64 {
        self.adjacency[idx]
            .iter()
            .map(|(_, bond_idx)| self.bonds[*bond_idx].order.as_f64())
            .sum()
    }

    /// Element counts including hydrogens (explicit and implicit merged),
    /// keyed by atomic number.
    pub fn element_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.atomic_number).or_insert(0) += 1;
            if atom.implicit_hydrogens > 0 {
                *counts.entry(1).or_insert(0) += atom.implicit_hydrogens as usize;
            }
        }
        counts
    }

    /// Net formal charge over all atoms.
    pub fn net_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    /// Connected components as sorted atom-index lists, ordered by their
    /// smallest member.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.atoms.len()];
        let mut components = Vec::new();
        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            let mut stack = vec![start];
            let mut member = Vec::new();
            seen[start] = true;
            while let Some(current) = stack.pop() {
                member.push(current);
                for &(neighbor, _) in &self.adjacency[current] {
                    if !seen[neighbor] {
                        seen[neighbor] = true;
                        stack.push(neighbor);
                    }
                }
            }
            member.sort_unstable();
            components.push(member);
        }
        components
    }

    /// Extract the induced subgraph over `keep` (must be sorted ascending).
    ///
    /// Atom indices are remapped in order. Severed bonds turn into implicit
    /// hydrogens at the attachment points, one per bond order. Chirality
    /// tags survive only on atoms that keep their full neighbor set;
    /// directional bond marks are cleared when the surrounding neighborhood
    /// was cut.
    pub fn induced_subgraph(&self, keep: &[usize]) -> Molecule {
        let mut remap = vec![usize::MAX; self.atoms.len()];
        for (new_idx, &old_idx) in keep.iter().enumerate() {
            remap[old_idx] = new_idx;
        }

        let mut atoms: Vec<Atom> = keep.iter().map(|&idx| self.atoms[idx]).collect();
        let mut bonds = Vec::new();
        for bond in &self.bonds {
            let a = remap[bond.atom1];
            let b = remap[bond.atom2];
            if a != usize::MAX && b != usize::MAX {
                let mut copy = *bond;
                copy.atom1 = a;
                copy.atom2 = b;
                bonds.push(copy);
            }
        }

        // Mend attachment points: a severed single bond becomes one
        // hydrogen, a severed double becomes two; cut aromatic bonds count
        // as one.
        for (new_idx, &old_idx) in keep.iter().enumerate() {
            let mut lost_neighbor = false;
            for &(nbr, bond_idx) in &self.adjacency[old_idx] {
                if remap[nbr] != usize::MAX {
                    continue;
                }
                lost_neighbor = true;
                let restored = self.bonds[bond_idx].order.as_f64().floor().max(1.0) as u8;
                atoms[new_idx].implicit_hydrogens =
                    atoms[new_idx].implicit_hydrogens.saturating_add(restored);
            }
            // A cut neighborhood invalidates the tetrahedral frame.
            if lost_neighbor {
                atoms[new_idx].chirality = Chirality::None;
            }
        }
        for bond in &mut bonds {
            if bond.stereo != BondStereo::None {
                let old_a = keep[bond.atom1];
                let old_b = keep[bond.atom2];
                let cut = self.adjacency[old_a]
                    .iter()
                    .chain(self.adjacency[old_b].iter())
                    .any(|(n, _)| remap[*n] == usize::MAX);
                if cut {
                    bond.stereo = BondStereo::None;
                }
            }
        }

        Molecule::new(atoms, bonds).with_name(self.name.clone())
    }

    /// The largest connected component; ties break toward the earlier
    /// component for determinism.
    pub fn largest_fragment(&self) -> Molecule {
        let components = self.components();
        let best = components
            .iter()
            .max_by_key(|c| (c.len(), std::cmp::Reverse(c[0])))
            .cloned()
            .unwrap_or_default();
        self.induced_subgraph(&best)
    }

    /// Convert implicit hydrogens into explicit atoms with single bonds.
    /// New hydrogens are appended after all existing atoms, so tetrahedral
    /// reference order (sorted neighbors, hydrogen last) is preserved.
    pub fn with_explicit_hydrogens(&self) -> Molecule {
        let mut atoms = self.atoms.clone();
        let mut bonds = self.bonds.clone();
        for idx in 0..self.atoms.len() {
            let h_count = atoms[idx].implicit_hydrogens;
            atoms[idx].implicit_hydrogens = 0;
            for _ in 0..h_count {
                let h_idx = atoms.len();
                atoms.push(Atom::of_element(1));
                bonds.push(Bond::new(idx, h_idx, crate::types::bond::BondOrder::Single));
            }
        }
        Molecule::new(atoms, bonds).with_name(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bond::BondOrder;

    fn ethanol() -> Molecule {
        // CCO with implicit hydrogens filled in by hand.
        let mut c1 = Atom::of_element(6);
        c1.implicit_hydrogens = 3;
        let mut c2 = Atom::of_element(6);
        c2.implicit_hydrogens = 2;
        let mut o = Atom::of_element(8);
        o.implicit_hydrogens = 1;
        Molecule::new(
            vec![c1, c2, o],
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(1, 2, BondOrder::Single),
            ],
        )
    }

    #[test]
    fn adjacency_and_counts() {
        let mol = ethanol();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.degree(1), 2);
        assert_eq!(mol.heavy_atom_count(), 3);
        assert_eq!(mol.total_hydrogen_count(), 6);
        assert!(mol.bond_between(0, 1).is_some());
        assert!(mol.bond_between(0, 2).is_none());
    }

    #[test]
    fn element_counts_fold_hydrogens() {
        let counts = ethanol().element_counts();
        assert_eq!(counts.get(&6), Some(&2));
        assert_eq!(counts.get(&8), Some(&1));
        assert_eq!(counts.get(&1), Some(&6));
    }

    #[test]
    fn components_split_fragments() {
        // Ethanol plus a lone sodium.
        let mut atoms: Vec<Atom> = ethanol().atoms().to_vec();
        atoms.push(Atom::of_element(11));
        let bonds = ethanol().bonds().to_vec();
        let mol = Molecule::new(atoms, bonds);
        let components = mol.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], vec![0, 1, 2]);
        assert_eq!(components[1], vec![3]);
        assert_eq!(mol.largest_fragment().atom_count(), 3);
    }

    #[test]
    fn explicit_hydrogens_append_at_end() {
        let expanded = ethanol().with_explicit_hydrogens();
        assert_eq!(expanded.atom_count(), 9);
        assert_eq!(expanded.total_hydrogen_count(), 6);
        assert!(expanded.atoms()[3..].iter().all(|a| a.is_hydrogen()));
        assert_eq!(expanded.degree(0), 4);
    }

    #[test]
    fn subgraph_restores_hydrogens_at_cut_points() {
        // Drop the oxygen of ethanol; the middle carbon gets its hydrogen
        // back and the result is ethane.
        let mol = ethanol();
        let sub = mol.induced_subgraph(&[0, 1]);
        assert_eq!(sub.atom_count(), 2);
        assert_eq!(sub.atom(1).implicit_hydrogens, 3);
        assert_eq!(sub.total_hydrogen_count(), 6);
    }

    #[test]
    fn subgraph_remaps_and_clears_stereo() {
        let mut atoms = vec![Atom::of_element(6); 4];
        atoms[1].chirality = Chirality::Clockwise;
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(1, 2, BondOrder::Single),
            Bond::new(2, 3, BondOrder::Single),
        ];
        let mol = Molecule::new(atoms, bonds);
        let sub = mol.induced_subgraph(&[1, 2, 3]);
        assert_eq!(sub.atom_count(), 3);
        assert_eq!(sub.bond_count(), 2);
        // Atom 1 lost its neighbor 0, so its tag is gone.
        assert_eq!(sub.atom(0).chirality, Chirality::None);
    }
}
