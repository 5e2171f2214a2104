//! Ring perception.
//!
//! Computes a smallest-set-of-smallest-rings basis by shortest-cycle search
//! per bond, then derives the membership flags the rest of the pipeline
//! consumes (layout places ring systems first, descriptors count rings,
//! stereo enumeration skips double bonds locked in small rings).

use std::collections::VecDeque;

use crate::types::Molecule;

/// Ring membership data for one molecule.
#[derive(Debug, Clone)]
pub struct RingInfo {
    rings: Vec<Vec<usize>>,
    ring_bond_sets: Vec<Vec<usize>>,
    atom_in_ring: Vec<bool>,
    bond_in_ring: Vec<bool>,
}

impl RingInfo {
    /// Perceive rings for a molecule.
    pub fn perceive(mol: &Molecule) -> Self {
        let atom_count = mol.atom_count();
        let component_count = mol.components().len();
        let cyclomatic = mol.bond_count() + component_count;
        let cyclomatic = cyclomatic.saturating_sub(atom_count);

        let mut info = RingInfo {
            rings: Vec::new(),
            ring_bond_sets: Vec::new(),
            atom_in_ring: vec![false; atom_count],
            bond_in_ring: vec![false; mol.bond_count()],
        };
        if cyclomatic == 0 {
            return info;
        }

        // One smallest candidate cycle per bond, deduplicated by atom set.
        let mut candidates: Vec<Vec<usize>> = Vec::new();
        let mut seen_sets: Vec<Vec<usize>> = Vec::new();
        for bond_idx in 0..mol.bond_count() {
            let bond = mol.bond(bond_idx);
            if let Some(path) = shortest_path_avoiding(mol, bond.atom1, bond.atom2, bond_idx) {
                let mut key = path.clone();
                key.sort_unstable();
                if !seen_sets.contains(&key) {
                    seen_sets.push(key);
                    candidates.push(path);
                }
            }
        }
        candidates.sort_by(|a, b| {
            a.len().cmp(&b.len()).then_with(|| {
                let mut ka = a.clone();
                let mut kb = b.clone();
                ka.sort_unstable();
                kb.sort_unstable();
                ka.cmp(&kb)
            })
        });

        // Greedy basis: keep cycles that cover a bond no accepted cycle has.
        for cycle in candidates {
            if info.rings.len() == cyclomatic {
                break;
            }
            let bond_set = cycle_bonds(mol, &cycle);
            if bond_set.iter().any(|&b| !info.bond_in_ring[b]) {
                for &b in &bond_set {
                    info.bond_in_ring[b] = true;
                }
                for &a in &cycle {
                    info.atom_in_ring[a] = true;
                }
                info.rings.push(cycle);
                info.ring_bond_sets.push(bond_set);
            }
        }
        info
    }

    /// The ring basis, each ring as atom indices in cycle order.
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    /// Number of basis rings.
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Bond indices of one basis ring.
    pub fn ring_bonds(&self, ring_idx: usize) -> &[usize] {
        &self.ring_bond_sets[ring_idx]
    }

    /// Whether an atom belongs to any ring.
    pub fn is_ring_atom(&self, atom_idx: usize) -> bool {
        self.atom_in_ring[atom_idx]
    }

    /// Whether a bond belongs to any ring.
    pub fn is_ring_bond(&self, bond_idx: usize) -> bool {
        self.bond_in_ring[bond_idx]
    }

    /// Rings that are aromatic end to end (every atom and every ring bond
    /// flagged aromatic).
    pub fn aromatic_ring_count(&self, mol: &Molecule) -> usize {
        self.rings
            .iter()
            .zip(&self.ring_bond_sets)
            .filter(|(atoms, bonds)| {
                atoms.iter().all(|&a| mol.atom(a).is_aromatic)
                    && bonds.iter().all(|&b| mol.bond(b).is_aromatic)
            })
            .count()
    }

    /// Size of the smallest basis ring containing a bond.
    pub fn smallest_ring_with_bond(&self, bond_idx: usize) -> Option<usize> {
        self.ring_bond_sets
            .iter()
            .enumerate()
            .filter(|(_, bonds)| bonds.contains(&bond_idx))
            .map(|(ring_idx, _)| self.rings[ring_idx].len())
            .min()
    }

    /// Basis rings grouped into fused systems (rings sharing at least one
    /// atom). Returns lists of ring indices, ordered by smallest member.
    pub fn fused_systems(&self) -> Vec<Vec<usize>> {
        let n = self.rings.len();
        let mut assigned = vec![false; n];
        let mut systems = Vec::new();
        for start in 0..n {
            if assigned[start] {
                continue;
            }
            let mut system = vec![start];
            assigned[start] = true;
            let mut frontier = vec![start];
            while let Some(current) = frontier.pop() {
                for other in 0..n {
                    if !assigned[other] && shares_atom(&self.rings[current], &self.rings[other]) {
                        assigned[other] = true;
                        system.push(other);
                        frontier.push(other);
                    }
                }
            }
            system.sort_unstable();
            systems.push(system);
        }
        systems
    }
}

fn shares_atom(a: &[usize], b: &[usize]) -> bool {
    a.iter().any(|x| b.contains(x))
}

/// Bond indices along a cycle given in atom order (closing bond included).
fn cycle_bonds(mol: &Molecule, cycle: &[usize]) -> Vec<usize> {
    let mut bonds = Vec::with_capacity(cycle.len());
    for i in 0..cycle.len() {
        let a = cycle[i];
        let b = cycle[(i + 1) % cycle.len()];
        if let Some(bond_idx) = mol.bond_between(a, b) {
            bonds.push(bond_idx);
        }
    }
    bonds
}

/// BFS shortest path from `from` to `to` that does not traverse
/// `skip_bond`. Returns the path as atom indices starting at `from`.
fn shortest_path_avoiding(
    mol: &Molecule,
    from: usize,
    to: usize,
    skip_bond: usize,
) -> Option<Vec<usize>> {
    let mut parent = vec![usize::MAX; mol.atom_count()];
    let mut visited = vec![false; mol.atom_count()];
    let mut queue = VecDeque::new();
    visited[from] = true;
    queue.push_back(from);
    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut path = vec![to];
            let mut cursor = to;
            while cursor != from {
                cursor = parent[cursor];
                path.push(cursor);
            }
            path.reverse();
            return Some(path);
        }
        for &(neighbor, bond_idx) in mol.neighbors(current) {
            if bond_idx == skip_bond || visited[neighbor] {
                continue;
            }
            visited[neighbor] = true;
            parent[neighbor] = current;
            queue.push_back(neighbor);
        }
    }
    None
}
