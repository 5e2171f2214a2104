//! Murcko framework extraction.

use std::collections::VecDeque;

use crate::rings::RingInfo;
use crate::types::bond::BondOrder;
use crate::types::molecule::Molecule;

/// The Murcko framework: ring systems, the linker atoms between them, and
/// substituents attached by a double bond. Side chains disappear and their
/// attachment points regain hydrogens. `None` for acyclic molecules.
pub fn murcko_scaffold(mol: &Molecule) -> Option<Molecule> {
    let rings = RingInfo::perceive(mol);
    if rings.ring_count() == 0 {
        return None;
    }
    let n = mol.atom_count();
    let ring_atom: Vec<bool> = (0..n).map(|i| rings.is_ring_atom(i)).collect();
    let mut keep = ring_atom.clone();

    let systems = ring_systems(mol, &ring_atom);
    for a in 0..systems.len() {
        for b in (a + 1)..systems.len() {
            if let Some(path) = shortest_path(mol, &systems[a], &systems[b]) {
                for atom in path {
                    keep[atom] = true;
                }
            }
        }
    }

    // Exocyclic double bonds stay on the framework.
    loop {
        let mut grew = false;
        for bond in mol.bonds() {
            if bond.order != BondOrder::Double {
                continue;
            }
            if keep[bond.atom1] != keep[bond.atom2] {
                keep[bond.atom1] = true;
                keep[bond.atom2] = true;
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    let kept: Vec<usize> = (0..n).filter(|&i| keep[i]).collect();
    Some(mol.induced_subgraph(&kept))
}

/// Connected components of the ring-atom set. Fused and spiro rings land
/// in one system, as do rings joined by a direct bond.
fn ring_systems(mol: &Molecule, ring_atom: &[bool]) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut seen = vec![false; n];
    let mut systems = Vec::new();
    for start in 0..n {
        if !ring_atom[start] || seen[start] {
            continue;
        }
        let mut stack = vec![start];
        seen[start] = true;
        let mut members = Vec::new();
        while let Some(current) = stack.pop() {
            members.push(current);
            for &(nbr, _) in mol.neighbors(current) {
                if ring_atom[nbr] && !seen[nbr] {
                    seen[nbr] = true;
                    stack.push(nbr);
                }
            }
        }
        members.sort_unstable();
        systems.push(members);
    }
    systems
}

/// Shortest path from any atom of `sources` to any atom of `targets` by
/// breadth-first search in adjacency order. Returns the full path
/// including both ring-atom endpoints.
fn shortest_path(mol: &Molecule, sources: &[usize], targets: &[usize]) -> Option<Vec<usize>> {
    let n = mol.atom_count();
    let mut is_target = vec![false; n];
    for &t in targets {
        is_target[t] = true;
    }
    let mut parent = vec![usize::MAX; n];
    let mut seen = vec![false; n];
    let mut queue = VecDeque::new();
    for &s in sources {
        seen[s] = true;
        queue.push_back(s);
    }
    while let Some(current) = queue.pop_front() {
        if is_target[current] {
            let mut path = vec![current];
            let mut walk = current;
            while parent[walk] != usize::MAX {
                walk = parent[walk];
                path.push(walk);
            }
            return Some(path);
        }
        for &(nbr, _) in mol.neighbors(current) {
            if !seen[nbr] {
                seen[nbr] = true;
                parent[nbr] = current;
                queue.push_back(nbr);
            }
        }
    }
    None
}
