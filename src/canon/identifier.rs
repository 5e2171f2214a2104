//! Layered structure identifier and its hashed key.
//!
//! The identifier spells the molecule as slash-separated layers over the
//! canonical heavy-atom numbering: Hill formula, connectivity walk,
//! hydrogen counts, net charge and isotopes. The key condenses the
//! identifier into fixed-width uppercase blocks for indexing.

use sha2::{Digest, Sha256};

use crate::canon::ranking::canonical_ranks;
use crate::types::formula::MolecularFormula;
use crate::types::molecule::Molecule;

const IDENTIFIER_PREFIX: &str = "XID=1";

/// The layered identifier. Layers with nothing to say are omitted.
pub fn layered_identifier(mol: &Molecule) -> String {
    let ranks = canonical_ranks(mol);
    let numbering = heavy_atom_numbering(mol, &ranks);

    let mut identifier = String::from(IDENTIFIER_PREFIX);
    identifier.push('/');
    identifier.push_str(&MolecularFormula::from_counts(mol.element_counts()).to_string());

    let connectivity = connectivity_layer(mol, &numbering);
    if !connectivity.is_empty() {
        identifier.push_str("/c");
        identifier.push_str(&connectivity);
    }
    let hydrogens = hydrogen_layer(mol, &numbering);
    if !hydrogens.is_empty() {
        identifier.push_str("/h");
        identifier.push_str(&hydrogens);
    }
    let charge = mol.net_charge();
    if charge != 0 {
        identifier.push_str(&format!("/q{:+}", charge));
    }
    let isotopes = isotope_layer(mol, &numbering);
    if !isotopes.is_empty() {
        identifier.push_str("/i");
        identifier.push_str(&isotopes);
    }
    identifier
}

/// Uppercase-letter key in 14-10-1 blocks from a SHA-256 of the
/// identifier text.
pub fn identifier_key(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    let letter = |b: u8| char::from(b'A' + b % 26);
    let mut key = String::with_capacity(27);
    for &b in &digest[..14] {
        key.push(letter(b));
    }
    key.push('-');
    for &b in &digest[14..24] {
        key.push(letter(b));
    }
    key.push('-');
    key.push(letter(digest[24]));
    key
}

/// 1-based numbers over heavy atoms in canonical rank order; hydrogens get
/// no number.
fn heavy_atom_numbering(mol: &Molecule, ranks: &[usize]) -> Vec<usize> {
    let mut heavy: Vec<usize> = (0..mol.atom_count())
        .filter(|&i| !mol.atom(i).is_hydrogen())
        .collect();
    heavy.sort_unstable_by_key(|&i| ranks[i]);
    let mut numbering = vec![0usize; mol.atom_count()];
    for (pos, &idx) in heavy.iter().enumerate() {
        numbering[idx] = pos + 1;
    }
    numbering
}

/// Depth-first connectivity walk per fragment, lowest number first,
/// branches parenthesized, ring closures written as back-references.
/// Empty when no two heavy atoms are bonded.
fn connectivity_layer(mol: &Molecule, numbering: &[usize]) -> String {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut bond_used = vec![false; mol.bond_count()];

    let mut starts: Vec<usize> = (0..n).filter(|&i| numbering[i] > 0).collect();
    starts.sort_unstable_by_key(|&i| numbering[i]);

    let mut fragments = Vec::new();
    for &start in &starts {
        if visited[start] {
            continue;
        }
        let text = walk(mol, numbering, start, &mut visited, &mut bond_used);
        if text.contains('-') || text.contains('(') {
            fragments.push(text);
        }
    }
    fragments.join(";")
}

fn walk(
    mol: &Molecule,
    numbering: &[usize],
    at: usize,
    visited: &mut [bool],
    bond_used: &mut [bool],
) -> String {
    visited[at] = true;
    let mut neighbors: Vec<(usize, usize)> = mol
        .neighbors(at)
        .iter()
        .copied()
        .filter(|&(nbr, _)| numbering[nbr] > 0)
        .collect();
    neighbors.sort_unstable_by_key(|&(nbr, _)| numbering[nbr]);

    let mut parts: Vec<String> = Vec::new();
    for (nbr, bond_idx) in neighbors {
        if bond_used[bond_idx] {
            continue;
        }
        bond_used[bond_idx] = true;
        if visited[nbr] {
            parts.push(numbering[nbr].to_string());
        } else {
            parts.push(walk(mol, numbering, nbr, visited, bond_used));
        }
    }

    let mut text = numbering[at].to_string();
    for (pos, part) in parts.iter().enumerate() {
        if pos + 1 < parts.len() {
            text.push('(');
            text.push_str(part);
            text.push(')');
        } else {
            if !text.ends_with(')') {
                text.push('-');
            }
            text.push_str(part);
        }
    }
    text
}

/// Heavy atoms grouped by hydrogen count ascending, each group a
/// compressed number list: `3H,1-2H3` style.
fn hydrogen_layer(mol: &Molecule, numbering: &[usize]) -> String {
    let mut by_count: Vec<(usize, Vec<usize>)> = Vec::new();
    for idx in 0..mol.atom_count() {
        if numbering[idx] == 0 {
            continue;
        }
        let explicit_h = mol
            .neighbors(idx)
            .iter()
            .filter(|&&(nbr, _)| mol.atom(nbr).is_hydrogen())
            .count();
        let count = mol.atom(idx).implicit_hydrogens as usize + explicit_h;
        if count == 0 {
            continue;
        }
        match by_count.iter_mut().find(|(c, _)| *c == count) {
            Some((_, list)) => list.push(numbering[idx]),
            None => by_count.push((count, vec![numbering[idx]])),
        }
    }
    by_count.sort_unstable_by_key(|(count, _)| *count);
    let groups: Vec<String> = by_count
        .into_iter()
        .map(|(count, mut numbers)| {
            numbers.sort_unstable();
            let mut text = compress_runs(&numbers);
            text.push('H');
            if count > 1 {
                text.push_str(&count.to_string());
            }
            text
        })
        .collect();
    groups.join(",")
}

fn isotope_layer(mol: &Molecule, numbering: &[usize]) -> String {
    let mut entries: Vec<(usize, i32)> = Vec::new();
    for idx in 0..mol.atom_count() {
        if numbering[idx] == 0 {
            continue;
        }
        if let Some(isotope) = mol.atom(idx).isotope {
            let nominal = crate::types::element::average_mass(mol.atom(idx).atomic_number).round()
                as i32;
            entries.push((numbering[idx], isotope as i32 - nominal));
        }
    }
    entries.sort_unstable();
    entries
        .into_iter()
        .map(|(number, shift)| format!("{}{:+}", number, shift))
        .collect::<Vec<_>>()
        .join(",")
}

/// `[1,2,3,5]` becomes `1-3,5`.
fn compress_runs(numbers: &[usize]) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut run_start = 0usize;
    for pos in 0..numbers.len() {
        let at_end = pos + 1 == numbers.len() || numbers[pos + 1] != numbers[pos] + 1;
        if at_end {
            if pos == run_start {
                pieces.push(numbers[pos].to_string());
            } else {
                pieces.push(format!("{}-{}", numbers[run_start], numbers[pos]));
            }
            run_start = pos + 1;
        }
    }
    pieces.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;

    fn identifier(smiles: &str) -> String {
        layered_identifier(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn ethanol_layers() {
        assert_eq!(identifier("CCO"), "XID=1/C2H6O/c1-2-3/h3H,2H2,1H3");
    }

    #[test]
    fn identifier_ignores_input_order() {
        assert_eq!(identifier("OCC"), identifier("CCO"));
        assert_eq!(identifier("C(O)C"), identifier("CCO"));
    }

    #[test]
    fn single_atom_skips_connectivity() {
        assert_eq!(identifier("C"), "XID=1/CH4/h1H4");
    }

    #[test]
    fn charge_layer_appears_when_charged() {
        assert_eq!(identifier("[NH4+]"), "XID=1/H4N/h1H4/q+1");
        assert!(identifier("[O-]CC").contains("/q-1"));
    }

    #[test]
    fn isotope_layer_lists_shifts() {
        let id = identifier("[13CH4]");
        assert!(id.ends_with("/i1+1"), "got {}", id);
    }

    #[test]
    fn ring_walk_closes_on_itself() {
        let id = identifier("C1CC1");
        assert_eq!(id, "XID=1/C3H6/c1-2-3-1/h1-3H2");
    }

    #[test]
    fn key_has_fixed_shape() {
        let key = identifier_key(&identifier("CCO"));
        assert_eq!(key.len(), 27);
        let blocks: Vec<&str> = key.split('-').collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].len(), 14);
        assert_eq!(blocks[1].len(), 10);
        assert_eq!(blocks[2].len(), 1);
        assert!(key.chars().all(|c| c == '-' || c.is_ascii_uppercase()));
    }

    #[test]
    fn key_is_deterministic_and_sensitive() {
        assert_eq!(
            identifier_key("XID=1/C2H6O/c1-2-3/h3H,2H2,1H3"),
            identifier_key("XID=1/C2H6O/c1-2-3/h3H,2H2,1H3")
        );
        assert_ne!(identifier_key(&identifier("CCO")), identifier_key(&identifier("CCC")));
    }
}
