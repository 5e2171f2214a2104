//! Canonical SMILES emission.
//!
//! A two-pass walk over the canonical ranking: the first pass fixes the
//! spanning tree and allocates ring-closure digits, the second replays that
//! tree and writes text. Tetrahedral tags and directional bonds are
//! re-expressed relative to the written neighbor order, so the output
//! carries the same stereochemistry under any input numbering.

use std::fmt::Write as _;

use crate::canon::ranking::canonical_ranks;
use crate::parser::permutation_parity_to_sorted;
use crate::types::atom::Chirality;
use crate::types::bond::{BondOrder, BondStereo};
use crate::types::element;
use crate::types::molecule::Molecule;

/// Canonical SMILES for a molecule. Empty molecules give an empty string.
pub fn write_canonical_smiles(mol: &Molecule) -> String {
    let ranks = canonical_ranks(mol);
    write_with_ranks(mol, &ranks)
}

pub(crate) fn write_with_ranks(mol: &Molecule, ranks: &[usize]) -> String {
    let tree = SpanningTree::build(mol, ranks);
    let mut writer = Writer {
        mol,
        tree: &tree,
        out: String::new(),
    };
    let mut first = true;
    for &start in &tree.fragment_starts {
        if !first {
            writer.out.push('.');
        }
        first = false;
        writer.emit_subtree(start, None, None);
    }
    writer.out
}

#[derive(Clone, Copy)]
struct Closure {
    number: usize,
    bond_idx: usize,
    /// Set on the endpoint written first; that occurrence carries the bond
    /// symbol.
    opens: bool,
    partner: usize,
}

/// The DFS tree and ring-closure assignment, fixed before any text is
/// written so the atom pass can see its full written neighbor order.
struct SpanningTree {
    children: Vec<Vec<(usize, usize)>>,
    closures: Vec<Vec<Closure>>,
    fragment_starts: Vec<usize>,
}

impl SpanningTree {
    fn build(mol: &Molecule, ranks: &[usize]) -> Self {
        let n = mol.atom_count();
        let mut tree = SpanningTree {
            children: vec![Vec::new(); n],
            closures: vec![Vec::new(); n],
            fragment_starts: Vec::new(),
        };
        let mut visited = vec![false; n];
        let mut bond_used = vec![false; mol.bond_count()];
        let mut next_number = 1usize;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_unstable_by_key(|&i| ranks[i]);
        for &start in &order {
            if visited[start] {
                continue;
            }
            tree.fragment_starts.push(start);
            tree.walk(mol, ranks, start, &mut visited, &mut bond_used, &mut next_number);
        }
        for list in &mut tree.closures {
            list.sort_unstable_by_key(|c| c.number);
        }
        tree
    }

    fn walk(
        &mut self,
        mol: &Molecule,
        ranks: &[usize],
        at: usize,
        visited: &mut [bool],
        bond_used: &mut [bool],
        next_number: &mut usize,
    ) {
        visited[at] = true;
        for (nbr, bond_idx) in sorted_neighbors(mol, ranks, at) {
            if bond_used[bond_idx] {
                continue;
            }
            bond_used[bond_idx] = true;
            if visited[nbr] {
                let number = *next_number;
                *next_number += 1;
                self.closures[nbr].push(Closure {
                    number,
                    bond_idx,
                    opens: true,
                    partner: at,
                });
                self.closures[at].push(Closure {
                    number,
                    bond_idx,
                    opens: false,
                    partner: nbr,
                });
            } else {
                self.children[at].push((nbr, bond_idx));
                self.walk(mol, ranks, nbr, visited, bond_used, next_number);
            }
        }
    }
}

fn sorted_neighbors(mol: &Molecule, ranks: &[usize], at: usize) -> Vec<(usize, usize)> {
    let mut neighbors = mol.neighbors(at).to_vec();
    neighbors.sort_unstable_by_key(|&(nbr, _)| ranks[nbr]);
    neighbors
}

struct Writer<'a> {
    mol: &'a Molecule,
    tree: &'a SpanningTree,
    out: String,
}

impl Writer<'_> {
    fn emit_subtree(&mut self, at: usize, from: Option<usize>, via_bond: Option<usize>) {
        if let (Some(parent), Some(bond_idx)) = (from, via_bond) {
            self.emit_bond_symbol(bond_idx, parent, at);
        }
        self.emit_atom(at, from);
        for closure in &self.tree.closures[at] {
            if closure.opens {
                self.emit_closure_bond_symbol(closure.bond_idx, at);
            }
            if closure.number < 10 {
                let _ = write!(self.out, "{}", closure.number);
            } else {
                let _ = write!(self.out, "%{:02}", closure.number);
            }
        }
        let children = &self.tree.children[at];
        for (pos, &(child, bond_idx)) in children.iter().enumerate() {
            if pos + 1 < children.len() {
                self.out.push('(');
                self.emit_subtree(child, Some(at), Some(bond_idx));
                self.out.push(')');
            } else {
                self.emit_subtree(child, Some(at), Some(bond_idx));
            }
        }
    }

    /// Bond symbol for the traversal step `from -> to`. Single and aromatic
    /// bonds stay implicit except for directional marks and the explicit
    /// single between two aromatic atoms.
    fn emit_bond_symbol(&mut self, bond_idx: usize, from: usize, to: usize) {
        let bond = self.mol.bond(bond_idx);
        match bond.order {
            BondOrder::Double => self.out.push('='),
            BondOrder::Triple => self.out.push('#'),
            BondOrder::Aromatic => {}
            BondOrder::Single => {
                let oriented = if bond.atom1 == from {
                    bond.stereo
                } else {
                    bond.stereo.reversed()
                };
                match oriented {
                    BondStereo::Up => self.out.push('/'),
                    BondStereo::Down => self.out.push('\\'),
                    _ => {
                        if self.mol.atom(from).is_aromatic
                            && self.mol.atom(to).is_aromatic
                            && !bond.is_aromatic
                        {
                            self.out.push('-');
                        }
                    }
                }
            }
        }
    }

    /// Bond symbol ahead of an opening ring digit; the closing digit never
    /// repeats it.
    fn emit_closure_bond_symbol(&mut self, bond_idx: usize, at: usize) {
        let bond = self.mol.bond(bond_idx);
        match bond.order {
            BondOrder::Double => self.out.push('='),
            BondOrder::Triple => self.out.push('#'),
            BondOrder::Aromatic => {}
            BondOrder::Single => {
                let oriented = if bond.atom1 == at {
                    bond.stereo
                } else {
                    bond.stereo.reversed()
                };
                match oriented {
                    BondStereo::Up => self.out.push('/'),
                    BondStereo::Down => self.out.push('\\'),
                    _ => {}
                }
            }
        }
    }

    fn emit_atom(&mut self, at: usize, from: Option<usize>) {
        let atom = self.mol.atom(at);
        let tag = self.oriented_tag(at, from);
        if !needs_bracket(self.mol, at, tag.is_set()) {
            self.push_symbol(at);
            return;
        }
        self.out.push('[');
        if let Some(isotope) = atom.isotope {
            let _ = write!(self.out, "{}", isotope);
        }
        self.push_symbol(at);
        match tag {
            Chirality::Counterclockwise => self.out.push('@'),
            Chirality::Clockwise => self.out.push_str("@@"),
            Chirality::None => {}
        }
        match atom.implicit_hydrogens {
            0 => {}
            1 => self.out.push('H'),
            n => {
                let _ = write!(self.out, "H{}", n);
            }
        }
        let charge = atom.formal_charge;
        if charge > 0 {
            self.out.push('+');
            if charge > 1 {
                let _ = write!(self.out, "{}", charge);
            }
        } else if charge < 0 {
            self.out.push('-');
            if charge < -1 {
                let _ = write!(self.out, "{}", -charge);
            }
        }
        self.out.push(']');
    }

    fn push_symbol(&mut self, at: usize) {
        let atom = self.mol.atom(at);
        let symbol = atom.symbol();
        if atom.is_aromatic && element::supports_aromatic_form(atom.atomic_number) {
            for c in symbol.chars() {
                self.out.extend(c.to_lowercase());
            }
        } else {
            self.out.push_str(symbol);
        }
    }

    /// The tetrahedral tag re-oriented to the neighbor order this writer is
    /// about to produce: parent, bracket hydrogen, ring digits, branches.
    /// Stored tags are relative to ascending atom index with the implicit
    /// hydrogen last; an odd permutation between the frames flips the tag.
    fn oriented_tag(&self, at: usize, from: Option<usize>) -> Chirality {
        let atom = self.mol.atom(at);
        if !atom.chirality.is_set() {
            return Chirality::None;
        }
        let mut written: Vec<usize> = Vec::with_capacity(4);
        if let Some(parent) = from {
            written.push(parent);
        }
        if atom.implicit_hydrogens == 1 {
            written.push(usize::MAX);
        }
        for closure in &self.tree.closures[at] {
            written.push(closure.partner);
        }
        for &(child, _) in &self.tree.children[at] {
            written.push(child);
        }
        if written.len() != 4 {
            return Chirality::None;
        }
        if permutation_parity_to_sorted(&written) {
            atom.chirality.inverted()
        } else {
            atom.chirality
        }
    }
}

/// Whether the atom must be spelled in brackets: charge, isotope, a written
/// tetrahedral tag, an element outside the organic subset, or an implicit
/// hydrogen count the bare symbol would not reproduce on re-reading.
fn needs_bracket(mol: &Molecule, at: usize, tag_written: bool) -> bool {
    let atom = mol.atom(at);
    if atom.formal_charge != 0
        || atom.isotope.is_some()
        || tag_written
        || !element::in_organic_subset(atom.atomic_number)
    {
        return true;
    }
    if atom.is_aromatic && !element::supports_aromatic_form(atom.atomic_number) {
        return true;
    }
    bare_symbol_hydrogens(mol, at) != atom.implicit_hydrogens as i32
}

/// Implicit hydrogens a reader would assign to the bare organic-subset
/// symbol. Mirrors the parser's valence ladder, so `[nH]` and friends get
/// brackets exactly when the bare form loses a hydrogen.
fn bare_symbol_hydrogens(mol: &Molecule, at: usize) -> i32 {
    let atom = mol.atom(at);
    let ladder = element::default_valences(atom.atomic_number);
    if ladder.is_empty() {
        return -1;
    }
    if atom.is_aromatic {
        ladder[0] as i32 - 1 - mol.degree(at) as i32
    } else {
        let total = mol.bond_order_sum(at).round() as i32;
        let target = ladder
            .iter()
            .map(|&v| v as i32)
            .find(|&v| v >= total)
            .unwrap_or(total);
        target - total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;

    fn canon(smiles: &str) -> String {
        write_canonical_smiles(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn plain_chain_round_trips() {
        let out = canon("CCO");
        let again = canon(&out);
        assert_eq!(out, again);
        let mol = parse_smiles(&out).unwrap();
        assert_eq!(mol.atom_count(), 3);
    }

    #[test]
    fn input_order_does_not_matter() {
        assert_eq!(canon("OCC"), canon("CCO"));
        assert_eq!(canon("C(C)(C)C"), canon("CC(C)C"));
        assert_eq!(canon("c1ccccc1O"), canon("Oc1ccccc1"));
    }

    #[test]
    fn aromatic_ring_stays_lowercase() {
        let out = canon("c1ccccc1");
        assert_eq!(out.matches('c').count(), 6);
        assert!(out.contains('1'));
        assert_eq!(canon(&out), out);
    }

    #[test]
    fn pyrrole_nitrogen_keeps_its_hydrogen() {
        let out = canon("c1cc[nH]c1");
        assert!(out.contains("[nH]"), "got {}", out);
        assert_eq!(canon(&out), out);
    }

    #[test]
    fn charges_and_isotopes_stay_bracketed() {
        assert_eq!(canon("[NH4+]"), "[NH4+]");
        assert_eq!(canon("[13CH4]"), "[13CH4]");
        let charged = canon("[O-]S(=O)(=O)[O-]");
        assert_eq!(charged.matches("[O-]").count(), 2);
    }

    #[test]
    fn fragments_join_with_dots() {
        let out = canon("[Na+].[Cl-]");
        assert_eq!(out, "[Na+].[Cl-]");
        assert_eq!(canon(&out), out);
    }

    #[test]
    fn tetrahedral_tag_survives_canonicalization() {
        let left = canon("C[C@H](N)O");
        let right = canon("C[C@@H](N)O");
        assert!(left.contains('@'));
        assert_ne!(left, right);
        assert_eq!(canon(&left), left);
        assert_eq!(canon(&right), right);
    }

    #[test]
    fn tetrahedral_tag_is_input_order_invariant() {
        // Swapping the first two substituents in the text flips the written
        // tag; both spellings denote the same enantiomer.
        assert_eq!(canon("C[C@H](N)O"), canon("N[C@@H](C)O"));
        assert_eq!(canon("C[C@@H](N)O"), canon("N[C@H](C)O"));
    }

    #[test]
    fn double_bond_geometry_survives() {
        let trans = canon("F/C=C/F");
        let cis = canon("F/C=C\\F");
        assert_ne!(trans, cis);
        assert!(trans.contains('/') || trans.contains('\\'));
        assert_eq!(canon(&trans), trans);
        assert_eq!(canon(&cis), cis);
    }

    #[test]
    fn caffeine_is_idempotent() {
        let out = canon("CN1C(=O)C2=C(N=CN2C)N(C)C1=O");
        assert_eq!(canon(&out), out);
        let mol = parse_smiles(&out).unwrap();
        assert_eq!(mol.heavy_atom_count(), 14);
    }

    #[test]
    fn ring_closure_digits_reach_two_figures() {
        // Closure numbers are never reused, so ten rings push the last
        // digit into the %nn form.
        let mut smiles = String::from("C1CC1");
        for _ in 0..9 {
            smiles.push_str(".C1CC1");
        }
        let out = canon(&smiles);
        assert_eq!(out.matches('.').count(), 9);
        assert!(out.contains("%10"), "got {}", out);
        assert_eq!(canon(&out), out);
    }

    #[test]
    fn emission_is_stable_across_runs() {
        let first = canon("CN1C(=O)C2=C(N=CN2C)N(C)C1=O");
        for _ in 0..100 {
            assert_eq!(canon("CN1C(=O)C2=C(N=CN2C)N(C)C1=O"), first);
        }
    }
}
