//! SMILES parsing.
//!
//! Byte-cursor parser covering the daylight grammar as used in practice:
//! organic-subset and bracket atoms, two-letter elements, isotopes, charges,
//! explicit hydrogen counts, branches, ring closures (digits and `%nn`),
//! aromatic lowercase forms, dot-separated fragments, tetrahedral tags
//! (`@`, `@@`) and directional bonds (`/`, `\`).
//!
//! Tetrahedral tags are normalized at the end of the parse: the as-written
//! neighbor order (including the position of a bracket hydrogen) is reduced
//! to the reference frame used throughout the crate, ascending atom index
//! with the implicit hydrogen last.

use std::collections::BTreeMap;

use crate::error::ChemError;
use crate::types::element;
use crate::types::{Atom, Bond, BondOrder, BondStereo, Chirality, Molecule};

/// Parse SMILES text into a molecule.
pub fn parse_smiles(text: &str) -> Result<Molecule, ChemError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChemError::parse_at(0, "empty input"));
    }
    let mut parser = SmilesParser::new(trimmed);
    parser.run()?;
    parser.finish()
}

/// Written neighbor-order slot for chirality bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Resolved(usize),
    PendingRing(u16),
    ImplicitH,
}

struct RingEntry {
    atom: usize,
    order: Option<BondOrder>,
    stereo: BondStereo,
    position: usize,
}

struct SmilesParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    from_bracket: Vec<bool>,
    bonds: Vec<Bond>,
    written_order: Vec<Vec<Slot>>,
    branch_stack: Vec<usize>,
    ring_map: BTreeMap<u16, RingEntry>,
    prev: Option<usize>,
    pending_order: Option<BondOrder>,
    pending_stereo: BondStereo,
    pending_pos: usize,
}

impl<'a> SmilesParser<'a> {
    fn new(text: &'a str) -> Self {
        SmilesParser {
            bytes: text.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            from_bracket: Vec::new(),
            bonds: Vec::new(),
            written_order: Vec::new(),
            branch_stack: Vec::new(),
            ring_map: BTreeMap::new(),
            prev: None,
            pending_order: None,
            pending_stereo: BondStereo::None,
            pending_pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    fn run(&mut self) -> Result<(), ChemError> {
        while let Some(byte) = self.peek() {
            match byte {
                b'(' => {
                    let at = self.pos;
                    self.pos += 1;
                    match self.prev {
                        Some(atom) => self.branch_stack.push(atom),
                        None => return Err(ChemError::parse_at(at, "branch before any atom")),
                    }
                }
                b')' => {
                    let at = self.pos;
                    self.pos += 1;
                    self.prev = Some(
                        self.branch_stack
                            .pop()
                            .ok_or_else(|| ChemError::parse_at(at, "unmatched ')'"))?,
                    );
                }
                b'-' => {
                    self.set_pending(BondOrder::Single, BondStereo::None)?;
                    self.pos += 1;
                }
                b'=' => {
                    self.set_pending(BondOrder::Double, BondStereo::None)?;
                    self.pos += 1;
                }
                b'#' => {
                    self.set_pending(BondOrder::Triple, BondStereo::None)?;
                    self.pos += 1;
                }
                b':' => {
                    self.set_pending(BondOrder::Aromatic, BondStereo::None)?;
                    self.pos += 1;
                }
                b'/' => {
                    self.set_pending(BondOrder::Single, BondStereo::Up)?;
                    self.pos += 1;
                }
                b'\\' => {
                    self.set_pending(BondOrder::Single, BondStereo::Down)?;
                    self.pos += 1;
                }
                b'.' => {
                    let at = self.pos;
                    self.pos += 1;
                    if self.pending_order.is_some() || self.pending_stereo != BondStereo::None {
                        return Err(ChemError::parse_at(at, "bond symbol before '.'"));
                    }
                    self.prev = None;
                }
                b'0'..=b'9' => {
                    let at = self.pos;
                    let digit = (byte - b'0') as u16;
                    self.pos += 1;
                    self.ring_closure(digit, at)?;
                }
                b'%' => {
                    let at = self.pos;
                    self.pos += 1;
                    let number = self.two_digit_ring_number(at)?;
                    self.ring_closure(number, at)?;
                }
                b'[' => {
                    self.pos += 1;
                    self.bracket_atom()?;
                }
                b'A'..=b'Z' | b'a'..=b'z' => self.organic_atom()?,
                other => {
                    return Err(ChemError::parse_at(
                        self.pos,
                        format!("unexpected character '{}'", other as char),
                    ));
                }
            }
        }
        Ok(())
    }

    fn set_pending(&mut self, order: BondOrder, stereo: BondStereo) -> Result<(), ChemError> {
        if self.pending_order.is_some() {
            return Err(ChemError::parse_at(self.pos, "two bond symbols in a row"));
        }
        if self.prev.is_none() {
            return Err(ChemError::parse_at(self.pos, "bond symbol before any atom"));
        }
        self.pending_order = Some(order);
        self.pending_stereo = stereo;
        self.pending_pos = self.pos;
        Ok(())
    }

    fn take_pending(&mut self) -> (Option<BondOrder>, BondStereo) {
        let order = self.pending_order.take();
        let stereo = std::mem::replace(&mut self.pending_stereo, BondStereo::None);
        (order, stereo)
    }

    fn two_digit_ring_number(&mut self, at: usize) -> Result<u16, ChemError> {
        let mut number = 0u16;
        for _ in 0..2 {
            match self.bump() {
                Some(d @ b'0'..=b'9') => number = number * 10 + (d - b'0') as u16,
                _ => {
                    return Err(ChemError::parse_at(at, "'%' needs two digits"));
                }
            }
        }
        Ok(number)
    }

    /// Open or close a ring bond for the previous atom.
    fn ring_closure(&mut self, number: u16, at: usize) -> Result<(), ChemError> {
        let atom = self
            .prev
            .ok_or_else(|| ChemError::parse_at(at, "ring closure before any atom"))?;
        let (pending_order, pending_stereo) = self.take_pending();

        if let Some(entry) = self.ring_map.remove(&number) {
            if entry.atom == atom {
                return Err(ChemError::parse_at(at, "ring bond to the same atom"));
            }
            if self.bond_between(entry.atom, atom).is_some() {
                return Err(ChemError::parse_at(at, "duplicate ring bond"));
            }
            let order = match (entry.order, pending_order) {
                (None, None) => self.default_order(entry.atom, atom),
                (Some(order), None) | (None, Some(order)) => order,
                (Some(a), Some(b)) if a == b => a,
                (Some(_), Some(_)) => {
                    return Err(ChemError::parse_at(at, "conflicting ring bond orders"));
                }
            };
            // Direction written at the closing end reads closer-to-opener;
            // storage is opener-first.
            let stereo = if entry.stereo != BondStereo::None {
                entry.stereo
            } else {
                pending_stereo.reversed()
            };
            let bond_idx = self.bonds.len();
            let mut bond = Bond::new(entry.atom, atom, order);
            bond.is_aromatic = order == BondOrder::Aromatic;
            bond.stereo = stereo;
            self.bonds.push(bond);
            let _ = bond_idx;
            // Patch the opener's written slot; append on the closer.
            let slot = self.written_order[entry.atom]
                .iter_mut()
                .find(|s| **s == Slot::PendingRing(number));
            if let Some(slot) = slot {
                *slot = Slot::Resolved(atom);
            }
            self.written_order[atom].push(Slot::Resolved(entry.atom));
        } else {
            self.ring_map.insert(
                number,
                RingEntry {
                    atom,
                    order: pending_order,
                    stereo: pending_stereo,
                    position: at,
                },
            );
            self.written_order[atom].push(Slot::PendingRing(number));
        }
        Ok(())
    }

    fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.bonds
            .iter()
            .position(|bond| (bond.atom1 == a && bond.atom2 == b) || (bond.atom1 == b && bond.atom2 == a))
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].is_aromatic && self.atoms[b].is_aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    /// Register a freshly parsed atom, bonding it to the previous one.
    fn push_atom(&mut self, atom: Atom, bracket: bool, written_h: bool) -> Result<(), ChemError> {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        self.from_bracket.push(bracket);
        self.written_order.push(Vec::new());

        if let Some(prev) = self.prev {
            let (pending_order, pending_stereo) = self.take_pending();
            let order = pending_order.unwrap_or_else(|| self.default_order(prev, idx));
            let mut bond = Bond::new(prev, idx, order);
            bond.is_aromatic = order == BondOrder::Aromatic
                || (order == BondOrder::Single
                    && self.atoms[prev].is_aromatic
                    && self.atoms[idx].is_aromatic
                    && pending_order.is_none());
            bond.stereo = pending_stereo;
            self.bonds.push(bond);
            self.written_order[prev].push(Slot::Resolved(idx));
            self.written_order[idx].push(Slot::Resolved(prev));
        } else if self.pending_order.is_some() {
            return Err(ChemError::parse_at(self.pending_pos, "dangling bond symbol"));
        }
        // A single bracket hydrogen occupies the slot where it was written,
        // right after the incoming bond.
        if written_h {
            self.written_order[idx].push(Slot::ImplicitH);
        }
        self.prev = Some(idx);
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<(), ChemError> {
        let at = self.pos;
        let first = self.bytes[self.pos];
        // Two-letter organic-subset symbols.
        if (first == b'C' && self.bytes.get(self.pos + 1) == Some(&b'l'))
            || (first == b'B' && self.bytes.get(self.pos + 1) == Some(&b'r'))
        {
            let symbol = if first == b'C' { "Cl" } else { "Br" };
            self.pos += 2;
            let number = element::atomic_number(symbol)
                .ok_or_else(|| ChemError::parse_at(at, format!("unknown element '{}'", symbol)))?;
            return self.push_atom(Atom::of_element(number), false, false);
        }

        let (number, aromatic) = match first {
            b'B' => (5, false),
            b'C' => (6, false),
            b'N' => (7, false),
            b'O' => (8, false),
            b'P' => (15, false),
            b'S' => (16, false),
            b'F' => (9, false),
            b'I' => (53, false),
            b'b' => (5, true),
            b'c' => (6, true),
            b'n' => (7, true),
            b'o' => (8, true),
            b'p' => (15, true),
            b's' => (16, true),
            other => {
                return Err(ChemError::parse_at(
                    at,
                    format!("'{}' is not an organic-subset element", other as char),
                ));
            }
        };
        self.pos += 1;
        let mut atom = Atom::of_element(number);
        atom.is_aromatic = aromatic;
        self.push_atom(atom, false, false)
    }

    fn bracket_atom(&mut self) -> Result<(), ChemError> {
        let open_at = self.pos.saturating_sub(1);

        // Isotope.
        let mut isotope: Option<u16> = None;
        while let Some(d @ b'0'..=b'9') = self.peek() {
            let next = isotope.unwrap_or(0).saturating_mul(10) + (d - b'0') as u16;
            isotope = Some(next);
            self.pos += 1;
        }

        // Element symbol, aromatic lowercase allowed.
        let symbol_at = self.pos;
        let first = self
            .bump()
            .ok_or_else(|| ChemError::parse_at(open_at, "unterminated bracket atom"))?;
        let mut aromatic = false;
        let mut symbol = String::new();
        match first {
            b'A'..=b'Z' => {
                symbol.push(first as char);
                if let Some(second @ b'a'..=b'z') = self.peek() {
                    let two = format!("{}{}", first as char, second as char);
                    if element::by_symbol(&two).is_some() {
                        symbol = two;
                        self.pos += 1;
                    }
                }
            }
            b'a'..=b'z' => {
                aromatic = true;
                symbol.push((first as char).to_ascii_uppercase());
                // Lowercase two-letter aromatic form (se).
                if first == b's' && self.peek() == Some(b'e') {
                    symbol = "Se".to_string();
                    self.pos += 1;
                }
            }
            _ => {
                return Err(ChemError::parse_at(symbol_at, "expected element symbol"));
            }
        }
        let number = element::atomic_number(&symbol).ok_or_else(|| {
            ChemError::parse_at(symbol_at, format!("unknown element symbol '{}'", symbol))
        })?;
        if aromatic && !element::supports_aromatic_form(number) {
            return Err(ChemError::parse_at(
                symbol_at,
                format!("element '{}' has no aromatic form", symbol),
            ));
        }

        // Chirality.
        let mut chirality = Chirality::None;
        if self.peek() == Some(b'@') {
            self.pos += 1;
            if self.peek() == Some(b'@') {
                self.pos += 1;
                chirality = Chirality::Clockwise;
            } else {
                chirality = Chirality::Counterclockwise;
            }
        }

        // Hydrogen count.
        let mut h_count: u8 = 0;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            h_count = 1;
            if let Some(d @ b'0'..=b'9') = self.peek() {
                h_count = d - b'0';
                self.pos += 1;
            }
        }

        // Charge.
        let mut charge: i16 = 0;
        match self.peek() {
            Some(sign @ (b'+' | b'-')) => {
                let unit: i16 = if sign == b'+' { 1 } else { -1 };
                self.pos += 1;
                if let Some(d @ b'1'..=b'9') = self.peek() {
                    charge = unit * (d - b'0') as i16;
                    self.pos += 1;
                } else {
                    charge = unit;
                    while self.peek() == Some(sign) {
                        charge += unit;
                        self.pos += 1;
                    }
                }
            }
            _ => {}
        }
        if charge.abs() > 15 {
            return Err(ChemError::parse_at(open_at, "charge out of range"));
        }

        // Atom-map class, parsed and discarded.
        if self.peek() == Some(b':') {
            self.pos += 1;
            let mut saw_digit = false;
            while let Some(b'0'..=b'9') = self.peek() {
                self.pos += 1;
                saw_digit = true;
            }
            if !saw_digit {
                return Err(ChemError::parse_at(open_at, "':' needs a map number"));
            }
        }

        if self.bump() != Some(b']') {
            return Err(ChemError::parse_at(open_at, "unterminated bracket atom"));
        }

        let mut atom = Atom::of_element(number);
        atom.is_aromatic = aromatic;
        atom.isotope = isotope.filter(|i| *i > 0);
        atom.formal_charge = charge as i8;
        atom.implicit_hydrogens = h_count;
        atom.chirality = chirality;
        let written_h = h_count == 1 && chirality != Chirality::None;
        self.push_atom(atom, true, written_h)
    }

    /// Validate closure state, fill implicit hydrogens, normalize tags.
    fn finish(mut self) -> Result<Molecule, ChemError> {
        if let Some((_, entry)) = self.ring_map.iter().next() {
            return Err(ChemError::parse_at(entry.position, "unclosed ring bond"));
        }
        if !self.branch_stack.is_empty() {
            return Err(ChemError::parse_at(self.pos, "unclosed branch"));
        }
        if self.pending_order.is_some() {
            return Err(ChemError::parse_at(self.pending_pos, "dangling bond symbol"));
        }

        self.assign_implicit_hydrogens();
        self.normalize_chirality();

        Ok(Molecule::new(self.atoms, self.bonds))
    }

    /// Implicit hydrogens for organic-subset atoms; bracket atoms keep
    /// their written count.
    fn assign_implicit_hydrogens(&mut self) {
        let mut order_sums = vec![0f64; self.atoms.len()];
        let mut degrees = vec![0usize; self.atoms.len()];
        for bond in &self.bonds {
            order_sums[bond.atom1] += bond.order.as_f64();
            order_sums[bond.atom2] += bond.order.as_f64();
            degrees[bond.atom1] += 1;
            degrees[bond.atom2] += 1;
        }
        for (idx, atom) in self.atoms.iter_mut().enumerate() {
            if self.from_bracket[idx] {
                continue;
            }
            let ladder = element::default_valences(atom.atomic_number);
            if ladder.is_empty() {
                continue;
            }
            let hydrogens = if atom.is_aromatic {
                // The delocalized system contributes one extra order unit.
                let target = ladder[0] as i32;
                target - 1 - degrees[idx] as i32
            } else {
                let total = order_sums[idx].round() as i32;
                let target = ladder
                    .iter()
                    .map(|&v| v as i32)
                    .find(|&v| v >= total)
                    .unwrap_or(total);
                target - total
            };
            atom.implicit_hydrogens = hydrogens.max(0) as u8;
        }
    }

    /// Reduce as-written tags to the reference frame (ascending neighbor
    /// index, implicit hydrogen last).
    fn normalize_chirality(&mut self) {
        for idx in 0..self.atoms.len() {
            if self.atoms[idx].chirality == Chirality::None {
                continue;
            }
            let written: Vec<usize> = self.written_order[idx]
                .iter()
                .filter_map(|slot| match slot {
                    Slot::Resolved(n) => Some(*n),
                    Slot::ImplicitH => Some(usize::MAX),
                    Slot::PendingRing(_) => None,
                })
                .collect();
            if written.len() != 4 {
                // Not a plain tetrahedral center; drop the tag.
                self.atoms[idx].chirality = Chirality::None;
                continue;
            }
            if permutation_parity_to_sorted(&written) {
                self.atoms[idx].chirality = self.atoms[idx].chirality.inverted();
            }
        }
    }
}

/// Whether sorting `values` ascending is an odd permutation.
pub(crate) fn permutation_parity_to_sorted(values: &[usize]) -> bool {
    let mut work: Vec<usize> = values.to_vec();
    let mut swaps = 0usize;
    for i in 0..work.len() {
        let mut min_at = i;
        for j in (i + 1)..work.len() {
            if work[j] < work[min_at] {
                min_at = j;
            }
        }
        if min_at != i {
            work.swap(i, min_at);
            swaps += 1;
        }
    }
    swaps % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atom(0).implicit_hydrogens, 3);
        assert_eq!(mol.atom(1).implicit_hydrogens, 2);
        assert_eq!(mol.atom(2).implicit_hydrogens, 1);
        assert_eq!(mol.total_hydrogen_count(), 6);
    }

    #[test]
    fn parses_caffeine_atom_counts() {
        let mol = parse_smiles("CN1C(=O)C2=C(N=CN2C)N(C)C1=O").unwrap();
        assert_eq!(mol.heavy_atom_count(), 14);
        assert_eq!(mol.total_hydrogen_count(), 10);
        assert_eq!(mol.net_charge(), 0);
    }

    #[test]
    fn aromatic_ring_hydrogens() {
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert!(benzene.atoms().iter().all(|a| a.is_aromatic));
        assert!(benzene.atoms().iter().all(|a| a.implicit_hydrogens == 1));
        assert!(benzene.bonds().iter().all(|b| b.order == BondOrder::Aromatic));

        let pyridine = parse_smiles("c1ccncc1").unwrap();
        let nitrogen = pyridine.atoms().iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(nitrogen.implicit_hydrogens, 0);

        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        let nitrogen = pyrrole.atoms().iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(nitrogen.implicit_hydrogens, 1);
    }

    #[test]
    fn bracket_atoms_carry_details() {
        let mol = parse_smiles("[13CH4]").unwrap();
        assert_eq!(mol.atom(0).isotope, Some(13));
        assert_eq!(mol.atom(0).implicit_hydrogens, 4);

        let charged = parse_smiles("[NH4+]").unwrap();
        assert_eq!(charged.atom(0).formal_charge, 1);
        assert_eq!(charged.atom(0).implicit_hydrogens, 4);

        let doubly = parse_smiles("[Ca+2]").unwrap();
        assert_eq!(doubly.atom(0).formal_charge, 2);
        let stacked = parse_smiles("[O--]").unwrap();
        assert_eq!(stacked.atom(0).formal_charge, -2);
    }

    #[test]
    fn dot_separates_fragments() {
        let salt = parse_smiles("CC(=O)[O-].[Na+]").unwrap();
        assert_eq!(salt.components().len(), 2);
        assert_eq!(salt.net_charge(), 0);
    }

    #[test]
    fn percent_ring_numbers() {
        let mol = parse_smiles("C%12CCCCC%12").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bond_between(0, 5).is_some());
    }

    #[test]
    fn ring_bond_order_can_sit_on_either_side() {
        let a = parse_smiles("C=1CCCCC=1").unwrap();
        let b = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(a.bond(a.bond_between(0, 5).unwrap()).order, BondOrder::Double);
        assert_eq!(b.bond(b.bond_between(0, 5).unwrap()).order, BondOrder::Double);
        assert!(parse_smiles("C=1CCCCC#1").is_err());
    }

    #[test]
    fn directional_bonds_are_recorded() {
        let mol = parse_smiles("F/C=C/F").unwrap();
        let first = mol.bond(mol.bond_between(0, 1).unwrap());
        assert_eq!(first.stereo, BondStereo::Up);
        assert_eq!(first.order, BondOrder::Single);
        let last = mol.bond(mol.bond_between(2, 3).unwrap());
        assert_eq!(last.stereo, BondStereo::Up);
    }

    #[test]
    fn chirality_normalizes_across_writings() {
        // The same stereocenter written with the hydrogen in different
        // slots must normalize to the same tag.
        let mid = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        let first = parse_smiles("[C@@H](N)(C)C(=O)O").unwrap();
        let tag_mid = mid.atom(1).chirality;
        let tag_first = first.atom(0).chirality;
        assert!(tag_mid.is_set());
        assert!(tag_first.is_set());
        // mid: written [N, H, C, C] -> even permutation to sorted.
        // first: written [H, N, C, C] -> odd (H moves past three).
        assert_eq!(tag_mid, Chirality::Clockwise);
        assert_eq!(tag_first, Chirality::Counterclockwise);
    }

    #[test]
    fn non_tetrahedral_tags_are_dropped() {
        let mol = parse_smiles("[C@H](C)C").unwrap();
        assert_eq!(mol.atom(0).chirality, Chirality::None);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles("   ").is_err());
        assert!(parse_smiles("C1CC").is_err());
        assert!(parse_smiles("C(C").is_err());
        assert!(parse_smiles("C)C").is_err());
        assert!(parse_smiles("C=").is_err());
        assert!(parse_smiles("=C").is_err());
        assert!(parse_smiles("C..C").is_err());
        assert!(parse_smiles("[Xx]").is_err());
        assert!(parse_smiles("[C").is_err());
        assert!(parse_smiles("C%1").is_err());
        assert!(parse_smiles("Cq").is_err());
        assert!(parse_smiles("C C").is_err());
        assert!(parse_smiles("C11").is_err());
    }

    #[test]
    fn error_positions_point_at_the_token() {
        match parse_smiles("CC(C") {
            Err(ChemError::Parse { position, .. }) => assert_eq!(position, 4),
            other => panic!("expected parse error, got {:?}", other),
        }
        match parse_smiles("C[Zz]C") {
            Err(ChemError::Parse { position, .. }) => assert_eq!(position, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn parity_helper() {
        assert!(!permutation_parity_to_sorted(&[1, 2, 3, 4]));
        assert!(permutation_parity_to_sorted(&[2, 1, 3, 4]));
        assert!(!permutation_parity_to_sorted(&[2, 3, 1, 4]));
        assert!(permutation_parity_to_sorted(&[4, 3, 2, 1]));
    }
}
