//! V2000 connection-table reading and writing.
//!
//! The reader accepts the common dialect: three header lines, a counts line,
//! fixed-width atom and bond blocks, and `M  CHG` / `M  ISO` property lines
//! (which supersede the legacy atom-block charge column). The writer emits
//! the same dialect with the dimensionality tag (`2D`/`3D`) in the program
//! line, so a round trip preserves everything the graph model carries.

use std::fmt::Write as _;

use crate::error::ChemError;
use crate::types::element;
use crate::types::{Atom, Bond, BondOrder, BondStereo, Conformer, Dimensionality, Molecule};

/// Parse a V2000 molblock into a molecule and its coordinates.
///
/// Error positions are byte offsets of the offending line within `text`.
pub fn parse_molblock(text: &str) -> Result<(Molecule, Conformer), ChemError> {
    // Track (byte offset, content) per line so errors can point at them.
    let mut lines: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0usize;
    for line in text.split('\n') {
        lines.push((offset, line.trim_end_matches('\r')));
        offset += line.len() + 1;
    }

    if lines.len() < 4 {
        return Err(ChemError::parse_at(0, "molblock shorter than header"));
    }

    let name = lines[0].1.trim().to_string();
    let program_line = lines[1].1;

    let (counts_at, counts_line) = lines[3];
    if counts_line.len() < 6 {
        return Err(ChemError::parse_at(counts_at, "counts line too short"));
    }
    let atom_total: usize = counts_line[0..3]
        .trim()
        .parse()
        .map_err(|_| ChemError::parse_at(counts_at, "invalid atom count"))?;
    let bond_total: usize = counts_line[3..6]
        .trim()
        .parse()
        .map_err(|_| ChemError::parse_at(counts_at, "invalid bond count"))?;

    let atom_start = 4;
    let bond_start = atom_start + atom_total;
    if lines.len() < bond_start + bond_total {
        return Err(ChemError::parse_at(
            lines[lines.len() - 1].0,
            "molblock truncated before bond block",
        ));
    }

    let mut atoms = Vec::with_capacity(atom_total);
    let mut coords = Vec::with_capacity(atom_total);
    for &(at, line) in &lines[atom_start..atom_start + atom_total] {
        let (atom, position) = parse_atom_line(at, line)?;
        atoms.push(atom);
        coords.push(position);
    }

    let mut bonds = Vec::with_capacity(bond_total);
    for &(at, line) in &lines[bond_start..bond_start + bond_total] {
        bonds.push(parse_bond_line(at, line, atom_total)?);
    }

    // Property block. The first M  CHG (or M  ISO) line supersedes every
    // legacy atom-block value of its kind.
    let mut charges_reset = false;
    let mut isotopes_reset = false;
    for &(at, line) in &lines[bond_start + bond_total..] {
        if line.starts_with("M  END") {
            break;
        }
        if line.starts_with("M  CHG") {
            if !charges_reset {
                for atom in &mut atoms {
                    atom.formal_charge = 0;
                }
                charges_reset = true;
            }
            for (idx, value) in parse_property_pairs(at, line, atoms.len())? {
                atoms[idx].formal_charge = value as i8;
            }
        } else if line.starts_with("M  ISO") {
            if !isotopes_reset {
                for atom in &mut atoms {
                    atom.isotope = None;
                }
                isotopes_reset = true;
            }
            for (idx, value) in parse_property_pairs(at, line, atoms.len())? {
                atoms[idx].isotope = if value > 0 { Some(value as u16) } else { None };
            }
        }
    }

    mark_aromatic_atoms(&mut atoms, &bonds);
    assign_implicit_hydrogens(&mut atoms, &bonds);

    let kind = dimensionality_of(program_line, &coords);
    let conformer = match kind {
        Dimensionality::TwoD => {
            Conformer::planar(coords.iter().map(|p| [p[0], p[1]]).collect())
        }
        Dimensionality::ThreeD => Conformer::spatial(coords),
    };

    Ok((Molecule::new(atoms, bonds).with_name(name), conformer))
}

/// Serialize a molecule with coordinates as a V2000 molblock.
///
/// The program line carries the conformer's dimensionality tag. `M  CHG`
/// and `M  ISO` lines are emitted only when an atom carries a nonzero
/// charge or an explicit isotope.
pub fn write_molblock(mol: &Molecule, conformer: &Conformer) -> String {
    let tag = match conformer.kind() {
        Dimensionality::TwoD => "2D",
        Dimensionality::ThreeD => "3D",
    };

    let mut out = String::new();
    out.push_str(&mol.name);
    out.push('\n');
    let _ = writeln!(out, "  Pipeline          {}", tag);
    out.push('\n');
    let _ = writeln!(
        out,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        mol.atom_count(),
        mol.bond_count()
    );

    for (idx, atom) in mol.atoms().iter().enumerate() {
        let p = if idx < conformer.len() {
            conformer.position(idx)
        } else {
            [0.0, 0.0, 0.0]
        };
        let _ = writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            p[0],
            p[1],
            p[2],
            atom.symbol()
        );
    }

    for bond in mol.bonds() {
        let stereo_code = match bond.stereo {
            BondStereo::WedgeUp => 1,
            BondStereo::WedgeDown => 6,
            _ => 0,
        };
        let _ = writeln!(
            out,
            "{:>3}{:>3}{:>3}{:>3}",
            bond.atom1 + 1,
            bond.atom2 + 1,
            bond.order.ctab_code(),
            stereo_code
        );
    }

    let charged: Vec<(usize, i32)> = mol
        .atoms()
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .map(|(i, a)| (i, a.formal_charge as i32))
        .collect();
    write_property_lines(&mut out, "CHG", &charged);

    let isotopic: Vec<(usize, i32)> = mol
        .atoms()
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.isotope.map(|m| (i, m as i32)))
        .collect();
    write_property_lines(&mut out, "ISO", &isotopic);

    out.push_str("M  END\n");
    out
}

/// Atom line: x(0..10) y(10..20) z(20..30) gap symbol(31..34), then the
/// legacy charge code at 36..39.
fn parse_atom_line(at: usize, line: &str) -> Result<(Atom, [f64; 3]), ChemError> {
    if line.len() < 34 {
        return Err(ChemError::parse_at(at, "atom line too short"));
    }
    let x = parse_coord(at, &line[0..10])?;
    let y = parse_coord(at, &line[10..20])?;
    let z = parse_coord(at, &line[20..30])?;

    let symbol = line[31..34].trim();
    let number = element::atomic_number(symbol).ok_or_else(|| {
        ChemError::parse_at(at, format!("unknown element symbol '{}'", symbol))
    })?;

    let mut atom = Atom::of_element(number);
    if line.len() >= 39 {
        atom.formal_charge = match line[36..39].trim().parse::<u8>() {
            Ok(1) => 3,
            Ok(2) => 2,
            Ok(3) => 1,
            Ok(5) => -1,
            Ok(6) => -2,
            Ok(7) => -3,
            _ => 0,
        };
    }

    Ok((atom, [x, y, z]))
}

fn parse_coord(at: usize, field: &str) -> Result<f64, ChemError> {
    field
        .trim()
        .parse()
        .map_err(|_| ChemError::parse_at(at, format!("invalid coordinate '{}'", field.trim())))
}

/// Bond line: atom1(0..3) atom2(3..6) type(6..9) stereo(9..12), 1-based.
fn parse_bond_line(at: usize, line: &str, atom_total: usize) -> Result<Bond, ChemError> {
    if line.len() < 9 {
        return Err(ChemError::parse_at(at, "bond line too short"));
    }
    let a1: usize = line[0..3]
        .trim()
        .parse()
        .map_err(|_| ChemError::parse_at(at, "invalid bond endpoint"))?;
    let a2: usize = line[3..6]
        .trim()
        .parse()
        .map_err(|_| ChemError::parse_at(at, "invalid bond endpoint"))?;
    let type_code: u8 = line[6..9]
        .trim()
        .parse()
        .map_err(|_| ChemError::parse_at(at, "invalid bond type"))?;

    if a1 == 0 || a2 == 0 || a1 > atom_total || a2 > atom_total {
        return Err(ChemError::parse_at(at, "bond endpoint out of range"));
    }
    if a1 == a2 {
        return Err(ChemError::parse_at(at, "bond joins an atom to itself"));
    }
    let order = BondOrder::from_ctab_code(type_code)
        .ok_or_else(|| ChemError::parse_at(at, format!("unsupported bond type {}", type_code)))?;

    let mut bond = Bond::new(a1 - 1, a2 - 1, order);
    if line.len() >= 12 {
        bond.stereo = match line[9..12].trim().parse::<u8>() {
            Ok(1) => BondStereo::WedgeUp,
            Ok(6) => BondStereo::WedgeDown,
            _ => BondStereo::None,
        };
    }
    Ok(bond)
}

/// `M  XXX  n aaa vvv aaa vvv ...` pairs with 1-based atom indices.
fn parse_property_pairs(
    at: usize,
    line: &str,
    atom_total: usize,
) -> Result<Vec<(usize, i32)>, ChemError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(ChemError::parse_at(at, "property line too short"));
    }
    let pair_count: usize = fields[2]
        .parse()
        .map_err(|_| ChemError::parse_at(at, "invalid property pair count"))?;

    let mut pairs = Vec::with_capacity(pair_count);
    for i in 0..pair_count {
        let idx_field = fields
            .get(3 + i * 2)
            .ok_or_else(|| ChemError::parse_at(at, "property line truncated"))?;
        let value_field = fields
            .get(4 + i * 2)
            .ok_or_else(|| ChemError::parse_at(at, "property line truncated"))?;
        let idx: usize = idx_field
            .parse()
            .map_err(|_| ChemError::parse_at(at, "invalid property atom index"))?;
        let value: i32 = value_field
            .parse()
            .map_err(|_| ChemError::parse_at(at, "invalid property value"))?;
        if idx == 0 || idx > atom_total {
            return Err(ChemError::parse_at(at, "property atom index out of range"));
        }
        pairs.push((idx - 1, value));
    }
    Ok(pairs)
}

/// Eight pairs per line, matching the V2000 limit.
fn write_property_lines(out: &mut String, key: &str, pairs: &[(usize, i32)]) {
    for chunk in pairs.chunks(8) {
        let _ = write!(out, "M  {}{:>3}", key, chunk.len());
        for &(idx, value) in chunk {
            let _ = write!(out, "{:>4}{:>4}", idx + 1, value);
        }
        out.push('\n');
    }
}

/// Atoms on type-4 bonds are aromatic; the counts line does not say so.
fn mark_aromatic_atoms(atoms: &mut [Atom], bonds: &[Bond]) {
    for bond in bonds {
        if bond.order == BondOrder::Aromatic {
            atoms[bond.atom1].is_aromatic = true;
            atoms[bond.atom2].is_aromatic = true;
        }
    }
}

/// Connection tables carry no hydrogen counts; fill them from the default
/// valence ladder the same way the line-notation parser does.
fn assign_implicit_hydrogens(atoms: &mut [Atom], bonds: &[Bond]) {
    let mut order_sums = vec![0f64; atoms.len()];
    let mut degrees = vec![0usize; atoms.len()];
    for bond in bonds {
        order_sums[bond.atom1] += bond.order.as_f64();
        order_sums[bond.atom2] += bond.order.as_f64();
        degrees[bond.atom1] += 1;
        degrees[bond.atom2] += 1;
    }
    for (idx, atom) in atoms.iter_mut().enumerate() {
        let ladder = element::default_valences(atom.atomic_number);
        if ladder.is_empty() {
            continue;
        }
        // Charge shifts the valence target: heteroatoms by the signed
        // charge, carbon down by its magnitude.
        let correction = if atom.atomic_number == 6 {
            -(atom.formal_charge.abs() as i32)
        } else {
            atom.formal_charge as i32
        };
        let hydrogens = if atom.is_aromatic {
            let target = ladder[0] as i32 + correction;
            target - 1 - degrees[idx] as i32
        } else {
            let total = order_sums[idx].round() as i32;
            let target = ladder
                .iter()
                .map(|&v| v as i32 + correction)
                .find(|&v| v >= total)
                .unwrap_or(total);
            target - total
        };
        atom.implicit_hydrogens = hydrogens.max(0) as u8;
    }
}

fn dimensionality_of(program_line: &str, coords: &[[f64; 3]]) -> Dimensionality {
    if program_line.contains("3D") {
        return Dimensionality::ThreeD;
    }
    if program_line.contains("2D") {
        return Dimensionality::TwoD;
    }
    if coords.iter().any(|p| p[2].abs() > 1e-4) {
        Dimensionality::ThreeD
    } else {
        Dimensionality::TwoD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHANOL_2D: &str = "\
ethanol
  Pipeline          2D

  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.2500    1.2990    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
";

    #[test]
    fn reads_basic_block() {
        let (mol, conformer) = parse_molblock(ETHANOL_2D).unwrap();
        assert_eq!(mol.name, "ethanol");
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(conformer.kind(), Dimensionality::TwoD);
        assert_eq!(mol.atom(0).implicit_hydrogens, 3);
        assert_eq!(mol.atom(2).implicit_hydrogens, 1);
        assert!((conformer.position(1)[0] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn charge_property_supersedes_legacy_column() {
        let block = "\
nitrate-ish
  Pipeline          2D

  2  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 N   0  3  0  0  0  0  0  0  0  0  0  0
    1.2000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
M  CHG  2   1   1   2  -1
M  END
";
        let (mol, _) = parse_molblock(block).unwrap();
        assert_eq!(mol.atom(0).formal_charge, 1);
        assert_eq!(mol.atom(1).formal_charge, -1);
    }

    #[test]
    fn isotope_property_round_trips() {
        let mut atom = Atom::of_element(6);
        atom.isotope = Some(13);
        atom.implicit_hydrogens = 4;
        let mol = Molecule::new(vec![atom], vec![]).with_name("c13");
        let conformer = Conformer::planar(vec![[0.0, 0.0]]);

        let block = write_molblock(&mol, &conformer);
        assert!(block.contains("M  ISO  1   1  13"));

        let (back, _) = parse_molblock(&block).unwrap();
        assert_eq!(back.atom(0).isotope, Some(13));
    }

    #[test]
    fn writer_emits_dimension_tag_and_counts() {
        let (mol, conformer) = parse_molblock(ETHANOL_2D).unwrap();
        let block = write_molblock(&mol, &conformer);
        let lines: Vec<&str> = block.lines().collect();
        assert!(lines[1].contains("2D"));
        assert!(lines[3].starts_with("  3  2"));
        assert!(lines[3].contains("V2000"));
        assert!(block.ends_with("M  END\n"));

        let spatial = Conformer::spatial(vec![[0.0, 0.0, 0.5]; 3]);
        let block3d = write_molblock(&mol, &spatial);
        assert!(block3d.lines().nth(1).unwrap().contains("3D"));
    }

    #[test]
    fn charge_lines_chunk_by_eight() {
        let mut atoms = Vec::new();
        for _ in 0..9 {
            let mut a = Atom::of_element(8);
            a.formal_charge = -1;
            atoms.push(a);
        }
        let mol = Molecule::new(atoms, vec![]);
        let conformer = Conformer::planar(vec![[0.0, 0.0]; 9]);
        let block = write_molblock(&mol, &conformer);
        let chg_lines: Vec<&str> = block.lines().filter(|l| l.starts_with("M  CHG")).collect();
        assert_eq!(chg_lines.len(), 2);
        assert!(chg_lines[0].starts_with("M  CHG  8"));
        assert!(chg_lines[1].starts_with("M  CHG  1"));
    }

    #[test]
    fn truncated_block_fails_with_position() {
        let err = parse_molblock("name\nprog\ncomment\n  2  1").unwrap_err();
        match err {
            ChemError::Parse { .. } => {}
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn rejects_out_of_range_bond() {
        let block = "\
bad
  Pipeline          2D

  1  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
  1  9  1  0
M  END
";
        assert!(parse_molblock(block).is_err());
    }

    #[test]
    fn wedge_codes_survive_round_trip() {
        let mut atoms = vec![Atom::of_element(6), Atom::of_element(6)];
        atoms[0].implicit_hydrogens = 3;
        atoms[1].implicit_hydrogens = 3;
        let mut bond = Bond::new(0, 1, BondOrder::Single);
        bond.stereo = BondStereo::WedgeDown;
        let mol = Molecule::new(atoms, vec![bond]);
        let conformer = Conformer::planar(vec![[0.0, 0.0], [1.5, 0.0]]);

        let block = write_molblock(&mol, &conformer);
        let (back, _) = parse_molblock(&block).unwrap();
        assert_eq!(back.bond(0).stereo, BondStereo::WedgeDown);
    }
}
