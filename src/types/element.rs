//! Element data tables.
//!
//! Fixed tables for the elements the pipeline accepts: symbol lookup in both
//! directions, average and monoisotopic masses, covalent and van der Waals
//! radii, and the default valence ladders used for implicit-hydrogen
//! assignment. Unknown symbols are rejected at parse time, so every lookup
//! by atomic number inside the crate is over a known row.

/// One row of the element table.
#[derive(Debug, Clone, Copy)]
pub struct ElementRow {
    /// Atomic number.
    pub number: u8,
    /// IUPAC symbol.
    pub symbol: &'static str,
    /// Standard atomic weight (g/mol).
    pub average_mass: f64,
    /// Mass of the most abundant isotope (Da).
    pub monoisotopic_mass: f64,
    /// Covalent radius (Angstrom, Cordero values).
    pub covalent_radius: f64,
    /// van der Waals radius (Angstrom, Bondi values where published).
    pub vdw_radius: f64,
}

static ELEMENTS: &[ElementRow] = &[
    ElementRow { number: 1, symbol: "H", average_mass: 1.008, monoisotopic_mass: 1.007825, covalent_radius: 0.31, vdw_radius: 1.20 },
    ElementRow { number: 2, symbol: "He", average_mass: 4.0026, monoisotopic_mass: 4.002603, covalent_radius: 0.28, vdw_radius: 1.40 },
    ElementRow { number: 3, symbol: "Li", average_mass: 6.94, monoisotopic_mass: 7.016005, covalent_radius: 1.28, vdw_radius: 1.82 },
    ElementRow { number: 4, symbol: "Be", average_mass: 9.0122, monoisotopic_mass: 9.012182, covalent_radius: 0.96, vdw_radius: 1.53 },
    ElementRow { number: 5, symbol: "B", average_mass: 10.811, monoisotopic_mass: 11.009305, covalent_radius: 0.84, vdw_radius: 1.92 },
    ElementRow { number: 6, symbol: "C", average_mass: 12.011, monoisotopic_mass: 12.0, covalent_radius: 0.76, vdw_radius: 1.70 },
    ElementRow { number: 7, symbol: "N", average_mass: 14.007, monoisotopic_mass: 14.003074, covalent_radius: 0.71, vdw_radius: 1.55 },
    ElementRow { number: 8, symbol: "O", average_mass: 15.999, monoisotopic_mass: 15.994915, covalent_radius: 0.66, vdw_radius: 1.52 },
    ElementRow { number: 9, symbol: "F", average_mass: 18.998, monoisotopic_mass: 18.998403, covalent_radius: 0.57, vdw_radius: 1.47 },
    ElementRow { number: 10, symbol: "Ne", average_mass: 20.180, monoisotopic_mass: 19.992440, covalent_radius: 0.58, vdw_radius: 1.54 },
    ElementRow { number: 11, symbol: "Na", average_mass: 22.990, monoisotopic_mass: 22.989769, covalent_radius: 1.66, vdw_radius: 2.27 },
    ElementRow { number: 12, symbol: "Mg", average_mass: 24.305, monoisotopic_mass: 23.985042, covalent_radius: 1.41, vdw_radius: 1.73 },
    ElementRow { number: 13, symbol: "Al", average_mass: 26.982, monoisotopic_mass: 26.981539, covalent_radius: 1.21, vdw_radius: 1.84 },
    ElementRow { number: 14, symbol: "Si", average_mass: 28.085, monoisotopic_mass: 27.976927, covalent_radius: 1.11, vdw_radius: 2.10 },
    ElementRow { number: 15, symbol: "P", average_mass: 30.974, monoisotopic_mass: 30.973762, covalent_radius: 1.07, vdw_radius: 1.80 },
    ElementRow { number: 16, symbol: "S", average_mass: 32.06, monoisotopic_mass: 31.972071, covalent_radius: 1.05, vdw_radius: 1.80 },
    ElementRow { number: 17, symbol: "Cl", average_mass: 35.45, monoisotopic_mass: 34.968853, covalent_radius: 1.02, vdw_radius: 1.75 },
    ElementRow { number: 18, symbol: "Ar", average_mass: 39.948, monoisotopic_mass: 39.962383, covalent_radius: 1.06, vdw_radius: 1.88 },
    ElementRow { number: 19, symbol: "K", average_mass: 39.098, monoisotopic_mass: 38.963707, covalent_radius: 2.03, vdw_radius: 2.75 },
    ElementRow { number: 20, symbol: "Ca", average_mass: 40.078, monoisotopic_mass: 39.962591, covalent_radius: 1.76, vdw_radius: 2.31 },
    ElementRow { number: 22, symbol: "Ti", average_mass: 47.867, monoisotopic_mass: 47.947946, covalent_radius: 1.60, vdw_radius: 2.15 },
    ElementRow { number: 24, symbol: "Cr", average_mass: 51.996, monoisotopic_mass: 51.940508, covalent_radius: 1.39, vdw_radius: 2.05 },
    ElementRow { number: 25, symbol: "Mn", average_mass: 54.938, monoisotopic_mass: 54.938045, covalent_radius: 1.39, vdw_radius: 2.05 },
    ElementRow { number: 26, symbol: "Fe", average_mass: 55.845, monoisotopic_mass: 55.934938, covalent_radius: 1.32, vdw_radius: 2.04 },
    ElementRow { number: 27, symbol: "Co", average_mass: 58.933, monoisotopic_mass: 58.933195, covalent_radius: 1.26, vdw_radius: 2.00 },
    ElementRow { number: 28, symbol: "Ni", average_mass: 58.693, monoisotopic_mass: 57.935343, covalent_radius: 1.24, vdw_radius: 1.63 },
    ElementRow { number: 29, symbol: "Cu", average_mass: 63.546, monoisotopic_mass: 62.929598, covalent_radius: 1.32, vdw_radius: 1.40 },
    ElementRow { number: 30, symbol: "Zn", average_mass: 65.38, monoisotopic_mass: 63.929142, covalent_radius: 1.22, vdw_radius: 1.39 },
    ElementRow { number: 33, symbol: "As", average_mass: 74.922, monoisotopic_mass: 74.921597, covalent_radius: 1.19, vdw_radius: 1.85 },
    ElementRow { number: 34, symbol: "Se", average_mass: 78.971, monoisotopic_mass: 79.916521, covalent_radius: 1.20, vdw_radius: 1.90 },
    ElementRow { number: 35, symbol: "Br", average_mass: 79.904, monoisotopic_mass: 78.918337, covalent_radius: 1.20, vdw_radius: 1.85 },
    ElementRow { number: 37, symbol: "Rb", average_mass: 85.468, monoisotopic_mass: 84.911790, covalent_radius: 2.20, vdw_radius: 3.03 },
    ElementRow { number: 38, symbol: "Sr", average_mass: 87.62, monoisotopic_mass: 87.905612, covalent_radius: 1.95, vdw_radius: 2.49 },
    ElementRow { number: 47, symbol: "Ag", average_mass: 107.868, monoisotopic_mass: 106.905097, covalent_radius: 1.45, vdw_radius: 1.72 },
    ElementRow { number: 48, symbol: "Cd", average_mass: 112.414, monoisotopic_mass: 113.903359, covalent_radius: 1.44, vdw_radius: 1.58 },
    ElementRow { number: 50, symbol: "Sn", average_mass: 118.710, monoisotopic_mass: 119.902195, covalent_radius: 1.39, vdw_radius: 2.17 },
    ElementRow { number: 51, symbol: "Sb", average_mass: 121.760, monoisotopic_mass: 120.903816, covalent_radius: 1.39, vdw_radius: 2.06 },
    ElementRow { number: 52, symbol: "Te", average_mass: 127.60, monoisotopic_mass: 129.906224, covalent_radius: 1.38, vdw_radius: 2.06 },
    ElementRow { number: 53, symbol: "I", average_mass: 126.904, monoisotopic_mass: 126.904473, covalent_radius: 1.39, vdw_radius: 1.98 },
    ElementRow { number: 55, symbol: "Cs", average_mass: 132.905, monoisotopic_mass: 132.905452, covalent_radius: 2.44, vdw_radius: 3.43 },
    ElementRow { number: 56, symbol: "Ba", average_mass: 137.327, monoisotopic_mass: 137.905247, covalent_radius: 2.15, vdw_radius: 2.68 },
    ElementRow { number: 78, symbol: "Pt", average_mass: 195.084, monoisotopic_mass: 194.964791, covalent_radius: 1.36, vdw_radius: 1.75 },
    ElementRow { number: 79, symbol: "Au", average_mass: 196.967, monoisotopic_mass: 196.966569, covalent_radius: 1.36, vdw_radius: 1.66 },
    ElementRow { number: 80, symbol: "Hg", average_mass: 200.592, monoisotopic_mass: 201.970643, covalent_radius: 1.32, vdw_radius: 1.55 },
    ElementRow { number: 82, symbol: "Pb", average_mass: 207.2, monoisotopic_mass: 207.976652, covalent_radius: 1.46, vdw_radius: 2.02 },
];

/// Look up an element by symbol. Case-sensitive: `Cl` matches, `CL` does not.
pub fn by_symbol(symbol: &str) -> Option<&'static ElementRow> {
    ELEMENTS.iter().find(|row| row.symbol == symbol)
}

/// Look up an element by atomic number.
pub fn by_number(number: u8) -> Option<&'static ElementRow> {
    ELEMENTS.iter().find(|row| row.number == number)
}

/// Atomic number for a symbol, if the element is in the table.
pub fn atomic_number(symbol: &str) -> Option<u8> {
    by_symbol(symbol).map(|row| row.number)
}

/// Symbol for an atomic number. Falls back to `*` for numbers outside the
/// table, which never appear in parsed molecules.
pub fn symbol(number: u8) -> &'static str {
    by_number(number).map(|row| row.symbol).unwrap_or("*")
}

/// Standard atomic weight, 0.0 outside the table.
pub fn average_mass(number: u8) -> f64 {
    by_number(number).map(|row| row.average_mass).unwrap_or(0.0)
}

/// Monoisotopic mass, 0.0 outside the table.
pub fn monoisotopic_mass(number: u8) -> f64 {
    by_number(number).map(|row| row.monoisotopic_mass).unwrap_or(0.0)
}

/// Covalent radius in Angstrom, with a generic fallback.
pub fn covalent_radius(number: u8) -> f64 {
    by_number(number).map(|row| row.covalent_radius).unwrap_or(0.75)
}

/// van der Waals radius in Angstrom, with a generic fallback.
pub fn vdw_radius(number: u8) -> f64 {
    by_number(number).map(|row| row.vdw_radius).unwrap_or(1.70)
}

/// Valence ladder for implicit-hydrogen assignment: the allowed bond-order
/// totals, lowest first. Elements without a ladder get no implicit
/// hydrogens.
pub fn default_valences(number: u8) -> &'static [u8] {
    match number {
        5 => &[3],
        6 => &[4],
        7 => &[3, 5],
        8 => &[2],
        15 => &[3, 5],
        16 => &[2, 4, 6],
        9 | 17 | 35 | 53 => &[1],
        _ => &[],
    }
}

/// Whether the element belongs to the SMILES organic subset and may be
/// written without brackets.
pub fn in_organic_subset(number: u8) -> bool {
    matches!(number, 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
}

/// Whether the element may carry the aromatic (lowercase) form in SMILES.
pub fn supports_aromatic_form(number: u8) -> bool {
    matches!(number, 5 | 6 | 7 | 8 | 15 | 16 | 34)
}
