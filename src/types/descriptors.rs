//! Physicochemical descriptor record.

use serde::{Deserialize, Serialize};

/// The fixed 17-descriptor record computed for every molecule.
///
/// Field order is the wire order and never changes; downstream consumers
/// index into it positionally. Rounding is applied at construction time:
/// masses, logP, and polar surface area to 2 decimals, fraction sp3 to 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorVector {
    /// All atoms, implicit hydrogens included.
    pub atom_count: u32,
    /// Atoms heavier than hydrogen.
    pub heavy_atom_count: u32,
    /// Average molecular weight (g/mol).
    pub molecular_weight: f64,
    /// Monoisotopic mass (Da).
    pub exact_molecular_weight: f64,
    /// Atom-contribution octanol/water partition estimate.
    pub alogp: f64,
    /// Rotatable single bonds outside rings, both ends non-terminal.
    pub rotatable_bond_count: u32,
    /// Topological polar surface area (A^2).
    pub topological_polar_surface_area: f64,
    /// Hydrogen-bond acceptors (permissive N/O count, amides excluded).
    pub hydrogen_bond_acceptors: u32,
    /// Hydrogen-bond donors (N-H and O-H groups).
    pub hydrogen_bond_donors: u32,
    /// Lipinski acceptor count: every N and O.
    pub hydrogen_bond_acceptors_lipinski: u32,
    /// Lipinski donor count: every N-H and O-H hydrogen.
    pub hydrogen_bond_donors_lipinski: u32,
    /// Rule-of-five violations, 0..=4.
    pub lipinski_violations: u32,
    /// Aromatic ring count (SSSR rings that are fully aromatic).
    pub aromatic_rings: u32,
    /// Weighted drug-likeness composite in [0, 1].
    pub qed_weighted: f64,
    /// Net formal charge.
    pub formal_charge: i32,
    /// Fraction of sp3-hybridized carbons.
    pub fraction_csp3: f64,
    /// SSSR ring count.
    pub ring_count: u32,
}

/// Round to two decimal places, the wire precision for masses and logP.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimal places, the wire precision for fractions.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_rules() {
        assert_eq!(round2(194.19099), 194.19);
        assert_eq!(round2(-0.314), -0.31);
        assert_eq!(round3(0.33333), 0.333);
        assert_eq!(round3(1.0), 1.0);
    }

    #[test]
    fn serializes_in_declaration_order() {
        let v = DescriptorVector {
            atom_count: 5,
            heavy_atom_count: 2,
            molecular_weight: 46.07,
            exact_molecular_weight: 46.04,
            alogp: -0.31,
            rotatable_bond_count: 0,
            topological_polar_surface_area: 20.23,
            hydrogen_bond_acceptors: 1,
            hydrogen_bond_donors: 1,
            hydrogen_bond_acceptors_lipinski: 1,
            hydrogen_bond_donors_lipinski: 1,
            lipinski_violations: 0,
            aromatic_rings: 0,
            qed_weighted: 0.41,
            formal_charge: 0,
            fraction_csp3: 1.0,
            ring_count: 0,
        };
        let json = serde_json::to_string(&v).unwrap();
        let atom_pos = json.find("atom_count").unwrap();
        let ring_pos = json.find("ring_count").unwrap();
        assert!(atom_pos < ring_pos);
        let back: DescriptorVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
