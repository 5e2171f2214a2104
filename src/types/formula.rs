//! Molecular formula parsing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex_lite::Regex;

use crate::error::ChemError;
use crate::types::element;

/// A parsed molecular formula: element counts keyed by atomic number.
///
/// Used by the structure generator as the enumeration target and rendered
/// back out in Hill order (C first, H second, the rest alphabetical).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolecularFormula {
    counts: BTreeMap<u8, usize>,
}

impl MolecularFormula {
    /// Build from explicit counts. Zero entries are dropped.
    pub fn from_counts(counts: BTreeMap<u8, usize>) -> Self {
        let counts = counts.into_iter().filter(|(_, n)| *n > 0).collect();
        MolecularFormula { counts }
    }

    /// Count for one element.
    pub fn count(&self, atomic_number: u8) -> usize {
        self.counts.get(&atomic_number).copied().unwrap_or(0)
    }

    /// All element counts.
    pub fn counts(&self) -> &BTreeMap<u8, usize> {
        &self.counts
    }

    /// Atoms heavier than hydrogen.
    pub fn heavy_atom_count(&self) -> usize {
        self.counts
            .iter()
            .filter(|(z, _)| **z != 1)
            .map(|(_, n)| n)
            .sum()
    }

    /// Hydrogen count.
    pub fn hydrogen_count(&self) -> usize {
        self.count(1)
    }

    /// Elements other than hydrogen, in ascending atomic number, one entry
    /// per atom.
    pub fn heavy_atoms(&self) -> Vec<u8> {
        let mut atoms = Vec::new();
        for (&z, &n) in &self.counts {
            if z != 1 {
                atoms.extend(std::iter::repeat(z).take(n));
            }
        }
        atoms
    }
}

impl FromStr for MolecularFormula {
    type Err = ChemError;

    /// Parse `C4H10`-style text. The whole string must be element/count
    /// pairs; anything else is a parse error naming the offset.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChemError::parse_at(0, "empty molecular formula"));
        }
        let token = Regex::new(r"^([A-Z][a-z]?)([0-9]*)").expect("formula token pattern");
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        let mut rest = trimmed;
        let mut offset = 0usize;
        while !rest.is_empty() {
            let caps = token.captures(rest).ok_or_else(|| {
                ChemError::parse_at(offset, format!("unexpected character '{}'", &rest[..1]))
            })?;
            let symbol = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let z = element::atomic_number(symbol).ok_or_else(|| {
                ChemError::parse_at(offset, format!("unknown element symbol '{}'", symbol))
            })?;
            let digits = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let n: usize = if digits.is_empty() {
                1
            } else {
                digits.parse().map_err(|_| {
                    ChemError::parse_at(offset, format!("bad element count '{}'", digits))
                })?
            };
            if n == 0 {
                return Err(ChemError::parse_at(offset, "element count of zero"));
            }
            *counts.entry(z).or_insert(0) += n;
            let consumed = symbol.len() + digits.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        Ok(MolecularFormula::from_counts(counts))
    }
}

impl fmt::Display for MolecularFormula {
    /// Hill order: carbon, hydrogen, everything else alphabetically by
    /// symbol. Without carbon, all elements go alphabetically.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(&'static str, usize)> = Vec::new();
        let has_carbon = self.count(6) > 0;
        if has_carbon {
            entries.push(("C", self.count(6)));
            if self.count(1) > 0 {
                entries.push(("H", self.count(1)));
            }
        }
        let mut rest: Vec<(&'static str, usize)> = self
            .counts
            .iter()
            .filter(|(z, _)| {
                if has_carbon {
                    **z != 6 && **z != 1
                } else {
                    true
                }
            })
            .map(|(&z, &n)| (element::symbol(z), n))
            .collect();
        rest.sort_unstable_by_key(|(sym, _)| *sym);
        entries.extend(rest);
        for (sym, n) in entries {
            if n == 1 {
                write!(f, "{}", sym)?;
            } else {
                write!(f, "{}{}", sym, n)?;
            }
        }
        Ok(())
    }
}
