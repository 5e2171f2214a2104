//! Sugar classification vocabulary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChemError;

/// Which sugar motif families a molecule contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarClassification {
    /// No recognized sugar motif.
    None,
    /// Only ring (circular) sugar motifs.
    CircularOnly,
    /// Only open-chain (linear) sugar motifs.
    LinearOnly,
    /// Both families present.
    Both,
}

impl SugarClassification {
    /// Fold two detection flags into the classification.
    pub fn from_flags(circular: bool, linear: bool) -> Self {
        match (circular, linear) {
            (true, true) => SugarClassification::Both,
            (true, false) => SugarClassification::CircularOnly,
            (false, true) => SugarClassification::LinearOnly,
            (false, false) => SugarClassification::None,
        }
    }

    /// Whether any circular motif is present.
    pub fn has_circular(self) -> bool {
        matches!(
            self,
            SugarClassification::CircularOnly | SugarClassification::Both
        )
    }

    /// Whether any linear motif is present.
    pub fn has_linear(self) -> bool {
        matches!(
            self,
            SugarClassification::LinearOnly | SugarClassification::Both
        )
    }

    /// The human-readable sentence reported by the info endpoint.
    pub fn message(self) -> &'static str {
        match self {
            SugarClassification::Both => "The molecule contains Linear and Circular sugars",
            SugarClassification::LinearOnly => "The molecule contains only Linear sugar",
            SugarClassification::CircularOnly => "The molecule contains only Circular sugar",
            SugarClassification::None => "The molecule contains no sugar",
        }
    }
}

/// Which motif families a removal pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarRemovalMode {
    /// Remove ring sugars only.
    Circular,
    /// Remove open-chain sugars only.
    Linear,
    /// Remove both families.
    Both,
}

impl SugarRemovalMode {
    /// Whether this mode targets circular motifs.
    pub fn targets_circular(self) -> bool {
        matches!(self, SugarRemovalMode::Circular | SugarRemovalMode::Both)
    }

    /// Whether this mode targets linear motifs.
    pub fn targets_linear(self) -> bool {
        matches!(self, SugarRemovalMode::Linear | SugarRemovalMode::Both)
    }
}

impl FromStr for SugarRemovalMode {
    type Err = ChemError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "circular" => Ok(SugarRemovalMode::Circular),
            "linear" => Ok(SugarRemovalMode::Linear),
            "both" => Ok(SugarRemovalMode::Both),
            other => Err(ChemError::UnsupportedOption(format!(
                "sugar removal mode '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_messages() {
        assert_eq!(
            SugarClassification::Both.message(),
            "The molecule contains Linear and Circular sugars"
        );
        assert_eq!(
            SugarClassification::None.message(),
            "The molecule contains no sugar"
        );
    }

    #[test]
    fn flags_fold() {
        assert_eq!(
            SugarClassification::from_flags(true, false),
            SugarClassification::CircularOnly
        );
        assert!(SugarClassification::Both.has_linear());
        assert!(!SugarClassification::LinearOnly.has_circular());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(
            "circular".parse::<SugarRemovalMode>().unwrap(),
            SugarRemovalMode::Circular
        );
        assert!("rings".parse::<SugarRemovalMode>().is_err());
        assert!(SugarRemovalMode::Both.targets_linear());
        assert!(!SugarRemovalMode::Linear.targets_circular());
    }
}
