//! The canonical output bundle.

use serde::{Deserialize, Serialize};

/// Everything derived from one canonical atom ranking.
///
/// All fields come from the same ranking over the same standardized graph,
/// so they agree with each other by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalForm {
    /// Canonical SMILES with stereo descriptors.
    pub canonical_smiles: String,
    /// Canonical V2000 connection table with 2D coordinates.
    pub molblock: String,
    /// Layered structure identifier.
    pub identifier: String,
    /// Fixed-length hashed key derived from the identifier.
    pub identifier_key: String,
    /// Murcko framework as canonical SMILES; absent for acyclic molecules.
    pub scaffold_smiles: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_all_layers() {
        let form = CanonicalForm {
            canonical_smiles: "CCO".to_string(),
            molblock: "...".to_string(),
            identifier: "XID=1/C2H6O/c1-2-3/h3H,2H2,1H3".to_string(),
            identifier_key: "ABCDEFGHIJKLMN-OPQRSTUVWX-N".to_string(),
            scaffold_smiles: None,
        };
        let json = serde_json::to_string(&form).unwrap();
        assert!(json.contains("\"canonical_smiles\":\"CCO\""));
        assert!(json.contains("\"scaffold_smiles\":null"));
    }
}
