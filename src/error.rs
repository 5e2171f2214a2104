//! Crate-wide error taxonomy.
//!
//! Every fallible pipeline stage reports through [`ChemError`]. The HTTP
//! layer splits the variants into client faults (bad input text, bad option
//! selectors) and internal faults; [`ChemError::is_client_fault`] encodes
//! that split so handlers never re-derive it.

use thiserror::Error;

/// Errors produced by the structure pipeline.
#[derive(Debug, Error)]
pub enum ChemError {
    /// Input text could not be parsed into a molecule. Carries the byte
    /// offset of the offending token within the input.
    #[error("parse error at position {position}: {message}")]
    Parse {
        /// Byte offset of the token that failed.
        position: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Depiction could not be produced.
    #[error("render error: {0}")]
    Render(String),

    /// Force-field refinement stopped at the iteration cap without meeting
    /// the convergence threshold. Callers absorb this: the best coordinates
    /// found so far are still usable.
    #[error("refinement did not converge after {steps} steps (gradient norm {residual:.4})")]
    NonConvergence {
        /// Steps taken before hitting the cap.
        steps: usize,
        /// Gradient norm at the stopping point.
        residual: f64,
    },

    /// A request named a backend, mode, or parameter value the pipeline
    /// does not support.
    #[error("unsupported option: {0}")]
    UnsupportedOption(String),

    /// Sugar removal consumed the whole molecule; there is no aglycone to
    /// return.
    #[error("nothing remains after sugar removal")]
    SugarRemovalEmptyResult,
}

impl ChemError {
    /// Shorthand for a parse failure at a known offset.
    pub fn parse_at(position: usize, message: impl Into<String>) -> Self {
        ChemError::Parse {
            position,
            message: message.into(),
        }
    }

    /// Whether the error is the caller's fault (HTTP 400) rather than an
    /// internal failure (HTTP 500).
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            ChemError::Parse { .. }
                | ChemError::UnsupportedOption(_)
                | ChemError::SugarRemovalEmptyResult
        )
    }

    /// Stable machine-readable code for wire responses.
    pub fn code(&self) -> &'static str {
        match self {
            ChemError::Parse { .. } => "PARSE_ERROR",
            ChemError::Render(_) => "RENDER_ERROR",
            ChemError::NonConvergence { .. } => "NON_CONVERGENCE",
            ChemError::UnsupportedOption(_) => "UNSUPPORTED_OPTION",
            ChemError::SugarRemovalEmptyResult => "SUGAR_REMOVAL_EMPTY",
        }
    }
}

impl From<std::fmt::Error> for ChemError {
    fn from(err: std::fmt::Error) -> Self {
        ChemError::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_fault_split() {
        assert!(ChemError::parse_at(3, "bad ring bond").is_client_fault());
        assert!(ChemError::UnsupportedOption("generator=xyz".into()).is_client_fault());
        assert!(ChemError::SugarRemovalEmptyResult.is_client_fault());
        assert!(!ChemError::Render("empty canvas".into()).is_client_fault());
        assert!(!ChemError::NonConvergence {
            steps: 200,
            residual: 0.9
        }
        .is_client_fault());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ChemError::parse_at(0, "x").code(), "PARSE_ERROR");
        assert_eq!(ChemError::SugarRemovalEmptyResult.code(), "SUGAR_REMOVAL_EMPTY");
    }

    #[test]
    fn parse_error_reports_position() {
        let err = ChemError::parse_at(7, "unknown element symbol 'Xx'");
        assert_eq!(
            err.to_string(),
            "parse error at position 7: unknown element symbol 'Xx'"
        );
    }
}
