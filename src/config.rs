//! Pipeline configuration.
//!
//! Every tunable the pipeline exposes, loaded once from the
//! environment at startup and shared behind an `Arc`. Defaults are
//! safe for development; production overrides come in through the
//! variables listed on [`PipelineConfig::from_env`].

use serde::{Deserialize, Serialize};

use crate::coords::{DEFAULT_EMBED_SEED, DEFAULT_MAX_REFINE_STEPS};
use crate::generate::DEFAULT_HEAVY_ATOM_CEILING;
use crate::stereo::DEFAULT_MAX_STEREO_CENTERS;

/// Runtime settings for the pipeline and its service surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bind address for the HTTP service.
    pub host: String,
    /// Bind port for the HTTP service.
    pub port: u16,
    /// Heavy-atom ceiling for structure generation.
    pub heavy_atom_ceiling: usize,
    /// Cap on unassigned centers expanded during stereoisomer
    /// enumeration.
    pub max_stereo_centers: usize,
    /// Seed for the 3D embedding's deterministic start.
    pub embed_seed: u64,
    /// Refinement step ceiling for the 3D embedding.
    pub embed_max_steps: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            heavy_atom_ceiling: DEFAULT_HEAVY_ATOM_CEILING,
            max_stereo_centers: DEFAULT_MAX_STEREO_CENTERS,
            embed_seed: DEFAULT_EMBED_SEED,
            embed_max_steps: DEFAULT_MAX_REFINE_STEPS,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `HOST`, `PORT`, `HEAVY_ATOM_CEILING`, `MAX_STEREO_CENTERS`,
    /// `EMBED_SEED`, and `EMBED_MAX_STEPS`. Unset or unparseable values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parsed("PORT").unwrap_or(defaults.port),
            heavy_atom_ceiling: env_parsed("HEAVY_ATOM_CEILING")
                .unwrap_or(defaults.heavy_atom_ceiling),
            max_stereo_centers: env_parsed("MAX_STEREO_CENTERS")
                .unwrap_or(defaults.max_stereo_centers),
            embed_seed: env_parsed("EMBED_SEED").unwrap_or(defaults.embed_seed),
            embed_max_steps: env_parsed("EMBED_MAX_STEPS").unwrap_or(defaults.embed_max_steps),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_module_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.heavy_atom_ceiling, DEFAULT_HEAVY_ATOM_CEILING);
        assert_eq!(config.max_stereo_centers, DEFAULT_MAX_STEREO_CENTERS);
        assert_eq!(config.embed_seed, DEFAULT_EMBED_SEED);
        assert_eq!(config.embed_max_steps, DEFAULT_MAX_REFINE_STEPS);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
