//! Shared service state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::PipelineConfig;
use crate::generate::{ExhaustiveGenerator, StructureGenerator};
use crate::pipeline::StructurePipeline;

/// Everything the handlers share: the stateless pipeline facade, the
/// structure generator behind its trait seam, and the process start
/// time for uptime reporting.
pub struct ServiceState<G: StructureGenerator + 'static> {
    /// The pipeline facade; stateless, safe to call from any worker.
    pub pipeline: Arc<StructurePipeline>,
    /// Constitutional isomer generator.
    pub generator: Arc<G>,
    /// When this process came up.
    pub started_at: DateTime<Utc>,
}

impl<G: StructureGenerator + 'static> ServiceState<G> {
    /// State from an explicit configuration and generator.
    pub fn new(config: PipelineConfig, generator: G) -> Self {
        ServiceState {
            pipeline: Arc::new(StructurePipeline::new(config)),
            generator: Arc::new(generator),
            started_at: Utc::now(),
        }
    }

    /// Seconds since the service came up.
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

impl ServiceState<ExhaustiveGenerator> {
    /// State from environment variables, with the in-process generator
    /// wired to the configured heavy-atom ceiling.
    pub fn from_env() -> Self {
        let config = PipelineConfig::from_env();
        let generator = ExhaustiveGenerator::new(config.heavy_atom_ceiling);
        Self::new(config, generator)
    }
}

impl<G: StructureGenerator + 'static> Clone for ServiceState<G> {
    fn clone(&self) -> Self {
        ServiceState {
            pipeline: Arc::clone(&self.pipeline),
            generator: Arc::clone(&self.generator),
            started_at: self.started_at,
        }
    }
}
