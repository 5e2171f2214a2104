//! HTTP surface for the structure pipeline.
//!
//! Stateless: every request parses its own input, runs the pipeline
//! stages it needs, and returns the artifact. No molecule survives the
//! request that carried it.
//!
//! ## Endpoints
//!
//! - `POST /standardise` - standardise a molblock, return the canonical bundle
//! - `GET /descriptors?smiles=` - the 17-descriptor record
//! - `GET /stereoisomers?smiles=` - sorted stereoisomer SMILES
//! - `GET /depict?smiles=&generator=&width=&height=&rotate=` - SVG depiction
//! - `GET /conformer?smiles=` - 3D molblock with explicit hydrogens
//! - `GET /generate-structures?molecular_formula=` - constitutional isomers
//! - `GET /sugars-info?smiles=` - sugar classification sentence
//! - `GET /remove-linear-sugars?smiles=` - aglycone after linear removal
//! - `GET /remove-circular-sugars?smiles=` - aglycone after circular removal
//! - `GET /remove-sugars?smiles=` - aglycone after removing both families
//! - `GET /health` - detailed health check
//! - `GET /health/live` - liveness probe
//! - `GET /health/ready` - readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, CorrelationId};
pub use routes::{
    create_router, AppState, ErrorResponse, HealthResponse, LivenessResponse, ReadinessResponse,
    StandardiseRequest,
};
pub use state::ServiceState;
