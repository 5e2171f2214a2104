//! Axum routes for the structure pipeline service.

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};

use crate::depict::{DepictionOptions, SvgDocument};
use crate::error::ChemError;
use crate::generate::{ExhaustiveGenerator, StructureGenerator};
use crate::pipeline::{RuleFingerprints, StandardisedStructure};
use crate::types::descriptors::DescriptorVector;
use crate::types::sugar::SugarRemovalMode;

use super::middleware::{metrics_middleware, CorrelationId};
use super::state::ServiceState;

/// Service state with the in-process generator.
pub type AppState = ServiceState<ExhaustiveGenerator>;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body for the standardise endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardiseRequest {
    /// Structure text, either a V2000 molblock or a SMILES string.
    pub mol: String,
}

/// Detailed health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Process start time, RFC 3339.
    pub started_at: String,
    pub uptime_seconds: i64,
    /// Fingerprints of the rule tables in effect.
    pub rules: RuleFingerprints,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness response with the pipeline self-check outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub pipeline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Structured error response with correlation ID for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Correlation ID for request tracing (matches `x-trace-id` or a
    /// generated UUID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            correlation_id: None,
            details: None,
        }
    }

    /// Add a correlation ID to the error.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct SmilesQuery {
    smiles: String,
}

#[derive(Debug, Deserialize)]
struct FormulaQuery {
    molecular_formula: String,
}

#[derive(Debug, Deserialize)]
struct DepictQuery {
    smiles: String,
    #[serde(default = "default_backend")]
    generator: String,
    #[serde(default = "default_canvas")]
    width: f64,
    #[serde(default = "default_canvas")]
    height: f64,
    #[serde(default)]
    rotate: f64,
    #[serde(default)]
    unicolor: bool,
}

fn default_backend() -> String {
    DepictionOptions::default().backend
}

fn default_canvas() -> f64 {
    DepictionOptions::default().width
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Map a pipeline error onto the wire: client faults are 400, the rest
/// are 500.
fn fault(error: ChemError, correlation: &CorrelationId) -> (StatusCode, Json<ErrorResponse>) {
    let status = if error.is_client_fault() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    tracing::warn!(
        code = error.code(),
        error = %error,
        trace_id = %correlation.as_str(),
        "request failed"
    );
    let body =
        ErrorResponse::new(error.code(), error.to_string()).with_correlation_id(correlation.as_str());
    (status, Json(body))
}

/// Run a CPU-bound pipeline stage on the blocking pool.
async fn run_blocking<T, F>(
    correlation: &CorrelationId,
    task: F,
) -> Result<T, (StatusCode, Json<ErrorResponse>)>
where
    F: FnOnce() -> Result<T, ChemError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(fault(error, correlation)),
        Err(join_error) => {
            tracing::error!(error = %join_error, "pipeline worker failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ErrorResponse::new("WORKER_FAILED", "pipeline worker failed")
                        .with_correlation_id(correlation.as_str())
                        .with_details(join_error.to_string()),
                ),
            ))
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Standardise a structure and return the canonical bundle.
async fn standardise_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Json(request): Json<StandardiseRequest>,
) -> Result<Json<StandardisedStructure>, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let record = run_blocking(&correlation, move || pipeline.standardise(&request.mol)).await?;
    Ok(Json(record))
}

/// The 17-descriptor record for a SMILES input.
async fn descriptors_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<Json<DescriptorVector>, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let vector = run_blocking(&correlation, move || pipeline.descriptors(&query.smiles)).await?;
    Ok(Json(vector))
}

/// Sorted stereoisomer SMILES for the unassigned centers.
async fn stereoisomers_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let isomers = run_blocking(&correlation, move || pipeline.stereoisomers(&query.smiles)).await?;
    Ok(Json(isomers))
}

/// Render an SVG depiction.
async fn depict_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<DepictQuery>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let options = DepictionOptions {
        width: query.width,
        height: query.height,
        rotate: query.rotate,
        unicolor: query.unicolor,
        backend: query.generator,
    };
    let svg =
        run_blocking(&correlation, move || pipeline.depict(&query.smiles, &options)).await?;
    Ok((
        [(header::CONTENT_TYPE, SvgDocument::CONTENT_TYPE)],
        svg.into_string(),
    )
        .into_response())
}

/// Embed a 3D conformer and return its molblock.
async fn conformer_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    run_blocking(&correlation, move || {
        pipeline.conformer_molblock(&query.smiles)
    })
    .await
}

/// Constitutional isomers for a molecular formula.
async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<FormulaQuery>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    let generator = Arc::clone(&state.generator);
    // The generator future is CPU-bound; drive it off the async workers.
    let handle = tokio::runtime::Handle::current();
    let structures = run_blocking(&correlation, move || {
        handle.block_on(generator.generate(&query.molecular_formula))
    })
    .await?;
    Ok(Json(structures))
}

/// The sugar classification sentence.
async fn sugars_info_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let message = run_blocking(&correlation, move || pipeline.sugar_info(&query.smiles)).await?;
    Ok(message.to_string())
}

async fn remove_sugars_with_mode(
    state: Arc<AppState>,
    correlation: CorrelationId,
    smiles: String,
    mode: SugarRemovalMode,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    run_blocking(&correlation, move || pipeline.remove_sugars(&smiles, mode)).await
}

/// Aglycone after removing linear sugars.
async fn remove_linear_sugars_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    remove_sugars_with_mode(state, correlation, query.smiles, SugarRemovalMode::Linear).await
}

/// Aglycone after removing circular sugars.
async fn remove_circular_sugars_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    remove_sugars_with_mode(state, correlation, query.smiles, SugarRemovalMode::Circular).await
}

/// Aglycone after removing both sugar families.
async fn remove_sugars_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<SmilesQuery>,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    remove_sugars_with_mode(state, correlation, query.smiles, SugarRemovalMode::Both).await
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        rules: state.pipeline.rule_fingerprints(),
    })
}

/// Liveness probe endpoint.
///
/// Returns 200 whenever the process is alive; no dependency checks.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Runs one cheap pipeline pass; 503 when it fails.
async fn readiness_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let outcome = tokio::task::spawn_blocking(move || pipeline.self_check()).await;
    match outcome {
        Ok(Ok(())) => Ok(Json(ReadinessResponse {
            ready: true,
            pipeline: true,
            details: None,
        })),
        Ok(Err(error)) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                pipeline: false,
                details: Some(error.to_string()),
            }),
        )),
        Err(join_error) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                pipeline: false,
                details: Some(join_error.to_string()),
            }),
        )),
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the structure pipeline service.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Core pipeline operations
        .route("/standardise", post(standardise_handler))
        .route("/descriptors", get(descriptors_handler))
        .route("/stereoisomers", get(stereoisomers_handler))
        .route("/depict", get(depict_handler))
        .route("/conformer", get(conformer_handler))
        .route("/generate-structures", get(generate_handler))
        // Sugar analysis
        .route("/sugars-info", get(sugars_info_handler))
        .route("/remove-linear-sugars", get(remove_linear_sugars_handler))
        .route("/remove-circular-sugars", get(remove_circular_sugars_handler))
        .route("/remove-sugars", get(remove_sugars_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(from_fn(metrics_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    #[test]
    fn error_response_hides_empty_fields() {
        let bare = ErrorResponse::new("PARSE_ERROR", "bad input");
        let json = serde_json::to_string(&bare).unwrap();
        assert_eq!(json, r#"{"error":"bad input","code":"PARSE_ERROR"}"#);

        let full = ErrorResponse::new("PARSE_ERROR", "bad input")
            .with_correlation_id("abc-123")
            .with_details("position 4");
        let json = serde_json::to_string(&full).unwrap();
        assert!(json.contains(r#""correlation_id":"abc-123""#));
        assert!(json.contains(r#""details":"position 4""#));
    }

    #[test]
    fn depict_query_fills_service_defaults() {
        let query: DepictQuery = serde_json::from_str(r#"{"smiles":"CCO"}"#).unwrap();
        assert_eq!(query.smiles, "CCO");
        assert_eq!(query.generator, "standard");
        assert_eq!(query.width, 512.0);
        assert_eq!(query.height, 512.0);
        assert_eq!(query.rotate, 0.0);
        assert!(!query.unicolor);
    }

    #[test]
    fn router_builds_with_default_state() {
        let state = AppState::new(PipelineConfig::default(), ExhaustiveGenerator::default());
        let _router = create_router(state);
    }
}
