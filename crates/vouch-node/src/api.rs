//! HTTP API server for the Vouch node.
//!
//! Provides endpoints for single-hop signature checks, full trust-chain
//! verification, and publishing this organization's public registry.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

use vouch_credentials::{ChainOutcome, ChainReport, CredentialError, PublicRegistry};
use vouch_identity::SignedVc;

use crate::state::NodeState;

// --- Response types ---

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TrustchainResponse {
    pub valid: bool,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
    pub message: String,
    pub hops: Vec<String>,
}

impl From<&ChainReport> for TrustchainResponse {
    fn from(report: &ChainReport) -> Self {
        Self {
            valid: report.outcome.is_valid(),
            outcome: report.outcome.kind().to_string(),
            did: report.outcome.did().map(str::to_string),
            message: report.outcome.message(),
            hops: report.hops.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Parse a request body as a signed credential. An empty body is `None`.
fn parse_credential(body: &Bytes) -> Result<Option<SignedVc>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("malformed credential: {}", e)))
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_registry(State(state): State<Arc<NodeState>>) -> Json<PublicRegistry> {
    Json(state.registry.clone())
}

async fn handle_verify(
    State(state): State<Arc<NodeState>>,
    body: Bytes,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Some(credential) = parse_credential(&body)? else {
        return Err(api_error(StatusCode::BAD_REQUEST, "request body is empty"));
    };

    let hop_timeout = state.validator.limits().hop_timeout();
    let check = tokio::time::timeout(hop_timeout, state.verifier.verify_signature(&credential))
        .await
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("resolving issuer {} timed out", credential.issuer()),
            )
        })?
        .map_err(|e| {
            let status = match e {
                CredentialError::MissingIssuer | CredentialError::KeylessIssuer(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!(issuer = credential.issuer(), error = %e, "signature check failed");
            api_error(status, e.to_string())
        })?;

    tracing::info!(
        issuer = %check.issuer,
        subject = %check.subject,
        valid = check.valid,
        "signature checked"
    );
    Ok(Json(VerifyResponse {
        valid: check.valid,
        message: check.message(),
    }))
}

async fn handle_verify_trustchain(
    State(state): State<Arc<NodeState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<TrustchainResponse>), ApiError> {
    let credential = parse_credential(&body)?;

    let report = state
        .validator
        .walk(credential.as_ref())
        .await
        .map_err(|e| {
            tracing::warn!(did = e.did().unwrap_or_default(), error = %e, "trust chain walk aborted");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    // Malformed input at the submitted level is the caller's fault.
    let status = match report.outcome {
        ChainOutcome::MissingInput => StatusCode::BAD_REQUEST,
        ChainOutcome::InvalidType(_) if report.depth == 0 => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    Ok((status, Json(TrustchainResponse::from(&report))))
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/registry", get(handle_registry))
        .route("/vc/verify", post(handle_verify))
        .route("/vc/verifyTrustchain", post(handle_verify_trustchain))
        .with_state(state)
}

pub async fn start_api_server(
    listen_addr: SocketAddr,
    state: Arc<NodeState>,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
