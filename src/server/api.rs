use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::data::config::{SimulationRequest, MAX_TRIALS};
use crate::data::game_data::GameDataSource;
use crate::parallel::WorkerPool;
use crate::simulator::monte_carlo::{run_simulation, SimulationSummary};

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub status: &'static str,
    pub run_id: String,
    pub seed: u64,
    pub summary: SimulationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid simulate request")]
    Validation(ValidationErrorResponse),
    #[error("failed to draw a seed: {0}")]
    Seed(getrandom::Error),
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "duelsim-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn validate_request(request: &SimulationRequest) -> Result<(), ValidationErrorResponse> {
    let mut errors = Vec::new();
    if !(1..=MAX_TRIALS).contains(&request.trials) {
        errors.push(ValidationIssue {
            field: "trials",
            messages: vec![format!("must be between 1 and {MAX_TRIALS}")],
        });
    }
    if request.attacker.max_life == 0 {
        errors.push(ValidationIssue {
            field: "attacker.max_life",
            messages: vec!["must be greater than 0".to_string()],
        });
    }
    if request.defender.max_life == 0 {
        errors.push(ValidationIssue {
            field: "defender.max_life",
            messages: vec!["must be greater than 0".to_string()],
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrorResponse {
            status: "error",
            message: "Validation failed",
            errors,
        })
    }
}

/// Seed from the OS entropy source.
pub fn fresh_seed() -> Result<u64, getrandom::Error> {
    let mut bytes = [0_u8; 8];
    getrandom::getrandom(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

pub fn simulate_payload(
    body: &str,
    data: &impl GameDataSource,
    pool: &WorkerPool,
) -> Result<String, ApiError> {
    let request: SimulationRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    validate_request(&request).map_err(ApiError::Validation)?;
    let seed = match request.seed {
        Some(seed) => seed,
        None => fresh_seed().map_err(ApiError::Seed)?,
    };
    let run_id = Uuid::new_v4().to_string();
    info!(%run_id, trials = request.trials, seed, "simulate request");

    let response = SimulateResponse {
        status: "ok",
        run_id,
        seed,
        summary: run_simulation(&request, data, seed, pool),
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Encode)
}
