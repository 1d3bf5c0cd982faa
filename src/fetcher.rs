use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{Config, SWAP_ENTITY};
use crate::types::RawSwap;

/// Ways a fetch can come back without usable swaps. Each one is logged and
/// downgraded to an empty dataset by [`fetch_swaps`].
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("Error fetching data: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP status error: {0}")]
    Status(#[source] reqwest::Error),

    #[error("GraphQL Errors: {0}")]
    Query(Value),

    #[error("Unexpected response structure: {0}")]
    Structure(Value),

    #[error("Unexpected error: {0}")]
    Decode(String),
}

/// GraphQL query for every pool swap except those sent by `excluded_sender`.
pub fn swaps_query(excluded_sender: &str) -> String {
    format!(
        r#"{{
    {SWAP_ENTITY}(where: {{_not: {{sender: {{_eq: "{excluded_sender}"}}}}}}) {{
        sender
        amount0
        amount1
        price
        id
    }}
}}"#
    )
}

/// Fetch swaps from the indexer. Any failure is logged and yields an empty list.
pub async fn fetch_swaps(cfg: &Config) -> Vec<RawSwap> {
    match try_fetch_swaps(cfg).await {
        Ok(swaps) => {
            info!(swaps = swaps.len(), "Fetched {} swaps from {}", swaps.len(), cfg.endpoint);
            swaps
        }
        Err(e) => {
            error!("{e}");
            Vec::new()
        }
    }
}

async fn try_fetch_swaps(cfg: &Config) -> Result<Vec<RawSwap>, FetchFailure> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .map_err(FetchFailure::Transport)?;

    let query = swaps_query(&cfg.excluded_sender);
    debug!("POST {} query={}", cfg.endpoint, query);

    let resp = client
        .post(&cfg.endpoint)
        .json(&json!({ "query": query }))
        .send()
        .await
        .map_err(FetchFailure::Transport)?
        .error_for_status()
        .map_err(FetchFailure::Status)?;

    let body: Value = resp
        .json()
        .await
        .map_err(|e| FetchFailure::Decode(e.to_string()))?;

    interpret_response(body)
}

/// Pull the swap array out of a GraphQL response body.
/// An `errors` member wins over any partial `data`.
pub fn interpret_response(mut body: Value) -> Result<Vec<RawSwap>, FetchFailure> {
    if let Some(errors) = body.get("errors") {
        return Err(FetchFailure::Query(errors.clone()));
    }

    let records = body
        .get_mut("data")
        .and_then(|d| d.get_mut(SWAP_ENTITY))
        .map(Value::take);

    let records = match records {
        Some(records @ Value::Array(_)) => records,
        _ => return Err(FetchFailure::Structure(body)),
    };

    serde_json::from_value(records).map_err(|e| FetchFailure::Decode(e.to_string()))
}
