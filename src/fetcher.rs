use std::time::Duration;

use log::{error, warn};
use serde_json::Value;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_client::{GetConfirmedSignaturesForAddress2Config, RpcClient};
use solana_sdk::pubkey::Pubkey;
use tokio::time::sleep;

use crate::config::Config;

/// One signature lookup against the RPC layer. The retry loop only depends on
/// this seam, so it can run against a scripted source in tests.
pub trait SignatureSource {
    fn signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<Value>, ClientError>;
}

impl SignatureSource for RpcClient {
    fn signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<Value>, ClientError> {
        let signatures = self.get_signatures_for_address_with_config(
            address,
            GetConfirmedSignaturesForAddress2Config {
                limit: Some(limit),
                ..Default::default()
            },
        )?;

        // The records are opaque to this tool; carry them as plain JSON.
        signatures
            .into_iter()
            .map(|status| {
                serde_json::to_value(status)
                    .map_err(|err| ClientError::from(ClientErrorKind::from(err)))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// RPC-layer error, worth retrying with backoff.
    Transient,
    /// Unexpected error whose text carries an HTTP 429 indicator.
    RateLimited,
    /// Anything else; retrying will not help.
    Fatal,
}

pub fn classify_failure(err: &ClientError) -> FailureKind {
    match err.kind() {
        ClientErrorKind::RpcError(_) => FailureKind::Transient,
        _ if err.to_string().contains("429") => FailureKind::RateLimited,
        _ => FailureKind::Fatal,
    }
}

fn log_failure_detail(err: &ClientError) {
    error!("Error message: {}", err);
    error!("Error details: {:?}", err);
    if let ClientErrorKind::Reqwest(req_err) = err.kind() {
        match req_err.status() {
            Some(status) => error!("Response status: {}", status),
            None => error!("Response status: No status"),
        }
    }
}

/// Fetches the most recent transaction signatures for one wallet, retrying
/// transient RPC failures with linear backoff.
///
/// Makes at most `config.max_retries` attempts, waiting
/// `backoff_base_secs * attempt` seconds between them; the last attempt's
/// failure ends the loop without a further wait. An unexpected rate-limit
/// error gets a single extra wait and no retry. Every unrecoverable outcome
/// degrades to an empty list; errors never reach the caller.
pub async fn fetch_wallet_signatures<S: SignatureSource>(
    source: &S,
    address: &Pubkey,
    config: &Config,
) -> Vec<Value> {
    for attempt in 1..=config.max_retries {
        let err = match source.signatures_for_address(address, config.signature_limit) {
            Ok(signatures) => return signatures,
            Err(err) => err,
        };

        let wait = config.backoff_base_secs * u64::from(attempt);
        match classify_failure(&err) {
            FailureKind::Transient => {
                error!("RPC error for {}:", address);
                log_failure_detail(&err);
                if attempt == config.max_retries {
                    break;
                }
                warn!(
                    "Attempt {}/{}. Waiting {} seconds...",
                    attempt, config.max_retries, wait
                );
                sleep(Duration::from_secs(wait)).await;
            }
            FailureKind::RateLimited => {
                error!("Unexpected error for {}:", address);
                log_failure_detail(&err);
                warn!("Rate limit hit. Waiting {} seconds...", wait);
                sleep(Duration::from_secs(wait)).await;
                return Vec::new();
            }
            FailureKind::Fatal => {
                error!("Unexpected error for {}:", address);
                log_failure_detail(&err);
                return Vec::new();
            }
        }
    }

    Vec::new()
}
