use std::env;
use std::path::PathBuf;

pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

/// Process-wide settings. Endpoint and file paths can be overridden through
/// environment variables (a `.env` file is honored); the retry and delay
/// knobs are fixed defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub wallet_addresses_file: PathBuf,
    pub wallet_history_file: PathBuf,
    /// How many recent signatures to request per wallet.
    pub signature_limit: usize,
    /// Total attempts per wallet, including the first.
    pub max_retries: u32,
    /// Linear backoff base: attempt n waits `backoff_base_secs * n`.
    pub backoff_base_secs: u64,
    /// Unconditional delay between wallets, for rate-limit avoidance.
    pub request_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_ENDPOINT.to_string(),
            wallet_addresses_file: PathBuf::from("wallet_addresses.json"),
            wallet_history_file: PathBuf::from("wallet_history.json"),
            signature_limit: 10,
            max_retries: 3,
            backoff_base_secs: 2,
            request_delay_secs: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(path) = env::var("WALLET_ADDRESSES_FILE") {
            config.wallet_addresses_file = PathBuf::from(path);
        }
        if let Ok(path) = env::var("WALLET_HISTORY_FILE") {
            config.wallet_history_file = PathBuf::from(path);
        }
        config
    }
}
