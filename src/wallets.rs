use std::fs;
use std::path::Path;

use log::error;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WalletAddressFile {
    #[serde(default)]
    wallet_addresses: Vec<String>,
}

/// Reads the list of wallet addresses from a JSON file of the form
/// `{"wallet_addresses": ["...", ...]}`, in file order.
///
/// A missing file or malformed content is logged and yields an empty list;
/// the caller treats that as "nothing to do".
pub fn load_wallet_addresses(path: &Path) -> Vec<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => {
            error!("Error: {} not found", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str::<WalletAddressFile>(&contents) {
        Ok(parsed) => parsed.wallet_addresses,
        Err(_) => {
            error!("Error: Invalid JSON format in {}", path.display());
            Vec::new()
        }
    }
}
