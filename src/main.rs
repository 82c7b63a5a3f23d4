use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use flexi_logger::{Duplicate, FileSpec, Logger, WriteMode};
use log::{error, info};
use solana_client::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use tokio::time::sleep;

use tx_tracker::config::Config;
use tx_tracker::fetcher::fetch_wallet_signatures;
use tx_tracker::history::HistoryStore;
use tx_tracker::wallets::load_wallet_addresses;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize the logger with timestamps and other relevant information
    Logger::try_with_str("info")
        .unwrap()
        .log_to_file(FileSpec::default().directory("logs").suffix("log"))
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .use_utc()
        .duplicate_to_stderr(Duplicate::Info)
        .format(flexi_logger::detailed_format)
        .start()
        .unwrap();

    let config = Config::from_env();

    // Read wallet addresses from JSON file
    let wallet_addresses = load_wallet_addresses(&config.wallet_addresses_file);
    if wallet_addresses.is_empty() {
        info!("No wallet addresses found. Exiting...");
        return;
    }

    // Set up Solana RPC client
    info!("Connecting to Solana RPC at {}", config.rpc_url);
    let rpc_client = RpcClient::new(config.rpc_url.clone());
    let history = HistoryStore::new(config.wallet_history_file.clone());

    // Process each wallet address
    for address in wallet_addresses {
        let pubkey = match Pubkey::from_str(&address) {
            Ok(pubkey) => pubkey,
            Err(err) => {
                error!("Invalid wallet address {}: {}", address, err);
                history
                    .update(&address, None, Some(&err.to_string()))
                    .expect("Failed to write wallet history");
                continue;
            }
        };

        info!("Processing wallet: {}", address);

        // Get the last 10 transactions
        let signatures = fetch_wallet_signatures(&rpc_client, &pubkey, &config).await;
        if signatures.is_empty() {
            info!("No transactions found for {}", address);
            history
                .update(&address, None, Some("No transactions found"))
                .expect("Failed to write wallet history");
        } else {
            info!("Latest transactions for {}: {:?}", address, signatures);
            history
                .update(&address, Some(signatures), None)
                .expect("Failed to write wallet history");
        }

        // Delay between wallets to avoid rate limiting
        sleep(Duration::from_secs(config.request_delay_secs)).await;
    }
}
