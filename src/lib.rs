//! Polls a Solana RPC endpoint for the most recent transaction signatures of
//! a configured set of wallet addresses and records the latest outcome per
//! address in a local JSON history file.

pub mod config;
pub mod fetcher;
pub mod history;
pub mod wallets;
