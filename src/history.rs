use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;

/// Local time, microsecond precision, no timezone offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to write wallet history: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode wallet history: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HistoryFile {
    pub timestamp: String,
    pub addresses: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub address: String,
    pub transactions: Vec<Value>,
    pub error: String,
}

/// Persisted fetch outcomes, one record per wallet address.
///
/// The whole file is read, merged, and rewritten on every update. There is no
/// lock and no atomic replace; the store expects a single sequential writer.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Upserts the record for `address`, refreshing the file-level timestamp.
    ///
    /// Omitted `transactions` or `error` are stored as empty, so repeating
    /// the same call leaves exactly one record for the address.
    pub fn update(
        &self,
        address: &str,
        transactions: Option<Vec<Value>>,
        error: Option<&str>,
    ) -> Result<(), HistoryError> {
        let mut data = self.load_or_default();

        data.timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let transactions = transactions.unwrap_or_default();
        let error = error.unwrap_or_default().to_string();

        // Find and update or add a new address entry
        match data
            .addresses
            .iter_mut()
            .find(|record| record.address == address)
        {
            Some(record) => {
                record.transactions = transactions;
                record.error = error;
            }
            None => data.addresses.push(HistoryRecord {
                address: address.to_string(),
                transactions,
                error,
            }),
        }

        self.write(&data)
    }

    /// Loads the current history file; a missing or unparseable file starts
    /// the history over from empty.
    pub fn load_or_default(&self) -> HistoryFile {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn write(&self, data: &HistoryFile) -> Result<(), HistoryError> {
        let file = fs::File::create(&self.path)?;
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(file, formatter);
        data.serialize(&mut serializer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("wallet_history.json"))
    }

    #[test]
    fn appends_new_record_with_supplied_values() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store
            .update("Addr1", Some(vec![json!("sig1"), json!("sig2")]), None)
            .unwrap();

        let data = store.load_or_default();
        assert_eq!(data.addresses.len(), 1);
        assert_eq!(data.addresses[0].address, "Addr1");
        assert_eq!(
            data.addresses[0].transactions,
            vec![json!("sig1"), json!("sig2")]
        );
        assert_eq!(data.addresses[0].error, "");
    }

    #[test]
    fn repeated_identical_updates_keep_one_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.update("Addr1", Some(vec![json!("sig1")]), None).unwrap();
        store.update("Addr1", Some(vec![json!("sig1")]), None).unwrap();

        let data = store.load_or_default();
        assert_eq!(data.addresses.len(), 1);
        assert_eq!(data.addresses[0].transactions, vec![json!("sig1")]);
    }

    #[test]
    fn update_replaces_transactions_and_error() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.update("Addr1", Some(vec![json!("sig1")]), None).unwrap();
        store.update("Addr1", None, Some("No transactions found")).unwrap();

        let data = store.load_or_default();
        assert_eq!(data.addresses.len(), 1);
        assert!(data.addresses[0].transactions.is_empty());
        assert_eq!(data.addresses[0].error, "No transactions found");
    }

    #[test]
    fn update_preserves_other_records() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.update("Addr1", Some(vec![json!("sig1")]), None).unwrap();
        store.update("Addr2", None, Some("No transactions found")).unwrap();
        store.update("Addr1", Some(vec![json!("sig9")]), None).unwrap();

        let data = store.load_or_default();
        assert_eq!(data.addresses.len(), 2);
        assert_eq!(data.addresses[0].address, "Addr1");
        assert_eq!(data.addresses[0].transactions, vec![json!("sig9")]);
        assert_eq!(data.addresses[1].address, "Addr2");
        assert_eq!(data.addresses[1].error, "No transactions found");
    }

    #[test]
    fn unparseable_file_starts_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet_history.json");
        std::fs::write(&path, "{corrupt").unwrap();

        let store = HistoryStore::new(&path);
        store.update("Addr1", None, Some("No transactions found")).unwrap();

        let data = store.load_or_default();
        assert_eq!(data.addresses.len(), 1);
        assert_eq!(data.addresses[0].address, "Addr1");
    }

    #[test]
    fn stamps_microsecond_timestamp_and_pretty_prints() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.update("Addr1", None, None).unwrap();

        let data = store.load_or_default();
        // e.g. 2024-05-01T12:34:56.123456
        assert_eq!(data.timestamp.len(), 26);
        assert_eq!(data.timestamp.as_bytes()[10], b'T');

        let raw = std::fs::read_to_string(dir.path().join("wallet_history.json")).unwrap();
        assert!(raw.contains("\n    \"addresses\""));
    }
}
