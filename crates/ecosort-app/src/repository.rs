//! Repository adapters for persistence layer

use ecosort_store::HistoryStore;
use ecosort_types::Result;

use crate::config::Config;

/// Open the scan history configured for this device
pub fn open_history_store(config: &Config) -> Result<HistoryStore> {
    let store_dir = config.store_dir()?;
    HistoryStore::open(store_dir, config.history_limit)
}
