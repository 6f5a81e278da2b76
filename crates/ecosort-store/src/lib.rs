//! Persistent store for scan history
//!
//! History is a bounded list of [`ScanResult`] kept newest first in
//! `history.json`. Only successful classifications are ever recorded.

pub mod breakdown;

pub use breakdown::{category_breakdown, total_items, CategorySlice};

use ecosort_types::{ClassificationResult, Error, Result, ScanResult};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Number of scans kept when no limit is configured
pub const DEFAULT_LIMIT: usize = 20;

const HISTORY_FILE: &str = "history.json";

/// Bounded scan history backed by a JSON file
pub struct HistoryStore {
    store_path: PathBuf,
    limit: usize,
    entries: Vec<ScanResult>,
}

impl HistoryStore {
    /// Create or load a store.
    ///
    /// A history file that cannot be read back is logged and replaced by an
    /// empty history on the next write.
    pub fn open(store_dir: PathBuf, limit: usize) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(HISTORY_FILE);
        let limit = limit.max(1);

        let mut entries = if store_path.exists() {
            load_entries(&store_path)
        } else {
            Vec::new()
        };
        entries.truncate(limit);

        debug!(path = %store_path.display(), entries = entries.len(), "history opened");
        Ok(Self {
            store_path,
            limit,
            entries,
        })
    }

    /// Save store to disk
    fn save(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.entries)?;
        Ok(())
    }

    /// Stamp a classification result and put it at the front of the history
    pub fn record(&mut self, result: ClassificationResult) -> Result<ScanResult> {
        let scan = ScanResult::new(result);
        self.entries.insert(0, scan.clone());
        self.entries.truncate(self.limit);
        self.save()?;
        Ok(scan)
    }

    /// All scans, newest first
    pub fn entries(&self) -> &[ScanResult] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ScanResult> {
        self.entries.iter().find(|scan| scan.id == id)
    }

    /// Remove one scan. Returns false when the id is unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|scan| scan.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Remove every scan, returning how many were dropped
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.entries.len();
        self.entries.clear();
        self.save()?;
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

fn load_entries(path: &Path) -> Vec<ScanResult> {
    let parsed: Result<Vec<ScanResult>> = File::open(path)
        .map_err(Error::from)
        .and_then(|file| serde_json::from_reader(BufReader::new(file)).map_err(Error::from));

    match parsed {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse history, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecosort_types::{WasteCategory, WasteItem};
    use tempfile::tempdir;

    fn item(name: &str, category: WasteCategory) -> WasteItem {
        WasteItem {
            item_name: name.to_string(),
            material: "Plastic".to_string(),
            category,
            confidence: 0.9,
            disposal_instruction: "Recycle it.".to_string(),
            recycling_tips: vec!["Rinse".to_string()],
            fun_fact: None,
        }
    }

    fn result(name: &str) -> ClassificationResult {
        ClassificationResult::new(vec![item(name, WasteCategory::Recyclable)])
    }

    #[test]
    fn test_record_and_reload() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        let scan = store.record(result("Bottle")).unwrap();

        let reopened = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(&scan.id).unwrap().items[0].item_name, "Bottle");
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().to_path_buf(), 3).unwrap();
        for name in ["a", "b", "c", "d", "e"] {
            store.record(result(name)).unwrap();
        }
        let names: Vec<&str> = store
            .entries()
            .iter()
            .map(|s| s.items[0].item_name.as_str())
            .collect();
        assert_eq!(names, vec!["e", "d", "c"]);
    }

    #[test]
    fn test_empty_result_is_recorded() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        let scan = store.record(ClassificationResult::default()).unwrap();
        assert!(scan.items.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_and_clear() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        let first = store.record(result("a")).unwrap();
        store.record(result("b")).unwrap();

        assert!(store.delete(&first.id).unwrap());
        assert!(!store.delete(&first.id).unwrap());
        assert_eq!(store.len(), 1);

        assert_eq!(store.clear().unwrap(), 1);
        let reopened = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();

        let mut store = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        assert!(store.is_empty());
        store.record(result("fresh")).unwrap();

        let reopened = HistoryStore::open(dir.path().to_path_buf(), DEFAULT_LIMIT).unwrap();
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().to_path_buf(), 0).unwrap();
        store.record(result("a")).unwrap();
        store.record(result("b")).unwrap();
        assert_eq!(store.limit(), 1);
        assert_eq!(store.len(), 1);
    }
}
