use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for watched-list persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A movie the user has watched and rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    /// External rating at the time the entry was added, absent for "N/A".
    pub imdb_rating: Option<f64>,
    /// Personal star rating, 1..=10.
    pub user_rating: u8,
    pub runtime_min: Option<u32>,
    /// How many times the star rating was adjusted before being committed.
    pub rating_revisions: u32,
    pub added_at: DateTime<Utc>,
}

/// Aggregates derived from the watched list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchedStats {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_min: f64,
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// The watched list, mirrored to a JSON file on every mutation.
pub struct WatchedStore {
    path: PathBuf,
    entries: Vec<WatchedEntry>,
}

impl WatchedStore {
    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "popcorn", "popcorn")?;
        Some(dirs.data_dir().join("watched.json"))
    }

    /// Load the list at `path`. A missing file is an empty list (first run).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Add an entry. An existing entry with the same identifier is replaced,
    /// keeping identifiers unique within the list.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), StoreError> {
        match self
            .entries
            .iter_mut()
            .find(|e| e.imdb_id == entry.imdb_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.persist()
    }

    /// Remove the entry with the given identifier. Returns whether one existed.
    pub fn remove(&mut self, imdb_id: &str) -> Result<bool, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.imdb_id != imdb_id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.imdb_id == imdb_id)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute aggregates over the current entries. Averages of fields that
    /// are absent ("N/A" upstream) are taken over the entries that have them.
    pub fn stats(&self) -> WatchedStats {
        WatchedStats {
            count: self.entries.len(),
            avg_imdb_rating: average(self.entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(self.entries.iter().map(|e| e.user_rating as f64)),
            avg_runtime_min: average(
                self.entries.iter().filter_map(|e| e.runtime_min.map(f64::from)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: &str, user_rating: u8, runtime_min: u32, imdb_rating: f64) -> WatchedEntry {
        WatchedEntry {
            imdb_id: id.to_string(),
            title: format!("Movie {id}"),
            year: "2010".to_string(),
            poster: String::new(),
            imdb_rating: Some(imdb_rating),
            user_rating,
            runtime_min: Some(runtime_min),
            rating_revisions: 1,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = WatchedStore::load(dir.path().join("watched.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.stats(), WatchedStats::default());
    }

    #[test]
    fn test_add_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.json");

        let mut store = WatchedStore::load(&path).unwrap();
        store.add(entry("tt1375666", 9, 148, 8.8)).unwrap();

        let reloaded = WatchedStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        let e = reloaded.get("tt1375666").unwrap();
        assert_eq!(e.user_rating, 9);
        assert_eq!(e.runtime_min, Some(148));
    }

    #[test]
    fn test_add_replaces_same_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchedStore::load(dir.path().join("watched.json")).unwrap();

        store.add(entry("tt0816692", 7, 169, 8.7)).unwrap();
        store.add(entry("tt0816692", 10, 169, 8.7)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("tt0816692").unwrap().user_rating, 10);
    }

    #[test]
    fn test_remove_deletes_exactly_that_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.json");
        let mut store = WatchedStore::load(&path).unwrap();

        store.add(entry("tt1375666", 9, 148, 8.8)).unwrap();
        store.add(entry("tt0816692", 8, 169, 8.7)).unwrap();

        assert!(store.remove("tt1375666").unwrap());
        assert!(!store.contains("tt1375666"));
        assert!(store.contains("tt0816692"));

        // Removing an unknown identifier is a no-op.
        assert!(!store.remove("tt0000000").unwrap());

        let reloaded = WatchedStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_stats_recompute_on_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchedStore::load(dir.path().join("watched.json")).unwrap();

        store.add(entry("a", 6, 100, 7.0)).unwrap();
        store.add(entry("b", 10, 200, 9.0)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_user_rating, 8.0);
        assert_eq!(stats.avg_imdb_rating, 8.0);
        assert_eq!(stats.avg_runtime_min, 150.0);

        store.remove("b").unwrap();
        let stats = store.stats();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.avg_user_rating, 6.0);
        assert_eq!(stats.avg_runtime_min, 100.0);
    }

    #[test]
    fn test_stats_skip_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchedStore::load(dir.path().join("watched.json")).unwrap();

        let mut unrated = entry("a", 5, 90, 0.0);
        unrated.imdb_rating = None;
        unrated.runtime_min = None;
        store.add(unrated).unwrap();
        store.add(entry("b", 7, 120, 6.0)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.avg_imdb_rating, 6.0);
        assert_eq!(stats.avg_runtime_min, 120.0);
        assert_eq!(stats.avg_user_rating, 6.0);
    }

    proptest! {
        #[test]
        fn prop_stats_bounded_by_inputs(
            ratings in proptest::collection::vec((1u8..=10, 1u32..=500), 0..24)
        ) {
            let dir = tempfile::tempdir().unwrap();
            let mut store = WatchedStore::load(dir.path().join("watched.json")).unwrap();
            for (i, (rating, runtime)) in ratings.iter().enumerate() {
                store.add(entry(&format!("tt{i:07}"), *rating, *runtime, 5.0)).unwrap();
            }

            let stats = store.stats();
            prop_assert_eq!(stats.count, ratings.len());
            if ratings.is_empty() {
                prop_assert_eq!(stats.avg_user_rating, 0.0);
                prop_assert_eq!(stats.avg_runtime_min, 0.0);
            } else {
                prop_assert!(stats.avg_user_rating >= 1.0 && stats.avg_user_rating <= 10.0);
                prop_assert!(stats.avg_runtime_min >= 1.0 && stats.avg_runtime_min <= 500.0);
            }
        }
    }
}
