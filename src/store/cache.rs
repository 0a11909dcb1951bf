//! File-backed local cache, one JSON file per event.
//!
//! This is the fallback half of the best-effort dual write: when the
//! remote store is unreachable, rows land here and the next `load` for
//! the same event serves them. Files are small (a handful of templates)
//! so reads and writes are plain synchronous `std::fs`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GafeteError;

use super::remote::TemplateRow;

pub struct TemplateCache {
    dir: PathBuf,
}

impl TemplateCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, event_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", event_id))
    }

    /// All cached rows for an event; a missing file is an empty cache,
    /// not an error.
    pub fn read(&self, event_id: &str) -> Result<Vec<TemplateRow>, GafeteError> {
        let path = self.path(event_id);
        if !Path::new(&path).exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Replace the cached row set for an event.
    pub fn write(&self, event_id: &str, rows: &[TemplateRow]) -> Result<(), GafeteError> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string_pretty(rows)?;
        fs::write(self.path(event_id), data)?;
        Ok(())
    }

    /// Insert or replace one row, keyed by its client id.
    pub fn upsert(&self, event_id: &str, row: &TemplateRow) -> Result<(), GafeteError> {
        let mut rows = self.read(event_id)?;
        match rows.iter_mut().find(|r| r.id == row.id) {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        self.write(event_id, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TemplateCache::new(dir.path());
        assert!(cache.read("evt-none").unwrap().is_empty());
    }

    #[test]
    fn test_upsert_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TemplateCache::new(dir.path());

        let row = TemplateRow::from_template(&Template::default_badge("evt-1"));
        cache.upsert("evt-1", &row).unwrap();
        assert_eq!(cache.read("evt-1").unwrap(), vec![row.clone()]);

        // Replacing by id, not appending.
        let mut updated = row.clone();
        updated.name = "Renamed".into();
        cache.upsert("evt-1", &updated).unwrap();
        let rows = cache.read("evt-1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Renamed");
    }
}
