//! Recall list for one dialog field, stored as `<id>_history.txt` in the cache
//! directory, one entry per line, oldest first.

use color_eyre::Result;
use fs2::FileExt;
use std::fs;
use std::io::{BufWriter, Write};

use crate::cache::CacheManager;

pub struct FieldHistory {
    id: String,
    limit: usize,
    entries: Vec<String>,
    loaded: bool,
    /// Entry shown while browsing with Up/Down
    browsing: Option<usize>,
    /// Text the user had typed before browsing started
    draft: Option<String>,
}

impl FieldHistory {
    /// Fields with the same `id` share one history file.
    pub fn new(id: impl Into<String>, limit: usize) -> Self {
        Self {
            id: id.into(),
            limit,
            entries: Vec::new(),
            loaded: false,
            browsing: None,
            draft: None,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn load(&mut self, cache: &CacheManager) -> Result<()> {
        let path = cache.history_file(&self.id);
        self.entries = match fs::read_to_string(&path) {
            Ok(text) => text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        self.loaded = true;
        Ok(())
    }

    fn ensure_loaded(&mut self, cache: Option<&CacheManager>) {
        if self.loaded {
            return;
        }
        if let Some(cache) = cache {
            if let Err(e) = self.load(cache) {
                log::warn!("history.load_failed id={} err={}", self.id, e);
            }
        }
    }

    /// Append a submitted value and rewrite the file with the newest `limit`
    /// entries. Blank values and repeats of the newest entry are not stored.
    pub fn record(&mut self, cache: &CacheManager, value: &str) -> Result<()> {
        self.stop_browsing();
        if value.trim().is_empty() {
            return Ok(());
        }
        // another dialog may have written since this one loaded
        self.load(cache)?;
        if self.entries.last().map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.entries.push(value.to_string());
        let excess = self.entries.len().saturating_sub(self.limit);
        self.entries.drain(..excess);

        cache.ensure_cache_dir()?;
        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(cache.history_file(&self.id))?;
        // the lock is released when `file` is dropped
        file.lock_exclusive()?;
        file.set_len(0)?;
        let mut out = BufWriter::new(&file);
        for entry in &self.entries {
            writeln!(out, "{}", entry)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Step to the next older entry. `current` is kept as the draft when
    /// browsing starts.
    pub fn older(&mut self, current: &str, cache: Option<&CacheManager>) -> Option<&str> {
        self.ensure_loaded(cache);
        if self.entries.is_empty() {
            return None;
        }
        let index = match self.browsing {
            Some(i) => i.saturating_sub(1),
            None => {
                self.draft = Some(current.to_string());
                self.entries.len() - 1
            }
        };
        self.browsing = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    /// Step to the next newer entry; past the newest, the draft comes back.
    pub fn newer(&mut self) -> Option<String> {
        let index = self.browsing? + 1;
        if index < self.entries.len() {
            self.browsing = Some(index);
            return self.entries.get(index).cloned();
        }
        self.browsing = None;
        Some(self.draft.take().unwrap_or_default())
    }

    pub fn stop_browsing(&mut self) {
        self.browsing = None;
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache() -> (TempDir, CacheManager) {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(dir.path().join("cache"));
        (dir, cache)
    }

    #[test]
    fn test_record_skips_blank_and_repeated_values() {
        let (_dir, cache) = cache();
        let mut history = FieldHistory::new("column", 10);
        history.record(&cache, "age").unwrap();
        history.record(&cache, "age").unwrap();
        history.record(&cache, "   ").unwrap();
        history.record(&cache, "income").unwrap();
        history.record(&cache, "age").unwrap();
        assert_eq!(history.entries(), ["age", "income", "age"]);
    }

    #[test]
    fn test_record_keeps_newest_entries_on_disk() {
        let (_dir, cache) = cache();
        let mut history = FieldHistory::new("search_query", 3);
        for query in ["a", "b", "c", "d", "e"] {
            history.record(&cache, query).unwrap();
        }
        let text = fs::read_to_string(cache.history_file("search_query")).unwrap();
        assert_eq!(text, "c\nd\ne\n");
    }

    #[test]
    fn test_record_merges_other_writers() {
        let (_dir, cache) = cache();
        let mut sort_dialog = FieldHistory::new("column", 10);
        let mut gradient_dialog = FieldHistory::new("column", 10);
        sort_dialog.load(&cache).unwrap();
        gradient_dialog.load(&cache).unwrap();

        sort_dialog.record(&cache, "age").unwrap();
        gradient_dialog.record(&cache, "income").unwrap();

        let mut reopened = FieldHistory::new("column", 10);
        reopened.load(&cache).unwrap();
        assert_eq!(reopened.entries(), ["age", "income"]);
    }

    #[test]
    fn test_browse_older_then_back_to_draft() {
        let (_dir, cache) = cache();
        let mut history = FieldHistory::new("column", 10);
        history.record(&cache, "age").unwrap();
        history.record(&cache, "income").unwrap();

        assert_eq!(history.older("ci", Some(&cache)), Some("income"));
        assert_eq!(history.older("income", Some(&cache)), Some("age"));
        // stays on the oldest entry
        assert_eq!(history.older("age", Some(&cache)), Some("age"));
        assert_eq!(history.newer().as_deref(), Some("income"));
        assert_eq!(history.newer().as_deref(), Some("ci"));
        assert_eq!(history.newer(), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, cache) = cache();
        let mut history = FieldHistory::new("open_path", 10);
        history.load(&cache).unwrap();
        assert!(history.entries().is_empty());
        assert_eq!(history.older("", Some(&cache)), None);
    }
}
