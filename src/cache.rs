use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// History ids of the parameter dialog fields; each is stored as `<id>_history.txt`.
pub const HISTORY_IDS: &[&str] = &["column", "search_query", "open_path", "sample_name"];

/// Default log file name inside the cache directory.
pub const LOG_FILE: &str = "thinkboard.log";

/// Manages cache directory and cache file operations
#[derive(Clone)]
pub struct CacheManager {
    pub(crate) cache_dir: PathBuf,
}

impl CacheManager {
    /// Create a new CacheManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine cache directory"))?
            .join(app_name);

        Ok(Self { cache_dir })
    }

    /// Create a CacheManager rooted at a custom directory (tests)
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get path to a specific cache file
    pub fn cache_file(&self, filename: &str) -> PathBuf {
        self.cache_dir.join(filename)
    }

    pub fn history_file(&self, history_id: &str) -> PathBuf {
        self.cache_file(&format!("{}_history.txt", history_id))
    }

    /// Ensure the cache directory exists
    pub fn ensure_cache_dir(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Clear a specific cache file
    pub fn clear_file(&self, filename: &str) -> Result<()> {
        let file_path = self.cache_file(filename);
        if file_path.exists() {
            fs::remove_file(&file_path)?;
        }
        Ok(())
    }

    /// Clear all input histories and the default log file.
    /// Returns the number of files removed.
    pub fn clear_all(&self) -> Result<usize> {
        let mut removed = 0;
        let files = HISTORY_IDS
            .iter()
            .map(|id| format!("{}_history.txt", id))
            .chain(std::iter::once(LOG_FILE.to_string()));

        for filename in files {
            let file_path = self.cache_file(&filename);
            if file_path.exists() {
                match fs::remove_file(&file_path) {
                    Ok(()) => removed += 1,
                    Err(e) => eprintln!("Warning: Could not remove cache file {}: {}", filename, e),
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clear_all_removes_histories_and_log() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(dir.path().join("thinkboard"));
        cache.ensure_cache_dir().unwrap();

        fs::write(cache.history_file("column"), "age\n").unwrap();
        fs::write(cache.cache_file(LOG_FILE), "log\n").unwrap();
        fs::write(cache.cache_file("unrelated.txt"), "keep\n").unwrap();

        assert_eq!(cache.clear_all().unwrap(), 2);
        assert!(!cache.history_file("column").exists());
        assert!(cache.cache_file("unrelated.txt").exists());
    }

    #[test]
    fn test_clear_file_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(dir.path().to_path_buf());
        assert!(cache.clear_file("nothing_here.txt").is_ok());
    }
}
