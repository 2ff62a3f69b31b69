//! File selection for the next upload.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::has_csv_extension;
use crate::notification::Severity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    /// Downloaded server sample
    Memory(Arc<Vec<u8>>),
}

/// A file chosen for upload: display/upload name plus where its bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Memory(Arc::new(bytes)),
        }
    }

    /// Read the bytes to send. Path files are read at upload time.
    pub fn read_contents(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => std::fs::read(path),
            FileSource::Memory(bytes) => Ok(bytes.as_ref().clone()),
        }
    }

    pub fn is_csv(&self) -> bool {
        has_csv_extension(Path::new(&self.name))
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(p) => Some(p),
            FileSource::Memory(_) => None,
        }
    }

    /// Label of the upload control once this file is selected.
    pub fn upload_label(&self) -> String {
        format!("Upload {}", self.name)
    }

    /// Feedback shown right after selection. The file stays selected either way.
    pub fn selection_feedback(&self) -> (&'static str, Severity) {
        if self.is_csv() {
            ("File selected successfully!", Severity::Success)
        } else {
            ("Please select a CSV file", Severity::Error)
        }
    }
}

/// Interpret pasted text as a dropped file path.
/// Handles quoting, `file://` URIs and backslash-escaped spaces; only the first line counts.
pub fn path_from_paste(text: &str) -> Option<PathBuf> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

    let unquoted = line
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .or_else(|| line.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
        .unwrap_or(line);

    // only URIs are percent-encoded; a plain path may hold a literal '%'
    let path = match unquoted.strip_prefix("file://") {
        Some(uri) => urlencoding::decode(uri)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| uri.to_string()),
        None => unquoted.to_string(),
    };
    let unescaped = path.replace("\\ ", " ");
    if unescaped.is_empty() {
        return None;
    }
    Some(PathBuf::from(unescaped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_feedback() {
        let csv = SelectedFile::from_path("/data/People.CSV");
        assert_eq!(csv.name, "People.CSV");
        assert_eq!(
            csv.selection_feedback(),
            ("File selected successfully!", Severity::Success)
        );
        assert_eq!(csv.upload_label(), "Upload People.CSV");

        let txt = SelectedFile::from_path("notes.txt");
        assert_eq!(
            txt.selection_feedback(),
            ("Please select a CSV file", Severity::Error)
        );
    }

    #[test]
    fn test_memory_contents() {
        let file = SelectedFile::from_bytes("sample_data.csv", b"a,b\n1,2\n".to_vec());
        assert!(file.is_csv());
        assert!(file.path().is_none());
        assert_eq!(file.read_contents().unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn test_path_from_paste() {
        assert_eq!(
            path_from_paste("'/tmp/my data.csv'\n"),
            Some(PathBuf::from("/tmp/my data.csv"))
        );
        assert_eq!(
            path_from_paste("/tmp/my\\ data.csv"),
            Some(PathBuf::from("/tmp/my data.csv"))
        );
        assert_eq!(
            path_from_paste("file:///tmp/a%20b.csv"),
            Some(PathBuf::from("/tmp/a b.csv"))
        );
        assert_eq!(
            path_from_paste("\n  /first.csv\n/second.csv"),
            Some(PathBuf::from("/first.csv"))
        );
        assert_eq!(path_from_paste("   \n"), None);
    }

    #[test]
    fn test_path_from_paste_decodes_file_uris_only() {
        assert_eq!(
            path_from_paste("file:///home/me/Q3%20%C3%A9t%C3%A9.csv"),
            Some(PathBuf::from("/home/me/Q3 \u{e9}t\u{e9}.csv"))
        );
        assert_eq!(
            path_from_paste("file:///tmp/50%25.csv"),
            Some(PathBuf::from("/tmp/50%.csv"))
        );
        assert_eq!(
            path_from_paste("/tmp/50%20off.csv"),
            Some(PathBuf::from("/tmp/50%20off.csv"))
        );
    }
}
