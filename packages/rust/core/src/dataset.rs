//! JSON file I/O for datasets, seed lists and generated outputs.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use biblia_shared::{BibliaError, Result, ScriptureDataset};

/// Byte order mark some exporters prepend to UTF-8 JSON.
const UTF8_BOM: char = '\u{feff}';

/// What was written by [`write_json_pretty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Number of bytes written.
    pub bytes: usize,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
}

/// Read and parse a JSON file, tolerating a leading UTF-8 BOM.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| BibliaError::io(path, e))?;
    let content = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    serde_json::from_str(content)
        .map_err(|e| BibliaError::parse(format!("failed to parse {}: {e}", path.display())))
}

/// Load the structured scripture dataset.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<ScriptureDataset> {
    let dataset: ScriptureDataset = read_json_file(path)?;
    debug!(
        books = dataset.books.len(),
        chapters = dataset.chapter_count(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Serialize `data` as indented JSON (non-ASCII kept verbatim) and overwrite `path`.
///
/// Parent directories are created when missing. The write is not atomic.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<WriteSummary> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| BibliaError::validation(format!("JSON serialization failed: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BibliaError::io(parent, e))?;
    }

    std::fs::write(path, &json).map_err(|e| BibliaError::io(path, e))?;
    debug!(path = %path.display(), bytes = json.len(), "wrote JSON file");

    Ok(WriteSummary {
        bytes: json.len(),
        sha256: sha256_hex(json.as_bytes()),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("biblia-dataset-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_dataset_strips_bom() {
        let dir = temp_dir();
        let path = dir.join("reina_valera.json");
        std::fs::write(
            &path,
            "\u{feff}{\"books\":[{\"name\":\"Génesis\",\"chapters\":[{\"chapter\":1}]}]}",
        )
        .unwrap();

        let ds = load_dataset(&path).expect("load");
        assert_eq!(ds.books[0].name, "Génesis");
        assert_eq!(ds.chapter_count(), 1);
    }

    #[test]
    fn load_dataset_missing_file_is_io_error() {
        let path = temp_dir().join("missing.json");
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, BibliaError::Io { .. }));
    }

    #[test]
    fn load_dataset_invalid_json_is_parse_error() {
        let path = temp_dir().join("broken.json");
        std::fs::write(&path, "{\"books\": [").unwrap();
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, BibliaError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn write_preserves_non_ascii_and_indents() {
        let path = temp_dir().join("nested/dir/out.json");
        let data = serde_json::json!([{ "name": "Éxodo", "text": "¿Quién?" }]);
        let summary = write_json_pretty(&path, &data).expect("write");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Éxodo"));
        assert!(written.contains("¿Quién?"));
        assert!(!written.contains("\\u"));
        assert!(written.contains("\n  {"));
        assert_eq!(summary.bytes, written.len());
        assert_eq!(summary.sha256.len(), 64);
    }

    #[test]
    fn write_overwrites_existing_content() {
        let path = temp_dir().join("out.json");
        std::fs::write(&path, "x".repeat(4096)).unwrap();
        write_json_pretty(&path, &serde_json::json!([])).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
