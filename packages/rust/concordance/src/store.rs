//! `concordances.json` load/save.

use std::path::Path;

use tracing::debug;

use biblia_core::dataset::{read_json_file, write_json_pretty};
use biblia_shared::{ConcordanceStore, Result};

/// Load the concordance store. A missing or malformed file is an error.
pub fn load_store(path: &Path) -> Result<ConcordanceStore> {
    let store: ConcordanceStore = read_json_file(path)?;
    debug!(path = %path.display(), entries = store.concordances.len(), "concordance store loaded");
    Ok(store)
}

/// Rewrite the concordance store wholesale.
pub fn save_store(path: &Path, store: &ConcordanceStore) -> Result<()> {
    write_json_pretty(path, store)?;
    debug!(path = %path.display(), entries = store.concordances.len(), "concordance store saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use biblia_shared::{BibliaError, ConcordanceEntry};

    use super::*;

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/json/concordances.fixture.json")
    }

    #[test]
    fn load_fixture() {
        let store = load_store(&fixture()).expect("load");
        assert_eq!(store.concordances.len(), 1);
        assert_eq!(store.find("Génesis 1:1").unwrap().related.len(), 2);
    }

    #[test]
    fn save_then_load_keeps_entries_and_extras() {
        let dir = std::env::temp_dir().join(format!("biblia-store-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join("concordances.json");

        let mut store = load_store(&fixture()).unwrap();
        store.concordances.push(ConcordanceEntry {
            reference: "Juan 10:10".into(),
            related: vec![],
        });
        save_store(&path, &store).unwrap();

        let reloaded = load_store(&path).unwrap();
        assert_eq!(reloaded.concordances.len(), 2);
        assert_eq!(reloaded.extra["version"], 1);
        assert!(std::fs::read_to_string(&path).unwrap().contains("Génesis 1:1"));
    }

    #[test]
    fn missing_store_is_error() {
        let err = load_store(Path::new("/nonexistent/biblia/concordances.json")).unwrap_err();
        assert!(matches!(err, BibliaError::Io { .. }));
    }
}
