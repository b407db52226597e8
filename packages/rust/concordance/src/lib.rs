//! Concordance updater.
//!
//! Asks a hosted language model for cross references of one verse and appends
//! them to `concordances.json`. A reference already in the store is left
//! alone. Lookup failures of any kind degrade to "nothing to add": they are
//! logged and the store is not rewritten.

mod client;
mod prompt;
mod store;

use std::future::Future;
use std::path::Path;

use tracing::{info, instrument, warn};

use biblia_shared::{ConcordanceEntry, CrossReference, Result, VerseRef};

pub use client::InferenceClient;
pub use prompt::{build_prompt, parse_related};
pub use store::{load_store, save_store};

/// Anything that can suggest cross references for a verse.
pub trait CrossReferenceSource {
    fn related(
        &self,
        reference: &VerseRef,
        verse_text: &str,
    ) -> impl Future<Output = Result<Vec<CrossReference>>> + Send;
}

/// What [`update_concordance`] did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new entry with this many cross references was appended.
    Added { related: usize },
    /// The reference was already in the store; no request was made.
    AlreadyPresent,
    /// The source failed or returned nothing; the store was not touched.
    NothingToAdd,
}

/// Fetch cross references for `reference` and append them to the store at `store_path`.
///
/// Store read/write failures are errors. Source failures are not.
#[instrument(skip_all, fields(reference = %reference, store = %store_path.display()))]
pub async fn update_concordance<S>(
    store_path: &Path,
    reference: &VerseRef,
    verse_text: &str,
    source: &S,
) -> Result<UpdateOutcome>
where
    S: CrossReferenceSource + Sync,
{
    let mut store = load_store(store_path)?;
    let key = reference.to_string();

    if store.contains(&key) {
        info!("reference already in store, skipping");
        return Ok(UpdateOutcome::AlreadyPresent);
    }

    let related = match source.related(reference, verse_text).await {
        Ok(related) => related,
        Err(e) => {
            warn!(error = %e, "cross reference lookup failed, nothing to add");
            Vec::new()
        }
    };

    if related.is_empty() {
        info!("no cross references returned");
        return Ok(UpdateOutcome::NothingToAdd);
    }

    let count = related.len();
    store.concordances.push(ConcordanceEntry {
        reference: key,
        related,
    });
    save_store(store_path, &store)?;

    info!(related = count, entries = store.concordances.len(), "concordance added");
    Ok(UpdateOutcome::Added { related: count })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use biblia_shared::{BibliaError, InferenceConfig};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Canned source that counts calls.
    struct StubSource {
        reply: std::result::Result<Vec<CrossReference>, String>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn ok(related: Vec<CrossReference>) -> Self {
            Self {
                reply: Ok(related),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                reply: Err(msg.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CrossReferenceSource for StubSource {
        async fn related(&self, _reference: &VerseRef, _verse_text: &str) -> Result<Vec<CrossReference>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(BibliaError::Inference)
        }
    }

    fn store_copy() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("biblia-update-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("concordances.json");
        std::fs::copy(
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../../../fixtures/json/concordances.fixture.json"),
            &path,
        )
        .unwrap();
        path
    }

    fn romanos() -> CrossReference {
        CrossReference {
            book: "Romanos".into(),
            chapter: 6,
            verse: 23,
            text: "Porque la paga del pecado es muerte, mas la dádiva de Dios es vida eterna".into(),
        }
    }

    #[tokio::test]
    async fn appends_new_reference() {
        let path = store_copy();
        let source = StubSource::ok(vec![romanos()]);
        let reference: VerseRef = "Juan 10:10".parse().unwrap();

        let outcome = update_concordance(&path, &reference, "El ladrón...", &source)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Added { related: 1 });

        let store = load_store(&path).unwrap();
        assert_eq!(store.concordances.len(), 2);
        assert_eq!(store.find("Juan 10:10").unwrap().related[0], romanos());
        assert_eq!(store.extra["version"], 1);
    }

    #[tokio::test]
    async fn existing_reference_makes_no_call() {
        let path = store_copy();
        let before = std::fs::read(&path).unwrap();
        let source = StubSource::ok(vec![romanos()]);
        let reference: VerseRef = "Génesis 1:1".parse().unwrap();

        let outcome = update_concordance(&path, &reference, "En el principio...", &source)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::AlreadyPresent);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn source_failure_leaves_store_untouched() {
        let path = store_copy();
        let before = std::fs::read(&path).unwrap();
        let source = StubSource::failing("HTTP 503");
        let reference: VerseRef = "Juan 10:10".parse().unwrap();

        let outcome = update_concordance(&path, &reference, "El ladrón...", &source)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NothingToAdd);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn empty_result_leaves_store_untouched() {
        let path = store_copy();
        let before = std::fs::read(&path).unwrap();
        let source = StubSource::ok(vec![]);
        let reference: VerseRef = "Juan 10:10".parse().unwrap();

        let outcome = update_concordance(&path, &reference, "El ladrón...", &source)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NothingToAdd);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn missing_store_is_fatal() {
        let path = std::env::temp_dir()
            .join(format!("biblia-update-missing-{}", uuid::Uuid::now_v7()))
            .join("concordances.json");
        let source = StubSource::ok(vec![romanos()]);
        let reference: VerseRef = "Juan 10:10".parse().unwrap();

        let err = update_concordance(&path, &reference, "x", &source).await.unwrap_err();
        assert!(matches!(err, BibliaError::Io { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn http_non_json_output_degrades_to_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "generated_text": "Juan 10:10 se relaciona con Juan 3:16."
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let config = InferenceConfig {
            endpoint: format!("{}/models/test-model", server.uri()),
            ..InferenceConfig::default()
        };
        let client = InferenceClient::new(&config, "hf_test").unwrap();
        let path = store_copy();
        let before = std::fs::read(&path).unwrap();
        let reference: VerseRef = "Juan 10:10".parse().unwrap();

        let outcome = update_concordance(&path, &reference, "El ladrón...", &client)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NothingToAdd);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
