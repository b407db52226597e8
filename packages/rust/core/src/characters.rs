//! Character list builder.
//!
//! Walks the dataset book by book and chapter by chapter, emitting exactly one
//! [`CharacterRecord`] per chapter: the curated seed pinned to that chapter key
//! when one exists, otherwise a numbered generic placeholder. The walk stops as
//! soon as the record cap is reached, even in the middle of a book.

use std::path::Path;

use tracing::{debug, info, instrument};

use biblia_shared::{
    CharacterBuildConfig, CharacterRecord, ChapterNumber, Result, ScriptureDataset, SeedCharacter,
    chapter_key,
};

use crate::dataset::{WriteSummary, write_json_pretty};
use crate::seeds::SeedIndex;

/// Display name prefix for generic placeholders (`Personaje 1`, `Personaje 2`, ...).
pub const GENERIC_NAME_PREFIX: &str = "Personaje";

/// Counters collected while building the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records taken from the seed list.
    pub seed_hits: usize,
    /// Generic placeholders emitted.
    pub placeholders: usize,
    /// Value of the placeholder counter when the walk stopped.
    pub next_generic: usize,
    /// Chapters present in the dataset.
    pub chapters_total: usize,
    /// Whether the cap cut the walk short.
    pub truncated: bool,
}

/// Output of [`build_characters`].
#[derive(Debug, Clone, Default)]
pub struct CharacterList {
    /// Records in traversal order, at most `max_records`.
    pub records: Vec<CharacterRecord>,
    pub stats: BuildStats,
}

/// Placeholder image URL for a label: `<base>?text=<label>`, form-urlencoded.
///
/// Spaces become `+`; other reserved and non-ASCII bytes are percent-encoded,
/// so the label can be recovered with form-urldecoding.
pub fn placeholder_image_url(base: &str, label: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(label.as_bytes()).collect();
    format!("{base}?text={encoded}")
}

/// Build the character list for `dataset`.
#[instrument(skip_all, fields(books = dataset.books.len(), seeds = seeds.len(), max = config.max_records))]
pub fn build_characters(
    dataset: &ScriptureDataset,
    seeds: &[SeedCharacter],
    config: &CharacterBuildConfig,
) -> CharacterList {
    let index = SeedIndex::new(seeds);
    let chapters_total = dataset.chapter_count();

    let mut records = Vec::with_capacity(chapters_total.min(config.max_records));
    let mut generic_count: usize = 1;
    let mut seed_hits = 0;

    'books: for book in &dataset.books {
        for chapter in &book.chapters {
            let key = chapter_key(&book.name, &chapter.chapter);

            let record = match index.get(&key) {
                Some(seed) => {
                    seed_hits += 1;
                    seed_record(seed, &config.placeholder_base)
                }
                None => {
                    let record = placeholder_record(
                        generic_count,
                        &book.name,
                        &chapter.chapter,
                        key,
                        &config.placeholder_base,
                    );
                    generic_count += 1;
                    record
                }
            };
            records.push(record);

            if records.len() >= config.max_records {
                debug!(book = %book.name, chapter = %chapter.chapter, "record cap reached");
                break 'books;
            }
        }
    }

    records.truncate(config.max_records);

    let stats = BuildStats {
        seed_hits,
        placeholders: generic_count - 1,
        next_generic: generic_count,
        chapters_total,
        truncated: chapters_total > records.len(),
    };

    info!(
        records = records.len(),
        seed_hits = stats.seed_hits,
        placeholders = stats.placeholders,
        truncated = stats.truncated,
        "character list built"
    );

    CharacterList { records, stats }
}

/// Write the first `max_records` records of `records` to `path` as indented JSON.
pub fn write_characters(
    path: &Path,
    records: &[CharacterRecord],
    max_records: usize,
) -> Result<WriteSummary> {
    let bounded = &records[..records.len().min(max_records)];
    let summary = write_json_pretty(path, bounded)?;
    info!(
        path = %path.display(),
        records = bounded.len(),
        sha256 = %summary.sha256,
        "characters written"
    );
    Ok(summary)
}

fn seed_record(seed: &SeedCharacter, placeholder_base: &str) -> CharacterRecord {
    let image = seed
        .image
        .clone()
        .unwrap_or_else(|| placeholder_image_url(placeholder_base, &seed.name));

    CharacterRecord {
        name: seed.name.clone(),
        image,
        description: seed.description.clone(),
        chapter: seed.chapter.clone(),
    }
}

fn placeholder_record(
    n: usize,
    book: &str,
    chapter: &ChapterNumber,
    key: String,
    placeholder_base: &str,
) -> CharacterRecord {
    let name = format!("{GENERIC_NAME_PREFIX} {n}");
    CharacterRecord {
        image: placeholder_image_url(placeholder_base, &name),
        description: format!("Figura en {book} {chapter}."),
        chapter: key,
        name,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
