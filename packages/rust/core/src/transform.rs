//! Raw verse dump → structured dataset.
//!
//! The raw dump is a JSON array of `{ "abbrev": "gn", "chapters": [["verse", ...], ...] }`.
//! Books get their Spanish display name, chapters and verses get 1-based numbers.

use serde_json::Value;
use tracing::{error, info, instrument};

use biblia_shared::{BibliaError, Book, Chapter, ChapterNumber, Result, ScriptureDataset, Verse};

/// Abbreviation → display name, in canonical order.
const BOOK_NAMES: &[(&str, &str)] = &[
    ("gn", "Génesis"),
    ("ex", "Éxodo"),
    ("lv", "Levítico"),
    ("nm", "Números"),
    ("dt", "Deuteronomio"),
    ("jos", "Josué"),
    ("jud", "Jueces"),
    ("rt", "Rut"),
    ("1sm", "1 Samuel"),
    ("2sm", "2 Samuel"),
    ("1kgs", "1 Reyes"),
    ("2kgs", "2 Reyes"),
    ("1ch", "1 Crónicas"),
    ("2ch", "2 Crónicas"),
    ("ezr", "Esdras"),
    ("neh", "Nehemías"),
    ("est", "Ester"),
    ("job", "Job"),
    ("ps", "Salmos"),
    ("prv", "Proverbios"),
    ("ec", "Eclesiastés"),
    ("so", "Cantar de los Cantares"),
    ("is", "Isaías"),
    ("jr", "Jeremías"),
    ("lm", "Lamentaciones"),
    ("ez", "Ezequiel"),
    ("dn", "Daniel"),
    ("ho", "Oseas"),
    ("jl", "Joel"),
    ("am", "Amós"),
    ("ob", "Abdías"),
    ("jon", "Jonás"),
    ("mi", "Miqueas"),
    ("na", "Nahúm"),
    ("hk", "Habacuc"),
    ("zp", "Sofonías"),
    ("hg", "Hageo"),
    ("zc", "Zacarías"),
    ("ml", "Malaquías"),
    ("mt", "Mateo"),
    ("mk", "Marcos"),
    ("lk", "Lucas"),
    ("jn", "Juan"),
    ("act", "Hechos"),
    ("rm", "Romanos"),
    ("1co", "1 Corintios"),
    ("2co", "2 Corintios"),
    ("gl", "Gálatas"),
    ("eph", "Efesios"),
    ("php", "Filipenses"),
    ("col", "Colosenses"),
    ("1th", "1 Tesalonicenses"),
    ("2th", "2 Tesalonicenses"),
    ("1tm", "1 Timoteo"),
    ("2tm", "2 Timoteo"),
    ("tt", "Tito"),
    ("phm", "Filemón"),
    ("hb", "Hebreos"),
    ("jm", "Santiago"),
    ("1pe", "1 Pedro"),
    ("2pe", "2 Pedro"),
    ("1jn", "1 Juan"),
    ("2jn", "2 Juan"),
    ("3jn", "3 Juan"),
    ("jd", "Judas"),
    ("re", "Apocalipsis"),
];

/// Counts reported by [`transform_raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
    pub skipped_books: usize,
    pub skipped_chapters: usize,
}

/// Display name for a book abbreviation; unknown abbreviations pass through.
pub fn book_name(abbrev: &str) -> &str {
    BOOK_NAMES
        .iter()
        .find(|(a, _)| *a == abbrev)
        .map_or(abbrev, |(_, name)| *name)
}

/// Parse raw dump content. The top level must be an array of books.
pub fn parse_raw(content: &str) -> Result<Vec<Value>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let value: Value = serde_json::from_str(content)
        .map_err(|e| BibliaError::parse(format!("raw dump is not valid JSON: {e}")))?;

    match value {
        Value::Array(books) => Ok(books),
        _ => Err(BibliaError::validation("raw dump is not an array of books")),
    }
}

/// Convert parsed raw books into the structured dataset.
///
/// Books without an `abbrev` or a `chapters` array are skipped, as are
/// chapters that are not arrays. Chapter numbers follow the raw position, so
/// a skipped chapter leaves a gap.
#[instrument(skip_all, fields(raw_books = raw.len()))]
pub fn transform_raw(raw: &[Value]) -> (ScriptureDataset, TransformReport) {
    let mut report = TransformReport::default();
    let mut books = Vec::with_capacity(raw.len());

    for (book_index, raw_book) in raw.iter().enumerate() {
        let abbrev = raw_book
            .get("abbrev")
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty());
        let raw_chapters = raw_book.get("chapters").and_then(Value::as_array);

        let (Some(abbrev), Some(raw_chapters)) = (abbrev, raw_chapters) else {
            error!(book_index, "invalid book entry, skipping");
            report.skipped_books += 1;
            continue;
        };

        let name = book_name(abbrev).to_string();
        let mut chapters = Vec::with_capacity(raw_chapters.len());

        for (chapter_index, raw_chapter) in raw_chapters.iter().enumerate() {
            let Some(raw_verses) = raw_chapter.as_array() else {
                error!(book = %name, chapter = chapter_index + 1, "invalid chapter structure, skipping");
                report.skipped_chapters += 1;
                continue;
            };

            let verses: Vec<Verse> = raw_verses
                .iter()
                .enumerate()
                .map(|(verse_index, text)| Verse {
                    verse: (verse_index + 1) as u32,
                    text: text
                        .as_str()
                        .map(String::from)
                        .unwrap_or_else(|| text.to_string()),
                })
                .collect();

            report.verses += verses.len();
            chapters.push(Chapter {
                chapter: ChapterNumber::Number(chapter_index as i64 + 1),
                verses,
            });
        }

        report.chapters += chapters.len();
        report.books += 1;
        books.push(Book { name, chapters });
    }

    info!(
        books = report.books,
        chapters = report.chapters,
        verses = report.verses,
        skipped_books = report.skipped_books,
        skipped_chapters = report.skipped_chapters,
        "raw dump transformed"
    );

    (ScriptureDataset { books }, report)
}
